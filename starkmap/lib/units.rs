#![allow(non_upper_case_globals)]

//! Physical constants and conversions to and from (reduced-mass) atomic
//! units.
//!
//! Concrete physical constants are taken from NIST.

use std::f64::consts::PI;

/// Planck constant (kg m^2 s^-1)
pub const h: f64 = 6.62607015e-34;
//             +/- 0 (exact)

/// reduced Planck constant (kg m^2 s^-1)
pub const hbar: f64 = h / 2.0 / PI;
//                +/- 0 (exact)

/// speed of light in vacuum (m s^-1)
pub const c: f64 = 2.99792458e8;
//             +/- 0 (exact)

/// elementary charge (C)
pub const e: f64 = 1.602176634e-19;
//             +/- 0 (exact)

/// electron mass (kg)
pub const me: f64 = 9.1093837015e-31;
//              +/- 0.0000000028e-31

/// unified atomic mass unit (kg)
pub const mu: f64 = 1.66053906660e-27;
//              +/- 0.00000000050e-27

/// fine structure constant
pub const alpha: f64 = 7.2973525693e-3;
//                 +/- 0.0000000011e-3

/// Bohr radius (m)
pub const a0: f64 = 5.29177210903e-11;
//              +/- 0.00000000080e-11

/// Hartree energy (J)
pub const Eh: f64 = 4.3597447222071e-18;
//              +/- 0.0000000000085e-18

/// Mass of ⁴He in unified atomic mass units.
pub const MASS_HE4_U: f64 = 4.002602;

/// Mass-dependent constants for a single atomic species.
///
/// Constructed once and passed by reference to anything that needs
/// reduced-mass corrections or unit conversions.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Atom {
    /// Nuclear (atomic) mass (kg).
    pub mass: f64,
    /// Nuclear charge.
    pub z: f64,
    /// Reduced-mass ratio `(M - mₑ) / M`.
    pub mu_me: f64,
    /// Electron-to-atom mass ratio `mₑ / M`.
    pub mu_M: f64,
    /// Reduced-mass Hartree energy (J).
    pub en_h: f64,
    /// Reduced-mass Bohr radius (m).
    pub a_0: f64,
}

impl Atom {
    /// Construct from an atomic mass in unified atomic mass units and a
    /// nuclear charge.
    pub fn new(mass_u: f64, z: f64) -> Self {
        let mass = mass_u * mu;
        let mu_me = (mass - me) / mass;
        let mu_M = me / mass;
        Self {
            mass,
            z,
            mu_me,
            mu_M,
            en_h: Eh * mu_me,
            a_0: a0 / mu_me,
        }
    }

    /// ⁴He.
    pub fn helium() -> Self { Self::new(MASS_HE4_U, 2.0) }

    /// Electric dipole moment scale `e a₀` (C m).
    pub fn dipole(&self) -> f64 { e * self.a_0 }

    /// Convert an electric field strength in V m^-1 to atomic units.
    pub fn efield_to_au<T, U>(&self, F: T) -> U
    where T: std::ops::Mul<f64, Output = U>
    {
        F * (e * self.a_0 / self.en_h)
    }

    /// Convert an electric field strength in atomic units to V m^-1.
    pub fn efield_from_au<T, U>(&self, F: T) -> U
    where T: std::ops::Mul<f64, Output = U>
    {
        F * (self.en_h / e / self.a_0)
    }

    /// Convert an energy in atomic units to J.
    pub fn energy_to_joules<T, U>(&self, E: T) -> U
    where T: std::ops::Mul<f64, Output = U>
    {
        E * self.en_h
    }

    /// Convert an energy in atomic units to Hz.
    pub fn energy_to_hz<T, U>(&self, E: T) -> U
    where T: std::ops::Mul<f64, Output = U>
    {
        E * (self.en_h / h)
    }

    /// Convert an energy in atomic units to cm^-1.
    pub fn energy_to_wavenumber<T, U>(&self, E: T) -> U
    where T: std::ops::Mul<f64, Output = U>
    {
        E * (self.en_h / (100.0 * h * c))
    }

    /// Convert an energy in cm^-1 to atomic units.
    pub fn energy_from_wavenumber<T, U>(&self, E: T) -> U
    where T: std::ops::Mul<f64, Output = U>
    {
        E * (100.0 * h * c / self.en_h)
    }
}

/// Convert a magnetic flux density in T to atomic units, `ħ / (e a₀²)`.
///
/// The infinite-mass Bohr radius is used here, matching the Bohr magneton in
/// [`e_zeeman`][crate::energy::e_zeeman].
pub fn bfield_to_au<T, U>(B: T) -> U
where T: std::ops::Mul<f64, Output = U>
{
    B * (e * a0.powi(2) / hbar)
}

/// Convert a magnetic flux density in atomic units to T.
pub fn bfield_from_au<T, U>(B: T) -> U
where T: std::ops::Mul<f64, Output = U>
{
    B * (hbar / e / a0.powi(2))
}
