#![allow(non_snake_case)]

//! Provides functions and higher-level constructs to compute Stark and
//! diamagnetic energy-level maps for Rydberg states of (quasi-)one-electron
//! atoms.
//!
//! Level maps are computed by building a field-free Hamiltonian in a basis of
//! quantum defect-corrected states, together with interaction matrices whose
//! radial elements come from numerically integrated wavefunctions, and then
//! diagonalizing the total Hamiltonian over a sweep of field values.
//!
//! Provides implementations for the following numerical routines:
//! - Quantum defects via fixed-point iteration of the extended Ritz formula
//! - Radial wavefunctions via inward Numerov integration on a logarithmic
//!   grid[^1]
//! - Stark (dipole) and diamagnetic (sin²θ) matrix elements[^2]
//! - Field sweeps via dense symmetric eigendecomposition
//!
//! All quantities are in atomic units unless noted otherwise; see [`units`]
//! for conversions.
//!
//! See [`docs`] for theoretical background.
//!
//! [^1]: M. L. Zimmerman et al., "Stark structure of the Rydberg states of
//! alkali-metal atoms." Phys. Rev. A **20** 2251 (1979).
//!
//! [^2]: M. M. Kash, "Rydberg atom diamagnetism." PhD thesis, Massachusetts
//! Institute of Technology (1988).

pub mod error;
pub mod units;
pub mod defects;
pub mod basis;
pub mod energy;
pub mod numerov;
pub mod angular;
pub mod progress;
pub mod config;
pub mod interaction;
pub mod sweep;

pub mod docs;

/// Number of fixed-point iterations used to evaluate a quantum defect.
pub const QD_ITERS: usize = 10;

/// Default Numerov step size in ln(r).
pub(crate) const DEF_STEP: f64 = 0.005;

/// Default inner radial cutoff for Numerov integration.
pub(crate) const DEF_RMIN: f64 = 0.65;

pub type Arr1<S> = ndarray::ArrayBase<S, ndarray::Ix1>;
pub type Arr2<S> = ndarray::ArrayBase<S, ndarray::Ix2>;
