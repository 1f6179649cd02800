//! Quantum defects from tabulated extended Ritz coefficients.
//!
//! A table maps total spin `S` → orbital angular momentum `L` → total angular
//! momentum `J` → coefficients `[δ₀, δ₂, δ₄, ...]` for
//! ```text
//! δ(n) = δ₀ + δ₂ / (n - δ)² + δ₄ / (n - δ)⁴ + ...
//! ```
//! The defect is evaluated by [`QD_ITERS`] rounds of fixed-point iteration,
//! seeded with `δ₀`. Convergence is not checked.
//!
//! Tables are loaded from TOML as an array of `series` entries:
//! ```
//! use starkmap::defects::QuantumDefects;
//!
//! let table = QuantumDefects::from_toml_str(r#"
//!     [[series]]
//!     S = 1
//!     L = 0
//!     J = 1
//!     coeffs = [0.3, 0.04]
//! "#).unwrap();
//! let qd = table.defect(1, 30, 0, 1);
//! assert!((qd - (0.3 + 0.04 / (30.0 - qd).powi(2))).abs() < 1e-12);
//! ```

use std::{ collections::BTreeMap, fs, path::Path };
use ndarray as nd;
use serde::{ Deserialize, Serialize };
use crate::{
    basis::StateNLJ,
    error::ConfigError,
    QD_ITERS,
};

/// Result of looking up a `(S, L, J)` series in a [`QuantumDefects`] table.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Lookup<'a> {
    /// No entry for `L` (or `S`): a hydrogenic, zero-defect series.
    Hydrogenic,
    /// `L` is tabulated but this `J` is not: the defect is undefined.
    Undefined,
    /// Extended Ritz coefficients for the series.
    Coeffs(&'a [f64]),
}

/// A single row in a TOML defect table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub S: u32,
    pub L: u32,
    pub J: u32,
    pub coeffs: Vec<f64>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
struct SeriesFile {
    #[serde(default)]
    series: Vec<Series>,
}

type JMap = BTreeMap<u32, Vec<f64>>;
type LMap = BTreeMap<u32, JMap>;

/// Table of extended Ritz coefficients, keyed by `S`, `L`, and `J`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QuantumDefects {
    table: BTreeMap<u32, LMap>,
}

impl QuantumDefects {
    /// Create an empty table, for which every state is hydrogenic.
    pub fn new() -> Self { Self::default() }

    /// Insert (or replace) the coefficients for a series.
    pub fn insert(&mut self, S: u32, L: u32, J: u32, coeffs: Vec<f64>) {
        self.table.entry(S).or_default()
            .entry(L).or_default()
            .insert(J, coeffs);
    }

    /// Builder-style version of [`Self::insert`].
    pub fn with(mut self, S: u32, L: u32, J: u32, coeffs: Vec<f64>) -> Self {
        self.insert(S, L, J, coeffs);
        self
    }

    /// Parse a table from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let file: SeriesFile = toml::from_str(s)?;
        Ok(file.series.into_iter().collect())
    }

    /// Read a table from a TOML file.
    pub fn from_toml_file<P>(path: P) -> Result<Self, ConfigError>
    where P: AsRef<Path>
    {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }

    /// Iterate over all series in the table, ordered by `S`, then `L`, then
    /// `J`.
    pub fn series(&self) -> impl Iterator<Item = Series> + '_ {
        self.table.iter()
            .flat_map(|(&S, lmap)| {
                lmap.iter().flat_map(move |(&L, jmap)| {
                    jmap.iter().map(move |(&J, coeffs)| {
                        Series { S, L, J, coeffs: coeffs.clone() }
                    })
                })
            })
    }

    /// Look up the coefficients for a series.
    pub fn lookup(&self, S: u32, L: u32, J: u32) -> Lookup<'_> {
        match self.table.get(&S).and_then(|lmap| lmap.get(&L)) {
            None => Lookup::Hydrogenic,
            Some(jmap) => match jmap.get(&J) {
                None => Lookup::Undefined,
                Some(coeffs) => Lookup::Coeffs(coeffs),
            },
        }
    }

    /// Compute the quantum defect of a single state.
    ///
    /// Returns `0.0` for hydrogenic series and `NaN` where the defect is
    /// undefined.
    pub fn defect(&self, S: u32, n: u32, L: u32, J: u32) -> f64 {
        match self.lookup(S, L, J) {
            Lookup::Hydrogenic => 0.0,
            Lookup::Undefined => f64::NAN,
            Lookup::Coeffs(coeffs) => ritz_defect(n as f64, coeffs),
        }
    }

    /// Compute quantum defects for every state in a basis, in basis order.
    pub fn get_qd(&self, S: u32, states: &[StateNLJ]) -> nd::Array1<f64> {
        states.iter()
            .map(|st| self.defect(S, st.n, st.l, st.j))
            .collect()
    }
}

impl FromIterator<Series> for QuantumDefects {
    fn from_iter<I>(iter: I) -> Self
    where I: IntoIterator<Item = Series>
    {
        let mut table = Self::new();
        iter.into_iter()
            .for_each(|Series { S, L, J, coeffs }| table.insert(S, L, J, coeffs));
        table
    }
}

/// Evaluate the extended Ritz formula for principal quantum number `n` by
/// fixed-point iteration.
///
/// An empty coefficient list gives a zero defect.
pub fn ritz_defect(n: f64, coeffs: &[f64]) -> f64 {
    let Some(&d0) = coeffs.first() else { return 0.0; };
    let mut qd = d0;
    for _ in 0..QD_ITERS {
        let m = n - qd;
        qd = coeffs.iter().enumerate().skip(1)
            .fold(d0, |acc, (k, dk)| acc + dk * m.powf(-2.0 * k as f64));
    }
    qd
}
