//! Options for matrix builders and field sweeps.
//!
//! Both structures deserialize from TOML with every field optional; missing
//! fields take their [`Default`] values.
//!
//! ```toml
//! rmin = 0.65
//! dm_allow = [0]
//! field_orientation = "parallel"
//! show_progress = false
//!
//! [step_params]
//! kind = "sigmoid"
//! low = 0.005
//! high = 0.01
//! width = 8.0
//! mid = 0.5
//! round = 3
//! ```

use std::{ fs, path::Path };
use serde::{ Deserialize, Serialize, de::DeserializeOwned };
use crate::{
    angular::FieldOrientation,
    error::ConfigError,
    numerov::StepParams,
    progress::{ self, Progress },
    DEF_RMIN,
};

fn from_file<T, P>(path: P) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let s = fs::read_to_string(path)?;
    Ok(toml::from_str(&s)?)
}

/// Options for building interaction matrices.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatrixConfig {
    /// Orientation of the electric field; Stark matrices only.
    pub field_orientation: FieldOrientation,
    /// Changes in `m` coupled by a parallel electric field; Stark matrices
    /// only.
    pub dm_allow: Vec<i32>,
    /// Inner radial cutoff for Numerov integration.
    pub rmin: f64,
    /// Print progress to stderr.
    pub show_progress: bool,
    /// Compute matrix rows in parallel.
    pub parallel: bool,
    /// Rule for the Numerov step size of each pair of states.
    pub step_params: StepParams,
}

impl Default for MatrixConfig {
    fn default() -> Self {
        Self {
            field_orientation: FieldOrientation::default(),
            dm_allow: vec![0],
            rmin: DEF_RMIN,
            show_progress: true,
            parallel: true,
            step_params: StepParams::default(),
        }
    }
}

impl MatrixConfig {
    /// Check that all numerical parameters are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.step_params.validate()?;
        ConfigError::check_rmin(self.rmin)
    }

    /// Parse and validate from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate from a TOML file.
    pub fn from_toml_file<P>(path: P) -> Result<Self, ConfigError>
    where P: AsRef<Path>
    {
        let config: Self = from_file(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Return the progress observer selected by `show_progress`.
    pub fn progress(&self) -> Box<dyn Progress> {
        progress::select(self.show_progress)
    }
}

/// Default number of stored eigenvector elements above which a sweep logs a
/// warning (512 MiB).
pub const DEF_WARN_EIGVEC_ELEMS: usize = 1 << 26;

/// Default number of stored eigenvector elements above which a sweep is
/// refused (8 GiB).
pub const DEF_MAX_EIGVEC_ELEMS: usize = 1 << 30;

/// Options for field sweeps.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    /// Print progress to stderr.
    pub show_progress: bool,
    /// Diagonalize at different field values in parallel.
    pub parallel: bool,
    /// Log a warning when an eigenvector sweep stores more elements than
    /// this.
    pub warn_eigvec_elems: usize,
    /// Refuse eigenvector sweeps storing more elements than this.
    pub max_eigvec_elems: usize,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            show_progress: true,
            parallel: true,
            warn_eigvec_elems: DEF_WARN_EIGVEC_ELEMS,
            max_eigvec_elems: DEF_MAX_EIGVEC_ELEMS,
        }
    }
}

impl SweepConfig {
    /// Parse from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Parse from a TOML file.
    pub fn from_toml_file<P>(path: P) -> Result<Self, ConfigError>
    where P: AsRef<Path>
    {
        from_file(path)
    }

    /// Return the progress observer selected by `show_progress`.
    pub fn progress(&self) -> Box<dyn Progress> {
        progress::select(self.show_progress)
    }
}
