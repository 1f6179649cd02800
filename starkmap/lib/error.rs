//! Collection of all error types.
//!
//! All errors derive [`thiserror::Error`], making them composable when allowed
//! and compatible with application code using [`anyhow`][anyhow].
//!
//! None of these errors are worth retrying: every one is a deterministic
//! function of its inputs and indicates a mismatch between the parameters
//! used to build a computation.
//!
//! [anyhow]: https://crates.io/crates/anyhow

use ndarray as nd;
use ndarray_linalg::error::LinalgError;
use thiserror::Error;

/// Returned when an operation requiring equal-length arrays encounters arrays
/// with unequal length.
#[derive(Debug, Error)]
#[error("encountered arrays with incompatible lengths; got {0} and {1}")]
pub struct LengthError(pub usize, pub usize);

impl LengthError {
    pub(crate) fn check<S, A, T, B>(
        a: &nd::ArrayBase<S, nd::Ix1>,
        b: &nd::ArrayBase<T, nd::Ix1>,
    ) -> Result<(), Self>
    where
        S: nd::Data<Elem = A>,
        T: nd::Data<Elem = B>,
    {
        let na = a.len();
        let nb = b.len();
        (na == nb).then_some(()).ok_or(Self(na, nb))
    }
}

/// Returned when a radial coordinate is absent from a grid during alignment
/// trimming.
///
/// Grid points are compared exactly, so this almost always means that two
/// wavefunctions were integrated with different step sizes or outer
/// boundaries.
#[derive(Debug, Error)]
#[error("value {0:e} not found in radial grid")]
pub struct NotFoundError(pub f64);

/// Returned from [`wf_align`][crate::numerov::wf_align] and anything that
/// evaluates radial overlaps.
#[derive(Debug, Error)]
pub enum AlignError {
    /// Trimming left grids whose endpoints or lengths still disagree.
    #[error(
        "failed to align wavefunctions: heads ({h1:e}, {h2:e}), \
        tails ({t1:e}, {t2:e}), lengths ({n1}, {n2})"
    )]
    Mismatch {
        h1: f64,
        h2: f64,
        t1: f64,
        t2: f64,
        n1: usize,
        n2: usize,
    },

    /// [`NotFoundError`]
    #[error("lookup error: {0}")]
    NotFound(#[from] NotFoundError),
}

/// Returned when a matrix has the wrong shape for the operation it is passed
/// to.
#[derive(Debug, Error)]
#[error("expected a matrix of shape {expected:?}; got {got:?}")]
pub struct ShapeError {
    pub expected: (usize, usize),
    pub got: (usize, usize),
}

impl ShapeError {
    pub(crate) fn check<S, A>(
        a: &nd::ArrayBase<S, nd::Ix2>,
        n: usize,
    ) -> Result<(), Self>
    where S: nd::Data<Elem = A>
    {
        let got = a.dim();
        (got == (n, n)).then_some(())
            .ok_or(Self { expected: (n, n), got })
    }
}

/// Returned when reading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Returned when a non-positive or non-finite step size is encountered.
    #[error("step sizes must be finite and greater than 0; got {0}")]
    BadStep(f64),

    /// Returned when a non-positive or non-finite inner radial cutoff is
    /// encountered.
    #[error("rmin must be finite and greater than 0; got {0}")]
    BadRmin(f64),

    /// Returned when a principal quantum number range is empty or starts at
    /// zero.
    #[error("invalid n range: nmin = {0}, nmax = {1}")]
    BadRange(u32, u32),

    /// Failed to parse TOML.
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Failed to read a configuration file.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    pub(crate) fn check_step(step: f64) -> Result<(), Self> {
        (step.is_finite() && step > 0.0).then_some(())
            .ok_or(Self::BadStep(step))
    }

    pub(crate) fn check_rmin(rmin: f64) -> Result<(), Self> {
        (rmin.is_finite() && rmin > 0.0).then_some(())
            .ok_or(Self::BadRmin(rmin))
    }

    pub(crate) fn check_range(nmin: u32, nmax: u32) -> Result<(), Self> {
        (nmin >= 1 && nmin <= nmax).then_some(())
            .ok_or(Self::BadRange(nmin, nmax))
    }
}

/// Top-level error type returned from matrix builders and field sweeps.
#[derive(Debug, Error)]
pub enum StarkError {
    /// Returned when an eigenvector sweep would exceed the configured number
    /// of stored elements.
    #[error(
        "eigenvector sweep needs {elems} elements, above the limit of {limit}; \
        reduce the number of field values or the basis size"
    )]
    SweepTooLarge { elems: usize, limit: usize },

    /// [`LengthError`]
    #[error("array length error: {0}")]
    Length(#[from] LengthError),

    /// [`ShapeError`]
    #[error("matrix shape error: {0}")]
    Shape(#[from] ShapeError),

    /// [`AlignError`]
    #[error("alignment error: {0}")]
    Align(#[from] AlignError),

    /// [`ConfigError`]
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// [`LinalgError`]
    #[error("linalg error: {0}")]
    Linalg(#[from] LinalgError),
}

impl From<NotFoundError> for StarkError {
    fn from(err: NotFoundError) -> Self { Self::Align(err.into()) }
}
