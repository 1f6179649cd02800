//! Radial wavefunctions via inward Numerov integration on a logarithmic grid,
//! and overlap integrals between them.
//!
//! Wavefunctions are sampled at
//! ```text
//! r[i] = rmax exp(-i h),   rmax = 2 nmax (nmax + 15)
//! ```
//! so that any two wavefunctions computed with the same step `h` and the same
//! `nmax` share grid points exactly and can be [aligned][wf_align] without
//! interpolation. See [`docs`][crate::docs#radial-wavefunctions] for details.

use ndarray::{ self as nd, s };
use serde::{ Deserialize, Serialize };
use crate::{
    Arr1,
    error::{ AlignError, ConfigError, LengthError, NotFoundError, StarkError },
    DEF_STEP,
};

pub type StarkResult<T> = Result<T, StarkError>;

/// Initial amplitude of the wavefunction at the outer boundary.
const Y_START: f64 = 1e-10;

/// Rule for choosing the Numerov step size for a pair of states.
///
/// All rules are functions of the ratio `lmax / nmax` over the pair, so that
/// high-`l` states (whose wavefunctions are confined far from the core) can
/// use coarser grids.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StepParams {
    /// Fixed step size.
    Flat {
        step: f64,
    },
    /// `(lmax / nmax)^exponent (high - low) + low`, rounded to `round` decimal
    /// places.
    Poly {
        low: f64,
        high: f64,
        exponent: f64,
        round: i32,
    },
    /// `(high - low) / (1 + exp(-width (lmax / nmax - mid))) + low`, rounded to
    /// `round` decimal places.
    Sigmoid {
        low: f64,
        high: f64,
        width: f64,
        mid: f64,
        round: i32,
    },
}

impl Default for StepParams {
    fn default() -> Self { Self::Flat { step: DEF_STEP } }
}

impl StepParams {
    /// Return `true` if `self` is `Flat`.
    pub fn is_flat(&self) -> bool { matches!(self, Self::Flat { .. }) }

    /// Return `true` if `self` is `Poly`.
    pub fn is_poly(&self) -> bool { matches!(self, Self::Poly { .. }) }

    /// Return `true` if `self` is `Sigmoid`.
    pub fn is_sigmoid(&self) -> bool { matches!(self, Self::Sigmoid { .. }) }

    /// Check that every step size this rule can produce is positive.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            Self::Flat { step } => ConfigError::check_step(*step),
            Self::Poly { low, high, .. } | Self::Sigmoid { low, high, .. } => {
                ConfigError::check_step(*low)?;
                ConfigError::check_step(*high)
            },
        }
    }
}

// round to a number of decimal places, with ties to even
fn round_decimals(x: f64, decimals: i32) -> f64 {
    let scale = 10.0_f64.powi(decimals);
    (x * scale).round_ties_even() / scale
}

/// Choose a step size for a pair of states with maximum effective principal
/// quantum number `nmax` and maximum orbital angular momentum `lmax`.
pub fn chose_step(nmax: f64, lmax: u32, params: &StepParams) -> f64 {
    let ratio = lmax as f64 / nmax;
    match *params {
        StepParams::Flat { step } => step,
        StepParams::Poly { low, high, exponent, round } => {
            round_decimals(ratio.powf(exponent) * (high - low) + low, round)
        },
        StepParams::Sigmoid { low, high, width, mid, round } => {
            round_decimals(
                (high - low) / (1.0 + (-width * (ratio - mid)).exp()) + low,
                round,
            )
        },
    }
}

#[derive(Copy, Clone, Debug)]
struct Window(f64, f64);

impl Window {
    fn push(&mut self, val: f64) { self.0 = self.1; self.1 = val; }
}

/// A radial wavefunction `y = √r R(r)` sampled on a decreasing logarithmic
/// grid `r`.
///
/// Wavefunctions returned by [`wf_numerov`] are normalized such that
/// `Σ y² r² = 1`.
#[derive(Clone, Debug, PartialEq)]
pub struct RadialWf {
    /// Radial coordinates, strictly decreasing.
    pub r: nd::Array1<f64>,
    /// Wavefunction values.
    pub y: nd::Array1<f64>,
}

impl RadialWf {
    /// Create a new `RadialWf` from bare coordinate and wavefunction arrays.
    pub fn new(r: nd::Array1<f64>, y: nd::Array1<f64>)
        -> Result<Self, LengthError>
    {
        LengthError::check(&r, &y)?;
        Ok(Self { r, y })
    }

    /// Get the number of grid points.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize { self.r.len() }

    /// Compute the discrete norm `Σ y² r²`.
    pub fn norm(&self) -> f64 {
        self.r.iter().zip(&self.y)
            .map(|(rk, yk)| yk.powi(2) * rk.powi(2))
            .sum()
    }

    /// Compute the expectation value `⟨r^p⟩`.
    pub fn expectation(&self, p: f64) -> f64 {
        self.r.iter().zip(&self.y)
            .map(|(rk, yk)| yk.powi(2) * rk.powf(2.0 + p))
            .sum()
    }
}

/// Integrate the radial Schrödinger equation inward for a state with
/// effective principal quantum number `n` and orbital angular momentum `l`.
///
/// Integration starts near `2 n (n + 15)` on the grid defined by `nmax` and
/// `step`, and continues until the first point below `rmin` or until the
/// solution begins to grow faster than `r^(-l - 1)` inside the inner classical
/// turning point, whichever comes first. If `rmin` lies outside the starting
/// radius, only the two seed points are returned.
pub fn wf_numerov(n: f64, l: u32, nmax: f64, rmin: f64, step: f64)
    -> Result<RadialWf, ConfigError>
{
    ConfigError::check_step(step)?;
    ConfigError::check_rmin(rmin)?;

    let l = l as f64;
    let W1 = -0.5 * n.powf(-2.0);
    let W2 = (l + 0.5).powi(2);
    let rmax = 2.0 * nmax * (nmax + 15.0);
    let r_in = n.powi(2) - n * (n.powi(2) - l * (l + 1.0)).sqrt();
    let step_sq = step.powi(2);
    let g_of = |r: f64| 2.0 * r.powi(2) * (-1.0 / r - W1) + W2;
    let r_at = |i: usize| rmax * (-(i as f64) * step).exp();

    // start on a grid point shared by every state with the same `nmax`
    let (mut i, r_sub2): (usize, f64)
        = if n == nmax {
            (0, rmax)
        } else {
            let i = ((rmax / (2.0 * n * (n + 15.0))).ln() / step).ceil() as usize;
            (i, r_at(i))
        };
    i += 1;

    let mut r_sub1 = r_at(i);
    let cap = ((r_sub1 / rmin).ln() / step).max(0.0) as usize + 3;
    let mut rvals: Vec<f64> = Vec::with_capacity(cap);
    let mut yvals: Vec<f64> = Vec::with_capacity(cap);
    let mut gw = Window(g_of(r_sub2), g_of(r_sub1));
    let mut yw = Window(Y_START, Y_START * (1.0 + step * gw.0.sqrt()));
    rvals.extend([r_sub2, r_sub1]);
    yvals.extend([yw.0, yw.1]);

    i += 1;
    let mut r = r_sub1;
    let (mut g, mut y): (f64, f64);
    while r >= rmin {
        r = r_at(i);
        g = g_of(r);
        y = (
            yw.0 * (gw.0 - 12.0 / step_sq)
            + yw.1 * (10.0 * gw.1 + 24.0 / step_sq)
        ) / (12.0 / step_sq - g);

        // stop before the growing solution takes over
        if r < r_in {
            let dy = ((y - yw.1) / yw.1).abs();
            let dr = (r.powf(-l - 1.0) - r_sub1.powf(-l - 1.0))
                / r_sub1.powf(-l - 1.0);
            if dy > dr {
                log::trace!(
                    "numerov: n = {n}, l = {l}: divergence guard at r = {r:e}"
                );
                break;
            }
        }

        rvals.push(r);
        yvals.push(y);
        r_sub1 = r;
        gw.push(g);
        yw.push(y);
        i += 1;
    }

    let mut wf = RadialWf {
        r: nd::Array1::from(rvals),
        y: nd::Array1::from(yvals),
    };
    let norm = wf.norm();
    wf.y *= norm.powf(-0.5);
    Ok(wf)
}

/// Index of the first occurrence of `val` in `arr`.
pub fn find_first<S>(arr: &Arr1<S>, val: f64) -> Result<usize, NotFoundError>
where S: nd::Data<Elem = f64>
{
    arr.iter().position(|&a| a == val).ok_or(NotFoundError(val))
}

/// Index of the last occurrence of `val` in `arr`, excluding index 0.
///
/// Used for tail trimming, where a match at the head would leave a one-point
/// overlap.
pub fn find_last<S>(arr: &Arr1<S>, val: f64) -> Result<usize, NotFoundError>
where S: nd::Data<Elem = f64>
{
    arr.iter().skip(1).rposition(|&a| a == val)
        .map(|k| k + 1)
        .ok_or(NotFoundError(val))
}

/// Views into two wavefunctions, trimmed to a common grid.
#[derive(Clone, Debug)]
pub struct Aligned<'a> {
    pub r1: nd::ArrayView1<'a, f64>,
    pub y1: nd::ArrayView1<'a, f64>,
    pub r2: nd::ArrayView1<'a, f64>,
    pub y2: nd::ArrayView1<'a, f64>,
}

/// Align two wavefunctions on `r`, assuming their (decreasing) grids coincide
/// everywhere except possibly at the head and tail.
///
/// Grid points are compared exactly; no interpolation is performed.
pub fn wf_align<'a>(wf1: &'a RadialWf, wf2: &'a RadialWf)
    -> Result<Aligned<'a>, AlignError>
{
    let (mut r1, mut y1) = (wf1.r.view(), wf1.y.view());
    let (mut r2, mut y2) = (wf2.r.view(), wf2.y.view());

    // trim front end
    if r1[0] != r2[0] {
        if r1[0] > r2[0] {
            let idx = find_first(&r1, r2[0])?;
            r1.slice_collapse(s![idx..]);
            y1.slice_collapse(s![idx..]);
        } else {
            let idx = find_first(&r2, r1[0])?;
            r2.slice_collapse(s![idx..]);
            y2.slice_collapse(s![idx..]);
        }
    }

    // trim back end
    let (n1, n2) = (r1.len(), r2.len());
    if r1[n1 - 1] != r2[n2 - 1] {
        if r1[n1 - 1] < r2[n2 - 1] {
            let idx = find_last(&r1, r2[n2 - 1])?;
            r1.slice_collapse(s![..idx + 1]);
            y1.slice_collapse(s![..idx + 1]);
        } else {
            let idx = find_last(&r2, r1[n1 - 1])?;
            r2.slice_collapse(s![..idx + 1]);
            y2.slice_collapse(s![..idx + 1]);
        }
    }

    let (n1, n2) = (r1.len(), r2.len());
    if r1[0] == r2[0] && r1[n1 - 1] == r2[n2 - 1] && n1 == n2 {
        Ok(Aligned { r1, y1, r2, y2 })
    } else {
        Err(AlignError::Mismatch {
            h1: r1[0],
            h2: r2[0],
            t1: r1[n1 - 1],
            t2: r2[n2 - 1],
            n1,
            n2,
        })
    }
}

/// Compute the overlap `Σ y₁ y₂ r^(2 + p)` between two wavefunctions after
/// [alignment][wf_align].
///
/// Use `p = 1` for the electric dipole operator and `p = 2` for the
/// diamagnetic operator.
pub fn wf_overlap(wf1: &RadialWf, wf2: &RadialWf, p: f64)
    -> Result<f64, AlignError>
{
    let Aligned { r1, y1, y2, .. } = wf_align(wf1, wf2)?;
    let ovlp: f64
        = r1.iter().zip(&y1).zip(&y2)
        .map(|((rk, y1k), y2k)| y1k * y2k * rk.powf(2.0 + p))
        .sum();
    Ok(ovlp)
}

/// Compute the radial overlap `⟨n₁, l₁| r^p |n₂, l₂⟩` between two states with
/// effective principal quantum numbers `n_eff_1` and `n_eff_2`.
///
/// Both wavefunctions are integrated with a single step size [chosen][chose_step]
/// for the pair, on the grid defined by the larger of the two. If either
/// effective principal quantum number is not finite, the result is `NaN`.
pub fn rad_overlap(
    n_eff_1: f64,
    n_eff_2: f64,
    l_1: u32,
    l_2: u32,
    rmin: f64,
    step_params: &StepParams,
    p: f64,
) -> StarkResult<f64>
{
    if !(n_eff_1.is_finite() && n_eff_2.is_finite()) { return Ok(f64::NAN); }
    let nmax = n_eff_1.max(n_eff_2);
    let lmax = l_1.max(l_2);
    let step = chose_step(nmax, lmax, step_params);
    let wf1 = wf_numerov(n_eff_1, l_1, nmax, rmin, step)?;
    let wf2 = wf_numerov(n_eff_2, l_2, nmax, rmin, step)?;
    Ok(wf_overlap(&wf1, &wf2, p)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rel_err(x: f64, expected: f64) -> f64 { ((x - expected) / expected).abs() }

    #[test]
    fn flat_step() {
        let params = StepParams::Flat { step: 0.002 };
        assert_eq!(chose_step(30.0, 29, &params), 0.002);
        assert!(params.is_flat());
        assert_eq!(StepParams::default(), StepParams::Flat { step: DEF_STEP });
    }

    #[test]
    fn poly_step() {
        let params = StepParams::Poly {
            low: 0.005, high: 0.01, exponent: 1.0, round: 4 };
        assert!((chose_step(20.0, 10, &params) - 0.0075).abs() < 1e-15);
        assert!((chose_step(20.0, 0, &params) - 0.005).abs() < 1e-15);
        let params = StepParams::Poly {
            low: 0.005, high: 0.01, exponent: 2.0, round: 3 };
        // 0.36 * 0.005 + 0.005 = 0.0068 -> 0.007
        assert!((chose_step(20.0, 12, &params) - 0.007).abs() < 1e-15);
    }

    #[test]
    fn step_rounding_ties_to_even() {
        let params = StepParams::Poly {
            low: 0.0025, high: 0.0025, exponent: 1.0, round: 3 };
        assert_eq!(chose_step(20.0, 5, &params), 0.002);
        let params = StepParams::Poly {
            low: 0.0035, high: 0.0035, exponent: 1.0, round: 3 };
        assert_eq!(chose_step(20.0, 5, &params), 0.004);
        let params = StepParams::Sigmoid {
            low: 0.0045, high: 0.0045, width: 10.0, mid: 0.5, round: 3 };
        assert_eq!(chose_step(20.0, 5, &params), 0.004);
    }

    #[test]
    fn sigmoid_step() {
        let params = StepParams::Sigmoid {
            low: 0.004, high: 0.008, width: 10.0, mid: 0.5, round: 6 };
        assert!((chose_step(20.0, 10, &params) - 0.006).abs() < 1e-12);
        assert!(chose_step(20.0, 19, &params) > 0.0079);
        assert!(chose_step(20.0, 0, &params) < 0.0041);
    }

    #[test]
    fn step_validation() {
        assert!(StepParams::Flat { step: 0.01 }.validate().is_ok());
        assert!(StepParams::Flat { step: -0.01 }.validate().is_err());
        let params = StepParams::Sigmoid {
            low: 0.0, high: 0.008, width: 10.0, mid: 0.5, round: 6 };
        assert!(params.validate().is_err());
    }

    #[test]
    fn normalized() {
        for (n, l) in [(1, 0), (2, 1), (5, 0), (10, 3), (20, 19)] {
            let n = n as f64;
            let wf = wf_numerov(n, l, 25.0, 0.01, 0.005).unwrap();
            assert!((wf.norm() - 1.0).abs() < 1e-12);
            assert!(wf.r.iter().zip(wf.r.iter().skip(1)).all(|(a, b)| b < a));
        }
    }

    #[test]
    fn hydrogen_expectation_values() {
        // ⟨r⟩ = (3 n² - l (l + 1)) / 2
        for (n, l) in [(1_u32, 0_u32), (2, 0), (2, 1), (3, 2), (6, 3)] {
            let wf = wf_numerov(n as f64, l, n as f64, 0.001, 0.005).unwrap();
            let expected = (3.0 * (n * n) as f64 - (l * (l + 1)) as f64) / 2.0;
            assert!(rel_err(wf.expectation(1.0), expected) < 1e-3);
        }
    }

    #[test]
    fn rmin_outside_grid() {
        let wf = wf_numerov(5.0, 2, 5.0, 1e6, 0.01).unwrap();
        assert_eq!(wf.len(), 2);
        assert!((wf.norm() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn bad_parameters() {
        assert!(wf_numerov(5.0, 2, 5.0, 0.0, 0.01).is_err());
        assert!(wf_numerov(5.0, 2, 5.0, 0.65, 0.0).is_err());
    }

    #[test]
    fn grids_align_across_n() {
        let wf1 = wf_numerov(7.3, 2, 10.0, 0.5, 0.01).unwrap();
        let wf2 = wf_numerov(10.0, 3, 10.0, 0.5, 0.01).unwrap();
        assert!(wf1.r[0] < wf2.r[0]);
        assert!(find_first(&wf2.r, wf1.r[0]).is_ok());
        let al = wf_align(&wf1, &wf2).unwrap();
        assert_eq!(al.r1, al.r2);
        assert_eq!(al.r1.len(), al.y2.len());
        assert_eq!(al.r1[0], wf1.r[0]);
    }

    #[test]
    fn mismatched_grids_fail() {
        let wf1 = wf_numerov(10.0, 3, 10.0, 0.5, 0.01).unwrap();
        let wf2 = wf_numerov(10.0, 3, 10.0, 0.5, 0.013).unwrap();
        assert!(wf_align(&wf1, &wf2).is_err());
        assert!(wf_overlap(&wf1, &wf2, 1.0).is_err());
    }

    #[test]
    fn lookup_miss() {
        let arr = nd::array![3.0, 2.0, 1.0, 2.0];
        assert_eq!(find_first(&arr, 2.0).unwrap(), 1);
        assert_eq!(find_last(&arr, 2.0).unwrap(), 3);
        assert!(find_first(&arr, 5.0).is_err());
        assert!(find_last(&arr, 0.5).is_err());
        // the head is never a tail match
        assert_eq!(find_first(&arr, 3.0).unwrap(), 0);
        assert!(find_last(&arr, 3.0).is_err());
    }

    #[test]
    fn one_point_tail_fails_to_align() {
        let wf1 = RadialWf::new(
            nd::array![4.0, 3.0, 2.0], nd::array![0.1, 0.2, 0.3]).unwrap();
        let wf2 = RadialWf::new(nd::array![3.0], nd::array![0.2]).unwrap();
        assert!(matches!(wf_align(&wf1, &wf2), Err(AlignError::NotFound(_))));
    }

    #[test]
    fn wavefunction_from_arrays() {
        let wf = RadialWf::new(nd::array![2.0, 1.0], nd::array![0.25, 0.5])
            .unwrap();
        assert_eq!(wf.len(), 2);
        assert!((wf.norm() - 0.5).abs() < 1e-15);
        assert!(RadialWf::new(nd::array![2.0, 1.0], nd::array![0.5]).is_err());
    }

    #[test]
    fn hydrogen_dipole_overlaps() {
        // |⟨1s| r |2p⟩| = 24 / (√6 1.5⁵), |⟨2s| r |2p⟩| = 3√3
        let params = StepParams::Flat { step: 0.005 };
        let d12 = rad_overlap(1.0, 2.0, 0, 1, 0.001, &params, 1.0).unwrap();
        assert!(rel_err(d12.abs(), 24.0 / 6.0_f64.sqrt() / 1.5_f64.powi(5)) < 1e-3);
        let d22 = rad_overlap(2.0, 2.0, 0, 1, 0.001, &params, 1.0).unwrap();
        assert!(rel_err(d22.abs(), 3.0 * 3.0_f64.sqrt()) < 1e-3);
        // symmetric in its arguments
        let d21 = rad_overlap(2.0, 1.0, 1, 0, 0.001, &params, 1.0).unwrap();
        assert!((d21 - d12).abs() < 1e-12);
    }

    #[test]
    fn nan_state_gives_nan_overlap() {
        let params = StepParams::default();
        let ovlp = rad_overlap(f64::NAN, 20.0, 0, 1, 0.65, &params, 1.0).unwrap();
        assert!(ovlp.is_nan());
    }

    #[test]
    fn serde_tags() {
        let params: StepParams
            = toml::from_str("kind = \"flat\"\nstep = 0.01").unwrap();
        assert_eq!(params, StepParams::Flat { step: 0.01 });
        let params: StepParams = toml::from_str(
            "kind = \"sigmoid\"\nlow = 0.004\nhigh = 0.008\nwidth = 10.0\n\
            mid = 0.5\nround = 4"
        ).unwrap();
        assert!(params.is_sigmoid());
    }
}
