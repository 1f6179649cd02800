//! Stark and diamagnetic interaction matrices over a basis of Rydberg states.
//!
//! Each matrix element is a product of an [angular][crate::angular] factor
//! and a [radial overlap][rad_overlap] computed from a pair of Numerov
//! wavefunctions. All matrices are real symmetric: only the upper triangle is
//! computed, and each element is mirrored into the lower triangle.
//!
//! Rows are independent, and are computed in parallel when
//! [`MatrixConfig::parallel`] is set. Results do not depend on this setting.
//!
//! States with a `NaN` effective principal quantum number produce `NaN`
//! elements wherever the selection rules allow a coupling, and are otherwise
//! treated like any other state.

use ndarray as nd;
use rayon::iter::{ IntoParallelIterator, ParallelIterator };
use crate::{
    Arr1,
    angular::{ ang_overlap_diamagnetic, ang_overlap_stark },
    config::MatrixConfig,
    error::LengthError,
    numerov::{ rad_overlap, StarkResult },
    progress::Progress,
};

/// Stark interaction `⟨n₁, l₁, m₁| r cos θ |n₂, l₂, m₂⟩` (or the crossed-field
/// analogue) between two states, in atomic units.
///
/// Non-zero only for `|Δl| = 1` and `|Δm| ≤ 1`, subject to the orientation and
/// allowed `Δm` in `config`.
///
/// The radial integral is skipped when the angular factor is zero and both
/// effective quantum numbers are finite. Such pairs therefore never return an
/// alignment error, even if their wavefunctions would fail to align.
pub fn stark_int(
    n_eff_1: f64,
    n_eff_2: f64,
    l_1: u32,
    l_2: u32,
    m_1: i32,
    m_2: i32,
    config: &MatrixConfig,
) -> StarkResult<f64>
{
    if l_1.abs_diff(l_2) != 1 || m_1.abs_diff(m_2) > 1 { return Ok(0.0); }
    let ang = ang_overlap_stark(
        l_1, l_2, m_1, m_2, config.field_orientation, &config.dm_allow);
    // a finite radial part can't change a zero
    if ang == 0.0 && n_eff_1.is_finite() && n_eff_2.is_finite() {
        return Ok(0.0);
    }
    let rad = rad_overlap(
        n_eff_1, n_eff_2, l_1, l_2, config.rmin, &config.step_params, 1.0)?;
    Ok(ang * rad)
}

/// Diamagnetic interaction `⟨n₁, l₁, m₁| r² sin² θ |n₂, l₂, m₂⟩` between two
/// states, in atomic units.
///
/// Non-zero only for `Δl ∊ {0, ±2}` and `Δm = 0`.
pub fn diamagnetic_int(
    n_eff_1: f64,
    n_eff_2: f64,
    l_1: u32,
    l_2: u32,
    m_1: i32,
    m_2: i32,
    config: &MatrixConfig,
) -> StarkResult<f64>
{
    let dl = l_1.abs_diff(l_2);
    if !(dl == 0 || dl == 2) || m_1 != m_2 { return Ok(0.0); }
    let ang = ang_overlap_diamagnetic(l_1, l_2, m_1, m_2);
    let rad = rad_overlap(
        n_eff_1, n_eff_2, l_1, l_2, config.rmin, &config.step_params, 2.0)?;
    Ok(ang * rad)
}

// fill a symmetric matrix from its upper triangle, one row per work unit
fn build_symmetric<F>(
    n: usize,
    with_diag: bool,
    desc: &str,
    parallel: bool,
    progress: &dyn Progress,
    elem: F,
) -> StarkResult<nd::Array2<f64>>
where F: Fn(usize, usize) -> StarkResult<f64> + Sync
{
    let first = |i: usize| if with_diag { i } else { i + 1 };
    let row = |i: usize| -> StarkResult<Vec<f64>> {
        let vals: Vec<f64>
            = (first(i)..n)
            .map(|j| elem(i, j))
            .collect::<StarkResult<_>>()?;
        progress.tick();
        Ok(vals)
    };

    log::info!("{desc}: {n} x {n} matrix");
    progress.start(desc, n);
    let rows: Vec<Vec<f64>>
        = if parallel {
            (0..n).into_par_iter().map(row).collect::<StarkResult<_>>()?
        } else {
            (0..n).map(row).collect::<StarkResult<_>>()?
        };
    progress.finish();

    let mut mat: nd::Array2<f64> = nd::Array2::zeros((n, n));
    for (i, vals) in rows.into_iter().enumerate() {
        for (j, v) in (first(i)..n).zip(vals) {
            mat[[i, j]] = v;
            mat[[j, i]] = v;
        }
    }
    Ok(mat)
}

/// Stark interaction matrix for a basis of states with effective principal
/// quantum numbers `neff`, orbital angular momenta `l_vals`, and magnetic
/// quantum numbers `m_vals`.
///
/// The diagonal is zero.
pub fn stark_matrix<S, T, U>(
    neff: &Arr1<S>,
    l_vals: &Arr1<T>,
    m_vals: &Arr1<U>,
    config: &MatrixConfig,
) -> StarkResult<nd::Array2<f64>>
where
    S: nd::Data<Elem = f64> + Sync,
    T: nd::Data<Elem = u32> + Sync,
    U: nd::Data<Elem = i32> + Sync,
{
    stark_matrix_with(neff, l_vals, m_vals, config, config.progress().as_ref())
}

/// Like [`stark_matrix`], but reporting to `progress` instead of the observer
/// selected by `config`.
pub fn stark_matrix_with<S, T, U>(
    neff: &Arr1<S>,
    l_vals: &Arr1<T>,
    m_vals: &Arr1<U>,
    config: &MatrixConfig,
    progress: &dyn Progress,
) -> StarkResult<nd::Array2<f64>>
where
    S: nd::Data<Elem = f64> + Sync,
    T: nd::Data<Elem = u32> + Sync,
    U: nd::Data<Elem = i32> + Sync,
{
    LengthError::check(neff, l_vals)?;
    LengthError::check(neff, m_vals)?;
    build_symmetric(
        neff.len(),
        false,
        "Stark terms",
        config.parallel,
        progress,
        |i, j| stark_int(
            neff[i], neff[j], l_vals[i], l_vals[j], m_vals[i], m_vals[j], config),
    )
}

/// Stark interaction matrix for a basis of states sharing a single magnetic
/// quantum number `m`.
pub fn stark_matrix_select_m<S, T>(
    neff: &Arr1<S>,
    l_vals: &Arr1<T>,
    m: i32,
    config: &MatrixConfig,
) -> StarkResult<nd::Array2<f64>>
where
    S: nd::Data<Elem = f64> + Sync,
    T: nd::Data<Elem = u32> + Sync,
{
    stark_matrix_select_m_with(neff, l_vals, m, config, config.progress().as_ref())
}

/// Like [`stark_matrix_select_m`], but reporting to `progress` instead of the
/// observer selected by `config`.
pub fn stark_matrix_select_m_with<S, T>(
    neff: &Arr1<S>,
    l_vals: &Arr1<T>,
    m: i32,
    config: &MatrixConfig,
    progress: &dyn Progress,
) -> StarkResult<nd::Array2<f64>>
where
    S: nd::Data<Elem = f64> + Sync,
    T: nd::Data<Elem = u32> + Sync,
{
    LengthError::check(neff, l_vals)?;
    build_symmetric(
        neff.len(),
        false,
        "Stark terms",
        config.parallel,
        progress,
        |i, j| stark_int(neff[i], neff[j], l_vals[i], l_vals[j], m, m, config),
    )
}

/// Diamagnetic interaction matrix for a basis of states with effective
/// principal quantum numbers `neff`, orbital angular momenta `l_vals`, and
/// magnetic quantum numbers `m_vals`.
///
/// Multiply by `B² / 8` to get the diamagnetic Hamiltonian for a magnetic
/// field `B` (atomic units) along the quantization axis.
pub fn diamagnetic_matrix<S, T, U>(
    neff: &Arr1<S>,
    l_vals: &Arr1<T>,
    m_vals: &Arr1<U>,
    config: &MatrixConfig,
) -> StarkResult<nd::Array2<f64>>
where
    S: nd::Data<Elem = f64> + Sync,
    T: nd::Data<Elem = u32> + Sync,
    U: nd::Data<Elem = i32> + Sync,
{
    diamagnetic_matrix_with(
        neff, l_vals, m_vals, config, config.progress().as_ref())
}

/// Like [`diamagnetic_matrix`], but reporting to `progress` instead of the
/// observer selected by `config`.
pub fn diamagnetic_matrix_with<S, T, U>(
    neff: &Arr1<S>,
    l_vals: &Arr1<T>,
    m_vals: &Arr1<U>,
    config: &MatrixConfig,
    progress: &dyn Progress,
) -> StarkResult<nd::Array2<f64>>
where
    S: nd::Data<Elem = f64> + Sync,
    T: nd::Data<Elem = u32> + Sync,
    U: nd::Data<Elem = i32> + Sync,
{
    LengthError::check(neff, l_vals)?;
    LengthError::check(neff, m_vals)?;
    build_symmetric(
        neff.len(),
        true,
        "diamagnetic terms",
        config.parallel,
        progress,
        |i, j| diamagnetic_int(
            neff[i], neff[j], l_vals[i], l_vals[j], m_vals[i], m_vals[j], config),
    )
}

/// Diamagnetic interaction matrix for a basis of states sharing a single
/// magnetic quantum number `m`.
pub fn diamagnetic_matrix_select_m<S, T>(
    neff: &Arr1<S>,
    l_vals: &Arr1<T>,
    m: i32,
    config: &MatrixConfig,
) -> StarkResult<nd::Array2<f64>>
where
    S: nd::Data<Elem = f64> + Sync,
    T: nd::Data<Elem = u32> + Sync,
{
    diamagnetic_matrix_select_m_with(
        neff, l_vals, m, config, config.progress().as_ref())
}

/// Like [`diamagnetic_matrix_select_m`], but reporting to `progress` instead
/// of the observer selected by `config`.
pub fn diamagnetic_matrix_select_m_with<S, T>(
    neff: &Arr1<S>,
    l_vals: &Arr1<T>,
    m: i32,
    config: &MatrixConfig,
    progress: &dyn Progress,
) -> StarkResult<nd::Array2<f64>>
where
    S: nd::Data<Elem = f64> + Sync,
    T: nd::Data<Elem = u32> + Sync,
{
    LengthError::check(neff, l_vals)?;
    build_symmetric(
        neff.len(),
        true,
        "diamagnetic terms",
        config.parallel,
        progress,
        |i, j| diamagnetic_int(neff[i], neff[j], l_vals[i], l_vals[j], m, m, config),
    )
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{ AtomicUsize, Ordering };
    use super::*;
    use crate::{
        angular::FieldOrientation,
        basis::{ get_nl_vals, get_nlm_vals },
        error::StarkError,
        numerov::StepParams,
        progress::Callback,
    };

    fn hydrogen_config() -> MatrixConfig {
        MatrixConfig {
            step_params: StepParams::Flat { step: 0.01 },
            rmin: 0.01,
            show_progress: false,
            ..MatrixConfig::default()
        }
    }

    fn is_symmetric(m: &nd::Array2<f64>) -> bool {
        m.indexed_iter().all(|((i, j), v)| *v == m[[j, i]])
    }

    #[test]
    fn stark_int_gates() {
        let config = hydrogen_config();
        assert_eq!(stark_int(2.0, 2.0, 0, 0, 0, 0, &config).unwrap(), 0.0);
        assert_eq!(stark_int(2.0, 3.0, 0, 2, 0, 0, &config).unwrap(), 0.0);
        assert_eq!(stark_int(2.0, 2.0, 0, 1, 0, 2, &config).unwrap(), 0.0);
        // Δm = 1 is gated out by dm_allow = [0]
        assert_eq!(stark_int(2.0, 2.0, 0, 1, 0, 1, &config).unwrap(), 0.0);
        assert!(stark_int(2.0, 2.0, 0, 1, 0, 0, &config).unwrap() != 0.0);
    }

    #[test]
    fn diamagnetic_int_gates() {
        let config = hydrogen_config();
        assert_eq!(diamagnetic_int(2.0, 2.0, 0, 1, 0, 0, &config).unwrap(), 0.0);
        assert_eq!(diamagnetic_int(3.0, 3.0, 0, 2, 0, 1, &config).unwrap(), 0.0);
        // ⟨1s| r² sin²θ |1s⟩ = 3 * 2 / 3
        let d = diamagnetic_int(1.0, 1.0, 0, 0, 0, 0, &config).unwrap();
        assert!((d - 2.0).abs() < 2e-2);
    }

    #[test]
    fn hydrogen_stark_matrix() {
        let config = hydrogen_config();
        let basis = get_nl_vals(1, 2, 0).unwrap();
        assert_eq!(basis.len(), 3);
        let neff = basis.n_vals().mapv(f64::from);
        let l_vals = basis.l_vals();
        let m_vals = basis.m_vals();
        let mat = stark_matrix(&neff, &l_vals, &m_vals, &config).unwrap();

        assert!(is_symmetric(&mat));
        assert!(mat.diag().iter().all(|v| *v == 0.0));
        // 1s and 2s don't couple
        assert_eq!(mat[[0, 1]], 0.0);
        // ⟨1s| z |2p₀⟩ = 128 √2 / 243
        let m02 = mat[[0, 2]].abs();
        assert!((m02 - 128.0 * 2.0_f64.sqrt() / 243.0).abs() < 1e-2);
        // ⟨2s| z |2p₀⟩ = 3
        let m12 = mat[[1, 2]].abs();
        assert!((m12 - 3.0).abs() < 1e-2);
        assert!(m12 > m02);

        let mat_m = stark_matrix_select_m(&neff, &l_vals, 0, &config).unwrap();
        assert_eq!(mat, mat_m);
    }

    #[test]
    fn hydrogen_diamagnetic_matrix() {
        let config = hydrogen_config();
        let basis = get_nl_vals(1, 2, 0).unwrap();
        let neff = basis.n_vals().mapv(f64::from);
        let l_vals = basis.l_vals();
        let mat = diamagnetic_matrix_select_m(&neff, &l_vals, 0, &config)
            .unwrap();

        assert!(is_symmetric(&mat));
        // (2 / 3) ⟨r²⟩ for 1s and 2s; (2 / 5) ⟨r²⟩ for 2p₀
        for (k, expected) in [2.0, 28.0, 12.0].into_iter().enumerate() {
            assert!(((mat[[k, k]] - expected) / expected).abs() < 1e-2);
        }
        assert!(mat[[0, 1]] != 0.0);
        assert_eq!(mat[[0, 2]], 0.0);
        assert_eq!(mat[[1, 2]], 0.0);
    }

    #[test]
    fn parallel_matches_sequential() {
        let par = hydrogen_config();
        let seq = MatrixConfig { parallel: false, ..hydrogen_config() };
        let basis = get_nlm_vals(1, 3).unwrap();
        let neff = basis.n_vals().mapv(f64::from);
        let l_vals = basis.l_vals();
        let m_vals = basis.m_vals();
        assert_eq!(
            stark_matrix(&neff, &l_vals, &m_vals, &par).unwrap(),
            stark_matrix(&neff, &l_vals, &m_vals, &seq).unwrap(),
        );
        assert_eq!(
            diamagnetic_matrix(&neff, &l_vals, &m_vals, &par).unwrap(),
            diamagnetic_matrix(&neff, &l_vals, &m_vals, &seq).unwrap(),
        );
    }

    #[test]
    fn crossed_field_couples_dm() {
        let config = MatrixConfig {
            field_orientation: FieldOrientation::Crossed,
            ..hydrogen_config()
        };
        let basis = get_nlm_vals(2, 2).unwrap();
        let neff = basis.n_vals().mapv(f64::from);
        let l_vals = basis.l_vals();
        let m_vals = basis.m_vals();
        let mat = stark_matrix(&neff, &l_vals, &m_vals, &config).unwrap();
        assert!(is_symmetric(&mat));
        for ((i, j), v) in mat.indexed_iter() {
            if m_vals[i] == m_vals[j] { assert_eq!(*v, 0.0); }
        }
        assert!(mat.iter().any(|v| *v != 0.0));
    }

    #[test]
    fn nan_state_corrupts_only_couplings() {
        let config = hydrogen_config();
        let neff = nd::array![f64::NAN, 2.0, 2.0];
        let l_vals = nd::array![0_u32, 0, 1];
        let mat = stark_matrix_select_m(&neff, &l_vals, 0, &config).unwrap();
        assert!(mat[[0, 2]].is_nan());
        assert!(mat[[2, 0]].is_nan());
        assert_eq!(mat[[0, 1]], 0.0);
        assert!(mat[[1, 2]].is_finite());
    }

    #[test]
    fn progress_ticks_once_per_row() {
        let config = hydrogen_config();
        let ticks = AtomicUsize::new(0);
        let progress = Callback::new(|_, total| {
            assert_eq!(total, 3);
            ticks.fetch_add(1, Ordering::Relaxed);
        });
        let neff = nd::array![1.0, 2.0, 2.0];
        let l_vals = nd::array![0_u32, 0, 1];
        stark_matrix_select_m_with(&neff, &l_vals, 0, &config, &progress)
            .unwrap();
        assert_eq!(ticks.load(Ordering::Relaxed), 3);
    }

    #[test]
    fn length_mismatch() {
        let config = hydrogen_config();
        let neff = nd::array![1.0, 2.0];
        let l_vals = nd::array![0_u32, 0, 1];
        let m_vals = nd::array![0_i32, 0, 0];
        assert!(matches!(
            stark_matrix(&neff, &l_vals, &m_vals, &config),
            Err(StarkError::Length(_)),
        ));
    }

    #[test]
    fn builders_accept_views() {
        let config = hydrogen_config();
        let basis = get_nl_vals(1, 2, 0).unwrap();
        let neff = basis.n_vals().mapv(f64::from);
        let l_vals = basis.l_vals();
        let m_vals = basis.m_vals();
        let owned = stark_matrix(&neff, &l_vals, &m_vals, &config).unwrap();
        let viewed
            = stark_matrix(&neff.view(), &l_vals.view(), &m_vals.view(), &config)
            .unwrap();
        assert_eq!(owned, viewed);
        let viewed_m
            = diamagnetic_matrix_select_m(&neff.view(), &l_vals.view(), 0, &config)
            .unwrap();
        assert_eq!(
            viewed_m,
            diamagnetic_matrix_select_m(&neff, &l_vals, 0, &config).unwrap(),
        );
    }

    #[test]
    fn zero_angular_factor_skips_radial() {
        // rmin = 0 makes every radial integral fail
        let config = MatrixConfig { rmin: 0.0, ..hydrogen_config() };
        assert_eq!(stark_int(2.0, 2.0, 0, 1, 0, 1, &config).unwrap(), 0.0);
        assert!(stark_int(2.0, 2.0, 0, 1, 0, 0, &config).is_err());
    }
}
