//! Diagonalization of the total Hamiltonian over a sweep of field values.
//!
//! At each field value `F`, the Hamiltonian
//! ```text
//! H = H_0 + H_Z + F M_S + H_D
//! ```
//! is diagonalized as a real symmetric matrix, where `H_0` is the field-free
//! Hamiltonian, `H_Z` and `H_D` are optional (field-independent) Zeeman and
//! diamagnetic terms, and `M_S` is the [Stark matrix][crate::interaction].
//! Eigenvalues are returned in ascending order at each field value; no attempt
//! is made to follow states continuously across the sweep.

use ndarray::{ self as nd, Axis };
use ndarray_linalg::{ self as la, EighInto, EigValshInto };
use rayon::iter::{ IntoParallelIterator, ParallelIterator };
use crate::{
    Arr1,
    Arr2,
    config::SweepConfig,
    error::{ ShapeError, StarkError },
    numerov::StarkResult,
    progress::Progress,
};

/// Output of a field sweep.
#[derive(Clone, Debug, PartialEq)]
pub struct StarkMap {
    /// Field values, atomic units.
    pub field: nd::Array1<f64>,
    /// Eigenvalues in ascending order, with shape `(fields, states)`.
    pub eig_val: nd::Array2<f64>,
    /// Eigenvectors, with shape `(fields, states, states)`; the eigenvector
    /// for `eig_val[[f, k]]` is `eig_vec.slice(s![f, .., k])`.
    pub eig_vec: Option<nd::Array3<f64>>,
}

impl StarkMap {
    /// Number of field values.
    pub fn num_fields(&self) -> usize { self.eig_val.nrows() }

    /// Number of basis states.
    pub fn num_states(&self) -> usize { self.eig_val.ncols() }
}

// H_0 + H_Z + F M_S + H_D, summed in that order
struct Hamiltonian<'a, S>
where S: nd::Data<Elem = f64>
{
    base: nd::Array2<f64>,
    mat_s: &'a Arr2<S>,
    h_d: Option<nd::ArrayView2<'a, f64>>,
}

impl<'a, S> Hamiltonian<'a, S>
where S: nd::Data<Elem = f64>
{
    fn new<T>(
        h0: &Arr2<T>,
        mat_s: &'a Arr2<S>,
        h_z: Option<nd::ArrayView2<'a, f64>>,
        h_d: Option<nd::ArrayView2<'a, f64>>,
    ) -> Result<Self, ShapeError>
    where T: nd::Data<Elem = f64>
    {
        let n = h0.nrows();
        ShapeError::check(h0, n)?;
        ShapeError::check(mat_s, n)?;
        h_z.as_ref().map(|h| ShapeError::check(h, n)).transpose()?;
        h_d.as_ref().map(|h| ShapeError::check(h, n)).transpose()?;
        let base
            = match h_z {
                Some(h) => h0 + &h,
                None => h0.to_owned(),
            };
        Ok(Self { base, mat_s, h_d })
    }

    fn size(&self) -> usize { self.base.nrows() }

    fn at(&self, F: f64) -> nd::Array2<f64> {
        let mut H = &self.base + &(self.mat_s * F);
        if let Some(h_d) = &self.h_d { H += h_d; }
        H
    }
}

// evaluate `f` on every field value in order, ticking `progress` after each
fn sweep<F, R>(
    field: &nd::Array1<f64>,
    parallel: bool,
    progress: &dyn Progress,
    f: F,
) -> StarkResult<Vec<R>>
where
    F: Fn(f64) -> StarkResult<R> + Sync,
    R: Send,
{
    let each = |field_val: f64| -> StarkResult<R> {
        let res = f(field_val)?;
        progress.tick();
        Ok(res)
    };
    progress.start("diagonalise Hamiltonian", field.len());
    let res: Vec<R>
        = if parallel {
            field.to_vec().into_par_iter().map(each).collect::<StarkResult<_>>()?
        } else {
            field.iter().copied().map(each).collect::<StarkResult<_>>()?
        };
    progress.finish();
    Ok(res)
}

/// Compute the eigenvalues of `H_0 + H_Z + F M_S + H_D` for every field value
/// `F` in `field`.
///
/// `h_z` and `h_d` default to zero. All matrices must be square with the same
/// size as `h0`.
pub fn stark_map<'a, S, T, U>(
    h0: &Arr2<S>,
    mat_s: &'a Arr2<T>,
    field: &Arr1<U>,
    h_z: Option<nd::ArrayView2<'a, f64>>,
    h_d: Option<nd::ArrayView2<'a, f64>>,
    config: &SweepConfig,
) -> StarkResult<StarkMap>
where
    S: nd::Data<Elem = f64>,
    T: nd::Data<Elem = f64> + Sync,
    U: nd::Data<Elem = f64>,
{
    stark_map_with(h0, mat_s, field, h_z, h_d, config, config.progress().as_ref())
}

/// Like [`stark_map`], but reporting to `progress` instead of the observer
/// selected by `config`.
pub fn stark_map_with<'a, S, T, U>(
    h0: &Arr2<S>,
    mat_s: &'a Arr2<T>,
    field: &Arr1<U>,
    h_z: Option<nd::ArrayView2<'a, f64>>,
    h_d: Option<nd::ArrayView2<'a, f64>>,
    config: &SweepConfig,
    progress: &dyn Progress,
) -> StarkResult<StarkMap>
where
    S: nd::Data<Elem = f64>,
    T: nd::Data<Elem = f64> + Sync,
    U: nd::Data<Elem = f64>,
{
    let H = Hamiltonian::new(h0, mat_s, h_z, h_d)?;
    let n = H.size();
    let field = field.to_owned();
    log::info!("computing eigenvalues for {} fields x {n} states", field.len());
    let vals: Vec<nd::Array1<f64>>
        = sweep(
            &field,
            config.parallel,
            progress,
            |F| Ok(H.at(F).eigvalsh_into(la::UPLO::Lower)?),
        )?;
    let mut eig_val: nd::Array2<f64> = nd::Array2::zeros((field.len(), n));
    eig_val.outer_iter_mut().zip(&vals)
        .for_each(|(mut row, w)| { row.assign(w); });
    Ok(StarkMap { field, eig_val, eig_vec: None })
}

/// Compute the eigenvalues and eigenvectors of `H_0 + H_Z + F M_S + H_D` for
/// every field value `F` in `field`.
///
/// Storing all eigenvectors takes `fields × states²` elements. A warning is
/// logged above [`SweepConfig::warn_eigvec_elems`], and
/// [`StarkError::SweepTooLarge`] is returned above
/// [`SweepConfig::max_eigvec_elems`] before any work is done.
pub fn stark_map_vec<'a, S, T, U>(
    h0: &Arr2<S>,
    mat_s: &'a Arr2<T>,
    field: &Arr1<U>,
    h_z: Option<nd::ArrayView2<'a, f64>>,
    h_d: Option<nd::ArrayView2<'a, f64>>,
    config: &SweepConfig,
) -> StarkResult<StarkMap>
where
    S: nd::Data<Elem = f64>,
    T: nd::Data<Elem = f64> + Sync,
    U: nd::Data<Elem = f64>,
{
    stark_map_vec_with(
        h0, mat_s, field, h_z, h_d, config, config.progress().as_ref())
}

/// Like [`stark_map_vec`], but reporting to `progress` instead of the observer
/// selected by `config`.
pub fn stark_map_vec_with<'a, S, T, U>(
    h0: &Arr2<S>,
    mat_s: &'a Arr2<T>,
    field: &Arr1<U>,
    h_z: Option<nd::ArrayView2<'a, f64>>,
    h_d: Option<nd::ArrayView2<'a, f64>>,
    config: &SweepConfig,
    progress: &dyn Progress,
) -> StarkResult<StarkMap>
where
    S: nd::Data<Elem = f64>,
    T: nd::Data<Elem = f64> + Sync,
    U: nd::Data<Elem = f64>,
{
    let H = Hamiltonian::new(h0, mat_s, h_z, h_d)?;
    let n = H.size();
    let field = field.to_owned();
    let elems
        = n.checked_mul(n)
        .and_then(|nn| nn.checked_mul(field.len()))
        .unwrap_or(usize::MAX);
    if elems > config.max_eigvec_elems {
        return Err(StarkError::SweepTooLarge {
            elems, limit: config.max_eigvec_elems });
    }
    if elems > config.warn_eigvec_elems {
        log::warn!(
            "eigenvector sweep will store {elems} elements ({:.1} GiB)",
            elems as f64 * std::mem::size_of::<f64>() as f64 / 2.0_f64.powi(30),
        );
    }
    log::info!(
        "computing eigenvalues and eigenvectors for {} fields x {n} states",
        field.len(),
    );
    let pairs: Vec<(nd::Array1<f64>, nd::Array2<f64>)>
        = sweep(
            &field,
            config.parallel,
            progress,
            |F| Ok(H.at(F).eigh_into(la::UPLO::Lower)?),
        )?;
    let mut eig_val: nd::Array2<f64> = nd::Array2::zeros((field.len(), n));
    let mut eig_vec: nd::Array3<f64> = nd::Array3::zeros((field.len(), n, n));
    eig_val.outer_iter_mut().zip(eig_vec.outer_iter_mut()).zip(&pairs)
        .for_each(|((mut w_row, mut v_row), (w, v))| {
            w_row.assign(w);
            v_row.assign(v);
        });
    Ok(StarkMap { field, eig_val, eig_vec: Some(eig_vec) })
}

/// Sort a set of eigenvalues `w` in ascending order, permuting the columns of
/// the eigenvector matrix `v` to match.
///
/// Equal eigenvalues keep their relative order.
pub fn eig_sort<S, T>(w: &Arr1<S>, v: &Arr2<T>)
    -> Result<(nd::Array1<f64>, nd::Array2<f64>), ShapeError>
where
    S: nd::Data<Elem = f64>,
    T: nd::Data<Elem = f64>,
{
    ShapeError::check(v, w.len())?;
    let mut ids: Vec<usize> = (0..w.len()).collect();
    ids.sort_by(|&a, &b| w[a].total_cmp(&w[b]));
    Ok((w.select(Axis(0), &ids), v.select(Axis(1), &ids)))
}
