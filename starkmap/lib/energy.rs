//! Field-free energies and the linear Zeeman shift, in atomic units.

use ndarray as nd;
use crate::{
    Arr1,
    basis::{ Basis, StateNLJ },
    defects::QuantumDefects,
    units::{ alpha, Atom },
};

/// Field-free energy `-1 / (2 n*²)` for each effective principal quantum
/// number, ignoring all correction terms.
pub fn en_0<S>(neff: &Arr1<S>) -> nd::Array1<f64>
where S: nd::Data<Elem = f64>
{
    neff.mapv(|n| -0.5 * n.powi(-2))
}

/// Field-free energy of a single state with principal quantum number `n` and
/// effective principal quantum number `neff`, including fine-structure and
/// finite nuclear mass correction terms.
pub fn w_single(atom: &Atom, n: u32, neff: f64) -> f64 {
    let n = n as f64;
    -0.5 * (
        neff.powi(-2)
        - 3.0 * alpha.powi(2) / (4.0 * n.powi(4))
        + atom.mu_M.powi(2)
            * ((1.0 + (5.0 / 6.0) * (alpha * atom.z).powi(2)) / n.powi(2))
    )
}

/// Field-free energy for each state in a basis, including fine-structure and
/// finite nuclear mass correction terms.
///
/// States with an undefined quantum defect get `NaN`.
pub fn w_n(atom: &Atom, S: u32, basis: &Basis<StateNLJ>, qd: &QuantumDefects)
    -> nd::Array1<f64>
{
    let neff = basis.neff(S, qd);
    basis.iter().zip(&neff)
        .map(|(s, ne)| w_single(atom, s.n, *ne))
        .collect()
}

/// Energy shift from the interaction of the orbital angular momentum of the
/// Rydberg electron with a magnetic field `B_z` along the quantization axis.
pub fn e_zeeman<S>(m_vals: &Arr1<S>, B_z: f64) -> nd::Array1<f64>
where S: nd::Data<Elem = i32>
{
    m_vals.mapv(|m| m as f64 * B_z * 0.5)
}

/// Build a diagonal Hamiltonian from a set of energies.
pub fn h0_matrix<S>(energies: &Arr1<S>) -> nd::Array2<f64>
where S: nd::Data<Elem = f64>
{
    nd::Array2::from_diag(energies)
}
