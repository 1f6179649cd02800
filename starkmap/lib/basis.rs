//! Definitions to describe basis states and enumerate bases over a range of
//! principal quantum numbers.
//!
//! The order of states in a [`Basis`] is the row/column order of every matrix
//! built from it.

use std::ops::Deref;
use ndarray as nd;
use crate::{
    defects::QuantumDefects,
    error::ConfigError,
};

/// Common interface for basis states carrying principal and orbital angular
/// momentum quantum numbers.
pub trait RydbergState: Copy + Clone + PartialEq + Eq + std::fmt::Debug {
    /// Principal quantum number.
    fn n(&self) -> u32;

    /// Orbital angular momentum.
    fn l(&self) -> u32;
}

/// State `|n, l, m⟩`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct StateNLM {
    pub n: u32,
    pub l: u32,
    pub m: i32,
}

impl RydbergState for StateNLM {
    fn n(&self) -> u32 { self.n }

    fn l(&self) -> u32 { self.l }
}

/// State `|n, L, J⟩` in a fine-structure basis.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct StateNLJ {
    pub n: u32,
    pub l: u32,
    pub j: u32,
}

impl RydbergState for StateNLJ {
    fn n(&self) -> u32 { self.n }

    fn l(&self) -> u32 { self.l }
}

/// An ordered collection of basis states.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Basis<S>
where S: RydbergState
{
    states: Vec<S>,
}

impl<S> Deref for Basis<S>
where S: RydbergState
{
    type Target = [S];

    fn deref(&self) -> &Self::Target { &self.states }
}

impl<S> FromIterator<S> for Basis<S>
where S: RydbergState
{
    fn from_iter<I>(iter: I) -> Self
    where I: IntoIterator<Item = S>
    {
        Self { states: iter.into_iter().collect() }
    }
}

impl<S> IntoIterator for Basis<S>
where S: RydbergState
{
    type Item = S;
    type IntoIter = std::vec::IntoIter<S>;

    fn into_iter(self) -> Self::IntoIter { self.states.into_iter() }
}

impl<S> Basis<S>
where S: RydbergState
{
    /// Get a reference to the underlying states.
    pub fn states(&self) -> &[S] { &self.states }

    /// Principal quantum numbers, in basis order.
    pub fn n_vals(&self) -> nd::Array1<u32> {
        self.states.iter().map(|s| s.n()).collect()
    }

    /// Orbital angular momenta, in basis order.
    pub fn l_vals(&self) -> nd::Array1<u32> {
        self.states.iter().map(|s| s.l()).collect()
    }

    /// Return the index of a state in the basis, if it exists.
    pub fn index_of(&self, state: &S) -> Option<usize> {
        self.states.iter().position(|s| s == state)
    }
}

impl Basis<StateNLM> {
    /// Magnetic quantum numbers, in basis order.
    pub fn m_vals(&self) -> nd::Array1<i32> {
        self.states.iter().map(|s| s.m).collect()
    }

    /// Convert to a fine-structure basis with `J = L + diff` (see
    /// [`get_j_vals`]), keeping the order of states.
    pub fn to_nlj(&self, S: u32, diff: i32) -> Basis<StateNLJ> {
        self.states.iter()
            .map(|s| StateNLJ { n: s.n, l: s.l, j: j_val(S, s.l, diff) })
            .collect()
    }
}

impl Basis<StateNLJ> {
    /// Total angular momenta, in basis order.
    pub fn j_vals(&self) -> nd::Array1<u32> {
        self.states.iter().map(|s| s.j).collect()
    }

    /// Effective principal quantum numbers `n - δ`, in basis order.
    ///
    /// States with an undefined quantum defect get `NaN`.
    pub fn neff(&self, S: u32, qd: &QuantumDefects) -> nd::Array1<f64> {
        let defects = qd.get_qd(S, &self.states);
        defects.iter().zip(&self.states)
            .map(|(d, s)| s.n as f64 - d)
            .collect()
    }
}

/// Enumerate `|n, l⟩` states for fixed `m`, for `n` in `nmin..=nmax` and `l` in
/// `|m|..n`.
pub fn get_nl_vals(nmin: u32, nmax: u32, m: i32)
    -> Result<Basis<StateNLM>, ConfigError>
{
    ConfigError::check_range(nmin, nmax)?;
    let lmin = m.unsigned_abs();
    let basis: Basis<StateNLM>
        = (nmin..=nmax)
        .flat_map(|n| (lmin..n).map(move |l| StateNLM { n, l, m }))
        .collect();
    Ok(basis)
}

/// Enumerate all `|n, l, m⟩` states for `n` in `nmin..=nmax`.
pub fn get_nlm_vals(nmin: u32, nmax: u32)
    -> Result<Basis<StateNLM>, ConfigError>
{
    ConfigError::check_range(nmin, nmax)?;
    let basis: Basis<StateNLM>
        = (nmin..=nmax)
        .flat_map(|n| {
            (0..n).flat_map(move |l| {
                let l_i = l as i32;
                (-l_i..=l_i).map(move |m| StateNLM { n, l, m })
            })
        })
        .collect();
    Ok(basis)
}

/// Enumerate `|n, L, J⟩` states for total spin `S`, for `n` in `nmin..=nmax`
/// and `L` in `lmin..n`.
///
/// `L = 0` gives a single state with `J = S`. For `L > 0`, singlets (`S = 0`)
/// give `J = L` and higher multiplicities give every `J` in `|L - S|..=L + S`.
pub fn get_nlj_vals(S: u32, nmin: u32, nmax: u32, lmin: u32)
    -> Result<Basis<StateNLJ>, ConfigError>
{
    ConfigError::check_range(nmin, nmax)?;
    let basis: Basis<StateNLJ>
        = (nmin..=nmax)
        .flat_map(|n| {
            (lmin..n).flat_map(move |l| {
                let js = if l == 0 { S..=S } else { l.abs_diff(S)..=l + S };
                js.map(move |j| StateNLJ { n, l, j })
            })
        })
        .collect();
    Ok(basis)
}

/// Enumerate triplet `|n, L, J⟩` states; see [`get_nlj_vals`].
pub fn get_triplet_nlj(nmin: u32, nmax: u32, lmin: u32)
    -> Result<Basis<StateNLJ>, ConfigError>
{
    get_nlj_vals(1, nmin, nmax, lmin)
}

fn j_val(S: u32, L: u32, diff: i32) -> u32 {
    if L == 0 { S } else { (L as i32 + diff).max(0) as u32 }
}

/// Compute `J = L + diff` for each `L`, except `J = S` wherever `L = 0`.
///
/// Negative results are clamped to zero.
pub fn get_j_vals<'a, I>(S: u32, L_vals: I, diff: i32) -> nd::Array1<u32>
where I: IntoIterator<Item = &'a u32>
{
    L_vals.into_iter().map(|&L| j_val(S, L, diff)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nl_vals_fixed_m() {
        let basis = get_nl_vals(1, 2, 0).unwrap();
        let expected = [(1, 0), (2, 0), (2, 1)];
        assert_eq!(basis.len(), expected.len());
        basis.iter().zip(expected)
            .for_each(|(s, (n, l))| {
                assert_eq!((s.n, s.l, s.m), (n, l, 0));
            });

        let basis = get_nl_vals(2, 4, -2).unwrap();
        assert_eq!(basis.len(), 0 + 1 + 2);
        assert!(basis.iter().all(|s| s.l >= 2 && s.m == -2));
    }

    #[test]
    fn nlm_vals_count() {
        // n² states per n
        let basis = get_nlm_vals(1, 4).unwrap();
        assert_eq!(basis.len(), 1 + 4 + 9 + 16);
        assert!(basis.iter().all(|s| s.m.unsigned_abs() <= s.l && s.l < s.n));
        assert_eq!(basis[1], StateNLM { n: 2, l: 0, m: 0 });
        assert_eq!(basis[2], StateNLM { n: 2, l: 1, m: -1 });
    }

    #[test]
    fn state_lookup() {
        let basis = get_nlm_vals(1, 3).unwrap();
        let state = StateNLM { n: 3, l: 2, m: 1 };
        let k = basis.index_of(&state).unwrap();
        assert_eq!(basis[k], state);
        assert_eq!(basis.index_of(&StateNLM { n: 4, l: 0, m: 0 }), None);
    }

    #[test]
    fn triplet_s_states_take_j_equal_s() {
        let basis = get_triplet_nlj(1, 6, 0).unwrap();
        assert!(basis.iter().filter(|s| s.l == 0).all(|s| s.j == 1));
        // 1 + 3 (n - 1) states per n
        let count: u32 = (1..=6).map(|n| 1 + 3 * (n - 1)).sum();
        assert_eq!(basis.len(), count as usize);
        let p: Vec<u32>
            = basis.iter().filter(|s| s.n == 2 && s.l == 1).map(|s| s.j).collect();
        assert_eq!(p, vec![0, 1, 2]);
    }

    #[test]
    fn singlet_states() {
        let basis = get_nlj_vals(0, 3, 3, 0).unwrap();
        assert_eq!(basis.len(), 3);
        assert!(basis.iter().all(|s| s.j == s.l));
    }

    #[test]
    fn j_vals_rule() {
        let L = nd::array![0_u32, 1, 2, 0, 5];
        let J = get_j_vals(1, &L, 1);
        assert_eq!(J, nd::array![1_u32, 2, 3, 1, 6]);
        let J = get_j_vals(0, &L, -1);
        assert_eq!(J, nd::array![0_u32, 0, 1, 0, 4]);
    }

    #[test]
    fn nlj_conversion_keeps_order() {
        let basis = get_nl_vals(3, 5, 1).unwrap();
        let nlj = basis.to_nlj(1, 1);
        assert_eq!(nlj.n_vals(), basis.n_vals());
        assert_eq!(nlj.l_vals(), basis.l_vals());
        assert_eq!(nlj.j_vals(), get_j_vals(1, &basis.l_vals(), 1));
    }

    #[test]
    fn neff_with_table() {
        let qd = QuantumDefects::new()
            .with(1, 1, 2, vec![0.07])
            .with(1, 2, 1, vec![0.002]);
        let basis = get_nl_vals(4, 5, 0).unwrap().to_nlj(1, 1);
        let neff = basis.neff(1, &qd);
        basis.iter().zip(&neff)
            .for_each(|(s, ne)| {
                match s.l {
                    1 => assert!((ne - (s.n as f64 - 0.07)).abs() < 1e-12),
                    2 => assert!(ne.is_nan()),
                    _ => assert_eq!(*ne, s.n as f64),
                }
            });
    }

    #[test]
    fn bad_range() {
        assert!(get_nl_vals(0, 3, 0).is_err());
        assert!(get_nlm_vals(4, 3).is_err());
    }
}
