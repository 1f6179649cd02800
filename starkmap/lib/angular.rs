//! Closed-form angular matrix elements for the Stark and diamagnetic
//! interactions.
//!
//! Every function here returns exactly `0.0` for pairs of states outside its
//! selection rules, so it can be used directly as a gate on the (much more
//! expensive) radial part of a matrix element.

use serde::{ Deserialize, Serialize };

/// Orientation of the electric field relative to the quantization axis.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldOrientation {
    /// Field along the quantization axis.
    #[default]
    Parallel,
    /// Field perpendicular to the quantization axis.
    Crossed,
}

impl FieldOrientation {
    /// Return `true` if `self` is `Parallel`.
    pub fn is_parallel(&self) -> bool { matches!(self, Self::Parallel) }

    /// Return `true` if `self` is `Crossed`.
    pub fn is_crossed(&self) -> bool { matches!(self, Self::Crossed) }
}

/// Angular overlap `⟨l₁, m₁| cos θ |l₂, m₂⟩` for the Stark interaction.
///
/// For [`FieldOrientation::Parallel`], only changes in `m` listed in
/// `dm_allow` give non-zero elements. For [`FieldOrientation::Crossed`],
/// `dm_allow` is ignored and only `Δm = ±1` couples.
pub fn ang_overlap_stark(
    l_1: u32,
    l_2: u32,
    m_1: i32,
    m_2: i32,
    field_orientation: FieldOrientation,
    dm_allow: &[i32],
) -> f64
{
    let dl = l_2 as i64 - l_1 as i64;
    let dm = m_2 as i64 - m_1 as i64;
    let l = l_1 as f64;
    let m = m_1 as f64;
    let allowed = dm_allow.iter().any(|&d| d as i64 == dm);
    match field_orientation {
        FieldOrientation::Parallel if allowed => match (dm, dl) {
            (0, 1) => {
                (((l + 1.0).powi(2) - m.powi(2))
                    / ((2.0 * l + 3.0) * (2.0 * l + 1.0))).sqrt()
            },
            (0, -1) => {
                ((l.powi(2) - m.powi(2))
                    / ((2.0 * l + 1.0) * (2.0 * l - 1.0))).sqrt()
            },
            (1, 1) => {
                -((l + m + 2.0) * (l + m + 1.0)
                    / (2.0 * (2.0 * l + 3.0) * (2.0 * l + 1.0))).sqrt()
            },
            (1, -1) => {
                ((l - m) * (l - m - 1.0)
                    / (2.0 * (2.0 * l + 1.0) * (2.0 * l - 1.0))).sqrt()
            },
            (-1, 1) => {
                ((l - m + 2.0) * (l - m + 1.0)
                    / (2.0 * (2.0 * l + 3.0) * (2.0 * l + 1.0))).sqrt()
            },
            (-1, -1) => {
                -((l + m) * (l + m - 1.0)
                    / (2.0 * (2.0 * l + 1.0) * (2.0 * l - 1.0))).sqrt()
            },
            _ => 0.0,
        },
        FieldOrientation::Parallel => 0.0,
        FieldOrientation::Crossed => {
            // (-1)^(m - 2l) = (-1)^(2l - m) = (-1)^m
            let sign = if m_1.rem_euclid(2) == 0 { 1.0 } else { -1.0 };
            match (dm, dl) {
                (1, 1) => {
                    0.5 * sign * ((l + m + 1.0) * (l + m + 2.0)
                        / ((2.0 * l + 1.0) * (2.0 * l + 3.0))).sqrt()
                },
                (1, -1) => {
                    -0.5 * sign * ((l - m - 1.0) * (l - m)
                        / ((2.0 * l - 1.0) * (2.0 * l + 1.0))).sqrt()
                },
                (-1, 1) => {
                    0.5 * sign * ((l - m + 1.0) * (l - m + 2.0)
                        / ((2.0 * l + 1.0) * (2.0 * l + 3.0))).sqrt()
                },
                (-1, -1) => {
                    -0.5 * sign * ((l + m - 1.0) * (l + m)
                        / ((2.0 * l - 1.0) * (2.0 * l + 1.0))).sqrt()
                },
                _ => 0.0,
            }
        },
    }
}

/// Angular overlap `⟨l₁, m₁| sin² θ |l₂, m₂⟩` for the diamagnetic interaction.
///
/// Non-zero only for `Δm = 0` and `Δl ∊ {0, ±2}`.
pub fn ang_overlap_diamagnetic(l_1: u32, l_2: u32, m_1: i32, m_2: i32) -> f64 {
    if m_1 != m_2 { return 0.0; }
    let m = m_1 as f64;
    match l_1.abs_diff(l_2) {
        0 => {
            let l = l_1 as f64;
            2.0 * (l.powi(2) + l - 1.0 + m.powi(2))
                / ((2.0 * l - 1.0) * (2.0 * l + 3.0))
        },
        2 => {
            let lmin = l_1.min(l_2) as f64;
            -(
                (lmin + m + 2.0) * (lmin + m + 1.0)
                * (lmin - m + 2.0) * (lmin - m + 1.0)
                / (
                    (2.0 * lmin + 5.0)
                    * (2.0 * lmin + 3.0).powi(2)
                    * (2.0 * lmin + 1.0)
                )
            ).sqrt()
        },
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stark_selection_rules() {
        let p = FieldOrientation::Parallel;
        let c = FieldOrientation::Crossed;
        let all = [-1, 0, 1];
        for (l1, l2) in [(0, 0), (2, 2), (1, 3), (4, 1)] {
            for (m1, m2) in [(0, 0), (0, 1), (1, 0)] {
                assert_eq!(ang_overlap_stark(l1, l2, m1, m2, p, &all), 0.0);
                assert_eq!(ang_overlap_stark(l1, l2, m1, m2, c, &all), 0.0);
            }
        }
        // |Δm| > 1
        assert_eq!(ang_overlap_stark(2, 3, -1, 1, p, &all), 0.0);
        // disallowed Δm
        assert_eq!(ang_overlap_stark(2, 3, 0, 1, p, &[0]), 0.0);
        assert_eq!(ang_overlap_stark(2, 3, 0, 0, p, &[1, -1]), 0.0);
        // crossed never couples Δm = 0
        assert_eq!(ang_overlap_stark(2, 3, 1, 1, c, &all), 0.0);
    }

    #[test]
    fn stark_parallel_values() {
        let p = FieldOrientation::Parallel;
        let s = ang_overlap_stark(0, 1, 0, 0, p, &[0]);
        assert!((s - 3.0_f64.sqrt().recip()).abs() < 1e-15);
        let s = ang_overlap_stark(1, 0, 0, 0, p, &[0]);
        assert!((s - 3.0_f64.sqrt().recip()).abs() < 1e-15);
        // ⟨2, 1| cos θ |3, 1⟩ = √(8 / 35)
        let s = ang_overlap_stark(2, 3, 1, 1, p, &[0]);
        assert!((s - (8.0_f64 / 35.0).sqrt()).abs() < 1e-15);
    }

    #[test]
    fn stark_parallel_is_symmetric() {
        let p = FieldOrientation::Parallel;
        for l in 1..8_u32 {
            for m in -(l as i32 - 1)..=(l as i32 - 1) {
                let up = ang_overlap_stark(l - 1, l, m, m, p, &[0]);
                let down = ang_overlap_stark(l, l - 1, m, m, p, &[0]);
                assert!((up - down).abs() < 1e-14);
            }
        }
    }

    #[test]
    fn stark_crossed_values() {
        let c = FieldOrientation::Crossed;
        // 0.5 √(2 / 3) for l = 0 -> 1, m = 0 -> 1
        let s = ang_overlap_stark(0, 1, 0, 1, c, &[]);
        assert!((s - 0.5 * (2.0_f64 / 3.0).sqrt()).abs() < 1e-15);
        // odd m flips the sign
        let s = ang_overlap_stark(1, 2, 1, 2, c, &[]);
        assert!(s < 0.0);
    }

    #[test]
    fn diamagnetic_values() {
        // ⟨0, 0| sin²θ |0, 0⟩ = 2 / 3
        let d = ang_overlap_diamagnetic(0, 0, 0, 0);
        assert!((d - 2.0 / 3.0).abs() < 1e-15);
        // ⟨1, ±1| sin²θ |1, ±1⟩ = 4 / 5
        let d = ang_overlap_diamagnetic(1, 1, 1, 1);
        assert!((d - 0.8).abs() < 1e-15);
        let d = ang_overlap_diamagnetic(1, 1, -1, -1);
        assert!((d - 0.8).abs() < 1e-15);
        let d02 = ang_overlap_diamagnetic(0, 2, 0, 0);
        let d20 = ang_overlap_diamagnetic(2, 0, 0, 0);
        assert!(d02 < 0.0);
        assert_eq!(d02, d20);
    }

    #[test]
    fn diamagnetic_selection_rules() {
        assert_eq!(ang_overlap_diamagnetic(2, 2, 0, 1), 0.0);
        assert_eq!(ang_overlap_diamagnetic(2, 4, 1, 0), 0.0);
        assert_eq!(ang_overlap_diamagnetic(2, 3, 0, 0), 0.0);
        assert_eq!(ang_overlap_diamagnetic(1, 5, 0, 0), 0.0);
    }

    #[test]
    fn orientation_from_toml() {
        #[derive(Deserialize)]
        struct T { o: FieldOrientation }
        let t: T = toml::from_str("o = \"crossed\"").unwrap();
        assert!(t.o.is_crossed());
        assert_eq!(FieldOrientation::default(), FieldOrientation::Parallel);
    }
}
