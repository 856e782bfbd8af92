//! Gate descriptions and in-place application on an [`AmplitudeState`].
//!
//! Gates are applied by walking basis indices and mixing the amplitude
//! pairs that differ only in the target bit; the full 2^N × 2^N matrix is
//! never built.
//!
//! Angle convention: every rotation takes the full angle θ of
//! `exp(-i θ/2 · P)`, so `Rx(θ)` is `exp(-i θ/2 · X)` and the coupling gate
//! is `Rzz(θ) = exp(-i θ/2 · Z⊗Z)`.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};
use crate::magnetization::SITE_ORDER;
use crate::state::AmplitudeState;

/// A unitary action on one or two sites.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GateSpec {
    /// Two-site phase rotation `exp(-i θ/2 · Z_a ⊗ Z_b)`.
    Coupling {
        /// The coupled site pair.
        sites: (usize, usize),
        /// Rotation angle θ.
        theta: f64,
    },
    /// Single-site rotation `exp(-i θ/2 · X_site)`.
    Field {
        /// Target site.
        site: usize,
        /// Rotation angle θ.
        theta: f64,
    },
}

impl GateSpec {
    /// Coupling rotation on a bond.
    pub fn coupling(a: usize, b: usize, theta: f64) -> Self {
        GateSpec::Coupling {
            sites: (a, b),
            theta,
        }
    }

    /// Transverse-field rotation on one site.
    pub fn field(site: usize, theta: f64) -> Self {
        GateSpec::Field { site, theta }
    }

    /// Sites the gate acts on.
    pub fn sites(&self) -> Vec<usize> {
        match *self {
            GateSpec::Coupling { sites: (a, b), .. } => vec![a, b],
            GateSpec::Field { site, .. } => vec![site],
        }
    }

    /// Rotation angle θ.
    pub fn theta(&self) -> f64 {
        match *self {
            GateSpec::Coupling { theta, .. } | GateSpec::Field { theta, .. } => theta,
        }
    }
}

/// Apply `gate` to `state` in place.
///
/// All site indices are validated before any amplitude is touched, so an
/// `InvalidSiteIndex` error leaves the state unchanged.
pub fn apply(state: &mut AmplitudeState, gate: &GateSpec) -> SimResult<()> {
    match *gate {
        GateSpec::Coupling {
            sites: (a, b),
            theta,
        } => {
            state.check_site(a)?;
            state.check_site(b)?;
            if a == b {
                return Err(SimError::InvalidConfig(format!(
                    "coupling gate needs two distinct sites, got ({a}, {b})"
                )));
            }
            apply_rzz(state, a, b, theta);
        }
        GateSpec::Field { site, theta } => {
            state.check_site(site)?;
            apply_rx(state, site, theta);
        }
    }
    Ok(())
}

/// Apply a sequence of gates in order.
pub fn apply_all<'a>(
    state: &mut AmplitudeState,
    gates: impl IntoIterator<Item = &'a GateSpec>,
) -> SimResult<()> {
    for gate in gates {
        apply(state, gate)?;
    }
    Ok(())
}

// =========================================================================
// Primitive kernels (indices already validated)
// =========================================================================

pub(crate) fn apply_rx(state: &mut AmplitudeState, site: usize, theta: f64) {
    let mask = SITE_ORDER.mask(site, state.num_sites());
    let c = (theta / 2.0).cos();
    let s = (theta / 2.0).sin();
    let neg_i_s = Complex64::new(0.0, -s);
    let amps = state.amplitudes_mut();
    for i in 0..amps.len() {
        if i & mask == 0 {
            let j = i | mask;
            let a = amps[i];
            let b = amps[j];
            amps[i] = c * a + neg_i_s * b;
            amps[j] = neg_i_s * a + c * b;
        }
    }
}

/// Z rotation, used to cross-check the coupling kernel.
#[cfg(test)]
fn apply_rz(state: &mut AmplitudeState, site: usize, theta: f64) {
    let mask = SITE_ORDER.mask(site, state.num_sites());
    let phase_0 = Complex64::from_polar(1.0, -theta / 2.0);
    let phase_1 = Complex64::from_polar(1.0, theta / 2.0);
    for (i, amp) in state.amplitudes_mut().iter_mut().enumerate() {
        if i & mask == 0 {
            *amp *= phase_0;
        } else {
            *amp *= phase_1;
        }
    }
}

#[cfg(test)]
fn apply_cx(state: &mut AmplitudeState, control: usize, target: usize) {
    let n = state.num_sites();
    let ctrl_mask = SITE_ORDER.mask(control, n);
    let tgt_mask = SITE_ORDER.mask(target, n);
    let amps = state.amplitudes_mut();
    for i in 0..amps.len() {
        if (i & ctrl_mask != 0) && (i & tgt_mask == 0) {
            amps.swap(i, i | tgt_mask);
        }
    }
}

/// Diagonal Z⊗Z rotation: even parity picks up `e^{-iθ/2}`, odd `e^{+iθ/2}`.
pub(crate) fn apply_rzz(state: &mut AmplitudeState, a: usize, b: usize, theta: f64) {
    let n = state.num_sites();
    let mask_a = SITE_ORDER.mask(a, n);
    let mask_b = SITE_ORDER.mask(b, n);
    let even = Complex64::from_polar(1.0, -theta / 2.0);
    let odd = Complex64::from_polar(1.0, theta / 2.0);
    for (i, amp) in state.amplitudes_mut().iter_mut().enumerate() {
        let parity = ((i & mask_a != 0) as u8) ^ ((i & mask_b != 0) as u8);
        if parity == 0 {
            *amp *= even;
        } else {
            *amp *= odd;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn approx_eq(a: Complex64, b: Complex64) -> bool {
        (a - b).norm() < 1e-10
    }

    fn superposition(num_sites: usize) -> AmplitudeState {
        // Distinct, non-trivial amplitudes so phase errors are visible.
        let dim = 1 << num_sites;
        let amps: Vec<Complex64> = (0..dim)
            .map(|k| Complex64::new(1.0 + k as f64, 0.5 * k as f64 - 1.0))
            .collect();
        let mut sv = AmplitudeState::from_amplitudes(amps).unwrap();
        sv.renormalize();
        sv
    }

    #[test]
    fn test_rx_pi_flips_site() {
        let mut sv = AmplitudeState::ground(1).unwrap();
        apply(&mut sv, &GateSpec::field(0, PI)).unwrap();
        // Rx(π)|0⟩ = -i|1⟩
        assert!(approx_eq(sv.amplitudes()[0], Complex64::new(0.0, 0.0)));
        assert!(approx_eq(sv.amplitudes()[1], Complex64::new(0.0, -1.0)));
    }

    #[test]
    fn test_rx_acts_only_on_target_bit() {
        let mut sv = AmplitudeState::ground(3).unwrap();
        apply(&mut sv, &GateSpec::field(2, PI)).unwrap();
        assert!(approx_eq(sv.amplitudes()[0b100], Complex64::new(0.0, -1.0)));
        assert!((sv.norm_sqr() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_coupling_matches_cx_rz_cx_decomposition() {
        let theta = 0.37;
        for (a, b) in [(0, 1), (1, 2), (0, 2), (2, 0)] {
            let mut direct = superposition(3);
            let mut decomposed = direct.clone();

            apply(&mut direct, &GateSpec::coupling(a, b, theta)).unwrap();

            apply_cx(&mut decomposed, a, b);
            apply_rz(&mut decomposed, b, theta);
            apply_cx(&mut decomposed, a, b);

            for (x, y) in direct.amplitudes().iter().zip(decomposed.amplitudes()) {
                assert!(approx_eq(*x, *y), "bond ({a},{b}) mismatch: {x} vs {y}");
            }
        }
    }

    #[test]
    fn test_coupling_on_basis_state_is_pure_phase() {
        let mut sv = AmplitudeState::initial(2).unwrap();
        let before = sv.probabilities();
        apply(&mut sv, &GateSpec::coupling(0, 1, 1.3)).unwrap();
        assert_eq!(sv.probabilities().len(), before.len());
        for (p, q) in sv.probabilities().iter().zip(&before) {
            assert!((p - q).abs() < 1e-12);
        }
        // Odd parity picks up e^{+iθ/2}.
        assert!(approx_eq(sv.amplitudes()[1], Complex64::from_polar(1.0, 0.65)));
    }

    #[test]
    fn test_invalid_site_rejected_without_mutation() {
        let mut sv = superposition(2);
        let before = sv.clone();
        assert!(matches!(
            apply(&mut sv, &GateSpec::field(2, 0.1)),
            Err(SimError::InvalidSiteIndex {
                site: 2,
                num_sites: 2
            })
        ));
        assert!(matches!(
            apply(&mut sv, &GateSpec::coupling(1, 5, 0.1)),
            Err(SimError::InvalidSiteIndex { site: 5, .. })
        ));
        assert!(matches!(
            apply(&mut sv, &GateSpec::coupling(1, 1, 0.1)),
            Err(SimError::InvalidConfig(_))
        ));
        assert_eq!(sv, before);
    }

    #[test]
    fn test_zero_angle_is_identity() {
        let mut sv = superposition(3);
        let before = sv.clone();
        apply_all(
            &mut sv,
            &[GateSpec::coupling(0, 1, 0.0), GateSpec::field(2, 0.0)],
        )
        .unwrap();
        assert_eq!(sv, before);
    }
}
