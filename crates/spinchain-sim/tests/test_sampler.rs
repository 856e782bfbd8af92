//! Tests for shot sampling and magnetization estimates.

use rand::SeedableRng;
use rand::rngs::StdRng;

use spinchain_sim::magnetization::{estimate, exact_magnetization};
use spinchain_sim::{AmplitudeState, IsingChain, ShotSampler, SimError, TrotterStepper};

fn evolved_state(steps: usize) -> AmplitudeState {
    let stepper = TrotterStepper::new(IsingChain::new(4, 1.0, 1.2), 10.0 / 150.0).unwrap();
    let mut state = AmplitudeState::initial(4).unwrap();
    for _ in 0..steps {
        stepper.advance(&mut state).unwrap();
    }
    state
}

// ---------------------------------------------------------------------------
// Read-only sampling
// ---------------------------------------------------------------------------

#[test]
fn sampling_twice_with_same_seed_is_identical_and_leaves_state_untouched() {
    let state = evolved_state(12);
    let snapshot = state.clone();

    let first = ShotSampler::with_rng(StdRng::seed_from_u64(42))
        .sample(&state, 1024)
        .unwrap();
    let second = ShotSampler::with_rng(StdRng::seed_from_u64(42))
        .sample(&state, 1024)
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(state, snapshot);
    for (a, b) in state.amplitudes().iter().zip(snapshot.amplitudes()) {
        assert_eq!(a.re.to_bits(), b.re.to_bits());
        assert_eq!(a.im.to_bits(), b.im.to_bits());
    }
}

#[test]
fn sampling_does_not_change_later_evolution() {
    let stepper = TrotterStepper::new(IsingChain::new(3, 1.0, 1.2), 0.1).unwrap();
    let mut measured = AmplitudeState::initial(3).unwrap();
    let mut unmeasured = measured.clone();
    let mut sampler = ShotSampler::from_seed(9);

    for _ in 0..20 {
        stepper.advance(&mut measured).unwrap();
        stepper.advance(&mut unmeasured).unwrap();
        sampler.sample(&measured, 256).unwrap();
    }
    assert_eq!(measured, unmeasured);
}

// ---------------------------------------------------------------------------
// Counts
// ---------------------------------------------------------------------------

#[test]
fn counts_sum_to_shot_count() {
    let state = evolved_state(30);
    let mut sampler = ShotSampler::from_seed(1);
    for shots in [1, 7, 1024, 10_000, 50_001] {
        let freqs = sampler.sample(&state, shots).unwrap();
        assert_eq!(freqs.shots(), shots as u64);
        assert_eq!(freqs.iter().map(|(_, c)| c).sum::<u64>(), shots as u64);
    }
}

#[test]
fn zero_shots_is_rejected() {
    let state = evolved_state(1);
    assert!(matches!(
        ShotSampler::from_seed(0).sample(&state, 0),
        Err(SimError::InvalidShotCount(0))
    ));
}

// ---------------------------------------------------------------------------
// Estimation
// ---------------------------------------------------------------------------

#[test]
fn unevolved_initial_state_reads_minus_one_on_site_zero() {
    let state = AmplitudeState::initial(4).unwrap();
    let freqs = ShotSampler::from_seed(3).sample(&state, 500).unwrap();
    let m = estimate(&freqs, 4, 500);
    assert_eq!(m.as_slice(), &[-1.0, 1.0, 1.0, 1.0]);
}

#[test]
fn estimate_converges_to_exact_expectation() {
    let state = evolved_state(20);
    let exact = exact_magnetization(&state).unwrap();
    let shots = 200_000;
    let freqs = ShotSampler::from_seed(2024).sample(&state, shots).unwrap();
    let m = freqs.magnetization();

    // Standard error per site is at most 1/√S ≈ 0.0022.
    for site in 0..4 {
        assert!(
            (m[site] - exact[site]).abs() < 0.015,
            "site {site}: sampled {} exact {}",
            m[site],
            exact[site]
        );
    }
}

#[test]
fn estimates_stay_in_range() {
    let state = evolved_state(75);
    let freqs = ShotSampler::from_seed(77).sample(&state, 333).unwrap();
    let m = freqs.magnetization();
    assert_eq!(m.len(), 4);
    assert!(m.as_slice().iter().all(|v| (-1.0..=1.0).contains(v)));
}
