//! Trajectory and measurement simulation
//!
//! Generates a synthetic true state sequence and the corresponding
//! noisy observation sequence from a model's samplers. Index 0 holds
//! the initial state; there is no measurement at the initial time, so
//! `observations[0]` is the [`NO_MEASUREMENT`] sentinel, which the
//! engines never feed into a likelihood.

use crate::common::rng::Rng;
use crate::model::NoiseSamplerModel;

/// Sentinel observation at the initial time index. Lies outside any
/// finite likelihood's support.
pub const NO_MEASUREMENT: f64 = f64::INFINITY;

/// A simulated trajectory with its observation sequence, both of
/// length `max_iter + 1` and aligned index-for-index.
#[derive(Debug, Clone)]
pub struct Simulation {
    /// True states; index 0 is the initial state
    pub states: Vec<f64>,
    /// Observations; index 0 is [`NO_MEASUREMENT`]
    pub observations: Vec<f64>,
}

impl Simulation {
    /// Number of recursion steps (excludes the initial time index)
    pub fn max_iter(&self) -> usize {
        self.states.len() - 1
    }
}

/// Simulate `max_iter` steps of a model from a sampled initial state.
///
/// The generator is advanced in a fixed order (initial state, then one
/// process-noise draw per transition, then one measurement-noise draw
/// per observation), so a seeded run is fully reproducible.
pub fn simulate<M: NoiseSamplerModel, R: Rng>(
    rng: &mut R,
    model: &M,
    max_iter: usize,
) -> Simulation {
    let mut states = Vec::with_capacity(max_iter + 1);
    states.push(model.sample_initial_state(rng));
    for k in 1..=max_iter {
        let noise = model.sample_process_noise(rng);
        let next = model.transition(states[k - 1], noise, k - 1);
        states.push(next);
    }

    let mut observations = Vec::with_capacity(max_iter + 1);
    observations.push(NO_MEASUREMENT);
    for &state in states.iter().skip(1) {
        let noise = model.sample_measurement_noise(rng);
        observations.push(model.measurement(state, noise));
    }

    Simulation {
        states,
        observations,
    }
}
