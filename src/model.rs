//! State-space model capability traits
//!
//! The engines treat the model as an opaque, closed set of capabilities:
//! a transition function, a measurement function, and either noise
//! densities (exact engine) or noise samplers (sampling engine). Noise
//! is additive in the reference models, but the traits only assume the
//! functions are deterministic given their inputs.

use crate::common::rng::Rng;

/// Transition and measurement functions plus the initial-state density.
///
/// `transition(x, noise, timestep)` maps a state and a process-noise
/// draw to the next state; `measurement(x, noise)` maps a state and a
/// measurement-noise draw to an observation. Passing `0.0` noise gives
/// the noiseless propagation used to build discretized kernels.
pub trait StateSpaceModel {
    /// Next state given the current state, a process-noise value, and
    /// the current timestep index
    fn transition(&self, x: f64, noise: f64, timestep: usize) -> f64;

    /// Observation given a state and a measurement-noise value
    fn measurement(&self, x: f64, noise: f64) -> f64;

    /// Density of the initial state, evaluated pointwise
    fn initial_state_pdf(&self, x: f64) -> f64;
}

/// Noise densities, required by the exact point-mass engine.
///
/// Only meaningful for models whose measurement function admits a
/// well-conditioned likelihood; for non-invertible measurements (hard
/// saturation) use [`NoiseSamplerModel`] with the sampling engine
/// instead.
pub trait NoiseDensityModel: StateSpaceModel {
    /// Process-noise density evaluated at `value`
    fn process_noise_pdf(&self, value: f64) -> f64;

    /// Measurement-noise density evaluated at `value`
    fn measurement_noise_pdf(&self, value: f64) -> f64;
}

/// Noise samplers, required by the sampling/KDE engine and the
/// trajectory simulator.
pub trait NoiseSamplerModel: StateSpaceModel {
    /// Draw an initial state
    fn sample_initial_state<R: Rng>(&self, rng: &mut R) -> f64;

    /// Draw a process-noise value
    fn sample_process_noise<R: Rng>(&self, rng: &mut R) -> f64;

    /// Draw a measurement-noise value
    fn sample_measurement_noise<R: Rng>(&self, rng: &mut R) -> f64;
}
