//! Reference model parameterizations
//!
//! Concrete state-space models used by the tests and by consumers as
//! starting points: the univariate nonstationary growth model from the
//! particle-filtering literature, a Student's t random walk, a random
//! walk with hard measurement saturation, and a plain linear-Gaussian
//! random walk for closed-form cross-checks.

use statrs::distribution::{Continuous, Normal, StudentsT};

use crate::common::rng::Rng;
use crate::filter::errors::FilterError;
use crate::model::{NoiseDensityModel, NoiseSamplerModel, StateSpaceModel};

/// Univariate nonstationary growth model.
///
/// `f(x, v, k) = x/2 + 25x/(1 + x^2) + 8cos(1.2(k + 1)) + v` with
/// `v ~ N(0, 10)`, observed through `h(x, e) = x^2/20 + e` with
/// `e ~ N(0, 1)` and `x0 ~ N(0, 1)`. The squared measurement makes the
/// posterior multimodal, which is what makes this the standard
/// benchmark for density-based filters.
#[derive(Debug, Clone)]
pub struct NonstationaryGrowthModel {
    process_noise: Normal,
    measurement_noise: Normal,
    initial_state: Normal,
    process_std: f64,
}

impl NonstationaryGrowthModel {
    /// Create the model with the reference noise levels
    pub fn new() -> Self {
        let process_std = 10.0_f64.sqrt();
        Self {
            process_noise: Normal::new(0.0, process_std)
                .expect("process noise standard deviation is positive"),
            measurement_noise: Normal::new(0.0, 1.0)
                .expect("measurement noise standard deviation is positive"),
            initial_state: Normal::new(0.0, 1.0)
                .expect("initial state standard deviation is positive"),
            process_std,
        }
    }
}

impl Default for NonstationaryGrowthModel {
    fn default() -> Self {
        Self::new()
    }
}

impl StateSpaceModel for NonstationaryGrowthModel {
    fn transition(&self, x: f64, noise: f64, timestep: usize) -> f64 {
        x / 2.0 + 25.0 * x / (1.0 + x * x) + 8.0 * (1.2 * (timestep as f64 + 1.0)).cos() + noise
    }

    fn measurement(&self, x: f64, noise: f64) -> f64 {
        x * x / 20.0 + noise
    }

    fn initial_state_pdf(&self, x: f64) -> f64 {
        self.initial_state.pdf(x)
    }
}

impl NoiseDensityModel for NonstationaryGrowthModel {
    fn process_noise_pdf(&self, value: f64) -> f64 {
        self.process_noise.pdf(value)
    }

    fn measurement_noise_pdf(&self, value: f64) -> f64 {
        self.measurement_noise.pdf(value)
    }
}

impl NoiseSamplerModel for NonstationaryGrowthModel {
    fn sample_initial_state<R: Rng>(&self, rng: &mut R) -> f64 {
        rng.randn()
    }

    fn sample_process_noise<R: Rng>(&self, rng: &mut R) -> f64 {
        rng.randn() * self.process_std
    }

    fn sample_measurement_noise<R: Rng>(&self, rng: &mut R) -> f64 {
        rng.randn()
    }
}

/// Random walk with Student's t noise on state, measurement, and the
/// initial state.
///
/// `f(x, v) = x + v`, `h(x, e) = x + e`, all noises t-distributed with
/// the same degrees of freedom. Heavy tails make the filtering
/// densities markedly non-Gaussian under outlier measurements.
#[derive(Debug, Clone)]
pub struct StudentTRandomWalk {
    noise: StudentsT,
    dof: u32,
}

impl StudentTRandomWalk {
    /// Create the model with the given degrees of freedom
    pub fn new(dof: u32) -> Result<Self, FilterError> {
        let noise = StudentsT::new(0.0, 1.0, dof as f64).map_err(|e| FilterError::Configuration {
            description: format!("invalid Student's t degrees of freedom {}: {}", dof, e),
        })?;
        Ok(Self { noise, dof })
    }

    /// Degrees of freedom shared by all three noises
    pub fn dof(&self) -> u32 {
        self.dof
    }
}

impl StateSpaceModel for StudentTRandomWalk {
    fn transition(&self, x: f64, noise: f64, _timestep: usize) -> f64 {
        x + noise
    }

    fn measurement(&self, x: f64, noise: f64) -> f64 {
        x + noise
    }

    fn initial_state_pdf(&self, x: f64) -> f64 {
        self.noise.pdf(x)
    }
}

impl NoiseDensityModel for StudentTRandomWalk {
    fn process_noise_pdf(&self, value: f64) -> f64 {
        self.noise.pdf(value)
    }

    fn measurement_noise_pdf(&self, value: f64) -> f64 {
        self.noise.pdf(value)
    }
}

impl NoiseSamplerModel for StudentTRandomWalk {
    fn sample_initial_state<R: Rng>(&self, rng: &mut R) -> f64 {
        rng.randt(self.dof)
    }

    fn sample_process_noise<R: Rng>(&self, rng: &mut R) -> f64 {
        rng.randt(self.dof)
    }

    fn sample_measurement_noise<R: Rng>(&self, rng: &mut R) -> f64 {
        rng.randt(self.dof)
    }
}

/// Decaying random walk observed through a hard saturation.
///
/// `f(x, v) = 0.7x + v` with `v ~ N(0, 1)`, observed through
/// `h(x, e) = clamp(x + e, min, max)` with `e ~ N(0, 0.5)` and
/// `x0 ~ N(0, 0.1)`. The clamp makes the measurement non-invertible and
/// its density degenerate at the bounds, so this model intentionally
/// implements only the sampler capabilities: it is the motivating case
/// for the sampling/KDE engine.
#[derive(Debug, Clone)]
pub struct SaturatedRandomWalk {
    initial_state: Normal,
    measurement_std: f64,
    initial_std: f64,
    min: f64,
    max: f64,
}

impl SaturatedRandomWalk {
    /// Create the model with the reference saturation bounds of ±1.5
    pub fn new() -> Self {
        // Bounds are valid by construction
        Self::with_limits(-1.5, 1.5).expect("reference saturation bounds are valid")
    }

    /// Create the model with custom saturation bounds
    pub fn with_limits(min: f64, max: f64) -> Result<Self, FilterError> {
        if !min.is_finite() || !max.is_finite() || max <= min {
            return Err(FilterError::Configuration {
                description: format!("invalid saturation bounds: [{}, {}]", min, max),
            });
        }
        let initial_std = 0.1_f64.sqrt();
        Ok(Self {
            initial_state: Normal::new(0.0, initial_std)
                .expect("initial state standard deviation is positive"),
            measurement_std: 0.5_f64.sqrt(),
            initial_std,
            min,
            max,
        })
    }

    /// Saturation bounds of the measurement function
    pub fn limits(&self) -> (f64, f64) {
        (self.min, self.max)
    }
}

impl Default for SaturatedRandomWalk {
    fn default() -> Self {
        Self::new()
    }
}

impl StateSpaceModel for SaturatedRandomWalk {
    fn transition(&self, x: f64, noise: f64, _timestep: usize) -> f64 {
        0.7 * x + noise
    }

    fn measurement(&self, x: f64, noise: f64) -> f64 {
        (x + noise).clamp(self.min, self.max)
    }

    fn initial_state_pdf(&self, x: f64) -> f64 {
        self.initial_state.pdf(x)
    }
}

impl NoiseSamplerModel for SaturatedRandomWalk {
    fn sample_initial_state<R: Rng>(&self, rng: &mut R) -> f64 {
        rng.randn() * self.initial_std
    }

    fn sample_process_noise<R: Rng>(&self, rng: &mut R) -> f64 {
        rng.randn()
    }

    fn sample_measurement_noise<R: Rng>(&self, rng: &mut R) -> f64 {
        rng.randn() * self.measurement_std
    }
}

/// Linear-Gaussian random walk, `f(x, v) = x + v`, `h(x, e) = x + e`.
///
/// The one model with a closed-form (Kalman) solution; used to validate
/// the grid recursion against exact means and variances.
#[derive(Debug, Clone)]
pub struct RandomWalk {
    process_noise: Normal,
    measurement_noise: Normal,
    initial_state: Normal,
    process_std: f64,
    measurement_std: f64,
    initial_mean: f64,
    initial_std: f64,
}

impl RandomWalk {
    /// Create a random walk from noise variances and the initial-state
    /// mean and variance
    pub fn new(
        process_variance: f64,
        measurement_variance: f64,
        initial_mean: f64,
        initial_variance: f64,
    ) -> Result<Self, FilterError> {
        if process_variance <= 0.0 || measurement_variance <= 0.0 || initial_variance <= 0.0 {
            return Err(FilterError::Configuration {
                description: "random walk variances must be positive".to_string(),
            });
        }
        let process_std = process_variance.sqrt();
        let measurement_std = measurement_variance.sqrt();
        let initial_std = initial_variance.sqrt();
        Ok(Self {
            process_noise: Normal::new(0.0, process_std)
                .expect("process noise standard deviation is positive"),
            measurement_noise: Normal::new(0.0, measurement_std)
                .expect("measurement noise standard deviation is positive"),
            initial_state: Normal::new(initial_mean, initial_std)
                .expect("initial state standard deviation is positive"),
            process_std,
            measurement_std,
            initial_mean,
            initial_std,
        })
    }

    /// Process noise variance
    pub fn process_variance(&self) -> f64 {
        self.process_std * self.process_std
    }

    /// Measurement noise variance
    pub fn measurement_variance(&self) -> f64 {
        self.measurement_std * self.measurement_std
    }

    /// Initial state mean
    pub fn initial_mean(&self) -> f64 {
        self.initial_mean
    }

    /// Initial state variance
    pub fn initial_variance(&self) -> f64 {
        self.initial_std * self.initial_std
    }
}

impl StateSpaceModel for RandomWalk {
    fn transition(&self, x: f64, noise: f64, _timestep: usize) -> f64 {
        x + noise
    }

    fn measurement(&self, x: f64, noise: f64) -> f64 {
        x + noise
    }

    fn initial_state_pdf(&self, x: f64) -> f64 {
        self.initial_state.pdf(x)
    }
}

impl NoiseDensityModel for RandomWalk {
    fn process_noise_pdf(&self, value: f64) -> f64 {
        self.process_noise.pdf(value)
    }

    fn measurement_noise_pdf(&self, value: f64) -> f64 {
        self.measurement_noise.pdf(value)
    }
}

impl NoiseSamplerModel for RandomWalk {
    fn sample_initial_state<R: Rng>(&self, rng: &mut R) -> f64 {
        self.initial_mean + rng.randn() * self.initial_std
    }

    fn sample_process_noise<R: Rng>(&self, rng: &mut R) -> f64 {
        rng.randn() * self.process_std
    }

    fn sample_measurement_noise<R: Rng>(&self, rng: &mut R) -> f64 {
        rng.randn() * self.measurement_std
    }
}
