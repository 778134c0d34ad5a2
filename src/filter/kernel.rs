//! Sampling/KDE filter for non-invertible measurement functions
//!
//! Forward-only engine for models without a usable measurement
//! likelihood: each step resamples the previous filtering pmf by
//! inversion, propagates the samples through the transition function,
//! reconstructs the predictive density by Gaussian kernel density
//! estimation, and reweights against the realized observation in
//! measurement space, with a truncation gate discarding particles
//! implausibly far from it.

use nalgebra::DVector;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

use crate::common::rng::Rng;
use crate::density::{normalize_mass, Density};
use crate::grid::Grid;
use crate::model::NoiseSamplerModel;

use super::errors::FilterError;
use super::output::FilterOutput;
use super::{check_observations, initial_mass, tag_step};

const SQRT_TWO_PI: f64 = 2.506_628_274_631_000_5;

#[inline]
fn gaussian_pdf(residual: f64, std_dev: f64) -> f64 {
    let z = residual / std_dev;
    (-0.5 * z * z).exp() / (std_dev * SQRT_TWO_PI)
}

/// Tuning parameters for the sampling/KDE engine.
#[derive(Debug, Clone)]
pub struct KernelFilterConfig {
    /// Number of particles drawn per step
    pub num_samples: usize,
    /// Kernel bandwidth (variance of the Gaussian kernels)
    pub kernel_variance: f64,
    /// Truncation gate in units of the kernel standard deviation;
    /// particles farther than `gate_factor * sqrt(kernel_variance)`
    /// from the realized observation contribute nothing
    pub gate_factor: f64,
}

impl Default for KernelFilterConfig {
    fn default() -> Self {
        Self {
            num_samples: 10_000,
            kernel_variance: 0.15,
            gate_factor: 3.0,
        }
    }
}

impl KernelFilterConfig {
    fn validate(&self) -> Result<(), FilterError> {
        if self.num_samples == 0 {
            return Err(FilterError::Configuration {
                description: "sample count must be positive".to_string(),
            });
        }
        if !(self.kernel_variance > 0.0 && self.kernel_variance.is_finite()) {
            return Err(FilterError::Configuration {
                description: format!(
                    "kernel bandwidth must be positive and finite, got {}",
                    self.kernel_variance
                ),
            });
        }
        if !(self.gate_factor > 0.0 && self.gate_factor.is_finite()) {
            return Err(FilterError::Configuration {
                description: format!(
                    "gate factor must be positive and finite, got {}",
                    self.gate_factor
                ),
            });
        }
        Ok(())
    }
}

/// Hybrid sampling/KDE Bayes filter.
///
/// Requires the model's noise samplers. Produces predictive and
/// filtering density sequences; no smoothing pass, since the method
/// has no tractable backward densities.
pub struct KernelFilter<'a, M> {
    grid: &'a Grid,
    model: &'a M,
    config: KernelFilterConfig,
}

impl<'a, M: NoiseSamplerModel> KernelFilter<'a, M> {
    /// Create an engine over the given grid and model.
    /// The configuration is validated before any recursion begins.
    pub fn new(
        grid: &'a Grid,
        model: &'a M,
        config: KernelFilterConfig,
    ) -> Result<Self, FilterError> {
        config.validate()?;
        Ok(Self {
            grid,
            model,
            config,
        })
    }

    /// Draw `num_samples` states from a filtering pmf by inverse-CDF
    /// lookup on the grid, dithered uniformly within one grid cell to
    /// declutter the quantization. Assumes the pmf is a sufficiently
    /// dense discretization.
    fn inversion_sample<R: Rng>(&self, rng: &mut R, pmf: &DVector<f64>) -> Vec<f64> {
        let n = pmf.len();
        let mut cdf = Vec::with_capacity(n);
        let mut acc = 0.0;
        for i in 0..n {
            acc += pmf[i];
            cdf.push(acc);
        }

        let half_cell = self.grid.delta() / 2.0;
        (0..self.config.num_samples)
            .map(|_| {
                let u = rng.rand();
                let idx = cdf.partition_point(|&c| c < u).min(n - 1);
                self.grid.point(idx) + rng.rand_range(-half_cell, half_cell)
            })
            .collect()
    }

    /// Run the forward filter over a full observation sequence.
    ///
    /// `observations[0]` is the no-measurement sentinel and is never
    /// compared against a simulated measurement. The caller supplies
    /// and retains the generator state, so a seeded run is exactly
    /// reproducible.
    pub fn run<R: Rng>(
        &self,
        rng: &mut R,
        observations: &[f64],
    ) -> Result<FilterOutput, FilterError> {
        let max_iter = check_observations(observations)?;
        let bandwidth = self.config.kernel_variance.sqrt();
        let gate = self.config.gate_factor * bandwidth;
        log::debug!(
            "kernel recursion: {} grid points, {} steps, {} samples, bandwidth {:.4}",
            self.grid.len(),
            max_iter,
            self.config.num_samples,
            bandwidth
        );

        let mut filtered: Vec<DVector<f64>> = Vec::with_capacity(max_iter + 1);
        let mut predicted: Vec<Option<DVector<f64>>> = Vec::with_capacity(max_iter + 1);
        filtered.push(initial_mass(self.grid, self.model)?);
        predicted.push(None);

        for k in 1..=max_iter {
            // Resample the previous posterior and propagate
            let mut particles = self.inversion_sample(rng, &filtered[k - 1]);
            for x in particles.iter_mut() {
                let noise = self.model.sample_process_noise(rng);
                *x = self.model.transition(*x, noise, k - 1);
            }

            // Predictive density by KDE over the propagated particles
            let uniform: Vec<(f64, f64)> = particles.iter().map(|&x| (x, 1.0)).collect();
            let mut pred = accumulate_kernels(self.grid, &uniform, bandwidth);
            normalize_mass(&mut pred)
                .map_err(|e| tag_step(e, k, "predictive KDE produced zero mass"))?;

            // Simulate measurements and gate against the realized one
            let y = observations[k];
            let weighted: Vec<(f64, f64)> = particles
                .iter()
                .map(|&x| {
                    let noise = self.model.sample_measurement_noise(rng);
                    (x, self.model.measurement(x, noise))
                })
                .filter(|&(_, sim)| (y - sim).abs() < gate)
                .map(|(x, sim)| (x, gaussian_pdf(y - sim, bandwidth)))
                .collect();
            log::trace!(
                "kernel step {}: {} of {} particles passed the gate",
                k,
                weighted.len(),
                self.config.num_samples
            );
            if weighted.is_empty() {
                return Err(FilterError::DegenerateDensity {
                    timestep: k,
                    context: "every particle failed the measurement gate".to_string(),
                });
            }

            let mut post = accumulate_kernels(self.grid, &weighted, bandwidth);
            normalize_mass(&mut post)
                .map_err(|e| tag_step(e, k, "gated particle weights underflowed to zero"))?;

            predicted.push(Some(pred));
            filtered.push(post);
        }

        // Uniform pmf-to-density conversion, identical to the exact engine
        let grid = self.grid.clone();
        let predicted = predicted
            .into_iter()
            .map(|p| p.map(|pmf| Density::from_point_mass(pmf, &grid)))
            .collect();
        let filtered = filtered
            .into_iter()
            .map(|pmf| Density::from_point_mass(pmf, &grid))
            .collect();

        Ok(FilterOutput::new(grid, predicted, filtered, None))
    }
}

/// Sum weighted Gaussian kernels centered at each particle onto the
/// grid. Per-particle contributions are independent; only the final
/// per-grid-point sum couples them.
#[cfg(not(feature = "rayon"))]
fn accumulate_kernels(grid: &Grid, particles: &[(f64, f64)], bandwidth: f64) -> DVector<f64> {
    let mut acc = DVector::zeros(grid.len());
    for &(x, w) in particles {
        for j in 0..grid.len() {
            acc[j] += w * gaussian_pdf(grid.point(j) - x, bandwidth);
        }
    }
    acc
}

/// Parallel variant: partitions the particles across threads and
/// reduces the partial sums per grid point.
#[cfg(feature = "rayon")]
fn accumulate_kernels(grid: &Grid, particles: &[(f64, f64)], bandwidth: f64) -> DVector<f64> {
    particles
        .par_iter()
        .fold(
            || DVector::zeros(grid.len()),
            |mut acc, &(x, w)| {
                for j in 0..grid.len() {
                    acc[j] += w * gaussian_pdf(grid.point(j) - x, bandwidth);
                }
                acc
            },
        )
        .reduce(|| DVector::zeros(grid.len()), |a, b| a + b)
}
