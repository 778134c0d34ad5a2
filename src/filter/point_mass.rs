//! Exact point-mass filter and fixed-interval smoother
//!
//! Discretizes the Chapman-Kolmogorov recursion on the grid: a forward
//! pass alternates prediction through the transition kernel with the
//! pointwise Bayes update, and a backward pass reuses the kernel to
//! propagate smoothing mass, deflated by the predictive density that
//! produced it. Everything runs in pmf form; outputs are converted to
//! density form in one uniform step at the end.

use nalgebra::{DMatrix, DVector};

use crate::density::{normalize_mass, Density};
use crate::grid::Grid;
use crate::model::NoiseDensityModel;

use super::errors::FilterError;
use super::output::FilterOutput;
use super::{check_observations, initial_mass, tag_step};

/// Default lower clamp for predictive-density entries in the smoothing
/// division.
pub const DEFAULT_SMOOTHING_FLOOR: f64 = 1e-12;

/// Exact grid-based Bayes filter and smoother.
///
/// Requires the model's process and measurement noise densities
/// (additive noise). Produces predictive, filtering, and smoothing
/// density sequences over the grid.
pub struct PointMassFilter<'a, M> {
    grid: &'a Grid,
    model: &'a M,
    smoothing_floor: f64,
}

impl<'a, M: NoiseDensityModel> PointMassFilter<'a, M> {
    /// Create an engine over the given grid and model
    pub fn new(grid: &'a Grid, model: &'a M) -> Self {
        Self {
            grid,
            model,
            smoothing_floor: DEFAULT_SMOOTHING_FLOOR,
        }
    }

    /// Override the lower clamp applied to predictive-density entries
    /// in the backward pass. Near-zero entries would otherwise blow up
    /// the smoothing division.
    pub fn with_smoothing_floor(mut self, floor: f64) -> Result<Self, FilterError> {
        if !(floor > 0.0 && floor.is_finite()) {
            return Err(FilterError::Configuration {
                description: format!("smoothing floor must be positive and finite, got {}", floor),
            });
        }
        self.smoothing_floor = floor;
        Ok(self)
    }

    /// Discretized transition kernel for the step out of `timestep`:
    /// `K[j, i] = v_pdf(x_j - f(x_i, 0, timestep))`.
    fn transition_kernel(&self, timestep: usize) -> DMatrix<f64> {
        let n = self.grid.len();
        let propagated =
            DVector::from_fn(n, |i, _| self.model.transition(self.grid.point(i), 0.0, timestep));
        DMatrix::from_fn(n, n, |j, i| {
            self.model.process_noise_pdf(self.grid.point(j) - propagated[i])
        })
    }

    /// Measurement likelihood of `y` at every grid point:
    /// `e_pdf(y - h(x_i, 0))`.
    fn likelihood(&self, y: f64) -> DVector<f64> {
        DVector::from_fn(self.grid.len(), |i, _| {
            self.model
                .measurement_noise_pdf(y - self.model.measurement(self.grid.point(i), 0.0))
        })
    }

    /// Run the forward filter and the backward smoother over a full
    /// observation sequence.
    ///
    /// `observations[0]` is the no-measurement sentinel and is never
    /// evaluated under the likelihood. The returned sequences have the
    /// same length and indexing as `observations`.
    pub fn run(&self, observations: &[f64]) -> Result<FilterOutput, FilterError> {
        let max_iter = check_observations(observations)?;
        let n = self.grid.len();
        log::debug!(
            "point-mass recursion: {} grid points, {} steps",
            n,
            max_iter
        );

        // Forward pass, pmf form throughout
        let mut filtered: Vec<DVector<f64>> = Vec::with_capacity(max_iter + 1);
        let mut predicted: Vec<Option<DVector<f64>>> = Vec::with_capacity(max_iter + 1);
        filtered.push(initial_mass(self.grid, self.model)?);
        predicted.push(None);

        for k in 1..=max_iter {
            let kernel = self.transition_kernel(k - 1);

            let mut pred = &kernel * &filtered[k - 1];
            normalize_mass(&mut pred)
                .map_err(|e| tag_step(e, k, "prediction produced zero mass"))?;

            let mut post = self.likelihood(observations[k]).component_mul(&pred);
            normalize_mass(&mut post).map_err(|e| {
                tag_step(e, k, "measurement likelihood does not overlap the prediction")
            })?;

            log::trace!("forward step {}: posterior mode at index {}", k, argmax(&post));
            predicted.push(Some(pred));
            filtered.push(post);
        }

        // Backward pass; the final smoothing density equals the final
        // filtering density exactly
        let mut smoothed: Vec<DVector<f64>> = vec![DVector::zeros(0); max_iter + 1];
        smoothed[max_iter] = filtered[max_iter].clone();

        for k in (0..max_iter).rev() {
            let pred_next = predicted[k + 1]
                .as_ref()
                .expect("forward pass fills every prediction from index 1");

            // Smoothing mass at k+1, deflated by the predictive mass
            // that produced it; the clamp guards the division
            let floor = self.smoothing_floor;
            let ratio =
                DVector::from_fn(n, |j, _| smoothed[k + 1][j] / pred_next[j].max(floor));

            let kernel = self.transition_kernel(k);
            let mut smooth = kernel.tr_mul(&ratio).component_mul(&filtered[k]);
            normalize_mass(&mut smooth)
                .map_err(|e| tag_step(e, k, "smoothing weights collapsed to zero"))?;
            smoothed[k] = smooth;
        }

        // Uniform pmf-to-density conversion across all three sequences
        let grid = self.grid.clone();
        let predicted = predicted
            .into_iter()
            .map(|p| p.map(|pmf| Density::from_point_mass(pmf, &grid)))
            .collect();
        let filtered = filtered
            .into_iter()
            .map(|pmf| Density::from_point_mass(pmf, &grid))
            .collect();
        let smoothed = smoothed
            .into_iter()
            .map(|pmf| Density::from_point_mass(pmf, &grid))
            .collect();

        Ok(FilterOutput::new(grid, predicted, filtered, Some(smoothed)))
    }
}

fn argmax(values: &DVector<f64>) -> usize {
    let mut best = 0;
    for i in 1..values.len() {
        if values[i] > values[best] {
            best = i;
        }
    }
    best
}
