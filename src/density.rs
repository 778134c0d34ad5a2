//! Densities over a grid, and pmf normalization
//!
//! Two representations are used and must not be confused: during the
//! recursions everything is kept in pmf form (values sum to 1); the
//! public [`Density`] type holds the continuous form (pmf divided by
//! the grid spacing, integral over the grid interval approximately 1).
//! The engines convert whole output sequences from pmf to density form
//! in one uniform scaling step at the very end of a run.

use nalgebra::DVector;

use crate::filter::errors::FilterError;
use crate::grid::Grid;

/// Total mass below this is treated as a collapsed (degenerate) density
/// rather than normalized into NaN.
pub const ZERO_MASS_EPS: f64 = 1e-300;

/// A probability density evaluated on the points of a [`Grid`].
///
/// Values are nonnegative and scaled so that `sum(values) * delta` is
/// approximately 1. Produced by the engines; immutable once returned.
#[derive(Debug, Clone)]
pub struct Density {
    values: DVector<f64>,
}

impl Density {
    /// Convert a pmf (sums to 1) into density form by dividing by the
    /// grid spacing.
    pub(crate) fn from_point_mass(mut pmf: DVector<f64>, grid: &Grid) -> Self {
        pmf /= grid.delta();
        Self { values: pmf }
    }

    /// Density values, aligned with the grid points
    #[inline]
    pub fn values(&self) -> &DVector<f64> {
        &self.values
    }

    /// Number of grid points
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the density has no support points
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Discrete integral `sum(values) * delta`, approximately 1
    pub fn integral(&self, grid: &Grid) -> f64 {
        self.values.sum() * grid.delta()
    }

    /// Mean of the density under discrete integration
    pub fn mean(&self, grid: &Grid) -> f64 {
        self.values.dot(grid.points()) * grid.delta()
    }

    /// Variance of the density under discrete integration
    pub fn variance(&self, grid: &Grid) -> f64 {
        let mean = self.mean(grid);
        let mut second_moment = 0.0;
        for i in 0..self.values.len() {
            let x = grid.point(i);
            second_moment += self.values[i] * x * x;
        }
        second_moment * grid.delta() - mean * mean
    }

    /// Index of the grid point with the largest density value
    pub fn mode_index(&self) -> usize {
        let mut best = 0;
        for i in 1..self.values.len() {
            if self.values[i] > self.values[best] {
                best = i;
            }
        }
        best
    }

    /// Grid point with the largest density value
    pub fn mode(&self, grid: &Grid) -> f64 {
        grid.point(self.mode_index())
    }
}

/// Normalize a mass vector in place so it sums to 1.
///
/// Fails with a degenerate-density error when the total mass is below
/// [`ZERO_MASS_EPS`], and with a numerical-instability error when the
/// mass is not finite. Callers attach the timestep and stage context.
pub(crate) fn normalize_mass(values: &mut DVector<f64>) -> Result<(), FilterError> {
    let total = values.sum();
    if !total.is_finite() {
        return Err(FilterError::NumericalInstability {
            description: format!("total mass is not finite: {}", total),
        });
    }
    if total < ZERO_MASS_EPS {
        return Err(FilterError::DegenerateDensity {
            timestep: 0,
            context: "total mass is zero".to_string(),
        });
    }
    *values /= total;
    Ok(())
}
