//! Uniform scalar grid shared by every density in a run
//!
//! The grid is constructed once per experiment and is read-only
//! thereafter. Its spacing is the unit of discrete integration and of
//! the pmf-to-density conversion.

use nalgebra::DVector;

use crate::filter::errors::FilterError;

/// Ordered, uniformly spaced scalar points over a fixed interval.
///
/// Every predictive, filtering, and smoothing density produced by the
/// engines is aligned index-for-index with one `Grid`.
#[derive(Debug, Clone)]
pub struct Grid {
    points: DVector<f64>,
    delta: f64,
}

impl Grid {
    /// Create a grid of `num_points` evenly spaced points on `[min, max]`.
    ///
    /// Both endpoints are included. Fewer than 2 points, non-finite
    /// bounds, or `max <= min` are rejected.
    pub fn linspace(min: f64, max: f64, num_points: usize) -> Result<Self, FilterError> {
        if num_points < 2 {
            return Err(FilterError::Configuration {
                description: format!("grid needs at least 2 points, got {}", num_points),
            });
        }
        if !min.is_finite() || !max.is_finite() {
            return Err(FilterError::Configuration {
                description: "grid bounds must be finite".to_string(),
            });
        }
        if max <= min {
            return Err(FilterError::Configuration {
                description: format!("grid interval is empty: [{}, {}]", min, max),
            });
        }

        let delta = (max - min) / (num_points - 1) as f64;
        let points = DVector::from_fn(num_points, |i, _| min + i as f64 * delta);

        Ok(Self { points, delta })
    }

    /// Grid points in increasing order
    #[inline]
    pub fn points(&self) -> &DVector<f64> {
        &self.points
    }

    /// Spacing between adjacent points
    #[inline]
    pub fn delta(&self) -> f64 {
        self.delta
    }

    /// Number of grid points
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// A grid always has at least 2 points
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Point at index `i`
    #[inline]
    pub fn point(&self, i: usize) -> f64 {
        self.points[i]
    }

    /// Lower bound of the grid interval
    #[inline]
    pub fn min(&self) -> f64 {
        self.points[0]
    }

    /// Upper bound of the grid interval
    #[inline]
    pub fn max(&self) -> f64 {
        self.points[self.points.len() - 1]
    }
}
