//! Output of a density recursion run
//!
//! Both engines produce the same shape: sequences of predictive and
//! filtering densities over the grid, aligned with the observation
//! sequence, plus (for the exact engine) the smoothing sequence. All
//! densities are in continuous form and immutable once returned, so a
//! consumer can render any time index and overlay the true state and
//! measurement.

use crate::density::Density;
use crate::grid::Grid;

/// Complete output from running an engine over an observation sequence.
///
/// All sequences have length `max_iter + 1` and share the indexing of
/// the observations. `predicted[0]` is `None`: no prediction precedes
/// the initial state.
#[derive(Debug, Clone)]
pub struct FilterOutput {
    grid: Grid,
    predicted: Vec<Option<Density>>,
    filtered: Vec<Density>,
    smoothed: Option<Vec<Density>>,
}

impl FilterOutput {
    pub(crate) fn new(
        grid: Grid,
        predicted: Vec<Option<Density>>,
        filtered: Vec<Density>,
        smoothed: Option<Vec<Density>>,
    ) -> Self {
        Self {
            grid,
            predicted,
            filtered,
            smoothed,
        }
    }

    /// The grid every density is defined on
    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Number of time indices, `max_iter + 1`
    #[inline]
    pub fn num_timesteps(&self) -> usize {
        self.filtered.len()
    }

    /// Predictive densities; index 0 is `None`
    #[inline]
    pub fn predicted(&self) -> &[Option<Density>] {
        &self.predicted
    }

    /// Filtering densities for every time index
    #[inline]
    pub fn filtered(&self) -> &[Density] {
        &self.filtered
    }

    /// Smoothing densities, present only for the exact engine
    #[inline]
    pub fn smoothed(&self) -> Option<&[Density]> {
        self.smoothed.as_deref()
    }

    /// Predictive density at time `k`, if one exists (`k >= 1`)
    pub fn predicted_at(&self, k: usize) -> Option<&Density> {
        self.predicted.get(k).and_then(|d| d.as_ref())
    }

    /// Filtering density at time `k`
    pub fn filtered_at(&self, k: usize) -> Option<&Density> {
        self.filtered.get(k)
    }

    /// Smoothing density at time `k`, if a smoothing pass ran
    pub fn smoothed_at(&self, k: usize) -> Option<&Density> {
        self.smoothed.as_ref().and_then(|s| s.get(k))
    }
}
