//! Density recursion engines
//!
//! Two engines consume a fixed observation sequence and produce the
//! same shaped [`FilterOutput`]:
//!
//! - [`PointMassFilter`] - exact grid-based forward filter and
//!   fixed-interval backward smoother, driven by noise densities
//! - [`KernelFilter`] - hybrid sampling/KDE forward filter, driven by
//!   noise samplers, for models whose measurement function admits no
//!   usable likelihood (e.g. hard saturation)
//!
//! Both recursions run in strict time order; step `k` depends on the
//! completed step `k - 1` (and the smoother on `k + 1`).

pub mod errors;
pub mod kernel;
pub mod output;
pub mod point_mass;

pub use errors::FilterError;
pub use kernel::{KernelFilter, KernelFilterConfig};
pub use output::FilterOutput;
pub use point_mass::PointMassFilter;

use nalgebra::DVector;

use crate::density::normalize_mass;
use crate::grid::Grid;
use crate::model::StateSpaceModel;

/// Validate an observation sequence and return `max_iter`.
///
/// Index 0 is the no-measurement sentinel and may hold any value; every
/// later entry must be finite, since it will enter a likelihood or a
/// gating comparison.
pub(crate) fn check_observations(observations: &[f64]) -> Result<usize, FilterError> {
    if observations.is_empty() {
        return Err(FilterError::Configuration {
            description: "observation sequence is empty".to_string(),
        });
    }
    for (k, y) in observations.iter().enumerate().skip(1) {
        if !y.is_finite() {
            return Err(FilterError::Configuration {
                description: format!("observation at timestep {} is not finite: {}", k, y),
            });
        }
    }
    Ok(observations.len() - 1)
}

/// Initial filtering mass: the initial-state density evaluated on the
/// grid and normalized to sum to 1.
pub(crate) fn initial_mass<M: StateSpaceModel>(
    grid: &Grid,
    model: &M,
) -> Result<DVector<f64>, FilterError> {
    let mut mass = DVector::from_fn(grid.len(), |i, _| model.initial_state_pdf(grid.point(i)));
    normalize_mass(&mut mass).map_err(|e| tag_step(e, 0, "initial state density has zero mass on the grid"))?;
    Ok(mass)
}

/// Attach timestep and stage context to a degenerate-density error.
pub(crate) fn tag_step(err: FilterError, timestep: usize, stage: &str) -> FilterError {
    match err {
        FilterError::DegenerateDensity { .. } => FilterError::DegenerateDensity {
            timestep,
            context: stage.to_string(),
        },
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_observations_rejects_empty() {
        assert!(check_observations(&[]).is_err());
    }

    #[test]
    fn test_check_observations_allows_sentinel_at_zero() {
        let obs = [f64::INFINITY, 0.3, -1.2];
        assert_eq!(check_observations(&obs).unwrap(), 2);
    }

    #[test]
    fn test_check_observations_rejects_later_non_finite() {
        let obs = [f64::INFINITY, 0.3, f64::NAN];
        assert!(check_observations(&obs).is_err());
    }
}
