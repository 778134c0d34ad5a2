//! Evaluation utilities for grid densities
//!
//! Divergence between two densities on a shared grid, and the scalar
//! Kalman recursion used to cross-check the exact engine on
//! linear-Gaussian models.

use crate::density::Density;
use crate::filter::errors::FilterError;
use crate::grid::Grid;

/// Kullback-Leibler divergence `KL(p || q)` between two densities on
/// the same grid, under discrete integration.
///
/// Zero-mass points of `p` contribute nothing; `q` is clamped from
/// below so isolated zeros do not yield infinities.
pub fn kl_divergence(p: &Density, q: &Density, grid: &Grid) -> Result<f64, FilterError> {
    if p.len() != grid.len() || q.len() != grid.len() {
        return Err(FilterError::Configuration {
            description: format!(
                "density lengths {} and {} do not match grid length {}",
                p.len(),
                q.len(),
                grid.len()
            ),
        });
    }

    const Q_FLOOR: f64 = 1e-300;
    let mut kl = 0.0;
    for i in 0..grid.len() {
        let pi = p.values()[i];
        if pi > 0.0 {
            let qi = q.values()[i].max(Q_FLOOR);
            kl += pi * (pi / qi).ln();
        }
    }
    Ok(kl * grid.delta())
}

/// Mean and variance of a scalar Gaussian belief.
#[derive(Debug, Clone, Copy)]
pub struct KalmanEstimate {
    /// Belief mean
    pub mean: f64,
    /// Belief variance
    pub variance: f64,
}

/// One predict-update cycle of the scalar Kalman filter for the
/// linear-Gaussian random walk (`f(x, v) = x + v`, `h(x, e) = x + e`).
///
/// Returns the predictive and the posterior belief.
pub fn kalman_step(
    prior: KalmanEstimate,
    y: f64,
    process_variance: f64,
    measurement_variance: f64,
) -> (KalmanEstimate, KalmanEstimate) {
    let predicted = KalmanEstimate {
        mean: prior.mean,
        variance: prior.variance + process_variance,
    };
    let gain = predicted.variance / (predicted.variance + measurement_variance);
    let posterior = KalmanEstimate {
        mean: predicted.mean + gain * (y - predicted.mean),
        variance: (1.0 - gain) * predicted.variance,
    };
    (predicted, posterior)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::density::normalize_mass;
    use nalgebra::DVector;

    fn discretized_normal(grid: &Grid, mean: f64, variance: f64) -> Density {
        let mut pmf = DVector::from_fn(grid.len(), |i, _| {
            let z = grid.point(i) - mean;
            (-0.5 * z * z / variance).exp()
        });
        normalize_mass(&mut pmf).unwrap();
        Density::from_point_mass(pmf, grid)
    }

    #[test]
    fn test_kl_of_identical_densities_is_zero() {
        let grid = Grid::linspace(-5.0, 5.0, 201).unwrap();
        let p = discretized_normal(&grid, 0.0, 1.0);
        let kl = kl_divergence(&p, &p, &grid).unwrap();
        assert!(kl.abs() < 1e-12);
    }

    #[test]
    fn test_kl_matches_closed_form_for_shifted_gaussians() {
        let grid = Grid::linspace(-10.0, 10.0, 2001).unwrap();
        let p = discretized_normal(&grid, 0.0, 1.0);
        let q = discretized_normal(&grid, 1.0, 1.0);
        // KL(N(0,1) || N(1,1)) = 1/2
        let kl = kl_divergence(&p, &q, &grid).unwrap();
        assert!((kl - 0.5).abs() < 1e-2, "KL {} should be near 0.5", kl);
    }

    #[test]
    fn test_kl_rejects_mismatched_lengths() {
        let grid = Grid::linspace(-5.0, 5.0, 201).unwrap();
        let other = Grid::linspace(-5.0, 5.0, 101).unwrap();
        let p = discretized_normal(&grid, 0.0, 1.0);
        let q = discretized_normal(&other, 0.0, 1.0);
        assert!(kl_divergence(&p, &q, &grid).is_err());
    }

    #[test]
    fn test_kalman_step_contracts_variance() {
        let prior = KalmanEstimate {
            mean: 0.0,
            variance: 1.0,
        };
        let (predicted, posterior) = kalman_step(prior, 2.0, 1.0, 1.0);
        assert!((predicted.variance - 2.0).abs() < 1e-12);
        // Gain 2/3: posterior mean pulled toward the measurement
        assert!((posterior.mean - 4.0 / 3.0).abs() < 1e-12);
        assert!((posterior.variance - 2.0 / 3.0).abs() < 1e-12);
        assert!(posterior.variance < predicted.variance);
    }
}
