/*!
# Scalar Bayesian density filters

Rust implementation of exact and approximate recursive Bayesian
inference for scalar nonlinear, non-Gaussian state-space models.
Rather than point estimates, both engines compute the full time
sequence of predictive, filtering, and (for the exact engine)
smoothing probability densities over a fixed grid.

## Features

- Exact grid-based ("point-mass") Bayes filter and fixed-interval smoother
- Hybrid sampling/KDE filter for non-invertible measurement functions
- Reference model parameterizations and a seeded trajectory simulator

## Modules

- [`filter`] - The two density recursion engines and their output types
- [`grid`] / [`density`] - Shared grid and density representations
- [`model`] - State-space model capability traits
- [`models`] - Reference parameterizations (growth model, Student's t
  random walk, saturated measurements, linear-Gaussian random walk)
- [`simulate`] - Trajectory and measurement generation
- [`common`] - Low-level utilities (RNG, metrics)

## Example

```rust
use scalar_bayes_filters_rs::{Grid, PointMassFilter, SimpleRng};
use scalar_bayes_filters_rs::models::NonstationaryGrowthModel;
use scalar_bayes_filters_rs::simulate::simulate;

let grid = Grid::linspace(-30.0, 30.0, 500).unwrap();
let model = NonstationaryGrowthModel::new();

// Simulate a 20-step trajectory and filter/smooth it
let mut rng = SimpleRng::new(4);
let sim = simulate(&mut rng, &model, 20);

let engine = PointMassFilter::new(&grid, &model);
let output = engine.run(&sim.observations).unwrap();
let mode = output.smoothed_at(14).unwrap().mode(&grid);
println!("smoothed mode at k=14: {}", mode);
```
*/

pub mod common;
pub mod density;
pub mod filter;
pub mod grid;
pub mod model;
pub mod models;
pub mod simulate;

// Core types
pub use density::Density;
pub use filter::{FilterOutput, KernelFilter, KernelFilterConfig, PointMassFilter};
pub use grid::Grid;

// Errors
pub use filter::FilterError;

// Model capability traits
pub use model::{NoiseDensityModel, NoiseSamplerModel, StateSpaceModel};

// Randomness
pub use common::rng::{Rng, SimpleRng};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
