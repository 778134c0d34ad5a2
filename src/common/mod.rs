//! Low-level utilities: random number generation and evaluation metrics

pub mod metrics;
pub mod rng;
