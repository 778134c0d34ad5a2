//! Error types for the density recursion engines
//!
//! All error conditions abort the current run and surface a descriptive
//! failure; there are no partial results or retries.

use std::fmt;

/// Errors that can occur while running a density recursion
#[derive(Debug, Clone)]
pub enum FilterError {
    /// All grid-point masses became zero after a normalization step
    /// (empty likelihood support, or every particle gated out)
    DegenerateDensity {
        /// Timestep at which the density collapsed
        timestep: usize,
        /// Which stage of the recursion failed
        context: String,
    },

    /// Invalid grid, sample count, bandwidth, or observation sequence
    Configuration {
        /// Description of the configuration issue
        description: String,
    },

    /// Numerical instability detected (non-finite mass, unstable division)
    NumericalInstability {
        /// Description of the issue
        description: String,
    },
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterError::DegenerateDensity { timestep, context } => {
                write!(
                    f,
                    "Degenerate density at timestep {}: {}",
                    timestep, context
                )
            }
            FilterError::Configuration { description } => {
                write!(f, "Configuration error: {}", description)
            }
            FilterError::NumericalInstability { description } => {
                write!(f, "Numerical instability: {}", description)
            }
        }
    }
}

impl std::error::Error for FilterError {}
