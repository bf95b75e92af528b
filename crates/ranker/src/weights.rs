//! Blend weight configuration.
//!
//! The two engine weights are validated once, at construction, and are
//! immutable afterwards. An invalid pair is fatal: there is no sensible
//! blended score to compute from weights that do not form a convex
//! combination.

use thiserror::Error;

/// How far the weight sum may drift from 1.0
const SUM_TOLERANCE: f64 = 1e-6;

/// Invalid blend weight configuration. Never recovered; construction fails.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// A weight was negative
    #[error("Weight '{name}' must be non-negative, got {value}")]
    NegativeWeight { name: &'static str, value: f64 },

    /// The weights do not sum to 1.0 within tolerance
    #[error("Weights must sum to 1.0, got {sum}")]
    UnnormalizedWeights { sum: f64 },
}

/// Validated pair of engine weights summing to 1.0.
#[derive(Debug, Clone, Copy)]
pub struct BlendWeights {
    collaborative: f64,
    content: f64,
}

impl BlendWeights {
    /// Validate and construct a weight pair.
    ///
    /// Both weights must be non-negative and sum to 1.0 within 1e-6.
    pub fn new(collaborative: f64, content: f64) -> Result<Self, ConfigError> {
        if collaborative < 0.0 {
            return Err(ConfigError::NegativeWeight {
                name: "collaborative",
                value: collaborative,
            });
        }
        if content < 0.0 {
            return Err(ConfigError::NegativeWeight {
                name: "content",
                value: content,
            });
        }
        let sum = collaborative + content;
        if (sum - 1.0).abs() > SUM_TOLERANCE {
            return Err(ConfigError::UnnormalizedWeights { sum });
        }
        Ok(Self {
            collaborative,
            content,
        })
    }

    pub fn collaborative(&self) -> f64 {
        self.collaborative
    }

    pub fn content(&self) -> f64 {
        self.content
    }
}

impl Default for BlendWeights {
    /// The standard 60/40 split favoring behavioral signal
    fn default() -> Self {
        Self {
            collaborative: 0.6,
            content: 0.4,
        }
    }
}
