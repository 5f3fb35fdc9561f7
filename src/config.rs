use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Engine construction options. Validated once, at construction; a bad
/// value is never discovered mid-analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Signals whose raw strength falls below this are dropped as noise.
    /// Range: `[0.0, 1.0]`
    pub minimum_signal_threshold: f64,

    /// Multiplier applied to a signal's raw strength when one of its
    /// anti-patterns matches. Range: `(0.0, 1.0)`
    pub contamination_penalty_factor: f64,

    /// Document-level contamination severity above this triggers a warning
    /// and reduces boundary integrity. Range: `[0.0, 1.0]`
    pub contamination_warning_threshold: f64,

    /// Whether `analyze_conversation` computes turn-level field scores or
    /// degrades to the base analysis.
    pub enable_field_analysis: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            minimum_signal_threshold: 0.2,
            contamination_penalty_factor: 0.5,
            contamination_warning_threshold: 0.3,
            enable_field_analysis: true,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), EngineError> {
        if !(0.0..=1.0).contains(&self.minimum_signal_threshold) {
            return Err(EngineError::InvalidConfig(format!(
                "minimum_signal_threshold must be in [0, 1], got {}",
                self.minimum_signal_threshold
            )));
        }
        if self.contamination_penalty_factor <= 0.0 || self.contamination_penalty_factor >= 1.0 {
            return Err(EngineError::InvalidConfig(format!(
                "contamination_penalty_factor must be in (0, 1), got {}",
                self.contamination_penalty_factor
            )));
        }
        if !(0.0..=1.0).contains(&self.contamination_warning_threshold) {
            return Err(EngineError::InvalidConfig(format!(
                "contamination_warning_threshold must be in [0, 1], got {}",
                self.contamination_warning_threshold
            )));
        }
        Ok(())
    }
}
