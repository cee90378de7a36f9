//! Error types for the FitTrack metrics core

use thiserror::Error;

/// Errors raised by the formulas, record constructors and aggregator
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MetricsError {
    /// A numeric or enumerated field is outside its allowed domain
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The exercise type has no MET value for the given intensity
    #[error("Invalid exercise combination: {exercise_type} at intensity '{intensity}'")]
    InvalidExerciseCombo {
        exercise_type: String,
        intensity: String,
    },

    /// A ratio whose denominator is zero
    #[error("Division by zero: {0}")]
    DivisionByZero(&'static str),
}

impl MetricsError {
    /// Shorthand for an [`MetricsError::InvalidInput`]
    pub fn invalid(message: impl Into<String>) -> Self {
        MetricsError::InvalidInput(message.into())
    }
}

/// Result alias used throughout the shared crate
pub type MetricsResult<T> = Result<T, MetricsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exercise_combo_message_names_both_keys() {
        let err = MetricsError::InvalidExerciseCombo {
            exercise_type: "yoga".to_string(),
            intensity: "extreme".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("yoga"));
        assert!(message.contains("extreme"));
    }
}
