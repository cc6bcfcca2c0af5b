//! Error types
//!
//! Kinematics, track queries and lap validation are total functions; only race
//! setup and configuration loading can fail.

use thiserror::Error;

/// Race setup failures (caller contract violations)
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    #[error("cannot start a race before a track has been generated")]
    NoTrack,
    #[error("player count {requested} is outside 1..={max}")]
    InvalidPlayerCount { requested: usize, max: usize },
}

/// Configuration loading and validation failures
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} = {value} is outside [{min}, {max}]")]
    RangeViolation {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    /// Check `value` against an inclusive range, naming the offending field
    pub(crate) fn check_range(
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    ) -> Result<(), Self> {
        if value.is_finite() && value >= min && value <= max {
            Ok(())
        } else {
            Err(Self::RangeViolation {
                field,
                value,
                min,
                max,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_range() {
        assert!(ConfigError::check_range("x", 1.0, 0.0, 2.0).is_ok());
        assert!(ConfigError::check_range("x", 2.0, 0.0, 2.0).is_ok());
        let err = ConfigError::check_range("x", 3.0, 0.0, 2.0).unwrap_err();
        assert_eq!(err.to_string(), "x = 3 is outside [0, 2]");
        assert!(ConfigError::check_range("x", f64::NAN, 0.0, 2.0).is_err());
    }

    #[test]
    fn test_sim_error_messages() {
        let err = SimError::InvalidPlayerCount {
            requested: 3,
            max: 2,
        };
        assert_eq!(err.to_string(), "player count 3 is outside 1..=2");
    }
}
