//! Configuration errors
//!
//! Generation itself never fails. Every parameter record is validated up
//! front and rejected with a `ConfigError`.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("map {width}x{height} leaves less than {min}x{min} cells inside the border")]
    MapTooSmall { width: i32, height: i32, min: i32 },

    #[error("border of {border} cells does not fit a dimension of {dimension}")]
    BorderTooThick { border: i32, dimension: i32 },

    #[error("{name}: minimum {min} exceeds maximum {max}")]
    InvalidRange { name: &'static str, min: i32, max: i32 },

    #[error("{name} = {value} is outside {min}..={max}")]
    OutOfRange {
        name: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    #[error("{name} must be positive, got {value}")]
    NotPositive { name: &'static str, value: i64 },

    #[error("{name} = {value} is not a probability in [0, 1]")]
    InvalidProbability { name: &'static str, value: f64 },
}

pub(crate) fn check_range(name: &'static str, min: i32, max: i32) -> Result<(), ConfigError> {
    if min > max {
        return Err(ConfigError::InvalidRange { name, min, max });
    }
    Ok(())
}

pub(crate) fn check_bounds(name: &'static str, value: i64, min: i64, max: i64) -> Result<(), ConfigError> {
    if value < min || value > max {
        return Err(ConfigError::OutOfRange { name, value, min, max });
    }
    Ok(())
}

pub(crate) fn check_positive(name: &'static str, value: i64) -> Result<(), ConfigError> {
    if value <= 0 {
        return Err(ConfigError::NotPositive { name, value });
    }
    Ok(())
}

pub(crate) fn check_probability(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::InvalidProbability { name, value });
    }
    Ok(())
}
