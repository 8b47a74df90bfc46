//! Design, cascade and configuration error types

use thiserror::Error;

/// Result type for filter design operations
pub type DesignResult<T> = Result<T, DesignError>;

/// Errors that can occur while designing a filter.
///
/// Every variant carries the offending value so the caller can correct the
/// request. None of them is recovered internally.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DesignError {
    /// Order is zero or above the configured maximum
    #[error("Invalid order {order}: must be between 1 and {max}")]
    InvalidOrder { order: usize, max: usize },

    /// Passband ripple is not a usable positive value
    #[error("Invalid ripple {ripple_db} dB: {reason}")]
    InvalidRipple { ripple_db: f64, reason: &'static str },

    /// Shelf gain is NaN or infinite
    #[error("Invalid gain {gain_db} dB: must be finite")]
    InvalidGain { gain_db: f64 },

    /// A frequency (or the sample rate) is outside its admissible range
    #[error("Invalid {parameter} {value} Hz: must lie in (0, {limit}) Hz")]
    InvalidFrequency {
        parameter: &'static str,
        value: f64,
        limit: f64,
    },

    /// Band does not fit between DC and Nyquist
    #[error("Invalid bandwidth {width} Hz around {center} Hz: must be below {limit} Hz")]
    InvalidBandwidth { center: f64, width: f64, limit: f64 },

    /// Digitized design has a pole on or outside the unit circle, or its gain
    /// cannot be normalized
    #[error("Design unstable: {reason} (magnitude {magnitude})")]
    DesignUnstable { magnitude: f64, reason: &'static str },
}

impl DesignError {
    /// Check if this error stems from caller input rather than numerics
    pub fn is_input_error(&self) -> bool {
        !matches!(self, DesignError::DesignUnstable { .. })
    }
}

/// Errors raised when building a cascade from raw coefficients
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CascadeError {
    /// a0 is zero so the section cannot be normalized
    #[error("Leading denominator coefficient must be non-zero")]
    ZeroLeadingDenominator,

    /// More sections than the fixed storage holds
    #[error("Cascade holds {count} sections, capacity is {capacity}")]
    TooManySections { count: usize, capacity: usize },
}

/// Errors raised by configuration loading and validation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Configuration file or named preset not found
    #[error("Config not found: {0}")]
    NotFound(String),

    /// Failed to read or write the configuration file
    #[error("Failed to access config: {0}")]
    Io(String),

    /// Failed to parse or serialize configuration
    #[error("Failed to parse config: {0}")]
    Parse(String),

    /// Configuration value out of range
    #[error("Invalid config: {0}")]
    Validation(String),
}
