use thiserror::Error;

/// Errors raised before a simulation starts. A lap that fails to finish is
/// reported through the result, not through this type.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("invalid parameter '{name}' = {value}: {reason}")]
    InvalidParameter { name: &'static str, value: f64, reason: &'static str },

    #[error("invalid segment #{index} '{name}': {reason}")]
    InvalidSegment { index: usize, name: String, reason: String },

    #[error("track has no segments")]
    EmptyTrack,

    #[error("segment #{index} starts at {found} m, expected {expected} m")]
    NonContiguous { index: usize, expected: f64, found: f64 },

    #[error("unknown track: {0}")]
    UnknownTrack(String),

    #[error("invalid simulation config '{name}': {reason}")]
    InvalidConfig { name: &'static str, reason: String },

    #[error("unsupported parameter version {found} (supported: {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },
}

pub type SimResult<T> = Result<T, SimError>;

/// Checks `value` is finite and strictly positive.
pub fn ensure_positive(name: &'static str, value: f64) -> SimResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SimError::InvalidParameter { name, value, reason: "must be finite and > 0" })
    }
}

/// Checks `value` is finite and not negative.
pub fn ensure_non_negative(name: &'static str, value: f64) -> SimResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SimError::InvalidParameter { name, value, reason: "must be finite and >= 0" })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_positive() {
        assert!(ensure_positive("mass", 798.0).is_ok());
        assert!(ensure_positive("mass", 0.0).is_err());
        assert!(ensure_positive("mass", f64::NAN).is_err());
        assert!(ensure_positive("mass", f64::INFINITY).is_err());
    }

    #[test]
    fn test_ensure_non_negative() {
        assert!(ensure_non_negative("max_power", 0.0).is_ok());
        assert!(ensure_non_negative("max_power", -1.0).is_err());
    }

    #[test]
    fn test_error_message() {
        let err = SimError::InvalidParameter { name: "mass_empty", value: -1.0, reason: "must be finite and > 0" };
        assert_eq!(err.to_string(), "invalid parameter 'mass_empty' = -1: must be finite and > 0");
    }
}
