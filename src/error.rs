//! Error types shared by all calculators

use thiserror::Error;

/// Structural input errors.
///
/// Only malformed inputs are reported here. Numeric outcomes that are merely
/// unfavourable (an unresolvable rate, a payment below the period interest)
/// resolve to a well-defined value instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// A numeric parameter is outside its valid domain
    #[error("invalid parameter `{name}` = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// Payment frequency text that does not map to weekly/fortnightly/monthly
    #[error("unrecognized payment frequency: {0:?}")]
    UnknownFrequency(String),

    /// Risk profile text that does not match a preset
    #[error("unrecognized risk profile: {0:?}")]
    UnknownRiskProfile(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;

impl EngineError {
    pub(crate) fn invalid(name: &'static str, value: f64, reason: &'static str) -> Self {
        EngineError::InvalidParameter { name, value, reason }
    }
}

/// Require a finite, strictly positive value
pub(crate) fn ensure_positive(name: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(EngineError::invalid(name, value, "must be finite"));
    }
    if value <= 0.0 {
        return Err(EngineError::invalid(name, value, "must be greater than zero"));
    }
    Ok(())
}

/// Require a finite, non-negative value
pub(crate) fn ensure_non_negative(name: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(EngineError::invalid(name, value, "must be finite"));
    }
    if value < 0.0 {
        return Err(EngineError::invalid(name, value, "must not be negative"));
    }
    Ok(())
}

/// Require a finite value of any sign
pub(crate) fn ensure_finite(name: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(EngineError::invalid(name, value, "must be finite"));
    }
    Ok(())
}
