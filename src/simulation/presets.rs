//! Risk-profile presets mapping to expected return and volatility

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Named investment risk profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskProfile {
    Conservative,
    Balanced,
    Growth,
    Aggressive,
}

impl RiskProfile {
    pub const ALL: [RiskProfile; 4] = [
        RiskProfile::Conservative,
        RiskProfile::Balanced,
        RiskProfile::Growth,
        RiskProfile::Aggressive,
    ];

    /// Annualized expected return in percent
    pub fn expected_return_percent(self) -> f64 {
        match self {
            RiskProfile::Conservative => 5.0,
            RiskProfile::Balanced => 7.0,
            RiskProfile::Growth => 8.5,
            RiskProfile::Aggressive => 10.0,
        }
    }

    /// Annualized volatility (standard deviation) in percent
    pub fn volatility_percent(self) -> f64 {
        match self {
            RiskProfile::Conservative => 6.0,
            RiskProfile::Balanced => 10.0,
            RiskProfile::Growth => 14.0,
            RiskProfile::Aggressive => 18.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RiskProfile::Conservative => "conservative",
            RiskProfile::Balanced => "balanced",
            RiskProfile::Growth => "growth",
            RiskProfile::Aggressive => "aggressive",
        }
    }
}

impl Default for RiskProfile {
    fn default() -> Self {
        RiskProfile::Balanced
    }
}

impl fmt::Display for RiskProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for RiskProfile {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "conservative" => Ok(RiskProfile::Conservative),
            "balanced" => Ok(RiskProfile::Balanced),
            "growth" => Ok(RiskProfile::Growth),
            "aggressive" => Ok(RiskProfile::Aggressive),
            _ => Err(EngineError::UnknownRiskProfile(s.to_string())),
        }
    }
}
