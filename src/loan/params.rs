//! Loan input records

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ensure_non_negative, ensure_positive, EngineError, Result};

/// Longest loan term accepted by `LoanParameters::validate`
pub const MAX_TERM_YEARS: u32 = 100;

/// How often repayments are made
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentFrequency {
    Weekly,
    Fortnightly,
    Monthly,
}

impl PaymentFrequency {
    /// Repayment periods in one year
    pub fn periods_per_year(self) -> u32 {
        match self {
            PaymentFrequency::Weekly => 52,
            PaymentFrequency::Fortnightly => 26,
            PaymentFrequency::Monthly => 12,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PaymentFrequency::Weekly => "weekly",
            PaymentFrequency::Fortnightly => "fortnightly",
            PaymentFrequency::Monthly => "monthly",
        }
    }
}

impl Default for PaymentFrequency {
    fn default() -> Self {
        PaymentFrequency::Monthly
    }
}

impl fmt::Display for PaymentFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for PaymentFrequency {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "weekly" => Ok(PaymentFrequency::Weekly),
            "fortnightly" => Ok(PaymentFrequency::Fortnightly),
            "monthly" => Ok(PaymentFrequency::Monthly),
            _ => Err(EngineError::UnknownFrequency(s.to_string())),
        }
    }
}

/// Terms of an amortizing loan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanParameters {
    /// Amount borrowed
    pub principal: f64,

    /// Nominal annual rate in percent (5.0 = 5%)
    pub annual_rate_percent: f64,

    /// Scheduled term in whole years
    pub term_years: u32,

    #[serde(default)]
    pub payment_frequency: PaymentFrequency,

    /// Additional principal paid every period on top of the scheduled payment
    #[serde(default)]
    pub extra_payment: f64,
}

impl LoanParameters {
    pub fn new(
        principal: f64,
        annual_rate_percent: f64,
        term_years: u32,
        payment_frequency: PaymentFrequency,
    ) -> Self {
        Self {
            principal,
            annual_rate_percent,
            term_years,
            payment_frequency,
            extra_payment: 0.0,
        }
    }

    /// Same loan with a different per-period extra payment
    pub fn with_extra_payment(&self, extra_payment: f64) -> Self {
        Self {
            extra_payment,
            ..self.clone()
        }
    }

    /// Total scheduled periods (term_years x periods per year)
    pub fn scheduled_periods(&self) -> u32 {
        self.term_years
            .saturating_mul(self.payment_frequency.periods_per_year())
    }

    /// Interest rate applied each period, as a decimal
    pub fn periodic_rate(&self) -> f64 {
        self.annual_rate_percent.max(0.0) / 100.0
            / self.payment_frequency.periods_per_year() as f64
    }

    pub fn validate(&self) -> Result<()> {
        ensure_positive("principal", self.principal)?;
        ensure_non_negative("annual_rate_percent", self.annual_rate_percent)?;
        if self.term_years < 1 {
            return Err(EngineError::invalid(
                "term_years",
                self.term_years as f64,
                "must be at least 1",
            ));
        }
        let within_cap = self
            .term_years
            .checked_mul(self.payment_frequency.periods_per_year())
            .is_some_and(|_| self.term_years <= MAX_TERM_YEARS);
        if !within_cap {
            return Err(EngineError::invalid(
                "term_years",
                self.term_years as f64,
                "exceeds the 100 year maximum",
            ));
        }
        ensure_non_negative("extra_payment", self.extra_payment)?;
        Ok(())
    }
}

/// Inputs for inferring the rate behind a known fixed payment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateEstimationInputs {
    pub principal: f64,

    /// Fixed periodic payment (e.g. an EMI)
    pub payment: f64,

    /// Number of payment periods, not years
    pub term_periods: u32,
}

impl RateEstimationInputs {
    pub fn new(principal: f64, payment: f64, term_periods: u32) -> Self {
        Self {
            principal,
            payment,
            term_periods,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frequency_mapping() {
        assert_eq!(PaymentFrequency::Weekly.periods_per_year(), 52);
        assert_eq!(PaymentFrequency::Fortnightly.periods_per_year(), 26);
        assert_eq!(PaymentFrequency::Monthly.periods_per_year(), 12);
    }

    #[test]
    fn test_frequency_parse() {
        assert_eq!(" Weekly ".parse::<PaymentFrequency>().unwrap(), PaymentFrequency::Weekly);
        assert_eq!("fortnightly".parse::<PaymentFrequency>().unwrap(), PaymentFrequency::Fortnightly);
        assert_eq!(
            "quarterly".parse::<PaymentFrequency>(),
            Err(EngineError::UnknownFrequency("quarterly".to_string()))
        );
    }

    #[test]
    fn test_scheduled_periods_and_rate() {
        let loan = LoanParameters::new(10_000.0, 5.2, 3, PaymentFrequency::Weekly);
        assert_eq!(loan.scheduled_periods(), 156);
        assert!((loan.periodic_rate() - 0.001).abs() < 1e-12);
    }

    #[test]
    fn test_validation() {
        let loan = LoanParameters::new(10_000.0, 5.0, 10, PaymentFrequency::Monthly);
        assert!(loan.validate().is_ok());

        let mut bad = loan.clone();
        bad.principal = 0.0;
        assert!(matches!(
            bad.validate(),
            Err(EngineError::InvalidParameter { name: "principal", .. })
        ));

        let mut bad = loan.clone();
        bad.annual_rate_percent = -1.0;
        assert!(matches!(
            bad.validate(),
            Err(EngineError::InvalidParameter { name: "annual_rate_percent", .. })
        ));

        let mut bad = loan.clone();
        bad.term_years = 0;
        assert!(matches!(
            bad.validate(),
            Err(EngineError::InvalidParameter { name: "term_years", .. })
        ));

        assert!(loan.with_extra_payment(-5.0).validate().is_err());
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let loan: LoanParameters = serde_json::from_str(
            r#"{"principal": 5000, "annual_rate_percent": 4.5, "term_years": 2}"#,
        )
        .unwrap();
        assert_eq!(loan.payment_frequency, PaymentFrequency::Monthly);
        assert_eq!(loan.extra_payment, 0.0);

        let weekly: LoanParameters = serde_json::from_str(
            r#"{"principal": 5000, "annual_rate_percent": 4.5, "term_years": 2, "payment_frequency": "weekly"}"#,
        )
        .unwrap();
        assert_eq!(weekly.payment_frequency, PaymentFrequency::Weekly);
    }
}
