//! Amortization output structures

use serde::{Deserialize, Serialize};

use super::params::PaymentFrequency;

/// Totals for one amortization run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoanScheduleSummary {
    pub total_paid: f64,
    pub total_interest: f64,
    pub total_principal: f64,

    /// Scheduled periods (term_years x periods per year)
    pub periods: u32,

    /// Period in which the balance actually reached zero
    pub payoff_periods: u32,
}

/// Remaining balance at each period boundary, starting with the principal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BalanceTrajectory(Vec<f64>);

impl BalanceTrajectory {
    pub(crate) fn with_capacity(principal: f64, periods: usize) -> Self {
        let mut balances = Vec::with_capacity(periods + 1);
        balances.push(principal);
        Self(balances)
    }

    pub(crate) fn push(&mut self, balance: f64) {
        self.0.push(balance);
    }

    pub fn balances(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn opening_balance(&self) -> f64 {
        self.0.first().copied().unwrap_or(0.0)
    }

    pub fn final_balance(&self) -> f64 {
        self.0.last().copied().unwrap_or(0.0)
    }

    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }

    /// One `(year, balance)` point per year boundary.
    ///
    /// Years past the end of the trajectory reuse its last value, and output
    /// stops after the first year whose balance is zero.
    pub fn yearly_points(&self, frequency: PaymentFrequency) -> Vec<(u32, f64)> {
        let Some(&opening) = self.0.first() else {
            return Vec::new();
        };
        let per_year = frequency.periods_per_year() as usize;
        let last_index = self.0.len() - 1;
        let years = (last_index + per_year - 1) / per_year;

        let mut points = Vec::with_capacity(years + 1);
        points.push((0, opening));
        for year in 1..=years {
            let balance = self.0[(year * per_year).min(last_index)];
            points.push((year as u32, balance));
            if balance <= 0.0 {
                break;
            }
        }
        points
    }
}

/// A single paid period in a detailed schedule
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRow {
    /// Period number (1-indexed)
    pub period: u32,

    /// Amount paid this period (interest + principal)
    pub payment: f64,
    pub interest: f64,
    pub principal: f64,

    /// Balance remaining after this period
    pub balance: f64,
}

/// Effect of adding an extra per-period payment to a loan
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExtraPaymentComparison {
    pub extra_payment: f64,
    pub baseline: LoanScheduleSummary,
    pub accelerated: LoanScheduleSummary,
    pub interest_saved: f64,
    pub periods_saved: u32,
}

impl ExtraPaymentComparison {
    pub fn new(
        extra_payment: f64,
        baseline: LoanScheduleSummary,
        accelerated: LoanScheduleSummary,
    ) -> Self {
        Self {
            extra_payment,
            baseline,
            accelerated,
            interest_saved: baseline.total_interest - accelerated.total_interest,
            periods_saved: baseline
                .payoff_periods
                .saturating_sub(accelerated.payoff_periods),
        }
    }
}
