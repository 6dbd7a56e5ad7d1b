//! Period-by-period loan amortization

use super::params::LoanParameters;
use super::schedule::{BalanceTrajectory, ExtraPaymentComparison, LoanScheduleSummary, ScheduleRow};
use crate::error::{ensure_non_negative, Result};

/// Standard amortizing payment for a level-payment loan (no extra payments).
///
/// Returns 0.0 when there are no periods, and falls back to straight-line
/// repayment when the rate is zero or the annuity denominator vanishes.
pub fn periodic_payment(principal: f64, rate_per_period: f64, num_periods: u32) -> f64 {
    if num_periods == 0 {
        return 0.0;
    }
    let n = num_periods as f64;
    if rate_per_period == 0.0 {
        return principal / n;
    }
    let denom = 1.0 - (1.0 + rate_per_period).powf(-n);
    if denom == 0.0 {
        return principal / n;
    }
    principal * (rate_per_period / denom)
}

/// Stateless amortization calculator
pub struct AmortizationEngine;

impl AmortizationEngine {
    /// Remaining-balance trajectory and totals for a loan
    pub fn compute(params: &LoanParameters) -> Result<(BalanceTrajectory, LoanScheduleSummary)> {
        params.validate()?;
        Ok(run_schedule(params, None))
    }

    /// Detailed per-period breakdown of the same schedule `compute` walks
    pub fn schedule(params: &LoanParameters) -> Result<Vec<ScheduleRow>> {
        params.validate()?;
        let mut rows = Vec::with_capacity(params.scheduled_periods() as usize);
        run_schedule(params, Some(&mut rows));
        Ok(rows)
    }

    /// Run the loan with and without an extra per-period payment
    pub fn compare_extra_payment(
        params: &LoanParameters,
        extra_payment: f64,
    ) -> Result<ExtraPaymentComparison> {
        ensure_non_negative("extra_payment", extra_payment)?;
        let (_, baseline) = Self::compute(params)?;
        let (_, accelerated) = Self::compute(&params.with_extra_payment(extra_payment))?;
        Ok(ExtraPaymentComparison::new(extra_payment, baseline, accelerated))
    }
}

/// Walk the schedule, optionally recording each period
fn run_schedule(
    params: &LoanParameters,
    mut rows: Option<&mut Vec<ScheduleRow>>,
) -> (BalanceTrajectory, LoanScheduleSummary) {
    let n = params.scheduled_periods();
    let i = params.periodic_rate();

    let base_payment = periodic_payment(params.principal, i, n);
    let payment = base_payment + params.extra_payment.max(0.0);

    log::trace!(
        "amortizing {:.2} over {} periods at {:.6}/period, payment {:.2}",
        params.principal,
        n,
        i,
        payment
    );

    let mut balance = params.principal;
    let mut trajectory = BalanceTrajectory::with_capacity(balance, n as usize);
    let mut total_paid = 0.0;
    let mut total_interest = 0.0;
    let mut total_principal = 0.0;
    let mut payoff_periods = n;

    for period in 1..=n {
        let interest = balance * i;
        // A payment below the period interest leaves principal untouched
        let principal_paid = (payment - interest).max(0.0);

        if principal_paid >= balance {
            let final_principal = balance;
            let paid_this_period = final_principal + interest;
            balance = 0.0;
            total_paid += paid_this_period;
            total_interest += interest;
            total_principal += final_principal;
            trajectory.push(balance);
            if let Some(rows) = rows.as_deref_mut() {
                rows.push(ScheduleRow {
                    period,
                    payment: paid_this_period,
                    interest,
                    principal: final_principal,
                    balance,
                });
            }
            payoff_periods = period;
            break;
        }

        balance -= principal_paid;
        total_paid += payment;
        total_interest += interest;
        total_principal += principal_paid;
        trajectory.push(balance);
        if let Some(rows) = rows.as_deref_mut() {
            rows.push(ScheduleRow {
                period,
                payment,
                interest,
                principal: principal_paid,
                balance,
            });
        }
    }

    let summary = LoanScheduleSummary {
        total_paid,
        total_interest,
        total_principal,
        periods: n,
        payoff_periods,
    };
    (trajectory, summary)
}
