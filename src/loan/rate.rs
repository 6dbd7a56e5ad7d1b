//! Implied interest rate estimation
//!
//! Inverts the annuity payment formula by bisection to recover the annual rate
//! behind a known fixed payment.

use super::params::{PaymentFrequency, RateEstimationInputs};
use crate::config::{DEFAULT_RATE_MAX_ITERATIONS, DEFAULT_RATE_TOLERANCE};

/// Initial lower search bound: 0.0001% annual, as a monthly rate
const LOW_MONTHLY_RATE: f64 = 0.0001 / 100.0 / 12.0;

/// Initial upper search bound: 50% annual, as a monthly rate
const HIGH_MONTHLY_RATE: f64 = 50.0 / 100.0 / 12.0;

/// Widened upper bound tried once: 100% annual, as a monthly rate
const WIDENED_HIGH_MONTHLY_RATE: f64 = 100.0 / 100.0 / 12.0;

/// Bisection-based rate solver
pub struct RateEstimator;

impl RateEstimator {
    /// Estimate with the default tolerance (1e-4) and iteration cap (100)
    pub fn estimate(inputs: &RateEstimationInputs) -> f64 {
        Self::estimate_with(inputs, DEFAULT_RATE_TOLERANCE, DEFAULT_RATE_MAX_ITERATIONS)
    }

    /// Annual rate in percent, rounded to 2 decimals.
    ///
    /// Returns 0.0 whenever no rate can be inferred: non-positive inputs, a
    /// payment stream that repays no more than the principal, or a payment the
    /// search bounds cannot bracket.
    pub fn estimate_with(inputs: &RateEstimationInputs, tolerance: f64, max_iterations: u32) -> f64 {
        let RateEstimationInputs {
            principal,
            payment,
            term_periods,
        } = *inputs;

        if !is_positive(principal) || !is_positive(payment) || term_periods == 0 {
            return 0.0;
        }

        // No interest could have accrued
        if payment * term_periods as f64 <= principal {
            return 0.0;
        }

        let calculate_payment = |monthly_rate: f64| annuity_payment(principal, monthly_rate, term_periods);

        let mut low = LOW_MONTHLY_RATE;
        let mut high = HIGH_MONTHLY_RATE;

        let brackets = |low: f64, high: f64| {
            payment >= calculate_payment(low) && payment <= calculate_payment(high)
        };

        if !brackets(low, high) {
            high = WIDENED_HIGH_MONTHLY_RATE;
            if !brackets(low, high) {
                log::debug!(
                    "rate not bracketed: principal={} payment={} periods={}",
                    principal,
                    payment,
                    term_periods
                );
                return 0.0;
            }
        }

        let mut mid = (low + high) / 2.0;
        for _ in 0..max_iterations {
            mid = (low + high) / 2.0;
            let computed = calculate_payment(mid);

            if (computed - payment).abs() < tolerance {
                break;
            }

            if computed < payment {
                low = mid;
            } else {
                high = mid;
            }
        }

        round_to_hundredths(mid * 12.0 * 100.0)
    }
}

/// Payment on an annuity at `monthly_rate` over `term_periods` periods
fn annuity_payment(principal: f64, monthly_rate: f64, term_periods: u32) -> f64 {
    if monthly_rate <= 0.0 {
        return principal / term_periods as f64;
    }
    let growth = (1.0 + monthly_rate).powi(term_periods as i32);
    principal * monthly_rate * growth / (growth - 1.0)
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Periods needed to repay `principal` at a fixed `payment`.
///
/// Returns `None` when the payment does not exceed the first period's
/// interest (the loan never amortizes) or inputs are non-positive.
pub fn remaining_periods(
    principal: f64,
    payment: f64,
    annual_rate_percent: f64,
    frequency: PaymentFrequency,
) -> Option<f64> {
    if !is_positive(principal) || !is_positive(payment) {
        return None;
    }
    let rate = annual_rate_percent.max(0.0) / 100.0 / frequency.periods_per_year() as f64;
    if rate == 0.0 {
        return Some(principal / payment);
    }
    if payment <= principal * rate {
        return None;
    }
    Some(-(1.0 - principal * rate / payment).ln() / (1.0 + rate).ln())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loan::amortization::periodic_payment;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_round_trip_recovers_rate() {
        for (principal, annual_rate, n) in [
            (10_000.0, 5.0, 120u32),
            (250_000.0, 6.25, 360),
            (15_000.0, 12.0, 60),
            (5_000.0, 0.5, 24),
            (40_000.0, 35.0, 48),
        ] {
            let payment = periodic_payment(principal, annual_rate / 100.0 / 12.0, n);
            let estimated = RateEstimator::estimate(&RateEstimationInputs::new(principal, payment, n));
            assert_abs_diff_eq!(estimated, annual_rate, epsilon = 0.011);
        }
    }

    #[test]
    fn test_emi_example() {
        // 10k repaid at 1000/month for a year implies about 35.07% annual
        let rate = RateEstimator::estimate(&RateEstimationInputs::new(10_000.0, 1_000.0, 12));
        assert_abs_diff_eq!(rate, 35.07, epsilon = 0.011);
    }

    #[test]
    fn test_no_interest_returns_zero() {
        let inputs = RateEstimationInputs::new(12_000.0, 1_000.0, 12);
        assert_eq!(RateEstimator::estimate(&inputs), 0.0);
        let inputs = RateEstimationInputs::new(12_000.0, 900.0, 12);
        assert_eq!(RateEstimator::estimate(&inputs), 0.0);
    }

    #[test]
    fn test_non_positive_inputs_return_zero() {
        assert_eq!(RateEstimator::estimate(&RateEstimationInputs::new(0.0, 100.0, 12)), 0.0);
        assert_eq!(RateEstimator::estimate(&RateEstimationInputs::new(1_000.0, -5.0, 12)), 0.0);
        assert_eq!(RateEstimator::estimate(&RateEstimationInputs::new(1_000.0, 100.0, 0)), 0.0);
        assert_eq!(RateEstimator::estimate(&RateEstimationInputs::new(f64::NAN, 100.0, 12)), 0.0);
    }

    #[test]
    fn test_widened_bound_reaches_high_rates() {
        // 75% annual sits between the first and the widened upper bound
        let payment = periodic_payment(10_000.0, 0.75 / 12.0, 36);
        let rate = RateEstimator::estimate(&RateEstimationInputs::new(10_000.0, payment, 36));
        assert_abs_diff_eq!(rate, 75.0, epsilon = 0.011);
    }

    #[test]
    fn test_unbracketable_payment_returns_zero() {
        // Implies well over 100% annual
        let payment = periodic_payment(10_000.0, 2.0 / 12.0, 36);
        let rate = RateEstimator::estimate(&RateEstimationInputs::new(10_000.0, payment, 36));
        assert_eq!(rate, 0.0);
    }

    #[test]
    fn test_iteration_cap_still_returns_estimate() {
        let payment = periodic_payment(10_000.0, 0.05 / 12.0, 120);
        let rate = RateEstimator::estimate_with(&RateEstimationInputs::new(10_000.0, payment, 120), 1e-12, 3);
        assert!(rate > 0.0 && rate < 50.0);
    }

    #[test]
    fn test_remaining_periods() {
        let payment = periodic_payment(10_000.0, 0.05 / 12.0, 120);
        let n = remaining_periods(10_000.0, payment, 5.0, PaymentFrequency::Monthly).unwrap();
        assert_abs_diff_eq!(n, 120.0, epsilon = 1e-6);

        assert_eq!(remaining_periods(1_200.0, 100.0, 0.0, PaymentFrequency::Monthly), Some(12.0));
        // Payment equal to interest never repays
        assert_eq!(remaining_periods(12_000.0, 50.0, 5.0, PaymentFrequency::Monthly), None);
        assert_eq!(remaining_periods(0.0, 50.0, 5.0, PaymentFrequency::Monthly), None);
    }
}
