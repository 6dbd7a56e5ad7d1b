//! finproj CLI
//!
//! Command-line interface for running loan, rate and Monte Carlo calculations.
//! Pass --json for machine-readable output.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use finproj::loan::{remaining_periods, ScheduleRow};
use finproj::{
    AmortizationEngine, EngineDefaults, GoalInputs, LoanParameters, LoanScheduleSummary,
    MonteCarloParameters, MonteCarloProjector, MonteCarloResult, PaymentFrequency,
    RateEstimationInputs, RateEstimator, RetirementInputs, RiskProfile, ScenarioRunner,
};

#[derive(Parser)]
#[command(name = "finproj", version, about = "Loan amortization, rate estimation and Monte Carlo projections")]
struct Cli {
    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Amortize a loan and summarize payoff
    Amortize {
        #[arg(long)]
        principal: f64,
        /// Annual rate in percent
        #[arg(long)]
        rate: f64,
        #[arg(long)]
        years: u32,
        #[arg(long, default_value = "monthly")]
        frequency: PaymentFrequency,
        /// Extra principal paid each period
        #[arg(long, default_value_t = 0.0)]
        extra: f64,
        /// Write the per-period schedule to this CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Estimate the annual rate implied by a fixed payment
    EstimateRate {
        #[arg(long)]
        principal: f64,
        #[arg(long)]
        payment: f64,
        /// Number of monthly payments
        #[arg(long)]
        periods: u32,
        #[arg(long)]
        tolerance: Option<f64>,
        #[arg(long)]
        max_iterations: Option<u32>,
    },
    /// Monte Carlo projection of a savings balance
    MonteCarlo {
        #[arg(long, default_value_t = 0.0)]
        initial: f64,
        #[arg(long, default_value_t = 0.0)]
        monthly: f64,
        #[arg(long)]
        years: u32,
        /// Preset used when --return or --volatility is omitted
        #[arg(long, default_value = "balanced")]
        profile: RiskProfile,
        /// Expected annual return in percent
        #[arg(long = "return")]
        expected_return: Option<f64>,
        /// Annual volatility in percent
        #[arg(long)]
        volatility: Option<f64>,
        #[arg(long)]
        simulations: Option<u32>,
        #[arg(long)]
        target: Option<f64>,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Project a salary-funded retirement balance
    Retirement {
        #[arg(long)]
        current_age: u32,
        #[arg(long)]
        retirement_age: u32,
        #[arg(long, default_value_t = 0.0)]
        balance: f64,
        #[arg(long)]
        salary: f64,
        #[arg(long, default_value_t = 11.5)]
        employer_rate: f64,
        #[arg(long, default_value_t = 0.0)]
        personal_rate: f64,
        #[arg(long, default_value = "balanced")]
        profile: RiskProfile,
        #[arg(long)]
        target: Option<f64>,
        #[arg(long)]
        simulations: Option<u32>,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Probability of reaching a savings goal
    Goal {
        #[arg(long)]
        amount: f64,
        #[arg(long, default_value_t = 0.0)]
        savings: f64,
        #[arg(long, default_value_t = 0.0)]
        monthly: f64,
        #[arg(long)]
        years: u32,
        #[arg(long, default_value = "balanced")]
        profile: RiskProfile,
        #[arg(long)]
        simulations: Option<u32>,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// List risk-profile presets
    Presets,
}

#[derive(Serialize)]
struct AmortizationReport {
    loan: LoanParameters,
    summary: LoanScheduleSummary,
    yearly_balances: Vec<(u32, f64)>,
}

#[derive(Serialize)]
struct RateReport {
    inputs: RateEstimationInputs,
    annual_rate_percent: f64,
}

#[derive(Serialize)]
struct PresetRow {
    profile: RiskProfile,
    expected_return_percent: f64,
    volatility_percent: f64,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let defaults = EngineDefaults::from_env();

    match cli.command {
        Command::Amortize {
            principal,
            rate,
            years,
            frequency,
            extra,
            csv,
        } => {
            let loan = LoanParameters {
                principal,
                annual_rate_percent: rate,
                term_years: years,
                payment_frequency: frequency,
                extra_payment: extra,
            };
            let (trajectory, summary) = AmortizationEngine::compute(&loan)?;

            if let Some(path) = &csv {
                let rows = AmortizationEngine::schedule(&loan)?;
                write_schedule_csv(path, &rows)?;
                log::info!("wrote {} schedule rows to {}", rows.len(), path.display());
            }

            let report = AmortizationReport {
                yearly_balances: trajectory.yearly_points(frequency),
                loan,
                summary,
            };
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_amortization(&report);
                if extra > 0.0 {
                    let baseline = report.loan.with_extra_payment(0.0);
                    let cmp = AmortizationEngine::compare_extra_payment(&baseline, extra)?;
                    println!();
                    println!(
                        "Extra {:.2}/period saves {:.2} interest and {} periods",
                        extra, cmp.interest_saved, cmp.periods_saved
                    );
                }
                if let Some(path) = &csv {
                    println!("\nSchedule written to: {}", path.display());
                }
            }
        }

        Command::EstimateRate {
            principal,
            payment,
            periods,
            tolerance,
            max_iterations,
        } => {
            let inputs = RateEstimationInputs::new(principal, payment, periods);
            let annual_rate_percent = RateEstimator::estimate_with(
                &inputs,
                tolerance.unwrap_or(defaults.rate_tolerance),
                max_iterations.unwrap_or(defaults.rate_max_iterations),
            );
            if cli.json {
                let report = RateReport { inputs, annual_rate_percent };
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else if annual_rate_percent > 0.0 {
                println!("Implied annual rate: {:.2}%", annual_rate_percent);
                let frequency = PaymentFrequency::Monthly;
                if let Some(n) = remaining_periods(principal, payment, annual_rate_percent, frequency) {
                    println!("  Check: {:.1} payments of {:.2} repay {:.2}", n, payment, principal);
                }
            } else {
                println!("Could not infer a rate from these inputs");
            }
        }

        Command::MonteCarlo {
            initial,
            monthly,
            years,
            profile,
            expected_return,
            volatility,
            simulations,
            target,
            seed,
        } => {
            let params = MonteCarloParameters {
                initial_value: initial,
                monthly_contribution: monthly,
                years,
                expected_return_percent: expected_return.unwrap_or(profile.expected_return_percent()),
                volatility_percent: volatility.unwrap_or(profile.volatility_percent()),
                num_simulations: simulations.unwrap_or(defaults.num_simulations),
                target_value: target,
                seed: seed.or(defaults.seed),
            };
            let result = MonteCarloProjector::project(&params)?;
            emit_projection(&result, cli.json)?;
        }

        Command::Retirement {
            current_age,
            retirement_age,
            balance,
            salary,
            employer_rate,
            personal_rate,
            profile,
            target,
            simulations,
            seed,
        } => {
            let inputs = RetirementInputs {
                current_age,
                retirement_age,
                current_balance: balance,
                annual_salary: salary,
                employer_contribution_rate: employer_rate,
                personal_contribution_rate: personal_rate,
                risk_profile: profile,
                target_balance: target,
                num_simulations: simulations,
                seed,
            };
            let result = ScenarioRunner::with_defaults(defaults).run_retirement(&inputs)?;
            emit_projection(&result, cli.json)?;
        }

        Command::Goal {
            amount,
            savings,
            monthly,
            years,
            profile,
            simulations,
            seed,
        } => {
            let inputs = GoalInputs {
                goal_amount: amount,
                current_savings: savings,
                monthly_savings: monthly,
                timeline_years: years,
                risk_profile: profile,
                num_simulations: simulations,
                seed,
            };
            let result = ScenarioRunner::with_defaults(defaults).run_goal(&inputs)?;
            emit_projection(&result, cli.json)?;
        }

        Command::Presets => {
            let rows: Vec<PresetRow> = RiskProfile::ALL
                .iter()
                .map(|&profile| PresetRow {
                    profile,
                    expected_return_percent: profile.expected_return_percent(),
                    volatility_percent: profile.volatility_percent(),
                })
                .collect();
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                println!("{:<14} {:>8} {:>11}", "Profile", "Return", "Volatility");
                for row in &rows {
                    println!(
                        "{:<14} {:>7.1}% {:>10.1}%",
                        row.profile, row.expected_return_percent, row.volatility_percent
                    );
                }
            }
        }
    }

    Ok(())
}

fn print_amortization(report: &AmortizationReport) {
    let loan = &report.loan;
    let s = &report.summary;
    println!(
        "Loan: {:.2} at {:.2}% over {} years ({})",
        loan.principal, loan.annual_rate_percent, loan.term_years, loan.payment_frequency
    );
    println!("  Scheduled periods: {}", s.periods);
    println!("  Payoff period:     {}", s.payoff_periods);
    println!("  Total paid:        {:.2}", s.total_paid);
    println!("  Total interest:    {:.2}", s.total_interest);
    println!("  Total principal:   {:.2}", s.total_principal);
    println!();
    println!("{:>5} {:>14}", "Year", "Balance");
    println!("{}", "-".repeat(20));
    for (year, balance) in &report.yearly_balances {
        println!("{:>5} {:>14.2}", year, balance);
    }
}

fn write_schedule_csv(path: &Path, rows: &[ScheduleRow]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("unable to create {}", path.display()))?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn emit_projection(result: &MonteCarloResult, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
        return Ok(());
    }

    println!(
        "Monte Carlo: {} simulations, {:.1}% return, {:.1}% volatility",
        result.num_simulations, result.expected_return, result.volatility
    );
    println!(
        "  Start {:.2} + {:.2}/month",
        result.initial_value, result.monthly_contribution
    );
    println!();
    println!(
        "{:>4} {:>14} {:>14} {:>14} {:>14} {:>14}",
        "Year", "P10", "P25", "P50", "P75", "P90"
    );
    println!("{}", "-".repeat(80));
    for (i, year) in result.years.iter().enumerate() {
        println!(
            "{:>4} {:>14.2} {:>14.2} {:>14.2} {:>14.2} {:>14.2}",
            year,
            result.percentile_10[i],
            result.percentile_25[i],
            result.percentile_50[i],
            result.percentile_75[i],
            result.percentile_90[i],
        );
    }
    println!();
    println!("  Final median: {:.2}", result.final_median);
    println!("  Final mean:   {:.2}", result.final_mean);
    if let Some(target) = result.target_value {
        println!(
            "  Probability of reaching {:.2}: {:.1}%",
            target, result.probability_of_success
        );
    }
    Ok(())
}
