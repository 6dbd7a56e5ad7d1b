//! Run a batch of Monte Carlo projections from a JSON file
//!
//! Input is a JSON array of Monte Carlo parameter objects. Projections run in
//! parallel and results are written to stdout as a JSON array in input order.
//! Set FINPROJ_SEED to fix the seed of every request that does not carry one.

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use finproj::{MonteCarloParameters, MonteCarloResult, ScenarioRunner};

#[derive(Parser)]
#[command(name = "finproj-batch", about = "Run Monte Carlo projections from a JSON request file")]
struct Args {
    /// JSON file holding an array of projection requests
    input: PathBuf,

    /// Pretty-print the output
    #[arg(long)]
    pretty: bool,
}

#[derive(Serialize)]
struct BatchEntry {
    index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<MonteCarloResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
struct BatchResponse {
    request_count: usize,
    failed: usize,
    execution_time_ms: u64,
    results: Vec<BatchEntry>,
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let start = Instant::now();

    let file = File::open(&args.input)
        .with_context(|| format!("unable to open {}", args.input.display()))?;
    let requests: Vec<MonteCarloParameters> = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("invalid request file {}", args.input.display()))?;

    log::info!("loaded {} requests in {:?}", requests.len(), start.elapsed());

    let runner = ScenarioRunner::from_env();
    let results: Vec<BatchEntry> = runner
        .run_batch(&requests)
        .into_iter()
        .enumerate()
        .map(|(index, outcome)| match outcome {
            Ok(result) => BatchEntry {
                index,
                result: Some(result),
                error: None,
            },
            Err(err) => {
                log::warn!("request {} rejected: {}", index, err);
                BatchEntry {
                    index,
                    result: None,
                    error: Some(err.to_string()),
                }
            }
        })
        .collect();

    let response = BatchResponse {
        request_count: requests.len(),
        failed: results.iter().filter(|r| r.error.is_some()).count(),
        execution_time_ms: start.elapsed().as_millis() as u64,
        results,
    };

    let output = if args.pretty {
        serde_json::to_string_pretty(&response)?
    } else {
        serde_json::to_string(&response)?
    };
    println!("{}", output);
    Ok(())
}
