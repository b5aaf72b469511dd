// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

mod config;
mod error;
mod metrics;
mod runner;

use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;
use soloist_workload::{ActorStrategy, KeyValueState, MutexStrategy, StrandStrategy};
use tracing::error;
use tracing_subscriber::EnvFilter;

use crate::{
	config::{LoadTestConfig, StrategyKind},
	error::LoadTestError,
	metrics::MetricsSummary,
};

#[derive(Serialize)]
struct Report<'a> {
	strategy: String,
	callers: usize,
	rounds: usize,
	keys: usize,
	io_micros: u64,
	#[serde(flatten)]
	summary: &'a MetricsSummary,
}

fn main() -> ExitCode {
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
		.with_writer(std::io::stderr)
		.init();

	let config = LoadTestConfig::parse();
	match run_all(&config) {
		Ok(()) => ExitCode::SUCCESS,
		Err(err) => {
			error!(%err, "load test failed");
			ExitCode::FAILURE
		}
	}
}

fn run_all(config: &LoadTestConfig) -> Result<(), LoadTestError> {
	for kind in config.strategies() {
		let summary = match kind {
			StrategyKind::Actor => {
				let strategy = ActorStrategy::start(KeyValueState::new(), config.actor_config())?;
				let summary = runner::run(&strategy, config)?;
				strategy.into_state()?;
				summary
			}
			StrategyKind::Mutex => runner::run(&MutexStrategy::new(KeyValueState::new()), config)?,
			StrategyKind::Strand => {
				let strategy = StrandStrategy::new(KeyValueState::new(), config.strand_threads())?;
				runner::run(&strategy, config)?
			}
		};
		report(kind, config, &summary)?;
	}
	Ok(())
}

fn report(kind: StrategyKind, config: &LoadTestConfig, summary: &MetricsSummary) -> Result<(), LoadTestError> {
	if config.json {
		let report = Report {
			strategy: kind.to_string(),
			callers: config.callers,
			rounds: config.rounds,
			keys: config.keys,
			io_micros: config.io_micros,
			summary,
		};
		println!("{}", serde_json::to_string(&report)?);
		return Ok(());
	}

	println!("== {kind} ==");
	println!(
		"  rounds:      {} ok, {} failed ({:.2}%)",
		summary.successful_rounds,
		summary.failed_rounds,
		summary.error_rate()
	);
	println!("  duration:    {:.3}s", summary.duration_secs);
	println!("  throughput:  {:.0} rounds/s", summary.throughput);
	println!(
		"  latency us:  min {} avg {:.1} p50 {} p90 {} p99 {} p99.9 {} max {}",
		summary.latency_min_us,
		summary.latency_avg_us,
		summary.latency_p50_us,
		summary.latency_p90_us,
		summary.latency_p99_us,
		summary.latency_p999_us,
		summary.latency_max_us
	);
	for (message, count) in &summary.top_errors {
		println!("  error x{count}: {message}");
	}
	Ok(())
}
