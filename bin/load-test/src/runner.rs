// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{panic, thread};

use soloist_workload::{CallerWorkload, KeyValueState, Strategy, caller_round, key_name};
use tracing::{debug, info};

use crate::{
	config::LoadTestConfig,
	error::LoadTestError,
	metrics::{Metrics, MetricsSummary, latency_histogram},
};

/// Warm up, measure, then verify that no counter lost an update.
pub fn run<St>(strategy: &St, config: &LoadTestConfig) -> Result<MetricsSummary, LoadTestError>
where
	St: Strategy<KeyValueState>,
{
	let workload = config.workload();
	let metrics = Metrics::new()?;
	metrics.start();

	if config.warmup_rounds > 0 {
		debug!(strategy = strategy.name(), rounds = config.warmup_rounds, "warming up");
		drive(strategy, &workload, config.callers, config.warmup_rounds, &metrics)?;
	}

	metrics.reset();
	info!(strategy = strategy.name(), callers = config.callers, rounds = config.rounds, "measuring");
	drive(strategy, &workload, config.callers, config.rounds, &metrics)?;
	let summary = metrics.summary();

	// failed rounds may have applied one of their two mutations
	if summary.failed_rounds == 0 {
		verify(strategy, config)?;
	}
	Ok(summary)
}

fn drive<St>(
	strategy: &St,
	workload: &CallerWorkload,
	callers: usize,
	rounds: usize,
	metrics: &Metrics,
) -> Result<(), LoadTestError>
where
	St: Strategy<KeyValueState>,
{
	thread::scope(|scope| {
		let workers: Vec<_> = (0..callers)
			.map(|_| {
				scope.spawn(move || -> Result<(), LoadTestError> {
					let mut histogram = latency_histogram()?;
					for _ in 0..rounds {
						match caller_round(strategy, workload) {
							Ok(elapsed) => {
								let micros = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX);
								histogram.saturating_record(micros.max(1));
								metrics.record_success_count_only();
							}
							Err(err) => metrics.record_error(&err.to_string()),
						}
					}
					metrics.merge_histogram(&histogram);
					Ok(())
				})
			})
			.collect();

		workers.into_iter().try_for_each(|worker| match worker.join() {
			Ok(result) => result,
			Err(payload) => panic::resume_unwind(payload),
		})
	})
}

fn verify<St>(strategy: &St, config: &LoadTestConfig) -> Result<(), LoadTestError>
where
	St: Strategy<KeyValueState>,
{
	let state = strategy.snapshot()?;
	let expected = config.expected_count();
	for i in 0..config.keys {
		let key = key_name(i);
		let actual = state.get(&key);
		if actual.and_then(|v| v.parse::<u64>().ok()) != Some(expected) {
			return Err(LoadTestError::LostUpdates {
				strategy: strategy.name(),
				key,
				expected,
				actual: actual.cloned(),
			});
		}
	}
	debug!(strategy = strategy.name(), keys = config.keys, expected, "final state verified");
	Ok(())
}

#[cfg(test)]
mod tests {
	use clap::Parser;
	use soloist_workload::MutexStrategy;

	use super::*;

	fn config(args: &[&str]) -> LoadTestConfig {
		LoadTestConfig::parse_from(std::iter::once("soloist-load-test").chain(args.iter().copied()))
	}

	#[test]
	fn test_run_counts_measured_rounds_only() {
		let config = config(&["--callers", "4", "--rounds", "25", "--warmup-rounds", "5", "--io-micros", "1"]);
		let strategy = MutexStrategy::new(KeyValueState::new());

		let summary = run(&strategy, &config).unwrap();
		assert_eq!(summary.total_rounds, 100);
		assert_eq!(summary.failed_rounds, 0);
		assert!(summary.latency_max_us >= summary.latency_min_us);
	}

	#[test]
	fn test_verify_detects_lost_updates() {
		let config = config(&["--callers", "1", "--rounds", "1", "--warmup-rounds", "0", "--keys", "2"]);
		let mut state = KeyValueState::new();
		state.insert(key_name(0), "2".to_string());
		state.insert(key_name(1), "1".to_string());
		let strategy = MutexStrategy::new(state);

		let err = verify(&strategy, &config).unwrap_err();
		assert!(matches!(err, LoadTestError::LostUpdates { ref key, expected: 2, .. } if key == "key-1"));
	}
}
