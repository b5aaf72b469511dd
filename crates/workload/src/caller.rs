// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! The caller side of the pattern: two serialized mutations around an
//! independent latency-bound step that runs in parallel with other callers.

use std::time::{Duration, Instant};

use crate::{
	cpu::{KeyValueState, simulate_cpu},
	error::WorkloadError,
	strategy::Strategy,
	timed_wait::timed_wait,
};

/// Shape of one caller round.
#[derive(Debug, Clone)]
pub struct CallerWorkload {
	/// Counters touched by each mutation.
	///
	/// Default: 10
	pub keys: usize,

	/// Simulated I/O between the two mutations.
	///
	/// Default: 8µs
	pub io_latency: Duration,
}

impl Default for CallerWorkload {
	fn default() -> Self {
		Self {
			keys: 10,
			io_latency: Duration::from_micros(8),
		}
	}
}

impl CallerWorkload {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn keys(mut self, keys: usize) -> Self {
		self.keys = keys;
		self
	}

	pub fn io_latency(mut self, latency: Duration) -> Self {
		self.io_latency = latency;
		self
	}

	/// Increments each counter receives per round.
	pub const MUTATIONS_PER_ROUND: u64 = 2;
}

/// Run one round against `strategy` and return its wall-clock duration.
pub fn caller_round<St>(strategy: &St, workload: &CallerWorkload) -> Result<Duration, WorkloadError>
where
	St: Strategy<KeyValueState>,
{
	let start = Instant::now();
	let keys = workload.keys;

	strategy.execute(move |state| simulate_cpu(state, keys))?;
	timed_wait(workload.io_latency);
	strategy.execute(move |state| simulate_cpu(state, keys))?;

	Ok(start.elapsed())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::strategy::MutexStrategy;

	#[test]
	fn test_round_mutates_twice() {
		let strategy = MutexStrategy::new(KeyValueState::new());
		let workload = CallerWorkload::new().keys(3).io_latency(Duration::from_micros(50));

		let elapsed = caller_round(&strategy, &workload).unwrap();
		assert!(elapsed >= workload.io_latency);

		let state = strategy.into_state();
		assert_eq!(state.len(), 3);
		assert!(state.values().all(|v| v == "2"));
	}
}
