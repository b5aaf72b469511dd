// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{fmt, time::Duration};

use clap::{Parser, ValueEnum};
use soloist_runtime::ActorConfig;
use soloist_workload::CallerWorkload;

/// How callers reach the shared map
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyKind {
	/// Submit both mutations to a dedicated actor thread
	Actor,
	/// Lock the map in the caller's thread
	Mutex,
	/// Post both mutations to a serializing strand on a thread pool
	Strand,
}

impl StrategyKind {
	pub fn all() -> [StrategyKind; 3] {
		[StrategyKind::Actor, StrategyKind::Mutex, StrategyKind::Strand]
	}
}

impl fmt::Display for StrategyKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			StrategyKind::Actor => write!(f, "actor"),
			StrategyKind::Mutex => write!(f, "mutex"),
			StrategyKind::Strand => write!(f, "strand"),
		}
	}
}

/// Drive concurrent callers against a shared key/value map
#[derive(Debug, Clone, Parser)]
#[command(name = "soloist-load-test")]
#[command(about = "Compare actor, mutex and strand serialization under concurrent callers")]
#[command(version)]
pub struct LoadTestConfig {
	/// Strategies to run, in order; defaults to all of them
	#[arg(long, value_enum, value_delimiter = ',')]
	pub strategy: Vec<StrategyKind>,

	/// Concurrent caller threads
	#[arg(long, default_value_t = 8)]
	pub callers: usize,

	/// Measured rounds per caller
	#[arg(long, default_value_t = 10_000)]
	pub rounds: usize,

	/// Counters touched by each mutation
	#[arg(long, default_value_t = 10)]
	pub keys: usize,

	/// Simulated I/O between the two mutations, in microseconds
	#[arg(long, default_value_t = 8)]
	pub io_micros: u64,

	/// Actor queue capacity
	#[arg(long, default_value_t = soloist_runtime::actor::DEFAULT_QUEUE_CAPACITY)]
	pub capacity: usize,

	/// Strand pool threads; defaults to the number of CPUs
	#[arg(long)]
	pub strand_threads: Option<usize>,

	/// Unmeasured rounds per caller before measurement starts
	#[arg(long, default_value_t = 1_000)]
	pub warmup_rounds: usize,

	/// Print one JSON report per strategy instead of a table
	#[arg(long)]
	pub json: bool,
}

impl LoadTestConfig {
	pub fn strategies(&self) -> Vec<StrategyKind> {
		if self.strategy.is_empty() {
			StrategyKind::all().to_vec()
		} else {
			self.strategy.clone()
		}
	}

	pub fn workload(&self) -> CallerWorkload {
		CallerWorkload::new().keys(self.keys).io_latency(Duration::from_micros(self.io_micros))
	}

	pub fn actor_config(&self) -> ActorConfig {
		ActorConfig::new().queue_capacity(self.capacity).name("load-test")
	}

	pub fn strand_threads(&self) -> usize {
		self.strand_threads.unwrap_or_else(num_cpus::get)
	}

	/// Value every counter must hold once all rounds, warmup included, are done.
	pub fn expected_count(&self) -> u64 {
		((self.rounds + self.warmup_rounds) * self.callers) as u64 * CallerWorkload::MUTATIONS_PER_ROUND
	}
}
