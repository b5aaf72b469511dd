// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	collections::HashMap,
	sync::atomic::{AtomicU64, Ordering},
	time::Instant,
};

use hdrhistogram::{CreationError, Histogram};
use parking_lot::Mutex;
use serde::Serialize;

/// Lowest and highest trackable round latency in microseconds, 3 significant figures.
const LATENCY_MIN_US: u64 = 1;
const LATENCY_MAX_US: u64 = 60_000_000;
const LATENCY_SIGFIG: u8 = 3;

/// Histogram with the bounds used for every caller.
pub fn latency_histogram() -> Result<Histogram<u64>, CreationError> {
	Histogram::new_with_bounds(LATENCY_MIN_US, LATENCY_MAX_US, LATENCY_SIGFIG)
}

/// Metrics collector for caller rounds
pub struct Metrics {
	// Atomic counters for fast path
	pub total_rounds: AtomicU64,
	pub successful_rounds: AtomicU64,
	pub failed_rounds: AtomicU64,

	// Per-caller histograms are merged in here once a caller finishes
	latency_histogram: Mutex<Histogram<u64>>,

	start_time: Mutex<Option<Instant>>,

	error_counts: Mutex<HashMap<String, u64>>,
}

impl Metrics {
	pub fn new() -> Result<Self, CreationError> {
		Ok(Self {
			total_rounds: AtomicU64::new(0),
			successful_rounds: AtomicU64::new(0),
			failed_rounds: AtomicU64::new(0),
			latency_histogram: Mutex::new(latency_histogram()?),
			start_time: Mutex::new(None),
			error_counts: Mutex::new(HashMap::new()),
		})
	}

	/// Start the throughput timer
	pub fn start(&self) {
		*self.start_time.lock() = Some(Instant::now());
	}

	/// Record a successful round whose latency lives in a per-caller histogram
	pub fn record_success_count_only(&self) {
		self.successful_rounds.fetch_add(1, Ordering::Relaxed);
		self.total_rounds.fetch_add(1, Ordering::Relaxed);
	}

	/// Merge a caller's histogram into the global histogram
	pub fn merge_histogram(&self, other: &Histogram<u64>) {
		// both sides share the same bounds, so adding cannot fail
		let _ = self.latency_histogram.lock().add(other);
	}

	/// Record a failed round
	pub fn record_error(&self, error: &str) {
		self.failed_rounds.fetch_add(1, Ordering::Relaxed);
		self.total_rounds.fetch_add(1, Ordering::Relaxed);

		let error_key: String = if error.chars().count() > 100 {
			let truncated: String = error.chars().take(97).collect();
			format!("{truncated}...")
		} else {
			error.to_string()
		};

		*self.error_counts.lock().entry(error_key).or_insert(0) += 1;
	}

	/// Reset metrics for a new run (e.g., after warmup)
	pub fn reset(&self) {
		self.total_rounds.store(0, Ordering::Relaxed);
		self.successful_rounds.store(0, Ordering::Relaxed);
		self.failed_rounds.store(0, Ordering::Relaxed);
		self.latency_histogram.lock().reset();
		self.error_counts.lock().clear();
		*self.start_time.lock() = Some(Instant::now());
	}

	/// Generate a summary of the metrics
	pub fn summary(&self) -> MetricsSummary {
		let histogram = self.latency_histogram.lock();
		let duration = self.start_time.lock().map(|s| s.elapsed()).unwrap_or_default();
		let total = self.total_rounds.load(Ordering::Relaxed);
		let successful = self.successful_rounds.load(Ordering::Relaxed);
		let failed = self.failed_rounds.load(Ordering::Relaxed);

		let duration_secs = duration.as_secs_f64();
		let throughput = if duration_secs > 0.0 {
			total as f64 / duration_secs
		} else {
			0.0
		};

		MetricsSummary {
			total_rounds: total,
			successful_rounds: successful,
			failed_rounds: failed,
			duration_secs,
			throughput,
			latency_min_us: histogram.min(),
			latency_max_us: histogram.max(),
			latency_avg_us: histogram.mean(),
			latency_p50_us: histogram.value_at_quantile(0.50),
			latency_p90_us: histogram.value_at_quantile(0.90),
			latency_p99_us: histogram.value_at_quantile(0.99),
			latency_p999_us: histogram.value_at_quantile(0.999),
			top_errors: self.top_errors(5),
		}
	}

	fn top_errors(&self, n: usize) -> Vec<(String, u64)> {
		let errors = self.error_counts.lock();
		let mut sorted: Vec<_> = errors.iter().map(|(k, v)| (k.clone(), *v)).collect();
		sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
		sorted.truncate(n);
		sorted
	}
}

/// Summary of one measured run
#[derive(Debug, Serialize)]
pub struct MetricsSummary {
	pub total_rounds: u64,
	pub successful_rounds: u64,
	pub failed_rounds: u64,
	pub duration_secs: f64,
	/// Rounds per second
	pub throughput: f64,
	pub latency_min_us: u64,
	pub latency_max_us: u64,
	pub latency_avg_us: f64,
	pub latency_p50_us: u64,
	pub latency_p90_us: u64,
	pub latency_p99_us: u64,
	pub latency_p999_us: u64,
	pub top_errors: Vec<(String, u64)>,
}

impl MetricsSummary {
	/// Get the error rate as a percentage
	pub fn error_rate(&self) -> f64 {
		if self.total_rounds > 0 {
			(self.failed_rounds as f64 / self.total_rounds as f64) * 100.0
		} else {
			0.0
		}
	}
}
