// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use soloist_workload::WorkloadError;

#[derive(Debug, thiserror::Error)]
pub enum LoadTestError {
	#[error(transparent)]
	Workload(#[from] WorkloadError),

	#[error("failed to create latency histogram: {0}")]
	Histogram(#[from] hdrhistogram::CreationError),

	#[error("failed to encode report: {0}")]
	Json(#[from] serde_json::Error),

	#[error("{strategy}: counter {key} holds {actual:?}, expected {expected}")]
	LostUpdates {
		strategy: &'static str,
		key: String,
		expected: u64,
		actual: Option<String>,
	},
}
