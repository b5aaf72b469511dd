// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

/// Default number of tasks that may wait in an actor's queue.
pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

/// Configuration for actor behavior.
#[derive(Debug, Clone)]
pub struct ActorConfig {
	/// Maximum number of admitted but not yet executed tasks. Submitters block
	/// once this many are waiting. Values below 1 are raised to 1.
	///
	/// Default: 1024
	pub queue_capacity: usize,

	/// Name of the worker thread, also used as the `actor` field in logs.
	///
	/// Default: "actor"
	pub name: String,
}

impl Default for ActorConfig {
	fn default() -> Self {
		Self {
			queue_capacity: DEFAULT_QUEUE_CAPACITY,
			name: "actor".to_string(),
		}
	}
}

impl ActorConfig {
	/// Create a new config with default values.
	pub fn new() -> Self {
		Self::default()
	}

	/// Set the queue capacity.
	pub fn queue_capacity(mut self, capacity: usize) -> Self {
		self.queue_capacity = capacity;
		self
	}

	/// Set the worker name.
	pub fn name(mut self, name: impl Into<String>) -> Self {
		self.name = name.into();
		self
	}
}
