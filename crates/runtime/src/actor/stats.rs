// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::atomic::{AtomicU64, Ordering};

/// Point-in-time view of an actor's task counters.
///
/// A future can resolve before its task is counted; counts are exact once
/// [`Actor::stop`](crate::actor::Actor::stop) has returned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActorStats {
	/// Tasks admitted to the queue.
	pub submitted: u64,
	/// Tasks that ran and returned a value.
	pub completed: u64,
	/// Tasks that returned an error or panicked.
	pub failed: u64,
	/// Submissions refused because the queue was closed.
	pub rejected: u64,
}

impl ActorStats {
	/// Tasks admitted but not yet finished.
	pub fn in_flight(&self) -> u64 {
		self.submitted.saturating_sub(self.completed + self.failed)
	}
}

/// Counters survive restarts; they describe the actor, not one worker.
#[derive(Default)]
pub(crate) struct Counters {
	submitted: AtomicU64,
	completed: AtomicU64,
	failed: AtomicU64,
	rejected: AtomicU64,
}

impl Counters {
	pub(crate) fn record_submitted(&self) {
		self.submitted.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_completed(&self) {
		self.completed.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_failed(&self) {
		self.failed.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_rejected(&self) {
		self.rejected.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn snapshot(&self) -> ActorStats {
		ActorStats {
			submitted: self.submitted.load(Ordering::Relaxed),
			completed: self.completed.load(Ordering::Relaxed),
			failed: self.failed.load(Ordering::Relaxed),
			rejected: self.rejected.load(Ordering::Relaxed),
		}
	}
}
