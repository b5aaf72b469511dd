// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Condvar synchronization primitive.

use std::time::Instant;

use crate::sync::mutex::MutexGuard;

/// Result of a timed wait on a condition variable.
pub struct WaitTimeoutResult {
	timed_out: bool,
}

impl WaitTimeoutResult {
	/// Returns whether the wait timed out.
	#[inline]
	pub fn timed_out(&self) -> bool {
		self.timed_out
	}
}

/// A condition variable for coordinating threads.
///
/// Waiters may wake spuriously; callers re-check their predicate in a loop.
#[derive(Debug)]
pub struct Condvar {
	inner: parking_lot::Condvar,
}

impl Condvar {
	/// Creates a new condition variable.
	#[inline]
	pub fn new() -> Self {
		Self {
			inner: parking_lot::Condvar::new(),
		}
	}

	/// Blocks the current thread until notified.
	#[inline]
	pub fn wait<'a, T>(&self, guard: &mut MutexGuard<'a, T>) {
		self.inner.wait(&mut guard.inner);
	}

	/// Blocks the current thread until notified or the deadline passes.
	#[inline]
	pub fn wait_until<'a, T>(&self, guard: &mut MutexGuard<'a, T>, deadline: Instant) -> WaitTimeoutResult {
		let timed_out = self.inner.wait_until(&mut guard.inner, deadline).timed_out();
		WaitTimeoutResult {
			timed_out,
		}
	}

	/// Wakes up one blocked thread.
	#[inline]
	pub fn notify_one(&self) {
		self.inner.notify_one();
	}

	/// Wakes up all blocked threads.
	#[inline]
	pub fn notify_all(&self) {
		self.inner.notify_all();
	}
}
