// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Dedicated worker thread that owns an actor's state.
//!
//! The worker implements a simple blocking run loop:
//! 1. Receive the state from the controlling thread
//! 2. Loop: block on the queue, run the task against the state
//! 3. On end-of-stream (queue closed and drained) hand the state back
//!
//! The state only travels to the worker after the thread has been spawned, so
//! a failed spawn leaves it with the caller.

use std::{
	io,
	sync::Arc,
	thread::{self, JoinHandle},
};

use crossbeam_channel::Receiver;
use tracing::{debug, trace, warn};

use super::{Shared, task::Task};
use crate::queue::BoundedQueue;

pub(crate) fn spawn<S: Send + 'static>(
	queue: Arc<BoundedQueue<Task<S>>>,
	shared: Arc<Shared>,
	handoff: Receiver<S>,
) -> io::Result<JoinHandle<Option<S>>> {
	thread::Builder::new().name(shared.name.clone()).spawn(move || {
		let Ok(mut state) = handoff.recv() else {
			debug!(actor = %shared.name, "worker never received its state, exiting");
			return None;
		};

		debug!(actor = %shared.name, "worker starting");
		let _guard = CloseOnUnwind {
			queue: queue.as_ref(),
			name: &shared.name,
		};
		run_loop(&mut state, &queue, &shared);
		debug!(actor = %shared.name, "worker stopped");

		Some(state)
	})
}

/// Runs until the queue reports end-of-stream. Tasks execute one at a time in
/// admission order, which is what keeps the state consistent without a lock.
fn run_loop<S>(state: &mut S, queue: &BoundedQueue<Task<S>>, shared: &Shared) {
	while let Some(task) = queue.get() {
		let id = task.id();
		match task.run(state) {
			Ok(()) => {
				shared.stats.record_completed();
				trace!(actor = %shared.name, task = id, "task completed");
			}
			Err(err) => {
				shared.stats.record_failed();
				warn!(actor = %shared.name, task = id, error = %err, "task failed");
			}
		}
	}
	debug!(actor = %shared.name, "queue closed and drained");
}

/// Closes the queue if the worker unwinds, so submitters fail with
/// `Closed` instead of waiting on a queue nobody reads. Tasks still queued
/// are dropped, resolving their futures with `Abandoned`.
struct CloseOnUnwind<'a, T> {
	queue: &'a BoundedQueue<T>,
	name: &'a str,
}

impl<T> Drop for CloseOnUnwind<'_, T> {
	fn drop(&mut self) {
		if !thread::panicking() {
			return;
		}
		self.queue.close();
		let mut abandoned = 0usize;
		while let Some(task) = self.queue.get() {
			drop(task);
			abandoned += 1;
		}
		warn!(actor = %self.name, abandoned, "worker unwound, queue closed");
	}
}
