// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! One-shot result cell linking a submitted task to its caller.
//!
//! A [`Promise`] is written exactly once by the worker; the matching
//! [`TaskFuture`] can be waited on or polled any number of times by the caller.

use std::{
	fmt,
	sync::Arc,
	time::{Duration, Instant},
};

use crate::{
	error::TaskError,
	sync::{Condvar, Mutex},
};

struct Shared<R> {
	slot: Mutex<Option<Result<R, TaskError>>>,
	ready: Condvar,
}

impl<R> Shared<R> {
	fn fulfill(&self, result: Result<R, TaskError>) {
		let mut slot = self.slot.lock();
		if slot.is_none() {
			*slot = Some(result);
		}
		drop(slot);
		self.ready.notify_all();
	}
}

/// Create a linked promise/future pair.
pub fn oneshot<R>() -> (Promise<R>, TaskFuture<R>) {
	let shared = Arc::new(Shared {
		slot: Mutex::new(None),
		ready: Condvar::new(),
	});
	(
		Promise {
			shared: Some(shared.clone()),
		},
		TaskFuture {
			shared,
		},
	)
}

/// Write side of a one-shot result cell.
///
/// Dropping a promise without completing it resolves the future with
/// [`TaskError::Abandoned`].
pub struct Promise<R> {
	shared: Option<Arc<Shared<R>>>,
}

impl<R> Promise<R> {
	pub fn complete(mut self, result: Result<R, TaskError>) {
		if let Some(shared) = self.shared.take() {
			shared.fulfill(result);
		}
	}
}

impl<R> Drop for Promise<R> {
	fn drop(&mut self) {
		if let Some(shared) = self.shared.take() {
			shared.fulfill(Err(TaskError::Abandoned));
		}
	}
}

/// Read side of a one-shot result cell.
///
/// A future that is never inspected never reports its task's error.
pub struct TaskFuture<R> {
	shared: Arc<Shared<R>>,
}

impl<R> TaskFuture<R> {
	pub fn is_completed(&self) -> bool {
		self.shared.slot.lock().is_some()
	}

	/// Block until the task resolves and move its result out.
	pub fn into_result(self) -> Result<R, TaskError> {
		let mut slot = self.shared.slot.lock();
		loop {
			if let Some(result) = slot.take() {
				return result;
			}
			self.shared.ready.wait(&mut slot);
		}
	}
}

impl<R: Clone> TaskFuture<R> {
	/// Block until the task resolves.
	pub fn wait(&self) -> Result<R, TaskError> {
		let mut slot = self.shared.slot.lock();
		loop {
			if let Some(result) = slot.as_ref() {
				return result.clone();
			}
			self.shared.ready.wait(&mut slot);
		}
	}

	/// Block for at most `timeout`; `None` if the task is still pending.
	pub fn wait_timeout(&self, timeout: Duration) -> Option<Result<R, TaskError>> {
		let deadline = Instant::now() + timeout;
		let mut slot = self.shared.slot.lock();
		loop {
			if let Some(result) = slot.as_ref() {
				return Some(result.clone());
			}
			if self.shared.ready.wait_until(&mut slot, deadline).timed_out() {
				return slot.as_ref().cloned();
			}
		}
	}

	/// Poll without blocking.
	pub fn try_get(&self) -> Option<Result<R, TaskError>> {
		self.shared.slot.lock().as_ref().cloned()
	}
}

impl<R> fmt::Debug for TaskFuture<R> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("TaskFuture").field("completed", &self.is_completed()).finish()
	}
}
