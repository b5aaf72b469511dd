// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{any::Any, io};

/// Errors returned by [`BoundedQueue`](crate::queue::BoundedQueue) operations.
///
/// Variants that refuse an item hand it back to the caller.
#[derive(Debug, thiserror::Error)]
pub enum QueueError<T> {
	#[error("queue closed")]
	Closed(T),

	#[error("queue full")]
	Full(T),

	#[error("timed out waiting for an item")]
	Timeout,

	#[error("queue capacity must be at least 1")]
	ZeroCapacity,
}

impl<T> QueueError<T> {
	/// Recover the rejected item, if this error carries one.
	pub fn into_inner(self) -> Option<T> {
		match self {
			QueueError::Closed(item) | QueueError::Full(item) => Some(item),
			QueueError::Timeout | QueueError::ZeroCapacity => None,
		}
	}

	pub fn is_closed(&self) -> bool {
		matches!(self, QueueError::Closed(_))
	}
}

/// Failure of a single task, delivered through its
/// [`TaskFuture`](crate::future::TaskFuture).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TaskError {
	#[error("task failed: {0}")]
	Failed(String),

	#[error("task panicked: {0}")]
	Panicked(String),

	#[error("task was dropped before it produced a result")]
	Abandoned,
}

/// Lifecycle and submission errors of an [`Actor`](crate::actor::Actor).
#[derive(Debug, thiserror::Error)]
pub enum ActorError {
	#[error("actor is not running")]
	NotRunning,

	#[error("actor is already running")]
	AlreadyRunning,

	#[error("actor queue is closed, no further submissions are accepted")]
	Closed,

	#[error("failed to spawn actor worker thread: {0}")]
	Spawn(#[source] io::Error),

	#[error("actor worker thread panicked: {0}")]
	WorkerPanicked(String),

	#[error("actor state was lost by a previous worker")]
	StateLost,
}

/// Extract a readable message from a panic payload.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
	if let Some(msg) = payload.downcast_ref::<&str>() {
		(*msg).to_string()
	} else if let Some(msg) = payload.downcast_ref::<String>() {
		msg.clone()
	} else {
		"unknown panic payload".to_string()
	}
}
