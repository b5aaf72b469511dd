// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{convert::Infallible, fmt::Display, sync::Arc};

use tracing::trace;

use super::{ActorPhase, Shared, task::Task};
use crate::{
	error::ActorError,
	future::{TaskFuture, oneshot},
	queue::BoundedQueue,
};

/// Cloneable submitter for a running actor.
///
/// Handles can be moved to any number of caller threads. A handle stays bound
/// to the run it was taken from: once that run is stopped every submission
/// fails with [`ActorError::Closed`], even if the actor is started again.
pub struct ActorHandle<S> {
	queue: Arc<BoundedQueue<Task<S>>>,
	shared: Arc<Shared>,
}

impl<S> Clone for ActorHandle<S> {
	fn clone(&self) -> Self {
		Self {
			queue: self.queue.clone(),
			shared: self.shared.clone(),
		}
	}
}

impl<S: Send + 'static> ActorHandle<S> {
	pub(crate) fn new(queue: Arc<BoundedQueue<Task<S>>>, shared: Arc<Shared>) -> Self {
		Self {
			queue,
			shared,
		}
	}

	/// Queue `work` for execution against the actor's state.
	///
	/// Blocks while the queue is full, then returns without waiting for the
	/// work to run.
	pub fn submit<R, F>(&self, work: F) -> Result<TaskFuture<R>, ActorError>
	where
		R: Send + 'static,
		F: FnOnce(&mut S) -> R + Send + 'static,
	{
		self.submit_fallible(move |state| Ok::<R, Infallible>(work(state)))
	}

	/// Like [`submit`](Self::submit), for work that can fail. An `Err`
	/// resolves the future with [`TaskError::Failed`](crate::error::TaskError::Failed).
	pub fn submit_fallible<R, E, F>(&self, work: F) -> Result<TaskFuture<R>, ActorError>
	where
		R: Send + 'static,
		E: Display + 'static,
		F: FnOnce(&mut S) -> Result<R, E> + Send + 'static,
	{
		let (promise, future) = oneshot();
		let id = self.shared.next_task_id();

		match self.queue.add(Task::new(id, work, promise)) {
			Ok(()) => {
				self.shared.stats.record_submitted();
				trace!(actor = %self.shared.name, task = id, "task admitted");
				Ok(future)
			}
			Err(_) => {
				self.shared.stats.record_rejected();
				trace!(actor = %self.shared.name, task = id, "task rejected, queue closed");
				Err(ActorError::Closed)
			}
		}
	}

	pub fn phase(&self) -> ActorPhase {
		self.shared.phase()
	}

	/// Whether this handle can no longer submit.
	pub fn is_closed(&self) -> bool {
		self.queue.is_closed()
	}

	/// Number of admitted tasks not yet picked up by the worker.
	pub fn pending(&self) -> usize {
		self.queue.len()
	}

	pub(crate) fn close(&self) -> bool {
		self.queue.close()
	}
}
