// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use parking_lot::Mutex;
use soloist_runtime::{Actor, ActorConfig, ActorHandle, ActorStats};
use tracing::debug;

use super::Strategy;
use crate::error::WorkloadError;

/// Work is shipped to the actor's worker; callers only wait for the result.
pub struct ActorStrategy<S: Send + 'static> {
	handle: ActorHandle<S>,
	// only the lifecycle is behind the lock, submissions go through `handle`
	actor: Mutex<Actor<S>>,
}

impl<S: Send + 'static> ActorStrategy<S> {
	/// Start an actor over `state`.
	pub fn start(state: S, config: ActorConfig) -> Result<Self, WorkloadError> {
		let mut actor = Actor::with_config(state, config);
		actor.start()?;
		let handle = actor.handle()?;
		debug!(actor = actor.name(), capacity = actor.config().queue_capacity, "actor strategy started");
		Ok(Self {
			handle,
			actor: Mutex::new(actor),
		})
	}

	/// Drain and stop the actor. Later calls to `execute` fail with
	/// [`ActorError::Closed`](soloist_runtime::ActorError::Closed).
	pub fn stop(&self) -> Result<(), WorkloadError> {
		Ok(self.actor.lock().stop()?)
	}

	/// Drain and stop the actor if still running, returning its state.
	pub fn into_state(self) -> Result<S, WorkloadError> {
		Ok(self.actor.into_inner().into_state()?)
	}

	pub fn stats(&self) -> ActorStats {
		self.actor.lock().stats()
	}
}

impl<S: Send + 'static> Strategy<S> for ActorStrategy<S> {
	fn name(&self) -> &'static str {
		"actor"
	}

	fn execute<R, F>(&self, work: F) -> Result<R, WorkloadError>
	where
		R: Send + 'static,
		F: FnOnce(&mut S) -> R + Send + 'static,
	{
		Ok(self.handle.submit(work)?.into_result()?)
	}
}
