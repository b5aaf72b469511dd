// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Single-owner actor.
//!
//! An [`Actor`] owns a piece of mutable state and a dedicated worker thread.
//! Callers never touch the state directly: they submit closures that the
//! worker runs one at a time, in admission order, against `&mut S`.
//!
//! # Lifecycle
//!
//! 1. [`Actor::new`] - idle actor holding the initial state
//! 2. [`Actor::start`] - spawn the worker and hand it the state
//! 3. [`Actor::submit`] / [`ActorHandle::submit`] - queue work, get a [`TaskFuture`]
//! 4. [`Actor::stop`] - close the queue, drain it, join the worker, take the state back
//!
//! `start` and `stop` take `&mut self`, so only the controlling owner can
//! drive the lifecycle. Caller threads use cloned [`ActorHandle`]s.
//!
//! # Example
//!
//! ```
//! use std::collections::HashMap;
//!
//! use soloist_runtime::Actor;
//!
//! let mut actor = Actor::new(HashMap::<String, u64>::new());
//! actor.start().unwrap();
//!
//! let future = actor
//! 	.submit(|map| {
//! 		*map.entry("hits".to_string()).or_insert(0) += 1;
//! 		map["hits"]
//! 	})
//! 	.unwrap();
//! assert_eq!(future.wait(), Ok(1));
//!
//! actor.stop().unwrap();
//! assert_eq!(actor.state().unwrap()["hits"], 1);
//! ```

mod config;
mod handle;
mod stats;
mod task;
mod worker;

use std::{
	fmt::Display,
	sync::{
		Arc,
		atomic::{AtomicU8, AtomicU64, Ordering},
	},
	thread::JoinHandle,
};

pub use config::{ActorConfig, DEFAULT_QUEUE_CAPACITY};
pub use handle::ActorHandle;
pub use stats::ActorStats;
use stats::Counters;
use tracing::{debug, warn};

use crate::{
	error::{ActorError, panic_message},
	future::TaskFuture,
	queue::BoundedQueue,
};

/// Where an actor is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorPhase {
	/// No worker; the state is held by the [`Actor`] value.
	Stopped,
	/// Worker running, submissions accepted.
	Running,
	/// Queue closed; the worker is finishing the backlog.
	Draining,
}

impl ActorPhase {
	fn from_u8(value: u8) -> Self {
		match value {
			1 => ActorPhase::Running,
			2 => ActorPhase::Draining,
			_ => ActorPhase::Stopped,
		}
	}

	fn as_u8(self) -> u8 {
		match self {
			ActorPhase::Stopped => 0,
			ActorPhase::Running => 1,
			ActorPhase::Draining => 2,
		}
	}
}

/// State shared between the actor, its handles and its worker.
pub(crate) struct Shared {
	pub(crate) name: String,
	pub(crate) stats: Counters,
	phase: AtomicU8,
	next_id: AtomicU64,
}

impl Shared {
	fn new(name: String) -> Self {
		Self {
			name,
			stats: Counters::default(),
			phase: AtomicU8::new(ActorPhase::Stopped.as_u8()),
			next_id: AtomicU64::new(0),
		}
	}

	pub(crate) fn phase(&self) -> ActorPhase {
		ActorPhase::from_u8(self.phase.load(Ordering::Acquire))
	}

	fn set_phase(&self, phase: ActorPhase) {
		self.phase.store(phase.as_u8(), Ordering::Release);
		debug!(actor = %self.name, ?phase, "actor phase changed");
	}

	pub(crate) fn next_task_id(&self) -> u64 {
		self.next_id.fetch_add(1, Ordering::Relaxed)
	}
}

struct Running<S> {
	handle: ActorHandle<S>,
	worker: JoinHandle<Option<S>>,
}

/// Owns a state value and the worker thread that serializes access to it.
pub struct Actor<S: Send + 'static> {
	config: ActorConfig,
	shared: Arc<Shared>,
	state: Option<S>,
	running: Option<Running<S>>,
	/// A run has been stopped; submissions now hit a closed queue.
	closed: bool,
}

impl<S: Send + 'static> Actor<S> {
	/// Create an idle actor with the default configuration.
	pub fn new(state: S) -> Self {
		Self::with_config(state, ActorConfig::default())
	}

	pub fn with_config(state: S, config: ActorConfig) -> Self {
		let shared = Arc::new(Shared::new(config.name.clone()));
		Self {
			config,
			shared,
			state: Some(state),
			running: None,
			closed: false,
		}
	}

	/// Spawn the worker thread and move the state onto it.
	///
	/// Fails with [`ActorError::Spawn`] if the OS refuses the thread; the
	/// state then stays with the actor and `start` may be retried.
	pub fn start(&mut self) -> Result<(), ActorError> {
		if self.running.is_some() {
			return Err(ActorError::AlreadyRunning);
		}
		let state = self.state.take().ok_or(ActorError::StateLost)?;

		let queue = Arc::new(BoundedQueue::new(self.config.queue_capacity));
		let (handoff_tx, handoff_rx) = crossbeam_channel::bounded(1);

		let worker = match worker::spawn(queue.clone(), self.shared.clone(), handoff_rx) {
			Ok(worker) => worker,
			Err(err) => {
				self.state = Some(state);
				return Err(ActorError::Spawn(err));
			}
		};

		if let Err(crossbeam_channel::SendError(state)) = handoff_tx.send(state) {
			self.state = Some(state);
			queue.close();
			let _ = worker.join();
			return Err(ActorError::WorkerPanicked("worker exited before receiving its state".to_string()));
		}

		self.running = Some(Running {
			handle: ActorHandle::new(queue, self.shared.clone()),
			worker,
		});
		self.shared.set_phase(ActorPhase::Running);
		debug!(actor = %self.shared.name, capacity = self.config.queue_capacity, "actor started");
		Ok(())
	}

	/// Close the queue, let the worker drain everything already admitted, and
	/// join it. Every future handed out before this call is resolved when it
	/// returns.
	pub fn stop(&mut self) -> Result<(), ActorError> {
		let running = self.running.take().ok_or(ActorError::NotRunning)?;

		self.shared.set_phase(ActorPhase::Draining);
		running.handle.close();

		let joined = running.worker.join();
		self.closed = true;
		self.shared.set_phase(ActorPhase::Stopped);

		match joined {
			Ok(Some(state)) => {
				self.state = Some(state);
				debug!(actor = %self.shared.name, "actor stopped");
				Ok(())
			}
			Ok(None) => Err(ActorError::StateLost),
			Err(payload) => Err(ActorError::WorkerPanicked(panic_message(payload.as_ref()))),
		}
	}

	/// Queue `work` against the state. See [`ActorHandle::submit`].
	///
	/// Fails with [`ActorError::NotRunning`] before the first `start` and with
	/// [`ActorError::Closed`] once a run has been stopped.
	pub fn submit<R, F>(&self, work: F) -> Result<TaskFuture<R>, ActorError>
	where
		R: Send + 'static,
		F: FnOnce(&mut S) -> R + Send + 'static,
	{
		self.running()?.handle.submit(work)
	}

	/// Queue fallible `work` against the state. See [`ActorHandle::submit_fallible`].
	pub fn submit_fallible<R, E, F>(&self, work: F) -> Result<TaskFuture<R>, ActorError>
	where
		R: Send + 'static,
		E: Display + 'static,
		F: FnOnce(&mut S) -> Result<R, E> + Send + 'static,
	{
		self.running()?.handle.submit_fallible(work)
	}

	/// A cloneable submitter for caller threads.
	pub fn handle(&self) -> Result<ActorHandle<S>, ActorError> {
		Ok(self.running()?.handle.clone())
	}

	pub fn phase(&self) -> ActorPhase {
		self.shared.phase()
	}

	pub fn is_running(&self) -> bool {
		self.running.is_some()
	}

	pub fn name(&self) -> &str {
		&self.shared.name
	}

	pub fn config(&self) -> &ActorConfig {
		&self.config
	}

	pub fn stats(&self) -> ActorStats {
		self.shared.stats.snapshot()
	}

	/// The state, while no worker owns it.
	pub fn state(&self) -> Option<&S> {
		self.state.as_ref()
	}

	/// Mutable state, while no worker owns it.
	pub fn state_mut(&mut self) -> Option<&mut S> {
		self.state.as_mut()
	}

	/// Stop if running, then give up the state.
	pub fn into_state(mut self) -> Result<S, ActorError> {
		if self.running.is_some() {
			self.stop()?;
		}
		self.state.take().ok_or(ActorError::StateLost)
	}

	fn running(&self) -> Result<&Running<S>, ActorError> {
		match &self.running {
			Some(running) => Ok(running),
			None if self.closed => Err(ActorError::Closed),
			None => Err(ActorError::NotRunning),
		}
	}
}

impl<S: Send + 'static> Drop for Actor<S> {
	fn drop(&mut self) {
		if self.running.is_some() {
			if let Err(err) = self.stop() {
				warn!(actor = %self.shared.name, error = %err, "failed to stop actor on drop");
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use std::{
		collections::HashMap,
		sync::atomic::{AtomicUsize, Ordering},
		thread,
		time::Duration,
	};

	use std::convert::Infallible;

	use soloist_testing::wait_for;

	use super::*;
	use crate::error::TaskError;

	#[test]
	fn test_submit_before_start_is_rejected() {
		let actor = Actor::new(0u32);
		assert!(matches!(actor.submit(|n| *n += 1), Err(ActorError::NotRunning)));
		assert!(matches!(actor.handle(), Err(ActorError::NotRunning)));
		assert_eq!(actor.phase(), ActorPhase::Stopped);
	}

	#[test]
	fn test_stop_without_start_is_not_running() {
		let mut actor = Actor::new(0u32);
		assert!(matches!(actor.stop(), Err(ActorError::NotRunning)));
		assert!(matches!(actor.submit(|n| *n), Err(ActorError::NotRunning)));
	}

	#[test]
	fn test_stop_twice() {
		let mut actor = Actor::new(0u32);
		actor.start().unwrap();
		actor.stop().unwrap();
		assert!(matches!(actor.stop(), Err(ActorError::NotRunning)));
	}

	#[test]
	fn test_start_twice() {
		let mut actor = Actor::new(0u32);
		actor.start().unwrap();
		assert!(matches!(actor.start(), Err(ActorError::AlreadyRunning)));
		actor.stop().unwrap();
	}

	#[test]
	fn test_state_returns_after_stop() {
		let mut actor = Actor::new(Vec::<u32>::new());
		assert!(actor.state().is_some());

		actor.start().unwrap();
		assert!(actor.state().is_none(), "worker owns the state while running");
		assert_eq!(actor.phase(), ActorPhase::Running);

		for i in 0..10 {
			actor.submit(move |v| v.push(i)).unwrap();
		}
		actor.stop().unwrap();

		assert_eq!(actor.phase(), ActorPhase::Stopped);
		assert_eq!(actor.state().unwrap(), &(0..10).collect::<Vec<_>>());
	}

	#[test]
	fn test_restart_keeps_state() {
		let mut actor = Actor::new(0u64);
		actor.start().unwrap();
		actor.submit(|n| *n += 5).unwrap();
		let old_handle = actor.handle().unwrap();
		actor.stop().unwrap();

		*actor.state_mut().unwrap() += 1;

		actor.start().unwrap();
		assert_eq!(actor.submit(|n| *n).unwrap().wait(), Ok(6));
		assert!(matches!(old_handle.submit(|n| *n), Err(ActorError::Closed)));
		assert_eq!(actor.into_state().unwrap(), 6);
	}

	#[test]
	fn test_panicking_task_does_not_kill_worker() {
		let mut actor = Actor::new(HashMap::<String, i64>::new());
		actor.start().unwrap();

		let first = actor.submit(|m| m.insert("a".to_string(), 1)).unwrap();
		let boom = actor.submit(|_m| -> () { panic!("task blew up") }).unwrap();
		let after = actor.submit(|m| m.get("a").copied()).unwrap();

		assert_eq!(first.wait(), Ok(None));
		assert_eq!(boom.wait(), Err(TaskError::Panicked("task blew up".to_string())));
		assert_eq!(after.wait(), Ok(Some(1)));

		actor.stop().unwrap();
		let stats = actor.stats();
		assert_eq!(stats.submitted, 3);
		assert_eq!(stats.completed, 2);
		assert_eq!(stats.failed, 1);
		assert_eq!(stats.in_flight(), 0);
	}

	struct LoudError;

	impl Display for LoudError {
		fn fmt(&self, _f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
			panic!("display exploded")
		}
	}

	#[test]
	fn test_panicking_error_display_does_not_kill_worker() {
		let mut actor = Actor::new(0u32);
		actor.start().unwrap();

		let bad = actor.submit_fallible(|_| Err::<(), _>(LoudError)).unwrap();
		let next = actor.submit(|n| {
			*n += 1;
			*n
		})
		.unwrap();

		assert_eq!(bad.wait(), Err(TaskError::Panicked("display exploded".to_string())));
		assert_eq!(next.wait_timeout(Duration::from_secs(5)), Some(Ok(1)));
		assert!(!actor.handle().unwrap().is_closed());

		actor.stop().unwrap();
		actor.start().unwrap();
		assert_eq!(actor.submit(|n| *n).unwrap().wait(), Ok(1));
		actor.stop().unwrap();
		assert_eq!(actor.stats().failed, 1);
	}

	#[test]
	fn test_fallible_task_error() {
		let mut actor = Actor::new(HashMap::<String, String>::new());
		actor.start().unwrap();

		let parsed = actor
			.submit_fallible(|m| {
				let raw = m.entry("k".to_string()).or_insert_with(|| "x".to_string());
				raw.parse::<i64>()
			})
			.unwrap();

		match parsed.wait() {
			Err(TaskError::Failed(msg)) => assert!(msg.contains("invalid digit"), "{msg}"),
			other => panic!("expected a failed task, got {:?}", other),
		}
		actor.stop().unwrap();
	}

	#[test]
	fn test_submit_after_stop_rejected() {
		let mut actor = Actor::new(0u32);
		actor.start().unwrap();
		let handle = actor.handle().unwrap();
		actor.stop().unwrap();

		assert!(matches!(handle.submit(|n| *n), Err(ActorError::Closed)));
		assert!(matches!(actor.submit(|n| *n), Err(ActorError::Closed)));
		assert!(matches!(actor.submit_fallible(|n| Ok::<_, Infallible>(*n)), Err(ActorError::Closed)));
		assert!(matches!(actor.handle(), Err(ActorError::Closed)));
		assert!(handle.is_closed());
		assert_eq!(handle.phase(), ActorPhase::Stopped);
		assert_eq!(actor.stats().rejected, 1);
	}

	#[test]
	fn test_handle_observes_draining() {
		let mut actor = Actor::with_config(0u32, ActorConfig::new().queue_capacity(4).name("drainer"));
		actor.start().unwrap();
		let handle = actor.handle().unwrap();

		let started = Arc::new(AtomicUsize::new(0));
		let release = Arc::new(AtomicUsize::new(0));
		{
			let started = started.clone();
			let release = release.clone();
			actor.submit(move |_| {
				started.store(1, Ordering::SeqCst);
				while release.load(Ordering::SeqCst) == 0 {
					thread::sleep(Duration::from_millis(1));
				}
			})
			.unwrap();
		}
		wait_for(|| started.load(Ordering::SeqCst) == 1, "blocking task should start");

		let stopper = thread::spawn(move || {
			actor.stop().unwrap();
			actor
		});

		wait_for(|| handle.is_closed(), "stop should close the queue");
		assert_eq!(handle.phase(), ActorPhase::Draining);

		release.store(1, Ordering::SeqCst);
		let actor = stopper.join().unwrap();
		assert_eq!(actor.phase(), ActorPhase::Stopped);
		assert_eq!(actor.name(), "drainer");
	}

	#[test]
	fn test_drop_drains_running_actor() {
		let counter = Arc::new(AtomicUsize::new(0));
		{
			let mut actor = Actor::new(());
			actor.start().unwrap();
			for _ in 0..20 {
				let counter = counter.clone();
				actor.submit(move |_| {
					counter.fetch_add(1, Ordering::SeqCst);
				})
				.unwrap();
			}
		}
		assert_eq!(counter.load(Ordering::SeqCst), 20);
	}
}
