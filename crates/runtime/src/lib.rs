// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Dedicated-owner actor runtime.
//!
//! Serializes every access to a mutable value through one worker thread:
//! - [`queue::BoundedQueue`]: bounded blocking FIFO between submitters and the worker
//! - [`future::TaskFuture`]: one-shot result cell returned by each submission
//! - [`actor::Actor`]: owns the value and the worker, exposes start/submit/stop

pub mod actor;
pub mod error;
pub mod future;
pub mod queue;
pub mod sync;

pub use actor::{Actor, ActorConfig, ActorHandle, ActorPhase, ActorStats};
pub use error::{ActorError, QueueError, TaskError};
pub use future::{Promise, TaskFuture, oneshot};
pub use queue::BoundedQueue;
