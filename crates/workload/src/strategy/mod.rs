// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Ways of serializing access to a shared state value.
//!
//! - [`ActorStrategy`]: dedicated worker thread fed by a bounded queue
//! - [`MutexStrategy`]: callers lock the state and mutate it in place
//! - [`StrandStrategy`]: jobs posted to a thread pool, run one at a time

mod actor;
mod mutex;
mod strand;

use std::panic::{self, AssertUnwindSafe};

pub use actor::ActorStrategy;
pub use mutex::MutexStrategy;
use soloist_runtime::{TaskError, error::panic_message};
pub use strand::StrandStrategy;

use crate::error::WorkloadError;

/// Runs work against a state value with exclusive access.
pub trait Strategy<S>: Send + Sync {
	fn name(&self) -> &'static str;

	/// Run `work` with exclusive access to the state and wait for its result.
	fn execute<R, F>(&self, work: F) -> Result<R, WorkloadError>
	where
		R: Send + 'static,
		F: FnOnce(&mut S) -> R + Send + 'static;

	/// Copy of the current state, taken after all previously executed work.
	fn snapshot(&self) -> Result<S, WorkloadError>
	where
		S: Clone + Send + 'static,
	{
		self.execute(|state: &mut S| state.clone())
	}
}

fn catch<S, R, F>(work: F, state: &mut S) -> Result<R, TaskError>
where
	F: FnOnce(&mut S) -> R,
{
	panic::catch_unwind(AssertUnwindSafe(move || work(state)))
		.map_err(|payload| TaskError::Panicked(panic_message(payload.as_ref())))
}
