// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use parking_lot::Mutex;

use super::{Strategy, catch};
use crate::error::WorkloadError;

/// Every caller takes the lock and runs its work on its own thread.
pub struct MutexStrategy<S> {
	state: Mutex<S>,
}

impl<S> MutexStrategy<S> {
	pub fn new(state: S) -> Self {
		Self {
			state: Mutex::new(state),
		}
	}

	pub fn into_state(self) -> S {
		self.state.into_inner()
	}
}

impl<S: Send> Strategy<S> for MutexStrategy<S> {
	fn name(&self) -> &'static str {
		"mutex"
	}

	fn execute<R, F>(&self, work: F) -> Result<R, WorkloadError>
	where
		R: Send + 'static,
		F: FnOnce(&mut S) -> R + Send + 'static,
	{
		let mut state = self.state.lock();
		Ok(catch(work, &mut *state)?)
	}
}
