// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	fmt::Display,
	panic::{self, AssertUnwindSafe},
};

use crate::{
	error::{TaskError, panic_message},
	future::Promise,
};

type Job<S> = Box<dyn FnOnce(&mut S) -> Result<(), TaskError> + Send>;

/// A unit of work queued for the worker, bundled with the promise that
/// receives its result.
pub(crate) struct Task<S> {
	id: u64,
	job: Job<S>,
}

impl<S> Task<S> {
	pub(crate) fn new<R, E, F>(id: u64, work: F, promise: Promise<R>) -> Self
	where
		S: 'static,
		R: Send + 'static,
		E: Display + 'static,
		F: FnOnce(&mut S) -> Result<R, E> + Send + 'static,
	{
		Self {
			id,
			job: Box::new(move |state: &mut S| {
				let result = execute(work, state);
				let outcome = result.as_ref().map(|_| ()).map_err(Clone::clone);
				promise.complete(result);
				outcome
			}),
		}
	}

	pub(crate) fn id(&self) -> u64 {
		self.id
	}

	/// Run against the owned state and resolve the promise. The returned
	/// outcome mirrors what the caller will observe.
	pub(crate) fn run(self, state: &mut S) -> Result<(), TaskError> {
		(self.job)(state)
	}
}

/// Panics are caught here so they resolve this task's future instead of
/// unwinding through the worker. State mutated before the panic is kept.
///
/// The error is rendered inside the unwind boundary: a panicking `Display`
/// of `E` is reported like any other task panic.
fn execute<S, R, E, F>(work: F, state: &mut S) -> Result<R, TaskError>
where
	E: Display,
	F: FnOnce(&mut S) -> Result<R, E>,
{
	let run = move || work(state).map_err(|err| TaskError::Failed(err.to_string()));
	match panic::catch_unwind(AssertUnwindSafe(run)) {
		Ok(result) => result,
		Err(payload) => Err(TaskError::Panicked(panic_message(payload.as_ref()))),
	}
}

#[cfg(test)]
mod tests {
	use std::convert::Infallible;

	use super::*;
	use crate::future::oneshot;

	#[test]
	fn test_run_resolves_future() {
		let (promise, future) = oneshot();
		let task = Task::new(1, |state: &mut Vec<u32>| Ok::<_, Infallible>(state.len()), promise);

		let mut state = vec![1, 2, 3];
		assert_eq!(task.id(), 1);
		assert!(task.run(&mut state).is_ok());
		assert_eq!(future.wait(), Ok(3));
	}

	#[test]
	fn test_error_routed_to_future() {
		let (promise, future) = oneshot::<()>();
		let task = Task::new(2, |_: &mut u32| Err("invalid key"), promise);

		let mut state = 0;
		assert_eq!(task.run(&mut state), Err(TaskError::Failed("invalid key".to_string())));
		assert_eq!(future.wait(), Err(TaskError::Failed("invalid key".to_string())));
	}

	#[test]
	fn test_panic_routed_to_future() {
		let (promise, future) = oneshot::<()>();
		let task = Task::new(
			3,
			|state: &mut u32| -> Result<(), Infallible> {
				*state += 1;
				panic!("exploded")
			},
			promise,
		);

		let mut state = 0;
		assert_eq!(task.run(&mut state), Err(TaskError::Panicked("exploded".to_string())));
		assert_eq!(future.wait(), Err(TaskError::Panicked("exploded".to_string())));
		assert_eq!(state, 1, "mutations before the panic are kept");
	}

	struct LoudError;

	impl Display for LoudError {
		fn fmt(&self, _f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
			panic!("display exploded")
		}
	}

	#[test]
	fn test_panicking_error_display_routed_to_future() {
		let (promise, future) = oneshot::<()>();
		let task = Task::new(4, |_: &mut u32| Err(LoudError), promise);

		let mut state = 0;
		assert_eq!(task.run(&mut state), Err(TaskError::Panicked("display exploded".to_string())));
		assert_eq!(future.wait(), Err(TaskError::Panicked("display exploded".to_string())));
	}
}
