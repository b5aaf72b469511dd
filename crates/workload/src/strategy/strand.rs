// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{collections::VecDeque, sync::Arc};

use parking_lot::Mutex;
use rayon::{ThreadPool, ThreadPoolBuilder};
use soloist_runtime::oneshot;
use tracing::debug;

use super::{Strategy, catch};
use crate::error::WorkloadError;

type Job<S> = Box<dyn FnOnce(&mut S) + Send>;

struct Pending<S> {
	jobs: VecDeque<Job<S>>,
	/// A drain job is queued on or running in the pool.
	scheduled: bool,
}

struct Inner<S> {
	pending: Mutex<Pending<S>>,
	// never contended: the strand runs at most one job at a time
	state: Mutex<S>,
}

/// Serializing strand over a rayon pool.
///
/// Jobs run in post order, one at a time, on whichever pool thread picks up
/// the drain; there is no dedicated owner thread.
pub struct StrandStrategy<S> {
	pool: ThreadPool,
	inner: Arc<Inner<S>>,
}

impl<S: Send + 'static> StrandStrategy<S> {
	pub fn new(state: S, threads: usize) -> Result<Self, WorkloadError> {
		let pool = ThreadPoolBuilder::new()
			.num_threads(threads.max(1))
			.thread_name(|i| format!("strand-{i}"))
			.build()?;
		debug!(threads = pool.current_num_threads(), "strand pool started");

		Ok(Self {
			pool,
			inner: Arc::new(Inner {
				pending: Mutex::new(Pending {
					jobs: VecDeque::new(),
					scheduled: false,
				}),
				state: Mutex::new(state),
			}),
		})
	}

	/// Queue `job` behind everything already posted.
	///
	/// A panicking job aborts the pool; [`Strategy::execute`] catches panics
	/// before they reach it.
	pub fn post<F>(&self, job: F)
	where
		F: FnOnce(&mut S) + Send + 'static,
	{
		let mut pending = self.inner.pending.lock();
		pending.jobs.push_back(Box::new(job));
		if pending.scheduled {
			return;
		}
		pending.scheduled = true;
		drop(pending);

		let inner = self.inner.clone();
		self.pool.spawn(move || drain(&inner));
	}
}

fn drain<S>(inner: &Inner<S>) {
	loop {
		let job = {
			let mut pending = inner.pending.lock();
			match pending.jobs.pop_front() {
				Some(job) => job,
				None => {
					pending.scheduled = false;
					return;
				}
			}
		};
		let mut state = inner.state.lock();
		job(&mut *state);
	}
}

impl<S: Send + 'static> Strategy<S> for StrandStrategy<S> {
	fn name(&self) -> &'static str {
		"strand"
	}

	fn execute<R, F>(&self, work: F) -> Result<R, WorkloadError>
	where
		R: Send + 'static,
		F: FnOnce(&mut S) -> R + Send + 'static,
	{
		let (promise, future) = oneshot();
		self.post(move |state| promise.complete(catch(work, state)));
		Ok(future.into_result()?)
	}
}

#[cfg(test)]
mod tests {
	use std::thread;

	use super::*;

	#[test]
	fn test_jobs_run_in_post_order() {
		let strand = StrandStrategy::new(Vec::<u32>::new(), 4).unwrap();
		for i in 0..200 {
			strand.post(move |log| log.push(i));
		}
		let log = strand.execute(|log| log.clone()).unwrap();
		assert_eq!(log, (0..200).collect::<Vec<_>>());
	}

	#[test]
	fn test_concurrent_callers_serialized() {
		let strand = StrandStrategy::new(0u64, 4).unwrap();
		thread::scope(|scope| {
			for _ in 0..8 {
				scope.spawn(|| {
					for _ in 0..100 {
						strand.execute(|n| {
							let read = *n;
							thread::yield_now();
							*n = read + 1;
						})
						.unwrap();
					}
				});
			}
		});
		assert_eq!(strand.execute(|n| *n).unwrap(), 800);
	}

	#[test]
	fn test_panicking_job_reported() {
		let strand = StrandStrategy::new(0u8, 2).unwrap();
		let err = strand.execute(|_| -> u8 { panic!("strand job failed") }).unwrap_err();
		assert!(matches!(err, WorkloadError::Task(soloist_runtime::TaskError::Panicked(ref msg)) if msg == "strand job failed"));
		assert_eq!(strand.execute(|n| *n).unwrap(), 0, "strand keeps running after a panic");
	}
}
