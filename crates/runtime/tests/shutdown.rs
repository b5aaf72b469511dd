// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! `stop` drains everything admitted before it and admits nothing after.

use std::{
	sync::{
		Arc,
		atomic::{AtomicBool, AtomicUsize, Ordering},
	},
	thread,
	time::Duration,
};

use soloist_runtime::{Actor, ActorConfig, ActorError, ActorPhase};
use soloist_testing::wait_for;

#[test]
fn test_drain_on_stop() {
	let mut actor = Actor::new(0u32);
	actor.start().unwrap();

	let futures: Vec<_> = (0..5)
		.map(|_| {
			actor.submit(|n| {
				thread::sleep(Duration::from_millis(5));
				*n += 1;
				*n
			})
			.unwrap()
		})
		.collect();

	actor.stop().unwrap();

	for (i, future) in futures.iter().enumerate() {
		assert!(future.is_completed(), "task {} unresolved after stop", i);
		assert_eq!(future.wait(), Ok(i as u32 + 1));
	}
	assert!(matches!(actor.submit(|n| *n), Err(ActorError::Closed)));
	assert_eq!(actor.state(), Some(&5));
}

#[test]
fn test_handle_submission_during_stop_rejected() {
	let mut actor = Actor::with_config(0u32, ActorConfig::new().queue_capacity(8));
	actor.start().unwrap();
	let handle = actor.handle().unwrap();

	let gate = Arc::new(AtomicBool::new(false));
	let entered = Arc::new(AtomicBool::new(false));
	let blocker = {
		let gate = gate.clone();
		let entered = entered.clone();
		actor.submit(move |_| {
			entered.store(true, Ordering::SeqCst);
			while !gate.load(Ordering::SeqCst) {
				thread::sleep(Duration::from_millis(1));
			}
		})
		.unwrap()
	};
	let queued: Vec<_> = (0..5).map(|_| actor.submit(|n| *n += 1).unwrap()).collect();
	wait_for(|| entered.load(Ordering::SeqCst), "blocker should be running");

	let stopper = thread::spawn(move || {
		actor.stop().unwrap();
		actor
	});
	wait_for(|| handle.is_closed(), "stop should close the queue");

	assert!(matches!(handle.submit(|n| *n += 100), Err(ActorError::Closed)));

	gate.store(true, Ordering::SeqCst);
	let actor = stopper.join().unwrap();

	blocker.wait().unwrap();
	for future in &queued {
		future.wait().unwrap();
	}
	assert_eq!(actor.state(), Some(&5), "the rejected task never ran");
	assert_eq!(actor.phase(), ActorPhase::Stopped);
	assert_eq!(actor.stats().rejected, 1);
}

#[test]
fn test_stop_releases_blocked_submitter() {
	let mut actor = Actor::with_config((), ActorConfig::new().queue_capacity(1));
	actor.start().unwrap();
	let handle = actor.handle().unwrap();

	let gate = Arc::new(AtomicBool::new(false));
	{
		let gate = gate.clone();
		actor.submit(move |_| {
			while !gate.load(Ordering::SeqCst) {
				thread::sleep(Duration::from_millis(1));
			}
		})
		.unwrap();
	}
	// fills the single slot while the worker is busy
	wait_for(|| handle.pending() == 0, "worker should pick up the gate task");
	actor.submit(|_| ()).unwrap();

	let outcomes = Arc::new(AtomicUsize::new(0));
	let submitter = {
		let handle = handle.clone();
		let outcomes = outcomes.clone();
		thread::spawn(move || {
			let result = handle.submit(|_| ());
			outcomes.fetch_add(1, Ordering::SeqCst);
			result
		})
	};
	thread::sleep(Duration::from_millis(30));
	assert_eq!(outcomes.load(Ordering::SeqCst), 0, "submitter should be blocked on the full queue");

	let stopper = thread::spawn(move || actor.stop());
	let blocked = submitter.join().unwrap();
	assert!(matches!(blocked, Err(ActorError::Closed)));

	gate.store(true, Ordering::SeqCst);
	stopper.join().unwrap().unwrap();
}
