// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Bounded blocking FIFO queue.
//!
//! Hands items from any number of producer threads to consumers with
//! backpressure and an orderly close:
//! - [`BoundedQueue::add`] blocks while the queue is full
//! - [`BoundedQueue::get`] blocks while the queue is empty and open
//! - [`BoundedQueue::close`] stops admission but keeps admitted items
//!
//! The buffer and the `closed` flag live under one mutex, so admission and
//! closing are decided atomically: an `add` either observes the queue open and
//! enqueues, or observes it closed and gets its item back. A producer parked on
//! a full queue when the queue closes is rejected, never admitted.

use std::{
	collections::VecDeque,
	time::{Duration, Instant},
};

use crate::{
	error::QueueError,
	sync::{Condvar, Mutex},
};

struct Inner<T> {
	buffer: VecDeque<T>,
	closed: bool,
}

/// A thread-safe FIFO with a fixed capacity.
pub struct BoundedQueue<T> {
	inner: Mutex<Inner<T>>,
	/// Signalled when an item is added or the queue closes.
	not_empty: Condvar,
	/// Signalled when an item is removed or the queue closes.
	not_full: Condvar,
	capacity: usize,
}

impl<T> BoundedQueue<T> {
	/// Create a queue holding at most `capacity` items. A capacity of zero is
	/// raised to one.
	pub fn new(capacity: usize) -> Self {
		Self::with_capacity(capacity.max(1))
	}

	/// Create a queue holding at most `capacity` items, rejecting zero.
	pub fn try_new(capacity: usize) -> Result<Self, QueueError<()>> {
		if capacity == 0 {
			return Err(QueueError::ZeroCapacity);
		}
		Ok(Self::with_capacity(capacity))
	}

	fn with_capacity(capacity: usize) -> Self {
		Self {
			inner: Mutex::new(Inner {
				buffer: VecDeque::with_capacity(capacity.min(4096)),
				closed: false,
			}),
			not_empty: Condvar::new(),
			not_full: Condvar::new(),
			capacity,
		}
	}

	/// Append `item` at the tail, blocking while the queue is full.
	///
	/// Fails with [`QueueError::Closed`] if the queue is closed on entry or
	/// closes while this call waits for a free slot.
	pub fn add(&self, item: T) -> Result<(), QueueError<T>> {
		let mut inner = self.inner.lock();
		loop {
			if inner.closed {
				return Err(QueueError::Closed(item));
			}
			if inner.buffer.len() < self.capacity {
				break;
			}
			self.not_full.wait(&mut inner);
		}
		inner.buffer.push_back(item);
		drop(inner);

		self.not_empty.notify_one();
		Ok(())
	}

	/// Append `item` at the tail without blocking.
	pub fn try_add(&self, item: T) -> Result<(), QueueError<T>> {
		let mut inner = self.inner.lock();
		if inner.closed {
			return Err(QueueError::Closed(item));
		}
		if inner.buffer.len() >= self.capacity {
			return Err(QueueError::Full(item));
		}
		inner.buffer.push_back(item);
		drop(inner);

		self.not_empty.notify_one();
		Ok(())
	}

	/// Remove the head item, blocking while the queue is empty and open.
	///
	/// Returns `None` once the queue is closed and fully drained; this is the
	/// end-of-stream signal and never blocks.
	pub fn get(&self) -> Option<T> {
		let mut inner = self.inner.lock();
		loop {
			if let Some(item) = inner.buffer.pop_front() {
				drop(inner);
				self.not_full.notify_one();
				return Some(item);
			}
			if inner.closed {
				return None;
			}
			self.not_empty.wait(&mut inner);
		}
	}

	/// Like [`get`](Self::get), but gives up after `timeout`.
	///
	/// `Ok(None)` is end-of-stream, `Err(QueueError::Timeout)` means nothing
	/// arrived in time.
	pub fn get_timeout(&self, timeout: Duration) -> Result<Option<T>, QueueError<()>> {
		let deadline = Instant::now() + timeout;
		let mut inner = self.inner.lock();
		loop {
			if let Some(item) = inner.buffer.pop_front() {
				drop(inner);
				self.not_full.notify_one();
				return Ok(Some(item));
			}
			if inner.closed {
				return Ok(None);
			}
			if self.not_empty.wait_until(&mut inner, deadline).timed_out() {
				// an item may have raced in with the timeout
				return match inner.buffer.pop_front() {
					Some(item) => {
						drop(inner);
						self.not_full.notify_one();
						Ok(Some(item))
					}
					None if inner.closed => Ok(None),
					None => Err(QueueError::Timeout),
				};
			}
		}
	}

	/// Stop admitting items and wake every blocked producer and consumer.
	///
	/// Idempotent. Returns `true` for the call that actually closed the queue.
	pub fn close(&self) -> bool {
		let mut inner = self.inner.lock();
		if inner.closed {
			return false;
		}
		inner.closed = true;
		drop(inner);

		self.not_empty.notify_all();
		self.not_full.notify_all();
		true
	}

	pub fn is_closed(&self) -> bool {
		self.inner.lock().closed
	}

	pub fn len(&self) -> usize {
		self.inner.lock().buffer.len()
	}

	pub fn is_empty(&self) -> bool {
		self.inner.lock().buffer.is_empty()
	}

	pub fn capacity(&self) -> usize {
		self.capacity
	}
}
