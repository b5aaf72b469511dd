// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Mutex synchronization primitive backed by `parking_lot`.

use std::{
	fmt,
	ops::{Deref, DerefMut},
};

/// A mutual exclusion primitive for protecting shared data.
///
/// Never poisoned: a panic while the lock is held releases it normally.
pub struct Mutex<T> {
	inner: parking_lot::Mutex<T>,
}

impl<T: fmt::Debug> fmt::Debug for Mutex<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Mutex").field("data", &self.inner).finish()
	}
}

impl<T> Mutex<T> {
	/// Creates a new mutex.
	#[inline]
	pub fn new(value: T) -> Self {
		Self {
			inner: parking_lot::Mutex::new(value),
		}
	}

	/// Acquires the mutex, blocking until it is available.
	#[inline]
	pub fn lock(&self) -> MutexGuard<'_, T> {
		MutexGuard {
			inner: self.inner.lock(),
		}
	}
}

/// A guard providing mutable access to the data protected by a Mutex.
pub struct MutexGuard<'a, T> {
	pub(in crate::sync) inner: parking_lot::MutexGuard<'a, T>,
}

impl<'a, T> Deref for MutexGuard<'a, T> {
	type Target = T;

	fn deref(&self) -> &T {
		&self.inner
	}
}

impl<'a, T> DerefMut for MutexGuard<'a, T> {
	fn deref_mut(&mut self) -> &mut T {
		&mut self.inner
	}
}
