// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! High-fidelity latency simulation.
//!
//! `thread::sleep` goes through the scheduler and overshoots short requests
//! by an order of magnitude (an 8µs sleep commonly takes 80µs or more). To
//! emulate I/O latency in the microsecond range the caller instead spins,
//! checking the clock after every fixed-size batch of reads.

use std::{
	hint::{black_box, spin_loop},
	time::{Duration, Instant},
};

/// Reads performed between two clock checks.
pub const SPIN_BATCH: u64 = 64;

/// Busy-wait for `duration` and return the time actually spent.
///
/// Never touches shared state; concurrent callers wait independently.
pub fn timed_wait(duration: Duration) -> Duration {
	let start = Instant::now();
	let mut sink = 0u64;
	loop {
		for i in 0..SPIN_BATCH {
			sink = black_box(sink.wrapping_add(i));
			spin_loop();
		}
		let elapsed = start.elapsed();
		if elapsed >= duration {
			black_box(sink);
			return elapsed;
		}
	}
}
