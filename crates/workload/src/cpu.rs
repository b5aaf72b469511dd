// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! CPU-bound mutation of a string-keyed map, the hot structure every
//! strategy protects.

use std::collections::HashMap;

/// Counters stored as decimal strings, keyed by [`key_name`].
pub type KeyValueState = HashMap<String, String>;

pub fn key_name(index: usize) -> String {
	format!("key-{index}")
}

/// Increment the first `keys` counters, inserting `"1"` for missing ones.
///
/// A value that does not parse as a counter, or sits at `u64::MAX`, restarts
/// at `"1"`.
/// Returns the number of counters that already existed.
pub fn simulate_cpu(state: &mut KeyValueState, keys: usize) -> usize {
	let mut existing = 0;
	for index in 0..keys {
		let key = key_name(index);
		match state.get_mut(&key) {
			Some(value) => {
				existing += 1;
				let next = value.parse::<u64>().ok().and_then(|n| n.checked_add(1)).unwrap_or(1);
				*value = next.to_string();
			}
			None => {
				state.insert(key, "1".to_string());
			}
		}
	}
	existing
}
