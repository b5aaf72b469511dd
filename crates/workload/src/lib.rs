// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Workloads that exercise the actor runtime from many caller threads, and
//! the alternative ways of guarding the same state they are compared against.

pub mod caller;
pub mod cpu;
pub mod error;
pub mod strategy;
pub mod timed_wait;

pub use caller::{CallerWorkload, caller_round};
pub use cpu::{KeyValueState, key_name, simulate_cpu};
pub use error::WorkloadError;
pub use strategy::{ActorStrategy, MutexStrategy, Strategy, StrandStrategy};
pub use timed_wait::timed_wait;
