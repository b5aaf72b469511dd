// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

pub mod util;

pub use util::wait::{DEFAULT_POLL_INTERVAL, DEFAULT_TIMEOUT, wait_for, wait_for_condition};
