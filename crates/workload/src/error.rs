// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use soloist_runtime::{ActorError, TaskError};

#[derive(Debug, thiserror::Error)]
pub enum WorkloadError {
	#[error(transparent)]
	Actor(#[from] ActorError),

	#[error(transparent)]
	Task(#[from] TaskError),

	#[error("failed to build strand thread pool: {0}")]
	Pool(#[from] rayon::ThreadPoolBuildError),
}
