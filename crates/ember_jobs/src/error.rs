//! # Job Error Types

use thiserror::Error;

/// Errors that can occur while setting up the job system.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JobError {
    /// The worker pool could not be built.
    #[error("failed to build worker pool: {0}")]
    PoolBuild(String),

    /// Invalid job system configuration.
    #[error("invalid job system configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for job system operations.
pub type JobResult<T> = Result<T, JobError>;
