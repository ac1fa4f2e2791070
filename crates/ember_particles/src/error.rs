//! # Particle Error Types
//!
//! Bulk pool operations never fail; errors only come from setup.

use ember_jobs::JobError;
use thiserror::Error;

/// Errors that can occur while configuring a particle pool.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParticleError {
    /// Configuration values out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration file could not be parsed.
    #[error("failed to parse pool configuration: {0}")]
    ConfigParse(String),

    /// The job system backing the pool could not be started.
    #[error(transparent)]
    Jobs(#[from] JobError),
}

/// Result type for particle pool setup.
pub type ParticleResult<T> = Result<T, ParticleError>;
