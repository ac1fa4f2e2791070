//! # EMBER Jobs
//!
//! Fork/join job scheduling for bulk data-parallel work.
//!
//! ## Model
//!
//! ```text
//!   caller ──> dispatch_and_join([job0, job1, ... jobN])
//!                 │
//!                 ├──> spawn every job into one rayon scope
//!                 │        (fire-then-join, never fire-wait-fire)
//!                 │
//!                 └──> block until the scope has finished
//! ```
//!
//! Jobs may borrow from the caller's stack: the scheduler never returns
//! before every job of the batch has finished.
//!
//! ## Example
//!
//! ```rust,ignore
//! use ember_jobs::{JobScheduler, JobSystem, JobSystemConfig};
//!
//! let jobs = JobSystem::new(JobSystemConfig::default())?;
//! let mut data = vec![0u32; 1024];
//! let (left, right) = data.split_at_mut(512);
//! jobs.dispatch_and_join(vec![
//!     Box::new(move || left.fill(1)),
//!     Box::new(move || right.fill(2)),
//! ]);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

mod error;
mod scheduler;
mod system;

pub use error::{JobError, JobResult};
pub use scheduler::{InlineScheduler, Job, JobScheduler};
pub use system::{JobStats, JobSystem, JobSystemConfig};
