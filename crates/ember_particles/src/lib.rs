//! # EMBER Particles
//!
//! Data-oriented, job-parallel particle storage.
//!
//! A [`ParticlePool`] owns one contiguous array of fixed-size particle
//! records. Records in `[0, alive)` are live; the rest of the array is
//! recycled capacity. Bulk operations split their index range into a few
//! equal groups, hand each group to the job scheduler, and join before
//! returning.
//!
//! ## Architecture Rules
//!
//! 1. **Live records are a contiguous prefix** - no live/dead interleaving
//! 2. **Static partitioning** - groups are sized once per call, no stealing
//! 3. **No locks in the pool** - `&mut self` is the single-writer discipline
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use ember_jobs::{JobSystem, JobSystemConfig};
//! use ember_particles::{Particle, ParticlePool};
//!
//! let jobs = Arc::new(JobSystem::new(JobSystemConfig::default())?);
//! let mut pool: ParticlePool<Particle> = ParticlePool::new(jobs);
//! pool.resize(100_000);
//!
//! let begin = pool.parallel_spawn(1_000, |mut group, start, end, _alive| {
//!     for index in start..end {
//!         group[index].lifetime = 2.0;
//!     }
//! });
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod error;
pub mod group;
pub mod pool;
pub mod record;
pub mod simulation;
pub mod view;

pub use config::PoolConfig;
pub use error::{ParticleError, ParticleResult};
pub use group::{ideal_group_count, GroupPlan, GroupRanges, IDEAL_GROUP_BYTES};
pub use pool::ParticlePool;
pub use record::{Particle, ParticleRecord};
pub use simulation::{integrate, live_bounds, recycle_expired, Bounds, Emitter, SpawnReport};
pub use view::ParticleGroup;
