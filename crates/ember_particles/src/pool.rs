//! # Particle Pool
//!
//! Contiguous particle storage with job-parallel bulk operations.
//!
//! ```text
//!   particles: [ live live live live | recycled recycled recycled ]
//!                0                alive                      capacity
//! ```
//!
//! Every bulk operation follows the same pattern: plan groups over its
//! index range, split the storage into one disjoint `&mut` window per group,
//! submit all groups to the scheduler, then join.

use std::sync::Arc;

use ember_jobs::{Job, JobScheduler, JobSystem, JobSystemConfig};

use crate::config::PoolConfig;
use crate::error::ParticleResult;
use crate::group::{ideal_group_count, ideal_group_count_for, GroupPlan};
use crate::record::{Particle, ParticleRecord};
use crate::view::ParticleGroup;

/// A pool of particle records.
///
/// # Thread Safety
///
/// The pool performs no internal locking. Mutating operations take
/// `&mut self`, so resize/recycle can never overlap a bulk call on the same
/// pool; parallelism lives entirely inside each call.
pub struct ParticlePool<P: ParticleRecord = Particle> {
    /// Live records are `particles[..alive]`.
    alive: u32,
    /// Capacity; always equals `particles.len()`.
    max_size: u32,
    particles: Vec<P>,
    /// Ceiling on groups per bulk operation, at least 1.
    max_groups: u32,
    /// Records per group at the configured group byte size.
    ideal_group_count: u32,
    scheduler: Arc<dyn JobScheduler>,
}

impl<P: ParticleRecord> ParticlePool<P> {
    /// Creates an empty pool (capacity 0) that dispatches to `scheduler`.
    ///
    /// At most one group per scheduler worker is used.
    #[must_use]
    pub fn new(scheduler: Arc<dyn JobScheduler>) -> Self {
        let max_groups = worker_groups(scheduler.as_ref());
        Self {
            alive: 0,
            max_size: 0,
            particles: Vec::new(),
            max_groups,
            ideal_group_count: ideal_group_count::<P>(),
            scheduler,
        }
    }

    /// Creates a pool from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn with_config(
        scheduler: Arc<dyn JobScheduler>,
        config: &PoolConfig,
    ) -> ParticleResult<Self> {
        config.validate()?;

        let mut pool = Self::new(scheduler);
        pool.ideal_group_count = ideal_group_count_for::<P>(config.group_bytes);
        if config.max_groups > 0 {
            pool.max_groups = config.max_groups;
        }
        if config.initial_capacity > 0 {
            pool.resize(config.initial_capacity);
        }
        Ok(pool)
    }

    /// Creates a pool backed by its own [`JobSystem`].
    ///
    /// # Errors
    ///
    /// Returns an error if either configuration is invalid or the worker
    /// threads cannot be started.
    pub fn threaded(config: &PoolConfig, jobs: JobSystemConfig) -> ParticleResult<Self> {
        let scheduler: Arc<dyn JobScheduler> = Arc::new(JobSystem::new(jobs)?);
        Self::with_config(scheduler, config)
    }

    /// Sets the capacity to `size` records.
    ///
    /// Growing appends zeroed records; shrinking drops the tail. Records
    /// below the new capacity are preserved and the alive count is clamped
    /// to it.
    pub fn resize(&mut self, size: u32) {
        self.particles.resize(size as usize, P::zeroed());
        self.max_size = size;
        self.alive = self.alive.min(size);

        tracing::debug!(capacity = size, alive = self.alive, "particle pool resized");
    }

    /// Sets the alive count back to `begin_pos`.
    ///
    /// Records in `[begin_pos, alive)` are discarded logically; their memory
    /// is left untouched until the next spawn overwrites it.
    ///
    /// # Panics
    ///
    /// Panics in debug builds if `begin_pos > alive()`. Release builds keep
    /// the alive count unchanged in that case.
    pub fn recycle(&mut self, begin_pos: u32) {
        debug_assert!(
            begin_pos <= self.alive,
            "recycle position {begin_pos} beyond alive count {}",
            self.alive
        );
        self.alive = begin_pos.min(self.alive);
    }

    /// Discards every live record. Capacity is retained.
    pub fn reset(&mut self) {
        self.recycle(0);
    }

    /// Claims up to `num` new live slots and initializes them in parallel.
    ///
    /// The alive count grows to `min(alive + num, size())`; requests past
    /// capacity are silently truncated. `func(group, start, end, alive)` is
    /// called once per group of the new range, where `alive` is the
    /// post-spawn alive count. Returns the index of the first new slot (the
    /// previous alive count); compare against [`alive`](Self::alive) to see
    /// how many slots were actually claimed.
    ///
    /// Blocks until every group has finished.
    pub fn parallel_spawn<F>(&mut self, num: u32, func: F) -> u32
    where
        F: Fn(ParticleGroup<'_, P>, u32, u32, u32) + Sync,
    {
        let old = self.alive;
        self.alive = old.saturating_add(num).min(self.max_size);
        let alive = self.alive;

        let func = &func;
        self.dispatch_mut(old, alive, move |group| {
            let (start, end) = (group.start(), group.end());
            func(group, start, end, alive);
        });
        old
    }

    /// Re-processes live records `[begin, alive)` in parallel.
    ///
    /// `func(group, start, end)` is called once per group. Does nothing if
    /// `begin >= alive()`. Each group only sees its own records; work that
    /// reads records of other groups belongs in [`event`](Self::event).
    ///
    /// Blocks until every group has finished.
    pub fn parallel_update<F>(&mut self, begin: u32, func: F)
    where
        F: Fn(ParticleGroup<'_, P>, u32, u32) + Sync,
    {
        let alive = self.alive;
        let func = &func;
        self.dispatch_mut(begin, alive, move |group| {
            let (start, end) = (group.start(), group.end());
            func(group, start, end);
        });
    }

    /// Runs `func(storage, begin, alive)` once on the calling thread.
    ///
    /// `storage` is the whole backing array, for operations that need to see
    /// or move records across the full live range at once. Returns whatever
    /// `func` returns.
    pub fn event<F, R>(&mut self, begin: u32, func: F) -> R
    where
        F: FnOnce(&mut [P], u32, u32) -> R,
    {
        let alive = self.alive;
        func(self.particles.as_mut_slice(), begin, alive)
    }

    /// Traverses live records `[0, alive)` in parallel, read-only.
    ///
    /// `func(storage, start, end)` is called once per group with the whole
    /// backing array; each call should only read `storage[start..end]`.
    /// Does nothing on an empty pool.
    ///
    /// Blocks until every group has finished.
    pub fn render_all<F>(&self, func: F)
    where
        F: Fn(&[P], u32, u32) + Sync,
    {
        let Some(plan) = self.group_plan(self.alive) else {
            return;
        };
        tracing::trace!(count = self.alive, tasks = plan.task_count(), "render particle groups");

        let storage = self.particles.as_slice();
        let func = &func;
        let jobs: Vec<Job<'_>> = plan
            .ranges(0)
            .map(|range| Box::new(move || func(storage, range.start, range.end)) as Job<'_>)
            .collect();

        self.scheduler.dispatch_and_join(jobs);
    }

    /// Capacity in records.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.max_size
    }

    /// Number of live records.
    #[inline]
    #[must_use]
    pub const fn alive(&self) -> u32 {
        self.alive
    }

    /// The whole backing array, including recycled slots past `alive()`.
    #[inline]
    #[must_use]
    pub fn particle_data(&self) -> &[P] {
        &self.particles
    }

    /// The live records, `[0, alive)`.
    #[inline]
    #[must_use]
    pub fn live(&self) -> &[P] {
        &self.particles[..self.alive as usize]
    }

    /// Ceiling on groups per bulk operation.
    #[inline]
    #[must_use]
    pub const fn max_groups(&self) -> u32 {
        self.max_groups
    }

    /// Sets the ceiling on groups per bulk operation (at least 1).
    pub fn set_max_groups(&mut self, max_groups: u32) {
        self.max_groups = max_groups.max(1);
    }

    /// Records per group before a bulk operation is worth splitting.
    #[inline]
    #[must_use]
    pub const fn ideal_group_count(&self) -> u32 {
        self.ideal_group_count
    }

    /// How a bulk operation over `count` records would be split.
    #[must_use]
    pub fn group_plan(&self, count: u32) -> Option<GroupPlan> {
        GroupPlan::calc(count, self.ideal_group_count, self.max_groups)
    }

    /// Splits `[begin, end)` into groups and runs `func` on each, in
    /// parallel, joining before return.
    fn dispatch_mut<F>(&mut self, begin: u32, end: u32, func: F)
    where
        F: Fn(ParticleGroup<'_, P>) + Sync,
    {
        let Some(plan) = self.group_plan(end.saturating_sub(begin)) else {
            return;
        };
        tracing::trace!(begin, end, tasks = plan.task_count(), "dispatch particle groups");

        let func = &func;
        let mut rest = &mut self.particles[begin as usize..end as usize];
        let mut jobs: Vec<Job<'_>> = Vec::with_capacity(plan.task_count() as usize);

        for range in plan.ranges(begin) {
            let (head, tail) = std::mem::take(&mut rest).split_at_mut(range.len());
            rest = tail;

            let group = ParticleGroup::new(range.start, head);
            jobs.push(Box::new(move || func(group)));
        }
        debug_assert!(rest.is_empty());

        self.scheduler.dispatch_and_join(jobs);
    }
}

/// One group per worker, at least one.
fn worker_groups(scheduler: &dyn JobScheduler) -> u32 {
    u32::try_from(scheduler.worker_count()).unwrap_or(u32::MAX).max(1)
}

impl<P: ParticleRecord> std::fmt::Debug for ParticlePool<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParticlePool")
            .field("alive", &self.alive)
            .field("capacity", &self.max_size)
            .field("max_groups", &self.max_groups)
            .field("ideal_group_count", &self.ideal_group_count)
            .finish_non_exhaustive()
    }
}
