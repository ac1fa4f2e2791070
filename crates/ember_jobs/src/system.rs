//! # Job System
//!
//! A dedicated `rayon` thread pool behind the [`JobScheduler`] capability.
//!
//! ## Architecture
//!
//! ```text
//!   dispatch_and_join ──> pool.scope(|s| ...) ──> s.spawn(job0)
//!                              │                  s.spawn(job1)  ──> worker 0..N
//!                              │                  s.spawn(jobN)
//!                              └──── returns once every spawn has finished
//! ```
//!
//! The scope is the join barrier: jobs may borrow from the dispatching
//! thread because the scope cannot end before they do. A job that
//! dispatches a nested batch runs it on the same pool, and the waiting
//! worker steals queued work instead of blocking.

use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;

use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::error::{JobError, JobResult};
use crate::scheduler::{Job, JobScheduler};

/// Configuration for the job system.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JobSystemConfig {
    /// Number of worker threads. Zero lets rayon choose (`RAYON_NUM_THREADS`
    /// or one per logical CPU).
    pub worker_count: usize,
    /// Prefix for worker thread names (`<prefix>-<index>`).
    pub thread_name: String,
}

impl Default for JobSystemConfig {
    fn default() -> Self {
        Self {
            worker_count: 0,
            thread_name: String::from("ember-job"),
        }
    }
}

impl JobSystemConfig {
    /// A single background worker.
    #[must_use]
    pub fn single_worker() -> Self {
        Self {
            worker_count: 1,
            ..Self::default()
        }
    }

    /// Checks the configuration for values the OS would reject.
    ///
    /// # Errors
    ///
    /// Returns [`JobError::InvalidConfig`] if the thread name is empty or
    /// contains a NUL byte.
    pub fn validate(&self) -> JobResult<()> {
        if self.thread_name.is_empty() {
            return Err(JobError::InvalidConfig("thread_name must not be empty".into()));
        }
        if self.thread_name.contains('\0') {
            return Err(JobError::InvalidConfig(
                "thread_name must not contain NUL bytes".into(),
            ));
        }
        Ok(())
    }
}

/// Job system counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct JobStats {
    /// Non-empty batches submitted to `dispatch_and_join`.
    pub batches: u64,
    /// Jobs that ran to completion or panicked.
    pub jobs_executed: u64,
    /// Jobs that panicked.
    pub jobs_panicked: u64,
}

#[derive(Default)]
struct Counters {
    batches: AtomicU64,
    jobs_executed: AtomicU64,
    jobs_panicked: AtomicU64,
}

/// Counts one job when dropped, including while unwinding out of it.
struct JobGuard<'a>(&'a Counters);

impl Drop for JobGuard<'_> {
    fn drop(&mut self) {
        if thread::panicking() {
            self.0.jobs_panicked.fetch_add(1, Ordering::Relaxed);
            let current = thread::current();
            tracing::error!(thread = ?current.name(), "job panicked");
        }
        self.0.jobs_executed.fetch_add(1, Ordering::Relaxed);
    }
}

/// A dedicated worker pool implementing [`JobScheduler`].
///
/// Batches from any number of threads may be dispatched concurrently. A job
/// panic does not kill its worker: the batch still finishes and the first
/// panic is resumed on the dispatching thread.
pub struct JobSystem {
    config: JobSystemConfig,
    pool: ThreadPool,
    counters: Counters,
}

impl JobSystem {
    /// Starts a job system with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the worker pool
    /// cannot be built.
    pub fn new(config: JobSystemConfig) -> JobResult<Self> {
        config.validate()?;

        let prefix = config.thread_name.clone();
        let pool = ThreadPoolBuilder::new()
            .num_threads(config.worker_count)
            .thread_name(move |index| format!("{prefix}-{index}"))
            .build()
            .map_err(|e| JobError::PoolBuild(e.to_string()))?;

        tracing::debug!(workers = pool.current_num_threads(), "job system started");

        Ok(Self {
            config,
            pool,
            counters: Counters::default(),
        })
    }

    /// Returns the configuration the system was started with.
    #[must_use]
    pub fn config(&self) -> &JobSystemConfig {
        &self.config
    }

    /// Returns a snapshot of the job counters.
    #[must_use]
    pub fn stats(&self) -> JobStats {
        JobStats {
            batches: self.counters.batches.load(Ordering::Relaxed),
            jobs_executed: self.counters.jobs_executed.load(Ordering::Relaxed),
            jobs_panicked: self.counters.jobs_panicked.load(Ordering::Relaxed),
        }
    }
}

impl JobScheduler for JobSystem {
    fn worker_count(&self) -> usize {
        self.pool.current_num_threads()
    }

    fn dispatch_and_join<'scope>(&self, jobs: Vec<Job<'scope>>) {
        if jobs.is_empty() {
            return;
        }
        self.counters.batches.fetch_add(1, Ordering::Relaxed);

        let counters = &self.counters;
        self.pool.scope(move |s| {
            for job in jobs {
                s.spawn(move |_| {
                    let _guard = JobGuard(counters);
                    job();
                });
            }
        });
    }
}

impl Drop for JobSystem {
    fn drop(&mut self) {
        tracing::debug!(stats = ?self.stats(), "job system shut down");
    }
}

impl std::fmt::Debug for JobSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobSystem")
            .field("config", &self.config)
            .field("workers", &self.pool.current_num_threads())
            .field("stats", &self.stats())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic::{self, AssertUnwindSafe};
    use std::sync::atomic::AtomicUsize;

    fn system(workers: usize) -> JobSystem {
        JobSystem::new(JobSystemConfig {
            worker_count: workers,
            ..JobSystemConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = JobSystemConfig::default();
        assert_eq!(config.worker_count, 0);
        assert!(config.validate().is_ok());
        assert_eq!(JobSystemConfig::single_worker().worker_count, 1);
    }

    #[test]
    fn test_invalid_thread_name() {
        let config = JobSystemConfig {
            thread_name: String::new(),
            ..JobSystemConfig::default()
        };
        assert!(matches!(JobSystem::new(config), Err(JobError::InvalidConfig(_))));

        let config = JobSystemConfig {
            thread_name: "bad\0name".into(),
            ..JobSystemConfig::default()
        };
        assert!(matches!(config.validate(), Err(JobError::InvalidConfig(_))));
    }

    #[test]
    fn test_worker_count() {
        assert_eq!(system(3).worker_count(), 3);
        assert_eq!(JobSystem::new(JobSystemConfig::single_worker()).unwrap().worker_count(), 1);
        assert!(system(0).worker_count() >= 1);
    }

    #[test]
    fn test_runs_every_job() {
        let jobs = system(4);
        let counter = AtomicUsize::new(0);
        let counter_ref = &counter;

        let batch: Vec<Job<'_>> = (0..64)
            .map(|_| {
                Box::new(move || {
                    counter_ref.fetch_add(1, Ordering::Relaxed);
                }) as Job<'_>
            })
            .collect();
        jobs.dispatch_and_join(batch);

        assert_eq!(counter.load(Ordering::Relaxed), 64);
        let stats = jobs.stats();
        assert_eq!(stats.batches, 1);
        assert_eq!(stats.jobs_executed, 64);
        assert_eq!(stats.jobs_panicked, 0);
    }

    #[test]
    fn test_jobs_borrow_disjoint_halves() {
        let jobs = system(2);

        let mut data = vec![0u8; 16];
        {
            let (a, b) = data.split_at_mut(8);
            jobs.dispatch_and_join(vec![
                Box::new(move || a.fill(7)),
                Box::new(move || b.fill(9)),
            ]);
        }
        assert_eq!(&data[..8], &[7; 8]);
        assert_eq!(&data[8..], &[9; 8]);
    }

    #[test]
    fn test_empty_batch_not_counted() {
        let jobs = system(1);
        jobs.dispatch_and_join(Vec::new());
        assert_eq!(jobs.stats(), JobStats::default());
    }

    #[test]
    fn test_panic_resumed_after_join() {
        let jobs = system(2);
        let finished = AtomicUsize::new(0);
        let finished_ref = &finished;

        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            jobs.dispatch_and_join(vec![
                Box::new(|| panic!("boom")),
                Box::new(move || {
                    finished_ref.fetch_add(1, Ordering::Relaxed);
                }),
                Box::new(move || {
                    finished_ref.fetch_add(1, Ordering::Relaxed);
                }),
            ]);
        }));

        let payload = result.unwrap_err();
        assert_eq!(*payload.downcast_ref::<&str>().unwrap(), "boom");
        // Every non-panicking job still ran before the panic was resumed.
        assert_eq!(finished.load(Ordering::Relaxed), 2);
        assert_eq!(jobs.stats().jobs_panicked, 1);
        assert_eq!(jobs.stats().jobs_executed, 3);

        // Workers survive a panicking job.
        let again = AtomicUsize::new(0);
        let again_ref = &again;
        jobs.dispatch_and_join(vec![Box::new(move || {
            again_ref.fetch_add(1, Ordering::Relaxed);
        })]);
        assert_eq!(again.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_nested_dispatch_does_not_deadlock() {
        let jobs = system(1);
        let jobs_ref = &jobs;
        let counter = AtomicUsize::new(0);
        let counter_ref = &counter;

        let outer: Vec<Job<'_>> = (0..4)
            .map(|_| {
                Box::new(move || {
                    let inner: Vec<Job<'_>> = (0..4)
                        .map(|_| {
                            Box::new(move || {
                                counter_ref.fetch_add(1, Ordering::Relaxed);
                            }) as Job<'_>
                        })
                        .collect();
                    jobs_ref.dispatch_and_join(inner);
                }) as Job<'_>
            })
            .collect();
        jobs.dispatch_and_join(outer);

        assert_eq!(counter.load(Ordering::Relaxed), 16);
        assert_eq!(jobs.stats().batches, 5);
    }
}
