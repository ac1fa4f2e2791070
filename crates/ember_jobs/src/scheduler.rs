//! # Scheduler Capability
//!
//! The single seam bulk operations are written against.

/// A unit of work submitted to a scheduler.
///
/// Jobs may borrow anything that outlives the `dispatch_and_join` call
/// they are submitted through.
pub type Job<'scope> = Box<dyn FnOnce() + Send + 'scope>;

/// A fork/join job scheduler.
///
/// Implementations must uphold one contract: `dispatch_and_join` does not
/// return until every job it was handed has finished running. Callers rely
/// on this to hand out disjoint borrows of their own data to jobs.
pub trait JobScheduler: Send + Sync {
    /// Number of threads that execute jobs concurrently.
    ///
    /// Used as the default ceiling on how many groups a bulk operation is
    /// split into.
    fn worker_count(&self) -> usize;

    /// Submits every job to one completion group, then blocks until the
    /// whole group is done.
    ///
    /// All jobs are submitted before waiting starts. No ordering between
    /// jobs is guaranteed. An empty batch returns immediately.
    ///
    /// # Panics
    ///
    /// If a job panics, the panic is resumed on the calling thread. Whether
    /// the remaining jobs run first depends on the implementation.
    fn dispatch_and_join<'scope>(&self, jobs: Vec<Job<'scope>>);
}

/// Runs every job on the calling thread, in submission order.
///
/// Deterministic, so bulk operations built on it are easy to test.
#[derive(Clone, Copy, Debug, Default)]
pub struct InlineScheduler;

impl InlineScheduler {
    /// Creates a new inline scheduler.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl JobScheduler for InlineScheduler {
    fn worker_count(&self) -> usize {
        1
    }

    fn dispatch_and_join<'scope>(&self, jobs: Vec<Job<'scope>>) {
        for job in jobs {
            job();
        }
    }
}
