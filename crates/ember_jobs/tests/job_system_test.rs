//! Integration tests for the job system under concurrent load.

use ember_jobs::{Job, JobScheduler, JobSystem, JobSystemConfig};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

fn config(workers: usize) -> JobSystemConfig {
    JobSystemConfig {
        worker_count: workers,
        thread_name: "test-job".into(),
    }
}

#[test]
fn test_disjoint_writes_visible_after_join() {
    let jobs = JobSystem::new(config(4)).unwrap();
    let mut data = vec![0u64; 100_000];

    for pass in 1..=3u64 {
        let batch: Vec<Job<'_>> = data
            .chunks_mut(7_919)
            .enumerate()
            .map(|(chunk_index, chunk)| {
                Box::new(move || {
                    for (offset, value) in chunk.iter_mut().enumerate() {
                        *value += (chunk_index * 7_919 + offset) as u64 * pass;
                    }
                }) as Job<'_>
            })
            .collect();
        jobs.dispatch_and_join(batch);
    }

    // 1 + 2 + 3 passes
    for (i, value) in data.iter().enumerate() {
        assert_eq!(*value, i as u64 * 6);
    }
}

#[test]
fn test_concurrent_dispatchers_share_workers() {
    let jobs = Arc::new(JobSystem::new(config(2)).unwrap());
    let total = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let jobs = Arc::clone(&jobs);
            let total = Arc::clone(&total);
            thread::spawn(move || {
                for _ in 0..50 {
                    let total_ref = &total;
                    let batch: Vec<Job<'_>> = (0..8)
                        .map(|_| {
                            Box::new(move || {
                                total_ref.fetch_add(1, Ordering::Relaxed);
                            }) as Job<'_>
                        })
                        .collect();
                    jobs.dispatch_and_join(batch);
                }
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }

    assert_eq!(total.load(Ordering::Relaxed), 4 * 50 * 8);
    let stats = jobs.stats();
    assert_eq!(stats.batches, 200);
    assert_eq!(stats.jobs_executed, 1600);
}

#[test]
fn test_jobs_run_on_named_workers() {
    let jobs = JobSystem::new(config(2)).unwrap();
    let names = worker_names(&jobs);

    assert_eq!(names.len(), 16);
    assert!(
        names.iter().all(|name| name == "test-job-0" || name == "test-job-1"),
        "unexpected thread names: {names:?}"
    );
}

/// Collects the name of the thread that ran each job of a 16-job batch.
fn worker_names(jobs: &JobSystem) -> Vec<String> {
    let caller = thread::current().id();
    let names = parking_lot::Mutex::new(Vec::new());
    let names_ref = &names;

    let batch: Vec<Job<'_>> = (0..16)
        .map(|_| {
            Box::new(move || {
                let current = thread::current();
                assert_ne!(current.id(), caller, "job ran on the dispatching thread");
                names_ref
                    .lock()
                    .push(current.name().unwrap_or_default().to_string());
            }) as Job<'_>
        })
        .collect();
    jobs.dispatch_and_join(batch);

    names.into_inner()
}
