//! The concurrency test: a batch of writers with distinct keys fired
//! through a thread pool at a shared engine.

use std::thread;
use std::time::{Duration, Instant};

use crossbeam::channel::{self, RecvTimeoutError};
use log::{debug, info, warn};

use crate::engines::KvsEngine;
use crate::thread_pool::ThreadPool;

/// Settings for [`run_concurrency_test`].
#[derive(Debug, Clone)]
pub struct WorkloadConfig {
    /// Number of put tasks to submit.
    pub tasks: usize,
    /// Number of workers in the pool built for each run.
    pub threads: u32,
    /// How long to wait for every task to report back.
    pub timeout: Duration,
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        WorkloadConfig {
            tasks: 20,
            threads: 4,
            timeout: Duration::from_secs(60),
        }
    }
}

/// What one task did.
#[derive(Debug, Clone)]
pub struct TaskOutcome {
    /// Task number, `0..tasks`.
    pub id: usize,
    /// The key the task wrote.
    pub key: String,
    /// Name (or id) of the thread that ran the task.
    pub worker: String,
    /// Whether the put was accepted.
    pub stored: bool,
}

/// Summary of a [`run_concurrency_test`] run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkloadReport {
    /// Tasks handed to the pool.
    pub submitted: usize,
    /// Tasks that reported back before the deadline.
    pub completed: usize,
    /// Completed tasks whose put was accepted.
    pub succeeded: usize,
    /// The deadline passed before every task reported back.
    pub timed_out: bool,
}

/// Key written by task `id`.
pub(crate) fn task_key(id: usize) -> String {
    format!("thread_key_{id}")
}

/// Submits `config.tasks` puts, each with a distinct key, to `pool` and
/// waits up to `config.timeout` for them to finish.
///
/// `progress` is called on the calling thread once per finished task, in
/// completion order. A timeout is reported in the returned
/// [`WorkloadReport`]; tasks still in flight are left to finish on their
/// own.
pub fn run_concurrency_test<E, P, F>(
    engine: &E,
    pool: &P,
    config: &WorkloadConfig,
    mut progress: F,
) -> WorkloadReport
where
    E: KvsEngine,
    P: ThreadPool,
    F: FnMut(&TaskOutcome),
{
    let (tx, rx) = channel::unbounded();

    for id in 0..config.tasks {
        let engine = engine.clone();
        let tx = tx.clone();
        pool.spawn(move || {
            let current = thread::current();
            let worker = match current.name() {
                Some(name) => name.to_owned(),
                None => format!("{:?}", current.id()),
            };
            let key = task_key(id);
            let value = format!("Task_Value_{id}_by_Thread_{worker}");
            debug!("Task {id} on {worker} putting {key}");
            let stored = engine.put(key.clone(), value).is_ok();
            // The harness may have stopped listening after a timeout.
            let _ = tx.send(TaskOutcome {
                id,
                key,
                worker,
                stored,
            });
        });
    }
    drop(tx);
    info!("Submitted {} concurrent writes", config.tasks);

    // A timeout too large to add to `now` means waiting without a deadline.
    let deadline = Instant::now().checked_add(config.timeout);
    let mut report = WorkloadReport {
        submitted: config.tasks,
        ..WorkloadReport::default()
    };
    while report.completed < report.submitted {
        let received = match deadline {
            Some(deadline) => rx.recv_deadline(deadline),
            None => rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
        };
        match received {
            Ok(outcome) => {
                report.completed += 1;
                if outcome.stored {
                    report.succeeded += 1;
                }
                progress(&outcome);
            }
            Err(RecvTimeoutError::Timeout) => {
                warn!(
                    "Concurrency test timed out after {:?} with {}/{} tasks done",
                    config.timeout, report.completed, report.submitted
                );
                report.timed_out = true;
                break;
            }
            Err(RecvTimeoutError::Disconnected) => {
                // Every sender is gone: the remaining tasks died without
                // reporting (a panicking job drops its sender).
                warn!(
                    "{} concurrency test tasks never reported back",
                    report.submitted - report.completed
                );
                break;
            }
        }
    }

    info!(
        "Concurrency test done: {}/{} stored",
        report.succeeded, report.submitted
    );
    report
}
