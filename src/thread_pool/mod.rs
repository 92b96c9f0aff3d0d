use crate::Result;

/// Runs the jobs of one CONCURRENCY_TEST.
///
/// The shell builds a fresh pool for every test run, hands it one job per
/// write, and drops it afterwards. Dropping a pool never cancels jobs that
/// are already queued or running.
pub trait ThreadPool {
    /// Builds a pool with `threads` workers.
    ///
    /// # Errors
    ///
    /// Returns [`KvError::StringError`](crate::KvError::StringError) when
    /// the pool cannot run with that many workers (zero, for pools that
    /// honour the size) or the worker threads cannot be started.
    fn new(threads: u32) -> Result<Self>
    where
        Self: Sized;

    /// Queues `job` to run on one of the pool's threads.
    ///
    /// Never blocks waiting for the job to finish; a panicking job must
    /// not take the pool down with it.
    fn spawn<F>(&self, job: F)
    where
        F: FnOnce() + Send + 'static;
}

mod naive;
mod rayon_pool;
mod shared_queue;

pub use self::naive::NaiveThreadPool;
pub use self::rayon_pool::RayonThreadPool;
pub use self::shared_queue::SharedQueueThreadPool;

#[cfg(test)]
pub(crate) use self::stalled::StalledPool;

#[cfg(test)]
mod stalled {
    use std::sync::Mutex;

    use super::ThreadPool;
    use crate::Result;

    /// Accepts jobs and never runs them, so a workload over it can only
    /// end by timing out.
    pub(crate) struct StalledPool {
        jobs: Mutex<Vec<Box<dyn FnOnce() + Send>>>,
    }

    impl ThreadPool for StalledPool {
        fn new(_threads: u32) -> Result<Self> {
            Ok(StalledPool {
                jobs: Mutex::new(Vec::new()),
            })
        }

        fn spawn<F>(&self, job: F)
        where
            F: FnOnce() + Send + 'static,
        {
            self.jobs.lock().unwrap().push(Box::new(job));
        }
    }
}
