use std::thread;

use log::error;

use super::ThreadPool;
use crate::Result;

/// A naive thread pool that spawns a new thread for every job.
///
/// It doesn't reuse threads at all. Useful as a baseline for the
/// concurrency test: every write really does run on its own thread.
pub struct NaiveThreadPool;

impl ThreadPool for NaiveThreadPool {
    fn new(_threads: u32) -> Result<Self> {
        Ok(NaiveThreadPool)
    }

    fn spawn<F>(&self, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        if let Err(e) = thread::Builder::new().spawn(job) {
            error!("Failed to spawn thread for job: {}", e);
        }
    }
}
