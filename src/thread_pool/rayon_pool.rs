use log::error;

use super::ThreadPool;
use crate::{KvError, Result};

/// A pool on rayon's work-stealing scheduler.
///
/// Each worker is named `rayon-worker-<n>`, which shows up in the values
/// the concurrency test writes.
pub struct RayonThreadPool {
    pool: rayon::ThreadPool,
}

impl ThreadPool for RayonThreadPool {
    fn new(threads: u32) -> Result<Self> {
        // rayon reads 0 as "one per CPU", which would ignore the requested size.
        if threads == 0 {
            return Err(KvError::StringError(
                "rayon thread pool needs at least one thread".to_owned(),
            ));
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads as usize)
            .thread_name(|id| format!("rayon-worker-{id}"))
            .build()
            .map_err(|e| KvError::StringError(e.to_string()))?;
        Ok(RayonThreadPool { pool })
    }

    fn spawn<F>(&self, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        // rayon aborts the process when a spawned job panics.
        self.pool.spawn(move || {
            if std::panic::catch_unwind(std::panic::AssertUnwindSafe(job)).is_err() {
                error!("Rayon job panicked, continuing");
            }
        });
    }
}
