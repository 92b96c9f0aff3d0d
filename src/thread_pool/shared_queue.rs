use std::thread;

use crossbeam::channel::{self, Receiver, Sender};
use log::{debug, error};

use super::ThreadPool;
use crate::{KvError, Result};

type Job = Box<dyn FnOnce() + Send + 'static>;

/// A thread pool using a shared job queue.
///
/// Workers pull jobs from a single MPMC channel. A panicking job is
/// caught and logged; the worker keeps serving the queue. Dropping the
/// pool closes the channel and workers exit once the queue drains.
pub struct SharedQueueThreadPool {
    tx: Sender<Job>,
}

impl ThreadPool for SharedQueueThreadPool {
    fn new(threads: u32) -> Result<Self> {
        if threads == 0 {
            return Err(KvError::StringError(
                "shared queue thread pool needs at least one thread".to_owned(),
            ));
        }

        let (tx, rx) = channel::unbounded::<Job>();

        for id in 0..threads {
            spawn_worker(id, rx.clone())?;
        }

        Ok(SharedQueueThreadPool { tx })
    }

    fn spawn<F>(&self, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        // Workers only exit once `tx` is dropped, so the channel is open
        // for as long as `self` is alive.
        self.tx
            .send(Box::new(job))
            .expect("thread pool has no active threads");
    }
}

/// Spawns a single worker thread that pulls jobs from the receiver.
fn spawn_worker(id: u32, rx: Receiver<Job>) -> Result<()> {
    thread::Builder::new()
        .name(format!("pool-worker-{id}"))
        .spawn(move || loop {
            match rx.recv() {
                Ok(job) => {
                    debug!("Worker {id} executing job");
                    if std::panic::catch_unwind(std::panic::AssertUnwindSafe(job)).is_err() {
                        error!("Worker {id} job panicked, continuing");
                    }
                }
                Err(_) => {
                    debug!("Worker {id}: channel closed, shutting down");
                    return;
                }
            }
        })?;
    Ok(())
}
