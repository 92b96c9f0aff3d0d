#![deny(missing_docs)]

//! A concurrent in-memory key-value store with an interactive shell.
//!
//! The store is a string-to-string mapping that many threads can read
//! and write at once. Keys are spread over independently locked shards,
//! so operations on unrelated keys do not wait on each other. A
//! line-oriented shell drives the store and can fire a batch of
//! concurrent writes through a pluggable thread pool.

mod command;
mod engines;
mod error;
mod shell;
/// Thread pool implementations for the concurrent write workload.
pub mod thread_pool;
pub mod workload;

pub use command::Command;
pub use engines::{KvsEngine, LockedKvStore, ShardedKvStore, MAX_SHARDS};
pub use error::{KvError, Result};
pub use shell::Shell;
pub use thread_pool::{NaiveThreadPool, RayonThreadPool, SharedQueueThreadPool, ThreadPool};
pub use workload::{run_concurrency_test, TaskOutcome, WorkloadConfig, WorkloadReport};
