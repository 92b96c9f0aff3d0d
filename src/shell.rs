use std::io::{BufRead, Write};
use std::marker::PhantomData;

use log::debug;

use crate::command::Command;
use crate::engines::KvsEngine;
use crate::thread_pool::ThreadPool;
use crate::workload::{run_concurrency_test, WorkloadConfig};
use crate::{KvError, Result};

const HELP: &str = "\
--- Available Commands ---
PUT <key> <value>   - Inserts or updates a key-value pair.
GET <key>           - Retrieves the value for a key.
DELETE <key>        - Removes a key-value pair.
KEYS                - Lists all keys currently stored.
CONCURRENCY_TEST    - Runs a multi-threaded write test.
HELP                - Shows this summary.
EXIT                - Terminates the application.
--------------------------";

/// Whether the shell keeps reading after a command.
#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

/// The interactive command shell.
///
/// Generic over the storage engine `E` and the thread pool `P` that the
/// concurrency test builds on demand.
pub struct Shell<E: KvsEngine, P: ThreadPool> {
    engine: E,
    workload: WorkloadConfig,
    pool: PhantomData<P>,
}

impl<E: KvsEngine, P: ThreadPool> Shell<E, P> {
    /// Creates a shell over `engine` with the given workload settings.
    pub fn new(engine: E, workload: WorkloadConfig) -> Self {
        Self {
            engine,
            workload,
            pool: PhantomData,
        }
    }

    /// Runs the read-eval-print loop until `EXIT` or end of input.
    ///
    /// Results go to `out`; usage errors, rejected puts and missing keys
    /// go to `err` and do not stop the loop.
    ///
    /// # Errors
    ///
    /// Returns [`KvError::Io`] if reading `input` or writing either
    /// stream fails.
    pub fn run<R, W, X>(&self, mut input: R, mut out: W, mut err: X) -> Result<()>
    where
        R: BufRead,
        W: Write,
        X: Write,
    {
        writeln!(out, "--- In-Memory Key-Value Store Initialized ---")?;
        writeln!(out, "Type 'HELP' for commands.")?;
        writeln!(out, "---------------------------------------------")?;

        let mut line = String::new();
        loop {
            write!(out, "> ")?;
            out.flush()?;

            line.clear();
            if input.read_line(&mut line)? == 0 {
                debug!("Input exhausted, leaving shell");
                return Ok(());
            }

            let outcome = Command::parse(&line).and_then(|command| match command {
                Some(command) => self.execute(command, &mut out),
                None => Ok(Flow::Continue),
            });
            match outcome {
                Ok(Flow::Continue) => {}
                Ok(Flow::Exit) => return Ok(()),
                Err(KvError::Io(e)) => return Err(KvError::Io(e)),
                Err(e) => writeln!(err, "Error: {}", e)?,
            }
        }
    }

    fn execute<W: Write>(&self, command: Command, out: &mut W) -> Result<Flow> {
        debug!("Executing {:?}", command);
        match command {
            Command::Put { key, value } => {
                self.engine.put(key.clone(), value)?;
                writeln!(out, "Success: Key '{}' stored.", key)?;
            }
            Command::Get { key } => match self.engine.get(&key) {
                Some(value) => writeln!(out, "Result: {}", value)?,
                None => return Err(KvError::KeyNotFound(key)),
            },
            Command::Delete { key } => {
                if !self.engine.delete(&key) {
                    return Err(KvError::KeyNotFound(key));
                }
                writeln!(out, "Success: Key '{}' deleted.", key)?;
            }
            Command::Keys => self.print_keys(out)?,
            Command::ConcurrencyTest => self.concurrency_test(out)?,
            Command::Help => writeln!(out, "{}", HELP)?,
            Command::Exit => {
                writeln!(out, "Shutting down database simulator.")?;
                return Ok(Flow::Exit);
            }
        }
        Ok(Flow::Continue)
    }

    fn print_keys<W: Write>(&self, out: &mut W) -> Result<()> {
        let mut keys = self.engine.keys();
        if keys.is_empty() {
            writeln!(out, "The database is currently empty.")?;
            return Ok(());
        }

        keys.sort_unstable();
        writeln!(out, "--- All Stored Keys ({}) ---", keys.len())?;
        for key in &keys {
            writeln!(out, "{}", key)?;
        }
        writeln!(out, "-----------------------------------")?;
        Ok(())
    }

    fn concurrency_test<W: Write>(&self, out: &mut W) -> Result<()> {
        let pool = P::new(self.workload.threads)?;
        writeln!(
            out,
            "--- Starting Concurrency Test ({} writers, {} threads) ---",
            self.workload.tasks, self.workload.threads
        )?;

        let mut write_error = None;
        let report = run_concurrency_test(&self.engine, &pool, &self.workload, |outcome| {
            if write_error.is_some() {
                return;
            }
            let status = if outcome.stored { "stored" } else { "rejected" };
            if let Err(e) = writeln!(
                out,
                "[Task {}] PUT {} on {}: {}",
                outcome.id, outcome.key, outcome.worker, status
            ) {
                write_error = Some(e);
            }
        });
        if let Some(e) = write_error {
            return Err(e.into());
        }

        if report.timed_out {
            writeln!(out, "Warning: Tasks did not finish in time.")?;
        }
        writeln!(
            out,
            "--- Concurrency Test Finished: {}/{} writes stored. Check KEYS to see results. ---",
            report.succeeded, report.submitted
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::time::Duration;

    use super::*;
    use crate::thread_pool::StalledPool;
    use crate::{LockedKvStore, NaiveThreadPool, ShardedKvStore, SharedQueueThreadPool};

    fn run_script<E: KvsEngine>(engine: E, script: &str) -> (String, String) {
        let shell: Shell<E, SharedQueueThreadPool> = Shell::new(engine, WorkloadConfig::default());
        let mut out = Vec::new();
        let mut err = Vec::new();
        shell
            .run(Cursor::new(script.as_bytes()), &mut out, &mut err)
            .unwrap();
        (
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[test]
    fn put_get_delete_round() {
        let store = ShardedKvStore::with_shards(4);
        let (out, err) = run_script(
            store.clone(),
            "PUT name Ada Lovelace\nGET name\nDELETE name\nGET name\n",
        );

        assert!(out.contains("Success: Key 'name' stored."));
        assert!(out.contains("Result: Ada Lovelace"));
        assert!(out.contains("Success: Key 'name' deleted."));
        assert_eq!(err, "Error: Key 'name' not found.\n");
        assert!(store.is_empty());
    }

    #[test]
    fn keys_lists_sorted_with_count() {
        let (out, _) = run_script(LockedKvStore::new(), "KEYS\nPUT b 2\nPUT a 1\nKEYS\n");

        assert!(out.contains("The database is currently empty."));
        assert!(out.contains("--- All Stored Keys (2) ---\na\nb\n"));
    }

    #[test]
    fn errors_do_not_end_the_session() {
        let (out, err) = run_script(
            ShardedKvStore::with_shards(2),
            "BOGUS\nPUT onlykey\nDELETE ghost\n\nPUT k v\nEXIT\nPUT never run\n",
        );

        assert_eq!(
            err,
            "Error: Unknown command 'BOGUS'. Type 'HELP'.\n\
             Error: Usage: PUT <key> <value>\n\
             Error: Key 'ghost' not found.\n"
        );
        assert!(out.contains("Success: Key 'k' stored."));
        assert!(out.ends_with("Shutting down database simulator.\n"));
        assert!(!out.contains("'never' stored"));
    }

    #[test]
    fn keys_and_values_keep_their_case() {
        let store = ShardedKvStore::with_shards(2);
        let (out, _) = run_script(store.clone(), "put CamelKey MiXeD value\nget CamelKey\n");

        assert!(out.contains("Result: MiXeD value"));
        assert_eq!(store.get("CamelKey"), Some("MiXeD value".to_owned()));
        assert_eq!(store.get("CAMELKEY"), None);
    }

    #[test]
    fn help_lists_every_command() {
        let (out, _) = run_script(LockedKvStore::new(), "HELP\n");
        for word in ["PUT", "GET", "DELETE", "KEYS", "CONCURRENCY_TEST", "HELP", "EXIT"] {
            assert!(out.contains(word), "help is missing {word}");
        }
    }

    #[test]
    fn concurrency_test_fills_the_store() {
        let store = ShardedKvStore::with_shards(4);
        let (out, err) = run_script(store.clone(), "CONCURRENCY_TEST\nKEYS\n");

        assert_eq!(err, "");
        assert!(out.contains("20/20 writes stored"));
        assert!(out.contains("--- All Stored Keys (20) ---"));
        assert_eq!(out.matches("] PUT thread_key_").count(), 20);
        for id in 0..20 {
            assert!(store.get(&format!("thread_key_{id}")).is_some());
        }
    }

    #[test]
    fn concurrency_test_runs_on_naive_pool() {
        let store = LockedKvStore::new();
        let shell: Shell<_, NaiveThreadPool> = Shell::new(
            store.clone(),
            WorkloadConfig {
                tasks: 8,
                ..WorkloadConfig::default()
            },
        );
        let mut out = Vec::new();
        shell
            .run(Cursor::new("CONCURRENCY_TEST\n"), &mut out, Vec::new())
            .unwrap();

        assert_eq!(store.len(), 8);
    }

    #[test]
    fn pool_construction_failure_is_reported() {
        let shell: Shell<_, SharedQueueThreadPool> = Shell::new(
            LockedKvStore::new(),
            WorkloadConfig {
                threads: 0,
                ..WorkloadConfig::default()
            },
        );
        let mut out = Vec::new();
        let mut err = Vec::new();
        shell
            .run(Cursor::new("CONCURRENCY_TEST\nEXIT\n"), &mut out, &mut err)
            .unwrap();

        let err = String::from_utf8(err).unwrap();
        assert!(err.starts_with("Error: shared queue thread pool needs at least one thread"));
        assert!(String::from_utf8(out).unwrap().contains("Shutting down"));
    }

    #[test]
    fn stalled_concurrency_test_warns_on_stdout_and_continues() {
        let shell: Shell<_, StalledPool> = Shell::new(
            LockedKvStore::new(),
            WorkloadConfig {
                tasks: 3,
                threads: 1,
                timeout: Duration::from_millis(50),
            },
        );
        let mut out = Vec::new();
        let mut err = Vec::new();
        shell
            .run(
                Cursor::new("CONCURRENCY_TEST\nPUT after test\nEXIT\n"),
                &mut out,
                &mut err,
            )
            .unwrap();

        let out = String::from_utf8(out).unwrap();
        assert_eq!(String::from_utf8(err).unwrap(), "");
        assert!(out.contains("Warning: Tasks did not finish in time.\n"));
        assert!(out.contains("0/3 writes stored"));
        assert!(out.contains("Success: Key 'after' stored."));
    }
}
