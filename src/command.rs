use crate::{KvError, Result};

const PUT_USAGE: &str = "PUT <key> <value>";
const GET_USAGE: &str = "GET <key>";
const DELETE_USAGE: &str = "DELETE <key>";

/// A command entered at the shell prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Insert or update a key-value pair.
    Put {
        /// The key to set.
        key: String,
        /// The value, which may contain embedded whitespace.
        value: String,
    },
    /// Look up the value of a key.
    Get {
        /// The key to look up.
        key: String,
    },
    /// Remove a key.
    Delete {
        /// The key to remove.
        key: String,
    },
    /// List every stored key.
    Keys,
    /// Run the concurrent write workload.
    ConcurrencyTest,
    /// Print the command summary.
    Help,
    /// Leave the shell.
    Exit,
}

impl Command {
    /// Parses one input line.
    ///
    /// The command word is case-insensitive; the key and value keep the
    /// case they were typed in. The value is the rest of the line after
    /// the key. Returns `Ok(None)` for a blank line.
    ///
    /// # Errors
    ///
    /// [`KvError::Usage`] on a wrong argument count and
    /// [`KvError::UnknownCommand`] on an unrecognized command word.
    pub fn parse(line: &str) -> Result<Option<Command>> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (word, rest) = split_token(line);
        let (key, value) = split_token(rest);

        let command = match word.to_ascii_uppercase().as_str() {
            "PUT" => match (key, value) {
                ("", _) | (_, "") => return Err(KvError::Usage(PUT_USAGE)),
                (key, value) => Command::Put {
                    key: key.to_owned(),
                    value: value.to_owned(),
                },
            },
            "GET" => Command::Get {
                key: single_arg(key, value, GET_USAGE)?,
            },
            "DELETE" => Command::Delete {
                key: single_arg(key, value, DELETE_USAGE)?,
            },
            "KEYS" => no_args(rest, "KEYS", Command::Keys)?,
            "CONCURRENCY_TEST" => no_args(rest, "CONCURRENCY_TEST", Command::ConcurrencyTest)?,
            "HELP" => no_args(rest, "HELP", Command::Help)?,
            "EXIT" => no_args(rest, "EXIT", Command::Exit)?,
            _ => return Err(KvError::UnknownCommand(word.to_owned())),
        };
        Ok(Some(command))
    }
}

/// Splits off the first whitespace-delimited token. The remainder has
/// its leading whitespace stripped.
fn split_token(s: &str) -> (&str, &str) {
    match s.split_once(char::is_whitespace) {
        Some((token, rest)) => (token, rest.trim_start()),
        None => (s, ""),
    }
}

fn single_arg(key: &str, extra: &str, usage: &'static str) -> Result<String> {
    if key.is_empty() || !extra.is_empty() {
        return Err(KvError::Usage(usage));
    }
    Ok(key.to_owned())
}

fn no_args(rest: &str, usage: &'static str, command: Command) -> Result<Command> {
    if !rest.is_empty() {
        return Err(KvError::Usage(usage));
    }
    Ok(command)
}
