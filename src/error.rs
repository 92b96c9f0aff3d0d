use std::io;
use thiserror::Error;

/// Error type for memkv operations.
#[derive(Error, Debug)]
pub enum KvError {
    /// IO error on the shell's input or output streams.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// A put was given an empty or whitespace-only key or value.
    #[error("Key and value cannot be empty.")]
    EmptyKeyOrValue,

    /// Key not found in the store.
    #[error("Key '{0}' not found.")]
    KeyNotFound(String),

    /// A command was given the wrong number of arguments.
    #[error("Usage: {0}")]
    Usage(&'static str),

    /// The command word is not recognized.
    #[error("Unknown command '{0}'. Type 'HELP'.")]
    UnknownCommand(String),

    /// Error with a string message.
    #[error("{0}")]
    StringError(String),
}

/// Result type alias for memkv operations.
pub type Result<T> = std::result::Result<T, KvError>;
