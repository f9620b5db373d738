use std::io;
use std::process::ExitStatus;

use thiserror::Error;

/// Failure of one of the external providers (process listing, scheduler query).
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("`{command}` exited with {status}")]
    Exit { command: String, status: ExitStatus },

    #[error("`{command}` produced output that is not valid UTF-8")]
    Utf8 { command: String },

    #[error("no process listing command is known for this platform")]
    Unsupported,
}

/// A well-formed process table line whose numeric field could not be used.
#[derive(Debug, Error, PartialEq)]
#[error("line {line}: invalid {field} value `{value}`")]
pub struct ParseError {
    pub line: usize,
    pub field: &'static str,
    pub value: String,
}

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("process table unavailable")]
    Source(#[from] SourceError),

    #[error("malformed process table")]
    Parse(#[from] ParseError),
}
