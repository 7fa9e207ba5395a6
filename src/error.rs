//! Error kinds for the solver library. Internal invariant violations are
//! `debug_assert!`-only (spec: build-phase bugs, not recoverable conditions);
//! everything a caller can actually hit at runtime is represented here.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SolverError {
    #[error("I/O failure reading or writing solver data")]
    Io(#[from] std::io::Error),

    #[error("word index hash table is full after a full probe cycle")]
    HashTableFull,

    #[error("configuration field `{field}` is out of range: {value}")]
    ConfigOutOfRange { field: &'static str, value: String },

    #[error("override letter list `{letters}` must be distinct lowercase ascii letters")]
    MalformedOverride { letters: String },
}
