use std::path::PathBuf;
use thiserror::Error;

/// Failures surfaced by the core. Every variant is fatal to the current
/// invocation; nothing is retried. Variants carry the paths involved so the
/// operator can repair things by hand.
#[derive(Debug, Error)]
pub enum OderError {
    #[error("invalid path {path:?}: {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("{path} is already a symlink into the cache area")]
    AlreadyMigrated { path: PathBuf },

    #[error("not enough space in the cache area: need {needed} bytes, {available} available")]
    InsufficientSpace { needed: u64, available: u64 },

    #[error("failed to create directory {path}: {source}")]
    DirectoryCreateFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to create symlink {link} -> {target}: {source}")]
    SymlinkFailed {
        link: PathBuf,
        target: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("control panel API error: {0}")]
    ExternalApiError(String),

    #[error("cache config {path} is corrupt: {reason}")]
    ConfigCorrupt { path: PathBuf, reason: String },

    #[error("domain {0} does not exist on this account")]
    DomainNotFound(String),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl OderError {
    /// Wraps an `io::Error` from a filesystem primitive with the path context
    /// the operator needs to diagnose it.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, OderError>;
