//! Error types for swift-client.

use std::fmt;
use std::io;

use thiserror::Error;

use crate::data::ResourceLevel;

/// A response the storage service answered with a status the client knows
/// how to name for the resource level it targeted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainError {
    pub status:  u16,
    pub message: &'static str,
    pub level:   ResourceLevel,
    /// `"{METHOD} {url}"` of the call that produced the status.
    pub action:  String,
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ({}): {}",
            self.level, self.status, self.action, self.message
        )
    }
}

impl std::error::Error for DomainError {}

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid credentials: {0}")]
    InvalidCredentials(&'static str),

    #[error("authentication against {url} failed: {reason}")]
    Authentication {
        url:    String,
        status: Option<u16>,
        reason: String,
    },

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("local and remote hash do not match: remote {remote}, local {local}")]
    ChecksumMismatch { remote: String, local: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("local file error: {0}")]
    Io(#[from] io::Error),
}

/// Discriminant of [`Error`], for callers that branch on the kind of failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidCredentials,
    Authentication,
    Domain,
    ChecksumMismatch,
    Transport,
    Io,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidCredentials(_) => ErrorKind::InvalidCredentials,
            Error::Authentication { .. } => ErrorKind::Authentication,
            Error::Domain(_) => ErrorKind::Domain,
            Error::ChecksumMismatch { .. } => ErrorKind::ChecksumMismatch,
            Error::Transport(_) => ErrorKind::Transport,
            Error::Io(_) => ErrorKind::Io,
        }
    }

    pub fn as_domain(&self) -> Option<&DomainError> {
        match self {
            Error::Domain(e) => Some(e),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Failures inside the session cache. These never reach callers of the client;
/// the cache logs them and falls back to a fresh handshake.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error(transparent)]
    Fs(#[from] swift_fs::Error),

    #[error("cache store is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
}
