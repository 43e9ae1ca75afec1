use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

/// Result alias used throughout the collector.
pub type Result<T> = std::result::Result<T, Error>;

// ─── Unified error type ──────────────────────────────────────────

#[derive(Debug, Error)]
pub enum Error {
    /// A metrics file could not be created or written.
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    /// The debug listener could not bind its loopback port.
    #[error("cannot listen on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("config {}: {source}", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: Box<Error>,
    },

    #[error("histogram: {0}")]
    Histogram(#[from] hdrhistogram::CreationError),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
