use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure of a single batch item. Fully contained by the pipeline: it is
/// rendered into one report line and never aborts the rest of the batch.
#[derive(Debug, Error)]
pub enum ItemError {
    #[error("Invalid video URL")]
    InvalidUrl,

    /// Title lookup failed (video gone, private, or service unreachable).
    #[error("{0:#}")]
    Metadata(anyhow::Error),

    /// Caption lookup failed, including captions being disabled entirely.
    #[error("{0:#}")]
    Captions(anyhow::Error),

    #[error("writing {}: {source}", path.display())]
    FileWrite { path: PathBuf, source: io::Error },
}

/// Save-side history failures. Load-side problems degrade to an empty store
/// with a warning instead of erroring.
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("serializing history: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("writing history file {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
}

/// The only errors that surface out of a batch run as a whole.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("no valid input: every line was blank")]
    EmptyInput,

    #[error(transparent)]
    History(#[from] HistoryError),
}
