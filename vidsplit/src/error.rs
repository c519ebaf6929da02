use std::path::PathBuf;

use ffmpeg_types::{Error as MediaError, StreamType};
use thiserror::Error;

/// Everything that can stop a split, one variant per pipeline stage.
#[derive(Debug, Error)]
pub enum SplitError {
    // ── Input ──────────────────────────────────────────────────────────
    #[error("could not open input '{}'", path.display())]
    OpenFailure {
        path: PathBuf,
        #[source]
        source: MediaError,
    },
    #[error("could not find stream information in '{}'", path.display())]
    ProbeFailure {
        path: PathBuf,
        #[source]
        source: MediaError,
    },
    #[error("no {kind} stream in '{}'", path.display())]
    NoSuchStream { kind: StreamType, path: PathBuf },
    #[error("could not read packet from '{}'", path.display())]
    ReadFailure {
        path: PathBuf,
        #[source]
        source: MediaError,
    },

    // ── Output construction ────────────────────────────────────────────
    #[error("could not allocate {what}")]
    AllocFailure {
        what: String,
        #[source]
        source: MediaError,
    },
    #[error("could not copy {kind} codec parameters to '{}'", path.display())]
    ParamCopyFailure {
        kind: StreamType,
        path: PathBuf,
        #[source]
        source: MediaError,
    },

    // ── Bitstream filter ───────────────────────────────────────────────
    #[error("unknown bitstream filter '{name}'")]
    FilterUnavailable { name: String },
    #[error("could not initialize bitstream filter '{name}'")]
    FilterInitFailure {
        name: String,
        #[source]
        source: MediaError,
    },
    #[error("bitstream filter '{name}' failed")]
    FilterProcessFailure {
        name: String,
        #[source]
        source: MediaError,
    },

    // ── Muxing ─────────────────────────────────────────────────────────
    #[error("could not open '{}' for writing", path.display())]
    IoOpenFailure {
        path: PathBuf,
        #[source]
        source: MediaError,
    },
    #[error("could not write header to '{}'", path.display())]
    HeaderWriteFailure {
        path: PathBuf,
        #[source]
        source: MediaError,
    },
    #[error("could not write {kind} packet to '{}'", path.display())]
    PacketWriteFailure {
        kind: StreamType,
        path: PathBuf,
        #[source]
        source: MediaError,
    },
    #[error("could not write trailer to '{}'", path.display())]
    TrailerWriteFailure {
        path: PathBuf,
        #[source]
        source: MediaError,
    },
}

impl SplitError {
    /// Short name of the operation that failed, for log fields.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::OpenFailure { .. } => "open input",
            Self::ProbeFailure { .. } => "probe streams",
            Self::NoSuchStream { .. } => "select streams",
            Self::ReadFailure { .. } => "read packet",
            Self::AllocFailure { .. } => "allocate",
            Self::ParamCopyFailure { .. } => "copy codec parameters",
            Self::FilterUnavailable { .. } => "find bitstream filter",
            Self::FilterInitFailure { .. } => "initialize bitstream filter",
            Self::FilterProcessFailure { .. } => "filter packet",
            Self::IoOpenFailure { .. } => "open output",
            Self::HeaderWriteFailure { .. } => "write header",
            Self::PacketWriteFailure { .. } => "write packet",
            Self::TrailerWriteFailure { .. } => "write trailer",
        }
    }
}

/// Type alias for results that may return a [`SplitError`].
pub type SplitResult<T> = std::result::Result<T, SplitError>;
