/*!
    Error type shared by the ffmpeg crates.
*/

use std::fmt;

/**
    Something the media library, or the glue around it, refused to do.

    Messages from FFmpeg carry the name of the call that failed, for example
    `avio_open: Permission denied`.
*/
#[derive(Debug)]
pub enum Error {
    /// Filesystem error, such as a missing input file.
    Io(std::io::Error),
    /// A call into FFmpeg returned an error code.
    Ffmpeg { message: String },
    /// An argument FFmpeg cannot take, such as a path with a nul byte.
    InvalidData { message: String },
    /// FFmpeg has no muxer, demuxer or filter for what was asked.
    UnsupportedFormat { message: String },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "{e}"),
            Self::Ffmpeg { message } => f.write_str(message),
            Self::InvalidData { message } => write!(f, "invalid data: {message}"),
            Self::UnsupportedFormat { message } => write!(f, "unsupported: {message}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl Error {
    pub fn ffmpeg(message: impl Into<String>) -> Self {
        Self::Ffmpeg {
            message: message.into(),
        }
    }

    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::InvalidData {
            message: message.into(),
        }
    }

    pub fn unsupported_format(message: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            message: message.into(),
        }
    }

    /**
        Returns true if the error means a file was not found.
    */
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Io(e) if e.kind() == std::io::ErrorKind::NotFound)
    }
}

/**
    Result type alias for the ffmpeg crates.
*/
pub type Result<T> = std::result::Result<T, Error>;
