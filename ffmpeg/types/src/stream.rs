/*!
    Stream information types.
*/

use std::fmt;

use crate::{CodecId, Rational};

/**
    Type of media stream.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StreamType {
    /// Video stream
    Video,
    /// Audio stream
    Audio,
}

impl fmt::Display for StreamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Video => write!(f, "video"),
            Self::Audio => write!(f, "audio"),
        }
    }
}

/**
    Information about one stream of an input container.
*/
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StreamInfo {
    /// Index of the stream within its container.
    pub index: usize,
    /// Kind of stream.
    pub stream_type: StreamType,
    /// Codec used.
    pub codec_id: CodecId,
    /// Time base for the stream's packet timestamps.
    pub time_base: Rational,
}

impl StreamInfo {
    /**
        Describe a stream.
    */
    pub fn new(index: usize, stream_type: StreamType, codec_id: CodecId, time_base: Rational) -> Self {
        Self {
            index,
            stream_type,
            codec_id,
            time_base,
        }
    }
}

/**
    How a source stream's codec parameters are carried into an output stream
    during stream copy.
*/
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct StreamCopy {
    /// Reset the codec tag so the output muxer assigns its own.
    pub clear_codec_tag: bool,
    /// Mark codec headers as global (written once, in the container header).
    pub global_header: bool,
}
