/*!
    Opaque codec configuration for passing to sinks and filters.
*/

use ffmpeg_next::codec;

use ffmpeg_types::CodecId;

use crate::convert::codec_id_from_ffmpeg;

/**
    Opaque codec configuration extracted from a source stream.

    This holds the codec parameters needed to set up a stream-copy output or a
    bitstream filter. It's intentionally opaque to keep ffmpeg-next types out
    of the vocabulary crate.

    The parameters are a detached copy: holding a `CodecConfig` does not keep
    the originating input container open.
*/
pub struct CodecConfig {
    /// The raw codec parameters.
    parameters: codec::Parameters,
}

impl CodecConfig {
    /**
        Create a new codec config from ffmpeg parameters.

        Parameters borrowed from a stream keep a reference to their container;
        cloning them here copies the values into a standalone allocation.
    */
    pub fn new(parameters: &codec::Parameters) -> Self {
        Self {
            parameters: parameters.clone(),
        }
    }

    /**
        Get the codec these parameters describe.
    */
    pub fn codec_id(&self) -> CodecId {
        codec_id_from_ffmpeg(self.parameters.id())
    }

    /**
        Get a reference to the internal parameters.

        Used by `ffmpeg-sink` and `ffmpeg-bsf`, which copy them into their
        own FFmpeg contexts.
    */
    pub fn parameters(&self) -> &codec::Parameters {
        &self.parameters
    }
}

impl Clone for CodecConfig {
    fn clone(&self) -> Self {
        Self {
            parameters: self.parameters.clone(),
        }
    }
}

impl std::fmt::Debug for CodecConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodecConfig")
            .field("codec_id", &self.codec_id())
            .finish_non_exhaustive()
    }
}
