use std::path::{Path, PathBuf};

/**
    Everything one split run needs to know.

    Built once from the command line and read-only afterwards.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitConfig {
    /// Multiplexed input container.
    pub input: PathBuf,
    /// Destination of the video elementary stream.
    pub video_output: PathBuf,
    /// Destination of the audio elementary stream.
    pub audio_output: PathBuf,
    /// Bitstream filter for video packets, or `None` to pick one by codec.
    pub bitstream_filter: Option<String>,
}

impl SplitConfig {
    /**
        Create a config for the given input and output paths.
    */
    pub fn new(
        input: impl Into<PathBuf>,
        video_output: impl Into<PathBuf>,
        audio_output: impl Into<PathBuf>,
    ) -> Self {
        Self {
            input: input.into(),
            video_output: video_output.into(),
            audio_output: audio_output.into(),
            bitstream_filter: None,
        }
    }

    /**
        Use a specific bitstream filter for video packets.
    */
    pub fn with_bitstream_filter(mut self, name: impl Into<String>) -> Self {
        self.bitstream_filter = Some(name.into());
        self
    }

    pub fn input(&self) -> &Path {
        &self.input
    }

    pub fn video_output(&self) -> &Path {
        &self.video_output
    }

    pub fn audio_output(&self) -> &Path {
        &self.audio_output
    }
}
