use std::ffi::OsString;
use std::path::PathBuf;

use clap::Parser;
use tracing::Level;

use crate::config::SplitConfig;

/**
    Split a media file into its best video stream and its best audio stream,
    each written to its own file without re-encoding.

    Output formats are guessed from the file extensions, for example
    `vidsplit movie.mp4 video.h264 audio.aac`.
*/
#[derive(Debug, Parser)]
#[command(name = "vidsplit", version)]
pub struct Cli {
    /// Input media file.
    pub input: PathBuf,

    /// Output file for the video stream.
    pub video_output: PathBuf,

    /// Output file for the audio stream.
    pub audio_output: PathBuf,

    /// Anything after the three paths is accepted and ignored.
    #[arg(hide = true)]
    pub extra: Vec<OsString>,

    /// Bitstream filter for video packets. Defaults to one chosen from the
    /// video codec (h264_mp4toannexb for H.264, null for codecs that need none).
    #[arg(long = "bsf", value_name = "NAME")]
    pub bitstream_filter: Option<String>,

    /// Log more. Repeat for more detail.
    #[arg(short, long, action = clap::ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Only log errors.
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    pub fn log_level(&self) -> Level {
        if self.quiet {
            return Level::ERROR;
        }
        match self.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }

    pub fn to_config(&self) -> SplitConfig {
        let config = SplitConfig::new(&self.input, &self.video_output, &self.audio_output);
        match &self.bitstream_filter {
            Some(name) => config.with_bitstream_filter(name),
            None => config,
        }
    }
}
