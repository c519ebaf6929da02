/*!
    Picking the video and audio streams to keep.
*/

use std::path::Path;

use ffmpeg_types::{Error as MediaError, StreamInfo, StreamType};
use tracing::info;

use crate::backend::Input;
use crate::error::{SplitError, SplitResult};

/**
    One input stream chosen for output, with a detached copy of its codec
    parameters.
*/
#[derive(Debug, Clone)]
pub struct SelectedStream<C> {
    pub info: StreamInfo,
    pub config: C,
}

impl<C> SelectedStream<C> {
    pub fn kind(&self) -> StreamType {
        self.info.stream_type
    }
}

/**
    The streams a split keeps. Everything else in the input is dropped.
*/
#[derive(Debug, Clone)]
pub struct Selection<C> {
    pub video: SelectedStream<C>,
    pub audio: SelectedStream<C>,
}

/**
    Probe an opened input and pick its best video and best audio stream.

    Both must exist. Ranking is left to the backend, which for FFmpeg weighs
    codec, resolution or channel count, and disposition.
*/
pub fn select_streams<I: Input>(input: &mut I, path: &Path) -> SplitResult<Selection<I::Config>> {
    input
        .find_stream_info()
        .map_err(|source| SplitError::ProbeFailure {
            path: path.to_path_buf(),
            source,
        })?;

    let video = select_one(input, path, StreamType::Video)?;
    let audio = select_one(input, path, StreamType::Audio)?;

    Ok(Selection { video, audio })
}

fn select_one<I: Input>(
    input: &I,
    path: &Path,
    kind: StreamType,
) -> SplitResult<SelectedStream<I::Config>> {
    let info = input
        .best_stream(kind)
        .ok_or_else(|| SplitError::NoSuchStream {
            kind,
            path: path.to_path_buf(),
        })?;

    let config = input
        .codec_config(info.index)
        .ok_or_else(|| SplitError::ProbeFailure {
            path: path.to_path_buf(),
            source: MediaError::invalid_data(format!(
                "{kind} stream {} has no codec parameters",
                info.index
            )),
        })?;

    info!(
        "Selected {kind} stream #{} ({}, time base {})",
        info.index, info.codec_id, info.time_base
    );

    Ok(SelectedStream { info, config })
}
