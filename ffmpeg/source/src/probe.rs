/*!
    Stream metadata extraction.
*/

use ffmpeg_next::format::stream::Stream;

use ffmpeg_types::StreamInfo;

use crate::convert::{codec_id_from_ffmpeg, rational_from_ffmpeg, stream_type_from_ffmpeg};

/**
    Describe one stream of an opened input.

    Returns `None` for streams that are neither video nor audio.
*/
pub(crate) fn stream_info(stream: &Stream) -> Option<StreamInfo> {
    let parameters = stream.parameters();
    let stream_type = stream_type_from_ffmpeg(parameters.medium())?;

    Some(StreamInfo::new(
        stream.index(),
        stream_type,
        codec_id_from_ffmpeg(parameters.id()),
        rational_from_ffmpeg(stream.time_base()),
    ))
}
