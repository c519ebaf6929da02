/*!
    Conversion utilities between ffmpeg-next types and ffmpeg-types.

    These are public so the sibling output and filter crates can share them
    instead of each growing their own copy.
*/

use std::ffi::CString;
use std::os::raw::c_int;
use std::path::Path;

use ffmpeg_types::{CodecId, Error, Rational, StreamType};

/**
    Convert ffmpeg_next::Rational to our Rational.

    FFmpeg uses `0/0` for undecided time bases, which is passed through
    as-is rather than rejected.
*/
pub fn rational_from_ffmpeg(r: ffmpeg_next::Rational) -> Rational {
    Rational {
        num: r.numerator(),
        den: r.denominator(),
    }
}

/**
    Convert our Rational to ffmpeg_next::Rational.
*/
pub fn rational_to_ffmpeg(r: Rational) -> ffmpeg_next::Rational {
    ffmpeg_next::Rational::new(r.num, r.den)
}

/**
    Convert ffmpeg_next codec ID to our CodecId.
*/
pub fn codec_id_from_ffmpeg(id: ffmpeg_next::codec::Id) -> CodecId {
    use ffmpeg_next::codec::Id;

    match id {
        // Video
        Id::H264 => CodecId::H264,
        Id::HEVC => CodecId::H265,
        Id::VP8 => CodecId::Vp8,
        Id::VP9 => CodecId::Vp9,
        Id::AV1 => CodecId::Av1,
        Id::MPEG4 => CodecId::Mpeg4,
        Id::MPEG2VIDEO => CodecId::Mpeg2Video,
        // Audio
        Id::AAC => CodecId::Aac,
        Id::OPUS => CodecId::Opus,
        Id::MP3 => CodecId::Mp3,
        Id::VORBIS => CodecId::Vorbis,
        Id::FLAC => CodecId::Flac,
        Id::AC3 => CodecId::Ac3,
        _ => CodecId::Other,
    }
}

/**
    Convert an ffmpeg_next media type to our StreamType.

    Returns `None` for subtitle, data and attachment streams.
*/
pub fn stream_type_from_ffmpeg(medium: ffmpeg_next::media::Type) -> Option<StreamType> {
    use ffmpeg_next::media::Type;

    match medium {
        Type::Video => Some(StreamType::Video),
        Type::Audio => Some(StreamType::Audio),
        _ => None,
    }
}

/**
    Convert our StreamType to the ffmpeg_next media type.
*/
pub fn stream_type_to_ffmpeg(stream_type: StreamType) -> ffmpeg_next::media::Type {
    use ffmpeg_next::media::Type;

    match stream_type {
        StreamType::Video => Type::Video,
        StreamType::Audio => Type::Audio,
    }
}

/**
    Turn a negative FFmpeg return code into our Error.

    `what` names the call that failed, so messages read like
    `avio_open: Permission denied`.
*/
pub fn error_from_ffmpeg(code: c_int, what: &str) -> Error {
    let error = ffmpeg_next::Error::from(code);
    let message = error.to_string();

    if message.contains("No such file") {
        Error::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{what}: {message}"),
        ))
    } else {
        Error::ffmpeg(format!("{what}: {message}"))
    }
}

/**
    Convert a path into the C string FFmpeg expects.
*/
pub fn path_to_cstring(path: &Path) -> Result<CString, Error> {
    let path = path
        .to_str()
        .ok_or_else(|| Error::invalid_data(format!("path is not valid UTF-8: {}", path.display())))?;

    CString::new(path).map_err(|_| Error::invalid_data(format!("path contains a nul byte: {path}")))
}
