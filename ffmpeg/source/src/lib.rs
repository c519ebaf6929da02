/*!
    Media source and demuxing for the ffmpeg crate ecosystem.

    This crate handles the input side of the media pipeline. It opens a media
    file, probes its streams, picks the best stream of each kind, and reads
    encoded packets into a reusable [`PacketBuffer`] for downstream crates to
    filter or mux.

    Opening and probing are separate steps so callers can tell a file that
    cannot be opened apart from one whose streams cannot be identified:

    ```ignore
    use ffmpeg_source::{PacketBuffer, Source, StreamType};

    let mut source = Source::open("movie.mp4")?;
    source.find_stream_info()?;

    let video = source.best_stream(StreamType::Video).expect("no video");
    let mut packet = PacketBuffer::new();
    while source.read_packet(&mut packet)? {
        if packet.stream_index() == video.index {
            // ...
        }
        packet.clear();
    }
    ```
*/

pub use ffmpeg_types::{CodecId, Error, Rational, Result, StreamInfo, StreamType};

mod codec_config;
mod convert;
mod packet;
mod probe;
mod source;

pub use codec_config::CodecConfig;
pub use convert::{
    codec_id_from_ffmpeg, error_from_ffmpeg, path_to_cstring, rational_from_ffmpeg,
    rational_to_ffmpeg,
};
pub use packet::PacketBuffer;
pub use source::Source;
