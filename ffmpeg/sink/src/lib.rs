/*!
    Media output and muxing for the ffmpeg crate ecosystem.

    This crate handles the output side of the media pipeline. A [`Sink`] is a
    single-stream output container for stream copy: packets read by
    `ffmpeg-source` go in unchanged (apart from their stream index and time
    base) and come out framed for the target container (raw H.264, ADTS
    AAC, MP4, and so on).

    # Lifecycle

    Each step is separate so the caller controls exactly what has been
    acquired when something fails:

    ```ignore
    use ffmpeg_sink::{Sink, StreamCopy};

    let mut sink = Sink::alloc("v.h264")?;           // format guessed from extension
    let index = sink.add_stream()?;
    let copy = StreamCopy {
        clear_codec_tag: true,
        global_header: sink.format().needs_global_header(),
    };
    sink.copy_parameters(index, &codec_config, copy)?;

    if sink.format().needs_file() {
        sink.open_io()?;
    }
    sink.write_header()?;
    // sink.write_interleaved(&mut packet)? for each packet
    sink.write_trailer()?;
    sink.close_io();
    ```

    Dropping a sink closes its I/O handle (if still open) and frees the
    container.
*/

pub use ffmpeg_types::{Error, Rational, Result, StreamCopy};

mod format;
mod sink;

pub use format::OutputFormat;
pub use sink::Sink;
