/*!
    Bitstream filters for the ffmpeg crate ecosystem.

    A bitstream filter rewrites encoded packets without decoding them, for
    example turning length-prefixed H.264 NAL units (as stored in MP4) into
    the start-code form a raw `.h264` file needs.

    Filters are queues: each packet sent may come back as zero, one or many
    packets, so always drain until the filter asks for more input.

    ```ignore
    use ffmpeg_bsf::{FilterDefinition, FilterStatus, default_filter_for};

    let name = default_filter_for(codec_config.codec_id());
    let definition = FilterDefinition::find(name).expect("unknown filter");
    let mut filter = definition.init(&codec_config, stream.time_base)?;

    filter.send(&mut packet)?;
    while filter.receive(&mut packet)? == FilterStatus::Ready {
        // write packet
    }
    ```
*/

pub use ffmpeg_types::{Error, FilterStatus, Rational, Result};

mod definition;
mod filter;

pub use definition::{FilterDefinition, default_filter_for};
pub use filter::BitstreamFilter;
