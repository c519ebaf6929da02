/*!
    The media library as seen by the split pipeline.

    The pipeline only needs a handful of capabilities: open an input, read
    packets, build stream-copy outputs, write packets and run a bitstream
    filter. Keeping them behind these traits lets the lifecycle be exercised
    with an in-memory backend that can fail at any step.
*/

use std::path::Path;

use ffmpeg_types::{FilterStatus, Rational, Result, StreamCopy, StreamInfo, StreamType};

mod ffmpeg;
#[cfg(test)]
pub mod mock;

pub use self::ffmpeg::FfmpegBackend;

/**
    Factory for every resource the pipeline acquires.
*/
pub trait Backend {
    type Config;
    type Packet: Packet;
    type Input: Input<Packet = Self::Packet, Config = Self::Config>;
    type Output: Output<Packet = Self::Packet, Config = Self::Config>;
    type Filter: Filter<Packet = Self::Packet>;

    /**
        Open an input container and read its header.
    */
    fn open_input(&self, path: &Path) -> Result<Self::Input>;

    /**
        Allocate an output container, guessing its format from the path.
    */
    fn alloc_output(&self, path: &Path) -> Result<Self::Output>;

    /**
        Allocate the reusable packet buffer.
    */
    fn alloc_packet(&self) -> Result<Self::Packet>;

    /**
        Check whether a bitstream filter with this name exists.
    */
    fn has_filter(&self, name: &str) -> bool;

    /**
        Create a bitstream filter bound to one stream.
    */
    fn init_filter(
        &self,
        name: &str,
        config: &Self::Config,
        time_base: Rational,
    ) -> Result<Self::Filter>;
}

/**
    An opened input container.
*/
pub trait Input {
    type Config;
    type Packet: Packet;

    fn find_stream_info(&mut self) -> Result<()>;

    fn best_stream(&self, stream_type: StreamType) -> Option<StreamInfo>;

    fn codec_config(&self, index: usize) -> Option<Self::Config>;

    /**
        Read the next packet. `Ok(false)` means end of stream.
    */
    fn read_packet(&mut self, packet: &mut Self::Packet) -> Result<bool>;
}

/**
    What an output format asks of its caller.
*/
pub trait FormatCapabilities {
    fn needs_file(&self) -> bool;
    fn needs_global_header(&self) -> bool;
}

/**
    A single-stream output container.
*/
pub trait Output {
    type Config;
    type Packet: Packet;
    type Format: FormatCapabilities;

    fn format(&self) -> Self::Format;

    fn add_stream(&mut self) -> Result<usize>;

    fn copy_parameters(&mut self, index: usize, config: &Self::Config, copy: StreamCopy)
    -> Result<()>;

    fn set_stream_time_base(&mut self, index: usize, time_base: Rational) -> Result<()>;

    fn stream_time_base(&self, index: usize) -> Option<Rational>;

    fn open_io(&mut self) -> Result<()>;

    /**
        Close the I/O handle. Must be a no-op when it is not open.
    */
    fn close_io(&mut self);

    fn write_header(&mut self) -> Result<()>;

    fn write_interleaved(&mut self, packet: &mut Self::Packet) -> Result<()>;

    fn write_trailer(&mut self) -> Result<()>;
}

/**
    The reusable packet buffer.
*/
pub trait Packet {
    fn is_empty(&self) -> bool;

    fn stream_index(&self) -> usize;

    fn set_stream_index(&mut self, index: usize);

    fn rescale_ts(&mut self, from: Rational, to: Rational);

    /**
        Drop the payload and reset every field, keeping the buffer.
    */
    fn clear(&mut self);
}

/**
    A bitstream filter: one packet in, zero or more packets out.
*/
pub trait Filter {
    type Packet: Packet;

    fn send(&mut self, packet: &mut Self::Packet) -> Result<()>;

    /**
        Tell the filter no more packets are coming. Whatever it still holds
        becomes available to `receive`, followed by [`FilterStatus::Eof`].
    */
    fn send_eof(&mut self) -> Result<()>;

    fn receive(&mut self, packet: &mut Self::Packet) -> Result<FilterStatus>;

    fn output_time_base(&self) -> Rational;
}
