use std::path::Path;

use ffmpeg_bsf::{BitstreamFilter, FilterDefinition};
use ffmpeg_sink::{OutputFormat, Sink};
use ffmpeg_source::{CodecConfig, PacketBuffer, Source};
use ffmpeg_types::{Error, FilterStatus, Rational, Result, StreamCopy, StreamInfo, StreamType};

use super::{Backend, Filter, FormatCapabilities, Input, Output, Packet};

/**
    The real backend, built on the ffmpeg crates.
*/
#[derive(Debug, Clone, Copy, Default)]
pub struct FfmpegBackend;

impl Backend for FfmpegBackend {
    type Config = CodecConfig;
    type Packet = PacketBuffer;
    type Input = Source;
    type Output = Sink;
    type Filter = BitstreamFilter;

    fn open_input(&self, path: &Path) -> Result<Source> {
        Source::open(path)
    }

    fn alloc_output(&self, path: &Path) -> Result<Sink> {
        Sink::alloc(path)
    }

    fn alloc_packet(&self) -> Result<PacketBuffer> {
        Ok(PacketBuffer::new())
    }

    fn has_filter(&self, name: &str) -> bool {
        FilterDefinition::find(name).is_some()
    }

    fn init_filter(
        &self,
        name: &str,
        config: &CodecConfig,
        time_base: Rational,
    ) -> Result<BitstreamFilter> {
        FilterDefinition::find(name)
            .ok_or_else(|| Error::unsupported_format(format!("no bitstream filter named {name}")))?
            .init(config, time_base)
    }
}

impl Input for Source {
    type Config = CodecConfig;
    type Packet = PacketBuffer;

    fn find_stream_info(&mut self) -> Result<()> {
        Source::find_stream_info(self)
    }

    fn best_stream(&self, stream_type: StreamType) -> Option<StreamInfo> {
        Source::best_stream(self, stream_type)
    }

    fn codec_config(&self, index: usize) -> Option<CodecConfig> {
        Source::codec_config(self, index)
    }

    fn read_packet(&mut self, packet: &mut PacketBuffer) -> Result<bool> {
        Source::read_packet(self, packet)
    }
}

impl FormatCapabilities for OutputFormat {
    fn needs_file(&self) -> bool {
        OutputFormat::needs_file(self)
    }

    fn needs_global_header(&self) -> bool {
        OutputFormat::needs_global_header(self)
    }
}

impl Output for Sink {
    type Config = CodecConfig;
    type Packet = PacketBuffer;
    type Format = OutputFormat;

    fn format(&self) -> OutputFormat {
        Sink::format(self)
    }

    fn add_stream(&mut self) -> Result<usize> {
        Sink::add_stream(self)
    }

    fn copy_parameters(&mut self, index: usize, config: &CodecConfig, copy: StreamCopy) -> Result<()> {
        Sink::copy_parameters(self, index, config, copy)
    }

    fn set_stream_time_base(&mut self, index: usize, time_base: Rational) -> Result<()> {
        Sink::set_stream_time_base(self, index, time_base)
    }

    fn stream_time_base(&self, index: usize) -> Option<Rational> {
        Sink::stream_time_base(self, index)
    }

    fn open_io(&mut self) -> Result<()> {
        Sink::open_io(self)
    }

    fn close_io(&mut self) {
        Sink::close_io(self)
    }

    fn write_header(&mut self) -> Result<()> {
        Sink::write_header(self)
    }

    fn write_interleaved(&mut self, packet: &mut PacketBuffer) -> Result<()> {
        Sink::write_interleaved(self, packet)
    }

    fn write_trailer(&mut self) -> Result<()> {
        Sink::write_trailer(self)
    }
}

impl Packet for PacketBuffer {
    fn is_empty(&self) -> bool {
        self.size() == 0
    }

    fn stream_index(&self) -> usize {
        PacketBuffer::stream_index(self)
    }

    fn set_stream_index(&mut self, index: usize) {
        PacketBuffer::set_stream_index(self, index)
    }

    fn rescale_ts(&mut self, from: Rational, to: Rational) {
        PacketBuffer::rescale_ts(self, from, to)
    }

    fn clear(&mut self) {
        PacketBuffer::clear(self)
    }
}

impl Filter for BitstreamFilter {
    type Packet = PacketBuffer;

    fn send(&mut self, packet: &mut PacketBuffer) -> Result<()> {
        BitstreamFilter::send(self, packet)
    }

    fn send_eof(&mut self) -> Result<()> {
        BitstreamFilter::send_eof(self)
    }

    fn receive(&mut self, packet: &mut PacketBuffer) -> Result<FilterStatus> {
        BitstreamFilter::receive(self, packet)
    }

    fn output_time_base(&self) -> Rational {
        BitstreamFilter::output_time_base(self)
    }
}
