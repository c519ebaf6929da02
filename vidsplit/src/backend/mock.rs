/*!
    In-memory backend for tests.

    Every resource records its acquisition and release in a shared journal,
    and any step can be told to fail, so tests can walk the pipeline into
    each failure and check what was left open.
*/

use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::Path;
use std::rc::Rc;

use ffmpeg_types::{
    CodecId, Error, FilterStatus, Rational, Result, StreamCopy, StreamInfo, StreamType,
};

use super::{Backend, Filter, FormatCapabilities, Input, Output, Packet};

/// Something that happened to a mock resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Acquire(String),
    Release(String),
    /// An output was freed while its I/O handle was still open.
    Leak(String),
    Header(String),
    Trailer(String),
}

impl Event {
    pub fn acquire(name: &str) -> Self {
        Self::Acquire(name.to_string())
    }

    pub fn release(name: &str) -> Self {
        Self::Release(name.to_string())
    }
}

/// A step to fail. Path-carrying faults only hit that output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fault {
    Open,
    Probe,
    AllocOutput(&'static str),
    AddStream(&'static str),
    CopyParameters(&'static str),
    AllocPacket,
    FilterInit,
    FilterSend,
    FilterReceive,
    FilterFlush,
    OpenIo(&'static str),
    WriteHeader(&'static str),
    /// Fail the read after this many packets were read.
    ReadAfter(usize),
    WritePacket(&'static str),
    WriteTrailer(&'static str),
}

/// A packet as it reached an output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Written {
    pub path: String,
    pub stream: usize,
    pub pts: Option<i64>,
    pub data: Vec<u8>,
}

/// An input packet: stream index, pts, payload.
pub type Scripted = (usize, Option<i64>, Vec<u8>);

/// What the mock input contains and how the mock library behaves.
#[derive(Debug, Clone, Default)]
pub struct Setup {
    streams: Vec<StreamInfo>,
    packets: Vec<Scripted>,
    faults: Vec<Fault>,
    filters: Vec<&'static str>,
    filter_pattern: Vec<usize>,
    filter_delay: usize,
    filter_time_base: Option<Rational>,
    no_file: Vec<&'static str>,
    global_header: Vec<&'static str>,
    muxer_time_bases: Vec<(&'static str, Rational)>,
}

impl Setup {
    /**
        H.264 video as stream 0, AAC audio as stream 1, a data stream at
        index 2 that only shows up in packets. No packets.
    */
    pub fn standard() -> Self {
        Self {
            streams: vec![
                StreamInfo::new(0, StreamType::Video, CodecId::H264, Rational::new(1, 90000)),
                StreamInfo::new(1, StreamType::Audio, CodecId::Aac, Rational::new(1, 48000)),
            ],
            filters: vec!["h264_mp4toannexb", "hevc_mp4toannexb", "null"],
            ..Self::default()
        }
    }

    pub fn without(mut self, kind: StreamType) -> Self {
        self.streams.retain(|s| s.stream_type != kind);
        self
    }

    pub fn with_packets(mut self, packets: impl IntoIterator<Item = Scripted>) -> Self {
        self.packets.extend(packets);
        self
    }

    pub fn with_fault(mut self, fault: Fault) -> Self {
        self.faults.push(fault);
        self
    }

    /// How many packets the filter emits per packet sent, cycled.
    pub fn with_filter_pattern(mut self, pattern: &[usize]) -> Self {
        self.filter_pattern = pattern.to_vec();
        self
    }

    /// Packets the filter keeps back until it is flushed.
    pub fn with_filter_delay(mut self, delay: usize) -> Self {
        self.filter_delay = delay;
        self
    }

    pub fn with_filter_time_base(mut self, time_base: Rational) -> Self {
        self.filter_time_base = Some(time_base);
        self
    }

    pub fn with_no_file(mut self, path: &'static str) -> Self {
        self.no_file.push(path);
        self
    }

    pub fn with_global_header(mut self, path: &'static str) -> Self {
        self.global_header.push(path);
        self
    }

    pub fn with_muxer_time_base(mut self, path: &'static str, time_base: Rational) -> Self {
        self.muxer_time_bases.push((path, time_base));
        self
    }

    fn fails(&self, fault: &Fault) -> bool {
        self.faults.contains(fault)
    }

    /// Whether a fault of the kind `make` builds is set for `path`.
    fn fails_at(&self, path: &str, make: fn(&'static str) -> Fault) -> bool {
        let kind = std::mem::discriminant(&make(""));
        self.faults
            .iter()
            .any(|f| std::mem::discriminant(f) == kind && fault_path(f) == Some(path))
    }
}

#[derive(Debug, Default)]
struct Journal {
    events: Vec<Event>,
    written: Vec<Written>,
    copies: Vec<(String, StreamCopy)>,
    filter_sends: usize,
}

type Shared = Rc<RefCell<Journal>>;

fn record(journal: &Shared, event: Event) {
    journal.borrow_mut().events.push(event);
}

fn injected(what: &str) -> Error {
    Error::ffmpeg(format!("{what}: injected failure"))
}

/**
    Backend whose resources live in memory and report to a shared journal.
*/
#[derive(Debug, Clone)]
pub struct MockBackend {
    setup: Rc<Setup>,
    journal: Shared,
}

impl MockBackend {
    pub fn new(setup: Setup) -> Self {
        Self {
            setup: Rc::new(setup),
            journal: Rc::default(),
        }
    }

    pub fn events(&self) -> Vec<Event> {
        self.journal.borrow().events.clone()
    }

    /// Acquire and release events only, in order.
    pub fn lifecycle(&self) -> Vec<Event> {
        self.events()
            .into_iter()
            .filter(|e| matches!(e, Event::Acquire(_) | Event::Release(_) | Event::Leak(_)))
            .collect()
    }

    /// Names of resources acquired but never released.
    pub fn still_open(&self) -> Vec<String> {
        let mut open = Vec::new();
        for event in self.events() {
            match event {
                Event::Acquire(name) => open.push(name),
                Event::Release(name) => open.retain(|n| *n != name),
                _ => {}
            }
        }
        open
    }

    pub fn written(&self, path: &str) -> Vec<Written> {
        self.journal
            .borrow()
            .written
            .iter()
            .filter(|w| w.path == path)
            .cloned()
            .collect()
    }

    pub fn copies(&self) -> Vec<(String, StreamCopy)> {
        self.journal.borrow().copies.clone()
    }

    pub fn filter_sends(&self) -> usize {
        self.journal.borrow().filter_sends
    }

    /// A packet outside the journal, for feeding components directly.
    pub fn packet_for(&self, stream: usize, pts: i64) -> MockPacket {
        MockPacket::detached(stream, Some(pts), vec![stream as u8, pts as u8])
    }
}

impl Backend for MockBackend {
    type Config = CodecId;
    type Packet = MockPacket;
    type Input = MockInput;
    type Output = MockOutput;
    type Filter = MockFilter;

    fn open_input(&self, _path: &Path) -> Result<MockInput> {
        if self.setup.fails(&Fault::Open) {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "injected failure",
            )));
        }
        record(&self.journal, Event::acquire("input"));
        Ok(MockInput {
            setup: self.setup.clone(),
            journal: self.journal.clone(),
            next: 0,
        })
    }

    fn alloc_output(&self, path: &Path) -> Result<MockOutput> {
        let path = path.to_string_lossy().into_owned();
        if self.setup.fails_at(&path, Fault::AllocOutput) {
            return Err(injected("avformat_alloc_output_context2"));
        }
        record(&self.journal, Event::Acquire(format!("output {path}")));
        Ok(MockOutput {
            path,
            setup: self.setup.clone(),
            journal: self.journal.clone(),
            streams: Vec::new(),
            io_open: false,
        })
    }

    fn alloc_packet(&self) -> Result<MockPacket> {
        if self.setup.fails(&Fault::AllocPacket) {
            return Err(injected("av_packet_alloc"));
        }
        record(&self.journal, Event::acquire("packet"));
        Ok(MockPacket {
            stream: 0,
            pts: None,
            data: Vec::new(),
            journal: Some(self.journal.clone()),
        })
    }

    fn has_filter(&self, name: &str) -> bool {
        self.setup.filters.iter().any(|f| *f == name)
    }

    fn init_filter(&self, _name: &str, _config: &CodecId, time_base: Rational) -> Result<MockFilter> {
        if self.setup.fails(&Fault::FilterInit) {
            return Err(injected("av_bsf_init"));
        }
        record(&self.journal, Event::acquire("filter"));
        Ok(MockFilter {
            setup: self.setup.clone(),
            journal: self.journal.clone(),
            queue: VecDeque::new(),
            sends: 0,
            flushed: false,
            time_base_out: self.setup.filter_time_base.unwrap_or(time_base),
        })
    }
}

fn fault_path(fault: &Fault) -> Option<&'static str> {
    match fault {
        Fault::AllocOutput(p)
        | Fault::AddStream(p)
        | Fault::CopyParameters(p)
        | Fault::OpenIo(p)
        | Fault::WriteHeader(p)
        | Fault::WritePacket(p)
        | Fault::WriteTrailer(p) => Some(*p),
        _ => None,
    }
}

pub struct MockInput {
    setup: Rc<Setup>,
    journal: Shared,
    next: usize,
}

impl Input for MockInput {
    type Config = CodecId;
    type Packet = MockPacket;

    fn find_stream_info(&mut self) -> Result<()> {
        if self.setup.fails(&Fault::Probe) {
            return Err(injected("avformat_find_stream_info"));
        }
        Ok(())
    }

    fn best_stream(&self, stream_type: StreamType) -> Option<StreamInfo> {
        self.setup
            .streams
            .iter()
            .find(|s| s.stream_type == stream_type)
            .cloned()
    }

    fn codec_config(&self, index: usize) -> Option<CodecId> {
        self.setup
            .streams
            .iter()
            .find(|s| s.index == index)
            .map(|s| s.codec_id)
    }

    fn read_packet(&mut self, packet: &mut MockPacket) -> Result<bool> {
        if self.setup.fails(&Fault::ReadAfter(self.next)) {
            return Err(injected("av_read_frame"));
        }
        let Some((stream, pts, data)) = self.setup.packets.get(self.next) else {
            return Ok(false);
        };
        assert!(packet.is_empty(), "packet buffer was not cleared before reuse");
        packet.stream = *stream;
        packet.pts = *pts;
        packet.data = data.clone();
        self.next += 1;
        Ok(true)
    }
}

impl Drop for MockInput {
    fn drop(&mut self) {
        record(&self.journal, Event::release("input"));
    }
}

#[derive(Debug, Clone, Copy)]
pub struct MockFormat {
    needs_file: bool,
    needs_global_header: bool,
}

impl FormatCapabilities for MockFormat {
    fn needs_file(&self) -> bool {
        self.needs_file
    }

    fn needs_global_header(&self) -> bool {
        self.needs_global_header
    }
}

pub struct MockOutput {
    path: String,
    setup: Rc<Setup>,
    journal: Shared,
    streams: Vec<Rational>,
    io_open: bool,
}

impl Output for MockOutput {
    type Config = CodecId;
    type Packet = MockPacket;
    type Format = MockFormat;

    fn format(&self) -> MockFormat {
        MockFormat {
            needs_file: !self.setup.no_file.iter().any(|p| *p == self.path),
            needs_global_header: self.setup.global_header.iter().any(|p| *p == self.path),
        }
    }

    fn add_stream(&mut self) -> Result<usize> {
        if self.setup.fails_at(&self.path, Fault::AddStream) {
            return Err(injected("avformat_new_stream"));
        }
        self.streams.push(Rational { num: 0, den: 0 });
        Ok(self.streams.len() - 1)
    }

    fn copy_parameters(&mut self, index: usize, _config: &CodecId, copy: StreamCopy) -> Result<()> {
        if self.setup.fails_at(&self.path, Fault::CopyParameters) {
            return Err(injected("avcodec_parameters_from_context"));
        }
        if index >= self.streams.len() {
            return Err(Error::invalid_data(format!("no output stream {index}")));
        }
        self.journal
            .borrow_mut()
            .copies
            .push((self.path.clone(), copy));
        Ok(())
    }

    fn set_stream_time_base(&mut self, index: usize, time_base: Rational) -> Result<()> {
        let slot = self
            .streams
            .get_mut(index)
            .ok_or_else(|| Error::invalid_data(format!("no output stream {index}")))?;
        *slot = time_base;
        Ok(())
    }

    fn stream_time_base(&self, index: usize) -> Option<Rational> {
        self.streams.get(index).copied()
    }

    fn open_io(&mut self) -> Result<()> {
        if self.setup.fails_at(&self.path, Fault::OpenIo) {
            return Err(injected("avio_open"));
        }
        assert!(!self.io_open, "I/O opened twice for {}", self.path);
        self.io_open = true;
        record(&self.journal, Event::Acquire(format!("io {}", self.path)));
        Ok(())
    }

    fn close_io(&mut self) {
        if self.io_open {
            self.io_open = false;
            record(&self.journal, Event::Release(format!("io {}", self.path)));
        }
    }

    fn write_header(&mut self) -> Result<()> {
        if self.setup.fails_at(&self.path, Fault::WriteHeader) {
            return Err(injected("avformat_write_header"));
        }
        if let Some((_, time_base)) = self
            .setup
            .muxer_time_bases
            .iter()
            .find(|(p, _)| *p == self.path)
        {
            for slot in &mut self.streams {
                *slot = *time_base;
            }
        }
        record(&self.journal, Event::Header(self.path.clone()));
        Ok(())
    }

    fn write_interleaved(&mut self, packet: &mut MockPacket) -> Result<()> {
        if self.setup.fails_at(&self.path, Fault::WritePacket) {
            return Err(injected("av_interleaved_write_frame"));
        }
        if packet.stream >= self.streams.len() {
            return Err(Error::invalid_data(format!(
                "packet for stream {} in single-stream output",
                packet.stream
            )));
        }
        self.journal.borrow_mut().written.push(Written {
            path: self.path.clone(),
            stream: packet.stream,
            pts: packet.pts,
            data: std::mem::take(&mut packet.data),
        });
        Ok(())
    }

    fn write_trailer(&mut self) -> Result<()> {
        if self.setup.fails_at(&self.path, Fault::WriteTrailer) {
            return Err(injected("av_write_trailer"));
        }
        record(&self.journal, Event::Trailer(self.path.clone()));
        Ok(())
    }
}

impl Drop for MockOutput {
    fn drop(&mut self) {
        if self.io_open {
            record(&self.journal, Event::Leak(format!("io {}", self.path)));
        }
        record(&self.journal, Event::Release(format!("output {}", self.path)));
    }
}

#[derive(Debug)]
pub struct MockPacket {
    stream: usize,
    pts: Option<i64>,
    data: Vec<u8>,
    journal: Option<Shared>,
}

impl MockPacket {
    pub fn detached(stream: usize, pts: Option<i64>, data: Vec<u8>) -> Self {
        Self {
            stream,
            pts,
            data,
            journal: None,
        }
    }
}

impl Packet for MockPacket {
    fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn stream_index(&self) -> usize {
        self.stream
    }

    fn set_stream_index(&mut self, index: usize) {
        self.stream = index;
    }

    fn rescale_ts(&mut self, from: Rational, to: Rational) {
        if from == to || !from.is_valid() || !to.is_valid() {
            return;
        }
        self.pts = self.pts.map(|pts| from.rescale(pts, to));
    }

    fn clear(&mut self) {
        self.stream = 0;
        self.pts = None;
        self.data.clear();
    }
}

impl Drop for MockPacket {
    fn drop(&mut self) {
        if let Some(journal) = &self.journal {
            record(journal, Event::release("packet"));
        }
    }
}

pub struct MockFilter {
    setup: Rc<Setup>,
    journal: Shared,
    queue: VecDeque<(Option<i64>, Vec<u8>)>,
    sends: usize,
    flushed: bool,
    time_base_out: Rational,
}

impl Filter for MockFilter {
    type Packet = MockPacket;

    fn send(&mut self, packet: &mut MockPacket) -> Result<()> {
        assert!(!self.flushed, "packet sent after end of stream");
        if self.setup.fails(&Fault::FilterSend) {
            return Err(injected("av_bsf_send_packet"));
        }
        let pattern = &self.setup.filter_pattern;
        let copies = if pattern.is_empty() {
            1
        } else {
            pattern[self.sends % pattern.len()]
        };
        self.sends += 1;
        self.journal.borrow_mut().filter_sends += 1;

        let mut data = vec![0, 0, 0, 1];
        data.extend_from_slice(&packet.data);
        for _ in 0..copies {
            self.queue.push_back((packet.pts, data.clone()));
        }
        packet.clear();
        Ok(())
    }

    fn send_eof(&mut self) -> Result<()> {
        if self.setup.fails(&Fault::FilterFlush) {
            return Err(injected("av_bsf_send_packet"));
        }
        self.flushed = true;
        Ok(())
    }

    fn receive(&mut self, packet: &mut MockPacket) -> Result<FilterStatus> {
        if self.setup.fails(&Fault::FilterReceive) {
            return Err(injected("av_bsf_receive_packet"));
        }
        if !self.flushed && self.queue.len() <= self.setup.filter_delay {
            return Ok(FilterStatus::NeedsInput);
        }
        match self.queue.pop_front() {
            Some((pts, data)) => {
                packet.pts = pts;
                packet.data = data;
                Ok(FilterStatus::Ready)
            }
            None => Ok(FilterStatus::Eof),
        }
    }

    fn output_time_base(&self) -> Rational {
        self.time_base_out
    }
}

impl Drop for MockFilter {
    fn drop(&mut self) {
        record(&self.journal, Event::release("filter"));
    }
}
