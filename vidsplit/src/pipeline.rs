/*!
    The split itself: acquire, route, finalize, release.
*/

use std::fmt;

use ffmpeg_types::{StreamInfo, StreamType};
use tracing::{debug, info, trace};

use crate::adapter::init_adapter;
use crate::backend::{Backend, Input, Packet};
use crate::config::SplitConfig;
use crate::error::{SplitError, SplitResult};
use crate::lifecycle::{RouteParts, Session, State};
use crate::output::build_output;
use crate::select::select_streams;

/// Packet counts for one run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Stats {
    /// Packets read from the input, of any stream.
    pub packets_read: u64,
    /// Video packets fed to the bitstream adapter.
    pub video_in: u64,
    /// Packets the adapter produced and that were written.
    pub video_written: u64,
    pub audio_in: u64,
    pub audio_written: u64,
    /// Packets of streams that were not selected.
    pub dropped: u64,
    /// Packets with no payload.
    pub empty: u64,
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "read {} packets: video {} in / {} out, audio {} in / {} out, {} dropped, {} empty",
            self.packets_read,
            self.video_in,
            self.video_written,
            self.audio_in,
            self.audio_written,
            self.dropped,
            self.empty
        )
    }
}

/**
    Result of a run that got as far as finalizing.

    Trailer failures do not abort a run, so they are collected here instead
    of being returned as the run's error.
*/
#[derive(Debug, Default)]
pub struct Summary {
    pub stats: Stats,
    pub trailer_errors: Vec<SplitError>,
}

/**
    Split `config.input` into its best video and best audio stream.

    Every resource acquired along the way is released before this returns,
    in reverse order of acquisition, whatever the outcome.
*/
pub fn run<B: Backend>(backend: &B, config: &SplitConfig) -> SplitResult<Summary> {
    let mut session = Session::new();
    let result = split(backend, config, &mut session);
    if result.is_err() && session.state().can_become(State::Aborting) {
        session.transition(State::Aborting);
    }
    session.close();
    result
}

fn split<B: Backend>(
    backend: &B,
    config: &SplitConfig,
    session: &mut Session<B>,
) -> SplitResult<Summary> {
    let input = backend
        .open_input(config.input())
        .map_err(|source| SplitError::OpenFailure {
            path: config.input().to_path_buf(),
            source,
        })?;
    let input = session.acquire_input(input);
    let selection = select_streams(input, config.input())?;

    session.acquire_output(build_output(backend, config.video_output(), &selection.video)?);
    session.acquire_output(build_output(backend, config.audio_output(), &selection.audio)?);

    let packet = backend
        .alloc_packet()
        .map_err(|source| SplitError::AllocFailure {
            what: "packet buffer".to_string(),
            source,
        })?;
    session.acquire_packet(packet);

    let adapter = init_adapter(backend, config.bitstream_filter.as_deref(), &selection.video)?;
    session.acquire_adapter(adapter);

    session.open_io(StreamType::Video)?;
    session.open_io(StreamType::Audio)?;

    session.output_mut(StreamType::Video)?.write_header()?;
    session.output_mut(StreamType::Audio)?.write_header()?;
    session.transition(State::HeadersWritten);

    session.transition(State::Streaming);
    let stats = route(session.route_parts()?, &selection.video.info, &selection.audio.info, config)?;
    info!("{stats}");

    session.transition(State::Finalizing);
    let mut trailer_errors = Vec::new();
    for kind in [StreamType::Video, StreamType::Audio] {
        let output = session.output_mut(kind)?;
        match output.write_trailer() {
            Ok(()) => debug!("Finished {kind} output '{}'", output.path().display()),
            Err(err) => trailer_errors.push(err),
        }
    }

    Ok(Summary {
        stats,
        trailer_errors,
    })
}

/**
    Read every packet of the input and send it where it belongs.

    Video goes through the bitstream adapter, audio is written directly,
    anything else is dropped. The packet buffer is cleared after each
    packet whatever happened to it. At end of input the adapter is flushed
    so packets the filter held back still reach the video output.
*/
fn route<B: Backend>(
    parts: RouteParts<'_, B>,
    video: &StreamInfo,
    audio: &StreamInfo,
    config: &SplitConfig,
) -> SplitResult<Stats> {
    let RouteParts {
        input,
        packet,
        adapter,
        video: video_out,
        audio: audio_out,
    } = parts;

    let mut stats = Stats::default();
    loop {
        let more = input
            .read_packet(packet)
            .map_err(|source| SplitError::ReadFailure {
                path: config.input().to_path_buf(),
                source,
            })?;
        if !more {
            debug!("End of input after {} packets", stats.packets_read);
            break;
        }
        stats.packets_read += 1;

        let result = if packet.is_empty() {
            stats.empty += 1;
            Ok(())
        } else if packet.stream_index() == video.index {
            stats.video_in += 1;
            packet.set_stream_index(video_out.index());
            adapter.process(packet, video_out).map(|written| {
                stats.video_written += written as u64;
            })
        } else if packet.stream_index() == audio.index {
            stats.audio_in += 1;
            packet.set_stream_index(audio_out.index());
            packet.rescale_ts(audio.time_base, audio_out.time_base());
            audio_out.write(packet).map(|()| {
                stats.audio_written += 1;
            })
        } else {
            trace!("Dropping packet of stream #{}", packet.stream_index());
            stats.dropped += 1;
            Ok(())
        };

        packet.clear();
        result?;
    }

    packet.clear();
    let flushed = adapter.flush(packet, video_out)?;
    debug!("Flushed {flushed} packets from '{}'", adapter.name());
    stats.video_written += flushed as u64;

    Ok(stats)
}
