/*!
    Stream-copy output containers.
*/

use std::path::{Path, PathBuf};

use ffmpeg_types::{Rational, StreamCopy, StreamType};
use tracing::debug;

use crate::backend::{Backend, FormatCapabilities, Output};
use crate::error::{SplitError, SplitResult};
use crate::select::SelectedStream;

/**
    An output container holding exactly one stream, copied from an input
    stream without re-encoding.

    Tracks whether its I/O handle is open so closing is safe to repeat.
*/
pub struct OutputStream<O> {
    output: O,
    path: PathBuf,
    kind: StreamType,
    index: usize,
    time_base: Rational,
    io_open: bool,
}

/**
    Build an output container for one selected stream.

    The codec parameters are copied with the codec tag cleared, and with
    global headers when the target format wants them. The source time base
    is passed on as a hint; the muxer has the last word once the header is
    written.

    On failure whatever was allocated is freed before returning.
*/
pub fn build_output<B: Backend>(
    backend: &B,
    path: &Path,
    stream: &SelectedStream<B::Config>,
) -> SplitResult<OutputStream<B::Output>> {
    let kind = stream.kind();

    let mut output = backend
        .alloc_output(path)
        .map_err(|source| SplitError::AllocFailure {
            what: format!("output container for '{}'", path.display()),
            source,
        })?;

    let index = output
        .add_stream()
        .map_err(|source| SplitError::AllocFailure {
            what: format!("{kind} stream in '{}'", path.display()),
            source,
        })?;

    let copy = StreamCopy {
        clear_codec_tag: true,
        global_header: output.format().needs_global_header(),
    };
    output
        .copy_parameters(index, &stream.config, copy)
        .and_then(|()| output.set_stream_time_base(index, stream.info.time_base))
        .map_err(|source| SplitError::ParamCopyFailure {
            kind,
            path: path.to_path_buf(),
            source,
        })?;

    debug!(
        "Built {kind} output '{}' (stream #{index}, global header: {})",
        path.display(),
        copy.global_header
    );

    Ok(OutputStream {
        output,
        path: path.to_path_buf(),
        kind,
        index,
        time_base: stream.info.time_base,
        io_open: false,
    })
}

impl<O: Output> OutputStream<O> {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kind(&self) -> StreamType {
        self.kind
    }

    /**
        Index of the single stream inside this container.
    */
    pub fn index(&self) -> usize {
        self.index
    }

    /**
        Time base packets must be in when written. Final only after
        [`OutputStream::write_header`].
    */
    pub fn time_base(&self) -> Rational {
        self.time_base
    }

    /**
        Open the output file if the format writes to one.

        Returns whether a handle was opened, and so must later be closed.
    */
    pub fn open_io(&mut self) -> SplitResult<bool> {
        if self.io_open || !self.output.format().needs_file() {
            return Ok(false);
        }
        self.output
            .open_io()
            .map_err(|source| SplitError::IoOpenFailure {
                path: self.path.clone(),
                source,
            })?;
        self.io_open = true;
        Ok(true)
    }

    pub fn close_io(&mut self) {
        if self.io_open {
            self.output.close_io();
            self.io_open = false;
        }
    }

    /**
        Write the container header, then pick up the time base the muxer
        settled on.
    */
    pub fn write_header(&mut self) -> SplitResult<()> {
        self.output
            .write_header()
            .map_err(|source| SplitError::HeaderWriteFailure {
                path: self.path.clone(),
                source,
            })?;

        if let Some(time_base) = self.output.stream_time_base(self.index) {
            if time_base != self.time_base {
                debug!(
                    "Muxer for '{}' chose time base {time_base} (hinted {})",
                    self.path.display(),
                    self.time_base
                );
            }
            self.time_base = time_base;
        }
        Ok(())
    }

    /**
        Write a packet that already targets this container's stream and
        time base.
    */
    pub fn write(&mut self, packet: &mut O::Packet) -> SplitResult<()> {
        self.output
            .write_interleaved(packet)
            .map_err(|source| SplitError::PacketWriteFailure {
                kind: self.kind,
                path: self.path.clone(),
                source,
            })
    }

    pub fn write_trailer(&mut self) -> SplitResult<()> {
        self.output
            .write_trailer()
            .map_err(|source| SplitError::TrailerWriteFailure {
                path: self.path.clone(),
                source,
            })
    }
}

impl<O> std::fmt::Debug for OutputStream<O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutputStream")
            .field("path", &self.path)
            .field("kind", &self.kind)
            .field("index", &self.index)
            .field("time_base", &self.time_base)
            .field("io_open", &self.io_open)
            .finish_non_exhaustive()
    }
}
