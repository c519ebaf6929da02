/*!
    Single-stream output container for stream copy.
*/

use std::os::raw::c_int;
use std::path::{Path, PathBuf};
use std::ptr;

use ffmpeg_next::{codec, ffi, format::context::Output as OutputContext};

use ffmpeg_source::{
    CodecConfig, PacketBuffer, error_from_ffmpeg, path_to_cstring, rational_from_ffmpeg,
    rational_to_ffmpeg,
};
use ffmpeg_types::{Error, Rational, Result, StreamCopy};

use crate::format::OutputFormat;

/**
    Media sink for writing one stream-copied elementary stream.

    The container format is guessed from the file extension when the sink is
    allocated. Nothing touches the filesystem until [`Sink::open_io`].
*/
pub struct Sink {
    output: OutputContext,
    path: PathBuf,
    io_open: bool,
}

impl Sink {
    /**
        Allocate an output container for the given path.

        Fails if FFmpeg has no muxer for the path's extension.
    */
    pub fn alloc<P: AsRef<Path>>(path: P) -> Result<Self> {
        ffmpeg_next::init().map_err(|e| Error::ffmpeg(e.to_string()))?;

        let path = path.as_ref();
        let c_path = path_to_cstring(path)?;

        let mut ctx: *mut ffi::AVFormatContext = ptr::null_mut();
        // SAFETY: ctx is a valid out-pointer; format and format name are left for FFmpeg to guess
        let ret = unsafe {
            ffi::avformat_alloc_output_context2(
                &mut ctx,
                ptr::null_mut(),
                ptr::null(),
                c_path.as_ptr(),
            )
        };
        if ret < 0 {
            return Err(error_from_ffmpeg(ret, "avformat_alloc_output_context2"));
        }
        if ctx.is_null() {
            return Err(Error::unsupported_format(format!(
                "no output format for {}",
                path.display()
            )));
        }

        // SAFETY: ctx was just allocated as an output context and is owned by nobody else
        let output = unsafe { OutputContext::wrap(ctx) };

        Ok(Self {
            output,
            path: path.to_path_buf(),
            io_open: false,
        })
    }

    /**
        Describe what the guessed container format needs.
    */
    pub fn format(&self) -> OutputFormat {
        let format = self.output.format();
        OutputFormat::from_flags(format.name(), format.flags().bits())
    }

    /**
        Create a new stream in the container and return its index.
    */
    pub fn add_stream(&mut self) -> Result<usize> {
        // SAFETY: the context is valid for as long as self.output lives
        let stream = unsafe { ffi::avformat_new_stream(self.output.as_mut_ptr(), ptr::null()) };
        if stream.is_null() {
            return Err(Error::ffmpeg("avformat_new_stream failed"));
        }
        // SAFETY: FFmpeg just returned this stream as part of our context
        Ok(unsafe { (*stream).index } as usize)
    }

    /**
        Fill a stream's codec parameters from a source stream.

        The parameters go through a temporary codec context so the codec tag
        and flags can be adjusted on the way. The context is freed before
        this returns, whether or not the copy succeeded.
    */
    pub fn copy_parameters(
        &mut self,
        index: usize,
        config: &CodecConfig,
        copy: StreamCopy,
    ) -> Result<()> {
        let stream = self.stream_ptr(index)?;

        let mut context = codec::context::Context::from_parameters(config.parameters().clone())
            .map_err(|e| Error::ffmpeg(format!("avcodec_parameters_to_context: {e}")))?;

        // SAFETY: both the context and the stream are alive for this whole block
        unsafe {
            let ctx = context.as_mut_ptr();
            if copy.clear_codec_tag {
                (*ctx).codec_tag = 0;
            }
            if copy.global_header {
                (*ctx).flags |= ffi::AV_CODEC_FLAG_GLOBAL_HEADER as c_int;
            }

            let ret = ffi::avcodec_parameters_from_context((*stream).codecpar, ctx);
            if ret < 0 {
                return Err(error_from_ffmpeg(ret, "avcodec_parameters_from_context"));
            }
        }

        Ok(())
    }

    /**
        Suggest a time base for a stream. The muxer may replace it when the
        header is written.
    */
    pub fn set_stream_time_base(&mut self, index: usize, time_base: Rational) -> Result<()> {
        let mut stream = self
            .output
            .stream_mut(index)
            .ok_or_else(|| Error::invalid_data(format!("no output stream {index}")))?;
        stream.set_time_base(rational_to_ffmpeg(time_base));
        Ok(())
    }

    /**
        Get a stream's current time base. Only final after the header has
        been written.
    */
    pub fn stream_time_base(&self, index: usize) -> Option<Rational> {
        self.output
            .stream(index)
            .map(|stream| rational_from_ffmpeg(stream.time_base()))
    }

    /**
        Open the output file for writing.
    */
    pub fn open_io(&mut self) -> Result<()> {
        if self.io_open {
            return Err(Error::invalid_data("output I/O is already open"));
        }

        let c_path = path_to_cstring(&self.path)?;
        // SAFETY: pb belongs to our context and is null until this call succeeds
        let ret = unsafe {
            ffi::avio_open(
                &mut (*self.output.as_mut_ptr()).pb,
                c_path.as_ptr(),
                ffi::AVIO_FLAG_WRITE as c_int,
            )
        };
        if ret < 0 {
            return Err(error_from_ffmpeg(ret, "avio_open"));
        }

        self.io_open = true;
        Ok(())
    }

    /**
        Check whether the output file is currently open.
    */
    pub fn is_io_open(&self) -> bool {
        self.io_open
    }

    /**
        Flush and close the output file. Does nothing if it is not open.
    */
    pub fn close_io(&mut self) {
        if !self.io_open {
            return;
        }
        // SAFETY: pb was opened by open_io; avio_closep nulls it so the
        // context destructor does not close it a second time
        unsafe {
            ffi::avio_closep(&mut (*self.output.as_mut_ptr()).pb);
        }
        self.io_open = false;
    }

    /**
        Write the container header.
    */
    pub fn write_header(&mut self) -> Result<()> {
        self.output
            .write_header()
            .map_err(|e| Error::ffmpeg(format!("avformat_write_header: {e}")))
    }

    /**
        Hand a packet to the muxer's interleaving queue.

        The packet must already carry this sink's stream index and time
        base. The muxer takes the payload; the buffer is left blank.
    */
    pub fn write_interleaved(&mut self, packet: &mut PacketBuffer) -> Result<()> {
        packet.reset_position();
        packet
            .inner()
            .write_interleaved(&mut self.output)
            .map_err(|e| Error::ffmpeg(format!("av_interleaved_write_frame: {e}")))
    }

    /**
        Flush the interleaving queue and write the container trailer.

        The file may be unplayable if this is not called.
    */
    pub fn write_trailer(&mut self) -> Result<()> {
        self.output
            .write_trailer()
            .map_err(|e| Error::ffmpeg(format!("av_write_trailer: {e}")))
    }

    fn stream_ptr(&mut self, index: usize) -> Result<*mut ffi::AVStream> {
        // SAFETY: streams holds nb_streams valid pointers owned by our context
        unsafe {
            let ctx = self.output.as_mut_ptr();
            if index >= (*ctx).nb_streams as usize {
                return Err(Error::invalid_data(format!("no output stream {index}")));
            }
            Ok(*(*ctx).streams.add(index))
        }
    }
}

impl std::fmt::Debug for Sink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sink")
            .field("path", &self.path)
            .field("format", &self.output.format().name())
            .field("io_open", &self.io_open)
            .finish_non_exhaustive()
    }
}
