/*!
    Media source implementation.
*/

use std::path::{Path, PathBuf};
use std::ptr;

use ffmpeg_next::{ffi, format::context::Input as InputContext};

use ffmpeg_types::{Error, Result, StreamInfo, StreamType};

use crate::codec_config::CodecConfig;
use crate::convert::{error_from_ffmpeg, path_to_cstring, stream_type_to_ffmpeg};
use crate::packet::PacketBuffer;
use crate::probe::stream_info;

/**
    An opened input container that produces encoded packets.

    Created by [`Source::open`]. The container is closed when the source is
    dropped, exactly once.
*/
pub struct Source {
    /// The FFmpeg input context.
    input: InputContext,
    /// Path the input was opened from.
    path: PathBuf,
}

impl Source {
    /**
        Open a media file and read its header.

        This does not probe the streams; call [`Source::find_stream_info`]
        before relying on codec parameters of containers that do not declare
        them up front (MPEG-TS, raw elementary streams).
    */
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        ffmpeg_next::init().map_err(|e| Error::ffmpeg(e.to_string()))?;

        let path = path.as_ref();
        let c_path = path_to_cstring(path)?;

        let mut ctx: *mut ffi::AVFormatContext = ptr::null_mut();
        // SAFETY: ctx is a valid out-pointer; on failure FFmpeg frees whatever it allocated
        let ret = unsafe {
            ffi::avformat_open_input(&mut ctx, c_path.as_ptr(), ptr::null_mut(), ptr::null_mut())
        };
        if ret < 0 {
            return Err(error_from_ffmpeg(ret, "avformat_open_input"));
        }
        if ctx.is_null() {
            return Err(Error::ffmpeg("avformat_open_input returned no context"));
        }

        // SAFETY: ctx was just opened as an input context and is owned by nobody else
        let input = unsafe { InputContext::wrap(ctx) };

        Ok(Self {
            input,
            path: path.to_path_buf(),
        })
    }

    /**
        Read enough of the file to fill in stream parameters the container
        header left out.
    */
    pub fn find_stream_info(&mut self) -> Result<()> {
        // SAFETY: the context is valid for as long as self.input lives
        let ret =
            unsafe { ffi::avformat_find_stream_info(self.input.as_mut_ptr(), ptr::null_mut()) };
        if ret < 0 {
            return Err(error_from_ffmpeg(ret, "avformat_find_stream_info"));
        }
        Ok(())
    }

    /**
        Pick the most relevant stream of the given type.

        Uses FFmpeg's own ranking (`av_find_best_stream`), which weighs
        codec, resolution or channel count, and disposition flags.
    */
    pub fn best_stream(&self, stream_type: StreamType) -> Option<StreamInfo> {
        let stream = self.input.streams().best(stream_type_to_ffmpeg(stream_type))?;
        stream_info(&stream)
    }

    /**
        Get a detached copy of a stream's codec parameters.
    */
    pub fn codec_config(&self, index: usize) -> Option<CodecConfig> {
        let stream = self.input.stream(index)?;
        Some(CodecConfig::new(&stream.parameters()))
    }

    /**
        Read the next packet into `packet`.

        Returns `Ok(true)` when a packet was read and `Ok(false)` at end of
        stream. The buffer must have been cleared since its last use.

        Packets are returned in file order, interleaved between all streams,
        including ones the caller has no interest in.
    */
    pub fn read_packet(&mut self, packet: &mut PacketBuffer) -> Result<bool> {
        match packet.inner_mut().read(&mut self.input) {
            Ok(()) => Ok(true),
            Err(ffmpeg_next::Error::Eof) => Ok(false),
            Err(e) => Err(Error::ffmpeg(format!("av_read_frame: {e}"))),
        }
    }
}

impl std::fmt::Debug for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Source")
            .field("path", &self.path)
            .field("streams", &self.input.streams().count())
            .finish_non_exhaustive()
    }
}
