/*!
    Bitstream filter instance.
*/

use ffmpeg_next::ffi;

use ffmpeg_source::{PacketBuffer, error_from_ffmpeg, rational_from_ffmpeg};
use ffmpeg_types::{Error, FilterStatus, Rational, Result};

/**
    An initialized bitstream filter.

    Created by [`FilterDefinition::init`](crate::FilterDefinition::init).
    The filter context is freed when this is dropped.
*/
pub struct BitstreamFilter {
    ctx: *mut ffi::AVBSFContext,
}

impl BitstreamFilter {
    pub(crate) fn wrap(ctx: *mut ffi::AVBSFContext) -> Self {
        Self { ctx }
    }

    /**
        Time base of the packets this filter produces.

        Only meaningful once the filter is initialized.
    */
    pub fn output_time_base(&self) -> Rational {
        // SAFETY: ctx stays valid until drop
        let tb = unsafe { (*self.ctx).time_base_out };
        rational_from_ffmpeg(tb.into())
    }

    /**
        Queue one packet for filtering.

        On success the filter takes the payload and the buffer is left
        blank, ready to receive output. The packet must not be empty: an
        empty packet tells the filter the stream has ended.
    */
    pub fn send(&mut self, packet: &mut PacketBuffer) -> Result<()> {
        // SAFETY: both the context and the packet are valid for the call
        let ret = unsafe { ffi::av_bsf_send_packet(self.ctx, packet.as_mut_ptr()) };
        if ret < 0 {
            return Err(error_from_ffmpeg(ret, "av_bsf_send_packet"));
        }
        Ok(())
    }

    /**
        Signal end of stream so the filter releases anything it still holds.
    */
    pub fn send_eof(&mut self) -> Result<()> {
        // SAFETY: a null packet is the documented flush signal
        let ret = unsafe { ffi::av_bsf_send_packet(self.ctx, std::ptr::null_mut()) };
        if ret < 0 {
            return Err(error_from_ffmpeg(ret, "av_bsf_send_packet"));
        }
        Ok(())
    }

    /**
        Take the next filtered packet, if there is one.

        The buffer must be blank. On [`FilterStatus::Ready`] it holds a
        packet in [`BitstreamFilter::output_time_base`]; otherwise it is
        left untouched.
    */
    pub fn receive(&mut self, packet: &mut PacketBuffer) -> Result<FilterStatus> {
        // SAFETY: both the context and the packet are valid for the call
        let ret = unsafe { ffi::av_bsf_receive_packet(self.ctx, packet.as_mut_ptr()) };
        if ret >= 0 {
            Ok(FilterStatus::Ready)
        } else if ret == ffi::AVERROR(ffi::EAGAIN) {
            Ok(FilterStatus::NeedsInput)
        } else if ret == ffi::AVERROR_EOF {
            Ok(FilterStatus::Eof)
        } else {
            Err(error_from_ffmpeg(ret, "av_bsf_receive_packet"))
        }
    }

    /**
        Short name of the filter.
    */
    pub fn name(&self) -> Result<&'static str> {
        // SAFETY: ctx and its static filter definition stay valid until drop
        let name = unsafe { std::ffi::CStr::from_ptr((*(*self.ctx).filter).name) };
        name.to_str()
            .map_err(|_| Error::invalid_data("filter name is not valid UTF-8"))
    }
}

impl Drop for BitstreamFilter {
    fn drop(&mut self) {
        // SAFETY: ctx came from av_bsf_alloc and is freed only here
        unsafe {
            ffi::av_bsf_free(&mut self.ctx);
        }
    }
}

impl std::fmt::Debug for BitstreamFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BitstreamFilter")
            .field("name", &self.name().unwrap_or("?"))
            .field("output_time_base", &self.output_time_base())
            .finish()
    }
}
