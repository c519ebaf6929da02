/*!
    Bitstream filter lookup.
*/

use std::ffi::{CStr, CString};
use std::ptr;

use ffmpeg_next::ffi;

use ffmpeg_source::{CodecConfig, error_from_ffmpeg, rational_to_ffmpeg};
use ffmpeg_types::{CodecId, Error, Rational, Result};

use crate::filter::BitstreamFilter;

/**
    Name of the filter that makes packets of the given codec legal in a raw
    elementary-stream file.

    Codecs that need no rewriting get the pass-through `null` filter.
*/
pub fn default_filter_for(codec_id: CodecId) -> &'static str {
    match codec_id {
        CodecId::H264 => "h264_mp4toannexb",
        CodecId::H265 => "hevc_mp4toannexb",
        _ => "null",
    }
}

/**
    A bitstream filter known to the linked FFmpeg build.
*/
#[derive(Clone, Copy)]
pub struct FilterDefinition {
    filter: *const ffi::AVBitStreamFilter,
}

impl FilterDefinition {
    /**
        Look up a filter by name.

        Returns `None` if no filter has that name.
    */
    pub fn find(name: &str) -> Option<Self> {
        let c_name = CString::new(name).ok()?;
        // SAFETY: c_name is a valid nul-terminated string for the whole call
        let filter = unsafe { ffi::av_bsf_get_by_name(c_name.as_ptr()) };
        if filter.is_null() {
            None
        } else {
            Some(Self { filter })
        }
    }

    /**
        Short name of the filter.
    */
    pub fn name(&self) -> &'static str {
        // SAFETY: filter definitions are static and always carry a name
        unsafe { CStr::from_ptr((*self.filter).name) }
            .to_str()
            .unwrap_or_default()
    }

    /**
        Create a filter instance bound to one stream's codec parameters and
        time base.
    */
    pub fn init(&self, config: &CodecConfig, time_base: Rational) -> Result<BitstreamFilter> {
        let mut ctx: *mut ffi::AVBSFContext = ptr::null_mut();
        // SAFETY: ctx is a valid out-pointer and the filter definition is static
        let ret = unsafe { ffi::av_bsf_alloc(self.filter, &mut ctx) };
        if ret < 0 {
            return Err(error_from_ffmpeg(ret, "av_bsf_alloc"));
        }
        if ctx.is_null() {
            return Err(Error::ffmpeg("av_bsf_alloc returned no context"));
        }

        // From here on the context is freed by BitstreamFilter's Drop,
        // including when parameter setup or init fails.
        let filter = BitstreamFilter::wrap(ctx);

        // SAFETY: ctx is the freshly allocated context owned by `filter`
        unsafe {
            let ret = ffi::avcodec_parameters_copy((*ctx).par_in, config.parameters().as_ptr());
            if ret < 0 {
                return Err(error_from_ffmpeg(ret, "avcodec_parameters_copy"));
            }
            (*ctx).time_base_in = rational_to_ffmpeg(time_base).into();

            let ret = ffi::av_bsf_init(ctx);
            if ret < 0 {
                return Err(error_from_ffmpeg(ret, "av_bsf_init"));
            }
        }

        Ok(filter)
    }
}

impl std::fmt::Debug for FilterDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterDefinition")
            .field("name", &self.name())
            .finish()
    }
}
