/*!
    Output format capabilities.
*/

use std::os::raw::c_int;

use ffmpeg_next::ffi;

/**
    What an output container format needs from whoever drives it.

    Built from the muxer's flag bits so callers never have to look at them
    directly.
*/
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputFormat {
    name: String,
    needs_file: bool,
    needs_global_header: bool,
}

impl OutputFormat {
    /**
        Describe a muxer from its short name and `AVOutputFormat.flags`.
    */
    pub fn from_flags(name: impl Into<String>, flags: c_int) -> Self {
        Self {
            name: name.into(),
            needs_file: flags & (ffi::AVFMT_NOFILE as c_int) == 0,
            needs_global_header: flags & (ffi::AVFMT_GLOBALHEADER as c_int) != 0,
        }
    }

    /**
        Short muxer name, such as `h264`, `adts` or `mp4`.
    */
    pub fn name(&self) -> &str {
        &self.name
    }

    /**
        Whether the caller must open a file-backed I/O handle before writing
        the header. Formats that manage their own output (image sequences,
        network protocols) return false.
    */
    pub fn needs_file(&self) -> bool {
        self.needs_file
    }

    /**
        Whether codec headers (SPS/PPS, AudioSpecificConfig) belong in the
        container header instead of being repeated in-band.
    */
    pub fn needs_global_header(&self) -> bool {
        self.needs_global_header
    }
}
