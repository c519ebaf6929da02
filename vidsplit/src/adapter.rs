/*!
    Bitstream reformatting for the video stream.

    Packets copied out of a container are not always legal in a raw
    elementary-stream file. H.264 from MP4, for one, carries length-prefixed
    NAL units and keeps its parameter sets in the container header, while a
    raw `.h264` file needs start codes and in-band parameter sets. The
    adapter runs every video packet through a bitstream filter that fixes
    this up.

    A filter may hold packets back or split them, so one packet in can mean
    any number of packets out.
*/

use ffmpeg_bsf::default_filter_for;
use ffmpeg_types::FilterStatus;
use tracing::{debug, info};

use crate::backend::{Backend, Filter, Output, Packet};
use crate::error::{SplitError, SplitResult};
use crate::output::OutputStream;
use crate::select::SelectedStream;

/**
    A bitstream filter bound to the selected video stream.
*/
pub struct Adapter<F> {
    filter: F,
    name: String,
}

/**
    Set up the adapter for the video stream.

    Uses `name` when given, otherwise the filter the codec needs for raw
    output (pass-through for codecs that need none).
*/
pub fn init_adapter<B: Backend>(
    backend: &B,
    name: Option<&str>,
    stream: &SelectedStream<B::Config>,
) -> SplitResult<Adapter<B::Filter>> {
    let name = name.unwrap_or_else(|| default_filter_for(stream.info.codec_id));

    if !backend.has_filter(name) {
        return Err(SplitError::FilterUnavailable {
            name: name.to_string(),
        });
    }

    let filter = backend
        .init_filter(name, &stream.config, stream.info.time_base)
        .map_err(|source| SplitError::FilterInitFailure {
            name: name.to_string(),
            source,
        })?;

    info!("Using bitstream filter '{name}' for video");

    Ok(Adapter {
        filter,
        name: name.to_string(),
    })
}

impl<F: Filter> Adapter<F> {
    pub fn name(&self) -> &str {
        &self.name
    }

    /**
        Feed one video packet and write everything the filter produces.

        The packet must already be in the source stream's time base. Drained
        packets are re-targeted at `output` and rescaled to its time base.
        The buffer is reused for the drained packets, so it is blank again
        when this returns successfully.

        Returns how many packets were written.
    */
    pub fn process<O>(&mut self, packet: &mut F::Packet, output: &mut OutputStream<O>) -> SplitResult<usize>
    where
        O: Output<Packet = F::Packet>,
    {
        self.filter
            .send(packet)
            .map_err(|source| self.process_failure(source))?;
        self.drain(packet, output)
    }

    /**
        Signal end of input and write the packets the filter was still
        holding. `packet` must be blank.

        Returns how many packets were written.
    */
    pub fn flush<O>(&mut self, packet: &mut F::Packet, output: &mut OutputStream<O>) -> SplitResult<usize>
    where
        O: Output<Packet = F::Packet>,
    {
        self.filter
            .send_eof()
            .map_err(|source| self.process_failure(source))?;
        self.drain(packet, output)
    }

    fn drain<O>(&mut self, packet: &mut F::Packet, output: &mut OutputStream<O>) -> SplitResult<usize>
    where
        O: Output<Packet = F::Packet>,
    {
        let mut written = 0;
        loop {
            match self
                .filter
                .receive(packet)
                .map_err(|source| self.process_failure(source))?
            {
                FilterStatus::Ready => {
                    packet.set_stream_index(output.index());
                    packet.rescale_ts(self.filter.output_time_base(), output.time_base());
                    let result = output.write(packet);
                    packet.clear();
                    result?;
                    written += 1;
                }
                FilterStatus::NeedsInput => break,
                FilterStatus::Eof => {
                    debug!("Bitstream filter '{}' reached end of stream", self.name);
                    break;
                }
            }
        }

        Ok(written)
    }

    fn process_failure(&self, source: ffmpeg_types::Error) -> SplitError {
        SplitError::FilterProcessFailure {
            name: self.name.clone(),
            source,
        }
    }
}

impl<F> std::fmt::Debug for Adapter<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Adapter")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
