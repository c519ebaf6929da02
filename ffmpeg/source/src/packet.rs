/*!
    Reusable packet buffer.
*/

use ffmpeg_next::{ffi, packet::Mut as PacketMut};

use ffmpeg_types::Rational;

use crate::convert::rational_to_ffmpeg;

/**
    A single reusable buffer for encoded packets.

    Allocate one before reading, and call [`PacketBuffer::clear`] after each
    packet has been dispatched. Reads, filter sends and interleaved writes
    all move data in and out of the same buffer, so nothing is allocated per
    packet.
*/
pub struct PacketBuffer {
    packet: ffmpeg_next::Packet,
}

impl PacketBuffer {
    /**
        Create an empty packet buffer.
    */
    pub fn new() -> Self {
        Self {
            packet: ffmpeg_next::Packet::empty(),
        }
    }

    /**
        Size of the payload currently held, in bytes.
    */
    pub fn size(&self) -> usize {
        self.packet.size()
    }

    /**
        Payload currently held.
    */
    pub fn data(&self) -> &[u8] {
        self.packet.data().unwrap_or_default()
    }

    /**
        Index of the stream this packet belongs to.
    */
    pub fn stream_index(&self) -> usize {
        self.packet.stream()
    }

    /**
        Re-target this packet at a stream of another container.
    */
    pub fn set_stream_index(&mut self, index: usize) {
        self.packet.set_stream(index);
    }

    /**
        Convert pts, dts and duration from one time base into another.

        Unset timestamps stay unset.
    */
    pub fn rescale_ts(&mut self, from: Rational, to: Rational) {
        if from == to || !from.is_valid() || !to.is_valid() {
            return;
        }
        self.packet
            .rescale_ts(rational_to_ffmpeg(from), rational_to_ffmpeg(to));
    }

    /**
        Forget the byte position in the source file, which means nothing to
        an output container.
    */
    pub fn reset_position(&mut self) {
        self.packet.set_position(-1);
    }

    /**
        Release the payload and reset all fields, keeping the buffer for reuse.
    */
    pub fn clear(&mut self) {
        // SAFETY: the packet is owned by this buffer and never aliased.
        unsafe {
            ffi::av_packet_unref(self.packet.as_mut_ptr());
        }
    }

    /**
        Get the wrapped ffmpeg-next packet.
    */
    pub fn inner(&self) -> &ffmpeg_next::Packet {
        &self.packet
    }

    /**
        Get the wrapped ffmpeg-next packet mutably.
    */
    pub fn inner_mut(&mut self) -> &mut ffmpeg_next::Packet {
        &mut self.packet
    }

    /**
        Raw pointer for FFmpeg calls that have no ffmpeg-next wrapper
        (bitstream filters, for one).
    */
    pub fn as_mut_ptr(&mut self) -> *mut ffi::AVPacket {
        PacketMut::as_mut_ptr(&mut self.packet)
    }
}

impl Default for PacketBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PacketBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PacketBuffer")
            .field("stream", &self.packet.stream())
            .field("size", &self.packet.size())
            .field("pts", &self.packet.pts())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_buffer_is_empty() {
        let packet = PacketBuffer::new();
        assert_eq!(packet.size(), 0);
        assert!(packet.data().is_empty());
    }

    #[test]
    fn stream_index_can_be_retargeted() {
        let mut packet = PacketBuffer::new();
        packet.set_stream_index(3);
        assert_eq!(packet.stream_index(), 3);
    }

    #[test]
    fn clear_drops_payload() {
        let mut packet = PacketBuffer::new();
        *packet.inner_mut() = ffmpeg_next::Packet::copy(&[0, 0, 0, 1, 0x65]);
        packet.set_stream_index(1);
        assert_eq!(packet.size(), 5);

        packet.clear();
        assert_eq!(packet.size(), 0);
        assert_eq!(packet.stream_index(), 0);
    }

    #[test]
    fn rescale_converts_timestamps() {
        let mut packet = PacketBuffer::new();
        packet.inner_mut().set_pts(Some(40));
        packet.rescale_ts(Rational::new(1, 1000), Rational::new(1, 90000));
        assert_eq!(packet.inner().pts(), Some(3600));
    }

    #[test]
    fn rescale_skips_unset_time_base() {
        let mut packet = PacketBuffer::new();
        packet.inner_mut().set_pts(Some(40));
        packet.rescale_ts(Rational::new(1, 1000), Rational { num: 0, den: 0 });
        assert_eq!(packet.inner().pts(), Some(40));
    }
}
