/*!
    Bitstream filter drain status.
*/

/**
    Result of asking a bitstream filter for its next output packet.

    A filter may hold zero, one or many packets for each packet sent to it,
    so callers poll until they get something other than [`FilterStatus::Ready`].
    Failures are reported through `Err`, never through this type.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FilterStatus {
    /// A filtered packet was placed in the caller's buffer.
    Ready,
    /// The filter needs more input before it can produce another packet.
    NeedsInput,
    /// The filter has been drained completely.
    Eof,
}
