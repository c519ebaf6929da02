/*!
    Shared types for the ffmpeg crate ecosystem.

    This crate defines the vocabulary of the ecosystem: the types that cross crate
    boundaries. It has no dependency on FFmpeg, making it lightweight and enabling
    consumers (and their tests) to depend on it without pulling in FFmpeg bindings.

    # Core Types

    - [`Rational`] - Rational numbers for time bases, with timestamp rescaling
    - [`CodecId`] - Codec identifiers
    - [`StreamType`] and [`StreamInfo`] - Which stream a packet belongs to, and what it carries
    - [`StreamCopy`] - How codec parameters are carried into a stream-copy output
    - [`FilterStatus`] - Outcome of draining a bitstream filter

    # Error Handling

    - [`Error`] and [`Result`] - Common error types
*/

mod codec;
mod error;
mod filter;
mod rational;
mod stream;

pub use codec::CodecId;
pub use error::{Error, Result};
pub use filter::FilterStatus;
pub use rational::Rational;
pub use stream::{StreamCopy, StreamInfo, StreamType};
