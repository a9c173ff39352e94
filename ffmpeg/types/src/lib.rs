/*!
    Shared types for the vidrotate ffmpeg crate family.

    This crate defines the vocabulary of the family: the types that cross crate
    boundaries. It has no dependency on FFmpeg, making it lightweight and enabling
    consumers (and tests) to depend on it without pulling in FFmpeg bindings.

    # Core Types

    - [`Rational`] - Rational numbers for time bases and frame rates
    - [`Pts`] and [`MediaDuration`] - Timestamps in time_base units
    - [`Picture`] and [`Plane`] - Decoded planar picture data
    - [`Packet`] - Encoded packet data

    # Format Types

    - [`PixelFormat`] and [`PlaneLayout`] - Pixel formats and their plane geometry
    - [`CodecId`] - Codec identifiers

    # Stream Information

    - [`VideoStreamInfo`] - Metadata of an input video stream
    - [`EncoderSettings`] - Parameters an encoder is opened with

    # Stage Contracts

    - [`Demuxer`], [`Decoder`], [`Encoder`], [`Muxer`] - Pipeline stage traits
    - [`Submit`] and [`Received`] - Tagged send/receive outcomes

    # Error Handling

    - [`Error`] and [`Result`] - Common error types
*/

mod codec;
mod error;
mod format;
mod packet;
mod picture;
mod rational;
mod stage;
mod stream;
mod timestamp;

pub use codec::CodecId;
pub use error::{Error, Result};
pub use format::{PixelFormat, PlaneLayout};
pub use packet::Packet;
pub use picture::{MAX_PLANES, Picture, Plane, STRIDE_ALIGN};
pub use rational::Rational;
pub use stage::{Decoder, Demuxer, Encoder, Muxer, Received, Submit};
pub use stream::{EncoderSettings, VideoStreamInfo};
pub use timestamp::{MediaDuration, Pts};
