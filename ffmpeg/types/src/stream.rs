/*!
    Stream metadata and encoder settings.
*/

use crate::{CodecId, PixelFormat, Rational};

/**
    Metadata for the selected video stream of an input.
*/
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VideoStreamInfo {
    /// Index of the stream within its container.
    pub index: usize,
    /// Codec of the stream, if it is one we know.
    pub codec: Option<CodecId>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Native pixel format, if it is one we know.
    pub pixel_format: Option<PixelFormat>,
    /// Time base of the stream's timestamps.
    pub time_base: Rational,
    /// Average frame rate, if the container reports one.
    pub frame_rate: Option<Rational>,
}

/**
    Fully resolved parameters an encoder is opened with.

    Fixed at setup; never changed while a stream is being encoded.
*/
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncoderSettings {
    /// Codec to produce.
    pub codec: CodecId,
    /// Specific encoder implementation (e.g. "libx264"); None picks the default for `codec`.
    pub encoder_name: Option<String>,
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Pixel format pictures are submitted in.
    pub pixel_format: PixelFormat,
    /// Time base of submitted picture timestamps.
    pub time_base: Rational,
    /// Nominal frame rate, if known.
    pub frame_rate: Option<Rational>,
    /// Target bit rate in bits per second; None leaves the encoder default.
    pub bit_rate: Option<u64>,
    /// Maximum distance between keyframes; None leaves the encoder default.
    pub gop_size: Option<u32>,
    /// Maximum number of consecutive B-frames; None leaves the encoder default.
    pub max_b_frames: Option<u32>,
}

impl EncoderSettings {
    /**
        Settings for encoding the rotation of `stream`: width and height
        are swapped, everything else starts from the stream's values.
    */
    pub fn rotated_from(stream: &VideoStreamInfo, codec: CodecId, pixel_format: PixelFormat) -> Self {
        Self {
            codec,
            encoder_name: None,
            width: stream.height,
            height: stream.width,
            pixel_format,
            time_base: stream.time_base,
            frame_rate: stream.frame_rate,
            bit_rate: None,
            gop_size: None,
            max_b_frames: None,
        }
    }
}
