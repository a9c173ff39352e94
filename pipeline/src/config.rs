use ffmpeg_types::{CodecId, EncoderSettings, PixelFormat, Rational, VideoStreamInfo};
use serde::Deserialize;

use crate::{PipelineError, Result};

/// Output encoder configuration.
///
/// Every field is optional in serialized form; unset rate parameters leave
/// the encoder's own defaults in place. Output dimensions are never
/// configured: they are always the input's, transposed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Pixel format pictures are rotated and encoded in.
    pub pixel_format: PixelFormat,
    /// Output codec. Defaults to the input stream's codec.
    pub codec: Option<CodecId>,
    /// Specific encoder implementation, e.g. "libx264".
    pub encoder: Option<String>,
    /// Target bit rate in bits per second.
    pub bit_rate: Option<u64>,
    /// Maximum keyframe interval in pictures.
    pub gop_size: Option<u32>,
    /// Maximum number of consecutive B-frames.
    pub max_b_frames: Option<u32>,
    /// Encoder time base. Defaults to the input stream's time base.
    pub time_base: Option<Rational>,
    /// Output frame rate. Defaults to the input stream's average rate.
    pub frame_rate: Option<Rational>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            pixel_format: PixelFormat::Yuv420p,
            codec: None,
            encoder: None,
            bit_rate: None,
            gop_size: None,
            max_b_frames: None,
            time_base: None,
            frame_rate: None,
        }
    }
}

impl PipelineConfig {
    /// Create a config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the pixel format pictures are encoded in.
    pub fn with_pixel_format(mut self, format: PixelFormat) -> Self {
        self.pixel_format = format;
        self
    }

    /// Set the output codec.
    pub fn with_codec(mut self, codec: CodecId) -> Self {
        self.codec = Some(codec);
        self
    }

    /// Select a specific encoder implementation by name.
    pub fn with_encoder(mut self, name: impl Into<String>) -> Self {
        self.encoder = Some(name.into());
        self
    }

    /// Set the target bit rate.
    pub fn with_bit_rate(mut self, bits_per_second: u64) -> Self {
        self.bit_rate = Some(bits_per_second);
        self
    }

    /// Set the maximum keyframe interval.
    pub fn with_gop_size(mut self, gop_size: u32) -> Self {
        self.gop_size = Some(gop_size);
        self
    }

    /// Set the maximum number of consecutive B-frames.
    pub fn with_max_b_frames(mut self, max_b_frames: u32) -> Self {
        self.max_b_frames = Some(max_b_frames);
        self
    }

    /// Set the encoder time base.
    pub fn with_time_base(mut self, time_base: Rational) -> Self {
        self.time_base = Some(time_base);
        self
    }

    /// Set the output frame rate.
    pub fn with_frame_rate(mut self, frame_rate: Rational) -> Self {
        self.frame_rate = Some(frame_rate);
        self
    }

    /// Check the values that can be checked without an input.
    pub fn validate(&self) -> Result<()> {
        if let Some(time_base) = self.time_base {
            if !time_base.is_positive() {
                return Err(PipelineError::InvalidConfig(format!(
                    "time base must be positive, got {time_base}"
                )));
            }
        }
        if let Some(frame_rate) = self.frame_rate {
            if !frame_rate.is_positive() {
                return Err(PipelineError::InvalidConfig(format!(
                    "frame rate must be positive, got {frame_rate}"
                )));
            }
        }
        if self.gop_size == Some(0) {
            return Err(PipelineError::InvalidConfig(
                "GOP size must be at least 1".to_string(),
            ));
        }
        if self.bit_rate == Some(0) {
            return Err(PipelineError::InvalidConfig(
                "bit rate must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Resolve the encoder settings for rotating `stream`.
    pub fn encoder_settings(&self, stream: &VideoStreamInfo) -> Result<EncoderSettings> {
        self.validate()?;

        if stream.width == 0 || stream.height == 0 {
            return Err(PipelineError::InvalidConfig(format!(
                "video stream {} has no usable size ({}x{})",
                stream.index, stream.width, stream.height
            )));
        }
        if !stream.time_base.is_positive() {
            return Err(PipelineError::InvalidConfig(format!(
                "video stream {} has an invalid time base {}",
                stream.index, stream.time_base
            )));
        }

        let codec = self.codec.or(stream.codec).ok_or_else(|| {
            PipelineError::InvalidConfig(
                "input codec is not supported for encoding; select an output codec".to_string(),
            )
        })?;

        let mut settings = EncoderSettings::rotated_from(stream, codec, self.pixel_format);
        settings.encoder_name = self.encoder.clone();
        settings.bit_rate = self.bit_rate;
        settings.gop_size = self.gop_size;
        settings.max_b_frames = self.max_b_frames;
        if let Some(time_base) = self.time_base {
            settings.time_base = time_base;
        }
        settings.frame_rate = self
            .frame_rate
            .or(stream.frame_rate.filter(|rate| rate.is_positive()));

        Ok(settings)
    }
}
