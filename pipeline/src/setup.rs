use ffmpeg_types::{Decoder, EncoderSettings, Encoder, Muxer, Result, VideoStreamInfo};

/// Factory for the codec stages of a pipeline.
///
/// The pipeline calls these in order (decoder, encoder, muxer), and only
/// after the input was found to contain a video stream. The muxer is opened
/// last so it can take its stream parameters from the opened encoder.
pub trait Codecs {
    type Decoder: Decoder;
    type Encoder: Encoder;
    type Muxer: Muxer;

    fn open_decoder(&mut self, stream: &VideoStreamInfo) -> Result<Self::Decoder>;

    fn open_encoder(&mut self, settings: &EncoderSettings) -> Result<Self::Encoder>;

    fn open_muxer(&mut self, encoder: &Self::Encoder) -> Result<Self::Muxer>;
}
