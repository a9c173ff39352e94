use std::path::{Path, PathBuf};

use ffmpeg_decode::{VideoDecoder, VideoDecoderConfig};
use ffmpeg_encode::{VideoEncoder, VideoEncoderConfig};
use ffmpeg_sink::{Sink, SinkConfig};
use ffmpeg_source::CodecConfig;
use ffmpeg_types::{EncoderSettings, Encoder, Error, Result, VideoStreamInfo};
use vidrotate_pipeline::Codecs;

/// Opens FFmpeg codecs and the output file for a pipeline.
///
/// The output file is created together with the encoder, since the
/// container decides whether the encoder needs a global header.
pub struct FfmpegCodecs {
    codec_config: Option<CodecConfig>,
    output: PathBuf,
    sink_config: SinkConfig,
    threads: usize,
    sink: Option<Sink>,
}

impl FfmpegCodecs {
    /// `codec_config` is None for inputs without video; the pipeline
    /// rejects those before any codec is opened.
    pub fn new(
        codec_config: Option<CodecConfig>,
        output: impl AsRef<Path>,
        sink_config: SinkConfig,
        threads: usize,
    ) -> Self {
        Self {
            codec_config,
            output: output.as_ref().to_path_buf(),
            sink_config,
            threads,
            sink: None,
        }
    }
}

impl Codecs for FfmpegCodecs {
    type Decoder = VideoDecoder;
    type Encoder = VideoEncoder;
    type Muxer = Sink;

    fn open_decoder(&mut self, stream: &VideoStreamInfo) -> Result<VideoDecoder> {
        let codec_config = self
            .codec_config
            .take()
            .ok_or_else(|| Error::invalid_data("no codec parameters for the video stream"))?;

        VideoDecoder::new(
            codec_config,
            stream.time_base,
            VideoDecoderConfig::with_threads(self.threads),
        )
    }

    fn open_encoder(&mut self, settings: &EncoderSettings) -> Result<VideoEncoder> {
        let sink = Sink::file(&self.output, self.sink_config.clone())?;

        let config = VideoEncoderConfig::new()
            .with_global_header(sink.requires_global_header())
            .with_threads(self.threads);
        let encoder = VideoEncoder::new(settings, config)?;

        self.sink = Some(sink);
        Ok(encoder)
    }

    fn open_muxer(&mut self, encoder: &VideoEncoder) -> Result<Sink> {
        let mut sink = self
            .sink
            .take()
            .ok_or_else(|| Error::invalid_state("muxer opened before encoder"))?;

        sink.add_video_stream(encoder.codec(), &encoder.parameters()?, encoder.time_base())?;
        sink.write_header()?;
        Ok(sink)
    }
}
