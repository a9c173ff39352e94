use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use ffmpeg_sink::{ContainerFormat, SinkConfig};
use ffmpeg_types::{CodecId, PixelFormat, Rational};
use vidrotate_pipeline::PipelineConfig;

#[derive(Parser, Debug)]
#[command(name = "vidrotate")]
#[command(version)]
#[command(about = "Rotate the video of a media file by 90 degrees clockwise")]
pub struct Args {
    /// Input media file
    pub input: PathBuf,

    /// Output media file
    pub output: PathBuf,

    /// JSON file with encoder settings; command-line options take precedence
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output codec (h264, hevc, vp8, vp9, av1, mpeg4, mpeg2video)
    #[arg(long)]
    pub codec: Option<CodecId>,

    /// Encoder implementation (e.g. libx264)
    #[arg(long)]
    pub encoder: Option<String>,

    /// Target bit rate in bits per second
    #[arg(long)]
    pub bitrate: Option<u64>,

    /// Maximum keyframe interval in pictures
    #[arg(long)]
    pub gop: Option<u32>,

    /// Maximum number of consecutive B-frames
    #[arg(long)]
    pub max_b_frames: Option<u32>,

    /// Pixel format to encode in (e.g. yuv420p, nv12)
    #[arg(long)]
    pub pixel_format: Option<PixelFormat>,

    /// Output frame rate as N/D (e.g. 30000/1001)
    #[arg(long)]
    pub fps: Option<Rational>,

    /// Container format (mp4, mkv, ts); guessed from the output path if unset
    #[arg(long)]
    pub format: Option<ContainerFormat>,

    /// Keep the MP4 index at the end of the file
    #[arg(long)]
    pub no_fast_start: bool,

    /// Number of codec threads (default: auto-detect)
    #[arg(short = 't', long, default_value = "0")]
    pub threads: usize,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /**
        Encoder settings from the config file, if any, with command-line
        options applied on top.
    */
    pub fn pipeline_config(&self) -> Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("reading config {}", path.display()))?;
                serde_json::from_str::<PipelineConfig>(&text)
                    .with_context(|| format!("parsing config {}", path.display()))?
            }
            None => PipelineConfig::new(),
        };

        if let Some(codec) = self.codec {
            config = config.with_codec(codec);
        }
        if let Some(encoder) = &self.encoder {
            config = config.with_encoder(encoder.clone());
        }
        if let Some(bitrate) = self.bitrate {
            config = config.with_bit_rate(bitrate);
        }
        if let Some(gop) = self.gop {
            config = config.with_gop_size(gop);
        }
        if let Some(max_b_frames) = self.max_b_frames {
            config = config.with_max_b_frames(max_b_frames);
        }
        if let Some(pixel_format) = self.pixel_format {
            config = config.with_pixel_format(pixel_format);
        }
        if let Some(fps) = self.fps {
            config = config.with_frame_rate(fps);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn sink_config(&self) -> SinkConfig {
        let config = match self.format {
            Some(format) => SinkConfig::new(format),
            None => SinkConfig::guess(),
        };
        config.with_fast_start(!self.no_fast_start)
    }
}
