use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ffmpeg_source::Source;
use vidrotate_pipeline::Pipeline;

mod backend;
mod cli;

use backend::FfmpegCodecs;
use cli::Args;

fn main() -> Result<()> {
    let args = Args::parse();

    // RUST_LOG takes precedence over -v
    let default_level = if args.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config = args.pipeline_config()?;

    let mut source = Source::open(&args.input)
        .with_context(|| format!("opening input {}", args.input.display()))?;
    let mut codecs = FfmpegCodecs::new(
        source.take_video_codec_config(),
        &args.output,
        args.sink_config(),
        args.threads,
    );

    let mut pipeline = Pipeline::open(source, &mut codecs, &config)
        .with_context(|| format!("setting up {}", args.output.display()))?;

    let stream = pipeline.stream();
    info!(
        "rotating {}x{} video from {} into {}",
        stream.width,
        stream.height,
        args.input.display(),
        args.output.display()
    );

    let stats = pipeline
        .run()
        .with_context(|| format!("rotating {}", args.input.display()))?;

    info!("done");
    println!("{stats}");
    Ok(())
}
