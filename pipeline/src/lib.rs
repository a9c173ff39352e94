/*!
    Decode, rotate and re-encode pipeline.

    Drives a [`Demuxer`](ffmpeg_types::Demuxer), a
    [`Decoder`](ffmpeg_types::Decoder), the quarter-turn rotation and an
    [`Encoder`](ffmpeg_types::Encoder) into a [`Muxer`](ffmpeg_types::Muxer),
    one packet at a time. Codecs may hold on to input and hand back zero, one
    or many outputs per submission; the pipeline drains both codecs after
    every submission and retries refused submissions once output has been
    drained.

    ```ignore
    use vidrotate_pipeline::{Pipeline, PipelineConfig};

    let config = PipelineConfig::new().with_bit_rate(4_000_000);
    let mut pipeline = Pipeline::open(demuxer, &mut codecs, &config)?;
    let stats = pipeline.run()?;
    ```

    The crate has no FFmpeg dependency: the codec stages are supplied
    through [`Codecs`], so the state machine runs just as well on in-memory
    codecs.
*/

mod buffers;
mod config;
mod error;
mod pipeline;
mod remap;
mod setup;
mod state;

pub use buffers::Buffers;
pub use config::PipelineConfig;
pub use error::{PipelineError, Result, Stage};
pub use pipeline::Pipeline;
pub use remap::TimestampRemapper;
pub use setup::Codecs;
pub use state::{PipelineStats, State};
