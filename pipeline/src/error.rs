use std::fmt;

use thiserror::Error;

/// Pipeline stage a failure originated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Demuxer,
    Decoder,
    Encoder,
    Muxer,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Demuxer => "demuxer",
            Self::Decoder => "decoder",
            Self::Encoder => "encoder",
            Self::Muxer => "muxer",
        })
    }
}

/// Pipeline error type.
///
/// Every variant is fatal; transient "busy" and "not ready" conditions are
/// handled inside the pipeline and never surface.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The input has no video stream.
    #[error("no video stream in input")]
    NoVideoStream,

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A stage could not be set up; nothing was processed.
    #[error("{stage} setup failed: {source}")]
    Setup {
        stage: Stage,
        #[source]
        source: ffmpeg_types::Error,
    },

    /// A stage failed mid-stream; the output is incomplete.
    #[error("{stage} failed: {source}")]
    Processing {
        stage: Stage,
        #[source]
        source: ffmpeg_types::Error,
    },

    /// A stage refused input without producing any output to drain.
    #[error("{stage} stalled: input refused but no output pending")]
    Stalled { stage: Stage },

    /// The pipeline was stepped after an earlier failure.
    #[error("pipeline aborted by an earlier failure")]
    Aborted,
}

impl PipelineError {
    /// The stage the error is attributed to, if any.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::Setup { stage, .. } | Self::Processing { stage, .. } | Self::Stalled { stage } => {
                Some(*stage)
            }
            Self::NoVideoStream | Self::InvalidConfig(_) | Self::Aborted => None,
        }
    }

    /// Returns true if the failure happened before any packet was processed.
    pub fn is_setup(&self) -> bool {
        matches!(
            self,
            Self::NoVideoStream | Self::InvalidConfig(_) | Self::Setup { .. }
        )
    }
}

/// Tag an `ffmpeg_types` error as a setup failure of `stage`.
pub(crate) fn setup(stage: Stage) -> impl FnOnce(ffmpeg_types::Error) -> PipelineError {
    move |source| PipelineError::Setup { stage, source }
}

/// Tag an `ffmpeg_types` error as a processing failure of `stage`.
pub(crate) fn processing(stage: Stage) -> impl FnOnce(ffmpeg_types::Error) -> PipelineError {
    move |source| PipelineError::Processing { stage, source }
}

/// Pipeline result type.
pub type Result<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn display_names_stage_and_reason() {
        let err = processing(Stage::Decoder)(ffmpeg_types::Error::codec("bad slice"));
        assert_eq!(err.to_string(), "decoder failed: codec error: bad slice");
        assert!(err.source().is_some());
        assert_eq!(err.stage(), Some(Stage::Decoder));
        assert!(!err.is_setup());
    }

    #[test]
    fn setup_errors() {
        assert_eq!(
            PipelineError::NoVideoStream.to_string(),
            "no video stream in input"
        );
        assert!(PipelineError::NoVideoStream.is_setup());

        let err = setup(Stage::Encoder)(ffmpeg_types::Error::unsupported_format("no encoder"));
        assert_eq!(
            err.to_string(),
            "encoder setup failed: unsupported format: no encoder"
        );
        assert!(err.is_setup());
    }

    #[test]
    fn stalled_is_processing_failure() {
        let err = PipelineError::Stalled {
            stage: Stage::Encoder,
        };
        assert_eq!(
            err.to_string(),
            "encoder stalled: input refused but no output pending"
        );
        assert!(!err.is_setup());
    }
}
