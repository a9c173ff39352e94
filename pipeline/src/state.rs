use std::fmt;

/// Where the pipeline is in its processing cycle.
///
/// Between calls to [`Pipeline::step`](crate::Pipeline::step) the pipeline
/// rests in `AwaitingInput`, `Done` or `Failed`; the other states are passed
/// through within a step and are observable in trace logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
    AwaitingInput,
    Decoding,
    DrainingDecoder,
    Rotating,
    Encoding,
    DrainingEncoder,
    Flushing,
    Done,
    /// A step returned an error; the pipeline cannot continue.
    Failed,
}

impl State {
    pub fn is_done(self) -> bool {
        self == Self::Done
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::AwaitingInput => "awaiting input",
            Self::Decoding => "decoding",
            Self::DrainingDecoder => "draining decoder",
            Self::Rotating => "rotating",
            Self::Encoding => "encoding",
            Self::DrainingEncoder => "draining encoder",
            Self::Flushing => "flushing",
            Self::Done => "done",
            Self::Failed => "failed",
        })
    }
}

/// Counters collected while the pipeline runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineStats {
    /// Packets read from the demuxer, any stream.
    pub packets_read: u64,
    /// Packets discarded because they belong to another stream.
    pub packets_skipped: u64,
    /// Pictures received from the decoder.
    pub pictures_decoded: u64,
    /// Pictures accepted by the encoder.
    pub pictures_encoded: u64,
    /// Packets handed to the muxer.
    pub packets_written: u64,
}

impl fmt::Display for PipelineStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} packets read ({} skipped), {} pictures decoded, {} encoded, {} packets written",
            self.packets_read,
            self.packets_skipped,
            self.pictures_decoded,
            self.pictures_encoded,
            self.packets_written
        )
    }
}
