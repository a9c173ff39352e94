use ffmpeg_types::{
    Decoder, Demuxer, Encoder, Muxer, Packet, Rational, Received, Submit, VideoStreamInfo,
};
use tracing::{debug, trace};

use crate::buffers::Buffers;
use crate::config::PipelineConfig;
use crate::error::{processing, setup};
use crate::remap::TimestampRemapper;
use crate::setup::Codecs;
use crate::state::{PipelineStats, State};
use crate::{PipelineError, Result, Stage};

/// Result of draining a codec until it had nothing more to give.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Drain {
    /// The codec needs more input; holds the number of outputs drained.
    Pending(u64),
    /// The codec reported end of stream; holds the number of outputs drained.
    Ended(u64),
}

impl Drain {
    fn count(self) -> u64 {
        match self {
            Self::Pending(count) | Self::Ended(count) => count,
        }
    }
}

/// Timestamps are rescaled into every stage's time base, so each must be
/// strictly positive.
fn check_time_base(stage: Stage, time_base: Rational) -> Result<()> {
    if time_base.is_positive() {
        Ok(())
    } else {
        Err(PipelineError::Setup {
            stage,
            source: ffmpeg_types::Error::invalid_data(format!(
                "{stage} reported an invalid time base {time_base}"
            )),
        })
    }
}

/// Decode, rotate and re-encode pipeline for a single video stream.
///
/// Owns the demuxer, both codecs, the muxer and the picture slots for the
/// whole run. Each call to [`step`](Self::step) consumes one input packet
/// and carries everything it produces through to the muxer before
/// returning; once the input is exhausted the next step flushes both
/// codecs and the pipeline is [`State::Done`].
pub struct Pipeline<D: Demuxer, C: Codecs> {
    demuxer: D,
    decoder: C::Decoder,
    encoder: C::Encoder,
    muxer: C::Muxer,
    buffers: Buffers,
    remap: TimestampRemapper,
    stream: VideoStreamInfo,
    state: State,
    stats: PipelineStats,
    finished: bool,
}

impl<D: Demuxer, C: Codecs> Pipeline<D, C> {
    /// Set up a pipeline reading from `demuxer`.
    ///
    /// Fails with [`PipelineError::NoVideoStream`] before any codec is
    /// opened if the input has no video. Stages are opened in order:
    /// decoder, encoder, muxer.
    pub fn open(demuxer: D, codecs: &mut C, config: &PipelineConfig) -> Result<Self> {
        let stream = demuxer.video_stream().ok_or(PipelineError::NoVideoStream)?;
        let settings = config.encoder_settings(&stream)?;

        debug!(
            stream = stream.index,
            codec = ?stream.codec,
            width = stream.width,
            height = stream.height,
            time_base = %stream.time_base,
            "selected video stream"
        );

        let decoder = codecs
            .open_decoder(&stream)
            .map_err(setup(Stage::Decoder))?;
        let encoder = codecs
            .open_encoder(&settings)
            .map_err(setup(Stage::Encoder))?;
        check_time_base(Stage::Encoder, encoder.time_base())?;
        let muxer = codecs.open_muxer(&encoder).map_err(setup(Stage::Muxer))?;
        check_time_base(Stage::Muxer, muxer.time_base())?;

        // Decode into the format that turns into the encoder's on rotation
        let buffers = Buffers::alloc(
            settings.pixel_format.rotated(),
            stream.width,
            stream.height,
            stream.time_base,
        )
        .map_err(setup(Stage::Decoder))?;

        let remap = TimestampRemapper::new(stream.time_base, encoder.time_base(), muxer.time_base());

        debug!(
            codec = %settings.codec,
            width = settings.width,
            height = settings.height,
            pixel_format = %settings.pixel_format,
            encoder_time_base = %remap.encoder_time_base(),
            output_time_base = %remap.output_time_base(),
            "pipeline ready"
        );

        Ok(Self {
            demuxer,
            decoder,
            encoder,
            muxer,
            buffers,
            remap,
            stream,
            state: State::AwaitingInput,
            stats: PipelineStats::default(),
            finished: false,
        })
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn stats(&self) -> PipelineStats {
        self.stats
    }

    /// The input video stream being rotated.
    pub fn stream(&self) -> &VideoStreamInfo {
        &self.stream
    }

    /// Process one input packet, or flush both codecs once the input is
    /// exhausted. Returns the state the pipeline rests in afterwards.
    ///
    /// Any error is fatal: the pipeline moves to [`State::Failed`] and every
    /// later step fails with [`PipelineError::Aborted`].
    pub fn step(&mut self) -> Result<State> {
        match self.state {
            State::Done => return Ok(State::Done),
            State::Failed => return Err(PipelineError::Aborted),
            _ => {}
        }

        match self.read_next() {
            Ok(()) => Ok(self.state),
            Err(err) => {
                self.enter(State::Failed);
                Err(err)
            }
        }
    }

    /// Step until done, then finalize the output.
    ///
    /// On failure the muxer is never finalized, leaving the output without
    /// a trailer.
    pub fn run(&mut self) -> Result<PipelineStats> {
        while !self.state.is_done() {
            self.step()?;
        }

        if !self.finished {
            self.muxer.finish().map_err(processing(Stage::Muxer))?;
            self.finished = true;
            debug!(
                stats = %self.stats,
                last_pts = ?self.remap.last_output_pts(),
                "pipeline finished"
            );
        }

        Ok(self.stats)
    }

    fn enter(&mut self, state: State) {
        if self.state != state {
            trace!(from = %self.state, to = %state, "pipeline state");
            self.state = state;
        }
    }

    fn read_next(&mut self) -> Result<()> {
        let packet = self
            .demuxer
            .next_packet()
            .map_err(processing(Stage::Demuxer))?;

        let Some(packet) = packet else {
            return self.flush();
        };

        self.stats.packets_read += 1;
        if packet.stream_index != self.stream.index {
            self.stats.packets_skipped += 1;
            trace!(stream = packet.stream_index, "skipping packet of other stream");
            return Ok(());
        }

        self.decode(&packet)?;
        self.enter(State::AwaitingInput);
        Ok(())
    }

    fn decode(&mut self, packet: &Packet) -> Result<()> {
        loop {
            self.enter(State::Decoding);
            let submitted = self
                .decoder
                .submit(packet)
                .map_err(processing(Stage::Decoder))?;

            match submitted {
                Submit::Accepted => {
                    self.drain_decoder()?;
                    return Ok(());
                }
                Submit::Busy => {
                    if self.drain_decoder()?.count() == 0 {
                        return Err(PipelineError::Stalled {
                            stage: Stage::Decoder,
                        });
                    }
                }
            }
        }
    }

    fn drain_decoder(&mut self) -> Result<Drain> {
        let mut drained = 0;
        loop {
            self.enter(State::DrainingDecoder);
            let received = self
                .decoder
                .receive(self.buffers.decoded_mut())
                .map_err(processing(Stage::Decoder))?;

            match received {
                Received::Ready(()) => {
                    drained += 1;
                    self.stats.pictures_decoded += 1;
                    self.rotate();
                    self.encode()?;
                }
                Received::NotReady => return Ok(Drain::Pending(drained)),
                Received::EndOfStream => return Ok(Drain::Ended(drained)),
            }
        }
    }

    fn rotate(&mut self) {
        self.enter(State::Rotating);
        let pts = self.remap.to_encoder(self.buffers.decoded().pts);
        let rotated = self.buffers.rotate();
        rotated.pts = pts;
        rotated.time_base = self.remap.encoder_time_base();
    }

    fn encode(&mut self) -> Result<()> {
        loop {
            self.enter(State::Encoding);
            let submitted = self
                .encoder
                .submit(self.buffers.rotated())
                .map_err(processing(Stage::Encoder))?;

            match submitted {
                Submit::Accepted => {
                    self.stats.pictures_encoded += 1;
                    self.drain_encoder()?;
                    return Ok(());
                }
                Submit::Busy => {
                    if self.drain_encoder()?.count() == 0 {
                        return Err(PipelineError::Stalled {
                            stage: Stage::Encoder,
                        });
                    }
                }
            }
        }
    }

    fn drain_encoder(&mut self) -> Result<Drain> {
        self.enter(State::DrainingEncoder);
        let mut drained = 0;
        loop {
            let received = self
                .encoder
                .receive()
                .map_err(processing(Stage::Encoder))?;

            match received {
                Received::Ready(mut packet) => {
                    drained += 1;
                    self.remap.to_output(&mut packet);
                    packet.stream_index = self.muxer.stream_index();
                    trace!(pts = ?packet.pts, size = packet.data.len(), "writing packet");
                    self.muxer
                        .write(packet)
                        .map_err(processing(Stage::Muxer))?;
                    self.stats.packets_written += 1;
                }
                Received::NotReady => return Ok(Drain::Pending(drained)),
                Received::EndOfStream => return Ok(Drain::Ended(drained)),
            }
        }
    }

    fn flush(&mut self) -> Result<()> {
        self.enter(State::Flushing);
        debug!("input exhausted, flushing");

        self.decoder.flush().map_err(processing(Stage::Decoder))?;
        loop {
            match self.drain_decoder()? {
                Drain::Ended(_) => break,
                Drain::Pending(0) => {
                    return Err(PipelineError::Stalled {
                        stage: Stage::Decoder,
                    });
                }
                Drain::Pending(_) => {}
            }
        }

        self.enter(State::Flushing);
        self.encoder.flush().map_err(processing(Stage::Encoder))?;
        loop {
            match self.drain_encoder()? {
                Drain::Ended(_) => break,
                Drain::Pending(0) => {
                    return Err(PipelineError::Stalled {
                        stage: Stage::Encoder,
                    });
                }
                Drain::Pending(_) => {}
            }
        }

        self.enter(State::Done);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_count() {
        assert_eq!(Drain::Pending(3).count(), 3);
        assert_eq!(Drain::Ended(0).count(), 0);
    }
}
