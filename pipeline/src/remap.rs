use ffmpeg_types::{Packet, Pts, Rational};
use tracing::warn;

/// Rescales timestamps across the two time-base boundaries of the pipeline:
/// decoder to encoder (on pictures) and encoder to output stream (on packets).
///
/// Monotonicity is not enforced, only observed: a decreasing output
/// timestamp is logged and passed through unchanged.
#[derive(Debug, Clone)]
pub struct TimestampRemapper {
    decoder_tb: Rational,
    encoder_tb: Rational,
    output_tb: Rational,
    last_output_pts: Option<Pts>,
}

impl TimestampRemapper {
    pub fn new(decoder_tb: Rational, encoder_tb: Rational, output_tb: Rational) -> Self {
        Self {
            decoder_tb,
            encoder_tb,
            output_tb,
            last_output_pts: None,
        }
    }

    pub fn encoder_time_base(&self) -> Rational {
        self.encoder_tb
    }

    pub fn output_time_base(&self) -> Rational {
        self.output_tb
    }

    /// Decoder time base to encoder time base.
    pub fn to_encoder(&self, pts: Option<Pts>) -> Option<Pts> {
        pts.map(|pts| pts.rescale(self.decoder_tb, self.encoder_tb))
    }

    /// Encoder time base to output time base, applied to pts, dts and duration.
    pub fn to_output(&mut self, packet: &mut Packet) {
        // Encoders stamp packets in their own time base regardless of what
        // the packet struct was created with.
        packet.time_base = self.encoder_tb;
        packet.rescale_to(self.output_tb);

        if let Some(pts) = packet.pts {
            if let Some(last) = self.last_output_pts {
                if pts < last {
                    warn!(
                        pts = pts.0,
                        previous = last.0,
                        "output presentation timestamp decreased"
                    );
                }
            }
            self.last_output_pts = Some(pts);
        }
    }

    /// Last presentation timestamp passed to the output, in the output time base.
    pub fn last_output_pts(&self) -> Option<Pts> {
        self.last_output_pts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ffmpeg_types::MediaDuration;

    fn packet(pts: i64, dts: i64, duration: i64) -> Packet {
        Packet::new(
            vec![0],
            0,
            Some(Pts(pts)),
            Some(Pts(dts)),
            MediaDuration(duration),
            Rational::new(1, 1),
            false,
        )
    }

    #[test]
    fn decoder_to_encoder() {
        let remap = TimestampRemapper::new(
            Rational::new(1, 90000),
            Rational::new(1, 30),
            Rational::new(1, 1000),
        );
        assert_eq!(remap.to_encoder(Some(Pts(3000))), Some(Pts(1)));
        assert_eq!(remap.to_encoder(Some(Pts(4500))), Some(Pts(2)));
        assert_eq!(remap.to_encoder(None), None);
    }

    #[test]
    fn encoder_to_output_covers_all_fields() {
        let mut remap = TimestampRemapper::new(
            Rational::new(1, 25),
            Rational::new(1, 25),
            Rational::new(1, 12800),
        );
        let mut pkt = packet(2, 1, 1);

        remap.to_output(&mut pkt);

        assert_eq!(pkt.pts, Some(Pts(1024)));
        assert_eq!(pkt.dts, Some(Pts(512)));
        assert_eq!(pkt.duration, MediaDuration(512));
        assert_eq!(pkt.time_base, Rational::new(1, 12800));
        assert_eq!(remap.last_output_pts(), Some(Pts(1024)));
    }

    #[test]
    fn packet_time_base_is_taken_from_encoder() {
        let mut remap = TimestampRemapper::new(
            Rational::new(1, 30),
            Rational::new(1, 30),
            Rational::new(1, 90),
        );
        // Stamped with a bogus time base; the encoder's is authoritative.
        let mut pkt = packet(1, 1, 1);

        remap.to_output(&mut pkt);

        assert_eq!(pkt.pts, Some(Pts(3)));
    }

    #[test]
    fn decreasing_pts_passes_through() {
        let tb = Rational::new(1, 30);
        let mut remap = TimestampRemapper::new(tb, tb, tb);

        let mut first = packet(5, 5, 1);
        let mut second = packet(3, 3, 1);
        remap.to_output(&mut first);
        remap.to_output(&mut second);

        assert_eq!(second.pts, Some(Pts(3)));
        assert_eq!(remap.last_output_pts(), Some(Pts(3)));
    }
}
