/*!
    Encoded packet type.
*/

use crate::{MediaDuration, Pts, Rational};

/**
    An encoded media packet.

    Contains compressed data from a single stream, with timing information.
    Packets are the unit of data between demuxer and decoder, or between
    encoder and muxer.
*/
#[derive(Clone, Debug)]
pub struct Packet {
    /// Compressed data.
    pub data: Vec<u8>,
    /// Index of the container stream this packet belongs to.
    pub stream_index: usize,
    /// Presentation timestamp (when to display).
    pub pts: Option<Pts>,
    /// Decode timestamp (when to decode; may differ from PTS for B-frames).
    pub dts: Option<Pts>,
    /// Duration of this packet's content.
    pub duration: MediaDuration,
    /// Time base for interpreting timestamps.
    pub time_base: Rational,
    /// Whether this is a keyframe (can be decoded independently).
    pub is_keyframe: bool,
}

impl Packet {
    /**
        Create a new packet.
    */
    pub fn new(
        data: Vec<u8>,
        stream_index: usize,
        pts: Option<Pts>,
        dts: Option<Pts>,
        duration: MediaDuration,
        time_base: Rational,
        is_keyframe: bool,
    ) -> Self {
        Self {
            data,
            stream_index,
            pts,
            dts,
            duration,
            time_base,
            is_keyframe,
        }
    }

    /**
        Re-express every timestamp of this packet in `time_base`.

        The packet's own time base is updated to match.
    */
    pub fn rescale_to(&mut self, time_base: Rational) {
        let from = self.time_base;
        self.pts = self.pts.map(|pts| pts.rescale(from, time_base));
        self.dts = self.dts.map(|dts| dts.rescale(from, time_base));
        self.duration = self.duration.rescale(from, time_base);
        self.time_base = time_base;
    }
}

// Ensure Packet is Send + Sync
static_assertions::assert_impl_all!(Packet: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;

    const TB_1_1000: Rational = Rational { num: 1, den: 1000 };
    const TB_1_90000: Rational = Rational { num: 1, den: 90000 };

    #[test]
    fn packet_construction() {
        let packet = Packet::new(
            vec![0u8; 1000],
            2,
            Some(Pts(500)),
            Some(Pts(400)),
            MediaDuration(100),
            TB_1_1000,
            true,
        );

        assert_eq!(packet.data.len(), 1000);
        assert_eq!(packet.stream_index, 2);
        assert!(packet.is_keyframe);
    }

    #[test]
    fn packet_rescale_to() {
        let mut packet = Packet::new(
            vec![],
            0,
            Some(Pts(40)),
            None,
            MediaDuration(20),
            TB_1_1000,
            false,
        );
        packet.rescale_to(TB_1_90000);

        assert_eq!(packet.pts, Some(Pts(3600)));
        assert_eq!(packet.dts, None);
        assert_eq!(packet.duration, MediaDuration(1800));
        assert_eq!(packet.time_base, TB_1_90000);
    }
}
