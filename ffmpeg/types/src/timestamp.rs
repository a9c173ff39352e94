/*!
    Timestamp types for media timing.
*/

use crate::Rational;

/**
    Presentation timestamp in time_base units.

    This is the raw timestamp value from the media stream. To convert to
    a meaningful duration, you need the stream's time base.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pts(pub i64);

impl Pts {
    /**
        Re-express this timestamp in another time base.

        See [`Rational::rescale`] for the rounding rules.
    */
    #[inline]
    pub fn rescale(self, from: Rational, to: Rational) -> Self {
        Self(Rational::rescale(self.0, from, to))
    }
}

impl From<i64> for Pts {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<Pts> for i64 {
    fn from(pts: Pts) -> Self {
        pts.0
    }
}

/**
    Duration in time_base units.

    Similar to Pts but semantically represents a duration rather than a point in time.
*/
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MediaDuration(pub i64);

impl MediaDuration {
    /**
        Re-express this duration in another time base.
    */
    #[inline]
    pub fn rescale(self, from: Rational, to: Rational) -> Self {
        Self(Rational::rescale(self.0, from, to))
    }
}

impl From<i64> for MediaDuration {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<MediaDuration> for i64 {
    fn from(duration: MediaDuration) -> Self {
        duration.0
    }
}
