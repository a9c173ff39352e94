/*!
    Rational number type for time bases and frame rates.
*/

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/**
    A rational number represented as a numerator and denominator.

    Used for time bases (e.g., 1/90000 for MPEG-TS) and frame rates
    (e.g., 24000/1001 for 23.976 fps).
*/
#[derive(Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub struct Rational {
    pub num: i32,
    pub den: i32,
}

impl Rational {
    /**
        Create a new rational number.

        # Panics

        Panics if `den` is zero.
    */
    #[inline]
    pub const fn new(num: i32, den: i32) -> Self {
        assert!(den != 0, "denominator cannot be zero");
        Self { num, den }
    }

    /**
        Returns true if both components are strictly positive.

        Only such rationals are usable as a time base or a frame rate.
    */
    #[inline]
    pub const fn is_positive(self) -> bool {
        self.num > 0 && self.den > 0
    }

    /**
        Rescale `value` expressed in units of `from` into units of `to`.

        Computes `value * from.num * to.den / (from.den * to.num)` exactly in
        128-bit arithmetic and rounds to the nearest integer, with ties away
        from zero. Results outside the `i64` range saturate.

        # Panics

        Panics if `to` has a zero numerator.
    */
    pub fn rescale(value: i64, from: Rational, to: Rational) -> i64 {
        assert!(to.num != 0, "cannot rescale into a zero time base");

        let mut num = value as i128 * from.num as i128 * to.den as i128;
        let mut den = from.den as i128 * to.num as i128;
        if den < 0 {
            num = -num;
            den = -den;
        }

        let half = den / 2;
        let rounded = if num >= 0 {
            (num + half) / den
        } else {
            (num - half) / den
        };

        i64::try_from(rounded).unwrap_or(if rounded < 0 { i64::MIN } else { i64::MAX })
    }
}

impl fmt::Debug for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.num, self.den)
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.num, self.den)
    }
}

impl From<(i32, i32)> for Rational {
    fn from((num, den): (i32, i32)) -> Self {
        Self::new(num, den)
    }
}

impl From<i32> for Rational {
    fn from(num: i32) -> Self {
        Self::new(num, 1)
    }
}

/**
    Parses `"num/den"` or a bare integer such as `"30"`.
*/
impl FromStr for Rational {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse = |part: &str| {
            part.trim()
                .parse::<i32>()
                .map_err(|e| format!("invalid rational '{s}': {e}"))
        };

        let (num, den) = match s.split_once('/') {
            Some((num, den)) => (parse(num)?, parse(den)?),
            None => (parse(s)?, 1),
        };

        if den == 0 {
            return Err(format!("invalid rational '{s}': denominator cannot be zero"));
        }

        Ok(Self { num, den })
    }
}

impl TryFrom<String> for Rational {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rational() {
        let r = Rational::new(1, 1000);
        assert_eq!(r.num, 1);
        assert_eq!(r.den, 1000);
    }

    #[test]
    #[should_panic(expected = "denominator cannot be zero")]
    fn zero_denominator_panics() {
        Rational::new(1, 0);
    }

    #[test]
    fn positivity() {
        assert!(Rational::new(1, 25).is_positive());
        assert!(!Rational::new(0, 25).is_positive());
        assert!(!Rational::new(-1, 25).is_positive());
    }

    #[test]
    fn rescale_exact() {
        // 1 second at 1/1000 is 90000 ticks at 1/90000
        let tb_ms = Rational::new(1, 1000);
        let tb_ts = Rational::new(1, 90000);
        assert_eq!(Rational::rescale(1000, tb_ms, tb_ts), 90000);
        assert_eq!(Rational::rescale(90000, tb_ts, tb_ms), 1000);
    }

    #[test]
    fn rescale_rounds_to_nearest() {
        let from = Rational::new(1, 3);
        let to = Rational::new(1, 1);
        // 4/3 -> 1, 5/3 -> 2
        assert_eq!(Rational::rescale(4, from, to), 1);
        assert_eq!(Rational::rescale(5, from, to), 2);
        assert_eq!(Rational::rescale(-4, from, to), -1);
        assert_eq!(Rational::rescale(-5, from, to), -2);
    }

    #[test]
    fn rescale_ties_away_from_zero() {
        let from = Rational::new(1, 2);
        let to = Rational::new(1, 1);
        assert_eq!(Rational::rescale(1, from, to), 1);
        assert_eq!(Rational::rescale(3, from, to), 2);
        assert_eq!(Rational::rescale(-1, from, to), -1);
        assert_eq!(Rational::rescale(-3, from, to), -2);
    }

    #[test]
    fn rescale_does_not_drift() {
        // 29.97 fps frame ticks into a 1/90000 base, frame by frame
        let from = Rational::new(1001, 30000);
        let to = Rational::new(1, 90000);
        for frame in 0..100_000i64 {
            assert_eq!(Rational::rescale(frame, from, to), frame * 3003);
        }
    }

    #[test]
    fn rescale_saturates() {
        let from = Rational::new(i32::MAX, 1);
        let to = Rational::new(1, i32::MAX);
        assert_eq!(Rational::rescale(i64::MAX, from, to), i64::MAX);
        assert_eq!(Rational::rescale(i64::MIN, from, to), i64::MIN);
    }

    #[test]
    fn from_tuple() {
        let r: Rational = (30000, 1001).into();
        assert_eq!(r.num, 30000);
        assert_eq!(r.den, 1001);
    }

    #[test]
    fn from_str() {
        assert_eq!("30000/1001".parse::<Rational>(), Ok(Rational::new(30000, 1001)));
        assert_eq!("25".parse::<Rational>(), Ok(Rational::new(25, 1)));
        assert!("1/0".parse::<Rational>().is_err());
        assert!("abc".parse::<Rational>().is_err());
    }

    #[test]
    fn display() {
        assert_eq!(format!("{}", Rational::new(1, 90000)), "1/90000");
    }
}
