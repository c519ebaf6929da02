/*!
    Rational number type for time bases.
*/

use std::fmt;

/**
    A time base, in seconds per tick: 1/90000 for most video, the sample
    rate for audio.

    FFmpeg reports `0/0` for time bases it has not decided yet (an output
    stream before its header is written, for instance), so the fields stay
    public and such values can be represented; use [`Rational::is_valid`]
    before doing arithmetic with values that came from FFmpeg.
*/
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
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
        Returns true if this rational can be used as a time base.
    */
    #[inline]
    pub const fn is_valid(self) -> bool {
        self.num != 0 && self.den != 0
    }

    /**
        Rescale a timestamp expressed in this time base into `to`.

        Rounds to the nearest integer, halfway cases away from zero, which
        matches FFmpeg's default `av_rescale_q` behavior. If either time base
        is not valid the timestamp is returned unchanged.
    */
    pub fn rescale(self, ts: i64, to: Rational) -> i64 {
        if self == to || !self.is_valid() || !to.is_valid() {
            return ts;
        }

        // ts * self.num / self.den * to.den / to.num
        let mut num = ts as i128 * self.num as i128 * to.den as i128;
        let mut den = self.den as i128 * to.num as i128;
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

        rounded.clamp(i64::MIN as i128, i64::MAX as i128) as i64
    }
}

impl fmt::Debug for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.num, self.den)
    }
}
