//! Time-to-live values.

use core::fmt;
use core::str::FromStr;
use std::time::Duration;

//------------ Ttl -----------------------------------------------------------

const SECS_PER_MINUTE: u32 = 60;
const SECS_PER_HOUR: u32 = 3600;
const SECS_PER_DAY: u32 = 86400;
const SECS_PER_WEEK: u32 = 604800;

/// A span of time, typically used to describe the time a given DNS record is
/// valid.
///
/// TTL values have second-level precision (see [RFC 2181]) which is why this
/// is a wrapper around a `u32` rather than a [`Duration`].
///
/// In zone files, a TTL or any other time value may be given either as a
/// plain number of seconds or as a number followed by exactly one unit
/// suffix: `W` for weeks, `D` for days, `H` for hours, `M` for minutes,
/// and `S` for seconds, all case-insensitive. The [`FromStr`] impl
/// implements this syntax.
///
/// [RFC 2181]: https://datatracker.ietf.org/doc/html/rfc2181#section-8
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(transparent)]
pub struct Ttl(u32);

impl Ttl {
    /// A duration of zero time.
    pub const ZERO: Ttl = Ttl::from_secs(0);

    /// One day, the default TTL for zone data.
    pub const DAY: Ttl = Ttl::from_secs(SECS_PER_DAY);

    /// The maximum theoretical time to live.
    pub const MAX: Ttl = Ttl::from_secs(u32::MAX);

    /// Creates a new `Ttl` from the specified number of seconds.
    #[must_use]
    #[inline]
    pub const fn from_secs(secs: u32) -> Self {
        Self(secs)
    }

    /// Returns the total time to live in seconds.
    #[must_use]
    #[inline]
    pub const fn as_secs(&self) -> u32 {
        self.0
    }

    /// Converts a `Ttl` into a [`std::time::Duration`].
    #[must_use]
    #[inline]
    pub const fn into_duration(&self) -> Duration {
        Duration::from_secs(self.0 as u64)
    }

    /// Returns half of the TTL, rounded down.
    #[must_use]
    pub const fn half(self) -> Self {
        Self(self.0 / 2)
    }

    /// Limits the TTL to the given range.
    ///
    /// Values below `min` become `min`, values above `max` become `max`. The
    /// caller has to make sure that `min` is not larger than `max`.
    #[must_use]
    pub fn clamp_to(self, min: Ttl, max: Ttl) -> Self {
        debug_assert!(min <= max);
        if self < min {
            min
        } else if self > max {
            max
        } else {
            self
        }
    }
}

//--- From

impl From<u32> for Ttl {
    fn from(secs: u32) -> Self {
        Ttl::from_secs(secs)
    }
}

//--- FromStr

impl FromStr for Ttl {
    type Err = TtlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (digits, unit) = match s.as_bytes().last() {
            None => return Err(TtlError("empty time value")),
            Some(ch) if ch.is_ascii_digit() => (s, 1),
            Some(ch) => {
                let unit = match ch.to_ascii_uppercase() {
                    b'W' => SECS_PER_WEEK,
                    b'D' => SECS_PER_DAY,
                    b'H' => SECS_PER_HOUR,
                    b'M' => SECS_PER_MINUTE,
                    b'S' => 1,
                    _ => return Err(TtlError("invalid time unit")),
                };
                (&s[..s.len() - 1], unit)
            }
        };
        if digits.is_empty() || !digits.bytes().all(|ch| ch.is_ascii_digit())
        {
            return Err(TtlError("invalid time value"));
        }
        let value =
            u32::from_str(digits).map_err(|_| TtlError("time value overflow"))?;
        value
            .checked_mul(unit)
            .map(Ttl)
            .ok_or(TtlError("time value overflow"))
    }
}

//--- Display

impl fmt::Display for Ttl {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

//------------ TtlError ------------------------------------------------------

/// A time value in a zone file could not be parsed.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TtlError(&'static str);

impl TtlError {
    pub fn as_str(self) -> &'static str {
        self.0
    }
}

impl fmt::Display for TtlError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl std::error::Error for TtlError {}

//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn units() {
        assert_eq!(Ttl::from_str("7200"), Ok(Ttl::from_secs(7200)));
        assert_eq!(Ttl::from_str("2H"), Ok(Ttl::from_secs(7200)));
        assert_eq!(Ttl::from_str("2h"), Ok(Ttl::from_secs(7200)));
        assert_eq!(Ttl::from_str("120m"), Ok(Ttl::from_secs(7200)));
        assert_eq!(Ttl::from_str("1w"), Ok(Ttl::from_secs(604800)));
        assert_eq!(Ttl::from_str("3D"), Ok(Ttl::from_secs(259200)));
        assert_eq!(Ttl::from_str("30S"), Ok(Ttl::from_secs(30)));
        assert_eq!(Ttl::from_str("0"), Ok(Ttl::ZERO));
    }

    #[test]
    fn rejects() {
        assert!(Ttl::from_str("").is_err());
        assert!(Ttl::from_str("H").is_err());
        assert!(Ttl::from_str("1H30M").is_err());
        assert!(Ttl::from_str("2X").is_err());
        assert!(Ttl::from_str("-1").is_err());
        assert!(Ttl::from_str("4294967296").is_err());
        assert!(Ttl::from_str("10000W").is_err());
    }

    #[test]
    fn clamp() {
        let min = Ttl::from_secs(30);
        let max = Ttl::from_secs(300);
        assert_eq!(Ttl::from_secs(0).clamp_to(min, max), min);
        assert_eq!(Ttl::from_secs(100).clamp_to(min, max).as_secs(), 100);
        assert_eq!(Ttl::from_secs(9000).clamp_to(min, max), max);
    }
}
