//! Fixed-point royalty share percentages
//!
//! Shares are stored as integer hundredths of a percent so that sums and
//! comparisons are exact at 2-decimal precision. Binary floating point is
//! never used in the comparison path; an f64 only appears at the JSON
//! boundary, rounded to the nearest hundredth on the way in.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A percentage with exactly two fractional digits, held as hundredths.
///
/// `SharePercent::FULL` is 100.00%. The type itself only fixes the
/// representation; range rules ((0, 100] for a single entry) are enforced
/// by the ledger.
///
/// # Examples
///
/// ```
/// use tracklab_common::SharePercent;
///
/// let a: SharePercent = "60.00".parse().unwrap();
/// let b: SharePercent = "40.01".parse().unwrap();
/// assert_eq!(a.hundredths(), 6000);
/// assert_eq!(b.hundredths(), 4001);
/// assert!(a.checked_add(b).unwrap() > SharePercent::FULL);
/// assert_eq!(a.to_string(), "60.00");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SharePercent(i64);

impl SharePercent {
    /// 0.00%
    pub const ZERO: SharePercent = SharePercent(0);

    /// 100.00%
    pub const FULL: SharePercent = SharePercent(10_000);

    /// Construct from integer hundredths of a percent (6000 = 60.00%).
    pub const fn from_hundredths(hundredths: i64) -> Self {
        SharePercent(hundredths)
    }

    /// Raw value in hundredths of a percent.
    pub const fn hundredths(self) -> i64 {
        self.0
    }

    /// Exact sum, None on i64 overflow.
    pub fn checked_add(self, other: SharePercent) -> Option<SharePercent> {
        self.0.checked_add(other.0).map(SharePercent)
    }

    /// True if the value lies in the open-below/closed-above range (0, 100].
    pub fn is_valid_entry(self) -> bool {
        self.0 > 0 && self.0 <= Self::FULL.0
    }

    /// Round an f64 percentage to the nearest hundredth.
    ///
    /// Exact for any value that originated as a 2-decimal literal
    /// (e.g. the JSON number 40.01 parses as 40.009999..., rounding
    /// recovers 4001 hundredths).
    pub fn from_f64_lossy(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        let scaled = (value * 100.0).round();
        if scaled < i64::MIN as f64 || scaled > i64::MAX as f64 {
            return None;
        }
        Some(SharePercent(scaled as i64))
    }
}

impl fmt::Display for SharePercent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

/// Parse error for [`SharePercent`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseShareError(String);

impl fmt::Display for ParseShareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid share percentage: {}", self.0)
    }
}

impl std::error::Error for ParseShareError {}

impl FromStr for SharePercent {
    type Err = ParseShareError;

    /// Parses decimal text with at most two fraction digits ("60", "60.5",
    /// "60.05"). Negative values and more than two fraction digits are
    /// rejected; percentages are never negative in this system.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ParseShareError("empty string".into()));
        }
        let (whole, frac) = match s.split_once('.') {
            Some((w, f)) => (w, f),
            None => (s, ""),
        };
        if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseShareError(s.into()));
        }
        if frac.len() > 2 || !frac.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseShareError(s.into()));
        }
        let whole: i64 = whole
            .parse()
            .map_err(|_| ParseShareError(s.into()))?;
        let frac_hundredths: i64 = match frac.len() {
            0 => 0,
            1 => frac.parse::<i64>().map_err(|_| ParseShareError(s.into()))? * 10,
            _ => frac.parse().map_err(|_| ParseShareError(s.into()))?,
        };
        whole
            .checked_mul(100)
            .and_then(|w| w.checked_add(frac_hundredths))
            .map(SharePercent)
            .ok_or_else(|| ParseShareError(s.into()))
    }
}

impl Serialize for SharePercent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.0 as f64 / 100.0)
    }
}

impl<'de> Deserialize<'de> for SharePercent {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ShareVisitor;

        impl<'de> de::Visitor<'de> for ShareVisitor {
            type Value = SharePercent;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a percentage number or decimal string")
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<SharePercent, E> {
                SharePercent::from_f64_lossy(v)
                    .ok_or_else(|| E::custom(format!("percentage out of range: {v}")))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<SharePercent, E> {
                i64::try_from(v)
                    .ok()
                    .and_then(|v| v.checked_mul(100))
                    .map(SharePercent)
                    .ok_or_else(|| E::custom(format!("percentage out of range: {v}")))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<SharePercent, E> {
                v.checked_mul(100)
                    .map(SharePercent)
                    .ok_or_else(|| E::custom(format!("percentage out of range: {v}")))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<SharePercent, E> {
                v.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_any(ShareVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_whole_and_fractional() {
        assert_eq!("100".parse::<SharePercent>().unwrap(), SharePercent::FULL);
        assert_eq!("60.5".parse::<SharePercent>().unwrap().hundredths(), 6050);
        assert_eq!("0.01".parse::<SharePercent>().unwrap().hundredths(), 1);
        assert_eq!("40.01".parse::<SharePercent>().unwrap().hundredths(), 4001);
    }

    #[test]
    fn rejects_malformed_text() {
        for s in ["", ".", "12.345", "-5", "abc", "1.2.3", "10.x"] {
            assert!(s.parse::<SharePercent>().is_err(), "accepted {s:?}");
        }
    }

    #[test]
    fn display_is_two_decimal() {
        assert_eq!(SharePercent::from_hundredths(6000).to_string(), "60.00");
        assert_eq!(SharePercent::from_hundredths(1).to_string(), "0.01");
        assert_eq!(SharePercent::FULL.to_string(), "100.00");
    }

    #[test]
    fn f64_round_trip_is_exact_at_two_decimals() {
        // Every representable 2-decimal percentage in (0, 100] survives the
        // JSON number path exactly.
        for h in 1..=10_000i64 {
            let v = h as f64 / 100.0;
            assert_eq!(SharePercent::from_f64_lossy(v).unwrap().hundredths(), h);
        }
    }

    #[test]
    fn entry_range_validation() {
        assert!(!SharePercent::ZERO.is_valid_entry());
        assert!(SharePercent::from_hundredths(1).is_valid_entry());
        assert!(SharePercent::FULL.is_valid_entry());
        assert!(!SharePercent::from_hundredths(10_001).is_valid_entry());
    }

    #[test]
    fn deserializes_numbers_and_strings() {
        let n: SharePercent = serde_json::from_str("40.01").unwrap();
        assert_eq!(n.hundredths(), 4001);
        let i: SharePercent = serde_json::from_str("25").unwrap();
        assert_eq!(i.hundredths(), 2500);
        let s: SharePercent = serde_json::from_str("\"33.33\"").unwrap();
        assert_eq!(s.hundredths(), 3333);
    }

    #[test]
    fn serializes_as_number() {
        let json = serde_json::to_string(&SharePercent::from_hundredths(6050)).unwrap();
        assert_eq!(json, "60.5");
    }
}
