use std::cmp::Ordering;
use std::fmt;

use serde::{Serialize, Serializer};

use super::error::RecordError;

/// Non-negative fixed-point price
///
/// Stored as an integer scaled by 10^6 alongside the number of decimal places
/// the value was written with, so `3.50` is read back and written out as
/// `3.50` rather than `3.5`. Ordering compares the numeric value only, which is
/// why `Price` does not implement `Ord`: `3.5` and `3.50` are numerically equal
/// but structurally different.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Price {
    raw: i64,
    scale: u8,
}

impl Price {
    const SCALE: i64 = 1_000_000;

    /// Maximum number of decimal places accepted
    pub const MAX_DECIMALS: usize = 6;

    /// Create from a raw value scaled by 10^6, displayed with `scale` decimals
    ///
    /// Values above `i64::MAX` saturate.
    pub fn from_raw(raw: u64, scale: u8) -> Self {
        Self {
            raw: i64::try_from(raw).unwrap_or(i64::MAX),
            scale: scale.min(Self::MAX_DECIMALS as u8),
        }
    }

    /// Raw value scaled by 10^6
    pub fn raw(&self) -> i64 {
        self.raw
    }

    /// Number of decimal places used when displaying
    pub fn scale(&self) -> u8 {
        self.scale
    }

    /// Numeric comparison ignoring display scale
    pub fn cmp_value(&self, other: &Self) -> Ordering {
        self.raw.cmp(&other.raw)
    }

    /// Parse from a decimal string such as `9.99`, `3.50` or `12`
    ///
    /// Surrounding whitespace and a leading `+` are accepted. Negative values,
    /// exponents, and more than [`Price::MAX_DECIMALS`] decimal places are rejected.
    pub fn parse(s: &str) -> Result<Self, RecordError> {
        let trimmed = s.trim();

        if let Some(rest) = trimmed.strip_prefix('-') {
            return match Self::parse_unsigned(rest, s) {
                Ok(_) => Err(RecordError::NegativePrice(s.to_string())),
                Err(e) => Err(e),
            };
        }

        let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
        Self::parse_unsigned(unsigned, s)
    }

    fn parse_unsigned(s: &str, original: &str) -> Result<Self, RecordError> {
        let invalid = || RecordError::InvalidPrice(original.to_string());

        let (integer_part, decimal_part) = match s.split_once('.') {
            Some((int, dec)) => (int, dec),
            None => (s, ""),
        };

        if integer_part.is_empty() && decimal_part.is_empty() {
            return Err(invalid());
        }
        if !integer_part.bytes().all(|b| b.is_ascii_digit())
            || !decimal_part.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }
        if decimal_part.len() > Self::MAX_DECIMALS {
            return Err(RecordError::PriceTooPrecise(original.to_string()));
        }

        let integer: i64 = if integer_part.is_empty() {
            0
        } else {
            integer_part.parse().map_err(|_| invalid())?
        };

        let decimal: i64 = if decimal_part.is_empty() {
            0
        } else {
            format!("{:0<width$}", decimal_part, width = Self::MAX_DECIMALS)
                .parse()
                .map_err(|_| invalid())?
        };

        let raw = integer
            .checked_mul(Self::SCALE)
            .and_then(|v| v.checked_add(decimal))
            .ok_or_else(invalid)?;

        Ok(Self {
            raw,
            scale: decimal_part.len() as u8,
        })
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let integer = self.raw / Self::SCALE;
        if self.scale == 0 {
            return write!(f, "{}", integer);
        }

        let divisor = 10_i64.pow(Self::MAX_DECIMALS as u32 - self.scale as u32);
        let fraction = (self.raw % Self::SCALE) / divisor;
        write!(
            f,
            "{}.{:0width$}",
            integer,
            fraction,
            width = self.scale as usize
        )
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
