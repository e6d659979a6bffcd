use std::fmt::{Display, Formatter};

use serde::{Serialize, Serializer};
use time::format_description::well_known::Rfc3339;
use time::{OffsetDateTime, UtcOffset};

use crate::ValidationError;

/// Point in time rendered as an RFC 3339 string.
///
/// Crypto series are built in UTC (`2024-01-01T00:00:00Z`); equity series keep
/// the exchange offset (`2024-01-02T09:30:00-05:00`). Constructors reject
/// values RFC 3339 cannot express (years outside 0..=9999, sub-minute offsets).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MarketTimestamp(OffsetDateTime);

impl MarketTimestamp {
    /// Epoch milliseconds, as CoinGecko reports them.
    pub fn from_unix_millis(millis: f64) -> Result<Self, ValidationError> {
        if !millis.is_finite() {
            return Err(ValidationError::TimestampOutOfRange { value: 0 });
        }
        let nanos = (millis.round() as i128)
            .checked_mul(1_000_000)
            .ok_or(ValidationError::TimestampOutOfRange { value: i128::MAX })?;
        let value = OffsetDateTime::from_unix_timestamp_nanos(nanos)
            .map_err(|_| ValidationError::TimestampOutOfRange { value: nanos })?;
        Self::checked(value, nanos)
    }

    /// Epoch seconds shifted to a fixed UTC offset, as Yahoo charts report them.
    pub fn from_unix_seconds(seconds: i64, utc_offset_seconds: i64) -> Result<Self, ValidationError> {
        if utc_offset_seconds % 60 != 0 {
            return Err(ValidationError::InvalidUtcOffset {
                seconds: utc_offset_seconds,
            });
        }
        let offset = i32::try_from(utc_offset_seconds)
            .ok()
            .and_then(|whole| UtcOffset::from_whole_seconds(whole).ok())
            .ok_or(ValidationError::InvalidUtcOffset {
                seconds: utc_offset_seconds,
            })?;

        let out_of_range = ValidationError::TimestampOutOfRange {
            value: i128::from(seconds),
        };
        let value = OffsetDateTime::from_unix_timestamp(seconds)
            .ok()
            .and_then(|utc| utc.checked_to_offset(offset))
            .ok_or_else(|| out_of_range.clone())?;
        Self::checked(value, i128::from(seconds))
    }

    fn checked(value: OffsetDateTime, raw: i128) -> Result<Self, ValidationError> {
        if !(0..=9999).contains(&value.year()) {
            return Err(ValidationError::TimestampOutOfRange { value: raw });
        }
        Ok(Self(value))
    }

    pub fn format_rfc3339(self) -> String {
        self.0
            .format(&Rfc3339)
            .unwrap_or_else(|_| self.0.unix_timestamp().to_string())
    }
}

impl Display for MarketTimestamp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.format_rfc3339())
    }
}

impl Serialize for MarketTimestamp {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.format_rfc3339())
    }
}
