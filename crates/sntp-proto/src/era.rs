// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Conversion between calendar time and the 64-bit NTP timestamp format.
//!
//! The 32-bit seconds field wraps at 2036-02-07 06:28:16 UTC, so every
//! timestamp is anchored to one of two era epochs:
//!
//! - [`NTP_EPOCH`], 1900-01-01 00:00:00 UTC, for instants before the boundary;
//! - [`ERA_BOUNDARY`], 2036-02-07 06:28:16 UTC, for instants at or after it.
//!
//! Encoding accepts instants in `[1968-01-01, ERA_BOUNDARY + 2^31 s)`. The upper
//! half of the post-boundary seconds range is reserved so that decoding can
//! tell the eras apart by the top bit of the seconds field: set means the
//! 1900 epoch, clear means the boundary epoch.
//!
//! # Known limitation
//!
//! The top-bit rule is the usual rollover approximation, not a calendar
//! disambiguation. Instants between 1968-01-01 and 1968-01-20 03:14:08 UTC
//! encode with the top bit clear and therefore decode into the post-2036 era.
//! Dates further from the boundary than half an era cannot be resolved
//! without outside context such as the local clock.
//!
//! The boundary instant itself encodes as seconds 0, fraction 0, which is the
//! unset timestamp. A few non-zero wire values also decode to exactly the
//! boundary once the fraction is rounded to nanoseconds, for example
//! `{seconds: 0, fraction: 1}` and `{seconds: u32::MAX, fraction: u32::MAX}`.
//! Re-encoding such a value yields the unset timestamp.
//!
//! All constants are Unix seconds (seconds since 1970-01-01 00:00:00 UTC).

use chrono::{DateTime, TimeDelta, Utc};

use crate::error::{CodecError, RangeError};
use crate::protocol::TimestampFormat;

/// The number of seconds from 1st January 1900 UTC to the start of the Unix epoch.
pub const EPOCH_DELTA: i64 = 2_208_988_800;

/// The number of seconds in one NTP era (2^32 seconds, approximately 136 years).
pub const ERA_SECONDS: i64 = 1 << 32;

/// 1900-01-01 00:00:00 UTC, the base of the pre-rollover era.
pub const NTP_EPOCH: i64 = -EPOCH_DELTA;

/// 2036-02-07 06:28:16 UTC, the base of the post-rollover era.
pub const ERA_BOUNDARY: i64 = ERA_SECONDS - EPOCH_DELTA;

/// 1968-01-01 00:00:00 UTC, the earliest encodable instant.
pub const ERA_FLOOR: i64 = -63_158_400;

// Post-boundary seconds counts at or above this value are reserved.
const RESERVED_SECONDS: i64 = 1 << 31;

const NANOS_PER_SEC: u64 = 1_000_000_000;

/// [`NTP_EPOCH`] as a calendar time.
pub fn ntp_epoch() -> DateTime<Utc> {
    DateTime::UNIX_EPOCH + TimeDelta::seconds(NTP_EPOCH)
}

/// [`ERA_FLOOR`] as a calendar time.
pub fn era_floor() -> DateTime<Utc> {
    DateTime::UNIX_EPOCH + TimeDelta::seconds(ERA_FLOOR)
}

/// [`ERA_BOUNDARY`] as a calendar time.
pub fn era_boundary() -> DateTime<Utc> {
    DateTime::UNIX_EPOCH + TimeDelta::seconds(ERA_BOUNDARY)
}

/// Encode a calendar time as an NTP timestamp.
///
/// `None` encodes as the all-zero timestamp. The fraction is truncated to the
/// 2^-32 s resolution of the wire format.
pub fn datetime_to_timestamp(time: Option<DateTime<Utc>>) -> Result<TimestampFormat, CodecError> {
    let Some(time) = time else {
        return Ok(TimestampFormat::default());
    };

    // chrono represents a leap second as nanos >= 1e9; fold it into the next second.
    let subsec = time.timestamp_subsec_nanos() as u64;
    let secs = time.timestamp() + (subsec / NANOS_PER_SEC) as i64;
    let nanos = subsec % NANOS_PER_SEC;

    if secs < ERA_FLOOR {
        return Err(RangeError::DateTooEarly.into());
    }

    let seconds = if secs >= ERA_BOUNDARY {
        let seconds = secs - ERA_BOUNDARY;
        if seconds >= RESERVED_SECONDS {
            return Err(RangeError::DateTooLate.into());
        }
        seconds
    } else {
        secs - NTP_EPOCH
    };
    let seconds = u32::try_from(seconds).map_err(|_| RangeError::DateTooLate)?;
    let fraction = ((nanos << 32) / NANOS_PER_SEC) as u32;

    Ok(TimestampFormat { seconds, fraction })
}

/// Decode an NTP timestamp into calendar time.
///
/// Returns `None` for the all-zero ("unset") timestamp. Otherwise the era is
/// chosen from the top bit of the seconds field and the fraction is rounded to
/// the nearest nanosecond, which makes [`datetime_to_timestamp`] followed by
/// this function exact for every encodable instant.
pub fn timestamp_to_datetime(ts: TimestampFormat) -> Option<DateTime<Utc>> {
    if ts.is_zero() {
        return None;
    }

    let base = if ts.seconds & 0x8000_0000 != 0 {
        NTP_EPOCH
    } else {
        ERA_BOUNDARY
    };

    let mut nanos = (ts.fraction as u64 * NANOS_PER_SEC + (1 << 31)) >> 32;
    let mut secs = base + ts.seconds as i64;
    if nanos == NANOS_PER_SEC {
        secs += 1;
        nanos = 0;
    }

    DateTime::from_timestamp(secs, nanos as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn constants_match_calendar() {
        assert_eq!(ntp_epoch(), utc(1900, 1, 1, 0, 0, 0));
        assert_eq!(era_floor(), utc(1968, 1, 1, 0, 0, 0));
        assert_eq!(era_boundary(), utc(2036, 2, 7, 6, 28, 16));
    }

    #[test]
    fn none_encodes_as_zero() {
        let ts = datetime_to_timestamp(None).unwrap();
        assert!(ts.is_zero());
    }

    #[test]
    fn known_pre_rollover_instant() {
        // 2024-01-01 00:00:00 UTC is NTP second 3_913_056_000.
        let ts = datetime_to_timestamp(Some(utc(2024, 1, 1, 0, 0, 0))).unwrap();
        assert_eq!(ts.seconds, 3_913_056_000);
        assert_eq!(ts.fraction, 0);
    }

    #[test]
    fn half_second_fraction() {
        let time = utc(2024, 1, 1, 0, 0, 0) + TimeDelta::milliseconds(500);
        let ts = datetime_to_timestamp(Some(time)).unwrap();
        assert_eq!(ts.fraction, 0x8000_0000);
    }

    #[test]
    fn boundary_uses_post_rollover_epoch() {
        let ts = datetime_to_timestamp(Some(era_boundary())).unwrap();
        assert_eq!(ts.seconds, 0);
        assert_eq!(ts.fraction, 0);
    }

    #[test]
    fn microsecond_before_boundary_uses_pre_rollover_epoch() {
        let time = era_boundary() - TimeDelta::microseconds(1);
        let ts = datetime_to_timestamp(Some(time)).unwrap();
        assert_eq!(ts.seconds, u32::MAX);
        assert_eq!(ts.fraction, ((999_999_000u64 << 32) / NANOS_PER_SEC) as u32);
    }

    #[test]
    fn floor_is_inclusive() {
        let ts = datetime_to_timestamp(Some(era_floor())).unwrap();
        assert_eq!(ts.seconds, 2_145_830_400);

        let err = datetime_to_timestamp(Some(era_floor() - TimeDelta::nanoseconds(1)))
            .unwrap_err();
        assert_eq!(err, CodecError::EncodeRange(RangeError::DateTooEarly));
    }

    #[test]
    fn reserved_half_is_rejected() {
        let last = era_boundary() + TimeDelta::seconds(RESERVED_SECONDS - 1);
        let ts = datetime_to_timestamp(Some(last)).unwrap();
        assert_eq!(ts.seconds, 0x7FFF_FFFF);

        let err = datetime_to_timestamp(Some(era_boundary() + TimeDelta::seconds(RESERVED_SECONDS)))
            .unwrap_err();
        assert_eq!(err, CodecError::EncodeRange(RangeError::DateTooLate));
    }

    #[test]
    fn decode_zero_is_unset() {
        assert_eq!(timestamp_to_datetime(TimestampFormat::default()), None);
    }

    #[test]
    fn decode_top_bit_set_uses_1900_epoch() {
        let ts = TimestampFormat {
            seconds: 0x8000_0000,
            fraction: 0,
        };
        let time = timestamp_to_datetime(ts).unwrap();
        assert_eq!(time, utc(1968, 1, 20, 3, 14, 8));
    }

    #[test]
    fn decode_top_bit_clear_uses_boundary_epoch() {
        let ts = TimestampFormat {
            seconds: 1000,
            fraction: 0,
        };
        let time = timestamp_to_datetime(ts).unwrap();
        assert_eq!(time, era_boundary() + TimeDelta::seconds(1000));
    }

    #[test]
    fn decode_zero_seconds_with_fraction_is_set() {
        let ts = TimestampFormat {
            seconds: 0,
            fraction: 0x8000_0000,
        };
        let time = timestamp_to_datetime(ts).unwrap();
        assert_eq!(time, era_boundary() + TimeDelta::milliseconds(500));
    }

    #[test]
    fn values_rounding_to_boundary_reencode_as_unset() {
        for ts in [
            TimestampFormat {
                seconds: 0,
                fraction: 1,
            },
            TimestampFormat {
                seconds: u32::MAX,
                fraction: u32::MAX,
            },
        ] {
            let time = timestamp_to_datetime(ts);
            assert_eq!(time, Some(era_boundary()));

            let reencoded = datetime_to_timestamp(time).unwrap();
            assert!(reencoded.is_zero());
            assert_eq!(timestamp_to_datetime(reencoded), None);
        }
    }

    #[test]
    fn decode_fraction_carries_into_seconds() {
        let ts = TimestampFormat {
            seconds: 3_913_056_000,
            fraction: u32::MAX,
        };
        let time = timestamp_to_datetime(ts).unwrap();
        assert_eq!(time, utc(2024, 1, 1, 0, 0, 1));
    }

    #[test]
    fn nanosecond_roundtrip() {
        for time in [
            utc(2024, 1, 1, 0, 0, 0) + TimeDelta::nanoseconds(123_456_789),
            utc(1999, 12, 31, 23, 59, 59) + TimeDelta::nanoseconds(999_999_999),
            era_boundary() + TimeDelta::nanoseconds(1),
            era_boundary() - TimeDelta::nanoseconds(1),
            utc(2100, 6, 1, 12, 0, 0) + TimeDelta::microseconds(42),
        ] {
            let ts = datetime_to_timestamp(Some(time)).unwrap();
            assert_eq!(timestamp_to_datetime(ts), Some(time));
        }
    }

    #[test]
    fn early_1968_decodes_into_next_era() {
        let ts = datetime_to_timestamp(Some(era_floor())).unwrap();
        let time = timestamp_to_datetime(ts).unwrap();
        assert!(time > era_boundary());
    }

    #[test]
    fn leap_second_folds_forward() {
        let leap = utc(2016, 12, 31, 23, 59, 59)
            .with_nanosecond(1_500_000_000)
            .unwrap();
        let ts = datetime_to_timestamp(Some(leap)).unwrap();
        let next = datetime_to_timestamp(Some(utc(2017, 1, 1, 0, 0, 0))).unwrap();
        assert_eq!(ts.seconds, next.seconds);
        assert_eq!(ts.fraction, 0x8000_0000);
    }
}
