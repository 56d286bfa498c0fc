//! Timestamp conversions for LZH/LHA headers.
//!
//! Three representations appear in entry headers:
//!
//! - **Generic** (MS-DOS style) packed stamps in level 0 and level 1 base
//!   headers. Civil time, 2-second resolution:
//!
//!   ```text
//!    31 30 29 28 27 26 25 24 23 22 21 20 19 18 17 16
//!   |<---- year-1980 --->|<- month ->|<--- day ---->|
//!
//!    15 14 13 12 11 10  9  8  7  6  5  4  3  2  1  0
//!   |<--- hour --->|<---- minute --->|<- second/2 ->|
//!   ```
//!
//! - **Unix seconds**, used by level 2 and 3 base headers, the 0x54 extension
//!   record and the level 0 UNIX trailer.
//! - **Windows FILETIME**, 100 ns ticks since 1601-01-01 UTC, used by the 0x41
//!   extension record.
//!
//! Generic stamps carry no zone. They are absolute local times: the `_local`
//! conversions resolve the host's zone for each stamp, so daylight saving
//! is applied per date. The plain conversions take a fixed `utc_offset`
//! (seconds east of UTC) instead.

use chrono::{DateTime, Local, TimeZone};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// FILETIME tick count at 1970-01-01 00:00:00 UTC.
pub const FILETIME_UNIX_EPOCH: u64 = 0x019D_B1DE_D53E_8000;

/// FILETIME ticks per second.
pub const FILETIME_TICKS_PER_SECOND: u64 = 10_000_000;

/// First year representable by a generic stamp.
pub const GENERIC_MIN_YEAR: i64 = 1980;

/// Last year representable by a generic stamp.
pub const GENERIC_MAX_YEAR: i64 = 1980 + 0x7F;

const SECS_PER_DAY: i64 = 86_400;

/// Unpacked fields of a generic timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenericTimestamp {
    /// Full year (1980..=2107).
    pub year: u16,
    /// Month, 1-based.
    pub month: u8,
    /// Day of month, 1-based.
    pub day: u8,
    /// Hour (0..=23).
    pub hour: u8,
    /// Minute (0..=59).
    pub minute: u8,
    /// Second, always even when unpacked.
    pub second: u8,
}

impl GenericTimestamp {
    /// Split a packed stamp into its fields without validating them.
    pub fn unpack(stamp: u32) -> Self {
        let bits = |off: u32, len: u32| (stamp >> off) & ((1 << len) - 1);
        Self {
            year: (bits(25, 7) + 1980) as u16,
            month: bits(21, 4) as u8,
            day: bits(16, 5) as u8,
            hour: bits(11, 5) as u8,
            minute: bits(5, 6) as u8,
            second: (bits(0, 5) * 2) as u8,
        }
    }

    /// Pack the fields into a generic stamp. Odd seconds are truncated.
    pub fn pack(&self) -> u32 {
        ((self.year.saturating_sub(1980) as u32 & 0x7F) << 25)
            | ((self.month as u32 & 0x0F) << 21)
            | ((self.day as u32 & 0x1F) << 16)
            | ((self.hour as u32 & 0x1F) << 11)
            | ((self.minute as u32 & 0x3F) << 5)
            | ((self.second as u32 / 2) & 0x1F)
    }
}

/// Days since 1970-01-01 for a proleptic Gregorian date.
fn days_from_civil(year: i64, month: u32, day: u32) -> i64 {
    let y = if month <= 2 { year - 1 } else { year };
    let era = y.div_euclid(400);
    let yoe = y - era * 400;
    let mp = (month as i64 + 9) % 12;
    let doy = (153 * mp + 2) / 5 + day as i64 - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}

/// Proleptic Gregorian date for a count of days since 1970-01-01.
fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
    let year = yoe + era * 400 + if month <= 2 { 1 } else { 0 };
    (year, month, day)
}

/// Wall-clock seconds since 1970-01-01 00:00:00 for a generic stamp.
///
/// Out-of-range fields roll over into the neighbouring unit, so month 13 is
/// January of the next year and day 0 is the last day of the previous month.
fn generic_wall_seconds(stamp: u32) -> i64 {
    let ts = GenericTimestamp::unpack(stamp);

    let month0 = ts.month as i64 - 1;
    let year = ts.year as i64 + month0.div_euclid(12);
    let month = (month0.rem_euclid(12) + 1) as u32;
    let days = days_from_civil(year, month, 1) + ts.day as i64 - 1;

    days * SECS_PER_DAY + ts.hour as i64 * 3600 + ts.minute as i64 * 60 + ts.second as i64
}

/// Convert a generic stamp read in a fixed offset to Unix seconds.
pub fn generic_to_unix(stamp: u32, utc_offset: i32) -> i64 {
    generic_wall_seconds(stamp) - utc_offset as i64
}

/// Offset of the host's local zone from UTC at instant `t`, in seconds east.
///
/// Instants chrono cannot represent report UTC.
pub fn local_offset_at(t: i64) -> i32 {
    DateTime::from_timestamp(t, 0)
        .map(|utc| Local.offset_from_utc_datetime(&utc.naive_utc()).local_minus_utc())
        .unwrap_or(0)
}

/// Convert a generic stamp in the host's local time to Unix seconds.
///
/// A wall time repeated when clocks go back resolves to its first
/// occurrence. One skipped when clocks go forward is read with the offset
/// in force at that instant taken as UTC.
pub fn generic_to_unix_local(stamp: u32) -> i64 {
    let wall = generic_wall_seconds(stamp);
    let Some(naive) = DateTime::from_timestamp(wall, 0).map(|dt| dt.naive_utc()) else {
        return wall;
    };

    match Local.from_local_datetime(&naive).earliest() {
        Some(local) => local.timestamp(),
        None => wall - Local.offset_from_utc_datetime(&naive).local_minus_utc() as i64,
    }
}

/// Convert Unix seconds to a generic stamp.
///
/// Times outside 1980-01-01 00:00:00 ..= 2107-12-31 23:59:58 (local) are
/// clamped to the nearest representable stamp.
pub fn unix_to_generic(t: i64, utc_offset: i32) -> u32 {
    let min = days_from_civil(GENERIC_MIN_YEAR, 1, 1) * SECS_PER_DAY;
    let max = days_from_civil(GENERIC_MAX_YEAR, 12, 31) * SECS_PER_DAY + SECS_PER_DAY - 2;
    let local = t.saturating_add(utc_offset as i64).clamp(min, max);

    let (year, month, day) = civil_from_days(local.div_euclid(SECS_PER_DAY));
    let secs = local.rem_euclid(SECS_PER_DAY);

    GenericTimestamp {
        year: year as u16,
        month: month as u8,
        day: day as u8,
        hour: (secs / 3600) as u8,
        minute: (secs % 3600 / 60) as u8,
        second: (secs % 60) as u8,
    }
    .pack()
}

/// Convert Unix seconds to a generic stamp in the host's local time.
pub fn unix_to_generic_local(t: i64) -> u32 {
    unix_to_generic(t, local_offset_at(t))
}

/// Convert a FILETIME tick count to Unix seconds (UTC).
pub fn filetime_to_unix(ticks: u64) -> i64 {
    let delta = ticks as i128 - FILETIME_UNIX_EPOCH as i128;
    delta.div_euclid(FILETIME_TICKS_PER_SECOND as i128) as i64
}

/// Convert Unix seconds to a FILETIME tick count (UTC).
///
/// Instants before 1601-01-01 saturate to 0.
pub fn unix_to_filetime(t: i64) -> u64 {
    let ticks = t as i128 * FILETIME_TICKS_PER_SECOND as i128 + FILETIME_UNIX_EPOCH as i128;
    ticks.clamp(0, u64::MAX as i128) as u64
}

/// Convert Unix seconds to a `SystemTime`.
pub fn unix_to_system_time(t: i64) -> SystemTime {
    if t >= 0 {
        UNIX_EPOCH + Duration::from_secs(t as u64)
    } else {
        UNIX_EPOCH - Duration::from_secs(t.unsigned_abs())
    }
}

/// Convert a `SystemTime` to whole Unix seconds, rounding toward negative infinity.
pub fn system_time_to_unix(time: SystemTime) -> i64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(d) => d.as_secs() as i64,
        Err(e) => {
            let d = e.duration();
            let secs = d.as_secs() as i64;
            if d.subsec_nanos() > 0 {
                -secs - 1
            } else {
                -secs
            }
        }
    }
}
