//! Swiss Ephemeris wrapper for astronomical primitives
//!
//! This module provides safe Rust wrappers around the libswisseph-sys FFI bindings:
//! Julian days, object positions, obliquity of the ecliptic and sidereal time.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use std::sync::Once;

use crate::error::{AstrologerError, Result};
use crate::models::{ChartObjectType, EclipticPosition};

// Swiss Ephemeris constants
const SE_GREG_CAL: i32 = 1;
const SE_ECL_NUT: i32 = -1; // Pseudo-body: obliquity and nutation
const SEFLG_SPEED: i32 = 256; // Include speed in calculations
const SEFLG_SWIEPH: i32 = 2; // Use Swiss Ephemeris

/// Julian day of 1900 January 0.5, the epoch of "Dublin" Julian days.
pub const DJD_EPOCH: f64 = 2415020.0;

static INIT: Once = Once::new();

/// Initialize Swiss Ephemeris (call once at startup)
pub fn init_ephemeris() {
    INIT.call_once(|| {
        unsafe {
            // Initialize without ephemeris files (uses Moshier analytical ephemeris)
            // This provides 0.1 arc seconds precision for planets, 3 arc seconds for Moon
            libswisseph_sys::swe_set_ephe_path(std::ptr::null_mut());
        }
        tracing::debug!("Swiss Ephemeris initialized with Moshier ephemeris");
    });
}

/// Result of a position calculation
#[derive(Debug, Clone)]
pub struct PlanetaryPosition {
    /// Ecliptic longitude (0-360 degrees)
    pub longitude: f64,
    /// Ecliptic latitude
    pub latitude: f64,
    /// Distance (AU)
    pub distance: f64,
    /// Speed in longitude (degrees per day, negative = retrograde)
    pub speed_longitude: f64,
}

impl PlanetaryPosition {
    pub fn to_ecliptic_position(&self) -> EclipticPosition {
        EclipticPosition {
            lambda: self.longitude,
            beta: self.latitude,
            delta: self.distance,
        }
    }
}

/// Convert days since 1900 Jan. 0.5 to a Julian Day
pub fn djd_to_julian_day(djd: f64) -> f64 {
    djd + DJD_EPOCH
}

/// Julian Day (UT) of a UTC date/time, Gregorian calendar
pub fn datetime_to_julian_day(datetime: NaiveDateTime) -> f64 {
    let date = datetime.date();
    let hour = datetime.time().num_seconds_from_midnight() as f64 / 3600.0;

    unsafe {
        libswisseph_sys::swe_julday(
            date.year(),
            date.month() as i32,
            date.day() as i32,
            hour,
            SE_GREG_CAL,
        )
    }
}

/// Convert a local date/time with timezone to Julian Day (UT)
pub fn local_datetime_to_julian_day(
    date: NaiveDate,
    time: NaiveTime,
    timezone: &str,
) -> Result<f64> {
    let tz: Tz = timezone
        .parse()
        .map_err(|_| AstrologerError::InvalidTimezone(timezone.to_string()))?;

    let local_datetime = NaiveDateTime::new(date, time);

    // Convert local time to UTC
    let local_dt = tz
        .from_local_datetime(&local_datetime)
        .single()
        .ok_or_else(|| AstrologerError::AmbiguousLocalTime(local_datetime.to_string()))?;

    let utc_datetime = local_dt.with_timezone(&Utc).naive_utc();

    Ok(datetime_to_julian_day(utc_datetime))
}

/// Call `swe_calc_ut` for a body id, returning the raw six-element result
fn swe_calc(julian_day: f64, body: i32, iflg: i32) -> Result<[f64; 6]> {
    init_ephemeris();

    let mut xx: [f64; 6] = [0.0; 6];
    let mut serr: [i8; 256] = [0; 256];

    let ret = unsafe {
        libswisseph_sys::swe_calc_ut(julian_day, body, iflg, xx.as_mut_ptr(), serr.as_mut_ptr())
    };

    if ret < 0 {
        let error_msg = unsafe {
            let c_str = std::ffi::CStr::from_ptr(serr.as_ptr());
            c_str.to_string_lossy().to_string()
        };
        tracing::warn!(body, julian_day, "swe_calc_ut failed: {}", error_msg);
        return Err(AstrologerError::Ephemeris(error_msg));
    }

    Ok(xx)
}

/// Calculate apparent geocentric position of a chart object at a given Julian Day (UT)
///
/// `true_node` selects the true rather than the mean lunar node.
pub fn calc_object_position(
    object: ChartObjectType,
    julian_day: f64,
    true_node: bool,
) -> Result<PlanetaryPosition> {
    let xx = swe_calc(julian_day, object.swe_id(true_node), SEFLG_SPEED | SEFLG_SWIEPH)?;

    Ok(PlanetaryPosition {
        longitude: xx[0],
        latitude: xx[1],
        distance: xx[2],
        speed_longitude: xx[3],
    })
}

/// True obliquity of the ecliptic in degrees
pub fn calc_obliquity(julian_day: f64) -> Result<f64> {
    let xx = swe_calc(julian_day, SE_ECL_NUT, SEFLG_SWIEPH)?;
    Ok(xx[0])
}

/// Local apparent sidereal time in hours, `[0, 24)`
///
/// `longitude` is geographic, in degrees, positive eastwards.
pub fn sidereal_time(julian_day: f64, longitude: f64) -> f64 {
    init_ephemeris();
    let gst = unsafe { libswisseph_sys::swe_sidtime(julian_day) };
    (gst + longitude / 15.0).rem_euclid(24.0)
}

/// UTC date/time of a Julian Day, truncated to whole seconds
///
/// `None` when the date falls outside the range `chrono` can represent.
pub fn julian_day_to_datetime(julian_day: f64) -> Option<NaiveDateTime> {
    if !julian_day.is_finite() {
        return None;
    }

    let (mut year, mut month, mut day) = (0i32, 0i32, 0i32);
    let mut hour = 0.0f64;

    unsafe {
        libswisseph_sys::swe_revjul(
            julian_day,
            SE_GREG_CAL,
            &mut year,
            &mut month,
            &mut day,
            &mut hour,
        );
    }

    let seconds = ((hour * 3600.0).floor() as u32).min(86_399);
    let date = NaiveDate::from_ymd_opt(year, u32::try_from(month).ok()?, u32::try_from(day).ok()?)?;
    let time = NaiveTime::from_num_seconds_from_midnight_opt(seconds, 0)?;

    Some(NaiveDateTime::new(date, time))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_julian_day_conversion() {
        let datetime = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap().and_hms_opt(12, 0, 0).unwrap();
        // J2000.0 epoch is Julian Day 2451545.0
        assert_abs_diff_eq!(datetime_to_julian_day(datetime), 2451545.0, epsilon = 1e-6);
    }

    #[test]
    fn test_djd_epoch() {
        assert_abs_diff_eq!(djd_to_julian_day(36525.0), 2451545.0, epsilon = 1e-9);
    }

    #[test]
    fn test_local_datetime_to_julian_day() {
        let date = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
        let time = NaiveTime::from_hms_opt(15, 0, 0).unwrap();
        // Moscow was UTC+3 in January 2000
        let jd = local_datetime_to_julian_day(date, time, "Europe/Moscow").unwrap();
        assert_abs_diff_eq!(jd, 2451545.0, epsilon = 1e-6);
    }

    #[test]
    fn test_local_time_in_dst_gap() {
        // Moscow clocks jumped from 02:00 to 03:00 on 2010-03-28
        let date = NaiveDate::from_ymd_opt(2010, 3, 28).unwrap();
        let time = NaiveTime::from_hms_opt(2, 30, 0).unwrap();
        let err = local_datetime_to_julian_day(date, time, "Europe/Moscow").unwrap_err();
        assert!(matches!(err, AstrologerError::AmbiguousLocalTime(_)));
    }

    #[test]
    fn test_local_time_in_dst_overlap() {
        // 02:30 happened twice when Moscow left summer time on 2010-10-31
        let date = NaiveDate::from_ymd_opt(2010, 10, 31).unwrap();
        let time = NaiveTime::from_hms_opt(2, 30, 0).unwrap();
        let err = local_datetime_to_julian_day(date, time, "Europe/Moscow").unwrap_err();
        assert!(matches!(err, AstrologerError::AmbiguousLocalTime(_)));
    }

    #[test]
    fn test_invalid_timezone() {
        let date = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
        let time = NaiveTime::from_hms_opt(0, 0, 0).unwrap();
        let err = local_datetime_to_julian_day(date, time, "Mars/Olympus").unwrap_err();
        assert!(matches!(err, AstrologerError::InvalidTimezone(_)));
    }

    #[test]
    fn test_julian_day_round_trip() {
        let datetime = NaiveDate::from_ymd_opt(1965, 2, 1).unwrap().and_hms_opt(11, 46, 0).unwrap();
        let back = julian_day_to_datetime(datetime_to_julian_day(datetime) + 1e-7);
        assert_eq!(back, Some(datetime));
    }

    #[test]
    fn test_unrepresentable_julian_day() {
        // roughly 270 million years ahead, far past chrono's range
        assert_eq!(julian_day_to_datetime(1e11), None);
        assert_eq!(julian_day_to_datetime(f64::NAN), None);
        assert_eq!(julian_day_to_datetime(f64::INFINITY), None);
    }

    #[test]
    fn test_sun_position() {
        let datetime = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
        let jd = datetime_to_julian_day(datetime);
        let sun = calc_object_position(ChartObjectType::Sun, jd, true).unwrap();

        // Sun should be around 280° (Capricorn) on Jan 1, 2000, moving about 1°/day
        assert!(sun.longitude > 270.0 && sun.longitude < 290.0);
        assert!(sun.speed_longitude > 0.9 && sun.speed_longitude < 1.1);
    }

    #[test]
    fn test_obliquity_at_j2000() {
        let eps = calc_obliquity(2451545.0).unwrap();
        assert_abs_diff_eq!(eps, 23.4393, epsilon = 0.01);
    }

    #[test]
    fn test_sidereal_time_moscow() {
        let jd = djd_to_julian_day(23772.990277);
        assert_abs_diff_eq!(sidereal_time(jd, 37.58), 23.03702, epsilon = 1e-3);
    }
}
