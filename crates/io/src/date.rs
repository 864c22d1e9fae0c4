//! Calendar <-> MJD conversions and date-bound parsing.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};

use crate::error::IoError;

const MICRODAYS_PER_DAY: i64 = 1_000_000;

/// MJD 0.0 = 1858-11-17T00:00.
pub const MJD_EPOCH: NaiveDate = match NaiveDate::from_ymd_opt(1858, 11, 17) {
    Some(date) => date,
    None => panic!("1858-11-17 is a valid calendar date"),
};

pub fn date_to_mjd(date: NaiveDate) -> f64 {
    (date - MJD_EPOCH).num_days() as f64
}

pub fn datetime_to_mjd(dt: NaiveDateTime) -> f64 {
    let seconds = dt.num_seconds_from_midnight() as f64 + dt.nanosecond() as f64 * 1e-9;
    date_to_mjd(dt.date()) + seconds / 86_400.0
}

/// Parse an MPC date field `YYYY MM DD.dddddd`.
///
/// The day fraction is read from its decimal digits so identical text always
/// yields an identical MJD.
pub fn parse_mpc_date(field: &str) -> Option<f64> {
    let mut parts = field.split_whitespace();
    let year: i32 = parts.next()?.parse().ok()?;
    let month: u32 = parts.next()?.parse().ok()?;
    let day_text = parts.next()?;
    if parts.next().is_some() {
        return None;
    }

    let (day_int, frac_digits) = match day_text.split_once('.') {
        Some((d, f)) => (d, f),
        None => (day_text, ""),
    };
    let day: u32 = day_int.parse().ok()?;
    let date = NaiveDate::from_ymd_opt(year, month, day)?;

    let fraction = if frac_digits.is_empty() {
        0.0
    } else {
        if !frac_digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        format!("0.{frac_digits}").parse::<f64>().ok()?
    };

    Some(date_to_mjd(date) + fraction)
}

/// Format an MJD as an MPC date field, rounded to 1e-6 day.
pub fn format_mpc_date(mjd: f64) -> Option<String> {
    let micro = (mjd * MICRODAYS_PER_DAY as f64).round() as i64;
    let days = micro.div_euclid(MICRODAYS_PER_DAY);
    let frac = micro.rem_euclid(MICRODAYS_PER_DAY);
    let date = MJD_EPOCH.checked_add_signed(chrono::TimeDelta::try_days(days)?)?;
    Some(format!(
        "{:04} {:02} {:02}.{:06}",
        date.year(),
        date.month(),
        date.day(),
        frac
    ))
}

/// Parse a `--start-date`/`--end-date` bound into MJD (UTC).
pub fn parse_date_bound(input: &str) -> Result<f64, IoError> {
    let s = input.trim();
    let err = || IoError::DateBound(input.to_string());

    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(datetime_to_mjd(dt));
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date_to_mjd(date));
    }
    if s.split_whitespace().count() == 3 {
        return parse_mpc_date(s).ok_or_else(err);
    }
    match s.parse::<f64>() {
        Ok(mjd) if mjd.is_finite() => Ok(mjd),
        _ => Err(err()),
    }
}
