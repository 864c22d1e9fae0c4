//! MPC 80-column optical astrometry records.
//!
//! Column layout (0-based, end-exclusive):
//!
//! | Columns  | Field                                  |
//! |----------|----------------------------------------|
//! | 0..5     | packed number (`-`/`!` in 0 = null)    |
//! | 5..12    | provisional designation                |
//! | 12       | discovery asterisk                     |
//! | 13, 14   | notes (14 = observation type)          |
//! | 15..32   | date `YYYY MM DD.dddddd` (UTC)         |
//! | 32..44   | RA `HH MM SS.sss`                      |
//! | 44..56   | Dec `sDD MM SS.ss`                     |
//! | 65..70   | magnitude                              |
//! | 70       | band                                   |
//! | 77..80   | observatory code                       |
//!
//! Anything after column 80 is carried in `raw_text` untouched.

use astroreport_recon::model::Observation;

use crate::date::{format_mpc_date, parse_mpc_date};
use crate::error::{IoError, ParseError};

pub const RECORD_WIDTH: usize = 80;
const MIN_RECORD_WIDTH: usize = 56;
const NULL_MARKERS: [char; 2] = ['-', '!'];
const MAX_DESIGNATION_WIDTH: usize = 7;

/// Parse one line. Blank lines and `#` comments yield `Ok(None)`.
pub fn parse_line(line: &str) -> Result<Option<Observation>, ParseError> {
    let line = line.trim_end_matches(['\n', '\r']);
    if line.trim().is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    if !line.is_ascii() {
        return Err(ParseError::NonAscii);
    }
    if line.len() < MIN_RECORD_WIDTH {
        return Err(ParseError::TooShort { len: line.len() });
    }

    let is_null = line.starts_with(NULL_MARKERS);
    let number = if is_null { &line[1..5] } else { &line[0..5] };
    let designation = field(line, 5, 12).trim();
    let label = if designation.is_empty() {
        number.trim()
    } else {
        designation
    };
    if label.is_empty() {
        return Err(ParseError::MissingDesignation);
    }

    let date_text = field(line, 15, 32);
    let mjd = parse_mpc_date(date_text).ok_or_else(|| ParseError::Date(date_text.trim().into()))?;

    let ra_text = field(line, 32, 44);
    let ra_deg =
        parse_ra(ra_text).ok_or_else(|| ParseError::RightAscension(ra_text.trim().into()))?;

    let dec_text = field(line, 44, 56);
    let dec_deg =
        parse_dec(dec_text).ok_or_else(|| ParseError::Declination(dec_text.trim().into()))?;

    let magnitude = field(line, 65, 70)
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|m| m.is_finite());
    let band = field(line, 70, 71).chars().next().filter(|c| !c.is_whitespace());
    let observatory_code = field(line, 77, 80).trim().to_string();

    let mut obs = Observation::new(mjd, label, ra_deg, dec_deg).with_raw_text(line);
    obs.is_null = is_null;
    obs.magnitude = magnitude;
    obs.band = band;
    obs.observatory_code = observatory_code;
    Ok(Some(obs))
}

/// Line for the submission file: the source line verbatim when there is one,
/// otherwise a freshly formatted record.
pub fn to_submission_line(obs: &Observation) -> Result<String, IoError> {
    if obs.raw_text.is_empty() {
        format_line(obs)
    } else {
        Ok(obs.raw_text.trim_end_matches(['\n', '\r']).to_string())
    }
}

/// Build an 80-column record from parsed fields.
pub fn format_line(obs: &Observation) -> Result<String, IoError> {
    let format_err = |message: &str| IoError::Format {
        label: obs.label.clone(),
        message: message.to_string(),
    };

    if obs.label.is_empty() || obs.label.len() > MAX_DESIGNATION_WIDTH || !obs.label.is_ascii() {
        return Err(format_err("designation must be 1-7 ASCII characters"));
    }
    let date = format_mpc_date(obs.mjd).ok_or_else(|| format_err("date out of range"))?;
    if !(-90.0..=90.0).contains(&obs.coordinate.dec_deg) {
        return Err(format_err("declination out of range"));
    }

    let number = if obs.is_null { "-    " } else { "     " };
    let magnitude = match obs.magnitude {
        Some(m) => {
            let text = format!("{m:>5.2}");
            if text.len() != 5 {
                return Err(format_err("magnitude does not fit in 5 columns"));
            }
            text
        }
        None => " ".repeat(5),
    };
    let band = obs.band.unwrap_or(' ');

    let line = format!(
        "{number}{label:<7}  C{date}{ra}{dec}{blank9}{magnitude}{band}{blank6}{code:>3}",
        label = obs.label,
        ra = format_ra(obs.coordinate.ra_deg),
        dec = format_dec(obs.coordinate.dec_deg),
        blank9 = " ".repeat(9),
        blank6 = " ".repeat(6),
        code = obs.observatory_code,
    );
    if line.len() != RECORD_WIDTH {
        return Err(format_err("record does not fit in 80 columns"));
    }
    Ok(line)
}

// ---------------------------------------------------------------------------
// Fields
// ---------------------------------------------------------------------------

/// Column slice; columns past the end of a short line read as blank.
fn field(line: &str, start: usize, end: usize) -> &str {
    let end = end.min(line.len());
    if start >= end {
        return "";
    }
    &line[start..end]
}

/// `HH MM SS.sss` (or `HH MM.mmm`) -> degrees.
fn parse_ra(text: &str) -> Option<f64> {
    let parts: Vec<f64> = text
        .split_whitespace()
        .map(|p| p.parse::<f64>().ok())
        .collect::<Option<_>>()?;
    let hours = match parts.as_slice() {
        [h, m, s] if (0.0..60.0).contains(m) && (0.0..60.0).contains(s) => h + m / 60.0 + s / 3600.0,
        [h, m] if (0.0..60.0).contains(m) => h + m / 60.0,
        _ => return None,
    };
    (0.0..24.0).contains(&hours).then_some(hours * 15.0)
}

/// `sDD MM SS.ss` (or `sDD MM.mm`) -> degrees. The sign applies to the whole
/// value, so `-00 30 00.0` is negative.
fn parse_dec(text: &str) -> Option<f64> {
    let text = text.trim();
    let (sign, rest) = match text.as_bytes().first()? {
        b'-' => (-1.0, &text[1..]),
        b'+' => (1.0, &text[1..]),
        _ => (1.0, text),
    };
    let parts: Vec<f64> = rest
        .split_whitespace()
        .map(|p| p.parse::<f64>().ok())
        .collect::<Option<_>>()?;
    let degrees = match parts.as_slice() {
        [d, m, s] if *d >= 0.0 && (0.0..60.0).contains(m) && (0.0..60.0).contains(s) => {
            d + m / 60.0 + s / 3600.0
        }
        [d, m] if *d >= 0.0 && (0.0..60.0).contains(m) => d + m / 60.0,
        _ => return None,
    };
    (degrees <= 90.0).then_some(sign * degrees)
}

fn format_ra(ra_deg: f64) -> String {
    const MS_PER_DAY: i64 = 86_400_000;
    let ms = ((ra_deg / 15.0) * 3_600_000.0).round() as i64;
    let ms = ms.rem_euclid(MS_PER_DAY);
    let (h, m, s, frac) = (ms / 3_600_000, (ms / 60_000) % 60, (ms / 1000) % 60, ms % 1000);
    format!("{h:02} {m:02} {s:02}.{frac:03}")
}

fn format_dec(dec_deg: f64) -> String {
    let sign = if dec_deg < 0.0 { '-' } else { '+' };
    let cs = (dec_deg.abs() * 360_000.0).round() as i64;
    let (d, m, s, frac) = (cs / 360_000, (cs / 6000) % 60, (cs / 100) % 60, cs % 100);
    format!("{sign}{d:02} {m:02} {s:02}.{frac:02}")
}
