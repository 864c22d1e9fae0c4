use ordered_float::OrderedFloat;
use serde::Serialize;

use crate::sky::Coordinate;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Exact-equality bucket key for an observation epoch (MJD, UTC).
pub type MjdKey = OrderedFloat<f64>;

/// A single astrometric record, immutable once parsed.
#[derive(Debug, Clone, Serialize)]
pub struct Observation {
    /// Modified Julian Date of the exposure mid-point.
    pub mjd: f64,
    pub coordinate: Coordinate,
    /// Provisional designation. May differ between reporting rounds for the
    /// same physical object.
    pub label: String,
    /// Placeholder record: looked, did not detect.
    pub is_null: bool,
    pub magnitude: Option<f64>,
    pub band: Option<char>,
    pub observatory_code: String,
    /// Source line, verbatim. Empty for records built in memory.
    pub raw_text: String,
    /// `path:line` of the source line, when loaded from disk.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
}

impl Observation {
    /// Build a detection in memory (no source line).
    pub fn new(mjd: f64, label: impl Into<String>, ra_deg: f64, dec_deg: f64) -> Self {
        Self {
            mjd,
            coordinate: Coordinate::new(ra_deg, dec_deg),
            label: label.into(),
            is_null: false,
            magnitude: None,
            band: None,
            observatory_code: String::new(),
            raw_text: String::new(),
            origin: None,
        }
    }

    pub fn null(mut self) -> Self {
        self.is_null = true;
        self
    }

    pub fn with_raw_text(mut self, raw: impl Into<String>) -> Self {
        self.raw_text = raw.into();
        self
    }

    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    pub fn key(&self) -> MjdKey {
        OrderedFloat(self.mjd)
    }

    /// True when both records are the same measurement. Records read from
    /// disk compare by source text (trailing whitespace ignored), so columns
    /// the parser does not model still count. Records built in memory compare
    /// field by field. Origin is never compared: the same line may arrive
    /// from two files.
    pub fn same_content(&self, other: &Observation) -> bool {
        let (text, other_text) = (self.raw_text.trim_end(), other.raw_text.trim_end());
        if !text.is_empty() && !other_text.is_empty() {
            return text == other_text;
        }
        self.mjd == other.mjd
            && self.label == other.label
            && self.coordinate == other.coordinate
            && self.is_null == other.is_null
            && self.magnitude == other.magnitude
            && self.band == other.band
            && self.observatory_code == other.observatory_code
    }

    /// Short human description for log lines.
    pub fn describe(&self) -> String {
        match &self.origin {
            Some(origin) => format!("{} @ MJD {:.6} ({origin})", self.label, self.mjd),
            None => format!("{} @ MJD {:.6}", self.label, self.mjd),
        }
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    /// No previously reported record at this epoch describes it.
    New,
    /// A previously reported record lies within tolerance.
    Duplicate,
    /// Same object per the alias table, materially different position.
    Replacement,
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::New => write!(f, "new"),
            Self::Duplicate => write!(f, "duplicate"),
            Self::Replacement => write!(f, "replacement"),
        }
    }
}

/// Two records coincide in time and position but the alias table says they
/// are different objects. Non-fatal.
#[derive(Debug, Clone, Serialize)]
pub struct IdentityConflict {
    pub mjd: f64,
    pub new_label: String,
    pub existing_label: String,
    pub separation_arcsec: f64,
    pub new_line: String,
    pub existing_line: String,
}

/// The existing record a classification was decided against.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchedCandidate {
    pub label: String,
    pub separation_arcsec: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClassifyOutcome {
    pub classification: Classification,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched: Option<MatchedCandidate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conflict: Option<IdentityConflict>,
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

/// Which classification the report collects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportSelection {
    #[default]
    New,
    Replacement,
}

impl ReportSelection {
    pub fn from_want_replacement(want_replacement: bool) -> Self {
        if want_replacement {
            Self::Replacement
        } else {
            Self::New
        }
    }

    pub fn accepts(&self, classification: Classification) -> bool {
        matches!(
            (self, classification),
            (Self::New, Classification::New) | (Self::Replacement, Classification::Replacement)
        )
    }
}

impl std::fmt::Display for ReportSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::New => write!(f, "new"),
            Self::Replacement => write!(f, "replacement"),
        }
    }
}

/// Open interval of MJD. A missing bound is unbounded on that side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DateRange {
    pub start: Option<f64>,
    pub end: Option<f64>,
}

impl DateRange {
    pub fn new(start: Option<f64>, end: Option<f64>) -> Self {
        Self { start, end }
    }

    /// Strict at both ends: a record exactly on a bound is outside.
    pub fn contains(&self, mjd: f64) -> bool {
        self.start.map_or(true, |s| s < mjd) && self.end.map_or(true, |e| e > mjd)
    }
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub considered: usize,
    pub out_of_range: usize,
    pub new: usize,
    pub duplicate: usize,
    pub replacement: usize,
    pub identity_conflicts: usize,
    pub selected: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportMeta {
    pub engine_version: String,
    pub run_at: String,
    pub tolerance_arcsec: f64,
    pub selection: ReportSelection,
    pub date_range: DateRange,
    pub existing_records: usize,
    pub new_records: usize,
}

/// Result of one reconciliation pass.
#[derive(Debug, Clone, Serialize)]
pub struct AssembledReport {
    pub summary: ReportSummary,
    #[serde(skip)]
    pub selected: Vec<Observation>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportResult {
    pub meta: ReportMeta,
    pub summary: ReportSummary,
    #[serde(skip)]
    pub selected: Vec<Observation>,
}
