use std::path::PathBuf;

use thiserror::Error;

/// A line that does not follow the 80-column record grammar.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("line too short for an astrometric record ({len} columns, need at least 56)")]
    TooShort { len: usize },
    #[error("line contains non-ASCII text")]
    NonAscii,
    #[error("missing provisional designation")]
    MissingDesignation,
    #[error("bad observation date '{0}'")]
    Date(String),
    #[error("bad right ascension '{0}'")]
    RightAscension(String),
    #[error("bad declination '{0}'")]
    Declination(String),
}

#[derive(Debug, Error)]
pub enum IoError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path} is not a directory")]
    NotADirectory { path: PathBuf },
    #[error("cannot walk {path}: {message}")]
    Walk { path: PathBuf, message: String },
    #[error("bad file name pattern '{pattern}': {message}")]
    Pattern { pattern: String, message: String },
    #[error("cannot parse date '{0}' (expected YYYY-MM-DD, YYYY-MM-DDTHH:MM:SS, 'YYYY MM DD.ddddd' or an MJD)")]
    DateBound(String),
    #[error("cannot format {label}: {message}")]
    Format { label: String, message: String },
}
