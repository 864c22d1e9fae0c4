use astroreport_io::IoError;
use astroreport_recon::ReconError;

use crate::exit_codes::{EXIT_CONFIG, EXIT_CONFLICT, EXIT_ERROR, EXIT_IO, EXIT_USAGE};

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn usage(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_IO, message: msg.into(), hint: None }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self { code: EXIT_CONFIG, message: msg.into(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<ReconError> for CliError {
    fn from(err: ReconError) -> Self {
        match err {
            ReconError::Conflict { .. } => Self {
                code: EXIT_CONFLICT,
                message: err.to_string(),
                hint: Some("fix or remove one of the two lines, then rerun".into()),
            },
            ReconError::ConfigParse(_) | ReconError::ConfigValidation(_) => {
                Self::config(err.to_string())
            }
        }
    }
}

impl From<IoError> for CliError {
    fn from(err: IoError) -> Self {
        let code = match err {
            IoError::Pattern { .. } | IoError::DateBound(_) => EXIT_USAGE,
            IoError::Read { .. } | IoError::NotADirectory { .. } | IoError::Walk { .. } => EXIT_IO,
            IoError::Format { .. } => EXIT_ERROR,
        };
        Self { code, message: err.to_string(), hint: None }
    }
}
