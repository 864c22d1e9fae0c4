//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract: pipeline scripts branch on them.
//!
//! | Code | Meaning                                                    |
//! |------|------------------------------------------------------------|
//! | 0    | Success, including a run that selected nothing             |
//! | 1    | General error (unspecified)                                |
//! | 2    | Usage error (bad regex, date bound or tolerance on the CLI) |
//! | 3    | Conflicting observations in a corpus                       |
//! | 4    | I/O failure (unreadable file, missing directory, write)    |
//! | 5    | Invalid config file                                        |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Map the error to it in `error.rs`

/// Success - report written, or nothing to report.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments.
pub const EXIT_USAGE: u8 = 2;

/// Two records share an epoch and designation but disagree.
/// No report is written.
pub const EXIT_CONFLICT: u8 = 3;

/// Filesystem failure reading inputs or writing the report.
pub const EXIT_IO: u8 = 4;

/// Config file could not be parsed or failed validation.
pub const EXIT_CONFIG: u8 = 5;
