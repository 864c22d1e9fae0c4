//! `astroreport-io`: reading and writing astrometry files.
//!
//! Parses MPC 80-column records, loads alias indices, walks observation
//! directories, and renders submission headers. The reconciliation itself
//! lives in `astroreport-recon`.

pub mod alias;
pub mod date;
pub mod error;
pub mod header;
pub mod mpc;
pub mod walk;

pub use alias::AliasIndex;
pub use date::parse_date_bound;
pub use error::{IoError, ParseError};
pub use header::make_header;
pub use mpc::{format_line, parse_line, to_submission_line};
pub use walk::{load_corpus, CorpusWalker, LoadedCorpus};
