//! `astroreport-recon`: reconciles previously reported and newly measured
//! astrometry into a submission set.
//!
//! Pure engine crate: receives pre-loaded records, returns classified results.
//! No CLI or IO dependencies.

pub mod assemble;
pub mod classify;
pub mod config;
pub mod engine;
pub mod error;
pub mod evidence;
pub mod identity;
pub mod index;
pub mod model;
pub mod sky;

pub use assemble::{assemble, ReportCriteria};
pub use classify::classify;
pub use config::{HeaderConfig, ReportConfig, ToleranceConfig};
pub use engine::{run, ReconInput};
pub use error::ReconError;
pub use identity::{ExactLabel, IdentityResolver};
pub use index::ObservationIndex;
pub use model::{
    AssembledReport, Classification, ClassifyOutcome, DateRange, Observation, ReportResult,
    ReportSelection, ReportSummary,
};
pub use sky::Coordinate;
