use crate::assemble::{assemble, ReportCriteria};
use crate::error::ReconError;
use crate::identity::IdentityResolver;
use crate::index::ObservationIndex;
use crate::model::{Observation, ReportMeta, ReportResult};

/// Pre-loaded records for one run.
pub struct ReconInput {
    /// Previously reported astrometry.
    pub existing: Vec<Observation>,
    /// Newly measured astrometry.
    pub new: Vec<Observation>,
}

/// Run one reconciliation pass.
///
/// Both indices are fully built before any record is classified; a
/// conflicting pair in either corpus aborts the run before anything is
/// selected.
pub fn run<R>(
    input: ReconInput,
    resolver: &R,
    criteria: &ReportCriteria,
) -> Result<ReportResult, ReconError>
where
    R: IdentityResolver + ?Sized,
{
    let existing = ObservationIndex::from_observations(input.existing)?;
    tracing::info!(
        "loaded {} existing observations over {} epochs",
        existing.len(),
        existing.epoch_count()
    );

    let new = ObservationIndex::from_observations(input.new)?;
    tracing::info!(
        "loaded {} new observations over {} epochs",
        new.len(),
        new.epoch_count()
    );

    let report = assemble(new.iter(), &existing, resolver, criteria);

    Ok(ReportResult {
        meta: ReportMeta {
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
            tolerance_arcsec: criteria.tolerance.arcsec,
            selection: criteria.selection,
            date_range: criteria.date_range,
            existing_records: existing.len(),
            new_records: new.len(),
        },
        summary: report.summary,
        selected: report.selected,
    })
}
