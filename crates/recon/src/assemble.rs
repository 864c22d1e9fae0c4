use crate::classify::classify;
use crate::config::ToleranceConfig;
use crate::evidence::SummaryBuilder;
use crate::identity::IdentityResolver;
use crate::index::ObservationIndex;
use crate::model::{AssembledReport, Classification, DateRange, Observation, ReportSelection};

/// Filters that decide which classified records reach the report.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportCriteria {
    pub date_range: DateRange,
    pub tolerance: ToleranceConfig,
    pub selection: ReportSelection,
}

/// Select the records worth submitting.
///
/// Each record inside the (strict) date range is classified against
/// `existing`; it is kept when its classification is the one `selection`
/// asks for. Duplicates are never kept. Output preserves input order.
pub fn assemble<'a, I, R>(
    new_records: I,
    existing: &ObservationIndex,
    resolver: &R,
    criteria: &ReportCriteria,
) -> AssembledReport
where
    I: IntoIterator<Item = &'a Observation>,
    R: IdentityResolver + ?Sized,
{
    let mut summary = SummaryBuilder::default();
    let mut selected = Vec::new();

    for record in new_records {
        summary.considered();

        if !criteria.date_range.contains(record.mjd) {
            summary.out_of_range();
            tracing::debug!(record = %record.describe(), "outside date range");
            continue;
        }

        let outcome = classify(record, existing, resolver, &criteria.tolerance);
        summary.classified(outcome.classification);

        if let Some(conflict) = &outcome.conflict {
            summary.identity_conflict();
            tracing::warn!(
                new_label = %conflict.new_label,
                existing_label = %conflict.existing_label,
                mjd = conflict.mjd,
                separation_arcsec = conflict.separation_arcsec,
                "duplicate position carries a different provisional name on the same date"
            );
            tracing::warn!("  new:      {}", conflict.new_line);
            tracing::warn!("  existing: {}", conflict.existing_line);
        }

        match (&outcome.classification, &outcome.matched) {
            (Classification::Duplicate, Some(m)) => tracing::debug!(
                record = %record.describe(),
                matches = %m.label,
                separation_arcsec = m.separation_arcsec,
                "suppressing previously reported measurement"
            ),
            (Classification::Replacement, Some(m)) => tracing::debug!(
                record = %record.describe(),
                replaces = %m.label,
                separation_arcsec = m.separation_arcsec,
                "replacement candidate"
            ),
            _ => {}
        }

        if criteria.selection.accepts(outcome.classification) {
            tracing::info!(
                "adding {} on MJD {:.6} to report ({})",
                record.label,
                record.mjd,
                outcome.classification
            );
            selected.push(record.clone());
        } else if outcome.classification != Classification::Duplicate {
            tracing::debug!(
                record = %record.describe(),
                classification = %outcome.classification,
                wanted = %criteria.selection,
                "not selected"
            );
        }
    }

    summary.selected(selected.len());
    AssembledReport {
        summary: summary.finish(),
        selected,
    }
}
