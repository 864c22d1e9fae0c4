use crate::model::{Classification, ReportSummary};

/// Running tally behind a [`ReportSummary`].
#[derive(Debug, Default)]
pub struct SummaryBuilder {
    summary: ReportSummary,
}

impl SummaryBuilder {
    pub fn considered(&mut self) {
        self.summary.considered += 1;
    }

    pub fn out_of_range(&mut self) {
        self.summary.out_of_range += 1;
    }

    pub fn classified(&mut self, classification: Classification) {
        match classification {
            Classification::New => self.summary.new += 1,
            Classification::Duplicate => self.summary.duplicate += 1,
            Classification::Replacement => self.summary.replacement += 1,
        }
    }

    pub fn identity_conflict(&mut self) {
        self.summary.identity_conflicts += 1;
    }

    pub fn selected(&mut self, count: usize) {
        self.summary.selected = count;
    }

    pub fn finish(self) -> ReportSummary {
        self.summary
    }
}

impl ReportSummary {
    /// One-line human summary.
    pub fn headline(&self) -> String {
        format!(
            "{} considered ({} outside date range): {} new, {} duplicate, {} replacement, {} identity conflicts; {} selected",
            self.considered,
            self.out_of_range,
            self.new,
            self.duplicate,
            self.replacement,
            self.identity_conflicts,
            self.selected,
        )
    }
}
