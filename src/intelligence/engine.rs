use std::borrow::Cow;
use std::time::Instant;

use chrono::{NaiveDateTime, Utc};

use super::expansion::find_expansion;
use super::opportunities::find_optimizations;
use super::patterns::discover_patterns;
use super::playbook::generate_playbook;
use super::rollup::find_best_patients;
use super::summary::generate_summary;
use super::types::{PatientIntelResult, PatientRecord};

/// Filter value meaning "every procedure".
pub const ALL_PROCEDURES: &str = "all";

/// Patient intelligence engine.
/// Runs rollup, pattern mining, opportunity mining, expansion and playbook
/// synthesis as one straight-line pass. Holds only the reference clock, so a
/// fixed `now` makes every result reproducible.
#[derive(Debug, Clone, Copy)]
pub struct PatientIntelligenceEngine {
    now: NaiveDateTime,
}

impl PatientIntelligenceEngine {
    pub fn new(now: NaiveDateTime) -> Self {
        Self { now }
    }

    /// Engine pinned to the current UTC wall clock.
    pub fn at_current_time() -> Self {
        Self::new(Utc::now().naive_utc())
    }

    pub fn now(&self) -> NaiveDateTime {
        self.now
    }

    /// Analyse `records`, optionally restricted to one procedure.
    ///
    /// Never fails: empty or degenerate input yields zeroed summaries and
    /// empty collections.
    pub fn analyze(
        &self,
        records: &[PatientRecord],
        procedure_filter: Option<&str>,
    ) -> PatientIntelResult {
        let start = Instant::now();
        let records = apply_procedure_filter(records, procedure_filter);

        let best_patients = find_best_patients(&records, self.now);
        let patterns = discover_patterns(&best_patients, &records);
        let opportunities = find_optimizations(&best_patients);
        let expansion = find_expansion(&best_patients, &records);
        let playbook = generate_playbook(&best_patients, &patterns);
        let summary = generate_summary(&best_patients, &records);

        tracing::info!(
            records = records.len(),
            patients = summary.total_patients,
            best_patients = best_patients.len(),
            patterns = patterns.len(),
            opportunities = opportunities.len(),
            untapped_zips = expansion.untapped_zips.len(),
            filter = procedure_filter.unwrap_or(ALL_PROCEDURES),
            processing_ms = start.elapsed().as_millis() as u64,
            "Patient intelligence analysis complete"
        );

        PatientIntelResult {
            summary,
            best_patients,
            patterns,
            opportunities,
            expansion,
            playbook,
            procedure_filter: active_filter(procedure_filter).map(str::to_string),
            analyzed_at: self.now,
        }
    }
}

/// Analyse records against the current wall clock.
pub fn analyze_patient_data(
    records: &[PatientRecord],
    procedure_filter: Option<&str>,
) -> PatientIntelResult {
    PatientIntelligenceEngine::at_current_time().analyze(records, procedure_filter)
}

/// Keep only records whose procedure equals the filter exactly.
/// `None`, blank and `"all"` keep everything.
pub fn apply_procedure_filter<'a>(
    records: &'a [PatientRecord],
    procedure_filter: Option<&str>,
) -> Cow<'a, [PatientRecord]> {
    match active_filter(procedure_filter) {
        Some(procedure) => Cow::Owned(
            records
                .iter()
                .filter(|r| r.procedure == procedure)
                .cloned()
                .collect(),
        ),
        None => Cow::Borrowed(records),
    }
}

/// Blank filters behave like `"all"`.
fn active_filter(procedure_filter: Option<&str>) -> Option<&str> {
    procedure_filter.filter(|f| !f.trim().is_empty() && *f != ALL_PROCEDURES)
}
