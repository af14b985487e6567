use super::helpers::{percent_of, safe_ratio};
use super::messages::{InsightText, MessageTemplates};
use super::rollup::rollup_best_by;
use super::thresholds::*;
use super::types::{BestPatient, PatientRecord, PatternInsight, PatternKind};

/// Mine the four fixed patterns. Each emits at most one insight.
pub fn discover_patterns(best: &[BestPatient], records: &[PatientRecord]) -> Vec<PatternInsight> {
    [
        detect_concentration(best, records),
        detect_geographic(best),
        detect_behavioral(best),
        detect_channel(best),
    ]
    .into_iter()
    .flatten()
    .collect()
}

fn insight(kind: PatternKind, text: InsightText, value: f64, confidence: f64) -> PatternInsight {
    PatternInsight {
        kind,
        title: text.title,
        description: text.description,
        action: text.action,
        value,
        confidence,
    }
}

/// Share of total revenue held by the best patients.
pub fn detect_concentration(
    best: &[BestPatient],
    records: &[PatientRecord],
) -> Option<PatternInsight> {
    if best.is_empty() {
        return None;
    }
    let best_revenue: f64 = best.iter().map(|p| p.total_revenue).sum();
    let total_revenue: f64 = records.iter().map(|r| r.revenue).sum();
    let percent = percent_of(best_revenue, total_revenue);

    Some(insight(
        PatternKind::Concentration,
        MessageTemplates::concentration(best.len(), percent, best_revenue),
        best_revenue * CONCENTRATION_VALUE_RATE,
        CONCENTRATION_CONFIDENCE,
    ))
}

/// Highest-revenue ZIP among best patients.
pub fn detect_geographic(best: &[BestPatient]) -> Option<PatternInsight> {
    let zips = rollup_best_by(best, |p| Some(p.zip.as_str()));
    let top = zips.first()?;
    let best_revenue: f64 = best.iter().map(|p| p.total_revenue).sum();

    Some(insight(
        PatternKind::Geographic,
        MessageTemplates::geographic(
            &top.key,
            top.patient_count,
            top.revenue,
            percent_of(top.revenue, best_revenue),
        ),
        top.revenue * GEOGRAPHIC_VALUE_RATE,
        GEOGRAPHIC_CONFIDENCE,
    ))
}

/// Average revenue of multi-procedure vs single-procedure best patients.
pub fn detect_behavioral(best: &[BestPatient]) -> Option<PatternInsight> {
    let (combo, single) = split_by_procedure_count(best);
    if combo.is_empty() || single.is_empty() {
        return None;
    }

    let combo_avg = average_revenue(&combo);
    let single_avg = average_revenue(&single);
    let multiplier = safe_ratio(combo_avg, single_avg);
    let value = (single.len() as f64 * (combo_avg - single_avg) * BEHAVIORAL_VALUE_RATE).max(0.0);

    Some(insight(
        PatternKind::Behavioral,
        MessageTemplates::behavioral(multiplier, combo_avg, single_avg),
        value,
        BEHAVIORAL_CONFIDENCE,
    ))
}

/// Highest-revenue acquisition channel among best patients.
pub fn detect_channel(best: &[BestPatient]) -> Option<PatternInsight> {
    let channels = rollup_best_by(best, |p| p.acquisition_channel.as_deref());
    let top = channels.first()?;
    let best_revenue: f64 = best.iter().map(|p| p.total_revenue).sum();

    Some(insight(
        PatternKind::Channel,
        MessageTemplates::channel(
            &top.key,
            top.patient_count,
            top.revenue,
            percent_of(top.revenue, best_revenue),
        ),
        top.revenue * CHANNEL_VALUE_RATE,
        CHANNEL_CONFIDENCE,
    ))
}

/// Behavioral multiplier as reported in the pattern title, if the pattern applies.
pub fn combo_multiplier(best: &[BestPatient]) -> Option<f64> {
    let (combo, single) = split_by_procedure_count(best);
    if combo.is_empty() || single.is_empty() {
        return None;
    }
    Some(safe_ratio(average_revenue(&combo), average_revenue(&single)))
}

/// (multi-procedure, single-procedure) best patients.
pub(crate) fn split_by_procedure_count(
    best: &[BestPatient],
) -> (Vec<&BestPatient>, Vec<&BestPatient>) {
    let combo = best.iter().filter(|p| p.is_multi_procedure()).collect();
    let single = best.iter().filter(|p| p.is_single_procedure()).collect();
    (combo, single)
}

pub(crate) fn average_revenue(patients: &[&BestPatient]) -> f64 {
    let total: f64 = patients.iter().map(|p| p.total_revenue).sum();
    safe_ratio(total, patients.len() as f64)
}
