use super::helpers::safe_ratio;
use super::messages::{InsightText, MessageTemplates};
use super::patterns::{average_revenue, split_by_procedure_count};
use super::thresholds::*;
use super::types::{BestPatient, Opportunity, OpportunityKind};

/// Mine reactivation, upsell and frequency opportunities among best patients.
/// Each heuristic runs independently and is skipped when nobody qualifies.
pub fn find_optimizations(best: &[BestPatient]) -> Vec<Opportunity> {
    [
        find_reactivation(best),
        find_upsell(best),
        find_frequency_lift(best),
    ]
    .into_iter()
    .flatten()
    .collect()
}

fn opportunity(
    kind: OpportunityKind,
    text: InsightText,
    value: f64,
    confidence: f64,
) -> Opportunity {
    Opportunity {
        kind,
        title: text.title,
        description: text.description,
        action: text.action,
        value,
        confidence,
    }
}

/// Best patients with no visit in the last `DORMANT_AFTER_DAYS` days.
/// Patients without any parsable visit date count as dormant.
pub fn find_reactivation(best: &[BestPatient]) -> Option<Opportunity> {
    let dormant: Vec<&BestPatient> = best
        .iter()
        .filter(|p| p.days_since_last_visit > DORMANT_AFTER_DAYS)
        .collect();
    if dormant.is_empty() {
        return None;
    }

    let dormant_revenue: f64 = dormant.iter().map(|p| p.total_revenue).sum();

    Some(opportunity(
        OpportunityKind::Reactivation,
        MessageTemplates::reactivation(dormant.len(), dormant_revenue),
        dormant_revenue * REACTIVATION_VALUE_RATE,
        REACTIVATION_CONFIDENCE,
    ))
}

/// Single-procedure best patients who could move toward multi-procedure spend.
pub fn find_upsell(best: &[BestPatient]) -> Option<Opportunity> {
    let (multi, single) = split_by_procedure_count(best);
    if multi.is_empty() || single.is_empty() {
        return None;
    }

    let gap = average_revenue(&multi) - average_revenue(&single);
    let value = (gap * single.len() as f64 * UPSELL_VALUE_RATE).max(0.0);

    Some(opportunity(
        OpportunityKind::Upsell,
        MessageTemplates::upsell(single.len(), gap.max(0.0)),
        value,
        UPSELL_CONFIDENCE,
    ))
}

/// Best patients visiting less often than the best-patient mean.
pub fn find_frequency_lift(best: &[BestPatient]) -> Option<Opportunity> {
    if best.is_empty() {
        return None;
    }

    let total_visits: usize = best.iter().map(|p| p.visit_count).sum();
    let mean_visits = safe_ratio(total_visits as f64, best.len() as f64);

    let below: Vec<&BestPatient> = best
        .iter()
        .filter(|p| (p.visit_count as f64) < mean_visits)
        .collect();
    if below.is_empty() {
        return None;
    }

    let missed_revenue: f64 = below
        .iter()
        .map(|p| p.avg_transaction_value * (mean_visits - p.visit_count as f64))
        .sum();

    Some(opportunity(
        OpportunityKind::Frequency,
        MessageTemplates::frequency(below.len(), mean_visits),
        missed_revenue * FREQUENCY_VALUE_RATE,
        FREQUENCY_CONFIDENCE,
    ))
}
