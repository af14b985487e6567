use super::helpers::{percent_of, safe_ratio};
use super::messages::MessageTemplates;
use super::patterns::combo_multiplier;
use super::procedures::analyze_procedures;
use super::rollup::rollup_best_by;
use super::thresholds::*;
use super::types::{
    BestPatient, BudgetShift, ChannelAllocation, MessagingTheme, PatternInsight, PatternKind,
    Playbook, TargetAudience, TimingGuidance,
};

/// Build the campaign playbook from the best-patient set and mined patterns.
pub fn generate_playbook(best: &[BestPatient], patterns: &[PatternInsight]) -> Playbook {
    let procedures = analyze_procedures(best);

    let target_audience = TargetAudience {
        avg_lifetime_value: safe_ratio(
            best.iter().map(|p| p.total_revenue).sum(),
            best.len() as f64,
        ),
        avg_visits_per_year: safe_ratio(
            best.iter().map(visits_per_year).sum(),
            best.len() as f64,
        ),
        top_procedures: procedures
            .iter()
            .take(AUDIENCE_TOP_PROCEDURES)
            .cloned()
            .collect(),
    };

    let mut messaging: Vec<MessagingTheme> = Vec::new();
    if patterns.iter().any(|p| p.kind == PatternKind::Behavioral) {
        let (theme, message) = MessageTemplates::combo_theme(combo_multiplier(best).unwrap_or(0.0));
        messaging.push(MessagingTheme { theme, message });
    }
    for procedure in procedures.iter().take(MESSAGING_TOP_PROCEDURES) {
        let (theme, message) = MessageTemplates::procedure_theme(&procedure.procedure, procedure.share);
        messaging.push(MessagingTheme { theme, message });
    }

    Playbook {
        target_audience,
        channels: channel_allocation(best),
        messaging,
        timing: TimingGuidance {
            booking_lead_time: BOOKING_LEAD_TIME.into(),
            reengagement_window: REENGAGEMENT_WINDOW.into(),
            peak_quarters: PEAK_QUARTERS.iter().map(|q| q.to_string()).collect(),
        },
        budget: budget_shifts(best, patterns),
    }
}

/// Split of channel-attributed best-patient revenue, rounded percentages.
pub fn channel_allocation(best: &[BestPatient]) -> Vec<ChannelAllocation> {
    let channels = rollup_best_by(best, |p| p.acquisition_channel.as_deref());
    let attributed: f64 = channels.iter().map(|c| c.revenue).sum();

    channels
        .into_iter()
        .map(|c| ChannelAllocation {
            percentage: percent_of(c.revenue, attributed),
            channel: c.key,
            revenue: c.revenue,
        })
        .collect()
}

/// `BUDGET_SHIFT_RATE` of each channel / geographic pattern value.
fn budget_shifts(best: &[BestPatient], patterns: &[PatternInsight]) -> Vec<BudgetShift> {
    let top_zip = rollup_best_by(best, |p| Some(p.zip.as_str()))
        .into_iter()
        .next()
        .map(|z| format!("ZIP {}", z.key));
    let top_channel = rollup_best_by(best, |p| p.acquisition_channel.as_deref())
        .into_iter()
        .next()
        .map(|c| c.key);

    patterns
        .iter()
        .filter_map(|pattern| {
            let target = match pattern.kind {
                PatternKind::Geographic => top_zip.as_deref()?,
                PatternKind::Channel => top_channel.as_deref()?,
                PatternKind::Concentration | PatternKind::Behavioral => return None,
            };
            let amount = pattern.value * BUDGET_SHIFT_RATE;
            Some(BudgetShift {
                source: pattern.kind,
                recommendation: MessageTemplates::budget_shift(target, amount),
                amount,
            })
        })
        .collect()
}

/// Visits per year of activity; spans under a year count as one year.
fn visits_per_year(patient: &BestPatient) -> f64 {
    let years = match (patient.first_visit, patient.last_visit) {
        (Some(first), Some(last)) => ((last - first).num_days() as f64 / DAYS_PER_YEAR).max(1.0),
        _ => 1.0,
    };
    patient.visit_count as f64 / years
}
