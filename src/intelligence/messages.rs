use super::helpers::{format_currency, format_multiplier};

/// Title / description / action triple for one insight.
pub struct InsightText {
    pub title: String,
    pub description: String,
    pub action: String,
}

/// Message template builder for every insight and playbook line.
/// Percentages are pre-rounded by the caller; dollars and multipliers are
/// formatted here so the UI copy stays consistent.
pub struct MessageTemplates;

impl MessageTemplates {
    // -- Patterns ---------------------------------------------------------

    pub fn concentration(best_count: usize, percent: f64, best_revenue: f64) -> InsightText {
        InsightText {
            title: format!("Top 20% of patients generate {percent:.0}% of revenue"),
            description: format!(
                "Your {} best patients account for {} ({:.0}% of total revenue).",
                best_count,
                format_currency(best_revenue),
                percent,
            ),
            action: "Launch a VIP retention program for your best patients".into(),
        }
    }

    pub fn geographic(zip: &str, patient_count: usize, revenue: f64, percent: f64) -> InsightText {
        InsightText {
            title: format!("ZIP {zip} is your strongest market"),
            description: format!(
                "{} best patients in {} generated {} ({:.0}% of best-patient revenue).",
                patient_count,
                zip,
                format_currency(revenue),
                percent,
            ),
            action: format!("Concentrate local ad spend around {zip}"),
        }
    }

    pub fn behavioral(multiplier: f64, combo_avg: f64, single_avg: f64) -> InsightText {
        InsightText {
            title: format!(
                "Multi-procedure patients are worth {} more",
                format_multiplier(multiplier)
            ),
            description: format!(
                "Patients with multiple procedures average {} versus {} for single-procedure patients.",
                format_currency(combo_avg),
                format_currency(single_avg),
            ),
            action: "Bundle complementary treatments into packages".into(),
        }
    }

    pub fn channel(channel: &str, patient_count: usize, revenue: f64, percent: f64) -> InsightText {
        InsightText {
            title: format!("{channel} brings your highest-value patients"),
            description: format!(
                "{} best patients came from {}, generating {} ({:.0}% of best-patient revenue).",
                patient_count,
                channel,
                format_currency(revenue),
                percent,
            ),
            action: format!("Shift acquisition budget toward {channel}"),
        }
    }

    // -- Opportunities ----------------------------------------------------

    pub fn reactivation(dormant_count: usize, dormant_revenue: f64) -> InsightText {
        InsightText {
            title: format!("{dormant_count} high-value patients haven't visited in 90+ days"),
            description: format!(
                "These patients have spent {} historically but have not returned recently.",
                format_currency(dormant_revenue),
            ),
            action: "Send a personalized win-back offer".into(),
        }
    }

    pub fn upsell(single_count: usize, gap_per_patient: f64) -> InsightText {
        InsightText {
            title: format!("{single_count} best patients use only one procedure"),
            description: format!(
                "Multi-procedure best patients spend {} more on average.",
                format_currency(gap_per_patient),
            ),
            action: "Introduce complementary treatments at the next visit".into(),
        }
    }

    pub fn frequency(below_count: usize, mean_visits: f64) -> InsightText {
        InsightText {
            title: format!("{below_count} best patients visit less often than average"),
            description: format!(
                "Your best patients average {mean_visits:.1} visits; these patients fall below that.",
            ),
            action: "Offer a membership or maintenance plan to raise visit frequency".into(),
        }
    }

    // -- Playbook ---------------------------------------------------------

    pub fn combo_theme(multiplier: f64) -> (String, String) {
        (
            "Treatment bundles".into(),
            format!(
                "Complete your look: combination plans deliver {} the results patients value",
                format_multiplier(multiplier)
            ),
        )
    }

    pub fn procedure_theme(procedure: &str, share: f64) -> (String, String) {
        (
            procedure.to_string(),
            format!(
                "Lead with {procedure}, the treatment behind {share:.0}% of best-patient revenue"
            ),
        )
    }

    pub fn budget_shift(target: &str, amount: f64) -> String {
        format!("Reallocate {} toward {}", format_currency(amount), target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concentration_text_uses_rounded_percent_and_currency() {
        let text = MessageTemplates::concentration(3, 62.0, 45210.4);
        assert_eq!(text.title, "Top 20% of patients generate 62% of revenue");
        assert!(text.description.contains("$45,210"));
        assert!(text.description.contains("3 best patients"));
    }

    #[test]
    fn behavioral_text_formats_multiplier() {
        let text = MessageTemplates::behavioral(2.349, 4698.0, 2000.0);
        assert_eq!(text.title, "Multi-procedure patients are worth 2.3x more");
        assert!(text.description.contains("$4,698"));
        assert!(text.description.contains("$2,000"));
    }

    #[test]
    fn geographic_and_channel_name_their_key() {
        let geo = MessageTemplates::geographic("10001", 4, 12000.0, 40.0);
        assert!(geo.title.contains("10001"));
        assert!(geo.action.contains("10001"));

        let channel = MessageTemplates::channel("Instagram", 2, 5000.0, 25.0);
        assert!(channel.title.starts_with("Instagram"));
        assert!(channel.description.contains("25%"));
    }

    #[test]
    fn budget_shift_line() {
        assert_eq!(
            MessageTemplates::budget_shift("Instagram", 1500.0),
            "Reallocate $1,500 toward Instagram"
        );
    }
}
