use std::collections::HashSet;

use super::helpers::safe_ratio;
use super::rollup::rollup_best_by;
use super::thresholds::*;
use super::types::{BestPatient, Cohort, ExpansionBlock, PatientRecord, TargetZip};

/// Project growth from the strongest best-patient ZIPs.
///
/// `total_opportunity` is `untapped_zips * ASSUMED_PATIENTS_PER_ZIP * avg best-patient revenue`,
/// a fixed placeholder estimate the UI copy relies on.
pub fn find_expansion(best: &[BestPatient], records: &[PatientRecord]) -> ExpansionBlock {
    let target_zips: Vec<TargetZip> = rollup_best_by(best, |p| Some(p.zip.as_str()))
        .into_iter()
        .take(TARGET_ZIP_LIMIT)
        .map(|zip| {
            let avg_value = safe_ratio(zip.revenue, zip.patient_count as f64);
            TargetZip {
                cohort: Cohort::from_avg_value(avg_value),
                match_score: match_score(zip.patient_count),
                zip: zip.key,
                patient_count: zip.patient_count,
                revenue: zip.revenue,
                avg_value,
            }
        })
        .collect();

    let known: HashSet<&str> = records.iter().map(|r| r.patient_zip.trim()).collect();
    let mut untapped_zips: Vec<String> = Vec::new();
    for target in &target_zips {
        for candidate in adjacent_zips(&target.zip) {
            if !known.contains(candidate.as_str()) && !untapped_zips.contains(&candidate) {
                untapped_zips.push(candidate);
            }
        }
    }

    let best_revenue: f64 = best.iter().map(|p| p.total_revenue).sum();
    let avg_best_value = safe_ratio(best_revenue, best.len() as f64);
    let projected_new_patients = untapped_zips.len() * ASSUMED_PATIENTS_PER_ZIP;

    ExpansionBlock {
        target_zips,
        total_opportunity: projected_new_patients as f64 * avg_best_value,
        projected_new_patients,
        untapped_zips,
    }
}

/// `min(MATCH_SCORE_CAP, MATCH_SCORE_BASE + patients * MATCH_SCORE_PER_PATIENT)`.
pub fn match_score(patient_count: usize) -> u32 {
    let bonus = u32::try_from(patient_count)
        .unwrap_or(u32::MAX)
        .saturating_mul(MATCH_SCORE_PER_PATIENT);
    MATCH_SCORE_BASE.saturating_add(bonus).min(MATCH_SCORE_CAP)
}

/// Numeric neighbours (ZIP-1, ZIP+1) of a 5-digit ZIP, zero-padded.
///
/// Numeric adjacency is a stand-in; neighbouring ZIP numbers are not
/// necessarily neighbouring areas. Non-numeric ZIPs yield nothing.
pub fn adjacent_zips(zip: &str) -> Vec<String> {
    let Ok(value) = zip.trim().parse::<u32>() else {
        return Vec::new();
    };
    if value > MAX_ZIP {
        return Vec::new();
    }

    [value.checked_sub(1), value.checked_add(1)]
        .into_iter()
        .flatten()
        .filter(|v| *v <= MAX_ZIP)
        .map(|v| format!("{v:05}"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intelligence::thresholds::NO_VISIT_DAYS;

    fn patient(id: &str, zip: &str, revenue: f64) -> BestPatient {
        BestPatient {
            patient_id: id.into(),
            total_revenue: revenue,
            visit_count: 1,
            procedures: vec!["Botox".into()],
            first_visit: None,
            last_visit: None,
            zip: zip.into(),
            acquisition_channel: None,
            avg_transaction_value: revenue,
            days_since_last_visit: NO_VISIT_DAYS,
        }
    }

    fn record(zip: &str) -> PatientRecord {
        PatientRecord {
            patient_id: "X".into(),
            patient_zip: zip.into(),
            procedure: "Botox".into(),
            revenue: 1.0,
            ..Default::default()
        }
    }

    #[test]
    fn adjacent_zips_are_padded() {
        assert_eq!(adjacent_zips("02134"), vec!["02133", "02135"]);
        assert_eq!(adjacent_zips("00000"), vec!["00001"]);
        assert_eq!(adjacent_zips("99999"), vec!["99998"]);
        assert!(adjacent_zips("SW1A").is_empty());
        assert!(adjacent_zips("").is_empty());
    }

    #[test]
    fn match_score_caps_at_95() {
        assert_eq!(match_score(1), 72);
        assert_eq!(match_score(12), 94);
        assert_eq!(match_score(13), 95);
        assert_eq!(match_score(500), 95);
    }

    #[test]
    fn target_zips_top_three_with_cohorts() {
        let best = vec![
            patient("A", "10001", 5000.0),
            patient("B", "10002", 1500.0),
            patient("C", "10003", 800.0),
            patient("D", "10004", 100.0),
        ];
        let records: Vec<PatientRecord> =
            ["10001", "10002", "10003", "10004"].iter().map(|z| record(z)).collect();

        let expansion = find_expansion(&best, &records);
        assert_eq!(expansion.target_zips.len(), 3);
        assert_eq!(expansion.target_zips[0].zip, "10001");
        assert_eq!(expansion.target_zips[0].cohort, Cohort::LuxuryClients);
        assert_eq!(expansion.target_zips[1].cohort, Cohort::ComfortSpenders);
        assert_eq!(expansion.target_zips[2].cohort, Cohort::BudgetConscious);
        assert_eq!(expansion.target_zips[0].match_score, 72);
    }

    #[test]
    fn untapped_zips_exclude_known_and_dedupe() {
        let best = vec![patient("A", "10001", 1000.0), patient("B", "10003", 3000.0)];
        let records = vec![record("10001"), record("10003"), record("10000")];

        let expansion = find_expansion(&best, &records);
        // 10003 -> 10002, 10004; 10001 -> 10000 (known), 10002 (dup)
        assert_eq!(expansion.untapped_zips, vec!["10002", "10004"]);
        assert_eq!(expansion.projected_new_patients, 20);
        // 2 zips * 10 patients * avg 2000
        assert_eq!(expansion.total_opportunity, 40000.0);
    }

    #[test]
    fn empty_best_set_is_neutral() {
        let expansion = find_expansion(&[], &[]);
        assert!(expansion.target_zips.is_empty());
        assert!(expansion.untapped_zips.is_empty());
        assert_eq!(expansion.total_opportunity, 0.0);
    }
}
