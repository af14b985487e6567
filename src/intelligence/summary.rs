use super::helpers::{percent_of, safe_ratio};
use super::rollup::distinct_patient_count;
use super::types::{BestPatient, IntelSummary, PatientRecord};

/// Headline numbers for the analysed (filtered) dataset.
pub fn generate_summary(best: &[BestPatient], records: &[PatientRecord]) -> IntelSummary {
    let total_patients = distinct_patient_count(records).max(1);
    let total_revenue: f64 = records.iter().map(|r| r.revenue).sum();
    let best_revenue: f64 = best.iter().map(|p| p.total_revenue).sum();

    let avg_best_patient_value = safe_ratio(best_revenue, best.len() as f64);
    let avg_overall_value = safe_ratio(total_revenue, total_patients as f64);

    IntelSummary {
        total_patients,
        best_patient_count: best.len(),
        total_revenue,
        best_patient_revenue: best_revenue,
        revenue_concentration: percent_of(best_revenue, total_revenue),
        avg_best_patient_value,
        avg_overall_value,
        multiplier: safe_ratio(avg_best_patient_value, avg_overall_value),
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::intelligence::rollup::find_best_patients;

    fn record(id: &str, revenue: f64) -> PatientRecord {
        PatientRecord {
            patient_id: id.into(),
            patient_zip: "10001".into(),
            procedure: "Botox".into(),
            revenue,
            ..Default::default()
        }
    }

    #[test]
    fn summary_of_three_patients() {
        let records = vec![record("A", 600.0), record("B", 300.0), record("C", 100.0)];
        let now = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
        let best = find_best_patients(&records, now);
        let summary = generate_summary(&best, &records);

        assert_eq!(summary.total_patients, 3);
        assert_eq!(summary.best_patient_count, 1);
        assert_eq!(summary.revenue_concentration, 60.0);
        assert_eq!(summary.avg_best_patient_value, 600.0);
        assert!((summary.avg_overall_value - 1000.0 / 3.0).abs() < 1e-9);
        assert!((summary.multiplier - 1.8).abs() < 1e-9);
    }

    #[test]
    fn single_zero_revenue_record() {
        let records = vec![record("A", 0.0)];
        let now = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
        let best = find_best_patients(&records, now);
        let summary = generate_summary(&best, &records);

        assert_eq!(summary.avg_overall_value, 0.0);
        assert_eq!(summary.multiplier, 0.0);
        assert_eq!(summary.revenue_concentration, 0.0);
    }

    #[test]
    fn empty_input_floor_guards_patient_count() {
        let summary = generate_summary(&[], &[]);
        assert_eq!(summary.total_patients, 1);
        assert_eq!(summary.best_patient_count, 0);
        assert_eq!(summary.avg_best_patient_value, 0.0);
        assert_eq!(summary.multiplier, 0.0);
    }
}
