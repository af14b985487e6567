use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use chrono::NaiveDateTime;

use super::helpers::{non_blank, parse_visit_date, safe_ratio};
use super::thresholds::{BEST_PATIENT_SHARE, NO_VISIT_DAYS};
use super::types::{BestPatient, PatientRecord, Rollup};

/// Roll records up per `patient_id`, in first-seen order.
///
/// `now` is the reference point for `days_since_last_visit`.
pub fn rollup_patients(records: &[PatientRecord], now: NaiveDateTime) -> Vec<BestPatient> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut patients: Vec<BestPatient> = Vec::new();

    for record in records {
        let slot = *index.entry(record.patient_id.as_str()).or_insert_with(|| {
            patients.push(BestPatient {
                patient_id: record.patient_id.clone(),
                total_revenue: 0.0,
                visit_count: 0,
                procedures: Vec::new(),
                first_visit: None,
                last_visit: None,
                zip: record.patient_zip.clone(),
                acquisition_channel: non_blank(record.acquisition_channel.as_deref())
                    .map(str::to_string),
                avg_transaction_value: 0.0,
                days_since_last_visit: NO_VISIT_DAYS,
            });
            patients.len() - 1
        });
        let patient = &mut patients[slot];

        patient.total_revenue += record.revenue;
        patient.visit_count += 1;

        if !patient.procedures.iter().any(|p| p == &record.procedure) {
            patient.procedures.push(record.procedure.clone());
        }

        if let Some(visit) = parse_visit_date(record.appointment_date.as_deref()) {
            patient.first_visit = Some(patient.first_visit.map_or(visit, |v| v.min(visit)));
            patient.last_visit = Some(patient.last_visit.map_or(visit, |v| v.max(visit)));
        }
    }

    for patient in &mut patients {
        patient.avg_transaction_value =
            safe_ratio(patient.total_revenue, patient.visit_count as f64);
        patient.days_since_last_visit = patient
            .last_visit
            .map_or(NO_VISIT_DAYS, |last| (now - last).num_days());
    }

    patients
}

/// Size of the best-patient set for `unique_patients` patients.
pub fn best_patient_count(unique_patients: usize) -> usize {
    if unique_patients == 0 {
        return 0;
    }
    let share = (unique_patients as f64 * BEST_PATIENT_SHARE).ceil() as usize;
    share.max(1)
}

/// Top quintile of patients by total revenue, descending.
/// Equal revenue keeps first-seen order.
pub fn find_best_patients(records: &[PatientRecord], now: NaiveDateTime) -> Vec<BestPatient> {
    let mut patients = rollup_patients(records, now);
    let unique_patients = patients.len();
    let keep = best_patient_count(unique_patients);

    sort_by_revenue_desc(&mut patients, |p| p.total_revenue);
    patients.truncate(keep);

    tracing::debug!(
        unique_patients,
        best_patients = patients.len(),
        "Best-patient rollup complete"
    );

    patients
}

/// Number of distinct `patient_id` values.
pub fn distinct_patient_count(records: &[PatientRecord]) -> usize {
    records
        .iter()
        .map(|r| r.patient_id.as_str())
        .collect::<HashSet<_>>()
        .len()
}

/// Group best patients by a key (ZIP, channel), skipping blank keys.
/// Result is sorted by revenue descending, first-seen order on ties.
pub fn rollup_best_by<F>(best: &[BestPatient], key: F) -> Vec<Rollup>
where
    F: Fn(&BestPatient) -> Option<&str>,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut rollups: Vec<Rollup> = Vec::new();

    for patient in best {
        let Some(k) = non_blank(key(patient)) else {
            continue;
        };
        let slot = *index.entry(k.to_string()).or_insert_with(|| {
            rollups.push(Rollup {
                key: k.to_string(),
                revenue: 0.0,
                patient_count: 0,
            });
            rollups.len() - 1
        });
        rollups[slot].revenue += patient.total_revenue;
        rollups[slot].patient_count += 1;
    }

    sort_by_revenue_desc(&mut rollups, |r| r.revenue);
    rollups
}

/// Stable descending sort on a revenue field.
pub(crate) fn sort_by_revenue_desc<T, F>(items: &mut [T], revenue: F)
where
    F: Fn(&T) -> f64,
{
    items.sort_by(|a, b| {
        revenue(b)
            .partial_cmp(&revenue(a))
            .unwrap_or(Ordering::Equal)
    });
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn record(id: &str, zip: &str, procedure: &str, revenue: f64, date: Option<&str>) -> PatientRecord {
        PatientRecord {
            patient_id: id.into(),
            patient_zip: zip.into(),
            procedure: procedure.into(),
            revenue,
            appointment_date: date.map(|d| d.into()),
            acquisition_channel: None,
        }
    }

    #[test]
    fn rollup_accumulates_revenue_and_visits() {
        let records = vec![
            record("A", "10001", "Botox", 100.0, None),
            record("A", "10001", "Botox", 50.0, None),
            record("B", "10002", "Filler", 10.0, None),
        ];

        let best = find_best_patients(&records, now());
        assert_eq!(best.len(), 1);
        assert_eq!(best[0].patient_id, "A");
        assert_eq!(best[0].total_revenue, 150.0);
        assert_eq!(best[0].visit_count, 2);
        assert_eq!(best[0].avg_transaction_value, 75.0);
        assert_eq!(best[0].procedures, vec!["Botox".to_string()]);
    }

    #[test]
    fn distinct_procedures_keep_first_seen_order() {
        let records = vec![
            record("A", "10001", "Filler", 10.0, None),
            record("A", "10001", "Botox", 10.0, None),
            record("A", "10001", "Filler", 10.0, None),
            record("A", "10001", "botox", 10.0, None),
        ];
        let patients = rollup_patients(&records, now());
        assert_eq!(patients[0].procedures, vec!["Filler", "Botox", "botox"]);
    }

    #[test]
    fn visit_range_and_days_since() {
        let records = vec![
            record("A", "10001", "Botox", 10.0, Some("2024-03-01")),
            record("A", "10001", "Botox", 10.0, Some("garbage")),
            record("A", "10001", "Botox", 10.0, Some("2024-01-15")),
            record("A", "10001", "Botox", 10.0, Some("2024-05-02")),
        ];
        let patients = rollup_patients(&records, now());
        let a = &patients[0];
        assert_eq!(a.visit_count, 4);
        assert_eq!(a.total_revenue, 40.0);
        assert_eq!(a.first_visit.unwrap().date(), NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert_eq!(a.last_visit.unwrap().date(), NaiveDate::from_ymd_opt(2024, 5, 2).unwrap());
        assert_eq!(a.days_since_last_visit, 30);
    }

    #[test]
    fn no_dates_gives_sentinel() {
        let patients = rollup_patients(&[record("A", "10001", "Botox", 10.0, None)], now());
        assert!(patients[0].first_visit.is_none());
        assert_eq!(patients[0].days_since_last_visit, NO_VISIT_DAYS);
    }

    #[test]
    fn best_count_is_ceil_of_fifth() {
        assert_eq!(best_patient_count(0), 0);
        assert_eq!(best_patient_count(1), 1);
        assert_eq!(best_patient_count(2), 1);
        assert_eq!(best_patient_count(5), 1);
        assert_eq!(best_patient_count(6), 2);
        assert_eq!(best_patient_count(10), 2);
        assert_eq!(best_patient_count(11), 3);
    }

    #[test]
    fn ties_keep_insertion_order() {
        let records: Vec<PatientRecord> = ["P1", "P2", "P3", "P4", "P5", "P6"]
            .iter()
            .map(|id| record(id, "10001", "Botox", 500.0, None))
            .collect();
        let best = find_best_patients(&records, now());
        assert_eq!(best.len(), 2);
        assert_eq!(best[0].patient_id, "P1");
        assert_eq!(best[1].patient_id, "P2");
    }

    #[test]
    fn empty_input_yields_empty_set() {
        assert!(find_best_patients(&[], now()).is_empty());
        assert_eq!(distinct_patient_count(&[]), 0);
    }

    #[test]
    fn zip_and_channel_come_from_first_record() {
        let mut first = record("A", "10001", "Botox", 10.0, None);
        first.acquisition_channel = Some("  ".into());
        let mut second = record("A", "90210", "Botox", 10.0, None);
        second.acquisition_channel = Some("Instagram".into());

        let patients = rollup_patients(&[first, second], now());
        assert_eq!(patients[0].zip, "10001");
        assert!(patients[0].acquisition_channel.is_none());
    }

    #[test]
    fn rollup_by_skips_blank_keys_and_sorts() {
        let records = vec![
            record("A", "10001", "Botox", 100.0, None),
            record("B", "", "Botox", 900.0, None),
            record("C", "10002", "Botox", 300.0, None),
            record("D", "10001", "Botox", 250.0, None),
        ];
        let patients = rollup_patients(&records, now());
        let zips = rollup_best_by(&patients, |p| Some(p.zip.as_str()));
        assert_eq!(zips.len(), 2);
        assert_eq!(zips[0].key, "10001");
        assert_eq!(zips[0].revenue, 350.0);
        assert_eq!(zips[0].patient_count, 2);
        assert_eq!(zips[1].key, "10002");
    }
}
