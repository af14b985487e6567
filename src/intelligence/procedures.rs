use std::collections::HashMap;

use super::helpers::{percent_of, safe_ratio};
use super::rollup::sort_by_revenue_desc;
use super::types::{BestPatient, ProcedureShare};

/// Revenue attribution per procedure across the best-patient set.
///
/// Each patient's `total_revenue` is split evenly across their distinct
/// procedures (`total_revenue / procedures.len()`), so a patient who had two
/// treatments credits half of their spend to each. This is a revenue-per-visit
/// simplification, not true per-procedure revenue; every dollar figure
/// downstream depends on it, so keep the split as is.
pub fn analyze_procedures(best: &[BestPatient]) -> Vec<ProcedureShare> {
    let best_revenue: f64 = best.iter().map(|p| p.total_revenue).sum();

    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut shares: Vec<ProcedureShare> = Vec::new();

    for patient in best {
        let attributed = safe_ratio(patient.total_revenue, patient.procedures.len() as f64);
        for procedure in &patient.procedures {
            let slot = *index.entry(procedure.as_str()).or_insert_with(|| {
                shares.push(ProcedureShare {
                    procedure: procedure.clone(),
                    revenue: 0.0,
                    patient_count: 0,
                    share: 0.0,
                });
                shares.len() - 1
            });
            shares[slot].revenue += attributed;
            shares[slot].patient_count += 1;
        }
    }

    for share in &mut shares {
        share.share = percent_of(share.revenue, best_revenue);
    }

    sort_by_revenue_desc(&mut shares, |s| s.revenue);
    shares
}
