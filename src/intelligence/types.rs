use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::thresholds::{COMFORT_COHORT_MIN_AVG, LUXURY_COHORT_MIN_AVG, NO_VISIT_DAYS};

// ---------------------------------------------------------------------------
// PatientRecord (input)
// ---------------------------------------------------------------------------

/// One transaction / visit row as uploaded by the practice.
///
/// Deserialization is lenient: spreadsheet exports routinely carry numeric
/// ZIPs and revenue as strings. Nothing here is rejected; unusable values
/// degrade to empty strings or zero revenue.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatientRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub patient_id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub patient_zip: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub procedure: String,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub revenue: f64,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub appointment_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub acquisition_channel: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Number(serde_json::Number),
    Flag(bool),
    Null(()),
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Scalar::deserialize(deserializer)? {
        Scalar::Text(s) => s,
        Scalar::Number(n) => n.to_string(),
        Scalar::Flag(b) => b.to_string(),
        Scalar::Null(()) => String::new(),
    })
}

/// Numbers keep their text form (an Excel date serial simply fails to parse later).
fn lenient_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Scalar::deserialize(deserializer)? {
        Scalar::Text(s) => Some(s),
        Scalar::Number(n) => Some(n.to_string()),
        Scalar::Flag(_) | Scalar::Null(()) => None,
    })
}

fn lenient_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Scalar::deserialize(deserializer)? {
        Scalar::Number(n) => n.as_f64().unwrap_or(0.0),
        Scalar::Text(s) => s
            .trim()
            .trim_start_matches('$')
            .replace(',', "")
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .unwrap_or(0.0),
        Scalar::Flag(_) | Scalar::Null(()) => 0.0,
    })
}

// ---------------------------------------------------------------------------
// BestPatient (per-patient rollup)
// ---------------------------------------------------------------------------

/// All records of one `patient_id`, rolled up.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BestPatient {
    pub patient_id: String,
    pub total_revenue: f64,
    pub visit_count: usize,
    /// Distinct procedure names, first-seen order.
    pub procedures: Vec<String>,
    pub first_visit: Option<NaiveDateTime>,
    pub last_visit: Option<NaiveDateTime>,
    /// ZIP of the first record seen for this patient.
    pub zip: String,
    /// Channel of the first record seen for this patient.
    pub acquisition_channel: Option<String>,
    pub avg_transaction_value: f64,
    /// `NO_VISIT_DAYS` when no visit date could be parsed; serialised as `null`.
    #[serde(serialize_with = "serialize_days")]
    pub days_since_last_visit: i64,
}

impl BestPatient {
    pub fn is_multi_procedure(&self) -> bool {
        self.procedures.len() > 1
    }

    pub fn is_single_procedure(&self) -> bool {
        self.procedures.len() == 1
    }
}

fn serialize_days<S>(days: &i64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if *days == NO_VISIT_DAYS {
        serializer.serialize_none()
    } else {
        serializer.serialize_i64(*days)
    }
}

// ---------------------------------------------------------------------------
// Insights: patterns and opportunities
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    Concentration,
    Geographic,
    Behavioral,
    Channel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpportunityKind {
    Reactivation,
    Upsell,
    Frequency,
}

/// A report row produced by pattern or opportunity mining.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insight<K> {
    #[serde(rename = "type")]
    pub kind: K,
    pub title: String,
    pub description: String,
    pub action: String,
    /// Dollar estimate attached to the insight.
    pub value: f64,
    /// Fixed per kind, 0..1.
    pub confidence: f64,
}

pub type PatternInsight = Insight<PatternKind>;
pub type Opportunity = Insight<OpportunityKind>;

// ---------------------------------------------------------------------------
// Geography & expansion
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cohort {
    #[serde(rename = "Luxury Clients")]
    LuxuryClients,
    #[serde(rename = "Comfort Spenders")]
    ComfortSpenders,
    #[serde(rename = "Budget Conscious")]
    BudgetConscious,
}

impl Cohort {
    /// Label a ZIP by the average value of its best patients.
    pub fn from_avg_value(avg_value: f64) -> Self {
        if avg_value > LUXURY_COHORT_MIN_AVG {
            Self::LuxuryClients
        } else if avg_value > COMFORT_COHORT_MIN_AVG {
            Self::ComfortSpenders
        } else {
            Self::BudgetConscious
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LuxuryClients => "Luxury Clients",
            Self::ComfortSpenders => "Comfort Spenders",
            Self::BudgetConscious => "Budget Conscious",
        }
    }
}

impl std::fmt::Display for Cohort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Best-patient revenue grouped by ZIP or by channel.
#[derive(Debug, Clone, PartialEq)]
pub struct Rollup {
    pub key: String,
    pub revenue: f64,
    pub patient_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetZip {
    pub zip: String,
    pub patient_count: usize,
    pub revenue: f64,
    pub avg_value: f64,
    pub cohort: Cohort,
    pub match_score: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpansionBlock {
    pub target_zips: Vec<TargetZip>,
    /// ZIP±1 of each target ZIP, absent from the dataset. Not real geographic adjacency.
    pub untapped_zips: Vec<String>,
    pub projected_new_patients: usize,
    pub total_opportunity: f64,
}

// ---------------------------------------------------------------------------
// Procedures & playbook
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcedureShare {
    pub procedure: String,
    /// Revenue attributed as `totalRevenue / procedures.len()` per patient.
    pub revenue: f64,
    pub patient_count: usize,
    /// Rounded percentage of best-patient revenue.
    pub share: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetAudience {
    pub avg_lifetime_value: f64,
    pub avg_visits_per_year: f64,
    pub top_procedures: Vec<ProcedureShare>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelAllocation {
    pub channel: String,
    pub revenue: f64,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagingTheme {
    pub theme: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimingGuidance {
    pub booking_lead_time: String,
    pub reengagement_window: String,
    pub peak_quarters: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetShift {
    pub source: PatternKind,
    pub recommendation: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Playbook {
    pub target_audience: TargetAudience,
    pub channels: Vec<ChannelAllocation>,
    pub messaging: Vec<MessagingTheme>,
    pub timing: TimingGuidance,
    pub budget: Vec<BudgetShift>,
}

// ---------------------------------------------------------------------------
// Summary & result
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntelSummary {
    pub total_patients: usize,
    pub best_patient_count: usize,
    pub total_revenue: f64,
    pub best_patient_revenue: f64,
    pub revenue_concentration: f64,
    pub avg_best_patient_value: f64,
    pub avg_overall_value: f64,
    pub multiplier: f64,
}

/// Everything a single analysis produces. Built fresh per call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientIntelResult {
    pub summary: IntelSummary,
    pub best_patients: Vec<BestPatient>,
    pub patterns: Vec<PatternInsight>,
    pub opportunities: Vec<Opportunity>,
    pub expansion: ExpansionBlock,
    pub playbook: Playbook,
    pub procedure_filter: Option<String>,
    pub analyzed_at: NaiveDateTime,
}
