//! Fixed heuristics used by the patient intelligence engine.
//!
//! Every number that shapes a segment, a pattern value or a playbook line
//! lives here, so tuning never requires reading the aggregation code.

// ---------------------------------------------------------------------------
// Segmentation
// ---------------------------------------------------------------------------

/// Share of unique patients (by revenue, descending) that form the best-patient set.
pub const BEST_PATIENT_SHARE: f64 = 0.2;

/// Days without a visit after which a best patient counts as dormant.
pub const DORMANT_AFTER_DAYS: i64 = 90;

/// Sentinel for "no parsable visit date". Always dormant.
pub const NO_VISIT_DAYS: i64 = i64::MAX;

// ---------------------------------------------------------------------------
// Cohorts (average value per patient in a ZIP)
// ---------------------------------------------------------------------------

pub const LUXURY_COHORT_MIN_AVG: f64 = 2000.0;
pub const COMFORT_COHORT_MIN_AVG: f64 = 1000.0;

// ---------------------------------------------------------------------------
// Pattern mining
// ---------------------------------------------------------------------------

pub const CONCENTRATION_CONFIDENCE: f64 = 0.95;
/// Retention upside: share of best-patient revenue.
pub const CONCENTRATION_VALUE_RATE: f64 = 0.10;

pub const GEOGRAPHIC_CONFIDENCE: f64 = 0.88;
pub const GEOGRAPHIC_VALUE_RATE: f64 = 0.30;

pub const BEHAVIORAL_CONFIDENCE: f64 = 0.85;
pub const BEHAVIORAL_VALUE_RATE: f64 = 0.20;

pub const CHANNEL_CONFIDENCE: f64 = 0.82;
pub const CHANNEL_VALUE_RATE: f64 = 0.30;

// ---------------------------------------------------------------------------
// Opportunity mining
// ---------------------------------------------------------------------------

pub const REACTIVATION_CONFIDENCE: f64 = 0.75;
pub const REACTIVATION_VALUE_RATE: f64 = 0.30;

pub const UPSELL_CONFIDENCE: f64 = 0.80;
pub const UPSELL_VALUE_RATE: f64 = 0.25;

pub const FREQUENCY_CONFIDENCE: f64 = 0.70;
pub const FREQUENCY_VALUE_RATE: f64 = 0.40;

// ---------------------------------------------------------------------------
// Expansion
// ---------------------------------------------------------------------------

/// Number of best-patient ZIPs promoted to expansion targets.
pub const TARGET_ZIP_LIMIT: usize = 3;

pub const MATCH_SCORE_BASE: u32 = 70;
pub const MATCH_SCORE_PER_PATIENT: u32 = 2;
pub const MATCH_SCORE_CAP: u32 = 95;

/// Placeholder: new patients assumed per untapped ZIP.
pub const ASSUMED_PATIENTS_PER_ZIP: usize = 10;

/// Highest valid 5-digit ZIP value.
pub const MAX_ZIP: u32 = 99_999;

// ---------------------------------------------------------------------------
// Playbook
// ---------------------------------------------------------------------------

pub const AUDIENCE_TOP_PROCEDURES: usize = 3;
pub const MESSAGING_TOP_PROCEDURES: usize = 2;

/// Share of a channel/geographic pattern's value suggested for reallocation.
pub const BUDGET_SHIFT_RATE: f64 = 0.10;

pub const BOOKING_LEAD_TIME: &str = "2-3 weeks advance";
pub const REENGAGEMENT_WINDOW: &str = "90 days";
pub const PEAK_QUARTERS: [&str; 2] = ["Q1", "Q4"];

/// Denominator for the visits-per-year estimate.
pub const DAYS_PER_YEAR: f64 = 365.0;
