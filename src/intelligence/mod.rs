//! Patient intelligence engine.
//!
//! Turns flat transaction records into a best-patient segment, mined
//! patterns, growth opportunities, an expansion projection and a campaign
//! playbook. Every stage is a pure function of its input plus the injected
//! reference clock; nothing is cached between calls.
//!
//! Stage order: rollup → patterns → opportunities → expansion → playbook → summary.

pub mod engine;
pub mod expansion;
pub mod helpers;
pub mod messages;
pub mod opportunities;
pub mod patterns;
pub mod playbook;
pub mod procedures;
pub mod rollup;
pub mod summary;
pub mod thresholds;
pub mod types;

pub use engine::{analyze_patient_data, apply_procedure_filter, PatientIntelligenceEngine};
pub use types::{
    BestPatient, Cohort, ExpansionBlock, IntelSummary, Opportunity, OpportunityKind,
    PatientIntelResult, PatientRecord, PatternInsight, PatternKind, Playbook,
};
