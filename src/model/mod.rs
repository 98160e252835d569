//! Data Model
//!
//! Wire types exchanged with the analysis backend.

pub mod analysis;
pub mod patient;
pub mod session;

pub use analysis::{
    AnalysisResult, Classification, EcgSample, FeatureImportance, VascularReport,
    WaveformInterpretation,
};
pub use patient::{
    chronological, PatientDetail, PatientStatus, PatientSummary, RubricRow, ScoreHistoryEntry,
    RISK_FACTORS,
};
pub use session::{Role, Session};

/// `{ "message": ... }` body returned by auth endpoints and most errors
#[derive(Debug, Clone, Default, serde::Deserialize, serde::Serialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}
