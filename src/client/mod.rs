//! Backend Client
//!
//! Native access to the analysis backend. [`Backend`] is the seam the CLI
//! drives; [`HttpBackend`] is the reqwest implementation. The browser has
//! its own gloo-net client in the frontend crate and shares only the
//! request/response rules from the core modules.

mod http;

pub use http::HttpBackend;

use async_trait::async_trait;

use crate::auth::AuthRequest;
use crate::error::ClientResult;
use crate::model::{AnalysisResult, PatientDetail, PatientSummary, ScoreHistoryEntry, Session};
use crate::upload::UploadRequest;

/// Image bytes read from disk
pub type ImageBytes = Vec<u8>;

/// Operations the analysis backend offers
#[async_trait]
pub trait Backend: Send + Sync {
    /// Identity of the current session cookie
    async fn me(&self) -> ClientResult<Session>;

    /// Post a login or registration form; returns the JSON body
    async fn authenticate(&self, request: &AuthRequest) -> ClientResult<serde_json::Value>;

    async fn logout(&self) -> ClientResult<()>;

    /// Send an ECG image, questionnaire and optional checkup image
    async fn upload(&self, request: &UploadRequest<ImageBytes>) -> ClientResult<AnalysisResult>;

    async fn patients(&self) -> ClientResult<Vec<PatientSummary>>;

    async fn patient_info(&self, id: u64) -> ClientResult<PatientDetail>;

    /// Score history as the backend returns it (newest first)
    async fn score_history(&self, id: u64) -> ClientResult<Vec<ScoreHistoryEntry>>;
}
