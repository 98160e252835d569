//! HTTP API Client
//!
//! Functions for communicating with the analysis backend. Every call takes
//! the abort signal of the view that issued it.

use gloo_net::http::{Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use web_sys::{AbortSignal, FormData, RequestCredentials};

use cardioscope::auth::AuthRequest;
use cardioscope::endpoints;
use cardioscope::error::{ClientError, ClientResult};
use cardioscope::model::{
    AnalysisResult, MessageResponse, PatientDetail, PatientSummary, ScoreHistoryEntry, Session,
};
use cardioscope::upload::{Attachment, UploadRequest, CHECKUP_FIELD, FILE_FIELD, QUESTIONNAIRE_FIELD};

/// Local storage key overriding the backend origin
pub const API_URL_KEY: &str = "cardioscope_api_url";

/// Get the API base URL from local storage, or same-origin by default
pub fn get_api_base() -> String {
    let url = web_sys::window()
        .and_then(|window| window.local_storage().ok().flatten())
        .and_then(|storage| storage.get_item(API_URL_KEY).ok().flatten())
        .unwrap_or_default();
    // Normalize: remove trailing slash
    url.trim_end_matches('/').to_string()
}

fn url(path: &str) -> String {
    endpoints::join(&get_api_base(), path)
}

fn prepare(builder: RequestBuilder, signal: Option<&AbortSignal>) -> RequestBuilder {
    builder
        .credentials(RequestCredentials::Include)
        .abort_signal(signal)
}

fn network_error(err: gloo_net::Error, signal: Option<&AbortSignal>) -> ClientError {
    if signal.map(|s| s.aborted()).unwrap_or(false) {
        ClientError::Cancelled
    } else {
        ClientError::Transport(err.to_string())
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
    if !response.ok() {
        let message = response
            .json::<MessageResponse>()
            .await
            .ok()
            .and_then(|m| m.message);
        return Err(ClientError::Status {
            status: response.status(),
            message,
        });
    }

    let body = response
        .text()
        .await
        .map_err(|e| ClientError::Decode(e.to_string()))?;
    Ok(serde_json::from_str(&body)?)
}

async fn get_json<T: DeserializeOwned>(path: &str, signal: Option<&AbortSignal>) -> ClientResult<T> {
    let response = prepare(Request::get(&url(path)), signal)
        .send()
        .await
        .map_err(|e| network_error(e, signal))?;
    read_json(response).await
}

// ============ API Functions ============

/// Resolve the identity behind the session cookie
pub async fn fetch_me(signal: Option<&AbortSignal>) -> ClientResult<Session> {
    get_json(endpoints::ME, signal).await
}

/// Post a login or registration form
pub async fn authenticate(
    request: &AuthRequest,
    signal: Option<&AbortSignal>,
) -> ClientResult<serde_json::Value> {
    let response = prepare(Request::post(&url(request.endpoint)), signal)
        .json(&request.body)
        .map_err(|e| ClientError::Decode(e.to_string()))?
        .send()
        .await
        .map_err(|e| network_error(e, signal))?;
    read_json(response).await
}

/// End the backend session. The body is ignored.
pub async fn logout() -> ClientResult<()> {
    let response = prepare(Request::post(&url(endpoints::LOGOUT)), None)
        .send()
        .await
        .map_err(|e| network_error(e, None))?;
    if response.ok() {
        Ok(())
    } else {
        Err(ClientError::Status {
            status: response.status(),
            message: None,
        })
    }
}

fn append_image(form: &FormData, field: &str, attachment: &Attachment<web_sys::File>) -> ClientResult<()> {
    form.append_with_blob_and_filename(field, &attachment.file, &attachment.name)
        .map_err(|e| ClientError::Transport(format!("{:?}", e)))
}

/// Send the ECG upload as multipart form data
pub async fn upload(
    request: &UploadRequest<web_sys::File>,
    signal: Option<&AbortSignal>,
) -> ClientResult<AnalysisResult> {
    let form = FormData::new().map_err(|e| ClientError::Transport(format!("{:?}", e)))?;
    append_image(&form, FILE_FIELD, &request.ecg)?;
    form.append_with_str(QUESTIONNAIRE_FIELD, &request.questionnaire_json)
        .map_err(|e| ClientError::Transport(format!("{:?}", e)))?;
    if let Some(checkup) = &request.checkup {
        append_image(&form, CHECKUP_FIELD, checkup)?;
    }

    let response = prepare(Request::post(&url(request.endpoint)), signal)
        .body(form)
        .map_err(|e| ClientError::Transport(e.to_string()))?
        .send()
        .await
        .map_err(|e| network_error(e, signal))?;
    read_json(response).await
}

pub async fn fetch_patients(signal: Option<&AbortSignal>) -> ClientResult<Vec<PatientSummary>> {
    get_json(endpoints::PATIENTS, signal).await
}

pub async fn fetch_patient_info(id: u64, signal: Option<&AbortSignal>) -> ClientResult<PatientDetail> {
    get_json(&endpoints::patient_info(id), signal).await
}

pub async fn fetch_score_history(
    id: u64,
    signal: Option<&AbortSignal>,
) -> ClientResult<Vec<ScoreHistoryEntry>> {
    get_json(&endpoints::score_history(id), signal).await
}
