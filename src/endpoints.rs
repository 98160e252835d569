//! Backend endpoint paths
//!
//! Paths are relative to the backend origin. The browser reaches them on
//! its own origin (the dev server forwards `/api`); native clients prefix
//! them with the configured base URL.

pub const ME: &str = "/api/public/user/me";
pub const LOGIN: &str = "/api/login";
pub const REGISTER: &str = "/api/public/insertUser";
pub const LOGOUT: &str = "/api/logout";
pub const UPLOAD_ECG: &str = "/api/public/upload-ecgImage-lead2only";
pub const UPLOAD_ECG_WITH_CHECKUP: &str = "/api/public/upload-ecgImage-lead2only-with-checkup";
pub const PATIENTS: &str = "/api/professional/getPatientsList";
pub const PATIENT_INFO: &str = "/api/professional/getPatientInfo";
pub const SCORE_HISTORY: &str = "/api/professional/getScoreHistory";

/// Upload endpoint for the given attachment set
pub fn upload(with_checkup: bool) -> &'static str {
    if with_checkup {
        UPLOAD_ECG_WITH_CHECKUP
    } else {
        UPLOAD_ECG
    }
}

pub fn patient_info(id: u64) -> String {
    with_id(PATIENT_INFO, id)
}

pub fn score_history(id: u64) -> String {
    with_id(SCORE_HISTORY, id)
}

fn with_id(path: &str, id: u64) -> String {
    format!("{}?id={}", path, urlencoding::encode(&id.to_string()))
}

/// Join a base URL and an endpoint path without doubling slashes
pub fn join(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}
