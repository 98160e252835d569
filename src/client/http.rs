//! reqwest implementation of [`Backend`]
//!
//! The client keeps a cookie store so a login followed by other calls in
//! the same process rides on the backend's session cookie.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::{Backend, ImageBytes};
use crate::auth::AuthRequest;
use crate::config::BackendConfig;
use crate::endpoints;
use crate::error::{ClientError, ClientResult};
use crate::model::{
    AnalysisResult, MessageResponse, PatientDetail, PatientSummary, ScoreHistoryEntry, Session,
};
use crate::upload::{Attachment, UploadRequest, CHECKUP_FIELD, FILE_FIELD, QUESTIONNAIRE_FIELD};

/// HTTP client for the analysis backend
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> ClientResult<Self> {
        let client = Client::builder()
            .cookie_store(true)
            .timeout(timeout)
            .build()
            .map_err(transport)?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn from_config(config: &BackendConfig) -> ClientResult<Self> {
        Self::new(&config.url, Duration::from_secs(config.request_timeout_secs))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        endpoints::join(&self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        tracing::debug!(path, "GET");
        let response = self.client.get(self.url(path)).send().await.map_err(transport)?;
        read_json(response).await
    }

    async fn send(&self, request: RequestBuilder) -> ClientResult<Response> {
        let response = request.send().await.map_err(transport)?;
        ensure_success(response).await
    }
}

fn transport(err: reqwest::Error) -> ClientError {
    ClientError::Transport(err.to_string())
}

/// Turn a non-success status into [`ClientError::Status`], keeping the
/// `message` field of a JSON error body
async fn ensure_success(response: Response) -> ClientResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<MessageResponse>(&body)
        .ok()
        .and_then(|m| m.message);
    tracing::debug!(status = status.as_u16(), ?message, "Backend returned an error status");

    Err(ClientError::Status {
        status: status.as_u16(),
        message,
    })
}

async fn read_json<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
    let response = ensure_success(response).await?;
    let body = response.text().await.map_err(transport)?;
    Ok(serde_json::from_str(&body)?)
}

fn image_part(attachment: &Attachment<ImageBytes>) -> ClientResult<Part> {
    Part::bytes(attachment.file.clone())
        .file_name(attachment.name.clone())
        .mime_str(&attachment.mime)
        .map_err(transport)
}

fn upload_form(request: &UploadRequest<ImageBytes>) -> ClientResult<Form> {
    let mut form = Form::new()
        .part(FILE_FIELD, image_part(&request.ecg)?)
        .text(QUESTIONNAIRE_FIELD, request.questionnaire_json.clone());

    if let Some(checkup) = &request.checkup {
        form = form.part(CHECKUP_FIELD, image_part(checkup)?);
    }
    Ok(form)
}

#[async_trait]
impl Backend for HttpBackend {
    async fn me(&self) -> ClientResult<Session> {
        self.get_json(endpoints::ME).await
    }

    async fn authenticate(&self, request: &AuthRequest) -> ClientResult<serde_json::Value> {
        tracing::debug!(endpoint = request.endpoint, username = %request.body.username, "POST credentials");
        let response = self
            .client
            .post(self.url(request.endpoint))
            .json(&request.body)
            .send()
            .await
            .map_err(transport)?;
        read_json(response).await
    }

    async fn logout(&self) -> ClientResult<()> {
        self.send(self.client.post(self.url(endpoints::LOGOUT))).await?;
        Ok(())
    }

    async fn upload(&self, request: &UploadRequest<ImageBytes>) -> ClientResult<AnalysisResult> {
        tracing::info!(
            endpoint = request.endpoint,
            ecg = %request.ecg.name,
            with_checkup = request.checkup.is_some(),
            "Uploading ECG"
        );
        let response = self
            .client
            .post(self.url(request.endpoint))
            .multipart(upload_form(request)?)
            .send()
            .await
            .map_err(transport)?;
        read_json(response).await
    }

    async fn patients(&self) -> ClientResult<Vec<PatientSummary>> {
        self.get_json(endpoints::PATIENTS).await
    }

    async fn patient_info(&self, id: u64) -> ClientResult<PatientDetail> {
        self.get_json(&endpoints::patient_info(id)).await
    }

    async fn score_history(&self, id: u64) -> ClientResult<Vec<ScoreHistoryEntry>> {
        self.get_json(&endpoints::score_history(id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{AuthForm, AuthMode, AuthOutcome, MemberType};
    use crate::model::Role;
    use crate::upload::UploadForm;
    use axum::{
        extract::{Multipart, Query, State},
        http::{header, HeaderMap, StatusCode},
        response::IntoResponse,
        routing::{get, post},
        Json, Router,
    };
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    const SESSION_COOKIE: &str = "SESSION=fake-session";

    #[derive(Default)]
    struct Recorded {
        upload_fields: Vec<String>,
        upload_path: Option<String>,
        registrations: Vec<Value>,
    }

    type Shared = Arc<Mutex<Recorded>>;

    async fn login(Json(body): Json<Value>) -> impl IntoResponse {
        if body["password"] == "secret" {
            (
                StatusCode::OK,
                [(header::SET_COOKIE, format!("{}; Path=/", SESSION_COOKIE))],
                Json(json!({ "username": body["username"], "role": "ROLE_PRO" })),
            )
                .into_response()
        } else {
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "message": "Wrong ID or password" })),
            )
                .into_response()
        }
    }

    async fn register(State(recorded): State<Shared>, Json(body): Json<Value>) -> impl IntoResponse {
        recorded.lock().unwrap().registrations.push(body);
        Json(json!({ "message": "Welcome aboard" }))
    }

    async fn me(headers: HeaderMap) -> impl IntoResponse {
        let signed_in = headers
            .get(header::COOKIE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.contains(SESSION_COOKIE))
            .unwrap_or(false);
        if signed_in {
            Json(json!({ "username": "dr.kim", "role": "ROLE_PRO" })).into_response()
        } else {
            StatusCode::UNAUTHORIZED.into_response()
        }
    }

    async fn record_upload(recorded: Shared, path: &str, mut multipart: Multipart) -> Json<Value> {
        let mut fields = Vec::new();
        while let Ok(Some(field)) = multipart.next_field().await {
            fields.push(field.name().unwrap_or_default().to_string());
        }
        let mut recorded = recorded.lock().unwrap();
        recorded.upload_fields = fields;
        recorded.upload_path = Some(path.to_string());
        Json(json!({
            "label": 1,
            "probability": 0.91,
            "ecg_signal": [{ "Time (s)": 0.0, "Voltage (mV)": 0.12 }],
            "heatmap": "aGVhdG1hcA==",
            "feature_importance": { "image": 40.0, "signal": 30.0, "crf": 20.0, "wt": 5.0, "age": 5.0 }
        }))
    }

    async fn patient_info(Query(params): Query<HashMap<String, u64>>) -> impl IntoResponse {
        match params.get("id") {
            Some(7) => Json(json!({
                "patient_id": 7,
                "total_score": 64.0,
                "risk_class": "high-risk",
                "score_dict": { "age": 10.0 }
            }))
            .into_response(),
            _ => (StatusCode::NOT_FOUND, Json(json!({ "message": "No such patient" }))).into_response(),
        }
    }

    async fn spawn_fake_backend() -> (String, Shared) {
        let recorded = Shared::default();
        let plain = Arc::clone(&recorded);
        let checkup = Arc::clone(&recorded);

        let app = Router::new()
            .route("/api/login", post(login))
            .route("/api/public/insertUser", post(register))
            .route("/api/public/user/me", get(me))
            .route(
                endpoints::UPLOAD_ECG,
                post(move |m: Multipart| record_upload(Arc::clone(&plain), endpoints::UPLOAD_ECG, m)),
            )
            .route(
                endpoints::UPLOAD_ECG_WITH_CHECKUP,
                post(move |m: Multipart| {
                    record_upload(Arc::clone(&checkup), endpoints::UPLOAD_ECG_WITH_CHECKUP, m)
                }),
            )
            .route("/api/professional/getPatientInfo", get(patient_info))
            .with_state(Arc::clone(&recorded));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{}", addr), recorded)
    }

    fn client(base_url: &str) -> HttpBackend {
        HttpBackend::new(base_url, Duration::from_secs(5)).unwrap()
    }

    fn image(name: &str) -> Attachment<ImageBytes> {
        Attachment::new(vec![0x89, b'P', b'N', b'G'], name, "image/png").unwrap()
    }

    fn ready_form() -> UploadForm<ImageBytes> {
        let mut form = UploadForm::new();
        for (key, value) in [("age", "61"), ("height", "172"), ("weight", "80")] {
            form.questionnaire.set(key, value);
        }
        form.attach_ecg(image("lead2.png"));
        form
    }

    #[tokio::test]
    async fn test_login_sets_cookie_session() {
        let (url, _) = spawn_fake_backend().await;
        let backend = client(&url);

        assert!(backend.me().await.unwrap_err().is_unauthorized());

        let form = AuthForm {
            username: "dr.kim".into(),
            password: "secret".into(),
            ..Default::default()
        };
        let request = form.prepare().unwrap();
        let outcome = request.outcome(backend.authenticate(&request).await);
        assert_eq!(
            outcome,
            AuthOutcome::SignedIn(Session::new("dr.kim", Role::Professional))
        );

        assert_eq!(backend.me().await.unwrap().role, Role::Professional);
    }

    #[tokio::test]
    async fn test_login_failure_surfaces_server_message() {
        let (url, _) = spawn_fake_backend().await;
        let backend = client(&url);

        let form = AuthForm {
            username: "dr.kim".into(),
            password: "wrong".into(),
            ..Default::default()
        };
        let request = form.prepare().unwrap();
        let outcome = request.outcome(backend.authenticate(&request).await);
        assert_eq!(outcome, AuthOutcome::Failed("Wrong ID or password".into()));
    }

    #[tokio::test]
    async fn test_register_sends_member_token() {
        let (url, recorded) = spawn_fake_backend().await;
        let backend = client(&url);

        let form = AuthForm {
            mode: AuthMode::Register,
            username: "lee".into(),
            password: "pw".into(),
            member_type: Some(MemberType::User),
        };
        let request = form.prepare().unwrap();
        let outcome = request.outcome(backend.authenticate(&request).await);
        assert_eq!(outcome, AuthOutcome::Registered("Welcome aboard".into()));
        assert_eq!(recorded.lock().unwrap().registrations[0]["token"], "user");
    }

    #[tokio::test]
    async fn test_upload_multipart_fields() {
        let (url, recorded) = spawn_fake_backend().await;
        let backend = client(&url);

        let mut form = ready_form();
        let request = form.begin_submit().unwrap();
        let result = form.finish(backend.upload(&request).await).unwrap();
        assert_eq!(result.label, 1);
        {
            let recorded = recorded.lock().unwrap();
            assert_eq!(recorded.upload_path.as_deref(), Some(endpoints::UPLOAD_ECG));
            assert_eq!(recorded.upload_fields, vec![FILE_FIELD, QUESTIONNAIRE_FIELD]);
        }

        let mut form = ready_form();
        form.attach_checkup(image("checkup.png"));
        let request = form.begin_submit().unwrap();
        assert!(form.finish(backend.upload(&request).await).is_some());
        let recorded = recorded.lock().unwrap();
        assert_eq!(recorded.upload_path.as_deref(), Some(endpoints::UPLOAD_ECG_WITH_CHECKUP));
        assert_eq!(
            recorded.upload_fields,
            vec![FILE_FIELD, QUESTIONNAIRE_FIELD, CHECKUP_FIELD]
        );
    }

    #[tokio::test]
    async fn test_patient_info_query() {
        let (url, _) = spawn_fake_backend().await;
        let backend = client(&url);

        let detail = backend.patient_info(7).await.unwrap();
        assert_eq!(detail.total_score, 64.0);

        let err = backend.patient_info(8).await.unwrap_err();
        assert_eq!(err.server_message(), Some("No such patient"));
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_transport_error() {
        let backend = client("http://127.0.0.1:1");
        assert!(matches!(backend.patients().await, Err(ClientError::Transport(_))));
    }
}
