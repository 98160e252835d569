//! ECG Upload Form
//!
//! Validation and request building for the upload flow. The form is
//! generic over the file handle so the browser can carry `web_sys::File`
//! while native callers carry bytes read from disk.
//!
//! Submission is a two-step protocol: [`UploadForm::begin_submit`] validates
//! and claims the single in-flight slot, [`UploadForm::finish`] releases it
//! with the backend's answer.

use thiserror::Error;

use crate::endpoints;
use crate::error::{ClientError, ClientResult};
use crate::model::AnalysisResult;
use crate::questionnaire::Questionnaire;

/// Multipart field holding the ECG image
pub const FILE_FIELD: &str = "file";
/// Multipart field holding the questionnaire JSON text
pub const QUESTIONNAIRE_FIELD: &str = "questionnaire";
/// Multipart field holding the optional checkup image
pub const CHECKUP_FIELD: &str = "checkup";

/// Image types the backend accepts
pub const ACCEPTED_IMAGE_TYPES: [&str; 2] = ["image/jpeg", "image/png"];

pub const STATUS_SUCCESS: &str = "Upload succeeded";
pub const STATUS_FAILED: &str = "Upload failed";
pub const STATUS_SERVER_ERROR: &str = "Server error";

/// Why a submission did not go out
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UploadBlocked {
    #[error("Please attach an ECG image.")]
    MissingEcgImage,

    #[error("Please answer every questionnaire item.")]
    MissingFields(Vec<&'static str>),

    #[error("Only JPEG or PNG images are supported.")]
    UnsupportedImage(String),

    #[error("An upload is already in progress.")]
    InFlight,
}

/// Picked image file with the metadata needed to validate and send it
#[derive(Debug, Clone, PartialEq)]
pub struct Attachment<F> {
    pub file: F,
    pub name: String,
    pub mime: String,
}

impl<F> Attachment<F> {
    /// Wrap a picked file, rejecting anything that is not JPEG or PNG
    pub fn new(file: F, name: impl Into<String>, mime: impl Into<String>) -> Result<Self, UploadBlocked> {
        let mime = mime.into();
        if !ACCEPTED_IMAGE_TYPES.contains(&mime.as_str()) {
            return Err(UploadBlocked::UnsupportedImage(mime));
        }
        Ok(Self {
            file,
            name: name.into(),
            mime,
        })
    }
}

/// Guess an image MIME type from a file name
pub fn mime_for_path(name: &str) -> &'static str {
    let lower = name.to_ascii_lowercase();
    if lower.ends_with(".png") {
        "image/png"
    } else if lower.ends_with(".jpg") || lower.ends_with(".jpeg") {
        "image/jpeg"
    } else {
        "application/octet-stream"
    }
}

/// Validated multipart upload
#[derive(Debug, Clone, PartialEq)]
pub struct UploadRequest<F> {
    pub endpoint: &'static str,
    pub ecg: Attachment<F>,
    pub questionnaire_json: String,
    pub checkup: Option<Attachment<F>>,
}

/// Upload form state
#[derive(Debug, Clone)]
pub struct UploadForm<F> {
    pub questionnaire: Questionnaire,
    ecg: Option<Attachment<F>>,
    checkup: Option<Attachment<F>>,
    in_flight: bool,
    status: Option<String>,
}

impl<F> Default for UploadForm<F> {
    fn default() -> Self {
        Self {
            questionnaire: Questionnaire::new(),
            ecg: None,
            checkup: None,
            in_flight: false,
            status: None,
        }
    }
}

impl<F: Clone> UploadForm<F> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach_ecg(&mut self, attachment: Attachment<F>) {
        self.ecg = Some(attachment);
    }

    pub fn attach_checkup(&mut self, attachment: Attachment<F>) {
        self.checkup = Some(attachment);
    }

    /// Drop the ECG image, e.g. when the picker was closed without a choice
    pub fn clear_ecg(&mut self) {
        self.ecg = None;
    }

    pub fn clear_checkup(&mut self) {
        self.checkup = None;
    }

    pub fn ecg(&self) -> Option<&Attachment<F>> {
        self.ecg.as_ref()
    }

    pub fn checkup(&self) -> Option<&Attachment<F>> {
        self.checkup.as_ref()
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// User-visible status line
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Validate without side effects. The image check comes first so the
    /// image prompt wins regardless of questionnaire completeness.
    pub fn validate(&self) -> Result<(), UploadBlocked> {
        if self.ecg.is_none() {
            return Err(UploadBlocked::MissingEcgImage);
        }
        let missing = self.questionnaire.missing_fields();
        if !missing.is_empty() {
            return Err(UploadBlocked::MissingFields(missing));
        }
        Ok(())
    }

    /// Validate, claim the in-flight slot and build the request. On a
    /// validation failure the prompt becomes the status line; a submit while
    /// another is outstanding is ignored.
    pub fn begin_submit(&mut self) -> Result<UploadRequest<F>, UploadBlocked> {
        if self.in_flight {
            return Err(UploadBlocked::InFlight);
        }
        if let Err(blocked) = self.validate() {
            self.status = Some(blocked.to_string());
            return Err(blocked);
        }
        let ecg = match &self.ecg {
            Some(ecg) => ecg.clone(),
            None => return Err(UploadBlocked::MissingEcgImage),
        };

        self.in_flight = true;
        self.status = None;

        let request = UploadRequest {
            endpoint: endpoints::upload(self.checkup.is_some()),
            ecg,
            questionnaire_json: self.questionnaire.to_json(),
            checkup: self.checkup.clone(),
        };
        tracing::debug!(endpoint = request.endpoint, "Submitting ECG upload");
        Ok(request)
    }

    /// Release the in-flight slot. Returns the result to hand to the
    /// success callback; failures only set the status line.
    pub fn finish(&mut self, outcome: ClientResult<AnalysisResult>) -> Option<AnalysisResult> {
        self.in_flight = false;
        match outcome {
            Ok(result) => {
                self.status = Some(STATUS_SUCCESS.to_string());
                Some(result)
            }
            Err(e) => {
                tracing::warn!(error = %e, "ECG upload failed");
                self.status = Some(failure_status(&e).to_string());
                None
            }
        }
    }
}

/// Status line for a failed upload
pub fn failure_status(err: &ClientError) -> &'static str {
    match err {
        ClientError::Status { .. } => STATUS_FAILED,
        ClientError::Transport(_) | ClientError::Decode(_) | ClientError::Cancelled => {
            STATUS_SERVER_ERROR
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestForm = UploadForm<&'static str>;

    fn image(name: &'static str) -> Attachment<&'static str> {
        Attachment::new(name, name, "image/png").unwrap()
    }

    fn ready_form() -> TestForm {
        let mut form = TestForm::new();
        form.questionnaire.set("age", "52");
        form.questionnaire.set("height", "168");
        form.questionnaire.set("weight", "71");
        form.attach_ecg(image("ecg.png"));
        form
    }

    fn sample_result() -> AnalysisResult {
        serde_json::from_str(
            r#"{"label":0,"probability":0.1,"ecg_signal":[],"heatmap":"","feature_importance":{}}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_missing_fields_block_without_request() {
        let mut sent = Vec::new();
        for key in ["age", "height", "weight", "gender", "smoke", "alcohol", "phy_act"] {
            let mut form = ready_form();
            form.questionnaire.set(key, " ");
            if let Ok(request) = form.begin_submit() {
                sent.push(request);
            }
            assert!(!form.is_in_flight());
            assert_eq!(form.status(), Some("Please answer every questionnaire item."));
        }
        assert!(sent.is_empty());
    }

    #[test]
    fn test_missing_image_prompt_wins() {
        let mut form = TestForm::new();
        assert_eq!(form.begin_submit(), Err(UploadBlocked::MissingEcgImage));
        assert_eq!(form.status(), Some("Please attach an ECG image."));

        let mut form = ready_form();
        form.ecg = None;
        assert_eq!(form.begin_submit(), Err(UploadBlocked::MissingEcgImage));
    }

    #[test]
    fn test_cleared_images_are_not_sent() {
        let mut form = ready_form();
        form.attach_checkup(image("checkup.jpg"));
        form.clear_checkup();
        let request = form.begin_submit().unwrap();
        assert!(request.checkup.is_none());
        assert_eq!(request.endpoint, "/api/public/upload-ecgImage-lead2only");

        let mut form = ready_form();
        form.clear_ecg();
        assert!(form.ecg().is_none());
        assert_eq!(form.begin_submit(), Err(UploadBlocked::MissingEcgImage));
    }

    #[test]
    fn test_endpoint_depends_only_on_checkup() {
        let mut without = ready_form();
        let plain = without.begin_submit().unwrap();

        let mut with = ready_form();
        with.attach_checkup(image("checkup.jpg"));
        let both = with.begin_submit().unwrap();

        assert_eq!(plain.endpoint, "/api/public/upload-ecgImage-lead2only");
        assert_eq!(both.endpoint, "/api/public/upload-ecgImage-lead2only-with-checkup");
        assert_eq!(plain.ecg, both.ecg);
        assert_eq!(plain.questionnaire_json, both.questionnaire_json);
        assert!(plain.checkup.is_none());
        assert_eq!(both.checkup.map(|c| c.name), Some("checkup.jpg".to_string()));
    }

    #[test]
    fn test_single_request_in_flight() {
        let mut form = ready_form();
        assert!(form.begin_submit().is_ok());
        assert_eq!(form.begin_submit(), Err(UploadBlocked::InFlight));

        form.finish(Err(ClientError::Transport("reset".into())));
        assert!(!form.is_in_flight());
        assert_eq!(form.status(), Some(STATUS_SERVER_ERROR));
        assert!(form.begin_submit().is_ok());
    }

    #[test]
    fn test_finish_statuses() {
        let mut form = ready_form();
        form.begin_submit().unwrap();
        assert!(form
            .finish(Err(ClientError::Status { status: 500, message: None }))
            .is_none());
        assert_eq!(form.status(), Some(STATUS_FAILED));

        form.begin_submit().unwrap();
        assert_eq!(form.finish(Ok(sample_result())), Some(sample_result()));
        assert_eq!(form.status(), Some(STATUS_SUCCESS));
    }

    #[test]
    fn test_attachment_type_check() {
        assert!(Attachment::new((), "scan.gif", "image/gif").is_err());
        assert_eq!(mime_for_path("ECG.JPG"), "image/jpeg");
        assert_eq!(mime_for_path("lead2.png"), "image/png");
    }
}
