//! Analysis result types
//!
//! Structure returned by the backend for one ECG upload. Field names follow
//! the backend's JSON exactly; everything after `feature_importance` is
//! optional because older analysis pipelines do not produce it.

use serde::{Deserialize, Serialize};

/// Binary classification produced by the ECG model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Normal,
    Abnormal,
}

impl Classification {
    pub fn from_label(label: u8) -> Self {
        if label == 0 {
            Classification::Normal
        } else {
            Classification::Abnormal
        }
    }
}

/// One sample of the extracted lead-II waveform
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EcgSample {
    #[serde(rename = "Time (s)")]
    pub time: f64,
    #[serde(rename = "Voltage (mV)")]
    pub voltage: f64,
}

/// Per-modality contribution to the classification, in percent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureImportance {
    #[serde(default)]
    pub image: f64,
    #[serde(default)]
    pub signal: f64,
    /// Questionnaire (cardiac risk factors)
    #[serde(default)]
    pub crf: f64,
    #[serde(default)]
    pub wt: f64,
    #[serde(default)]
    pub age: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sbp: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dbp: Option<f64>,
}

impl FeatureImportance {
    /// Named entries in display order, optional vascular features only when
    /// the backend sent them
    pub fn entries(&self) -> Vec<(&'static str, f64)> {
        let mut entries = vec![
            ("ECG image", self.image),
            ("ECG signal", self.signal),
            ("Questionnaire", self.crf),
            ("Weight", self.wt),
            ("Age", self.age),
        ];
        if let Some(sbp) = self.sbp {
            entries.push(("Systolic BP", sbp));
        }
        if let Some(dbp) = self.dbp {
            entries.push(("Diastolic BP", dbp));
        }
        entries
    }
}

/// Generated free-text reading of the waveform
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WaveformInterpretation {
    #[serde(rename = "RR 간격", default)]
    pub rr_interval: Option<String>,
    #[serde(rename = "QRS 파형", default)]
    pub qrs_complex: Option<String>,
    #[serde(rename = "T파", default)]
    pub t_wave: Option<String>,
    #[serde(rename = "P파", default)]
    pub p_wave: Option<String>,
    #[serde(rename = "임상 권고", default)]
    pub recommendation: Option<String>,
}

/// Vascular (pulse wave velocity) risk report body.
///
/// Newer backends send the report already split into a summary and a
/// detail section; older ones send a single string, which is shown whole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VascularReport {
    Structured { summary: String, detail: String },
    Plain(String),
}

impl VascularReport {
    /// Report sections to render, in order
    pub fn sections(&self) -> Vec<&str> {
        match self {
            VascularReport::Structured { summary, detail } => {
                vec![summary.as_str(), detail.as_str()]
            }
            VascularReport::Plain(body) => vec![body.as_str()],
        }
    }
}

/// Full analysis result for one upload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub label: u8,
    pub probability: f64,
    pub ecg_signal: Vec<EcgSample>,
    /// Base64-encoded Grad-CAM PNG
    pub heatmap: String,
    #[serde(default)]
    pub feature_importance: FeatureImportance,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpt_result: Option<WaveformInterpretation>,
    /// Probability pair (low risk, high risk)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pwv_shap_prob: Option<[f64; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pwv_shap_report: Option<VascularReport>,
    /// Base64-encoded SHAP chart PNG
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pwv_shap_img_base64: Option<String>,
}

impl AnalysisResult {
    pub fn classification(&self) -> Classification {
        Classification::from_label(self.label)
    }

    /// Whether any secondary vascular risk output is present
    pub fn has_vascular_risk(&self) -> bool {
        self.pwv_shap_prob.is_some()
            || self.pwv_shap_report.is_some()
            || self.pwv_shap_img_base64.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"{
        "label": 1,
        "probability": 0.91,
        "ecg_signal": [{"Time (s)": 0.0, "Voltage (mV)": 0.12}, {"Time (s)": 0.5, "Voltage (mV)": -0.3}],
        "heatmap": "iVBORw0KGgo=",
        "feature_importance": {"image": 41.2, "signal": 33.0, "crf": 25.8, "wt": 10.1, "age": 15.7}
    }"#;

    #[test]
    fn test_minimal_result_parses() {
        let result: AnalysisResult = serde_json::from_str(MINIMAL).unwrap();
        assert_eq!(result.classification(), Classification::Abnormal);
        assert_eq!(result.ecg_signal.len(), 2);
        assert_eq!(result.ecg_signal[1].voltage, -0.3);
        assert!(result.gpt_result.is_none());
        assert!(!result.has_vascular_risk());
        assert_eq!(result.feature_importance.entries().len(), 5);
    }

    #[test]
    fn test_optional_fields_parse() {
        let json = r#"{
            "label": 0,
            "probability": 0.12,
            "ecg_signal": [],
            "heatmap": "",
            "feature_importance": {"image": 1, "signal": 2, "crf": 3, "wt": 4, "age": 5, "sbp": 6, "dbp": 7},
            "gpt_result": {"RR 간격": "regular", "QRS 파형": "narrow", "T파": "upright", "P파": "normal", "임상 권고": "routine follow-up"},
            "pwv_shap_prob": [0.7, 0.3],
            "pwv_shap_report": {"summary": "low vascular risk", "detail": "age contributes most"}
        }"#;
        let result: AnalysisResult = serde_json::from_str(json).unwrap();
        assert!(result.has_vascular_risk());
        assert_eq!(result.feature_importance.entries().len(), 7);
        let gpt = result.gpt_result.unwrap();
        assert_eq!(gpt.recommendation.as_deref(), Some("routine follow-up"));
        assert_eq!(
            result.pwv_shap_report.unwrap().sections(),
            vec!["low vascular risk", "age contributes most"]
        );
    }

    #[test]
    fn test_plain_report_is_single_section() {
        let report: VascularReport = serde_json::from_str(r#""one block of text""#).unwrap();
        assert_eq!(report.sections(), vec!["one block of text"]);
    }
}
