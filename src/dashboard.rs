//! Result Dashboard view model
//!
//! Everything the result dashboard shows is derived here from one
//! [`AnalysisResult`] plus the heatmap overlay flag. No network access.

use crate::model::{AnalysisResult, Classification, WaveformInterpretation};

/// Probability at or above which an abnormal result is urgent
pub const URGENT_PROBABILITY: f64 = 0.85;

/// Placeholder for narrative fields the backend did not fill
pub const NO_CONTENT: &str = "No content";

/// Risk message chosen from label and probability
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskNarrative {
    Reassurance,
    ModerateWarning,
    UrgentWarning,
}

impl RiskNarrative {
    pub fn for_result(label: u8, probability: f64) -> Self {
        match Classification::from_label(label) {
            Classification::Normal => RiskNarrative::Reassurance,
            Classification::Abnormal if probability < URGENT_PROBABILITY => {
                RiskNarrative::ModerateWarning
            }
            Classification::Abnormal => RiskNarrative::UrgentWarning,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            RiskNarrative::Reassurance => {
                "Your signal is within the normal range. Keep up your regular check-ups."
            }
            RiskNarrative::ModerateWarning => {
                "An irregular signal was detected. If irregularities keep appearing, please visit a hospital."
            }
            RiskNarrative::UrgentWarning => {
                "A high likelihood of an abnormal heartbeat was found. Please consult a medical professional."
            }
        }
    }
}

/// Round a percentage to one decimal place
pub fn round_percent(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Slice of the feature-importance chart
#[derive(Debug, Clone, PartialEq)]
pub struct ImportanceSlice {
    pub name: &'static str,
    pub percent: f64,
    pub color: &'static str,
}

const SLICE_COLORS: [&str; 7] = [
    "#facc15", "#4ade80", "#f97316", "#60a5fa", "#c084fc", "#f472b6", "#2dd4bf",
];

/// Dashboard for one analysis result
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    result: AnalysisResult,
    show_heatmap: bool,
}

impl DashboardView {
    pub fn new(result: AnalysisResult) -> Self {
        Self {
            result,
            show_heatmap: false,
        }
    }

    pub fn result(&self) -> &AnalysisResult {
        &self.result
    }

    pub fn show_heatmap(&self) -> bool {
        self.show_heatmap
    }

    /// Flip the Grad-CAM overlay. Purely local.
    pub fn toggle_heatmap(&mut self) {
        self.show_heatmap = !self.show_heatmap;
    }

    pub fn heatmap_button_label(&self) -> &'static str {
        if self.show_heatmap {
            "Hide key regions"
        } else {
            "Show key regions"
        }
    }

    pub fn verdict(&self) -> &'static str {
        match self.result.classification() {
            Classification::Normal => "Normal",
            Classification::Abnormal => "Abnormal",
        }
    }

    /// Model probability as a percentage with one decimal
    pub fn probability_text(&self) -> String {
        format!("{:.1}%", self.result.probability * 100.0)
    }

    pub fn narrative(&self) -> RiskNarrative {
        RiskNarrative::for_result(self.result.label, self.result.probability)
    }

    pub fn importance_slices(&self) -> Vec<ImportanceSlice> {
        self.result
            .feature_importance
            .entries()
            .into_iter()
            .enumerate()
            .map(|(idx, (name, value))| ImportanceSlice {
                name,
                percent: round_percent(value),
                color: SLICE_COLORS[idx % SLICE_COLORS.len()],
            })
            .collect()
    }

    /// Sentence explaining how the three input modalities were weighted
    pub fn importance_note(&self) -> String {
        let fi = &self.result.feature_importance;
        format!(
            "This result weighs the ECG image, the ECG signal and the questionnaire at {:.1}%, {:.1}% and {:.1}% respectively.",
            round_percent(fi.image),
            round_percent(fi.signal),
            round_percent(fi.crf)
        )
    }

    /// Whole-second tick positions for the waveform x axis
    pub fn time_ticks(&self) -> Vec<f64> {
        let max_time = self
            .result
            .ecg_signal
            .iter()
            .map(|s| s.time)
            .fold(f64::NEG_INFINITY, f64::max);
        if !max_time.is_finite() || max_time < 0.0 {
            return Vec::new();
        }
        (0..=max_time.floor() as u32).map(f64::from).collect()
    }

    /// Waveform reading cards, in display order
    pub fn waveform_sections(&self) -> Vec<(&'static str, String)> {
        let empty = WaveformInterpretation::default();
        let gpt = self.result.gpt_result.as_ref().unwrap_or(&empty);
        [
            ("RR interval", &gpt.rr_interval),
            ("QRS complex", &gpt.qrs_complex),
            ("T wave", &gpt.t_wave),
            ("P wave", &gpt.p_wave),
        ]
        .into_iter()
        .map(|(title, text)| (title, text.clone().unwrap_or_else(|| NO_CONTENT.to_string())))
        .collect()
    }

    pub fn recommendation(&self) -> String {
        self.result
            .gpt_result
            .as_ref()
            .and_then(|g| g.recommendation.clone())
            .unwrap_or_else(|| NO_CONTENT.to_string())
    }

    /// Secondary vascular risk card, when the backend produced one
    pub fn vascular_card(&self) -> Option<VascularCard> {
        if !self.result.has_vascular_risk() {
            return None;
        }
        Some(VascularCard {
            high_risk_percent: self
                .result
                .pwv_shap_prob
                .map(|[_, high]| round_percent(high * 100.0)),
            sections: self
                .result
                .pwv_shap_report
                .as_ref()
                .map(|r| r.sections().into_iter().map(str::to_string).collect())
                .unwrap_or_default(),
            chart_base64: self.result.pwv_shap_img_base64.clone(),
        })
    }
}

/// Rendered content of the vascular risk card
#[derive(Debug, Clone, PartialEq)]
pub struct VascularCard {
    pub high_risk_percent: Option<f64>,
    pub sections: Vec<String>,
    pub chart_base64: Option<String>,
}

impl VascularCard {
    pub fn report_is_split(&self) -> bool {
        self.sections.len() > 1
    }
}

/// Data URL for a base64 PNG returned by the backend
pub fn png_data_url(base64: &str) -> String {
    format!("data:image/png;base64,{}", base64)
}
