//! Patient types for the clinician panel

use std::collections::HashMap;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Risk status attached to a patient in the list view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatientStatus {
    Normal,
    AtRisk,
    HighRisk,
    Unclassified,
}

impl PatientStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PatientStatus::Normal => "normal",
            PatientStatus::AtRisk => "at-risk",
            PatientStatus::HighRisk => "high-risk",
            PatientStatus::Unclassified => "unclassified",
        }
    }

    pub fn from_wire(s: &str) -> Self {
        match s {
            "normal" => PatientStatus::Normal,
            "at-risk" => PatientStatus::AtRisk,
            "high-risk" => PatientStatus::HighRisk,
            _ => PatientStatus::Unclassified,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PatientStatus::Normal => "Normal",
            PatientStatus::AtRisk => "At risk",
            PatientStatus::HighRisk => "High risk",
            PatientStatus::Unclassified => "Unclassified",
        }
    }
}

impl Serialize for PatientStatus {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PatientStatus {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(PatientStatus::from_wire(&raw))
    }
}

/// Row of the patient list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientSummary {
    pub id: u64,
    pub name: String,
    pub status: PatientStatus,
}

/// Risk factors scored by the backend, in rubric display order
pub const RISK_FACTORS: [(&str, &str); 10] = [
    ("age", "Age"),
    ("sex", "Sex"),
    ("smoking", "Smoking"),
    ("hypertension", "Hypertension"),
    ("diabetes", "Diabetes"),
    ("dyslipidemia", "Dyslipidemia"),
    ("obesity", "Obesity"),
    ("family_history", "Family history"),
    ("physical_activity", "Physical activity"),
    ("ecg_abnormality", "ECG abnormality"),
];

/// Per-patient risk score breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientDetail {
    pub patient_id: u64,
    pub total_score: f64,
    pub risk_class: String,
    #[serde(default)]
    pub score_dict: HashMap<String, f64>,
}

/// One line of the fixed risk rubric
#[derive(Debug, Clone, PartialEq)]
pub struct RubricRow {
    pub key: &'static str,
    pub label: &'static str,
    /// `None` when the backend omitted the factor
    pub points: Option<f64>,
}

impl PatientDetail {
    /// The ten rubric rows, whatever keys the response carried
    pub fn rubric(&self) -> Vec<RubricRow> {
        RISK_FACTORS
            .iter()
            .map(|(key, label)| RubricRow {
                key,
                label,
                points: self.score_dict.get(*key).copied(),
            })
            .collect()
    }
}

/// Historical total score for a patient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreHistoryEntry {
    pub id: u64,
    pub patient_id: u64,
    pub score: f64,
    pub timestamp: String,
}

impl ScoreHistoryEntry {
    /// Parse the timestamp, accepting RFC 3339 or a bare local datetime
    pub fn recorded_at(&self) -> Option<DateTime<Utc>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(&self.timestamp) {
            return Some(dt.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(&self.timestamp, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.and_utc())
    }

    /// Short "Mon 3" style label for chart axes
    pub fn short_date(&self) -> String {
        self.recorded_at()
            .map(|dt| dt.format("%b %-d").to_string())
            .unwrap_or_else(|| self.timestamp.clone())
    }
}

/// Backend returns history newest first; charts read oldest first
pub fn chronological(mut history: Vec<ScoreHistoryEntry>) -> Vec<ScoreHistoryEntry> {
    history.reverse();
    history
}
