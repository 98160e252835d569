//! Clinician Panel
//!
//! State machine behind the clinician view. It performs no I/O: each
//! transition returns the fetches the view must start, so every refetch
//! trigger is explicit.
//!
//! - Entry requires the professional role (see [`crate::gate`]).
//! - The patient list is fetched on entry, and by default again whenever the
//!   selected patient changes ([`ListRefresh::FollowSelection`]).
//! - When the list arrives with nothing selected, the first patient is
//!   selected automatically.
//! - Only one detail fetch runs at a time; selections made meanwhile are
//!   dropped, not queued.

use crate::error::ClientResult;
use crate::gate::{AccessGate, Denial, GateDecision};
use crate::routes::Route;
use crate::model::{chronological, PatientDetail, PatientSummary, ScoreHistoryEntry, Session};

/// Fetch the view must start
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelCommand {
    FetchPatients,
    FetchDetail(u64),
    FetchHistory(u64),
}

/// When the patient list is re-requested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListRefresh {
    /// Refetch the list each time the selected patient changes
    #[default]
    FollowSelection,
    /// Fetch the list once when the panel is entered
    OnEntry,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelState {
    Unauthorized,
    Loading,
    Loaded,
}

/// Traffic-light colour used by the score widgets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskColor {
    Green,
    Amber,
    Red,
}

impl RiskColor {
    pub fn hex(self) -> &'static str {
        match self {
            RiskColor::Green => "#22c55e",
            RiskColor::Amber => "#eab308",
            RiskColor::Red => "#ef4444",
        }
    }
}

/// Colour of the radial total-score gauge
pub fn gauge_color(score: f64) -> RiskColor {
    if score < 30.0 {
        RiskColor::Green
    } else if score < 60.0 {
        RiskColor::Amber
    } else {
        RiskColor::Red
    }
}

/// Colour of one bar in the score history chart
pub fn history_color(score: f64) -> RiskColor {
    if score >= 80.0 {
        RiskColor::Red
    } else if score >= 50.0 {
        RiskColor::Amber
    } else {
        RiskColor::Green
    }
}

/// Fraction of the gauge ring to fill for a 0–100 score
pub fn gauge_fraction(score: f64) -> f64 {
    (score / 100.0).clamp(0.0, 1.0)
}

/// Clinician panel state
#[derive(Debug, Clone)]
pub struct ClinicianPanel {
    gate: Option<AccessGate>,
    refresh: ListRefresh,
    authorized: bool,
    list_loaded: bool,
    patients: Vec<PatientSummary>,
    selected: Option<u64>,
    detail: Option<PatientDetail>,
    history: Vec<ScoreHistoryEntry>,
    detail_busy: bool,
    error: Option<String>,
}

impl Default for ClinicianPanel {
    fn default() -> Self {
        Self::new(ListRefresh::default())
    }
}

impl ClinicianPanel {
    pub fn new(refresh: ListRefresh) -> Self {
        Self {
            gate: Route::Professional.gate(),
            refresh,
            authorized: false,
            list_loaded: false,
            patients: Vec::new(),
            selected: None,
            detail: None,
            history: Vec::new(),
            detail_busy: false,
            error: None,
        }
    }

    pub fn state(&self) -> PanelState {
        if !self.authorized {
            PanelState::Unauthorized
        } else if !self.list_loaded {
            PanelState::Loading
        } else {
            PanelState::Loaded
        }
    }

    pub fn patients(&self) -> &[PatientSummary] {
        &self.patients
    }

    pub fn selected(&self) -> Option<u64> {
        self.selected
    }

    pub fn detail(&self) -> Option<&PatientDetail> {
        self.detail.as_ref()
    }

    /// Score history, oldest first
    pub fn history(&self) -> &[ScoreHistoryEntry] {
        &self.history
    }

    pub fn is_detail_busy(&self) -> bool {
        self.detail_busy
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Run the role gate. Admission starts the list fetch.
    pub fn enter(&mut self, session: Option<&Session>) -> Result<Vec<PanelCommand>, Denial> {
        let decision = self.gate.map_or(GateDecision::Allow, |gate| gate.check(session));
        match decision {
            GateDecision::Allow => {
                self.authorized = true;
                Ok(vec![PanelCommand::FetchPatients])
            }
            GateDecision::Deny(denial) => {
                self.authorized = false;
                Err(denial)
            }
        }
    }

    /// Apply a patient list response
    pub fn on_patients(&mut self, response: ClientResult<Vec<PatientSummary>>) -> Vec<PanelCommand> {
        if !self.authorized {
            return Vec::new();
        }
        match response {
            Ok(patients) => {
                tracing::debug!(count = patients.len(), "Patient list loaded");
                self.list_loaded = true;
                self.error = None;
                let first = patients.first().map(|p| p.id);
                self.patients = patients;
                match (self.selected, first) {
                    (None, Some(id)) => self.select(id),
                    _ => Vec::new(),
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load patient list");
                self.list_loaded = true;
                self.error = Some(if e.is_unauthorized() {
                    "Your clinician session has expired. Please sign in again.".to_string()
                } else {
                    "Could not load the patient list.".to_string()
                });
                Vec::new()
            }
        }
    }

    /// Select a patient row. Ignored while a detail fetch is outstanding.
    pub fn select(&mut self, id: u64) -> Vec<PanelCommand> {
        if !self.authorized {
            return Vec::new();
        }
        if self.detail_busy {
            tracing::debug!(patient_id = id, "Selection dropped, detail fetch in progress");
            return Vec::new();
        }

        let changed = self.selected != Some(id);
        if changed {
            self.detail = None;
            self.history.clear();
        }
        self.selected = Some(id);
        self.detail_busy = true;

        let mut commands = vec![PanelCommand::FetchDetail(id), PanelCommand::FetchHistory(id)];
        if changed && self.refresh == ListRefresh::FollowSelection {
            commands.push(PanelCommand::FetchPatients);
        }
        commands
    }

    /// Apply a detail response and release the busy flag
    pub fn on_detail(&mut self, id: u64, response: ClientResult<PatientDetail>) {
        if self.selected != Some(id) {
            return;
        }
        self.detail_busy = false;
        match response {
            Ok(detail) => {
                self.error = None;
                self.detail = Some(detail);
            }
            Err(e) => {
                tracing::warn!(patient_id = id, error = %e, "Failed to load patient detail");
                self.error = Some("Could not load the patient detail.".to_string());
            }
        }
    }

    /// Apply a score history response. Failures leave the chart empty.
    pub fn on_history(&mut self, id: u64, response: ClientResult<Vec<ScoreHistoryEntry>>) {
        if self.selected != Some(id) {
            return;
        }
        match response {
            Ok(history) => self.history = chronological(history),
            Err(e) => {
                tracing::warn!(patient_id = id, error = %e, "Failed to load score history");
                self.history.clear();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use crate::model::{PatientStatus, Role};

    fn pro() -> Session {
        Session::new("dr.kim", Role::Professional)
    }

    fn patients() -> Vec<PatientSummary> {
        vec![
            PatientSummary { id: 11, name: "A".into(), status: PatientStatus::Normal },
            PatientSummary { id: 12, name: "B".into(), status: PatientStatus::HighRisk },
        ]
    }

    fn detail(id: u64) -> PatientDetail {
        PatientDetail {
            patient_id: id,
            total_score: 42.0,
            risk_class: "at-risk".into(),
            score_dict: Default::default(),
        }
    }

    fn count_detail_fetches(commands: &[PanelCommand]) -> usize {
        commands
            .iter()
            .filter(|c| matches!(c, PanelCommand::FetchDetail(_)))
            .count()
    }

    #[test]
    fn test_denied_without_professional_role() {
        let mut panel = ClinicianPanel::default();
        assert!(panel.enter(None).is_err());
        assert!(panel.enter(Some(&Session::new("lee", Role::Ordinary))).is_err());
        assert_eq!(panel.state(), PanelState::Unauthorized);
        assert!(panel.select(11).is_empty());
    }

    #[test]
    fn test_first_patient_auto_selected_once() {
        let mut panel = ClinicianPanel::default();
        assert_eq!(panel.enter(Some(&pro())).unwrap(), vec![PanelCommand::FetchPatients]);
        assert_eq!(panel.state(), PanelState::Loading);

        let mut issued = panel.on_patients(Ok(patients()));
        assert_eq!(
            issued,
            vec![
                PanelCommand::FetchDetail(11),
                PanelCommand::FetchHistory(11),
                PanelCommand::FetchPatients
            ]
        );
        assert_eq!(panel.state(), PanelState::Loaded);

        // The selection-driven list refetch must not select again
        panel.on_detail(11, Ok(detail(11)));
        issued.extend(panel.on_patients(Ok(patients())));
        assert_eq!(count_detail_fetches(&issued), 1);
        assert_eq!(panel.selected(), Some(11));
    }

    #[test]
    fn test_selection_dropped_while_busy() {
        let mut panel = ClinicianPanel::new(ListRefresh::OnEntry);
        panel.enter(Some(&pro())).unwrap();
        panel.on_patients(Ok(patients()));
        assert!(panel.is_detail_busy());

        assert!(panel.select(12).is_empty());
        assert_eq!(panel.selected(), Some(11));

        panel.on_detail(11, Ok(detail(11)));
        assert_eq!(
            panel.select(12),
            vec![PanelCommand::FetchDetail(12), PanelCommand::FetchHistory(12)]
        );
    }

    #[test]
    fn test_empty_list_selects_nothing() {
        let mut panel = ClinicianPanel::default();
        panel.enter(Some(&pro())).unwrap();
        assert!(panel.on_patients(Ok(Vec::new())).is_empty());
        assert_eq!(panel.state(), PanelState::Loaded);
        assert_eq!(panel.selected(), None);
    }

    #[test]
    fn test_detail_failure_releases_busy_flag() {
        let mut panel = ClinicianPanel::new(ListRefresh::OnEntry);
        panel.enter(Some(&pro())).unwrap();
        panel.on_patients(Ok(patients()));
        panel.on_detail(11, Err(ClientError::Transport("timeout".into())));
        assert!(!panel.is_detail_busy());
        assert!(panel.error().is_some());
        assert!(panel.detail().is_none());
    }

    #[test]
    fn test_failed_detail_does_not_show_previous_patient() {
        let mut panel = ClinicianPanel::new(ListRefresh::OnEntry);
        panel.enter(Some(&pro())).unwrap();
        panel.on_patients(Ok(patients()));
        panel.on_detail(11, Ok(detail(11)));
        panel.on_history(11, Ok(vec![ScoreHistoryEntry {
            id: 1,
            patient_id: 11,
            score: 40.0,
            timestamp: "2024-04-02T09:00:00Z".into(),
        }]));

        panel.select(12);
        panel.on_detail(12, Err(ClientError::Status { status: 500, message: None }));

        assert_eq!(panel.selected(), Some(12));
        assert!(!panel.is_detail_busy());
        assert!(panel.detail().is_none());
        assert!(panel.history().is_empty());
    }

    #[test]
    fn test_reselecting_same_patient_keeps_detail() {
        let mut panel = ClinicianPanel::new(ListRefresh::OnEntry);
        panel.enter(Some(&pro())).unwrap();
        panel.on_patients(Ok(patients()));
        panel.on_detail(11, Ok(detail(11)));

        panel.select(11);
        assert_eq!(panel.detail().map(|d| d.patient_id), Some(11));
    }

    #[test]
    fn test_expired_session_message_on_list_failure() {
        let mut panel = ClinicianPanel::default();
        panel.enter(Some(&pro())).unwrap();
        panel.on_patients(Err(ClientError::Status { status: 401, message: None }));
        assert!(panel.error().unwrap().contains("sign in again"));

        let mut panel = ClinicianPanel::default();
        panel.enter(Some(&pro())).unwrap();
        panel.on_patients(Err(ClientError::Transport("refused".into())));
        assert_eq!(panel.error(), Some("Could not load the patient list."));
    }

    #[test]
    fn test_history_is_chronological() {
        let mut panel = ClinicianPanel::default();
        panel.enter(Some(&pro())).unwrap();
        panel.on_patients(Ok(patients()));
        let history = vec![
            ScoreHistoryEntry { id: 2, patient_id: 11, score: 60.0, timestamp: "2024-05-02T09:00:00Z".into() },
            ScoreHistoryEntry { id: 1, patient_id: 11, score: 40.0, timestamp: "2024-04-02T09:00:00Z".into() },
        ];
        panel.on_history(11, Ok(history));
        assert_eq!(panel.history()[0].id, 1);

        // Responses for another patient are ignored
        panel.on_history(99, Ok(Vec::new()));
        assert_eq!(panel.history().len(), 2);
    }

    #[test]
    fn test_gauge_color_boundaries() {
        assert_eq!(gauge_color(29.0), RiskColor::Green);
        assert_eq!(gauge_color(30.0), RiskColor::Amber);
        assert_eq!(gauge_color(59.0), RiskColor::Amber);
        assert_eq!(gauge_color(60.0), RiskColor::Red);
    }

    #[test]
    fn test_history_color_boundaries() {
        assert_eq!(history_color(49.0), RiskColor::Green);
        assert_eq!(history_color(50.0), RiskColor::Amber);
        assert_eq!(history_color(79.0), RiskColor::Amber);
        assert_eq!(history_color(80.0), RiskColor::Red);
        assert_eq!(gauge_fraction(150.0), 1.0);
    }
}
