//! UI Components
//!
//! Reusable Leptos components for the dashboard.

pub mod access_gate;
pub mod charts;
pub mod clinician_panel;
pub mod loading;
pub mod login_form;
pub mod modal;
pub mod nav_user;
pub mod result_dashboard;
pub mod shell;
pub mod upload_form;

pub use access_gate::{DenialModal, RoleGate};
pub use clinician_panel::ClinicianPanelView;
pub use loading::Loading;
pub use result_dashboard::ResultDashboard;
pub use shell::Shell;
pub use upload_form::UploadForm;
