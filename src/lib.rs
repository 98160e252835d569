//! # Cardioscope
//!
//! ECG screening dashboard. Patients upload an ECG image with a screening
//! questionnaire and an external analysis backend classifies it; clinicians
//! browse patients and their risk scores.
//!
//! This crate holds every rule of the dashboard in plain Rust so the Leptos
//! frontend, the CLI and the tests share one implementation.
//!
//! ## Modules
//!
//! - [`model`]: Wire types exchanged with the backend
//! - [`session`]: Who is signed in
//! - [`auth`]: Login / signup form
//! - [`questionnaire`], [`upload`]: Upload form validation and request building
//! - [`dashboard`]: View model of an analysis result
//! - [`clinician`]: Clinician panel state machine
//! - [`gate`]: Role-based access gate
//! - [`scope`]: Cancellation of view-owned requests
//! - [`routes`], [`landing`]: Client-side routes and the landing page
//!
//! With the default `native` feature:
//!
//! - [`client`]: reqwest backend client
//! - [`config`], [`logging`]: Configuration files and tracing setup
//! - [`server`]: Dev server serving the UI and forwarding `/api`
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cardioscope::client::{Backend, HttpBackend};
//! use cardioscope::config::Config;
//! use cardioscope::session::SessionStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load_default();
//!     let backend = HttpBackend::from_config(&config.backend)?;
//!
//!     let mut store = SessionStore::new();
//!     store.adopt_identity(backend.me().await);
//!
//!     match store.current() {
//!         Some(session) => println!("Signed in as {}", session.username),
//!         None => println!("Anonymous"),
//!     }
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod clinician;
pub mod dashboard;
pub mod endpoints;
pub mod error;
pub mod gate;
pub mod landing;
pub mod model;
pub mod questionnaire;
pub mod routes;
pub mod scope;
pub mod session;
pub mod upload;

#[cfg(feature = "native")]
pub mod client;
#[cfg(feature = "native")]
pub mod config;
#[cfg(feature = "native")]
pub mod logging;
#[cfg(feature = "native")]
pub mod server;

// Re-export top-level types for convenience
pub use error::{ClientError, ClientResult};

pub use model::{AnalysisResult, PatientDetail, PatientSummary, Role, ScoreHistoryEntry, Session};

pub use session::SessionStore;

pub use gate::{AccessGate, Denial, GateDecision};

pub use scope::ViewScope;
