//! Cardioscope Dashboard
//!
//! ECG screening dashboard built with Leptos (WASM).
//!
//! # Features
//!
//! - ECG image + questionnaire upload with AI result rendering
//! - Clinician panel with patient risk scores and history
//! - Role-gated views
//!
//! # Architecture
//!
//! This is a client-side rendered (CSR) Leptos application that compiles to
//! WebAssembly. Every rule (validation, gating, panel transitions, result
//! formatting) lives in the `cardioscope` crate; this crate renders it and
//! talks to the backend over HTTP.

use leptos::*;

mod api;
mod app;
mod components;
mod pages;
mod state;

fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    // Mount the app to the document body
    mount_to_body(|| view! { <app::App /> });
}
