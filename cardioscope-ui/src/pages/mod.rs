//! Pages
//!
//! Top-level page components for each route.

pub mod intro;
pub mod professional;
pub mod user;

pub use intro::Intro;
pub use professional::Professional;
pub use user::User;
