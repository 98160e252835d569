//! State Management
//!
//! Session handle and request scoping.

pub mod scope;
pub mod session;

pub use scope::FetchScope;
pub use session::SessionHandle;
