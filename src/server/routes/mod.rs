//! Dev server route handlers

pub mod health;
pub mod proxy;
