//! Shared API types and session-token helpers

pub mod auth;
pub mod types;
