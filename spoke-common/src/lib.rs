//! # Spoke Common Library
//!
//! Shared code for the Spoke assessment modules including:
//! - Schema registry (themes and metrics)
//! - Scoring record engine (clamping, validation, averages)
//! - CSV import/export codecs
//! - Database models and initialization
//! - Session token helpers
//! - Configuration loading

pub mod api;
pub mod config;
pub mod csv;
pub mod db;
pub mod error;
pub mod events;
pub mod record;
pub mod schema;
pub mod time;

pub use error::{Error, Result};
