//! Database models

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A registered user account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub guid: String,
    pub name: String,
    pub created_at: String,
}

/// A persisted scoring record
///
/// `ratings` maps every metric identifier to an integer rating in [0, 5];
/// completeness is enforced before a record reaches storage. Owner identity
/// (`user_guid`) is immutable once the record is created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assessment {
    pub guid: String,
    pub user_guid: String,
    /// Free-text subject name, sanitized before display and filename use
    pub subject_name: String,
    /// Assessment date in `YYYY-MM-DD` form
    pub assessment_date: String,
    pub ratings: BTreeMap<String, i64>,
    pub created_at: String,
    pub updated_at: String,
}
