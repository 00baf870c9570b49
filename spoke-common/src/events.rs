//! Event types for the client editing session
//!
//! Emitted over a tokio broadcast channel by the sync policy so UI layers can
//! show save/degraded indicators without polling.

use serde::{Deserialize, Serialize};

/// Session lifecycle events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SessionEvent {
    /// A remote write succeeded
    Saved {
        assessment_id: String,
        /// true for the first write (create), false for updates
        created: bool,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// A remote write failed; state was written to the local cache instead
    DegradedMode {
        reason: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// The draft was reset to a fresh unsaved record
    DraftReset {
        timestamp: chrono::DateTime<chrono::Utc>,
    },
}
