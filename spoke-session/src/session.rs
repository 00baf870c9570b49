//! The in-memory scoring draft and its persistence lifecycle
//!
//! A draft is Unsaved until its first successful create binds a durable
//! identity; any edit since the last successful write marks it Dirty. The
//! draft is an explicitly owned value: multiple independent sessions can
//! coexist (there is no ambient "current record").

use spoke_common::record::{clamp_rating, compute_averages, Averages};
use spoke_common::schema;
use std::collections::BTreeMap;

/// Persistence relationship of the draft
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binding {
    /// No durable identity bound yet; next write is a create
    Unsaved,
    /// Bound to a remote record; next write is an update
    Bound(String),
}

/// The editable in-memory scoring record
///
/// Ratings are f64 and merely clamped on entry; the persistence boundary is
/// where integer-only enforcement happens. Partial mappings are fine here -
/// missing metrics read as 0.
#[derive(Debug, Clone)]
pub struct Draft {
    pub subject_name: String,
    pub ratings: BTreeMap<String, f64>,
    pub binding: Binding,
    /// Any edit since the last successful write
    pub dirty: bool,
    /// Suppresses all edits and writes (viewing someone else's record)
    pub read_only: bool,
    /// Bumped whenever the session moves to a different record; in-flight
    /// save responses for an older epoch are dropped
    pub(crate) epoch: u64,
    /// Bumped on every edit; lets a completed save tell whether edits
    /// arrived while it was in flight
    pub(crate) revision: u64,
}

impl Draft {
    pub(crate) fn new() -> Self {
        Self {
            subject_name: String::new(),
            ratings: BTreeMap::new(),
            binding: Binding::Unsaved,
            dirty: false,
            read_only: false,
            epoch: 0,
            revision: 0,
        }
    }

    /// Reset to a fresh unsaved record, keeping epoch/revision counters moving
    pub(crate) fn reset(&mut self) {
        self.subject_name.clear();
        self.ratings.clear();
        self.binding = Binding::Unsaved;
        self.dirty = false;
        self.read_only = false;
        self.epoch += 1;
        self.revision += 1;
    }

    pub(crate) fn set_rating(&mut self, metric: &str, value: f64) {
        self.ratings.insert(metric.to_string(), clamp_rating(value));
        self.dirty = true;
        self.revision += 1;
    }

    pub(crate) fn set_subject(&mut self, name: &str) {
        self.subject_name = name.to_string();
        self.dirty = true;
        self.revision += 1;
    }

    /// The full mapping sent to the store: every metric present, missing
    /// entries filled with 0
    pub fn full_ratings(&self) -> BTreeMap<String, f64> {
        schema::metric_ids()
            .iter()
            .map(|id| (id.to_string(), self.ratings.get(*id).copied().unwrap_or(0.0)))
            .collect()
    }

    /// Subject name as persisted: "Unknown" when blank
    pub fn effective_subject(&self) -> String {
        let trimmed = self.subject_name.trim();
        if trimmed.is_empty() {
            "Unknown".to_string()
        } else {
            trimmed.to_string()
        }
    }

    /// Derived averages over the current (possibly partial) mapping
    pub fn averages(&self) -> Averages {
        compute_averages(&self.ratings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_ratings_fills_zero() {
        let mut draft = Draft::new();
        draft.set_rating("vision", 4.0);
        let full = draft.full_ratings();
        assert_eq!(full.len(), schema::metric_count());
        assert_eq!(full.get("vision").copied(), Some(4.0));
        assert_eq!(full.get("empathy").copied(), Some(0.0));
    }

    #[test]
    fn test_set_rating_clamps_not_rounds() {
        let mut draft = Draft::new();
        draft.set_rating("vision", 9.0);
        draft.set_rating("teams", -1.0);
        draft.set_rating("empathy", 3.5);
        assert_eq!(draft.ratings.get("vision").copied(), Some(5.0));
        assert_eq!(draft.ratings.get("teams").copied(), Some(0.0));
        // Fractional in-range values pass through untouched
        assert_eq!(draft.ratings.get("empathy").copied(), Some(3.5));
        assert!(draft.dirty);
    }

    #[test]
    fn test_effective_subject() {
        let mut draft = Draft::new();
        assert_eq!(draft.effective_subject(), "Unknown");
        draft.set_subject("  ");
        assert_eq!(draft.effective_subject(), "Unknown");
        draft.set_subject("  Jane Doe ");
        assert_eq!(draft.effective_subject(), "Jane Doe");
    }

    #[test]
    fn test_reset_clears_identity_and_ratings() {
        let mut draft = Draft::new();
        draft.set_subject("Jane");
        draft.set_rating("vision", 3.0);
        draft.binding = Binding::Bound("some-guid".to_string());
        let epoch_before = draft.epoch;

        draft.reset();
        assert_eq!(draft.binding, Binding::Unsaved);
        assert!(draft.ratings.is_empty());
        assert!(!draft.dirty);
        assert!(draft.epoch > epoch_before);
    }
}
