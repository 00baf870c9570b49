//! Schema registry: themes, metrics, and the valid rating domain
//!
//! The registry is process-wide static configuration, loaded once. Themes are
//! ordered; metric identifiers are the storage keys and are unique across the
//! whole registry (cross-theme uniqueness is required for aggregation and for
//! the CSV round-trip to be lossless).

use once_cell::sync::Lazy;

/// Minimum valid rating (0 = not applicable)
pub const RATING_MIN: i64 = 0;

/// Maximum valid rating (5 = excellent)
pub const RATING_MAX: i64 = 5;

/// A single scored criterion belonging to one theme
#[derive(Debug, Clone, Copy)]
pub struct Metric {
    /// Stable identifier, used as the storage key
    pub id: &'static str,
    /// Display label
    pub label: &'static str,
}

/// A named grouping of related metrics with a display color
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    /// Theme name (unique, doubles as identity)
    pub name: &'static str,
    /// Display color for the radial chart segment
    pub color: &'static str,
    /// Metrics scored under this theme (always at least one)
    pub metrics: &'static [Metric],
}

/// The full assessment schema: 4 themes, 19 metrics
static THEMES: &[Theme] = &[
    Theme {
        name: "Strategic Vision",
        color: "#e63946",
        metrics: &[
            Metric { id: "vision", label: "Vision Setting" },
            Metric { id: "innovation", label: "Innovation" },
            Metric { id: "planning", label: "Long-term Planning" },
            Metric { id: "market_awareness", label: "Market Awareness" },
        ],
    },
    Theme {
        name: "Team Leadership",
        color: "#457b9d",
        metrics: &[
            Metric { id: "delegation", label: "Delegation" },
            Metric { id: "motivation", label: "Motivation" },
            Metric { id: "feedback", label: "Giving Feedback" },
            Metric { id: "teams", label: "Team Building" },
            Metric { id: "conflict", label: "Conflict Resolution" },
        ],
    },
    Theme {
        name: "Execution",
        color: "#2a9d8f",
        metrics: &[
            Metric { id: "accountability", label: "Accountability" },
            Metric { id: "decision_making", label: "Decision Making" },
            Metric { id: "prioritization", label: "Prioritization" },
            Metric { id: "results", label: "Results Orientation" },
            Metric { id: "adaptability", label: "Adaptability" },
        ],
    },
    Theme {
        name: "Communication",
        color: "#f4a261",
        metrics: &[
            Metric { id: "clarity", label: "Clarity" },
            Metric { id: "listening", label: "Active Listening" },
            Metric { id: "influence", label: "Influence" },
            Metric { id: "presence", label: "Executive Presence" },
            Metric { id: "empathy", label: "Empathy" },
        ],
    },
];

/// All metric identifiers in registry (theme, then metric) order
static METRIC_IDS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    THEMES
        .iter()
        .flat_map(|t| t.metrics.iter().map(|m| m.id))
        .collect()
});

/// Ordered sequence of all themes
pub fn themes() -> &'static [Theme] {
    THEMES
}

/// All metric identifiers, in registry order
pub fn metric_ids() -> &'static [&'static str] {
    &METRIC_IDS
}

/// Total number of metrics across all themes
pub fn metric_count() -> usize {
    METRIC_IDS.len()
}

/// Whether `id` is a known metric identifier
pub fn is_known_metric(id: &str) -> bool {
    METRIC_IDS.iter().any(|m| *m == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_registry_shape() {
        assert_eq!(themes().len(), 4);
        assert_eq!(metric_count(), 19);
        // One theme of 4 metrics, three of 5
        let sizes: Vec<usize> = themes().iter().map(|t| t.metrics.len()).collect();
        assert_eq!(sizes, vec![4, 5, 5, 5]);
    }

    #[test]
    fn test_metric_ids_unique_across_themes() {
        let unique: HashSet<&str> = metric_ids().iter().copied().collect();
        assert_eq!(unique.len(), metric_count(), "duplicate metric id in registry");
    }

    #[test]
    fn test_every_theme_has_metrics() {
        for theme in themes() {
            assert!(!theme.metrics.is_empty(), "theme {} has no metrics", theme.name);
            assert!(theme.color.starts_with('#'));
        }
    }

    #[test]
    fn test_is_known_metric() {
        assert!(is_known_metric("feedback"));
        assert!(is_known_metric("teams"));
        assert!(is_known_metric("vision"));
        assert!(!is_known_metric("charisma"));
        assert!(!is_known_metric(""));
        // Case-sensitive: identifiers are storage keys
        assert!(!is_known_metric("Feedback"));
    }
}
