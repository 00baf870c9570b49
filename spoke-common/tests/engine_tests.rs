//! End-to-end scoring engine scenarios
//!
//! Exercises the clamp -> validate -> aggregate -> export -> import chain the
//! way the client and server use it together.

use spoke_common::csv::{from_table, to_table};
use spoke_common::record::{
    compute_averages_int, export_filename, ratings_for_storage, validate_complete,
};
use spoke_common::schema;
use std::collections::BTreeMap;

#[test]
fn jane_doe_scenario() {
    // Create a record with all 19 metrics set to 3
    let ratings: BTreeMap<String, i64> = schema::metric_ids()
        .iter()
        .map(|id| (id.to_string(), 3))
        .collect();
    assert!(validate_complete(&ratings).is_ok());

    // Overall and every theme average come out at exactly 3.0
    let averages = compute_averages_int(&ratings);
    assert_eq!(averages.overall, 3.0);
    for theme in &averages.per_theme {
        assert_eq!(theme.average, 3.0, "theme {}", theme.theme);
    }

    // Export: header + 19 lines of `metric_id,3`
    let table = to_table(&ratings);
    let lines: Vec<&str> = table.lines().collect();
    assert_eq!(lines.len(), 20);
    for line in &lines[1..] {
        let (id, value) = line.split_once(',').unwrap();
        assert!(schema::is_known_metric(id));
        assert_eq!(value, "3");
    }

    // Re-import into a fresh record reproduces the same 19 values
    let parsed = from_table(&table).unwrap();
    assert!(parsed.warnings.is_empty());
    let stored = ratings_for_storage(&parsed.ratings).unwrap();
    assert_eq!(stored, ratings);

    assert_eq!(
        export_filename("Jane Doe", "2026-08-24"),
        "Jane_Doe_assessment_2026-08-24.csv"
    );
}

#[test]
fn partial_edit_then_complete() {
    // The editing surface tolerates partial mappings; the boundary does not
    let mut ratings: BTreeMap<String, i64> = BTreeMap::new();
    ratings.insert("vision".to_string(), 4);
    ratings.insert("teams".to_string(), 2);

    let missing = validate_complete(&ratings).unwrap_err();
    assert_eq!(missing.len(), schema::metric_count() - 2);
    assert!(!missing.contains(&"vision".to_string()));
    assert!(!missing.contains(&"teams".to_string()));

    for id in schema::metric_ids() {
        ratings.entry(id.to_string()).or_insert(0);
    }
    assert!(validate_complete(&ratings).is_ok());
}
