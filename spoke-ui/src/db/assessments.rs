//! Assessment store queries
//!
//! Every query is scoped by `user_guid`; a record belonging to another user
//! is indistinguishable from a record that does not exist.

use spoke_common::db::models::Assessment;
use spoke_common::{time, Error, Result};
use sqlx::SqlitePool;
use std::collections::BTreeMap;

/// Optional filters for listing/exporting a user's assessments
#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    /// Substring match on subject name
    pub subject_contains: Option<String>,
    /// Inclusive lower bound on assessment date (`YYYY-MM-DD`)
    pub date_from: Option<String>,
    /// Inclusive upper bound on assessment date (`YYYY-MM-DD`)
    pub date_to: Option<String>,
}

type AssessmentRow = (String, String, String, String, String, String, String);

const SELECT_COLUMNS: &str =
    "guid, user_guid, subject_name, assessment_date, ratings, created_at, updated_at";

fn row_to_assessment(row: AssessmentRow) -> Result<Assessment> {
    let ratings: BTreeMap<String, i64> = serde_json::from_str(&row.4)
        .map_err(|e| Error::Internal(format!("Corrupt ratings column for {}: {}", row.0, e)))?;
    Ok(Assessment {
        guid: row.0,
        user_guid: row.1,
        subject_name: row.2,
        assessment_date: row.3,
        ratings,
        created_at: row.5,
        updated_at: row.6,
    })
}

fn ratings_json(ratings: &BTreeMap<String, i64>) -> Result<String> {
    serde_json::to_string(ratings)
        .map_err(|e| Error::Internal(format!("Failed to serialize ratings: {}", e)))
}

fn filter_sql(filter: &ListFilter) -> String {
    let mut sql = String::new();
    if filter.subject_contains.is_some() {
        sql.push_str(" AND subject_name LIKE ?");
    }
    if filter.date_from.is_some() {
        sql.push_str(" AND assessment_date >= ?");
    }
    if filter.date_to.is_some() {
        sql.push_str(" AND assessment_date <= ?");
    }
    sql
}

/// Insert a new assessment
pub async fn insert(pool: &SqlitePool, assessment: &Assessment) -> Result<()> {
    sqlx::query(
        "INSERT INTO assessments
         (guid, user_guid, subject_name, assessment_date, ratings, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&assessment.guid)
    .bind(&assessment.user_guid)
    .bind(&assessment.subject_name)
    .bind(&assessment.assessment_date)
    .bind(ratings_json(&assessment.ratings)?)
    .bind(&assessment.created_at)
    .bind(&assessment.updated_at)
    .execute(pool)
    .await?;
    Ok(())
}

/// Fetch one assessment owned by `user_guid`
pub async fn get(pool: &SqlitePool, user_guid: &str, guid: &str) -> Result<Option<Assessment>> {
    let row: Option<AssessmentRow> = sqlx::query_as(&format!(
        "SELECT {} FROM assessments WHERE guid = ? AND user_guid = ?",
        SELECT_COLUMNS
    ))
    .bind(guid)
    .bind(user_guid)
    .fetch_optional(pool)
    .await?;

    row.map(row_to_assessment).transpose()
}

/// Apply a partial update; only supplied fields change
///
/// Returns the updated record, or None when the record does not exist or is
/// not owned by `user_guid`. Owner identity is never updatable.
pub async fn update(
    pool: &SqlitePool,
    user_guid: &str,
    guid: &str,
    subject_name: Option<String>,
    assessment_date: Option<String>,
    ratings: Option<BTreeMap<String, i64>>,
) -> Result<Option<Assessment>> {
    let Some(mut existing) = get(pool, user_guid, guid).await? else {
        return Ok(None);
    };

    if let Some(subject) = subject_name {
        existing.subject_name = subject;
    }
    if let Some(date) = assessment_date {
        existing.assessment_date = date;
    }
    if let Some(ratings) = ratings {
        existing.ratings = ratings;
    }
    existing.updated_at = time::now_rfc3339();

    sqlx::query(
        "UPDATE assessments SET subject_name = ?, assessment_date = ?, ratings = ?, updated_at = ?
         WHERE guid = ? AND user_guid = ?",
    )
    .bind(&existing.subject_name)
    .bind(&existing.assessment_date)
    .bind(ratings_json(&existing.ratings)?)
    .bind(&existing.updated_at)
    .bind(guid)
    .bind(user_guid)
    .execute(pool)
    .await?;

    Ok(Some(existing))
}

/// Permanently delete an assessment; true when a row was removed
pub async fn delete(pool: &SqlitePool, user_guid: &str, guid: &str) -> Result<bool> {
    let result = sqlx::query("DELETE FROM assessments WHERE guid = ? AND user_guid = ?")
        .bind(guid)
        .bind(user_guid)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Count a user's assessments matching `filter`
pub async fn count(pool: &SqlitePool, user_guid: &str, filter: &ListFilter) -> Result<i64> {
    let sql = format!(
        "SELECT COUNT(*) FROM assessments WHERE user_guid = ?{}",
        filter_sql(filter)
    );
    let mut query = sqlx::query_scalar(&sql).bind(user_guid);
    if let Some(subject) = &filter.subject_contains {
        query = query.bind(format!("%{}%", subject));
    }
    if let Some(from) = &filter.date_from {
        query = query.bind(from);
    }
    if let Some(to) = &filter.date_to {
        query = query.bind(to);
    }
    Ok(query.fetch_one(pool).await?)
}

/// List a user's assessments matching `filter`, newest first
///
/// `window` is (limit, offset); None lists all matches (used by export).
pub async fn list(
    pool: &SqlitePool,
    user_guid: &str,
    filter: &ListFilter,
    window: Option<(i64, i64)>,
) -> Result<Vec<Assessment>> {
    let mut sql = format!(
        "SELECT {} FROM assessments WHERE user_guid = ?{} ORDER BY created_at DESC",
        SELECT_COLUMNS,
        filter_sql(filter)
    );
    if window.is_some() {
        sql.push_str(" LIMIT ? OFFSET ?");
    }

    let mut query = sqlx::query_as::<_, AssessmentRow>(&sql).bind(user_guid);
    if let Some(subject) = &filter.subject_contains {
        query = query.bind(format!("%{}%", subject));
    }
    if let Some(from) = &filter.date_from {
        query = query.bind(from);
    }
    if let Some(to) = &filter.date_to {
        query = query.bind(to);
    }
    if let Some((limit, offset)) = window {
        query = query.bind(limit).bind(offset);
    }

    let rows = query.fetch_all(pool).await?;
    rows.into_iter().map(row_to_assessment).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use spoke_common::schema;

    async fn test_pool() -> SqlitePool {
        // Single connection: each sqlite::memory: connection is its own database
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        spoke_common::db::create_tables(&pool).await.unwrap();
        sqlx::query("INSERT INTO users (guid, name, created_at) VALUES ('u1', 'alice', 't')")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO users (guid, name, created_at) VALUES ('u2', 'bob', 't')")
            .execute(&pool)
            .await
            .unwrap();
        pool
    }

    fn sample(guid: &str, user: &str, subject: &str, date: &str) -> Assessment {
        let ratings: BTreeMap<String, i64> = schema::metric_ids()
            .iter()
            .map(|id| (id.to_string(), 3))
            .collect();
        Assessment {
            guid: guid.to_string(),
            user_guid: user.to_string(),
            subject_name: subject.to_string(),
            assessment_date: date.to_string(),
            ratings,
            created_at: format!("{}T00:00:00+00:00", date),
            updated_at: String::new(),
        }
    }

    #[tokio::test]
    async fn test_insert_get_round_trip() {
        let pool = test_pool().await;
        let a = sample("a1", "u1", "Jane Doe", "2026-08-24");
        insert(&pool, &a).await.unwrap();

        let fetched = get(&pool, "u1", "a1").await.unwrap().unwrap();
        assert_eq!(fetched.subject_name, "Jane Doe");
        assert_eq!(fetched.ratings, a.ratings);
    }

    #[tokio::test]
    async fn test_owner_scoping() {
        let pool = test_pool().await;
        insert(&pool, &sample("a1", "u1", "Jane", "2026-08-24")).await.unwrap();

        // Another user cannot see, update, or delete the record
        assert!(get(&pool, "u2", "a1").await.unwrap().is_none());
        assert!(update(&pool, "u2", "a1", Some("X".into()), None, None).await.unwrap().is_none());
        assert!(!delete(&pool, "u2", "a1").await.unwrap());
        // Still present for the owner
        assert!(get(&pool, "u1", "a1").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_partial_update() {
        let pool = test_pool().await;
        let a = sample("a1", "u1", "Jane", "2026-08-24");
        insert(&pool, &a).await.unwrap();

        let updated = update(&pool, "u1", "a1", Some("Janet".into()), None, None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.subject_name, "Janet");
        // Ratings and date untouched by a subject-only update
        assert_eq!(updated.ratings, a.ratings);
        assert_eq!(updated.assessment_date, a.assessment_date);

        let updated = update(&pool, "u1", "a1", None, Some("2026-09-01".into()), None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.assessment_date, "2026-09-01");
        assert_eq!(updated.subject_name, "Janet");
    }

    #[tokio::test]
    async fn test_delete_permanent() {
        let pool = test_pool().await;
        insert(&pool, &sample("a1", "u1", "Jane", "2026-08-24")).await.unwrap();

        assert!(delete(&pool, "u1", "a1").await.unwrap());
        assert!(get(&pool, "u1", "a1").await.unwrap().is_none());
        // Second delete reports nothing removed
        assert!(!delete(&pool, "u1", "a1").await.unwrap());
    }

    #[tokio::test]
    async fn test_list_filters() {
        let pool = test_pool().await;
        insert(&pool, &sample("a1", "u1", "Jane Doe", "2026-01-10")).await.unwrap();
        insert(&pool, &sample("a2", "u1", "John Smith", "2026-02-10")).await.unwrap();
        insert(&pool, &sample("a3", "u1", "Janet Jones", "2026-03-10")).await.unwrap();
        insert(&pool, &sample("b1", "u2", "Jane Doe", "2026-01-10")).await.unwrap();

        // Ownership scoping
        let all = list(&pool, "u1", &ListFilter::default(), None).await.unwrap();
        assert_eq!(all.len(), 3);

        // Subject substring
        let filter = ListFilter { subject_contains: Some("Jan".into()), ..Default::default() };
        assert_eq!(count(&pool, "u1", &filter).await.unwrap(), 2);

        // Date window
        let filter = ListFilter {
            date_from: Some("2026-02-01".into()),
            date_to: Some("2026-02-28".into()),
            ..Default::default()
        };
        let hits = list(&pool, "u1", &filter, None).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].guid, "a2");

        // Windowed listing
        let page = list(&pool, "u1", &ListFilter::default(), Some((2, 0))).await.unwrap();
        assert_eq!(page.len(), 2);
    }
}
