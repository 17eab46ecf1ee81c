//! Queries over the `verified_documents` table
//!
//! Rows are keyed by source URL. Insertion order (rowid) is the corpus order
//! used for similarity tie-breaking.

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};

use super::models::{RecordOutcome, VerificationLevel, VerifiedDocument};
use crate::Result;

const SELECT_COLUMNS: &str = "SELECT id, verification_level, query_count, verification_priority, \
     common_query, content, gpt_analysis, created_at, updated_at FROM verified_documents";

/// All stored documents in insertion order
pub async fn list_documents(pool: &SqlitePool) -> Result<Vec<VerifiedDocument>> {
    let sql = format!("{} ORDER BY rowid", SELECT_COLUMNS);
    let docs = sqlx::query_as::<_, VerifiedDocument>(&sql)
        .fetch_all(pool)
        .await?;
    Ok(docs)
}

/// Documents stored at `min_level` or above
pub async fn list_documents_min_level(
    pool: &SqlitePool,
    min_level: i64,
) -> Result<Vec<VerifiedDocument>> {
    let sql = format!(
        "{} WHERE verification_level >= ? ORDER BY rowid",
        SELECT_COLUMNS
    );
    let docs = sqlx::query_as::<_, VerifiedDocument>(&sql)
        .bind(min_level)
        .fetch_all(pool)
        .await?;
    Ok(docs)
}

/// Look up one document by URL
pub async fn get_document(pool: &SqlitePool, id: &str) -> Result<Option<VerifiedDocument>> {
    let sql = format!("{} WHERE id = ?", SELECT_COLUMNS);
    let doc = sqlx::query_as::<_, VerifiedDocument>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(doc)
}

/// Reference texts for similarity scoring, as `(id, content)` in insertion order
///
/// One SELECT, so each call sees a single consistent snapshot. Rows without
/// content are skipped; `exclude_id` keeps a candidate from matching its own
/// stored copy.
pub async fn list_corpus_texts(
    pool: &SqlitePool,
    min_level: i64,
    exclude_id: Option<&str>,
) -> Result<Vec<(String, String)>> {
    let rows: Vec<(String, String)> = sqlx::query_as(
        r#"
        SELECT id, content FROM verified_documents
        WHERE verification_level >= ?
          AND content IS NOT NULL
          AND TRIM(content) != ''
          AND (? IS NULL OR id != ?)
        ORDER BY rowid
        "#,
    )
    .bind(min_level)
    .bind(exclude_id)
    .bind(exclude_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Store the result of a pipeline verification
///
/// New documents start at `MachineChecked` (trusted) or `Untrusted` with a
/// query count of one. Existing documents get their query count bumped and
/// content refreshed; a human-confirmed level is never overwritten.
pub async fn record_machine_verification(
    pool: &SqlitePool,
    id: &str,
    trusted: bool,
    content: &str,
    gpt_analysis: &str,
) -> Result<RecordOutcome> {
    let mut tx = pool.begin().await?;
    let outcome =
        upsert_machine_verification(&mut *tx, id, trusted, content, gpt_analysis).await?;
    tx.commit().await?;

    tracing::debug!(
        id = %id,
        level = ?outcome.verification_level,
        preserved = outcome.preserved,
        "Recorded machine verification"
    );

    Ok(outcome)
}

/// Document upsert behind [`record_machine_verification`], run on the
/// caller's connection so it can share a transaction with other writes
pub(crate) async fn upsert_machine_verification(
    conn: &mut SqliteConnection,
    id: &str,
    trusted: bool,
    content: &str,
    gpt_analysis: &str,
) -> Result<RecordOutcome> {
    let machine_level = if trusted {
        VerificationLevel::MachineChecked
    } else {
        VerificationLevel::Untrusted
    };
    let now = Utc::now().to_rfc3339();

    let existing: Option<(i64,)> =
        sqlx::query_as("SELECT verification_level FROM verified_documents WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

    let outcome = match existing {
        Some((current,)) => {
            let current = VerificationLevel::from_i64(current);
            let preserved = current.is_human_confirmed();
            let level = if preserved { current } else { machine_level };

            sqlx::query(
                r#"
                UPDATE verified_documents
                SET verification_level = ?,
                    query_count = query_count + 1,
                    content = ?,
                    gpt_analysis = ?,
                    updated_at = ?
                WHERE id = ?
                "#,
            )
            .bind(level.as_i64())
            .bind(content)
            .bind(gpt_analysis)
            .bind(&now)
            .bind(id)
            .execute(&mut *conn)
            .await?;

            RecordOutcome {
                verification_level: level,
                preserved,
            }
        }
        None => {
            sqlx::query(
                r#"
                INSERT INTO verified_documents (
                    id, verification_level, query_count, verification_priority,
                    common_query, content, gpt_analysis, created_at, updated_at
                ) VALUES (?, ?, 1, 0, NULL, ?, ?, ?, ?)
                "#,
            )
            .bind(id)
            .bind(machine_level.as_i64())
            .bind(content)
            .bind(gpt_analysis)
            .bind(&now)
            .bind(&now)
            .execute(&mut *conn)
            .await?;

            RecordOutcome {
                verification_level: machine_level,
                preserved: false,
            }
        }
    };

    Ok(outcome)
}

/// Mark a document as spot-checked by a person, creating the row if needed
pub async fn mark_manually_verified(pool: &SqlitePool, id: &str) -> Result<()> {
    let now = Utc::now().to_rfc3339();
    sqlx::query(
        r#"
        INSERT INTO verified_documents (
            id, verification_level, query_count, verification_priority,
            common_query, created_at, updated_at
        ) VALUES (?, ?, 0, 0, NULL, ?, ?)
        ON CONFLICT(id) DO UPDATE SET
            verification_level = excluded.verification_level,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(id)
    .bind(VerificationLevel::SpotChecked.as_i64())
    .bind(&now)
    .bind(&now)
    .execute(pool)
    .await?;
    Ok(())
}

/// Overwrite the level of an existing document
///
/// Returns false when no document has this id.
pub async fn set_verification_level(
    pool: &SqlitePool,
    id: &str,
    level: VerificationLevel,
) -> Result<bool> {
    let result = sqlx::query(
        "UPDATE verified_documents SET verification_level = ?, updated_at = ? WHERE id = ?",
    )
    .bind(level.as_i64())
    .bind(Utc::now().to_rfc3339())
    .bind(id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}
