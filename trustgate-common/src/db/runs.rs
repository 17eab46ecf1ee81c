//! Append-only log of pipeline runs (`verification_runs`)

use chrono::{DateTime, Utc};
use sqlx::{Row, SqliteConnection, SqlitePool};
use uuid::Uuid;

use super::documents::upsert_machine_verification;
use super::models::{RecordOutcome, VerificationRun};
use crate::{Error, Result};

/// Append one run
pub async fn insert_run(pool: &SqlitePool, run: &VerificationRun) -> Result<()> {
    let mut conn = pool.acquire().await?;
    insert_run_on(&mut *conn, run).await
}

async fn insert_run_on(conn: &mut SqliteConnection, run: &VerificationRun) -> Result<()> {
    let matches = serde_json::to_string(&run.matches)?;

    sqlx::query(
        r#"
        INSERT INTO verification_runs (
            run_id, document_id, verdict, gpt_analysis, matches, created_at
        ) VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(run.run_id.to_string())
    .bind(&run.document_id)
    .bind(&run.verdict)
    .bind(&run.gpt_analysis)
    .bind(matches)
    .bind(run.created_at.to_rfc3339())
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Record a machine verification and its run log entry together
///
/// Both writes share one transaction: when either fails the document row is
/// left exactly as it was.
pub async fn record_verification(
    pool: &SqlitePool,
    id: &str,
    trusted: bool,
    content: &str,
    gpt_analysis: &str,
    run: &VerificationRun,
) -> Result<RecordOutcome> {
    let mut tx = pool.begin().await?;
    let outcome =
        upsert_machine_verification(&mut *tx, id, trusted, content, gpt_analysis).await?;
    insert_run_on(&mut *tx, run).await?;
    tx.commit().await?;

    tracing::debug!(
        id = %id,
        run_id = %run.run_id,
        level = ?outcome.verification_level,
        preserved = outcome.preserved,
        "Recorded verification with run"
    );

    Ok(outcome)
}

/// Runs for one document, oldest first
pub async fn list_runs_for_document(
    pool: &SqlitePool,
    document_id: &str,
) -> Result<Vec<VerificationRun>> {
    let rows = sqlx::query(
        r#"
        SELECT run_id, document_id, verdict, gpt_analysis, matches, created_at
        FROM verification_runs
        WHERE document_id = ?
        ORDER BY created_at, rowid
        "#,
    )
    .bind(document_id)
    .fetch_all(pool)
    .await?;

    rows.iter()
        .map(|row| -> Result<VerificationRun> {
            let run_id: String = row.get("run_id");
            let matches: String = row.get("matches");
            let created_at: String = row.get("created_at");

            Ok(VerificationRun {
                run_id: Uuid::parse_str(&run_id).map_err(|e| Error::MalformedRun {
                    run_id: run_id.clone(),
                    column: "run_id",
                    reason: e.to_string(),
                })?,
                document_id: row.get("document_id"),
                verdict: row.get("verdict"),
                gpt_analysis: row.get("gpt_analysis"),
                matches: serde_json::from_str(&matches)?,
                created_at: DateTime::parse_from_rfc3339(&created_at)
                    .map_err(|e| Error::MalformedRun {
                        run_id: run_id.clone(),
                        column: "created_at",
                        reason: e.to_string(),
                    })?
                    .with_timezone(&Utc),
            })
        })
        .collect()
}
