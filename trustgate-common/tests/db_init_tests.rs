//! Tests for database creation on first run and idempotent schema setup

use tempfile::TempDir;
use trustgate_common::db::{get_document, init_database, record_machine_verification};

#[tokio::test]
async fn test_database_creation_when_missing() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("nested").join("trustgate.db");

    let pool = init_database(&db_path).await;
    assert!(pool.is_ok(), "Database initialization failed: {:?}", pool.err());
    assert!(db_path.exists(), "Database file was not created");
}

#[tokio::test]
async fn test_database_reopen_keeps_data() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("trustgate.db");

    let pool = init_database(&db_path).await.unwrap();
    record_machine_verification(&pool, "https://a.example", true, "body", "fine")
        .await
        .unwrap();
    pool.close().await;

    // Second open runs CREATE TABLE IF NOT EXISTS again without touching rows
    let pool = init_database(&db_path).await.unwrap();
    let doc = get_document(&pool, "https://a.example").await.unwrap();
    assert!(doc.is_some());
}

#[tokio::test]
async fn test_expected_tables_exist() {
    let temp_dir = TempDir::new().unwrap();
    let pool = init_database(&temp_dir.path().join("t.db")).await.unwrap();

    let tables: Vec<(String,)> =
        sqlx::query_as("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
            .fetch_all(&pool)
            .await
            .unwrap();
    let names: Vec<&str> = tables.iter().map(|(n,)| n.as_str()).collect();

    assert!(names.contains(&"verified_documents"));
    assert!(names.contains(&"verification_runs"));
}
