// tests for database operations
// run with: cargo test --features test-db
// requires DATABASE_URL env var

#![cfg(feature = "test-db")]

use dbchat::{Db, QueryRunner};

fn get_db_url() -> String {
    std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for db tests")
}

#[tokio::test]
async fn test_connect() {
    let db = Db::connect(&get_db_url()).await;
    assert!(db.is_ok());
}

#[tokio::test]
async fn test_schema() {
    let db = Db::connect(&get_db_url()).await.unwrap();
    let schema = db.schema().await.unwrap();

    // should contain our test tables
    assert!(schema.contains("users"));
    assert!(schema.contains("orders"));
}

#[tokio::test]
async fn test_execute_select() {
    let db = Db::connect(&get_db_url()).await.unwrap();
    let result = db.execute("SELECT id, name FROM users").await.unwrap();

    assert_eq!(result.columns.len(), 2);
    assert!(result.row_count > 0);
}

#[tokio::test]
async fn test_execute_count() {
    let db = Db::connect(&get_db_url()).await.unwrap();
    let result = db
        .execute("SELECT COUNT(*) as count FROM users")
        .await
        .unwrap();

    assert_eq!(result.columns[0], "count");
    assert_eq!(result.row_count, 1);
}

#[tokio::test]
async fn test_execute_join() {
    let db = Db::connect(&get_db_url()).await.unwrap();
    let result = db
        .execute(
            "SELECT u.name, o.amount
             FROM users u
             JOIN orders o ON u.id = o.user_id",
        )
        .await
        .unwrap();

    assert_eq!(result.columns.len(), 2);
    assert!(result.row_count > 0);
}

#[tokio::test]
async fn test_empty_result() {
    let db = Db::connect(&get_db_url()).await.unwrap();
    let result = db
        .execute("SELECT * FROM users WHERE id = -999")
        .await
        .unwrap();

    assert_eq!(result.row_count, 0);
    assert!(result.rows.is_empty());
}

#[tokio::test]
async fn test_run_renders_text_table() {
    let db = Db::connect(&get_db_url()).await.unwrap();
    let text = db.run("SELECT id, name FROM users LIMIT 1").await.unwrap();

    assert!(text.contains("id"));
    assert!(text.contains("name"));
    assert!(text.contains("rows"));
}

#[tokio::test]
async fn test_run_caps_uncapped_queries() {
    let db = Db::connect(&get_db_url()).await.unwrap();
    let text = db.run("SELECT id FROM users").await.unwrap();

    // without an explicit LIMIT the rendering shows at most 5 rows
    let data_lines = text
        .lines()
        .filter(|l| !l.starts_with('(') && !l.contains("--"))
        .count();
    assert!(data_lines <= 6); // header + up to 5 rows
}
