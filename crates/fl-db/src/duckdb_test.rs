use super::*;

#[tokio::test]
async fn test_in_memory() {
    let db = DuckDbBackend::in_memory().unwrap();
    assert_eq!(db.db_type(), "duckdb");
}

#[tokio::test]
async fn test_execute_with_params_and_query() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.execute_batch("CREATE TABLE people (id BIGINT, name VARCHAR, score DOUBLE)")
        .await
        .unwrap();

    let inserted = db
        .execute(
            "INSERT INTO people VALUES (?, ?, ?)",
            &[SqlValue::Int(1), "alice".into(), SqlValue::Float(1.5)],
        )
        .await
        .unwrap();
    assert_eq!(inserted, 1);
    db.execute(
        "INSERT INTO people VALUES (?, ?, ?)",
        &[SqlValue::Int(2), SqlValue::Null, SqlValue::Null],
    )
    .await
    .unwrap();

    let rows = db
        .query("SELECT id, name FROM people ORDER BY id", &[])
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].int(0).unwrap(), 1);
    assert_eq!(rows[0].text(1).unwrap(), "alice");
    assert_eq!(rows[1].get(1), Some(&SqlValue::Null));

    let filtered = db
        .query("SELECT name FROM people WHERE id = ?", &[SqlValue::Int(1)])
        .await
        .unwrap();
    assert_eq!(filtered, vec![Row(vec![SqlValue::Text("alice".to_string())])]);
}

#[tokio::test]
async fn test_query_collects_every_row() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.execute_batch("CREATE TABLE nums AS SELECT * FROM range(10) t(n)")
        .await
        .unwrap();

    let rows = db.query("SELECT n FROM nums ORDER BY n", &[]).await.unwrap();
    assert_eq!(rows.len(), 10);
    assert_eq!(rows[9].int(0).unwrap(), 9);
}

#[tokio::test]
async fn test_execute_batch() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.execute_batch(
        "CREATE TABLE t1 (id INT); CREATE TABLE t2 (id INT); INSERT INTO t1 VALUES (1);",
    )
    .await
    .unwrap();

    assert!(db.relation_exists("t1").await.unwrap());
    assert!(db.relation_exists("t2").await.unwrap());
}

#[tokio::test]
async fn test_relation_not_exists() {
    let db = DuckDbBackend::in_memory().unwrap();
    assert!(!db.relation_exists("nonexistent").await.unwrap());
}

#[tokio::test]
async fn test_create_schema_if_not_exists() {
    let db = DuckDbBackend::in_memory().unwrap();

    db.create_schema_if_not_exists("meta").await.unwrap();
    db.execute_batch("CREATE TABLE meta.ledger (id INT)")
        .await
        .unwrap();
    assert!(db.relation_exists("meta.ledger").await.unwrap());

    // Creating the same schema again should not fail (IF NOT EXISTS)
    db.create_schema_if_not_exists("meta").await.unwrap();
}

#[tokio::test]
async fn test_rollback_discards_work() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.execute_batch("CREATE TABLE t (id INT)").await.unwrap();

    db.begin().await.unwrap();
    db.execute_batch("INSERT INTO t VALUES (1)").await.unwrap();
    db.rollback().await.unwrap();

    assert_eq!(db.query("SELECT * FROM t", &[]).await.unwrap().len(), 0);
}

#[tokio::test]
async fn test_commit_keeps_work() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.execute_batch("CREATE TABLE t (id INT)").await.unwrap();

    db.begin().await.unwrap();
    db.execute_batch("INSERT INTO t VALUES (1)").await.unwrap();
    db.commit().await.unwrap();

    assert_eq!(db.query("SELECT * FROM t", &[]).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_rollback_after_failed_statement() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.execute_batch("CREATE TABLE t (id INT PRIMARY KEY)")
        .await
        .unwrap();

    db.begin().await.unwrap();
    db.execute_batch("INSERT INTO t VALUES (1)").await.unwrap();
    assert!(db.execute_batch("INSERT INTO t VALUES (NULL)").await.is_err());
    db.rollback().await.unwrap();

    assert_eq!(db.query("SELECT * FROM t", &[]).await.unwrap().len(), 0);
}

#[tokio::test]
async fn test_constraint_violations_are_classified() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.execute_batch("CREATE TABLE t (id INT PRIMARY KEY); INSERT INTO t VALUES (1);")
        .await
        .unwrap();

    let duplicate = db
        .execute("INSERT INTO t VALUES (?)", &[SqlValue::Int(1)])
        .await
        .unwrap_err();
    assert!(duplicate.is_constraint_violation(), "got {duplicate}");

    let not_null = db.execute_batch("INSERT INTO t VALUES (NULL)").await.unwrap_err();
    assert!(not_null.is_constraint_violation(), "got {not_null}");
}

#[tokio::test]
async fn test_missing_table_is_classified() {
    let db = DuckDbBackend::in_memory().unwrap();
    let err = db
        .query("SELECT * FROM does_not_exist", &[])
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::TableNotFound(_)), "got {err}");
}

#[tokio::test]
async fn test_commit_without_transaction_fails() {
    let db = DuckDbBackend::in_memory().unwrap();
    let err = db.commit().await.unwrap_err();
    assert!(matches!(err, DbError::TransactionError(_)));
}

#[tokio::test]
async fn test_file_backed_database_persists() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("ledger.duckdb");
    {
        let db = DuckDbBackend::new(path.to_str().unwrap()).unwrap();
        db.execute_batch("CREATE TABLE t (id INT); INSERT INTO t VALUES (1);")
            .await
            .unwrap();
    }
    let db = DuckDbBackend::from_path(&path).unwrap();
    assert_eq!(db.query("SELECT * FROM t", &[]).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_duplicate_create_is_already_exists() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.execute_batch("CREATE TABLE t (id INT)").await.unwrap();
    let err = db.execute_batch("CREATE TABLE t (id INT)").await.unwrap_err();
    assert!(err.is_already_exists(), "got {err}");
}
