// Tests for the statement-at-a-time query executor

use tempfile::TempDir;
use wayfarer_core::data::Database;

fn create_test_db() -> (TempDir, Database) {
    let temp_dir = TempDir::new().unwrap();
    let db = Database::new(temp_dir.path().join("test.db"));
    (temp_dir, db)
}

// ============================================================================
// Database Creation Tests
// ============================================================================

#[test]
fn test_database_created_on_first_query() {
    let (_temp_dir, db) = create_test_db();
    assert!(!db.exists());

    db.execute_query("CREATE TABLE t (id INTEGER)").unwrap();
    assert!(db.exists());
}

#[test]
fn test_missing_parent_directories_are_created() {
    let temp_dir = TempDir::new().unwrap();
    let db = Database::new(temp_dir.path().join("nested/config/travel.db"));

    db.execute_query("CREATE TABLE t (id INTEGER)").unwrap();
    assert!(db.path().exists());
}

// ============================================================================
// Non-SELECT Tests
// ============================================================================

#[test]
fn test_non_select_returns_empty_and_commits() {
    let (_temp_dir, db) = create_test_db();

    let created = db
        .execute_query("CREATE TABLE continents (id INTEGER PRIMARY KEY, name TEXT)")
        .unwrap();
    let inserted = db
        .execute_query("INSERT INTO continents (name) VALUES ('Africa'), ('Asia')")
        .unwrap();
    assert_eq!(created, "");
    assert_eq!(inserted, "");

    // a fresh connection sees the committed rows
    let rows = db.execute_query("SELECT * FROM continents").unwrap();
    assert_eq!(rows, "(1, 'Africa')\n(2, 'Asia')");
}

#[test]
fn test_update_then_select() {
    let (_temp_dir, db) = create_test_db();
    db.execute_query("CREATE TABLE t (id INTEGER PRIMARY KEY, name TEXT)")
        .unwrap();
    db.execute_query("INSERT INTO t (name) VALUES ('old')").unwrap();
    db.execute_query("UPDATE t SET name = 'new' WHERE id = 1")
        .unwrap();

    assert_eq!(db.execute_query("SELECT name FROM t").unwrap(), "('new',)");
}

// ============================================================================
// SELECT Rendering Tests
// ============================================================================

#[test]
fn test_select_keeps_database_order() {
    let (_temp_dir, db) = create_test_db();
    db.execute_query("CREATE TABLE t (id INTEGER PRIMARY KEY, name TEXT)")
        .unwrap();
    db.execute_query("INSERT INTO t (id, name) VALUES (3, 'c'), (1, 'a'), (2, 'b')")
        .unwrap();

    let rows = db.execute_query("SELECT * FROM t ORDER BY id DESC").unwrap();
    assert_eq!(rows, "(3, 'c')\n(2, 'b')\n(1, 'a')");
}

#[test]
fn test_select_single_column_tuple() {
    let (_temp_dir, db) = create_test_db();
    assert_eq!(db.execute_query("SELECT 7").unwrap(), "(7,)");
}

#[test]
fn test_select_lowercase_and_leading_whitespace() {
    let (_temp_dir, db) = create_test_db();
    assert_eq!(db.execute_query("\n   select 1, 2;").unwrap(), "(1, 2)");
}

#[test]
fn test_select_null_and_real() {
    let (_temp_dir, db) = create_test_db();
    db.execute_query("CREATE TABLE t (name TEXT, size FLOAT, population BIGINT)")
        .unwrap();
    db.execute_query("INSERT INTO t VALUES ('Japan', 377975, NULL)")
        .unwrap();

    assert_eq!(
        db.execute_query("SELECT * FROM t").unwrap(),
        "('Japan', 377975.0, None)"
    );
}

#[test]
fn test_select_no_rows_is_empty() {
    let (_temp_dir, db) = create_test_db();
    db.execute_query("CREATE TABLE t (id INTEGER)").unwrap();
    assert_eq!(db.execute_query("SELECT * FROM t").unwrap(), "");
}

#[test]
fn test_select_text_with_quote() {
    let (_temp_dir, db) = create_test_db();
    assert_eq!(
        db.execute_query("SELECT 'Mary''s Cafe'").unwrap(),
        "(\"Mary's Cafe\",)"
    );
}

// ============================================================================
// Error Tests
// ============================================================================

#[test]
fn test_execute_query_error() {
    let (_temp_dir, db) = create_test_db();
    assert!(db.execute_query("SELECT * FROM missing").is_err());
    assert!(db.execute_query("CREATE TABLE (").is_err());
}

#[test]
fn test_run_query_returns_error_text() {
    let (_temp_dir, db) = create_test_db();

    let output = db.run_query("SELECT * FROM missing");
    assert!(!output.starts_with("Error: "));
    assert!(output.starts_with("no such table"));
    assert_eq!(
        output,
        db.execute_query("SELECT * FROM missing")
            .unwrap_err()
            .to_string()
    );
}

#[test]
fn test_run_query_success_matches_execute() {
    let (_temp_dir, db) = create_test_db();
    assert_eq!(db.run_query("CREATE TABLE t (id INTEGER)"), "");
    assert_eq!(db.run_query("INSERT INTO t VALUES (5)"), "");
    assert_eq!(db.run_query("SELECT id FROM t"), "(5,)");
}

#[test]
fn test_failed_batch_is_rolled_back() {
    let (_temp_dir, db) = create_test_db();
    db.execute_query("CREATE TABLE t (id INTEGER PRIMARY KEY)")
        .unwrap();

    let result = db.execute_query("INSERT INTO t VALUES (1); INSERT INTO t VALUES (1);");
    assert!(result.is_err());
    assert_eq!(db.execute_query("SELECT COUNT(*) FROM t").unwrap(), "(0,)");
}
