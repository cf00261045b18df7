// Tests for the schema seed sequence

use tempfile::TempDir;
use wayfarer_core::data::Database;
use wayfarer_core::error::CoreError;
use wayfarer_core::seed::{SeedStep, run_steps, seed_database};

fn create_test_db() -> (TempDir, Database) {
    let temp_dir = TempDir::new().unwrap();
    let db = Database::new(temp_dir.path().join("travel.db"));
    (temp_dir, db)
}

#[test]
fn test_seed_creates_continents_and_countries() {
    let (_temp_dir, db) = create_test_db();
    seed_database(&db).unwrap();

    assert_eq!(
        db.execute_query("SELECT COUNT(*) FROM continents").unwrap(),
        "(7,)"
    );
    assert_eq!(
        db.execute_query("SELECT COUNT(*) FROM Country").unwrap(),
        "(10,)"
    );
    assert_eq!(
        db.execute_query("SELECT name FROM continents WHERE id = 5").unwrap(),
        "('North America',)"
    );
}

#[test]
fn test_seed_country_row() {
    let (_temp_dir, db) = create_test_db();
    seed_database(&db).unwrap();

    assert_eq!(
        db.execute_query("SELECT ID, name, size, capital, continent_id FROM Country WHERE ID = 4")
            .unwrap(),
        "(4, 'Japan', 377975.0, 'Tokyo', 3)"
    );
}

#[test]
fn test_countries_reference_seeded_continents() {
    let (_temp_dir, db) = create_test_db();
    seed_database(&db).unwrap();

    let orphans = db
        .execute_query(
            "SELECT COUNT(*) FROM Country c LEFT JOIN continents k ON c.continent_id = k.id WHERE k.id IS NULL",
        )
        .unwrap();
    assert_eq!(orphans, "(0,)");
}

#[test]
fn test_seed_twice_is_idempotent() {
    let (_temp_dir, db) = create_test_db();
    seed_database(&db).unwrap();
    let continents = db.execute_query("SELECT * FROM continents").unwrap();
    let countries = db.execute_query("SELECT * FROM Country").unwrap();

    seed_database(&db).unwrap();

    assert_eq!(db.execute_query("SELECT * FROM continents").unwrap(), continents);
    assert_eq!(db.execute_query("SELECT * FROM Country").unwrap(), countries);
}

#[test]
fn test_failing_step_aborts_sequence() {
    let (_temp_dir, db) = create_test_db();
    // incompatible table makes the continents insert fail
    db.execute_query("CREATE TABLE continents (code TEXT)").unwrap();

    let err = seed_database(&db).unwrap_err();
    match &err {
        CoreError::Seed { step, .. } => assert_eq!(*step, SeedStep::Continents),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.to_string(), "failed to create continents table");

    // later steps never ran
    assert_eq!(
        db.execute_query("SELECT name FROM sqlite_master WHERE name = 'Country'")
            .unwrap(),
        ""
    );
}

#[test]
fn test_countries_failure_reports_step() {
    let (_temp_dir, db) = create_test_db();
    db.execute_query("CREATE TABLE Country (code TEXT)").unwrap();

    let err = seed_database(&db).unwrap_err();
    assert_eq!(err.to_string(), "failed to create countries table");
    // continents step completed before the failure
    assert_eq!(
        db.execute_query("SELECT COUNT(*) FROM continents").unwrap(),
        "(7,)"
    );
}

#[test]
fn test_placeholder_steps_are_noops() {
    let (_temp_dir, db) = create_test_db();
    run_steps(&db, &[SeedStep::City, SeedStep::Airport, SeedStep::Place]).unwrap();

    assert!(SeedStep::City.statements().is_empty());
    assert_eq!(
        db.execute_query("SELECT COUNT(*) FROM sqlite_master WHERE type = 'table'")
            .unwrap(),
        "(0,)"
    );
}

#[test]
fn test_sequence_order() {
    assert_eq!(
        SeedStep::SEQUENCE,
        [
            SeedStep::Continents,
            SeedStep::Countries,
            SeedStep::City,
            SeedStep::Airport,
            SeedStep::Place
        ]
    );
}
