use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use wayfarer::handlers::*;

#[test]
fn test_expand_path_tilde() {
    let expanded = expand_path("~/.config/wayfarer/travel.db");
    assert!(!expanded.to_string_lossy().starts_with('~'));
    assert!(expanded.ends_with(".config/wayfarer/travel.db"));
}

#[test]
fn test_expand_path_plain() {
    assert_eq!(expand_path("outputs"), PathBuf::from("outputs"));
}

#[test]
fn test_load_targets() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    let folder = temp_dir.path().join("locations");
    fs::create_dir(&folder)?;
    fs::write(
        folder.join("tokyo.csv"),
        "id,area,name\n1,Minato,Tokyo Tower\n2,Chiyoda,Marunouchi Line\n",
    )?;

    let urls = load_targets(&folder)?;

    assert_eq!(urls, vec!["https://www.google.com/maps/search/Tokyo+Tower"]);
    Ok(())
}

#[test]
fn test_load_targets_empty() {
    let temp_dir = TempDir::new().unwrap();
    let folder = temp_dir.path().join("locations");
    fs::create_dir(&folder).unwrap();
    fs::write(folder.join("empty.csv"), "id,area,name\n").unwrap();

    let result = load_targets(&folder);
    assert!(result.is_err());
    assert!(result.unwrap_err().contains("No place URLs found"));
}

#[test]
fn test_load_targets_missing_folder() {
    let temp_dir = TempDir::new().unwrap();
    let result = load_targets(&temp_dir.path().join("missing"));
    assert!(result.unwrap_err().starts_with("Failed to build URLs"));
}
