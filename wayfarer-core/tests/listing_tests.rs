// Tests for Top-100 listing processing

use std::fs;
use tempfile::TempDir;
use wayfarer_core::listing::{process_html_file, process_path, render_summary};

const NARA_PAGE: &str = r#"<html><head><title>Nara's best 100 spots</title></head><body>
<fieldset>
  <legend><span style="color:#22AA22">Shrines</span> (3)</legend>
  <table>
    <tr><td>Kasuga Taisha</td></tr>
    <tr><td>Omiwa Shrine</td></tr>
    <tr><td>Isonokami Jingu</td></tr>
  </table>
</fieldset>
<fieldset>
  <legend><span style="color:#22AA22">Parks</span> (1)</legend>
  <table><tr><td>Nara Park</td><td>Nara City</td></tr></table>
</fieldset>
</body></html>"#;

const KYOTO_PAGE: &str = r#"<html><head><title>Kyoto's best 100 spots</title></head><body>
<fieldset>
  <legend><span style="color:#22AA22">Temples</span> (2)</legend>
  <table><tr><td>Kinkaku-ji, Ginkaku-ji</td></tr></table>
</fieldset>
</body></html>"#;

#[test]
fn test_process_single_file_writes_csv() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("Nara.html");
    fs::write(&input, NARA_PAGE).unwrap();
    let out_dir = temp_dir.path().join("output");

    let processed = process_html_file(&input, &out_dir).unwrap();

    assert_eq!(processed.page.prefecture, "Nara");
    assert_eq!(processed.csv, out_dir.join("Nara_top_100.csv"));
    let content = fs::read_to_string(&processed.csv).unwrap();
    assert_eq!(
        content,
        "Prefecture,Category,Place,Location\n\
         Nara,Shrines,Kasuga Taisha,\n\
         Nara,Shrines,Omiwa Shrine,\n\
         Nara,Shrines,Isonokami Jingu,\n\
         Nara,Parks,Nara Park,Nara City\n"
    );
}

#[test]
fn test_process_directory_only_html_in_name_order() {
    let temp_dir = TempDir::new().unwrap();
    let raw = temp_dir.path().join("raw_html");
    fs::create_dir(&raw).unwrap();
    fs::write(raw.join("Nara.html"), NARA_PAGE).unwrap();
    fs::write(raw.join("Kyoto.html"), KYOTO_PAGE).unwrap();
    fs::write(raw.join("notes.txt"), "not a listing").unwrap();
    let out_dir = temp_dir.path().join("output");

    let processed = process_path(&raw, &out_dir).unwrap();

    let prefectures: Vec<&str> = processed
        .iter()
        .map(|p| p.page.prefecture.as_str())
        .collect();
    assert_eq!(prefectures, vec!["Kyoto", "Nara"]);
    assert!(out_dir.join("Kyoto_top_100.csv").exists());
    assert!(out_dir.join("Nara_top_100.csv").exists());
}

#[test]
fn test_process_path_rejects_other_files() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("list.txt");
    fs::write(&input, NARA_PAGE).unwrap();

    assert!(process_path(&input, temp_dir.path()).is_err());
    assert!(process_path(&temp_dir.path().join("missing"), temp_dir.path()).is_err());
}

#[test]
fn test_render_summary() {
    colored::control::set_override(false);
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("Nara.html");
    fs::write(&input, NARA_PAGE).unwrap();

    let processed = process_html_file(&input, temp_dir.path()).unwrap();
    let summary = render_summary(&processed.page);

    assert_eq!(
        summary,
        "\n## Nara Prefecture Top 100 Places\n\
         \n- **Shrines (3)**\n\
         \x20 - Kasuga Taisha\n\
         \x20 - Omiwa Shrine\n\
         \x20 - Isonokami Jingu\n\
         \n- **Parks (1)**\n\
         \x20 - Nara Park (Nara City)\n"
    );
}
