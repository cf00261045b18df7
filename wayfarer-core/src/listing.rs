// Top-100 listing pages: CSV export and console summary.

use crate::error::{CoreError, Result};
use crate::export::sanitize_file_name;
use colored::Colorize;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use wayfarer_scanner::{Top100Page, parse_top100};

#[derive(Debug, Serialize)]
struct ListingRow<'a> {
    prefecture: &'a str,
    category: &'a str,
    place: &'a str,
    location: &'a str,
}

/// A parsed listing page and the CSV it was saved to.
#[derive(Debug, Clone)]
pub struct ProcessedListing {
    pub source: PathBuf,
    pub csv: PathBuf,
    pub page: Top100Page,
}

/// Writes `{prefecture}_top_100.csv`, one row per place.
pub fn save_top100(page: &Top100Page, out_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(out_dir)?;
    let path = out_dir.join(format!(
        "{}_top_100.csv",
        sanitize_file_name(&page.prefecture)
    ));

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(&path)?;
    writer.write_record(["Prefecture", "Category", "Place", "Location"])?;
    for category in &page.categories {
        for place in &category.places {
            writer.serialize(ListingRow {
                prefecture: &page.prefecture,
                category: &category.name,
                place: &place.name,
                location: &place.location,
            })?;
        }
    }
    writer.flush()?;

    info!("Data saved to {}", path.display());
    Ok(path)
}

/// Markdown-style summary of a listing page.
pub fn render_summary(page: &Top100Page) -> String {
    let mut out = format!(
        "\n{}\n",
        format!("## {} Prefecture Top 100 Places", page.prefecture)
            .cyan()
            .bold()
    );
    for category in &page.categories {
        out.push_str(&format!(
            "\n- {}\n",
            format!("**{} ({})**", category.name, category.count).green()
        ));
        for place in &category.places {
            if place.location.is_empty() {
                out.push_str(&format!("  - {}\n", place.name));
            } else {
                out.push_str(&format!(
                    "  - {} {}\n",
                    place.name,
                    format!("({})", place.location).dimmed()
                ));
            }
        }
    }
    out
}

pub fn process_html_file(path: &Path, out_dir: &Path) -> Result<ProcessedListing> {
    info!("Processing {}", path.display());
    let html = fs::read_to_string(path)?;
    let page = parse_top100(&html);
    let csv = save_top100(&page, out_dir)?;
    Ok(ProcessedListing {
        source: path.to_path_buf(),
        csv,
        page,
    })
}

/// Processes one `.html` file, or every `.html` file in a directory in name order.
pub fn process_path(input: &Path, out_dir: &Path) -> Result<Vec<ProcessedListing>> {
    if input.is_dir() {
        let mut files: Vec<PathBuf> = fs::read_dir(input)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file() && is_html(path))
            .collect();
        files.sort();
        files
            .iter()
            .map(|file| process_html_file(file, out_dir))
            .collect()
    } else if input.is_file() && is_html(input) {
        Ok(vec![process_html_file(input, out_dir)?])
    } else {
        Err(CoreError::Other(format!(
            "{} is not an HTML file or a directory containing HTML files",
            input.display()
        )))
    }
}

fn is_html(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "html")
}
