use crate::error::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub const SEARCH_URL_TEMPLATE: &str = "https://www.google.com/maps/search/{query}";

/// Column holding the place name in the location CSVs.
const PLACE_COLUMN: usize = 2;

/// Map search URL for a place name.
pub fn search_url(place: &str) -> String {
    SEARCH_URL_TEMPLATE.replace("{query}", &place.trim().replace(' ', "+"))
}

/// Sibling file the URL list is cached in: `<folder>_urls.txt`.
pub fn cache_path(folder: &Path) -> PathBuf {
    let name = folder
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    folder.with_file_name(format!("{}_urls.txt", name))
}

/// Search URLs for every place listed in the CSV files of `folder`.
///
/// When the cache file already exists its lines are returned as-is, even if
/// the CSV files changed since it was written.
pub fn build_urls(folder: &Path) -> Result<Vec<String>> {
    let cache = cache_path(folder);
    if cache.exists() {
        info!("Reading cached URLs from {}", cache.display());
        let content = fs::read_to_string(&cache)?;
        return Ok(content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect());
    }

    let mut urls = Vec::new();
    for file in csv_files(folder)? {
        debug!("Reading places from {}", file.display());
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(&file)?;

        for (idx, record) in reader.records().enumerate() {
            let record = record?;
            let Some(place) = record.get(PLACE_COLUMN) else {
                warn!(
                    "{}: row {} has {} columns, skipping",
                    file.display(),
                    idx + 2,
                    record.len()
                );
                continue;
            };
            let url = search_url(place);
            if url.to_lowercase().contains("line") {
                debug!("Excluding {}", url);
                continue;
            }
            urls.push(url);
        }
    }

    let mut content = urls.join("\n");
    if !content.is_empty() {
        content.push('\n');
    }
    fs::write(&cache, content)?;
    info!("Wrote {} URLs to {}", urls.len(), cache.display());
    Ok(urls)
}

fn csv_files(folder: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(folder)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
        })
        .collect();
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_url() {
        assert_eq!(
            search_url("Tokyo Tower"),
            "https://www.google.com/maps/search/Tokyo+Tower"
        );
        assert_eq!(
            search_url(" Senso-ji Temple "),
            "https://www.google.com/maps/search/Senso-ji+Temple"
        );
    }

    #[test]
    fn test_cache_path_is_sibling() {
        assert_eq!(
            cache_path(Path::new("data/scraped_locations")),
            PathBuf::from("data/scraped_locations_urls.txt")
        );
    }
}
