// CSV files written for each scraped place.

use crate::error::Result;
use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;
use wayfarer_scanner::{PageScrape, PlaceRecord, ReviewRecord};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

pub const PLACE_HEADERS: &[&str] = &[
    "Name",
    "Address",
    "Phone",
    "Website",
    "Rating",
    "Total_Reviews",
    "Categories",
    "Latitude",
    "Longitude",
];

pub const REVIEW_HEADERS: &[&str] = &[
    "Name",
    "Rating",
    "Date",
    "Review",
    "Place_Name",
    "Address",
    "Phone",
    "Website",
    "Place_Rating",
    "Total_Reviews",
    "Categories",
    "Latitude",
    "Longitude",
];

#[derive(Debug, Serialize)]
struct PlaceRow<'a> {
    name: &'a str,
    address: &'a str,
    phone: &'a str,
    website: &'a str,
    rating: &'a str,
    total_reviews: &'a str,
    categories: &'a str,
    latitude: Option<&'a str>,
    longitude: Option<&'a str>,
}

impl<'a> From<&'a PlaceRecord> for PlaceRow<'a> {
    fn from(place: &'a PlaceRecord) -> Self {
        Self {
            name: &place.name,
            address: &place.address,
            phone: &place.phone,
            website: &place.website,
            rating: &place.rating,
            total_reviews: &place.total_reviews,
            categories: &place.categories,
            latitude: place.latitude.as_deref(),
            longitude: place.longitude.as_deref(),
        }
    }
}

/// A review joined with the columns of the place it belongs to.
#[derive(Debug, Serialize)]
struct ReviewRow<'a> {
    reviewer: &'a str,
    rating: &'a str,
    date: &'a str,
    text: &'a str,
    place_name: &'a str,
    address: &'a str,
    phone: &'a str,
    website: &'a str,
    place_rating: &'a str,
    total_reviews: &'a str,
    categories: &'a str,
    latitude: Option<&'a str>,
    longitude: Option<&'a str>,
}

impl<'a> ReviewRow<'a> {
    fn new(review: &'a ReviewRecord, place: &'a PlaceRecord) -> Self {
        Self {
            reviewer: &review.reviewer,
            rating: &review.rating,
            date: &review.date,
            text: &review.text,
            place_name: &place.name,
            address: &place.address,
            phone: &place.phone,
            website: &place.website,
            place_rating: &place.rating,
            total_reviews: &place.total_reviews,
            categories: &place.categories,
            latitude: place.latitude.as_deref(),
            longitude: place.longitude.as_deref(),
        }
    }
}

/// Paths written for one place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFiles {
    pub info: PathBuf,
    /// `None` when the page had no reviews.
    pub reviews: Option<PathBuf>,
}

fn disallowed_for_filename(c: char) -> bool {
    matches!(
        c,
        '\u{0}'..='\u{1F}' | '<' | '>' | ':' | '\\' | '|' | '?' | '*' | '"' | '/'
    )
}

pub fn sanitize_file_name(name: &str) -> String {
    name.trim().replace(disallowed_for_filename, "_")
}

/// Place name made safe to use as a file name stem.
pub fn file_stem(name: &str) -> String {
    let stem = sanitize_file_name(name);
    if stem.is_empty() {
        "_".to_string()
    } else {
        stem
    }
}

/// Writes `{name}_info.csv` and, when reviews were found, `{name}_reviews.csv`
/// into `out_dir`.
pub fn save_scrape(scrape: &PageScrape, out_dir: &Path) -> Result<ExportedFiles> {
    fs::create_dir_all(out_dir)?;
    let stem = file_stem(&scrape.place.name);

    let info = out_dir.join(format!("{}_info.csv", stem));
    write_with_bom(&info, PLACE_HEADERS, [PlaceRow::from(&scrape.place)])?;
    info!("Place information saved to {}", info.display());

    let reviews = match &scrape.reviews {
        Some(reviews) => {
            let path = out_dir.join(format!("{}_reviews.csv", stem));
            write_with_bom(
                &path,
                REVIEW_HEADERS,
                reviews.iter().map(|review| ReviewRow::new(review, &scrape.place)),
            )?;
            info!("Saved {} reviews to {}", reviews.len(), path.display());
            Some(path)
        }
        None => {
            info!("No reviews found for {}", scrape.place.name);
            None
        }
    };

    Ok(ExportedFiles { info, reviews })
}

fn write_with_bom<T: Serialize>(
    path: &Path,
    headers: &[&str],
    rows: impl IntoIterator<Item = T>,
) -> Result<()> {
    let mut file = File::create(path)?;
    file.write_all(UTF8_BOM)?;

    // header written by hand so an empty row set still gets one
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);
    writer.write_record(headers)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_stem_replaces_reserved_characters() {
        assert_eq!(file_stem("Café: Bar/Grill?"), "Café_ Bar_Grill_");
        assert_eq!(file_stem("  Tokyo Tower "), "Tokyo Tower");
        assert_eq!(file_stem(""), "_");
    }
}
