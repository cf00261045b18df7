use crate::error::{CoreError, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};
use url::Url;
use wayfarer_scanner::{Fetcher, ScanError};

pub const LISTING_URL_TEMPLATE: &str = "https://j100s.com/en/{pref}.html";

#[rustfmt::skip]
pub const PREFECTURES: [&str; 47] = [
    "Hokkaido",
    "Aomori", "Iwate", "Miyagi", "Akita", "Yamagata", "Fukushima",
    "Ibaraki", "Tochigi", "Gunma", "Saitama", "Chiba", "Tokyo", "Kanagawa",
    "Niigata", "Toyama", "Ishikawa", "Fukui", "Yamanashi", "Nagano", "Gifu", "Shizuoka", "Aichi",
    "Mie", "Shiga", "Kyoto", "Osaka", "Hyogo", "Nara", "Wakayama",
    "Tottori", "Shimane", "Okayama", "Hiroshima", "Yamaguchi",
    "Tokushima", "Kagawa", "Ehime", "Kochi",
    "Fukuoka", "Saga", "Nagasaki", "Kumamoto", "Oita", "Miyazaki", "Kagoshima", "Okinawa",
];

pub fn listing_url(prefecture: &str) -> Result<Url> {
    let raw = LISTING_URL_TEMPLATE.replace("{pref}", prefecture);
    Url::parse(&raw).map_err(|e| ScanError::InvalidUrl(format!("{}: {}", raw, e)).into())
}

#[derive(Debug, Clone, Default)]
pub struct DownloadSummary {
    pub saved: Vec<PathBuf>,
    /// Prefectures whose page could not be fetched.
    pub failed: Vec<String>,
}

/// Fetches the listing page of each prefecture into `out_dir/<name>.html`.
///
/// A failed fetch is logged and that prefecture skipped, without retrying.
/// Failing to write a fetched page stops the run.
pub fn download_listings(
    fetcher: &dyn Fetcher,
    prefectures: &[&str],
    out_dir: &Path,
    show_progress_bars: bool,
) -> Result<DownloadSummary> {
    fs::create_dir_all(out_dir)?;

    let progress_bar = if show_progress_bars {
        let pb = ProgressBar::new(prefectures.len() as u64);
        pb.set_style(
            ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        pb
    } else {
        ProgressBar::hidden()
    };

    let mut summary = DownloadSummary::default();
    for prefecture in prefectures {
        progress_bar.set_message(prefecture.to_string());

        let body = listing_url(prefecture)
            .and_then(|url| fetcher.fetch(&url).map_err(CoreError::from));
        match body {
            Ok(html) => {
                let path = out_dir.join(format!("{}.html", prefecture));
                info!("Writing {} to {}", prefecture, path.display());
                fs::write(&path, html)?;
                summary.saved.push(path);
            }
            Err(e) => {
                error!("Download failed for {}: {}", prefecture, e);
                summary.failed.push(prefecture.to_string());
            }
        }
        progress_bar.inc(1);
    }

    progress_bar.finish_with_message(format!(
        "{} saved, {} failed",
        summary.saved.len(),
        summary.failed.len()
    ));
    Ok(summary)
}
