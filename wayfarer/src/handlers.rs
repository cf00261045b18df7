use clap::ArgMatches;
use colored::Colorize;
use std::path::{Path, PathBuf};
use wayfarer_core::config::Settings;
use wayfarer_core::data::Database;
use wayfarer_core::download::{PREFECTURES, download_listings};
use wayfarer_core::listing::{process_path, render_summary};
use wayfarer_core::scrape::{ScrapeOptions, TargetOutcome, execute_scrape};
use wayfarer_core::seed::seed_database;
use wayfarer_core::urls::{build_urls, cache_path};
use wayfarer_scanner::{ChromeSession, HttpFetcher, LaunchConfig, Pacing};

// Helper functions

/// Expand a leading `~` in a user supplied path.
pub fn expand_path(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).as_ref())
}

/// Builds the scrape targets for a folder of location CSVs.
pub fn load_targets(folder: &Path) -> Result<Vec<String>, String> {
    let urls = build_urls(folder)
        .map_err(|e| format!("Failed to build URLs from {}: {}", folder.display(), e))?;

    if urls.is_empty() {
        return Err(format!("No place URLs found in {}", folder.display()));
    }
    Ok(urls)
}

/// Settings shared by every subcommand, filled from the global arguments.
pub fn base_settings(args: &ArgMatches) -> Settings {
    let mut settings = Settings::default();
    if let Some(db) = args.get_one::<String>("db") {
        settings.db_path = expand_path(db);
    }
    settings
}

fn show_progress(args: &ArgMatches) -> bool {
    !args.get_flag("quiet")
}

fn print_divider() {
    println!("{}", "═".repeat(60).bright_blue().bold());
}

fn print_header(title: &str) {
    print_divider();
    println!("{}", format!("  {}", title).bright_white().bold());
    print_divider();
    println!();
}

fn fail(msg: impl std::fmt::Display) -> ! {
    eprintln!("{} {}", "✗".red().bold(), msg);
    std::process::exit(1);
}

// Subcommand handlers

pub fn handle_seed(args: &ArgMatches) {
    let settings = base_settings(args);
    let db = Database::new(&settings.db_path);

    print_header("WAYFARER SEED");
    println!(
        "{} Database: {}",
        "→".blue(),
        db.path().display().to_string().bright_white()
    );

    match seed_database(&db) {
        Ok(()) => println!(
            "{} Continents and countries seeded",
            "✓".green().bold()
        ),
        Err(e) => fail(format!("Seeding failed: {}", e)),
    }
}

pub fn handle_query(args: &ArgMatches) {
    let settings = base_settings(args);
    let Some(sql) = args.get_one::<String>("SQL") else {
        fail("No SQL statement given");
    };

    let db = Database::new(&settings.db_path);
    match db.execute_query(sql) {
        Ok(output) if output.is_empty() => {}
        Ok(output) => println!("{}", output),
        Err(e) => fail(format!("Error: {}", e)),
    }
}

pub fn handle_urls(args: &ArgMatches) {
    let Some(folder) = args.get_one::<PathBuf>("FOLDER") else {
        fail("No folder given");
    };

    match build_urls(folder) {
        Ok(urls) => {
            for url in &urls {
                println!("{}", url);
            }
            println!();
            println!(
                "{} {} URLs cached in {}",
                "✓".green().bold(),
                urls.len(),
                cache_path(folder).display().to_string().bright_white()
            );
        }
        Err(e) => fail(format!("Failed to build URLs: {}", e)),
    }
}

pub fn handle_scrape(args: &ArgMatches) {
    let Some(folder) = args.get_one::<PathBuf>("FOLDER") else {
        fail("No folder given");
    };
    let scrolls = args
        .get_one::<usize>("scrolls")
        .copied()
        .unwrap_or(Pacing::default().scroll_iterations);

    let mut settings = base_settings(args);
    if let Some(out) = args.get_one::<String>("output") {
        settings.scrape_output = expand_path(out);
    }
    settings.headless = args.get_flag("headless");
    settings.pacing = settings.pacing.with_scroll_iterations(scrolls);

    print_header("WAYFARER SCRAPE");

    let urls = load_targets(folder).unwrap_or_else(|e| fail(e));
    println!("{} {} targets loaded", "✓".green().bold(), urls.len());
    println!(
        "{} Output: {}",
        "→".blue(),
        settings.scrape_output.display().to_string().bright_white()
    );
    println!();

    let launch = LaunchConfig {
        headless: settings.headless,
        ..LaunchConfig::default()
    };
    let session = ChromeSession::launch(&launch)
        .unwrap_or_else(|e| fail(format!("Failed to start browser: {}", e)));

    let options = ScrapeOptions {
        out_dir: settings.scrape_output.clone(),
        pacing: settings.pacing.clone(),
        show_progress_bars: show_progress(args),
    };
    let summary = execute_scrape(&session, &urls, &options);
    drop(session);

    println!();
    print_divider();
    for outcome in &summary.outcomes {
        match outcome {
            TargetOutcome::Saved { place, reviews, .. } => println!(
                "{} {} ({} reviews)",
                "✓".green().bold(),
                place.bright_white(),
                reviews
            ),
            TargetOutcome::Skipped { url, stage, reason } => println!(
                "{} {} [{}] {}",
                "✗".red().bold(),
                url,
                stage.as_str().yellow(),
                reason
            ),
        }
    }
    print_divider();
    println!(
        "{} saved, {} skipped, {} reviews",
        summary.saved().to_string().green().bold(),
        summary.skipped().to_string().red().bold(),
        summary.total_reviews()
    );
}

pub fn handle_download(args: &ArgMatches) {
    let mut settings = base_settings(args);
    if let Some(out) = args.get_one::<String>("output") {
        settings.raw_html_dir = expand_path(out);
    }

    print_header("WAYFARER DOWNLOAD");

    let fetcher =
        HttpFetcher::new().unwrap_or_else(|e| fail(format!("Failed to create HTTP client: {}", e)));
    let summary = download_listings(
        &fetcher,
        &PREFECTURES,
        &settings.raw_html_dir,
        show_progress(args),
    )
    .unwrap_or_else(|e| fail(format!("Download failed: {}", e)));

    println!(
        "{} {} listing pages saved to {}",
        "✓".green().bold(),
        summary.saved.len(),
        settings.raw_html_dir.display().to_string().bright_white()
    );
    if !summary.failed.is_empty() {
        println!(
            "{} Failed: {}",
            "✗".red().bold(),
            summary.failed.join(", ")
        );
    }
}

pub fn handle_top100(args: &ArgMatches) {
    let mut settings = base_settings(args);
    if let Some(out) = args.get_one::<String>("output") {
        settings.listing_output = expand_path(out);
    }
    let input = args
        .get_one::<String>("PATH")
        .map(|p| expand_path(p))
        .unwrap_or_else(|| settings.raw_html_dir.clone());

    let processed = process_path(&input, &settings.listing_output)
        .unwrap_or_else(|e| fail(format!("Please provide a valid HTML file or directory: {}", e)));

    for listing in &processed {
        println!(
            "{} {}",
            "→".blue(),
            listing.source.display().to_string().bright_white()
        );
        println!("{}", render_summary(&listing.page));
        println!(
            "{} Data saved to {}",
            "✓".green().bold(),
            listing.csv.display().to_string().bright_white()
        );
    }
}
