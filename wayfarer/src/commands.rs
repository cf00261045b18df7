use crate::CLAP_STYLING;
use clap::{arg, command};
use wayfarer_core::config::{
    DEFAULT_DB_PATH, DEFAULT_LISTING_OUTPUT, DEFAULT_RAW_HTML_DIR, DEFAULT_SCRAPE_OUTPUT,
};

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("wayfarer")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("wayfarer")
        .styles(CLAP_STYLING)
        .arg(
            arg!(-q --"quiet" "Suppress progress bars and informational logging")
                .required(false)
                .global(true)
                .conflicts_with("verbose"),
        )
        .arg(
            arg!(-v --"verbose" "Enable debug logging")
                .required(false)
                .global(true),
        )
        .arg(
            arg!(--"db" <PATH>)
                .required(false)
                .global(true)
                .help("Location of the travel database")
                .default_value(DEFAULT_DB_PATH),
        )
        .subcommand_required(true)
        .subcommand(
            command!("seed")
                .about("Creates the travel tables and inserts the continent and country seed data"),
        )
        .subcommand(
            command!("query")
                .about("Runs one SQL statement and prints its rows")
                .arg(
                    arg!(<SQL>)
                        .required(true)
                        .help("The statement to run, e.g. \"SELECT * FROM continents\""),
                ),
        )
        .subcommand(
            command!("urls")
                .about("Builds map search URLs from a folder of location CSV files")
                .arg(
                    arg!(<FOLDER>)
                        .required(true)
                        .help("Folder of CSV files with the place name in the third column")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                ),
        )
        .subcommand(
            command!("scrape")
                .about(
                    "Opens each place in a browser and saves its details and reviews as CSV \
                files",
                )
                .arg(
                    arg!(<FOLDER>)
                        .required(true)
                        .help("Folder of location CSV files to build the target URLs from")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                )
                .arg(
                    arg!(-o --"output" <DIR>)
                        .required(false)
                        .help("Directory the CSV files are written to")
                        .default_value(DEFAULT_SCRAPE_OUTPUT),
                )
                .arg(
                    arg!(--"headless")
                        .required(false)
                        .help("Run the browser without a window")
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(
                    arg!(--"scrolls" <NUM>)
                        .required(false)
                        .help("Number of scroll iterations over the review list")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("8"),
                ),
        )
        .subcommand(
            command!("download")
                .about("Downloads the Top-100 listing page of every prefecture")
                .arg(
                    arg!(-o --"output" <DIR>)
                        .required(false)
                        .help("Directory the raw HTML pages are written to")
                        .default_value(DEFAULT_RAW_HTML_DIR),
                ),
        )
        .subcommand(
            command!("top100")
                .about("Extracts Top-100 places from downloaded listing pages into CSV files")
                .arg(
                    arg!([PATH])
                        .required(false)
                        .help("An HTML file or a directory of HTML files")
                        .default_value("./raw_html/"),
                )
                .arg(
                    arg!(-o --"output" <DIR>)
                        .required(false)
                        .help("Directory the CSV files are written to")
                        .default_value(DEFAULT_LISTING_OUTPUT),
                ),
        )
}
