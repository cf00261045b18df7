use commands::command_argument_builder;
use tracing::debug;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt};
use wayfarer::handlers::{
    handle_download, handle_query, handle_scrape, handle_seed, handle_top100, handle_urls,
};

mod commands;

fn main() {
    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();

    init_logging(
        chosen_command.get_flag("verbose"),
        chosen_command.get_flag("quiet"),
    );

    match chosen_command.subcommand() {
        Some((name, primary_command)) => {
            debug!("Running {} subcommand", name);
            match name {
                "seed" => handle_seed(primary_command),
                "query" => handle_query(primary_command),
                "urls" => handle_urls(primary_command),
                "scrape" => handle_scrape(primary_command),
                "download" => handle_download(primary_command),
                "top100" => handle_top100(primary_command),
                _ => unreachable!("clap should ensure we don't get here"),
            }
        }
        None => unreachable!("clap should ensure we don't get here"),
    }
}

/// Logs go to stderr; `RUST_LOG` overrides the level picked from the flags.
fn init_logging(verbose: bool, quiet: bool) {
    let level = if verbose {
        LevelFilter::DEBUG
    } else if quiet {
        LevelFilter::WARN
    } else {
        LevelFilter::INFO
    };

    fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);
