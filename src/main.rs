//! iradio - Internet radio directory scraper
//!
//! # Usage
//!
//! ```bash
//! # List the directory's categories with their index
//! iradio categories
//!
//! # Scrape categories 3 to 7 into a new snapshot schema
//! iradio populate --range 3-7
//!
//! # Merge the two oldest snapshots into the destination schema
//! iradio schemas
//! iradio update --few 0 1
//! ```

mod commands;
mod error;
mod select;

use crate::commands::App;
use crate::error::{ErrorKind, Result};
use crate::select::SelectArgs;
use clap::{Parser, Subcommand};
use exn::ResultExt;
use iradio_config::Config;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Internet radio stream scraper for https://www.internet-radio.com/
#[derive(Parser, Debug)]
#[command(name = "iradio")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Path to an additional configuration file (TOML, YAML or JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log filter, e.g. "debug" or "iradio_fetch=trace" (overridden by RUST_LOG)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    /// Directory root URL, overriding the configured one
    #[arg(short = 'l', long, visible_alias = "link", global = true)]
    url: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show available categories
    #[command(visible_alias = "show-genres")]
    Categories,
    /// Show snapshot schemas that can be merged
    Schemas,
    /// Scrape categories into a new snapshot schema
    #[command(visible_alias = "populate-db")]
    Populate(SelectArgs),
    /// Merge snapshot schemas into the destination schema
    Update {
        #[command(flatten)]
        select: SelectArgs,
        /// Report what would change, then roll back
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(err) = init_logging(&cli.log_level) {
        eprintln!("{err:?}");
        return ExitCode::FAILURE;
    }
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err:?}");
            ExitCode::FAILURE
        },
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load(cli.config.as_deref()).or_raise(|| ErrorKind::Config)?;
    if let Some(url) = cli.url {
        config.site.url = url;
    }
    tracing::debug!(?config, "Configuration loaded");
    let app = App::new(config);
    match cli.command {
        Command::Categories => app.categories().await,
        Command::Schemas => app.schemas().await,
        Command::Populate(select) => app.populate(&select).await,
        Command::Update { select, dry_run } => app.update(&select, dry_run).await,
    }
}

/// Initialize the tracing subscriber for logging. Logs go to stderr so that
/// listings on stdout stay clean.
fn init_logging(level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .or_raise(|| ErrorKind::Logging)?;

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .try_init()
        .or_raise(|| ErrorKind::Logging)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use rstest::rstest;
    use std::ops::RangeInclusive;

    fn parse(args: &[&str]) -> std::result::Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("iradio").chain(args.iter().copied()))
    }

    #[test]
    fn test_cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[rstest]
    #[case(&["categories"])]
    #[case(&["show-genres"])]
    #[case(&["--url", "http://localhost/", "categories"])]
    #[case(&["categories", "--link", "http://localhost/"])]
    fn test_categories(#[case] args: &[&str]) {
        assert!(matches!(parse(args).unwrap().command, Command::Categories));
    }

    #[rstest]
    #[case(&["populate", "--all"], SelectArgs { all: true, ..Default::default() })]
    #[case(&["populate-db", "-o", "7"], SelectArgs { one: Some(7), ..Default::default() })]
    #[case(&["populate", "--range", "12-35"], SelectArgs { range: Some(12..=35), ..Default::default() })]
    #[case(&["populate", "-f", "5", "8", "11", "25"], SelectArgs { few: Some(vec![5, 8, 11, 25]), ..Default::default() })]
    #[case(&["populate"], SelectArgs::default())]
    fn test_populate_selectors(#[case] args: &[&str], #[case] expected: SelectArgs) {
        let Command::Populate(select) = parse(args).unwrap().command else { panic!("expected populate") };
        assert_eq!(select, expected);
    }

    #[test]
    fn test_update_dry_run() {
        let Command::Update { select, dry_run } = parse(&["update", "--range", "0-2", "--dry-run"]).unwrap().command
        else {
            panic!("expected update")
        };
        assert!(dry_run);
        assert_eq!(select.range, Some::<RangeInclusive<usize>>(0..=2));
    }

    #[rstest]
    #[case(&["populate", "--all", "--one", "3"])]
    #[case(&["populate", "--range", "5-2"])]
    #[case(&["populate", "--range", "4-4"])]
    #[case(&["update", "--one", "x"])]
    #[case(&["frobnicate"])]
    fn test_rejected(#[case] args: &[&str]) {
        assert!(parse(args).is_err());
    }
}
