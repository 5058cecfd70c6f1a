use crate::demo::{run_demo, run_facets, run_filter, FilterArgs};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use storefront::config::AppConfig;
use storefront::error::AppError;
use storefront::telemetry;

#[derive(Parser, Debug)]
#[command(
    name = "storefront-demo",
    about = "Filter the storefront catalog and inspect the X-Ray decision log",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Apply one filter selection and print the ranked results
    Filter(FilterArgs),
    /// List the sport, brand, and category values available as filters
    Facets(CatalogArgs),
    /// Walk through browse, search, narrow, and reset, then print the X-Ray dashboard (default command)
    Demo(CatalogArgs),
}

#[derive(Args, Debug, Default, Clone)]
pub(crate) struct CatalogArgs {
    /// Load products from a CSV export instead of the synthetic catalog
    #[arg(long)]
    pub(crate) catalog_csv: Option<PathBuf>,
    /// Override the configured synthetic catalog size
    #[arg(long)]
    pub(crate) size: Option<usize>,
    /// Override the configured synthetic catalog seed
    #[arg(long)]
    pub(crate) seed: Option<u64>,
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let command = cli
        .command
        .unwrap_or_else(|| Command::Demo(CatalogArgs::default()));

    match command {
        Command::Filter(args) => run_filter(&config, args),
        Command::Facets(args) => run_facets(&config, &args),
        Command::Demo(args) => run_demo(&config, &args),
    }
}
