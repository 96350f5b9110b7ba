use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use heatwatch_core::{
    FileSource, HttpSource, Monitor, MonitorConfig, PageReport, PageSource, StaticSource, WriteMode, summarize,
};
use tracing_subscriber::EnvFilter;

mod echo;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
    None,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "none" | "quiet" => Ok(Self::None),
            _ => Err(format!("Invalid format: {}. Valid options: text, json, none", s)),
        }
    }
}

/// Scrape heat pump listings into a CSV history and summarize it
#[derive(Parser, Debug)]
#[command(name = "heatwatch")]
#[command(version, about = "Monitor heat pump product listings", long_about = None)]
struct Cli {
    /// JSON config file (selectors, table path, source URL, ...)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// CSV table to write to or summarize (default: user data directory)
    #[arg(short, long, global = true, value_name = "FILE")]
    table: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch the current listings and store them in the table
    Fetch(FetchArgs),
    /// Summarize the listings stored in the table
    Summary(SummaryArgs),
}

#[derive(Args, Debug)]
struct FetchArgs {
    /// Listing page URL (default: configured source)
    #[arg(long, value_name = "URL", conflicts_with = "input")]
    url: Option<String>,

    /// Saved listing page to read instead of fetching, or "-" for stdin
    #[arg(short, long, value_name = "FILE")]
    input: Option<String>,

    /// Append to the table instead of overwriting it
    #[arg(long)]
    append: bool,

    /// Skip writing the table
    #[arg(long)]
    no_store: bool,

    /// Manufacturer recorded for every listing
    #[arg(long, value_name = "NAME")]
    manufacturer: Option<String>,

    /// HTTP timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Custom User-Agent for HTTP requests
    #[arg(long, value_name = "UA")]
    user_agent: Option<String>,

    /// Output format for the fetched records (text, json, none)
    #[arg(short, long, default_value = "text", value_name = "FORMAT")]
    format: OutputFormat,
}

#[derive(Args, Debug)]
struct SummaryArgs {
    /// Number of most frequent features to report
    #[arg(long, value_name = "NUM")]
    top: Option<usize>,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text", value_name = "FORMAT")]
    format: OutputFormat,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "heatwatch_core=debug,heatwatch=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn load_config(cli: &Cli) -> anyhow::Result<MonitorConfig> {
    let mut config = match &cli.config {
        Some(path) => MonitorConfig::from_file(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => MonitorConfig::default(),
    };

    if let Some(table) = &cli.table {
        config.table_path = table.clone();
    }

    Ok(config)
}

async fn assemble_from<S: PageSource>(monitor: &Monitor, source: &S, store: bool) -> anyhow::Result<PageReport> {
    let table = &monitor.config().table_path;
    if store {
        monitor
            .fetch_and_store_from(source)
            .await
            .with_context(|| format!("Failed to fetch listings into {}", table.display()))
    } else {
        monitor.fetch_report_from(source).await.context("Failed to fetch listings")
    }
}

async fn run_fetch(args: FetchArgs, mut config: MonitorConfig, verbose: bool) -> anyhow::Result<()> {
    if let Some(url) = args.url {
        config.source_url = url;
    }
    if let Some(manufacturer) = args.manufacturer {
        config.manufacturer = manufacturer;
    }
    if let Some(timeout) = args.timeout {
        config.timeout = timeout;
    }
    if let Some(user_agent) = args.user_agent {
        config.user_agent = user_agent;
    }
    if args.append {
        config.write_mode = WriteMode::Append;
    }

    let store = !args.no_store;
    if store
        && let Some(parent) = config.table_path.parent()
        && cli_owns_default_dir(&config, parent)
    {
        fs::create_dir_all(parent).with_context(|| format!("Failed to create data directory: {}", parent.display()))?;
    }

    let monitor = Monitor::with_config(config);
    let action = if store { "and storing" } else { "without storing" };

    let report = match args.input.as_deref() {
        Some("-") => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read from stdin")?;
            if verbose {
                echo::print_step(1, 2, &format!("Assembling page from stdin {}", action));
                eprintln!("  Size: {}", echo::format_size(buffer.len()));
            }
            assemble_from(&monitor, &StaticSource(buffer), store).await?
        }
        Some(path) => {
            if verbose {
                echo::print_step(1, 2, &format!("Assembling page from {} {}", path, action));
            }
            assemble_from(&monitor, &FileSource::new(path), store).await?
        }
        None => {
            let config = monitor.config();
            if verbose {
                echo::print_step(1, 2, &format!("Fetching {} {}", config.source_url, action));
            }
            let source = HttpSource::new(&config.source_url, config.fetch_config()).context("Invalid source URL")?;
            assemble_from(&monitor, &source, store).await?
        }
    };

    if verbose {
        echo::print_step(2, 2, "Assembled listing page");
        echo::print_page_report(&report);
    }
    if report.fragment_count() == 0 {
        echo::print_warning("No product fragments matched the container selector");
    }

    if store {
        echo::print_success(&format!(
            "Stored {} listings in {}",
            report.records.len(),
            monitor.config().table_path.display()
        ));
    }

    match args.format {
        OutputFormat::Text => print!("{}", echo::render_records(&report.records)),
        OutputFormat::Json => {
            let body = serde_json::json!({
                "success": true,
                "count": report.records.len(),
                "products": report.records,
            });
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        OutputFormat::None => {}
    }

    Ok(())
}

/// Only the default data directory is created on demand; a user-supplied
/// table path must already have its directory.
fn cli_owns_default_dir(config: &MonitorConfig, parent: &std::path::Path) -> bool {
    let default_path = heatwatch_core::default_table_path();
    config.table_path == default_path && default_path.parent() == Some(parent)
}

fn run_summary(args: SummaryArgs, config: MonitorConfig, verbose: bool) -> anyhow::Result<()> {
    let top = args.top.unwrap_or(config.top_features);

    if verbose {
        echo::print_step(1, 1, &format!("Summarizing {}", config.table_path.display()));
        eprintln!();
    }

    let summary = summarize(&config.table_path, top)
        .with_context(|| format!("Failed to summarize table: {}", config.table_path.display()))?;

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Text => print!("{}", echo::render_summary(&summary)),
        OutputFormat::None => {}
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.verbose {
        echo::print_banner();
    }

    let result = match load_config(&cli) {
        Ok(config) => match cli.command {
            Command::Fetch(args) => run_fetch(args, config, cli.verbose).await,
            Command::Summary(args) => run_summary(args, config, cli.verbose),
        },
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        echo::print_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}
