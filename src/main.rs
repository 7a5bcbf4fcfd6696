//! Wikisift main entry point
//!
//! This is the command-line interface for the wikisift secrets scanner.

use anyhow::{bail, Context};
use clap::Parser;
use std::path::PathBuf;
use wikisift::config::{load_config_with_hash, validate, Config};
use wikisift::report::{print_report, write_json};
use wikisift::{run_scan, RegexDetector};
use tracing_subscriber::EnvFilter;

/// Wikisift: a secrets scanner for Confluence-style wikis
///
/// Wikisift crawls every space and page of a wiki through its REST API,
/// optionally walking historical page versions, and scans the retrieved
/// content for accidentally committed secrets.
#[derive(Parser, Debug)]
#[command(name = "wikisift")]
#[command(version)]
#[command(about = "Scan a wiki for committed secrets", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Base URL of the wiki (overrides the config file)
    #[arg(long, value_name = "URL")]
    url: Option<String>,

    /// Username or email for basic auth
    #[arg(long)]
    username: Option<String>,

    /// API token for basic auth
    #[arg(long)]
    token: Option<String>,

    /// Comma-separated space keys to scan (default: all)
    #[arg(long, value_delimiter = ',')]
    spaces: Vec<String>,

    /// Also scan historical page versions
    #[arg(long)]
    history: bool,

    /// Rule tag filters, e.g. "token,key" (default: all rules)
    #[arg(long, value_delimiter = ',')]
    rules: Vec<String>,

    /// Write a JSON copy of the report to this path
    #[arg(long, value_name = "FILE")]
    json_out: Option<PathBuf>,

    /// Validate config and show what would be scanned without scanning
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = build_config(&cli)?;

    if !config.source.has_credentials() {
        tracing::warn!(
            "no credentials provided; scanning anonymously, only public pages are visible"
        );
    }

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    let detector = if cli.rules.is_empty() {
        RegexDetector::new()
    } else {
        let detector = RegexDetector::with_filters(&cli.rules);
        if detector.rule_count() == 0 {
            bail!("rule filters {:?} match no rules", cli.rules);
        }
        detector
    };
    tracing::info!(
        "scanning {} with {} rules",
        config.source.base_url,
        detector.rule_count()
    );

    let report = run_scan(&config, &detector).await?;

    print_report(&report);

    let json_path = cli
        .json_out
        .clone()
        .or_else(|| report_path_from_config(&config));
    if let Some(path) = json_path {
        write_json(&report, &path)
            .with_context(|| format!("failed to write JSON report to {}", path.display()))?;
        tracing::info!("JSON report written to {}", path.display());
    }

    if report.has_fatal_failure() {
        bail!("scan aborted: authentication was rejected by the remote");
    }

    Ok(())
}

/// Assembles the effective configuration from file and flag sources.
///
/// A config file is optional when --url is given; flags override file
/// values either way. The merged result is validated before use.
fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => match &cli.url {
            Some(url) => Config::from_base_url(url),
            None => bail!("either --config or --url is required"),
        },
    };

    if let Some(url) = &cli.url {
        config.source.base_url = url.clone();
    }
    if let Some(username) = &cli.username {
        config.source.username = Some(username.clone());
    }
    if let Some(token) = &cli.token {
        config.source.token = Some(token.clone());
    }
    if !cli.spaces.is_empty() {
        config.source.spaces = cli.spaces.clone();
    }
    if cli.history {
        config.source.history = true;
    }

    validate(&config)?;
    Ok(config)
}

fn report_path_from_config(config: &Config) -> Option<PathBuf> {
    config.report.json_path.as_ref().map(PathBuf::from)
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("wikisift=info,warn"),
            1 => EnvFilter::new("wikisift=debug,info"),
            2 => EnvFilter::new("wikisift=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates config and shows what would be scanned
fn handle_dry_run(config: &Config) {
    println!("=== Wikisift Dry Run ===\n");

    println!("Source:");
    println!("  Base URL: {}", config.source.base_url);
    println!(
        "  Credentials: {}",
        if config.source.has_credentials() {
            "basic auth"
        } else {
            "anonymous"
        }
    );
    if config.source.spaces.is_empty() {
        println!("  Spaces: all discovered spaces");
    } else {
        println!("  Spaces: {}", config.source.spaces.join(", "));
    }
    println!("  History: {}", config.source.history);

    println!("\nCrawler:");
    println!(
        "  Max concurrent requests: {}",
        config.crawler.max_concurrent_requests
    );
    println!("  Window size: {}", config.crawler.window_size);
    println!(
        "  Request timeout: {}s",
        config.crawler.request_timeout_seconds
    );

    if let Some(path) = &config.report.json_path {
        println!("\nReport:");
        println!("  JSON output: {}", path);
    }

    println!("\n✓ Configuration is valid");
}
