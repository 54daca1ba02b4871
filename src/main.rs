//! Linkrot main entry point
//!
//! This is the command-line interface for the Linkrot link-rot auditor.

use anyhow::Context;
use clap::Parser;
use linkrot::audit::{AuditSummary, Auditor};
use linkrot::config::{load_config_or_default, Config};
use linkrot::output::{fetch_formatter, FORMATS};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Linkrot: a link-rot auditor for a linked-list feed
///
/// Checks whether the links of a linked-list feed still work and, for broken
/// ones, finds the most recent valid snapshot in the web archive.
#[derive(Parser, Debug)]
#[command(name = "linkrot")]
#[command(version)]
#[command(about = "Audit a linked-list feed for link rot", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Report format (overrides the configuration)
    #[arg(short, long, value_parser = FORMATS)]
    output: Option<String>,

    /// Audit the item on a single permalink page
    #[arg(long, value_name = "URL", conflicts_with = "archive")]
    url: Option<String>,

    /// Audit every item on one monthly archive page
    #[arg(long, value_name = "URL", conflicts_with = "url")]
    archive: Option<String>,

    /// Directory for per-page reports when auditing the whole feed
    #[arg(long, value_name = "DIR", conflicts_with_all = ["url", "archive"])]
    output_dir: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Show the effective configuration and exit
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mut config = load_config_or_default(cli.config.as_deref()).with_context(|| {
        format!(
            "Failed to load configuration from {}",
            cli.config
                .as_deref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "defaults".to_string())
        )
    })?;

    if let Some(format) = &cli.output {
        config.output.format = format.clone();
    }
    if let Some(dir) = &cli.output_dir {
        config.output.directory = dir.display().to_string();
    }

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    let auditor = Auditor::new(config).context("Failed to initialise auditor")?;

    let summary = if let Some(url) = &cli.url {
        handle_single(&auditor, url).await?
    } else if let Some(archive) = &cli.archive {
        handle_archive(&auditor, archive).await?
    } else {
        handle_all(&auditor).await?
    };

    tracing::info!(
        "Checked {} links: {} reachable, {} redirected, {} redirect loops, {} broken ({} with archived copies)",
        summary.checked,
        summary.reachable,
        summary.redirected,
        summary.too_many_redirects,
        summary.broken(),
        summary.archived
    );

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so the report on stdout stays clean.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("linkrot=info,warn"),
            1 => EnvFilter::new("linkrot=debug,info"),
            2 => EnvFilter::new("linkrot=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== Linkrot Dry Run ===\n");

    println!("HTTP:");
    println!("  User agent: {}", config.http.user_agent);
    println!("  Redirect limit: {}", config.http.redirect_limit);
    println!("  Connect timeout: {}s", config.http.connect_timeout_secs);
    println!("  Timeout: {}s", config.http.timeout_secs);
    println!(
        "  TLS certificates: {}",
        if config.http.accept_invalid_certs {
            "not verified"
        } else {
            "verified"
        }
    );

    println!("\nArchive:");
    println!("  Index: {}", config.archive.index_url);
    println!("  Snapshots: {}", config.archive.snapshot_url);

    println!("\nFeed:");
    println!("  Linked list: {}", config.feed.linked_list_url);

    println!("\nOutput:");
    println!("  Format: {}", config.output.format);
    println!("  Directory: {}", config.output.directory);

    println!("\nExtra headers ({} rules):", config.extra_headers.len());
    for rule in &config.extra_headers {
        let names: Vec<&str> = rule.headers.keys().map(String::as_str).collect();
        println!("  - {}: {}", rule.host, names.join(", "));
    }

    println!("\n✓ Configuration is valid");
}

/// Handles --url: audits one permalink page to stdout
async fn handle_single(auditor: &Auditor, url: &str) -> anyhow::Result<AuditSummary> {
    let mut formatter = fetch_formatter(&auditor.config().output.format, Box::new(std::io::stdout()))?;
    auditor
        .audit_single(url, formatter.as_mut())
        .await
        .with_context(|| format!("Audit of {} failed", url))
}

/// Handles --archive: audits one archive page to stdout
async fn handle_archive(auditor: &Auditor, url: &str) -> anyhow::Result<AuditSummary> {
    let mut formatter = fetch_formatter(&auditor.config().output.format, Box::new(std::io::stdout()))?;
    auditor
        .audit_archive_page(url, formatter.as_mut())
        .await
        .with_context(|| format!("Audit of archive page {} failed", url))
}

/// Handles the default mode: audits every archive page into the output directory
async fn handle_all(auditor: &Auditor) -> anyhow::Result<AuditSummary> {
    let output_dir = PathBuf::from(&auditor.config().output.directory);
    tracing::info!("Writing reports to {}", output_dir.display());

    auditor
        .audit_all(&output_dir)
        .await
        .context("Audit of the linked list failed")
}
