//! Site-Scout main entry point
//!
//! Command-line front end for the crawl engine: takes a seed URL (or a seed
//! file), drives a crawl, and writes the markdown report summary.

use anyhow::{bail, Context};
use clap::Parser;
use site_scout::config::{load_config_with_hash, validate, Config, OutputConfig, ProxyConfig};
use site_scout::crawler::run_crawl;
use site_scout::report::{generate_markdown_summary, CrawlObserver, CrawlRow};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Site-Scout: a pre-migration site crawler
///
/// Site-Scout visits same-site pages starting from a seed URL, routed
/// through a same-origin proxy, and reports every page visited together
/// with its link statistics and failure classification.
#[derive(Parser, Debug)]
#[command(name = "site-scout")]
#[command(version)]
#[command(about = "Crawl a site and report its pages and links", long_about = None)]
struct Cli {
    /// Seed URL to start crawling from
    #[arg(value_name = "SEED", required_unless_present = "seed_file")]
    seed: Option<String>,

    /// Read seed URLs from a file, one per line (invalid lines are skipped)
    #[arg(long, value_name = "FILE", conflicts_with = "seed")]
    seed_file: Option<PathBuf>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Origin of the same-origin proxy (required unless set in the config file)
    #[arg(long, value_name = "ORIGIN")]
    proxy_origin: Option<String>,

    /// Delay after page load before links are extracted, in milliseconds
    #[arg(long, value_name = "MS")]
    settle_delay_ms: Option<u64>,

    /// Ceiling on a single page render, in milliseconds
    #[arg(long, value_name = "MS")]
    render_timeout_ms: Option<u64>,

    /// Keep embedded page scripts in rendered documents
    #[arg(long)]
    enable_page_scripts: bool,

    /// Print each crawled URL as it is recorded
    #[arg(long)]
    show_preview: bool,

    /// Where to write the markdown summary (overrides the config file)
    #[arg(long, value_name = "PATH")]
    summary: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

/// Observer wired to the CLI: logs every page, prints it when previewing
struct ConsoleObserver {
    show_preview: bool,
}

impl CrawlObserver for ConsoleObserver {
    fn page_crawled(&self, row: &CrawlRow, crawled: usize) {
        tracing::info!("Crawled ({}) {} [{}]", crawled, row.url, row.status);
        if self.show_preview {
            println!("[{}] {} - {}", crawled, row.url, row.status);
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let (config, config_hash) = build_config(&cli)?;
    let seeds = collect_seeds(&cli)?;

    tracing::info!("Proxy origin: {}", config.proxy.origin);
    tracing::info!("Seed URLs: {}", seeds.len());

    let observer = ConsoleObserver {
        show_preview: config.crawl.show_preview,
    };
    let report = run_crawl(&config, &seeds, observer)
        .await
        .context("Crawl failed")?;

    let summary_path = Path::new(&config.output.summary_path);
    generate_markdown_summary(&report, &seeds[0], config_hash.as_deref(), summary_path)
        .with_context(|| format!("Failed to write summary to {}", summary_path.display()))?;

    println!(
        "Crawled {} pages, summary written to {}",
        report.crawled(),
        summary_path.display()
    );

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("site_scout=info,warn"),
            1 => EnvFilter::new("site_scout=debug,info"),
            2 => EnvFilter::new("site_scout=trace,debug"),
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

/// Builds the effective configuration from the config file and CLI overrides
fn build_config(cli: &Cli) -> anyhow::Result<(Config, Option<String>)> {
    let (mut config, hash) = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded (hash: {})", hash);
            (config, Some(hash))
        }
        None => {
            let origin = cli
                .proxy_origin
                .clone()
                .context("Either --config or --proxy-origin is required")?;
            (
                Config {
                    crawl: Default::default(),
                    proxy: ProxyConfig { origin },
                    output: OutputConfig::default(),
                },
                None,
            )
        }
    };

    if let Some(origin) = &cli.proxy_origin {
        config.proxy.origin = origin.clone();
    }
    if let Some(delay) = cli.settle_delay_ms {
        config.crawl.settle_delay_ms = delay;
    }
    if let Some(timeout) = cli.render_timeout_ms {
        config.crawl.render_timeout_ms = timeout;
    }
    if cli.enable_page_scripts {
        config.crawl.enable_page_scripts = true;
    }
    if cli.show_preview {
        config.crawl.show_preview = true;
    }
    if let Some(summary) = &cli.summary {
        config.output.summary_path = summary.display().to_string();
    }

    validate(&config).context("Invalid effective configuration")?;

    Ok((config, hash))
}

/// Collects the seed list from the positional argument or the seed file
fn collect_seeds(cli: &Cli) -> anyhow::Result<Vec<String>> {
    if let Some(seed) = &cli.seed {
        if seed.trim().is_empty() {
            bail!("Seed URL is empty");
        }
        return Ok(vec![seed.trim().to_string()]);
    }

    // Seed file mode: one URL per line, lines that do not parse are skipped
    let path = cli
        .seed_file
        .as_ref()
        .expect("clap guarantees seed or seed_file");
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read seed file {}", path.display()))?;

    let seeds: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && url::Url::parse(line).is_ok())
        .map(str::to_string)
        .collect();

    if seeds.is_empty() {
        bail!("No valid URLs found in seed file {}", path.display());
    }

    Ok(seeds)
}
