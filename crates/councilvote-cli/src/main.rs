use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use councilvote_core::MonthRange;
use councilvote_core::config::{DEFAULT_API_BASE, DEFAULT_BODY_ID, DEFAULT_SITE_BASE};
use councilvote_legistar::{LegistarClient, RetryPolicy};
use councilvote_runner::RunConfig;
use councilvote_scrape::{ExtractorConfig, HttpSessionFactory};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod csv;

/// Per-item council vote records from Legistar.
#[derive(Parser, Debug)]
#[command(name = "councilvote")]
#[command(about = "Reconcile Legistar agenda items with per-member votes scraped from meeting pages")]
#[command(version)]
struct Args {
    /// Calendar year to fetch
    #[arg(short, long, env = "COUNCILVOTE_YEAR")]
    year: i32,

    /// First month of the window (inclusive)
    #[arg(long, default_value_t = 1, env = "COUNCILVOTE_START_MONTH")]
    start_month: u32,

    /// Month after the window (exclusive); 13 runs through December
    #[arg(long, default_value_t = 4, env = "COUNCILVOTE_END_MONTH")]
    end_month: u32,

    /// Output CSV path [default: council_votes_<year>_Q<quarter>.csv]
    #[arg(short, long, env = "COUNCILVOTE_OUTPUT")]
    output: Option<PathBuf>,

    /// Parallel workers; 1 runs sequentially
    #[arg(short, long, default_value_t = 1, env = "COUNCILVOTE_WORKERS")]
    workers: usize,

    /// Ask for a visible browser window
    #[arg(long, env = "COUNCILVOTE_HEADED")]
    headed: bool,

    /// Fetch item detail pages for AgendaItemDescription
    #[arg(long, env = "COUNCILVOTE_SCRAPE_SUMMARIES")]
    scrape_summaries: bool,

    /// Fetch API roll calls for items the meeting page has no votes for
    #[arg(long, env = "COUNCILVOTE_API_ROLL_CALLS")]
    api_roll_calls: bool,

    /// JSON roster file adding or overriding years
    #[arg(long, env = "COUNCILVOTE_ROSTER_FILE")]
    roster_file: Option<PathBuf>,

    #[arg(long, default_value = DEFAULT_API_BASE, env = "COUNCILVOTE_API_BASE")]
    api_base: String,

    #[arg(long, default_value = DEFAULT_SITE_BASE, env = "COUNCILVOTE_SITE_BASE")]
    site_base: String,

    /// Legistar body id of the meeting body
    #[arg(long, default_value_t = DEFAULT_BODY_ID, env = "COUNCILVOTE_BODY_ID")]
    body_id: i64,

    /// Debug logging unless RUST_LOG says otherwise
    #[arg(short, long, env = "COUNCILVOTE_VERBOSE")]
    verbose: bool,
}

impl Args {
    fn run_config(&self) -> Result<RunConfig> {
        let months = MonthRange::new(self.start_month, self.end_month)
            .context("invalid month range")?;
        let mut config = RunConfig::new(self.year, months);
        if let Some(output) = &self.output {
            config.output = output.clone();
        }
        config.headless = !self.headed;
        config.workers = self.workers.max(1);
        config.scrape_summaries = self.scrape_summaries;
        config.api_roll_calls = self.api_roll_calls;
        config.roster_file = self.roster_file.clone();
        config.site.api_base = self.api_base.clone();
        config.site.site_base = self.site_base.clone();
        config.site.body_id = self.body_id;
        config.extractor = ExtractorConfig::default().with_site_base(self.site_base.clone());
        Ok(config)
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);
    info!("councilvote v{}", env!("CARGO_PKG_VERSION"));

    let config = args.run_config()?;
    let retry = RetryPolicy::default();
    let source = LegistarClient::with_retry(&config.site.api_base, config.site.body_id, retry)
        .context("failed to build API client")?;
    let factory = HttpSessionFactory::new(&config.site.site_base, retry.request_timeout)
        .context("failed to build page driver")?;

    let output = councilvote_runner::run(&config, Arc::new(source), Arc::new(factory))
        .await
        .with_context(|| format!("run for {} failed", config.year))?;

    csv::write_file(&config.output, &output.table)
        .with_context(|| format!("failed to write {}", config.output.display()))?;
    info!(
        path = %config.output.display(),
        rows = output.table.records.len(),
        "wrote CSV"
    );
    output.summary.log();
    Ok(())
}
