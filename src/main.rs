mod error;
mod models;
mod report;
mod scrapers;

use anyhow::Result;
use chrono::Local;
use clap::Parser;
use models::{AggregateTable, Aggregator, SearchQuery, PROVINCES};
use scrapers::{HttpFetcher, OlxScraper, ScraperConfig, StopReason};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Parser)]
#[command(
    name = "olx-scout",
    about = "Scrape the OLX website for your dream apartment!"
)]
struct Cli {
    /// Choose whether to [buy], [rent] or [exchange] a real estate
    transaction: Option<String>,

    /// Province in Poland to search in (empty searches all of them)
    #[arg(long_help = format!("Province in Poland to search in. Available options: {}", PROVINCES.join(", ")))]
    province: Option<String>,

    /// First page queried
    #[arg(allow_negative_numbers = true)]
    start_page: Option<i64>,

    /// Last page queried (defaults to the first one)
    #[arg(allow_negative_numbers = true)]
    end_page: Option<i64>,

    /// Directory the spreadsheet is written to
    #[arg(long, default_value = "Export")]
    export_dir: PathBuf,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,
}

impl Cli {
    fn query(&self) -> SearchQuery {
        let start_page = self.start_page.unwrap_or(1);
        SearchQuery::new(
            self.transaction.as_deref().unwrap_or("buy"),
            self.province.as_deref().unwrap_or(""),
            start_page,
            self.end_page.unwrap_or(start_page),
        )
    }

    fn config(&self) -> ScraperConfig {
        ScraperConfig {
            timeout: Duration::from_secs(self.timeout_secs),
            export_dir: self.export_dir.clone(),
            ..ScraperConfig::default()
        }
    }
}

/// What a Ctrl-C does, depending on whether one already arrived
#[derive(Debug, PartialEq, Eq)]
enum InterruptAction {
    FinishListing,
    Exit,
}

fn on_interrupt(cancel: &AtomicBool) -> InterruptAction {
    if cancel.swap(true, Ordering::SeqCst) {
        InterruptAction::Exit
    } else {
        InterruptAction::FinishListing
    }
}

/// Print the summary and export the table. Runs whatever way the scrape ended.
fn finalize(table: &AggregateTable, query: &SearchQuery, export_dir: &Path) -> Result<PathBuf> {
    let report = report::summarize(table);
    println!("{}", report.render(query.transaction, &query.province));

    let path = report::export(table, export_dir, Local::now())?;
    println!(
        "\n[!] Excel spreadsheet has been successfully exported as {}",
        path.display()
    );
    Ok(path)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    let query = cli.query();
    let config = cli.config();

    println!(
        "Parameters: '{}', '{}', '{}', '{}'",
        query.transaction, query.province, query.start_page, query.end_page
    );

    let fetcher = HttpFetcher::new(&config)?;
    let cancel = Arc::new(AtomicBool::new(false));
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            while tokio::signal::ctrl_c().await.is_ok() {
                match on_interrupt(&cancel) {
                    InterruptAction::FinishListing => {
                        info!("Received interrupt, finishing the current listing (Ctrl-C again to quit now)")
                    }
                    InterruptAction::Exit => {
                        warn!("Second interrupt, exiting without export");
                        std::process::exit(130);
                    }
                }
            }
        });
    }

    let scraper = OlxScraper::new(&fetcher, config.base_url.as_str());
    let mut aggregator = Aggregator::new();
    let outcome = scraper
        .run(&query, &cancel, |row| aggregator.append(row))
        .await;

    match outcome.stop_reason {
        StopReason::Interrupted => println!("\n[!] Web scraping interrupted by the user"),
        StopReason::PastLastPage { requested, last } => {
            info!("Stopped at page {}, the search only has {} pages", requested, last)
        }
        StopReason::Completed => {}
    }
    info!(
        "Visited {} pages, {} listings scraped, {} skipped, {} rows collected",
        outcome.pages_visited,
        outcome.listings_scraped,
        outcome.listings_skipped,
        aggregator.view().len()
    );

    let table = aggregator.finish();
    finalize(&table, &query, &config.export_dir)?;

    Ok(())
}
