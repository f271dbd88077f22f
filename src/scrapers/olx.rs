use crate::models::{title_case, Listing, ListingDetail, Measure, Row, SearchQuery};
use crate::scrapers::detail::fetch_detail;
use crate::scrapers::listing::parse_results_page;
use crate::scrapers::traits::PageFetcher;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};

/// Why the page loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Every requested page was visited
    Completed,
    /// The requested page is past the last page the site offers
    PastLastPage { requested: u32, last: u32 },
    /// The user asked to stop
    Interrupted,
}

/// Counters reported once the page loop is over
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeOutcome {
    pub stop_reason: StopReason,
    pub pages_visited: u32,
    pub listings_scraped: usize,
    pub listings_skipped: usize,
}

/// Walks OLX search-result pages and resolves every listing to a [`Row`]
pub struct OlxScraper<'a> {
    fetcher: &'a dyn PageFetcher,
    base_url: String,
}

impl<'a> OlxScraper<'a> {
    pub fn new(fetcher: &'a dyn PageFetcher, base_url: impl Into<String>) -> Self {
        Self {
            fetcher,
            base_url: base_url.into(),
        }
    }

    /// Search URL for a query, without the page parameter
    pub fn search_url(&self, query: &SearchQuery) -> String {
        format!(
            "{}/{}/{}",
            self.base_url.trim_end_matches('/'),
            query.transaction.path_segment(),
            query.province
        )
    }

    /// Scrape pages `start_page..=end_page` of the query, calling `on_row`
    /// with each listing's row in page then listing order.
    ///
    /// `cancel` is checked before every page and every listing; once set the
    /// loop returns without starting another fetch. A listing or page that
    /// fails to fetch or parse is logged and skipped.
    pub async fn run<F>(&self, query: &SearchQuery, cancel: &AtomicBool, mut on_row: F) -> ScrapeOutcome
    where
        F: FnMut(Row),
    {
        let search_url = self.search_url(query);
        let message = format!("Searching through {}", search_url);
        if query.start_page == query.end_page {
            println!("\n{}, page {}:\n", message, query.end_page);
        } else {
            println!(
                "\n{}, from {} to {} page:\n",
                message, query.start_page, query.end_page
            );
        }

        let mut outcome = ScrapeOutcome {
            stop_reason: StopReason::Completed,
            pages_visited: 0,
            listings_scraped: 0,
            listings_skipped: 0,
        };

        'pages: for page in query.start_page..=query.end_page {
            if cancel.load(Ordering::SeqCst) {
                outcome.stop_reason = StopReason::Interrupted;
                break;
            }

            let page_url = format!("{}?page={}", search_url, page);
            let results = match self.fetcher.fetch(&page_url).await {
                Ok(html) => parse_results_page(&html),
                Err(e) => Err(e),
            };
            let results = match results {
                Ok(results) => results,
                Err(e) => {
                    warn!("Skipping page {}: {}", page, e);
                    continue;
                }
            };

            if page > results.last_page {
                info!("Page {} is past the last page ({})", page, results.last_page);
                outcome.stop_reason = StopReason::PastLastPage {
                    requested: page,
                    last: results.last_page,
                };
                break;
            }
            outcome.pages_visited += 1;

            for (index, listing) in results.listings.into_iter().enumerate() {
                if cancel.load(Ordering::SeqCst) {
                    outcome.stop_reason = StopReason::Interrupted;
                    break 'pages;
                }
                let index = index + 1;

                let listing = match listing {
                    Ok(listing) => listing,
                    Err(e) => {
                        warn!("Skipping page {}, ad {}: {}", page, index, e);
                        outcome.listings_skipped += 1;
                        continue;
                    }
                };

                match fetch_detail(self.fetcher, &listing.detail_link).await {
                    Ok(detail) => {
                        println!("{}", progress_line(page, index, &listing, &detail));
                        on_row(Row::from_listing(&listing, detail));
                        outcome.listings_scraped += 1;
                    }
                    Err(e) => {
                        warn!("Skipping {}: {}", listing.detail_link, e);
                        outcome.listings_skipped += 1;
                    }
                }
            }
        }

        debug!("Scrape finished: {:?}", outcome);
        outcome
    }
}

fn display_measure(measure: Option<Measure>) -> String {
    measure.map(|m| m.to_string()).unwrap_or_else(|| "?".to_string())
}

/// Console line echoed for every scraped listing
pub fn progress_line(page: u32, index: usize, listing: &Listing, detail: &ListingDetail) -> String {
    format!(
        "\t[Page {}, Ad {}] [{}] {}: {} m², {} PLN",
        page,
        index,
        title_case(&listing.title),
        listing.localisation,
        display_measure(detail.area),
        listing.price
    )
}
