use thiserror::Error;

/// Errors raised while pulling a single page or listing apart.
///
/// None of these abort a run: the scraper logs them and moves on to the
/// next listing (or page).
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("no numeric value in {0:?}")]
    Parse(String),

    #[error("missing element: {0}")]
    Lookup(String),

    #[error("failed to fetch {url}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("invalid selector {0:?}")]
    Selector(String),
}

pub type ScrapeResult<T> = std::result::Result<T, ScrapeError>;
