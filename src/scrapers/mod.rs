pub mod detail;
pub mod http;
pub mod listing;
pub mod numeric;
pub mod olx;
pub mod traits;
pub mod types;

pub use http::HttpFetcher;
pub use olx::{OlxScraper, StopReason};
pub use types::ScraperConfig;
