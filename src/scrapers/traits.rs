use crate::error::ScrapeResult;
use crate::models::ListingDetail;
use async_trait::async_trait;
use scraper::Html;

/// Fetches the raw HTML of a page.
/// Lets the scraper run against the live site or an in-memory fixture.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> ScrapeResult<String>;
}

/// Reads area and room count from a parsed detail page.
/// One implementation per page template.
pub trait DetailExtractor: Send + Sync {
    fn extract(&self, document: &Html) -> ScrapeResult<ListingDetail>;

    /// Name of the template, for logging
    fn template_name(&self) -> &'static str;
}
