use std::path::PathBuf;
use std::time::Duration;

/// Settings shared by the HTTP client, the listing scraper and the exporter
#[derive(Debug, Clone)]
pub struct ScraperConfig {
    /// Apartment listings root, without transaction or province
    pub base_url: String,
    pub user_agent: String,
    pub timeout: Duration,
    /// Directory the spreadsheet is written to
    pub export_dir: PathBuf,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.olx.pl/nieruchomosci/mieszkania".to_string(),
            user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
            timeout: Duration::from_secs(30),
            export_dir: PathBuf::from("Export"),
        }
    }
}
