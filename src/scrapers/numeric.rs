use crate::error::{ScrapeError, ScrapeResult};
use crate::models::Numeric;
use regex::Regex;
use std::sync::LazyLock;

/// Digit run with an optional decimal-comma fraction
static NUMBER_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+(?:,[0-9]+)?").expect("invalid regex: number token"));

/// Parse a Polish-formatted number out of free text.
///
/// Every digit group in `text` is concatenated, so "2 300 zł" becomes 2300.
/// A single comma fraction turns the result into a float ("45,5 m²" is 45.5).
/// Callers must hand in text holding exactly one semantic number.
pub fn parse_numeric(text: &str) -> ScrapeResult<Numeric> {
    let joined: String = NUMBER_TOKEN.find_iter(text).map(|m| m.as_str()).collect();

    if joined.is_empty() {
        return Err(ScrapeError::Parse(text.to_string()));
    }

    if !joined.contains(',') {
        if let Ok(value) = joined.parse::<i64>() {
            return Ok(Numeric::Int(value));
        }
    }

    joined
        .replace(',', ".")
        .parse::<f64>()
        .map(Numeric::Float)
        .map_err(|_| ScrapeError::Parse(text.to_string()))
}
