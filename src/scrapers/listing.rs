use crate::error::{ScrapeError, ScrapeResult};
use crate::models::Listing;
use crate::scrapers::numeric::parse_numeric;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

pub(crate) fn selector(css: &str) -> ScrapeResult<Selector> {
    Selector::parse(css).map_err(|_| ScrapeError::Selector(css.to_string()))
}

/// Concatenated text of an element, trimmed
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn first<'a>(scope: ElementRef<'a>, css: &str, what: &str) -> ScrapeResult<ElementRef<'a>> {
    let selector = selector(css)?;
    let found = scope.select(&selector).next();
    found.ok_or_else(|| ScrapeError::Lookup(what.to_string()))
}

/// What a search-results page yields once parsed
#[derive(Debug)]
pub struct ResultsPage {
    /// Highest page number the pager offers
    pub last_page: u32,
    /// Listing entries in document order; failed entries keep their slot
    pub listings: Vec<ScrapeResult<Listing>>,
}

/// Parse a search-results page into its pager limit and listing summaries.
pub fn parse_results_page(html: &str) -> ScrapeResult<ResultsPage> {
    let document = Html::parse_document(html);
    let last_page = last_page(&document)?;

    let entry_selector = selector("div.offer-wrapper")?;
    let listings: Vec<_> = document
        .select(&entry_selector)
        .map(extract_listing)
        .collect();

    debug!("Found {} listing entries, last page {}", listings.len(), last_page);

    Ok(ResultsPage {
        last_page,
        listings,
    })
}

/// Page number in the last pager item. A page without a pager is the only page.
pub fn last_page(document: &Html) -> ScrapeResult<u32> {
    let pager_selector = selector("span.item.fleft")?;
    let last_item = document.select(&pager_selector).last();
    match last_item {
        Some(item) => {
            let text = element_text(item);
            text.parse::<u32>().map_err(|_| ScrapeError::Parse(text))
        }
        None => Ok(1),
    }
}

/// Pull title, price, localisation and detail link out of one entry.
pub fn extract_listing(entry: ElementRef<'_>) -> ScrapeResult<Listing> {
    let title = element_text(first(entry, "strong", "listing title")?);
    let price = parse_numeric(&element_text(first(entry, "p.price", "listing price")?))?;

    let bottom_cell = first(entry, "td.bottom-cell", "listing bottom cell")?;
    let localisation = element_text(first(
        bottom_cell,
        "small.breadcrumb.x-normal",
        "listing localisation",
    )?);

    let detail_link = first(entry, "a", "listing link")?
        .value()
        .attr("href")
        .ok_or_else(|| ScrapeError::Lookup("listing link href".to_string()))?
        .to_string();

    Ok(Listing {
        title,
        price,
        localisation,
        detail_link,
    })
}
