pub mod table;

pub use table::{AggregateTable, Aggregator};

use std::fmt;

/// Provinces accepted as a search filter, as they appear in OLX URLs
pub const PROVINCES: [&str; 16] = [
    "dolnoslaskie",
    "kujawsko-pomorskie",
    "lubelskie",
    "lubuskie",
    "lodzkie",
    "malopolskie",
    "mazowieckie",
    "opolskie",
    "podkarpackie",
    "podlaskie",
    "pomorskie",
    "slaskie",
    "swietokrzyskie",
    "warminsko-mazurskie",
    "wielkopolskie",
    "zachodnio-pomorskie",
];

/// Kind of real-estate transaction being searched for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Transaction {
    #[default]
    Buy,
    Rent,
    Exchange,
}

impl Transaction {
    /// Lenient parse of the CLI value; anything unknown means `Buy`.
    pub fn from_arg(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "rent" => Self::Rent,
            "exchange" => Self::Exchange,
            _ => Self::Buy,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Rent => "rent",
            Self::Exchange => "exchange",
        }
    }

    /// Path segment OLX uses for this transaction
    pub fn path_segment(&self) -> &'static str {
        match self {
            Self::Buy => "sprzedaz",
            Self::Rent => "wynajem",
            Self::Exchange => "zamiana",
        }
    }

    /// Noun used in the summary sentence ("apartments for sale")
    pub fn summary_label(&self) -> &'static str {
        match self {
            Self::Buy => "sale",
            Self::Rent => "rent",
            Self::Exchange => "exchange",
        }
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lowercased province name, or an empty string (all provinces) when the
/// input is not one of [`PROVINCES`].
pub fn resolve_province(value: &str) -> String {
    let lowered = value.trim().to_lowercase();
    if PROVINCES.contains(&lowered.as_str()) {
        lowered
    } else {
        String::new()
    }
}

/// Clamp a raw page range: start is at least 1, end is at least start.
pub fn resolve_pages(start: i64, end: i64) -> (u32, u32) {
    let start = start.clamp(1, u32::MAX as i64) as u32;
    let end = if end < start as i64 {
        start
    } else {
        end.min(u32::MAX as i64) as u32
    };
    (start, end)
}

/// Capitalise every word the way listing titles are echoed to the console
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut after_letter = false;
    for c in text.chars() {
        if after_letter {
            out.extend(c.to_lowercase());
        } else {
            out.extend(c.to_uppercase());
        }
        after_letter = c.is_alphabetic();
    }
    out
}

/// One user query, fixed for the lifetime of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub transaction: Transaction,
    pub province: String,
    pub start_page: u32,
    pub end_page: u32,
}

impl SearchQuery {
    pub fn new(transaction: &str, province: &str, start_page: i64, end_page: i64) -> Self {
        let (start_page, end_page) = resolve_pages(start_page, end_page);
        Self {
            transaction: Transaction::from_arg(transaction),
            province: resolve_province(province),
            start_page,
            end_page,
        }
    }
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self::new("buy", "", 1, 1)
    }
}

/// A number as written on the site: whole or with a decimal comma
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Numeric {
    Int(i64),
    Float(f64),
}

impl Numeric {
    pub fn as_f64(&self) -> f64 {
        match *self {
            Self::Int(value) => value as f64,
            Self::Float(value) => value,
        }
    }
}

impl fmt::Display for Numeric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(value) => write!(f, "{}", value),
            Self::Float(value) => write!(f, "{}", value),
        }
    }
}

/// Area or room count. `OpenEnded(n)` is the site's "n or more" bucket,
/// shown as `>n`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Measure {
    Exact(Numeric),
    OpenEnded(u32),
}

impl Measure {
    pub fn exact(&self) -> Option<f64> {
        match self {
            Self::Exact(value) => Some(value.as_f64()),
            Self::OpenEnded(_) => None,
        }
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(value) => write!(f, "{}", value),
            Self::OpenEnded(bound) => write!(f, ">{}", bound),
        }
    }
}

/// Summary of one advertisement on a search-results page
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    pub title: String,
    pub price: Numeric,
    pub localisation: String,
    pub detail_link: String,
}

impl Listing {
    /// Split "City, District" into its parts. A localisation without a
    /// district yields an empty one.
    pub fn city_and_district(&self) -> (String, String) {
        split_localisation(&self.localisation)
    }
}

pub fn split_localisation(localisation: &str) -> (String, String) {
    match localisation.split_once(", ") {
        Some((city, district)) => (city.to_string(), district.to_string()),
        None => (localisation.to_string(), String::new()),
    }
}

/// Attributes read from a listing's own page. Either may be missing when
/// the page does not carry the label.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ListingDetail {
    pub area: Option<Measure>,
    pub rooms: Option<Measure>,
}

/// One line of the exported table
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub city: String,
    pub district: String,
    pub area: Option<Measure>,
    pub rooms: Option<Measure>,
    pub price: Numeric,
}

impl Row {
    pub fn from_listing(listing: &Listing, detail: ListingDetail) -> Self {
        let (city, district) = listing.city_and_district();
        Self {
            city,
            district,
            area: detail.area,
            rooms: detail.rooms,
            price: listing.price,
        }
    }
}
