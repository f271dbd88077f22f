use crate::models::{title_case, AggregateTable, Measure, Numeric, Transaction};

const LOWER_QUANTILE: f64 = 0.45;
const UPPER_QUANTILE: f64 = 0.55;

/// The cheapest listing of a run
#[derive(Debug, Clone, PartialEq)]
pub struct CheapestListing {
    pub price: Numeric,
    pub area: Option<Measure>,
    pub city: String,
}

/// Price band around the median and the cheapest offer
#[derive(Debug, Clone, PartialEq)]
pub enum SummaryReport {
    NoData,
    Stats {
        price_lower: i64,
        price_upper: i64,
        /// Smallest and largest exact area among rows priced inside the band
        area_range: Option<(f64, f64)>,
        cheapest: CheapestListing,
    },
}

/// Quantile with linear interpolation between closest ranks.
/// `sorted` must be non-empty and ascending.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    sorted[lower] + (sorted[upper] - sorted[lower]) * (position - lower as f64)
}

pub fn summarize(table: &AggregateTable) -> SummaryReport {
    if table.is_empty() {
        return SummaryReport::NoData;
    }
    let rows = table.rows();

    let mut prices: Vec<f64> = rows.iter().map(|row| row.price.as_f64()).collect();
    prices.sort_by(|a, b| a.total_cmp(b));

    // bounds are cut to whole zloty, not rounded
    let price_lower = quantile(&prices, LOWER_QUANTILE).trunc() as i64;
    let price_upper = quantile(&prices, UPPER_QUANTILE).trunc() as i64;

    let area_range = rows
        .iter()
        .filter(|row| {
            let price = row.price.as_f64();
            price >= price_lower as f64 && price <= price_upper as f64
        })
        .filter_map(|row| row.area.and_then(|area| area.exact()))
        .fold(None, |range: Option<(f64, f64)>, area| match range {
            Some((min, max)) => Some((min.min(area), max.max(area))),
            None => Some((area, area)),
        });

    // first row wins on equal prices
    let cheapest = rows
        .iter()
        .reduce(|best, row| {
            if row.price.as_f64() < best.price.as_f64() {
                row
            } else {
                best
            }
        })
        .map(|row| CheapestListing {
            price: row.price,
            area: row.area,
            city: row.city.clone(),
        });

    match cheapest {
        Some(cheapest) => SummaryReport::Stats {
            price_lower,
            price_upper,
            area_range,
            cheapest,
        },
        None => SummaryReport::NoData,
    }
}

impl SummaryReport {
    /// Console text for the report
    pub fn render(&self, transaction: Transaction, province: &str) -> String {
        let SummaryReport::Stats {
            price_lower,
            price_upper,
            area_range,
            cheapest,
        } = self
        else {
            return "\nNo apartments were collected, nothing to summarize".to_string();
        };

        let place = if province.is_empty() {
            "all provinces".to_string()
        } else {
            format!("{} province", title_case(province))
        };
        let areas = match area_range {
            Some((min, max)) => format!("{} to {} m²", min, max),
            None => "unknown m²".to_string(),
        };
        let cheapest_area = cheapest
            .area
            .map(|area| area.to_string())
            .unwrap_or_else(|| "?".to_string());

        format!(
            "\nAverage price of apartments for {} in {}, Poland is ranging from {} to {} PLN, \
             corresponding to the area ranging from {}\n\
             If you are looking for a cheap accommodation, a {} m² apartment for {} PLN is available in {}",
            transaction.summary_label(),
            place,
            price_lower,
            price_upper,
            areas,
            cheapest_area,
            cheapest.price,
            cheapest.city
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Aggregator, Row};

    fn row(city: &str, area: Option<Measure>, price: i64) -> Row {
        Row {
            city: city.to_string(),
            district: String::new(),
            area,
            rooms: None,
            price: Numeric::Int(price),
        }
    }

    fn area(value: i64) -> Option<Measure> {
        Some(Measure::Exact(Numeric::Int(value)))
    }

    fn table(rows: Vec<Row>) -> AggregateTable {
        let mut aggregator = Aggregator::new();
        rows.into_iter().for_each(|row| aggregator.append(row));
        aggregator.finish()
    }

    #[test]
    fn test_empty_table_has_no_data() {
        let report = summarize(&AggregateTable::default());
        assert_eq!(report, SummaryReport::NoData);
        assert!(report.render(Transaction::Buy, "").contains("nothing to summarize"));
    }

    #[test]
    fn test_interpolated_price_band() {
        let report = summarize(&table(vec![
            row("A", area(30), 500),
            row("B", area(40), 100),
            row("C", area(50), 300),
            row("D", area(60), 200),
            row("E", area(70), 400),
        ]));

        let SummaryReport::Stats {
            price_lower,
            price_upper,
            area_range,
            cheapest,
        } = report
        else {
            panic!("expected stats");
        };
        assert_eq!((price_lower, price_upper), (280, 320));
        assert_eq!(area_range, Some((50.0, 50.0)));
        assert_eq!(cheapest.city, "B");
        assert_eq!(cheapest.price, Numeric::Int(100));
    }

    #[test]
    fn test_fractional_band_bounds_are_truncated() {
        // quantiles are 145.45 and 155.55
        let report = summarize(&table(vec![
            row("A", area(40), 100),
            row("B", area(60), 201),
        ]));
        let SummaryReport::Stats {
            price_lower,
            price_upper,
            ..
        } = report
        else {
            panic!("expected stats");
        };
        assert_eq!((price_lower, price_upper), (145, 155));
    }

    #[test]
    fn test_band_without_rows_and_sentinel_areas() {
        let report = summarize(&table(vec![
            row("A", Some(Measure::OpenEnded(10)), 100),
            row("B", area(45), 200),
        ]));
        let SummaryReport::Stats { area_range, .. } = report else {
            panic!("expected stats");
        };
        // band is 145..155, no row priced inside it
        assert_eq!(area_range, None);
    }

    #[test]
    fn test_cheapest_ties_pick_first_row() {
        let report = summarize(&table(vec![
            row("Gdynia", area(80), 900),
            row("Sopot", area(20), 150),
            row("Gdańsk", area(25), 150),
        ]));
        let SummaryReport::Stats { cheapest, .. } = &report else {
            panic!("expected stats");
        };
        assert_eq!(cheapest.city, "Sopot");
        assert_eq!(cheapest.area, area(20));

        let text = report.render(Transaction::Rent, "pomorskie");
        assert!(text.contains("apartments for rent in Pomorskie province"));
        assert!(text.contains("a 20 m² apartment for 150 PLN is available in Sopot"));
    }

    #[test]
    fn test_single_row() {
        let report = summarize(&table(vec![row("Opole", area(33), 250_000)]));
        let SummaryReport::Stats {
            price_lower,
            price_upper,
            area_range,
            ..
        } = report
        else {
            panic!("expected stats");
        };
        assert_eq!((price_lower, price_upper), (250_000, 250_000));
        assert_eq!(area_range, Some((33.0, 33.0)));
    }
}
