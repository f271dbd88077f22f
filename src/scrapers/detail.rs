use crate::error::{ScrapeError, ScrapeResult};
use crate::models::{ListingDetail, Measure};
use crate::scrapers::listing::{element_text, selector};
use crate::scrapers::numeric::parse_numeric;
use crate::scrapers::traits::{DetailExtractor, PageFetcher};
use scraper::Html;
use tracing::debug;
use url::Url;

const AREA_LABEL: &str = "Powierzchnia";
const ROOMS_LABEL: &str = "Liczba pokoi";

/// Room count OLX reports instead of a number for large flats
const OLX_FOUR_OR_MORE: &str = "4 i więcej";
/// Suffix otodom uses for its open-ended buckets
const OTODOM_MORE_THAN_TEN: &str = "więcej niż 10";

/// Page layout of a listing's detail page, decided by the link's host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailTemplate {
    /// olx.pl offer page: parallel label and value lists
    Olx,
    /// Federated partner page (otodom): labelled regions
    Otodom,
}

impl DetailTemplate {
    pub fn for_url(link: &str) -> Self {
        let on_olx = match Url::parse(link) {
            Ok(url) => url
                .host_str()
                .map(|host| host == "olx.pl" || host.ends_with(".olx.pl"))
                .unwrap_or(false),
            // relative links point back at olx itself
            Err(_) => true,
        };

        if on_olx {
            Self::Olx
        } else {
            Self::Otodom
        }
    }

    pub fn extractor(&self) -> &'static dyn DetailExtractor {
        match self {
            Self::Olx => &OlxTemplate,
            Self::Otodom => &OtodomTemplate,
        }
    }
}

/// Fetch a listing's detail page and read its area and room count.
pub async fn fetch_detail(fetcher: &dyn PageFetcher, link: &str) -> ScrapeResult<ListingDetail> {
    let template = DetailTemplate::for_url(link);
    let html = fetcher.fetch(link).await?;

    let document = Html::parse_document(&html);
    let extractor = template.extractor();
    debug!("Reading {} with the {} template", link, extractor.template_name());
    extractor.extract(&document)
}

/// olx.pl offer page.
///
/// Labels and values are separate lists paired by position. Each wanted
/// label is searched for after the previous match, so a label repeated
/// before the next wanted one can hide it and the attribute is left out.
pub struct OlxTemplate;

impl OlxTemplate {
    fn value(raw: &str) -> ScrapeResult<Measure> {
        if raw == OLX_FOUR_OR_MORE {
            Ok(Measure::OpenEnded(4))
        } else {
            parse_numeric(raw).map(Measure::Exact)
        }
    }
}

impl DetailExtractor for OlxTemplate {
    fn extract(&self, document: &Html) -> ScrapeResult<ListingDetail> {
        let name_selector = selector("span.offer-details__name")?;
        let value_selector = selector("strong.offer-details__value")?;
        let names: Vec<String> = document.select(&name_selector).map(element_text).collect();
        let values: Vec<String> = document.select(&value_selector).map(element_text).collect();

        let mut found = [None, None];
        let mut start = 0;
        for (slot, label) in [AREA_LABEL, ROOMS_LABEL].into_iter().enumerate() {
            let Some(offset) = names.iter().skip(start).position(|name| name == label) else {
                continue;
            };
            let index = start + offset;
            start = index + 1;

            if let Some(raw) = values.get(index) {
                found[slot] = Some(Self::value(raw)?);
            }
        }

        Ok(ListingDetail {
            area: found[0],
            rooms: found[1],
        })
    }

    fn template_name(&self) -> &'static str {
        "olx"
    }
}

/// Partner page with one `role="region"` block per attribute.
pub struct OtodomTemplate;

impl OtodomTemplate {
    fn region(document: &Html, label: &str) -> ScrapeResult<Measure> {
        let css = format!(r#"div[role="region"][aria-label="{}"]"#, label);
        let region_selector = selector(&css)?;
        let region = document
            .select(&region_selector)
            .next()
            .ok_or_else(|| ScrapeError::Lookup(format!("region {}", label)))?;

        let raw = element_text(region);
        if raw.ends_with(OTODOM_MORE_THAN_TEN) {
            Ok(Measure::OpenEnded(10))
        } else {
            parse_numeric(&raw).map(Measure::Exact)
        }
    }
}

impl DetailExtractor for OtodomTemplate {
    fn extract(&self, document: &Html) -> ScrapeResult<ListingDetail> {
        Ok(ListingDetail {
            area: Some(Self::region(document, AREA_LABEL)?),
            rooms: Some(Self::region(document, ROOMS_LABEL)?),
        })
    }

    fn template_name(&self) -> &'static str {
        "otodom"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Numeric;

    fn olx_page(pairs: &[(&str, &str)]) -> Html {
        let items: String = pairs
            .iter()
            .map(|(name, value)| {
                format!(
                    r#"<tr><th><span class="offer-details__name">{}</span></th>
                       <td><strong class="offer-details__value">{}</strong></td></tr>"#,
                    name, value
                )
            })
            .collect();
        Html::parse_document(&format!("<table>{}</table>", items))
    }

    #[test]
    fn test_template_selection() {
        assert_eq!(
            DetailTemplate::for_url("https://www.olx.pl/d/oferta/abc.html"),
            DetailTemplate::Olx
        );
        assert_eq!(
            DetailTemplate::for_url("https://www.otodom.pl/pl/oferta/abc"),
            DetailTemplate::Otodom
        );
        assert_eq!(
            DetailTemplate::for_url("https://www.otodom.pl/?ref=olx.pl"),
            DetailTemplate::Otodom
        );
    }

    #[test]
    fn test_relative_link_uses_olx_template() {
        assert_eq!(
            DetailTemplate::for_url("/d/oferta/x.html"),
            DetailTemplate::Olx
        );
        assert_eq!(DetailTemplate::for_url("oferta/x.html"), DetailTemplate::Olx);
    }

    #[test]
    fn test_olx_pairs_labels_with_values() {
        let document = olx_page(&[
            ("Oferta od", "Osoby prywatnej"),
            ("Powierzchnia", "48,5 m²"),
            ("Poziom", "3"),
            ("Liczba pokoi", "2 pokoje"),
        ]);
        let detail = OlxTemplate.extract(&document).unwrap();
        assert_eq!(detail.area, Some(Measure::Exact(Numeric::Float(48.5))));
        assert_eq!(detail.rooms, Some(Measure::Exact(Numeric::Int(2))));
    }

    #[test]
    fn test_olx_four_or_more_rooms() {
        let document = olx_page(&[("Powierzchnia", "120 m²"), ("Liczba pokoi", "4 i więcej")]);
        let detail = OlxTemplate.extract(&document).unwrap();
        assert_eq!(detail.area, Some(Measure::Exact(Numeric::Int(120))));
        assert_eq!(detail.rooms, Some(Measure::OpenEnded(4)));
        assert_eq!(detail.rooms.unwrap().to_string(), ">4");
    }

    #[test]
    fn test_olx_missing_label_is_omitted() {
        let document = olx_page(&[("Liczba pokoi", "3 pokoje")]);
        let detail = OlxTemplate.extract(&document).unwrap();
        assert_eq!(detail.area, None);
        assert_eq!(detail.rooms, Some(Measure::Exact(Numeric::Int(3))));
    }

    #[test]
    fn test_olx_rooms_before_area_is_not_found() {
        let document = olx_page(&[("Liczba pokoi", "3 pokoje"), ("Powierzchnia", "60 m²")]);
        let detail = OlxTemplate.extract(&document).unwrap();
        assert_eq!(detail.area, Some(Measure::Exact(Numeric::Int(60))));
        assert_eq!(detail.rooms, None);
    }

    #[test]
    fn test_otodom_regions() {
        let document = Html::parse_document(
            r#"<div role="region" aria-label="Powierzchnia"><div>Powierzchnia</div><div>72,3 m²</div></div>
               <div role="region" aria-label="Liczba pokoi"><div>Liczba pokoi</div><div>więcej niż 10</div></div>"#,
        );
        let detail = OtodomTemplate.extract(&document).unwrap();
        assert_eq!(detail.area, Some(Measure::Exact(Numeric::Float(72.3))));
        assert_eq!(detail.rooms, Some(Measure::OpenEnded(10)));
        assert_eq!(detail.rooms.unwrap().to_string(), ">10");
    }

    #[test]
    fn test_otodom_missing_region_is_fatal() {
        let document = Html::parse_document(
            r#"<div role="region" aria-label="Powierzchnia">50 m²</div>"#,
        );
        assert!(matches!(
            OtodomTemplate.extract(&document),
            Err(ScrapeError::Lookup(_))
        ));
    }
}
