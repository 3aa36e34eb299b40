use crate::models::RawListing;
use crate::scrapers::types::SelectorSet;
use anyhow::{anyhow, Result};
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

/// Listing detail-page parser with pre-compiled selector chains
#[derive(Debug)]
pub struct ListingParser {
    title: Vec<Selector>,
    price: Vec<Selector>,
    year: Vec<Selector>,
    mileage: Vec<Selector>,
    gear: Vec<Selector>,
    engine: Vec<Selector>,
    drive: Vec<Selector>,
    paint: Vec<Selector>,
    fuel: Vec<Selector>,
    opening_price: Vec<Selector>,
    images: Vec<Selector>,
}

fn compile(chain: &[String]) -> Result<Vec<Selector>> {
    chain
        .iter()
        .map(|css| Selector::parse(css).map_err(|e| anyhow!("invalid selector {:?}: {:?}", css, e)))
        .collect()
}

impl ListingParser {
    pub fn new(selectors: &SelectorSet) -> Result<Self> {
        Ok(Self {
            title: compile(&selectors.title)?,
            price: compile(&selectors.price)?,
            year: compile(&selectors.year)?,
            mileage: compile(&selectors.mileage)?,
            gear: compile(&selectors.gear)?,
            engine: compile(&selectors.engine)?,
            drive: compile(&selectors.drive)?,
            paint: compile(&selectors.paint)?,
            fuel: compile(&selectors.fuel)?,
            opening_price: compile(&selectors.opening_price)?,
            images: compile(&selectors.images)?,
        })
    }

    /// Pull a [`RawListing`] out of a detail page.
    ///
    /// Never fails; anything the selectors miss is left empty.
    pub fn parse(&self, html: &str, source_url: &str) -> RawListing {
        let document = Html::parse_document(html);
        let text = |chain: &[Selector]| first_text(&document, chain);

        let title = text(&self.title);
        let (brand, model) = split_title(&title);
        debug!("Parsed title {:?} -> brand {:?}, model {:?}", title, brand, model);

        let mut raw = RawListing::new(source_url);
        raw.brand = brand;
        raw.model = model;
        raw.price = text(&self.price);
        raw.year = text(&self.year);
        raw.mileage = text(&self.mileage);
        raw.gear = text(&self.gear);
        raw.engine = text(&self.engine);
        raw.drive = text(&self.drive);
        raw.paint = text(&self.paint);
        raw.fuel = text(&self.fuel);
        raw.opening_price = text(&self.opening_price);

        for selector in &self.images {
            for img in document.select(selector) {
                let src = img
                    .value()
                    .attr("data-src")
                    .filter(|s| !s.trim().is_empty())
                    .or_else(|| img.value().attr("src"));
                if let Some(src) = src {
                    raw.image_urls.push(src.to_string());
                }
            }
        }
        debug!("Found {} image candidates on {}", raw.image_urls.len(), source_url);

        raw
    }
}

fn first_text(document: &Html, chain: &[Selector]) -> String {
    chain
        .iter()
        .filter_map(|selector| document.select(selector).next())
        .map(element_text)
        .find(|t| !t.is_empty())
        .unwrap_or_default()
}

fn element_text(element: ElementRef<'_>) -> String {
    let text = element
        .text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    if text.is_empty() {
        element.value().attr("content").unwrap_or("").trim().to_string()
    } else {
        text
    }
}

/// First word of the title is the brand, the rest is the model
fn split_title(title: &str) -> (String, String) {
    let mut words = title.split_whitespace();
    match words.next() {
        Some(brand) => {
            let rest = words.collect::<Vec<_>>().join(" ");
            let model = if rest.is_empty() { brand.to_string() } else { rest };
            (brand.to_string(), model)
        }
        None => (String::new(), String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><head><meta property="og:title" content="Kia K5 2021"></head>
        <body>
          <h1 class="car-title">Hyundai  Sonata
            DN8</h1>
          <div data-testid="price">2,450 만원</div>
          <span class="year">2020</span>
          <span class="mileage">35,000 km</span>
          <span class="transmission">Auto</span>
          <span class="engine">1,999cc</span>
          <span class="drive">FF</span>
          <span class="bodywork">RX</span>
          <div class="gallery">
            <img data-src="/carpicture/1.jpg" src="/placeholder.gif">
            <img src="https://ci.encar.com/carpicture/2.jpg">
            <img src="https://ci.encar.com/carpicture/2.jpg">
          </div>
        </body></html>
    "#;

    fn parser() -> ListingParser {
        ListingParser::new(&SelectorSet::default()).unwrap()
    }

    #[test]
    fn parses_fields_from_detail_page() {
        let listing = parser()
            .parse(PAGE, "https://fem.encar.com/cars/detail/123")
            .normalize();

        assert_eq!(listing.id(), "123");
        assert_eq!(listing.brand(), "Hyundai");
        assert_eq!(listing.model(), "Sonata DN8");
        assert_eq!(listing.price(), "2,450 만원");
        assert_eq!(listing.year(), "2020");
        assert_eq!(listing.mileage(), "35,000 km");
        assert_eq!(listing.gear(), "Auto");
        assert_eq!(listing.engine(), "1,999cc");
        assert_eq!(listing.drive(), "FF");
        assert_eq!(listing.paint(), "RX");
        assert_eq!(listing.fuel(), "");
        assert_eq!(listing.opening_price(), "");
    }

    #[test]
    fn images_prefer_data_src_and_are_absolute_and_unique() {
        let listing = parser()
            .parse(PAGE, "https://fem.encar.com/cars/detail/123")
            .normalize();

        assert_eq!(
            listing.image_urls(),
            &[
                "https://fem.encar.com/carpicture/1.jpg".to_string(),
                "https://ci.encar.com/carpicture/2.jpg".to_string(),
            ]
        );
        assert_eq!(listing.image_count(), 2);
    }

    #[test]
    fn title_falls_back_to_og_meta() {
        let html = r#"<html><head><meta property="og:title" content="Kia K5 2021"></head>
            <body><h1>   </h1></body></html>"#;
        let listing = parser()
            .parse(html, "https://fem.encar.com/cars/detail/456")
            .normalize();

        assert_eq!(listing.brand(), "Kia");
        assert_eq!(listing.model(), "K5 2021");
    }

    #[test]
    fn empty_page_yields_blank_listing() {
        let listing = parser()
            .parse("<html></html>", "https://fem.encar.com/cars/detail/9")
            .normalize();

        assert_eq!(listing.brand(), "Unknown");
        assert_eq!(listing.model(), "");
        assert!(listing.image_urls().is_empty());
    }

    #[test]
    fn invalid_selector_is_rejected() {
        let mut selectors = SelectorSet::default();
        selectors.price = vec!["[[[".to_string()];
        assert!(ListingParser::new(&selectors).is_err());
    }
}
