use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Detail-page prefix used when the caller passes a bare listing id
pub const DEFAULT_BASE_URL: &str = "https://fem.encar.com/cars/detail";

/// Settings shared by every listing source
#[derive(Debug, Clone)]
pub struct ScrapeOptions {
    /// Detail pages live at `{base_url}/{id}`
    pub base_url: String,
    /// Upper bound for loading one page
    pub navigation_timeout: Duration,
    /// Extra wait after navigation so client-side rendering can finish
    pub settle: Duration,
    pub user_agent: String,
    pub selectors: SelectorSet,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            navigation_timeout: Duration::from_millis(20_000),
            settle: Duration::from_millis(1_500),
            user_agent: "Mozilla/5.0".to_string(),
            selectors: SelectorSet::default(),
        }
    }
}

impl ScrapeOptions {
    pub fn detail_url(&self, id: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), id.trim())
    }
}

/// CSS selector fallback chains for each listing field.
///
/// Every entry is tried in order; the first one whose first match yields
/// non-empty text wins. Elements without text fall back to their `content`
/// attribute, so `<meta>` tags work as well.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectorSet {
    pub title: Vec<String>,
    pub price: Vec<String>,
    pub year: Vec<String>,
    pub mileage: Vec<String>,
    pub gear: Vec<String>,
    pub engine: Vec<String>,
    pub drive: Vec<String>,
    pub paint: Vec<String>,
    pub fuel: Vec<String>,
    pub opening_price: Vec<String>,
    /// Gallery images; `data-src` is preferred over `src`
    pub images: Vec<String>,
}

fn chain(selectors: &[&str]) -> Vec<String> {
    selectors.iter().map(|s| s.to_string()).collect()
}

impl Default for SelectorSet {
    fn default() -> Self {
        Self {
            title: chain(&[
                "[data-testid='title'], h1, .car-title, .title",
                "meta[property='og:title']",
            ]),
            price: chain(&["[data-testid='price'], .price, .price-area"]),
            year: chain(&[".year, [data-testid='year']"]),
            mileage: chain(&[".mileage, [data-testid='mileage']"]),
            gear: chain(&[".transmission, [data-testid='transmission']"]),
            engine: chain(&[".engine, [data-testid='engine']"]),
            drive: chain(&[".drive, [data-testid='drive']"]),
            paint: chain(&[".paint, [data-testid='paint'], .damage, .bodywork"]),
            fuel: chain(&[".fuel, [data-testid='fuel']"]),
            opening_price: chain(&[".opening-price, [data-testid='opening-price']"]),
            images: chain(&[
                ".gallery img, .photo img, img[data-testid='image'], img[src*='encar']",
            ]),
        }
    }
}
