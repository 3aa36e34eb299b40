use crate::models::Listing;
use crate::scrapers::parser::ListingParser;
use crate::scrapers::traits::ListingSource;
use crate::scrapers::types::ScrapeOptions;
use anyhow::{Context, Result};
use async_trait::async_trait;
use headless_chrome::{Browser, LaunchOptions};
use std::sync::Arc;
use std::thread;
use tracing::{debug, info};

/// Browser-based listing source using headless Chrome.
///
/// Detail pages render client-side, so each scrape launches its own browser,
/// waits for navigation plus a settle delay, and parses the resulting DOM.
pub struct BrowserListingSource {
    options: ScrapeOptions,
    parser: Arc<ListingParser>,
}

impl BrowserListingSource {
    pub fn new(options: ScrapeOptions) -> Result<Self> {
        let parser = ListingParser::new(&options.selectors)?;
        Ok(Self {
            options,
            parser: Arc::new(parser),
        })
    }

    /// Load a page in a fresh headless browser and return its rendered HTML
    fn fetch_html(options: &ScrapeOptions, url: &str) -> Result<String> {
        debug!("Launching headless Chrome for {}", url);

        let launch = LaunchOptions::default_builder()
            .headless(true)
            .build()
            .context("Failed to build launch options")?;

        let browser = Browser::new(launch).context("Failed to launch Chrome browser")?;
        let tab = browser.new_tab().context("Failed to open browser tab")?;
        tab.set_default_timeout(options.navigation_timeout);

        tab.navigate_to(url)
            .with_context(|| format!("Failed to navigate to {}", url))?
            .wait_until_navigated()
            .with_context(|| format!("Timed out loading {}", url))?;

        thread::sleep(options.settle);

        let html = tab.get_content().context("Failed to read page HTML")?;
        debug!("Captured {} bytes of HTML from {}", html.len(), url);

        Ok(html)
    }
}

#[async_trait]
impl ListingSource for BrowserListingSource {
    async fn scrape_by_url(&self, url: &str) -> Result<Listing> {
        info!("Opening listing page {}", url);

        let options = self.options.clone();
        let target = url.to_string();
        let html = tokio::task::spawn_blocking(move || Self::fetch_html(&options, &target))
            .await
            .context("Browser task panicked")??;

        let listing = self.parser.parse(&html, url).normalize();
        info!(
            "Scraped listing {} ({} {}, {} images)",
            listing.id(),
            listing.brand(),
            listing.model(),
            listing.image_count()
        );

        Ok(listing)
    }

    fn detail_url(&self, id: &str) -> String {
        self.options.detail_url(id)
    }

    fn source_name(&self) -> &'static str {
        "headless-chrome"
    }
}
