use crate::models::Listing;
use crate::scrapers::parser::ListingParser;
use crate::scrapers::traits::ListingSource;
use crate::scrapers::types::ScrapeOptions;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info, warn};

/// Plain HTTP listing source for pages that render server-side
pub struct HttpListingSource {
    client: Client,
    options: ScrapeOptions,
    parser: ListingParser,
}

impl HttpListingSource {
    pub fn new(options: ScrapeOptions) -> Result<Self> {
        let client = Client::builder()
            .timeout(options.navigation_timeout)
            .user_agent(options.user_agent.as_str())
            .build()
            .context("Failed to create HTTP client")?;
        let parser = ListingParser::new(&options.selectors)?;

        Ok(Self {
            client,
            options,
            parser,
        })
    }
}

#[async_trait]
impl ListingSource for HttpListingSource {
    async fn scrape_by_url(&self, url: &str) -> Result<Listing> {
        debug!("Fetching URL: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to fetch {}", url))?;

        if !response.status().is_success() {
            warn!("{} returned status: {}", url, response.status());
            anyhow::bail!("Failed to fetch {}: {}", url, response.status());
        }

        let html = response.text().await.context("Failed to read response body")?;
        debug!("Downloaded {} bytes of HTML", html.len());

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
        "http"
    }
}
