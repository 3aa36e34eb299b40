use crate::models::Listing;
use anyhow::Result;
use async_trait::async_trait;

/// Common trait for all listing sources.
///
/// An `Err` means the page itself could not be loaded. Fields or images
/// that are missing from a loaded page are not errors; they come back empty.
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Scrape the detail page at an absolute URL
    async fn scrape_by_url(&self, url: &str) -> Result<Listing>;

    /// Canonical detail-page URL for a bare listing id
    fn detail_url(&self, id: &str) -> String;

    /// Scrape a listing by id via its canonical detail page
    async fn scrape_by_id(&self, id: &str) -> Result<Listing> {
        let url = self.detail_url(id);
        self.scrape_by_url(&url).await
    }

    /// Get the name of the source backend
    fn source_name(&self) -> &'static str;
}
