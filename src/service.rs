//! Request pipeline: ids -> listings -> brand groups -> documents -> archive.

use std::sync::Arc;

use tracing::{debug, info, warn};
use url::Url;

use crate::archive;
use crate::error::{Error, Result};
use crate::models::{BrandGroups, Listing};
use crate::render::Renderer;
use crate::scrapers::ListingSource;

/// True for inputs that carry their own `http`/`https` scheme
pub fn is_absolute_url(input: &str) -> bool {
    Url::parse(input)
        .map(|url| matches!(url.scheme(), "http" | "https"))
        .unwrap_or(false)
}

/// Turns a list of listing ids or URLs into a ZIP of brand PDFs
#[derive(Clone)]
pub struct PdfService {
    source: Arc<dyn ListingSource>,
    renderer: Renderer,
}

impl PdfService {
    pub fn new(source: Arc<dyn ListingSource>, renderer: Renderer) -> Self {
        Self { source, renderer }
    }

    /// Resolve one id or URL into a listing
    pub async fn resolve(&self, input: &str) -> Result<Listing> {
        let result = if is_absolute_url(input) {
            self.source.scrape_by_url(input).await
        } else {
            self.source.scrape_by_id(input).await
        };

        result.map_err(|e| Error::navigation(input, &e))
    }

    /// Scrape every input in order, stopping at the first page that cannot
    /// be loaded. Blank inputs are skipped.
    pub async fn collect(&self, ids: &[String]) -> Result<BrandGroups> {
        let mut groups = BrandGroups::new();

        for raw in ids {
            let input = raw.trim();
            if input.is_empty() {
                warn!("Skipping blank listing id");
                continue;
            }
            let listing = self.resolve(input).await?;
            debug!("Resolved {} -> listing {} ({})", input, listing.id(), listing.brand());
            groups.push(listing);
        }

        Ok(groups)
    }

    /// Full request: scrape, group by brand, render and archive
    pub async fn handle(&self, ids: &[String]) -> Result<Vec<u8>> {
        info!(
            "Building PDFs for {} id(s) via {}",
            ids.len(),
            self.source.source_name()
        );

        let groups = self.collect(ids).await?;
        info!(
            "Resolved {} brand(s): {}",
            groups.len(),
            groups.brands().collect::<Vec<_>>().join(", ")
        );

        archive::assemble(&groups, &self.renderer).await
    }
}
