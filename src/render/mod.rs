//! Brand documents: one paginated PDF per brand, one card per listing.

pub mod card;
pub mod font;
pub mod images;
pub mod layout;
pub mod pdf;
pub mod style;
pub mod text;

use std::sync::Arc;

use anyhow::Context;
use tokio::task;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::models::{Listing, MAX_IMAGES};

pub use font::{EmbeddedFont, FontFace};
pub use images::{HttpImageSource, ImageSource, Thumbnail};
pub use layout::{Block, Element, GridCell, Layout, Page, IMAGE_UNAVAILABLE};
pub use style::{mm, RenderConfig, SpecLayout};

use layout::Flow;

/// Thumbnails are decoded at twice the cell size in points
const PIXELS_PER_POINT: f32 = 2.0;

/// File extension of rendered documents
pub const DOCUMENT_EXTENSION: &str = "pdf";

/// A rendered brand document
#[derive(Debug, Clone)]
pub struct Document {
    pub brand: String,
    pub bytes: Vec<u8>,
    pub page_count: usize,
}

/// Lays out and serializes brand documents
#[derive(Clone)]
pub struct Renderer {
    config: Arc<RenderConfig>,
    images: Arc<dyn ImageSource>,
}

impl Renderer {
    pub fn new(config: Arc<RenderConfig>, images: Arc<dyn ImageSource>) -> Self {
        Self { config, images }
    }

    /// Render one brand's listings into a PDF
    pub async fn render(&self, brand: &str, listings: &[Listing]) -> Result<Document> {
        let layout = self.layout(brand, listings).await;
        let page_count = layout.pages.len();

        let config = Arc::clone(&self.config);
        let bytes = task::spawn_blocking(move || pdf::write_pdf(&layout, &config)).await??;

        info!(
            "Rendered {} listing(s) for {} into {} page(s), {} bytes",
            listings.len(),
            brand,
            page_count,
            bytes.len()
        );

        Ok(Document {
            brand: brand.to_string(),
            bytes,
            page_count,
        })
    }

    /// Paginate a brand title followed by one card per listing.
    ///
    /// Image failures become placeholder cells, so this cannot fail.
    pub async fn layout(&self, brand: &str, listings: &[Listing]) -> Layout {
        let config = &self.config;
        let mut flow = Flow::new(config);
        let mut thumbnails = Vec::new();

        flow.add(&Block::Line {
            text: brand.to_string(),
            style: config.brand,
        });
        flow.add(&Block::Spacer(mm(5.0)));

        for listing in listings {
            let cells = self.fetch_cells(listing, &mut thumbnails).await;
            flow.add_group(&card::card_blocks(listing, &cells, config));
        }

        Layout {
            title: brand.to_string(),
            pages: flow.finish(),
            images: thumbnails,
        }
    }

    async fn fetch_cells(&self, listing: &Listing, thumbnails: &mut Vec<Thumbnail>) -> Vec<GridCell> {
        let mut cells = Vec::with_capacity(listing.image_urls().len());

        for url in listing.image_urls().iter().take(MAX_IMAGES) {
            match self.load_thumbnail(url).await {
                Ok(thumb) => {
                    thumbnails.push(thumb);
                    cells.push(GridCell::Image(thumbnails.len() - 1));
                }
                Err(e) => {
                    warn!("Image {} for listing {} unavailable: {:#}", url, listing.id(), e);
                    cells.push(GridCell::Unavailable);
                }
            }
        }

        debug!(
            "Listing {}: {} of {} images loaded",
            listing.id(),
            cells.iter().filter(|c| matches!(c, GridCell::Image(_))).count(),
            cells.len()
        );
        cells
    }

    async fn load_thumbnail(&self, url: &str) -> anyhow::Result<Thumbnail> {
        let bytes = self.images.fetch(url).await?;
        let max_width = (self.config.thumb_width * PIXELS_PER_POINT).round() as u32;
        let max_height = (self.config.thumb_height * PIXELS_PER_POINT).round() as u32;
        task::spawn_blocking(move || Thumbnail::decode(&bytes, max_width.max(1), max_height.max(1)))
            .await
            .context("Image decoding task failed")?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawListing;
    use async_trait::async_trait;
    use lopdf::{Document as LopdfDocument, Object};

    struct NoImages;

    #[async_trait]
    impl ImageSource for NoImages {
        async fn fetch(&self, url: &str) -> anyhow::Result<Vec<u8>> {
            anyhow::bail!("offline: {}", url)
        }
    }

    fn hangul_renderer() -> Renderer {
        let chars: Vec<char> = "현대쏘나타 DN8\u{2014}ID:1,0245만원.?".chars().collect();
        let font = EmbeddedFont::from_bytes("NanumTest", font::test_font_bytes(&chars)).unwrap();
        let config = RenderConfig {
            font: FontFace::Embedded(Arc::new(font)),
            ..RenderConfig::default()
        };
        Renderer::new(Arc::new(config), Arc::new(NoImages))
    }

    #[tokio::test]
    async fn korean_listing_renders_with_embedded_glyphs() {
        let mut raw = RawListing::new("https://fem.encar.com/cars/detail/1");
        raw.brand = "현대".into();
        raw.model = "쏘나타 DN8".into();
        raw.price = "2,450 만원".into();
        raw.image_urls = vec!["https://ci.encar.com/1.jpg".into()];
        let listing = raw.normalize();

        let renderer = hangul_renderer();
        let document = renderer.render("현대", &[listing]).await.unwrap();
        assert_eq!(document.page_count, 1);

        let font = &renderer.config.font;
        let title = font.encode("쏘나타 DN8 \u{2014} ID: 1");
        assert_eq!(title.len(), 2 * "쏘나타 DN8 \u{2014} ID: 1".chars().count());

        let doc = LopdfDocument::load_mem(&document.bytes).unwrap();
        let (_, page_id) = doc.get_pages().into_iter().next().unwrap();
        let shown: Vec<Vec<u8>> = doc
            .get_and_decode_page_content(page_id)
            .unwrap()
            .operations
            .into_iter()
            .filter(|op| op.operator == "Tj")
            .filter_map(|op| match op.operands.first() {
                Some(Object::String(bytes, _)) => Some(bytes.clone()),
                _ => None,
            })
            .collect();

        assert!(shown.contains(&font.encode("현대")));
        assert!(shown.contains(&title));
        assert!(shown.contains(&font.encode(IMAGE_UNAVAILABLE)));
    }
}
