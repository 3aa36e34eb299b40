//! In-memory listing and image sources shared by the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::io::Cursor;
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use image::{ImageBuffer, ImageFormat, Rgb};

use encar_pdf::render::{ImageSource, RenderConfig, Renderer};
use encar_pdf::scrapers::ListingSource;
use encar_pdf::{Listing, PdfService, RawListing};

pub const BASE: &str = "https://fem.encar.com/cars/detail";

pub fn detail_url(id: &str) -> String {
    format!("{}/{}", BASE, id)
}

/// Listing source backed by a map of URL -> listing
#[derive(Default)]
pub struct FakeSource {
    pages: HashMap<String, Listing>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeSource {
    pub fn with(mut self, raw: RawListing) -> Self {
        self.pages.insert(raw.source_url.clone(), raw.normalize());
        self
    }
}

#[async_trait]
impl ListingSource for FakeSource {
    async fn scrape_by_url(&self, url: &str) -> Result<Listing> {
        self.calls.lock().unwrap().push(url.to_string());
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| anyhow!("failed to resolve host for {}", url))
    }

    fn detail_url(&self, id: &str) -> String {
        detail_url(id)
    }

    fn source_name(&self) -> &'static str {
        "fake"
    }
}

/// Image source backed by a map of URL -> encoded bytes
#[derive(Default)]
pub struct FakeImages {
    images: HashMap<String, Vec<u8>>,
}

impl FakeImages {
    pub fn with(mut self, url: &str, bytes: Vec<u8>) -> Self {
        self.images.insert(url.to_string(), bytes);
        self
    }
}

#[async_trait]
impl ImageSource for FakeImages {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        self.images
            .get(url)
            .cloned()
            .ok_or_else(|| anyhow!("404 Not Found: {}", url))
    }
}

pub fn png() -> Vec<u8> {
    let img = ImageBuffer::from_pixel(8, 6, Rgb([40u8, 90, 160]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png).unwrap();
    out.into_inner()
}

pub fn raw(id: &str, brand: &str, model: &str) -> RawListing {
    let mut raw = RawListing::new(detail_url(id));
    raw.brand = brand.to_string();
    raw.model = model.to_string();
    raw
}

/// Hyundai Sonata 123 with one fetchable and one broken image
pub fn sonata() -> RawListing {
    let mut raw = raw("123", "Hyundai", "Sonata");
    raw.year = "2020".into();
    raw.price = "2,450".into();
    raw.mileage = "35,000 km".into();
    raw.gear = "Auto".into();
    raw.engine = "1,999cc".into();
    raw.drive = "FF".into();
    raw.paint = "RX".into();
    raw.fuel = "Gasoline".into();
    raw.opening_price = "1,900".into();
    raw.image_urls = vec![
        "https://ci.encar.com/ok.jpg".to_string(),
        "https://ci.encar.com/missing.jpg".to_string(),
    ];
    raw
}

pub fn images_for_sonata() -> FakeImages {
    FakeImages::default().with("https://ci.encar.com/ok.jpg", png())
}

pub fn renderer(images: FakeImages) -> Renderer {
    renderer_with(RenderConfig::default(), images)
}

pub fn renderer_with(config: RenderConfig, images: FakeImages) -> Renderer {
    Renderer::new(Arc::new(config), Arc::new(images))
}

pub fn service(source: Arc<FakeSource>, images: FakeImages) -> PdfService {
    PdfService::new(source, renderer(images))
}
