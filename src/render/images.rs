//! Photo fetching and decoding for the thumbnail grid.

use anyhow::{Context, Result};
use async_trait::async_trait;
use image::imageops::FilterType;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Where thumbnail bytes come from
#[async_trait]
pub trait ImageSource: Send + Sync {
    /// Fetch the raw (encoded) image at `url`
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// Fetches images over HTTP with a per-request timeout
pub struct HttpImageSource {
    client: Client,
}

impl HttpImageSource {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }
}

#[async_trait]
impl ImageSource for HttpImageSource {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to fetch image {}", url))?;

        if !response.status().is_success() {
            anyhow::bail!("Image {} returned status {}", url, response.status());
        }

        let bytes = response.bytes().await.context("Failed to read image body")?;
        debug!("Downloaded {} bytes from {}", bytes.len(), url);
        Ok(bytes.to_vec())
    }
}

/// Decoded 8-bit RGB pixels
#[derive(Debug, Clone, PartialEq)]
pub struct Thumbnail {
    pub width: u32,
    pub height: u32,
    pub rgb: Vec<u8>,
}

impl Thumbnail {
    /// Decode any supported format, shrinking to at most `max_width` x
    /// `max_height` pixels. The aspect ratio is not kept; grid cells have a
    /// fixed shape.
    pub fn decode(bytes: &[u8], max_width: u32, max_height: u32) -> Result<Self> {
        let img = image::load_from_memory(bytes).context("Failed to decode image")?;
        if img.width() == 0 || img.height() == 0 {
            anyhow::bail!("Image has no pixels");
        }

        let img = if img.width() > max_width || img.height() > max_height {
            img.resize_exact(
                img.width().min(max_width),
                img.height().min(max_height),
                FilterType::Triangle,
            )
        } else {
            img
        };

        let rgb = img.to_rgb8();
        Ok(Self {
            width: rgb.width(),
            height: rgb.height(),
            rgb: rgb.into_raw(),
        })
    }
}
