use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use dotenvy::dotenv;

use crate::error::{Error, Result};
use crate::render::font::FontFace;
use crate::render::style::{mm, RenderConfig, SpecLayout};
use crate::scrapers::{ScrapeOptions, DEFAULT_BASE_URL};

/// Which listing source backs the service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScraperBackend {
    /// Headless Chrome, for client-rendered pages
    Browser,
    /// Plain GET requests
    Http,
}

impl FromStr for ScraperBackend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "browser" | "chrome" => Ok(ScraperBackend::Browser),
            "http" => Ok(ScraperBackend::Http),
            other => Err(Error::Config(format!(
                "unknown scraper backend {:?} (expected \"browser\" or \"http\")",
                other
            ))),
        }
    }
}

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub backend: ScraperBackend,
    pub scrape: ScrapeOptions,
    pub image_timeout: Duration,
    pub render: RenderConfig,
    pub static_dir: Option<PathBuf>,
}

fn parse<T: FromStr>(key: &str, value: Option<String>, default: T) -> Result<T> {
    match value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
        Some(raw) => raw
            .parse()
            .map_err(|_| Error::Config(format!("{} must be a valid number, got {:?}", key, raw))),
        None => Ok(default),
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from any key lookup; unset keys take defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key);

        let backend = match get("SCRAPER_BACKEND") {
            Some(raw) => raw.parse()?,
            None => ScraperBackend::Browser,
        };
        let spec_layout = match get("SPEC_LAYOUT") {
            Some(raw) => raw.parse()?,
            None => SpecLayout::Wide,
        };

        let defaults = ScrapeOptions::default();
        let scrape = ScrapeOptions {
            base_url: get("LISTING_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            navigation_timeout: Duration::from_millis(parse(
                "SCRAPE_TIMEOUT_MS",
                get("SCRAPE_TIMEOUT_MS"),
                20_000,
            )?),
            settle: Duration::from_millis(parse("SCRAPE_SETTLE_MS", get("SCRAPE_SETTLE_MS"), 1_500)?),
            user_agent: get("USER_AGENT").unwrap_or(defaults.user_agent),
            selectors: defaults.selectors,
        };

        let render_defaults = RenderConfig::default();
        let render = RenderConfig {
            font: match get("PDF_FONT") {
                Some(raw) => FontFace::from_setting(&raw)?,
                None => render_defaults.font.clone(),
            },
            margin: mm(parse("PDF_MARGIN_MM", get("PDF_MARGIN_MM"), 12.0)?),
            thumb_width: mm(parse("THUMB_WIDTH_MM", get("THUMB_WIDTH_MM"), 60.0)?),
            thumb_height: mm(parse("THUMB_HEIGHT_MM", get("THUMB_HEIGHT_MM"), 42.0)?),
            thumbs_per_row: parse("THUMBS_PER_ROW", get("THUMBS_PER_ROW"), 3)?,
            spec_layout,
            ..render_defaults
        };
        render.validate()?;

        Ok(Self {
            host: get("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse("PORT", get("PORT"), 8000)?,
            backend,
            scrape,
            image_timeout: Duration::from_secs(parse(
                "IMAGE_TIMEOUT_SECS",
                get("IMAGE_TIMEOUT_SECS"),
                15,
            )?),
            render,
            static_dir: get("STATIC_DIR").map(PathBuf::from),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
