//! Scrape vehicle listings and deliver one PDF per brand, bundled in a ZIP.

pub mod archive;
pub mod config;
pub mod error;
pub mod models;
pub mod render;
pub mod scrapers;
pub mod server;
pub mod service;

pub use config::{Config, ScraperBackend};
pub use error::{Error, Result};
pub use models::{BrandGroups, Listing, RawListing};
pub use render::{Document, Renderer};
pub use service::PdfService;
