pub mod browser;
pub mod http;
pub mod parser;
pub mod traits;
pub mod types;

pub use browser::BrowserListingSource;
pub use http::HttpListingSource;
pub use parser::ListingParser;
pub use traits::ListingSource;
pub use types::{ScrapeOptions, SelectorSet, DEFAULT_BASE_URL};
