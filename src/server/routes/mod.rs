pub mod health;
pub mod pdfs;

pub use health::health_handler;
pub use pdfs::{make_pdfs_handler, ListingId, MakePdfsRequest};
