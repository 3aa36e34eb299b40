//! Error types for the PDF service.

use std::io;
use thiserror::Error;

/// Result type alias for service operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that surface past a single field or image.
#[derive(Error, Debug)]
pub enum Error {
    /// The listing page for an input id could not be loaded at all.
    #[error("could not load listing {id}: {reason}")]
    Navigation { id: String, reason: String },

    /// Serializing a document failed.
    #[error("PDF generation failed: {0}")]
    Pdf(#[from] lopdf::Error),

    /// Writing the archive failed.
    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// I/O error while writing output bytes.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A blocking render task panicked or was cancelled.
    #[error("render task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// A configuration value was missing or malformed.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl Error {
    pub fn navigation(id: impl Into<String>, err: &anyhow::Error) -> Self {
        Error::Navigation {
            id: id.into(),
            reason: format!("{:#}", err),
        }
    }
}
