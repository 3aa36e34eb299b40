use std::sync::Arc;

use anyhow::{Context, Result};
use encar_pdf::render::HttpImageSource;
use encar_pdf::scrapers::{BrowserListingSource, HttpListingSource, ListingSource};
use encar_pdf::server::build_app;
use encar_pdf::{Config, PdfService, Renderer, ScraperBackend};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,encar_pdf=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Encar PDF service");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    info!("Configuration loaded ({:?} scraper)", config.backend);

    let source: Arc<dyn ListingSource> = match config.backend {
        ScraperBackend::Browser => Arc::new(BrowserListingSource::new(config.scrape.clone())?),
        ScraperBackend::Http => Arc::new(HttpListingSource::new(config.scrape.clone())?),
    };
    let images = HttpImageSource::new(config.image_timeout, &config.scrape.user_agent)?;
    let renderer = Renderer::new(Arc::new(config.render.clone()), Arc::new(images));
    let service = Arc::new(PdfService::new(source, renderer));

    let app = build_app(service, config.static_dir.as_deref());

    // Start server
    let addr = config.bind_address();
    info!("Starting server on {}", addr);
    info!("Health check: http://{}/health", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
