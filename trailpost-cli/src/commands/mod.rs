//! CLI command implementations.

pub mod auth;
pub mod build;
pub mod fetch_albums;
pub mod serve;

pub use auth::{auth_token, auth_url};
pub use build::build_site;
pub use fetch_albums::fetch_albums;
pub use serve::serve_site;

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use trailpost_core::{
    CalendarClient, Config, ContentSource, FsSource, HttpSource, Secrets, SiteRenderer,
};

pub(crate) fn load_config(config_path: &Path) -> Result<Config> {
    tracing::info!("Loading config from {:?}", config_path);
    Config::load_or_default(config_path).context("Failed to load configuration")
}

/// Where renderers read content from: the configured URL, else the site directory
fn content_source(config: &Config) -> Result<Arc<dyn ContentSource>> {
    match &config.paths.content_url {
        Some(url) => {
            tracing::info!("Fetching content from {}", url);
            let source = HttpSource::new(url)
                .with_context(|| format!("Invalid content URL {:?}", url))?;
            Ok(Arc::new(source))
        }
        None => Ok(Arc::new(FsSource::new(config.site_dir()))),
    }
}

fn calendar_client(config: &Config, secrets: &Secrets) -> Result<Option<CalendarClient>> {
    let (Some(calendar_id), Some(api_key)) = (
        config.calendar.calendar_id.as_deref(),
        secrets.calendar_api_key.as_deref(),
    ) else {
        tracing::info!("Calendar not configured; events show a setup notice");
        return Ok(None);
    };

    let client = CalendarClient::new(
        &config.calendar.api_base,
        calendar_id,
        api_key,
        config.calendar.max_results,
    )
    .context("Failed to create calendar client")?;
    Ok(Some(client))
}

/// Renderer wired from config and environment secrets
pub(crate) fn site_renderer(config: &Config, secrets: &Secrets) -> Result<SiteRenderer> {
    let renderer = SiteRenderer::new(config.site.name.clone(), content_source(config)?)
        .with_calendar(calendar_client(config, secrets)?)
        .with_calendar_page(config.site.calendar_page.clone())
        .with_albums_file(config.photos.albums_file.clone());
    Ok(renderer)
}
