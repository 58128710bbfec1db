//! Album refresh: the offline collector run.

use super::load_config;
use anyhow::{Context, Result};
use std::path::Path;
use trailpost_core::Secrets;
use trailpost_photos::COLLECTOR_SECRETS;

pub async fn fetch_albums(config_path: &Path) -> Result<()> {
    // Fail before touching the network or the album file
    let secrets = Secrets::from_env();
    secrets
        .require(COLLECTOR_SECRETS)
        .context("Please check your .env file")?;

    let config = load_config(config_path)?;
    let albums_path = config.albums_path();

    let count = trailpost_photos::fetch_albums(&config.photos, &secrets, &albums_path)
        .await
        .context("Error fetching albums")?;

    println!(
        "Successfully saved {} albums to {}",
        count,
        albums_path.display()
    );
    Ok(())
}
