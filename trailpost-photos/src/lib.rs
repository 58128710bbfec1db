//! # trailpost-photos
//!
//! Offline collector for the photo gallery: exchanges the refresh token for
//! an access token, walks the album listing to the end and replaces the
//! persisted album file. Any failure aborts the run before anything is
//! written.

pub mod client;
pub mod error;
pub mod oauth;
pub mod pager;
pub mod store;

use std::path::Path;
use trailpost_core::config::PhotosConfig;
use trailpost_core::{Secret, Secrets};

pub use client::{AlbumsPage, PhotosClient, RemoteAlbum};
pub use error::PhotosError;
pub use oauth::{extract_code, OAuthHelper, PHOTOS_SCOPE};
pub use pager::AlbumPager;
pub use store::{read_albums, write_albums};

/// Secrets the collector cannot start without
pub const COLLECTOR_SECRETS: &[Secret] =
    &[Secret::ClientId, Secret::ClientSecret, Secret::RefreshToken];

/// Secrets the console authorization flow needs
pub const AUTH_SECRETS: &[Secret] = &[Secret::ClientId, Secret::ClientSecret];

/// OAuth helper from the client credentials in `secrets`
pub fn oauth_helper(config: &PhotosConfig, secrets: &Secrets) -> Result<OAuthHelper, PhotosError> {
    secrets.require(AUTH_SECRETS)?;
    OAuthHelper::new(
        config,
        secrets.get(Secret::ClientId).unwrap_or_default(),
        secrets.get(Secret::ClientSecret).unwrap_or_default(),
    )
}

/// Fetch every album and replace the album file at `albums_path`.
///
/// Returns the number of albums written.
pub async fn fetch_albums(
    config: &PhotosConfig,
    secrets: &Secrets,
    albums_path: &Path,
) -> Result<usize, PhotosError> {
    secrets.require(COLLECTOR_SECRETS)?;
    let helper = oauth_helper(config, secrets)?;

    tracing::info!("Authenticating with the photo library");
    let token = helper
        .access_token(secrets.get(Secret::RefreshToken).unwrap_or_default())
        .await?;

    tracing::info!("Fetching albums");
    let client = PhotosClient::new(&config.api_base, token, config.page_size)?;
    let albums = AlbumPager::new(&client).collect_all().await?;
    tracing::info!("Found {} albums", albums.len());

    write_albums(albums_path, &albums)?;
    tracing::info!("Saved albums to {}", albums_path.display());

    Ok(albums.len())
}
