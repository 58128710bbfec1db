use crate::error::PhotosError;
use serde::Deserialize;
use std::time::Duration;
use trailpost_types::{de, Album};
use url::Url;

const TIMEOUT_SECONDS: u64 = 60;

/// Album as listed by the photo library; only the persisted fields are kept
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteAlbum {
    pub id: String,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub product_url: String,

    #[serde(default)]
    pub cover_photo_base_url: Option<String>,

    #[serde(default, deserialize_with = "de::optional_count")]
    pub media_items_count: Option<u64>,
}

impl From<RemoteAlbum> for Album {
    fn from(remote: RemoteAlbum) -> Self {
        Album {
            id: remote.id,
            title: remote.title,
            product_url: remote.product_url,
            cover_photo_base_url: remote.cover_photo_base_url,
            media_items_count: remote.media_items_count,
        }
    }
}

/// One response of the album list endpoint
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumsPage {
    #[serde(default)]
    pub albums: Vec<RemoteAlbum>,

    #[serde(default)]
    pub next_page_token: Option<String>,
}

impl AlbumsPage {
    /// Continuation cursor; an empty token means the listing is done
    pub fn cursor(&self) -> Option<&str> {
        self.next_page_token.as_deref().filter(|t| !t.is_empty())
    }
}

/// Photo library client holding a bearer token
pub struct PhotosClient {
    http_client: reqwest::Client,
    api_base: Url,
    token: String,
    page_size: u32,
}

impl PhotosClient {
    pub fn new(api_base: &str, token: String, page_size: u32) -> Result<Self, PhotosError> {
        // Without a trailing slash, join would replace the last path segment
        let mut api_base = Url::parse(api_base)?;
        if !api_base.path().ends_with('/') {
            let path = format!("{}/", api_base.path());
            api_base.set_path(&path);
        }

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(TIMEOUT_SECONDS))
            .build()
            .map_err(|source| PhotosError::Http {
                url: api_base.to_string(),
                source,
            })?;

        Ok(Self {
            http_client,
            api_base,
            token,
            page_size,
        })
    }

    /// `<api>/v1/albums?pageSize=<n>[&pageToken=<cursor>]`
    pub fn albums_url(&self, cursor: Option<&str>) -> Result<Url, PhotosError> {
        let mut url = self.api_base.join("v1/albums")?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("pageSize", &self.page_size.to_string());
            if let Some(cursor) = cursor {
                query.append_pair("pageToken", cursor);
            }
        }
        Ok(url)
    }

    /// Fetch one page of the album listing
    pub async fn list_albums(&self, cursor: Option<&str>) -> Result<AlbumsPage, PhotosError> {
        let url = self.albums_url(cursor)?;
        tracing::debug!("GET {}", url);

        let response = self
            .http_client
            .get(url.clone())
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|source| PhotosError::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(PhotosError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let json_text = response.text().await.map_err(|source| PhotosError::Http {
            url: url.to_string(),
            source,
        })?;

        serde_json::from_str(&json_text).map_err(|source| PhotosError::Decode {
            url: url.to_string(),
            source,
        })
    }
}
