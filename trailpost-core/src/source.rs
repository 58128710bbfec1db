//! Where content documents and collection files are fetched from.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use thiserror::Error;
use url::Url;

const TIMEOUT_SECONDS: u64 = 60;

/// Query parameter carrying the cache-busting stamp
pub const CACHE_BUST_PARAM: &str = "t";

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Refusing to fetch {0:?}: path must stay inside the content root")]
    InvalidPath(String),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("Invalid content URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Failed to parse JSON from {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// A read-only store of site content, addressed by site-relative path
/// (`content/home.md`, `data/eagles.json`)
#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn fetch_text(&self, path: &str) -> Result<String, SourceError>;
}

/// Fetch and decode a JSON collection file
pub async fn fetch_json<T: DeserializeOwned>(
    source: &dyn ContentSource,
    path: &str,
) -> Result<T, SourceError> {
    let text = source.fetch_text(path).await?;
    serde_json::from_str(&text).map_err(|source| SourceError::Json {
        path: path.to_string(),
        source,
    })
}

/// Reject absolute paths and parent traversal
fn checked_relative(path: &str) -> Result<&Path, SourceError> {
    let rel = Path::new(path.trim_start_matches('/'));
    if rel
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
    {
        Ok(rel)
    } else {
        Err(SourceError::InvalidPath(path.to_string()))
    }
}

/// Content served from a local site directory
#[derive(Debug, Clone)]
pub struct FsSource {
    root: PathBuf,
}

impl FsSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl ContentSource for FsSource {
    async fn fetch_text(&self, path: &str) -> Result<String, SourceError> {
        let full = self.root.join(checked_relative(path)?);
        match tokio::fs::read_to_string(&full).await {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(SourceError::NotFound(path.to_string()))
            }
            Err(source) => Err(SourceError::Io {
                path: path.to_string(),
                source,
            }),
        }
    }
}

/// Strictly increasing millisecond stamps, even within one millisecond
#[derive(Debug, Default)]
pub struct CacheBuster {
    last: AtomicU64,
}

impl CacheBuster {
    pub fn next_stamp(&self) -> u64 {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();

        let mut prev = self.last.load(Ordering::Relaxed);
        loop {
            let next = now.max(prev + 1);
            match self
                .last
                .compare_exchange_weak(prev, next, Ordering::Relaxed, Ordering::Relaxed)
            {
                Ok(_) => return next,
                Err(actual) => prev = actual,
            }
        }
    }
}

/// Content fetched over HTTP from a base URL
pub struct HttpSource {
    base: Url,
    client: reqwest::Client,
    buster: CacheBuster,
}

impl HttpSource {
    pub fn new(base: &str) -> Result<Self, SourceError> {
        // A base without a trailing slash would drop its last segment on join
        let mut base = Url::parse(base)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(TIMEOUT_SECONDS))
            .build()
            .map_err(|source| SourceError::Http {
                url: base.to_string(),
                source,
            })?;

        Ok(Self {
            base,
            client,
            buster: CacheBuster::default(),
        })
    }

    /// URL for a content path, stamped to defeat intermediate caches
    pub fn url_for(&self, path: &str) -> Result<Url, SourceError> {
        let rel = checked_relative(path)?;
        let mut url = self.base.join(&rel.to_string_lossy())?;
        url.query_pairs_mut()
            .append_pair(CACHE_BUST_PARAM, &self.buster.next_stamp().to_string());
        Ok(url)
    }
}

#[async_trait]
impl ContentSource for HttpSource {
    async fn fetch_text(&self, path: &str) -> Result<String, SourceError> {
        let url = self.url_for(path)?;
        tracing::debug!("Fetching {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| SourceError::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(SourceError::NotFound(path.to_string()));
        }
        if !status.is_success() {
            return Err(SourceError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|source| SourceError::Http {
            url: url.to_string(),
            source,
        })
    }
}
