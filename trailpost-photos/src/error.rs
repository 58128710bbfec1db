use std::path::PathBuf;
use thiserror::Error;
use trailpost_core::ConfigError;

#[derive(Error, Debug)]
pub enum PhotosError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Invalid endpoint URL: {0}")]
    Endpoint(#[from] url::ParseError),

    #[error("OAuth2 token request failed: {0}")]
    Token(String),

    #[error("Token response carried no refresh token; revoke the app's access and authorize again")]
    NoRefreshToken,

    #[error("Request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP {status} error from {url}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    #[error("Failed to parse JSON response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("API repeated page token {0:?}; stopping")]
    RepeatedCursor(String),

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid album file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
