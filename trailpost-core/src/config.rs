//! Configuration parsing and management.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    ParseError(#[from] serde_yaml::Error),

    #[error("Missing required environment variables: {}", .0.join(", "))]
    MissingSecrets(Vec<&'static str>),
}

/// Main configuration struct matching trailpost.yml schema
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub site: SiteConfig,

    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub photos: PhotosConfig,

    #[serde(default)]
    pub calendar: CalendarConfig,

    // Internal: path to config file (for relative path resolution)
    #[serde(skip)]
    config_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Appended to page titles ("Campout | <name>")
    #[serde(default = "default_site_name")]
    pub name: String,

    /// Where the "View Full Calendar" links point
    #[serde(default = "default_calendar_page")]
    pub calendar_page: String,
}

fn default_site_name() -> String {
    String::from("Troop 93 Fullerton")
}

fn default_calendar_page() -> String {
    String::from("calendar.html")
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: default_site_name(),
            calendar_page: default_calendar_page(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory holding the HTML templates, `content/` and `data/`
    #[serde(default = "default_site_dir")]
    pub site: PathBuf,

    /// Output directory for `trailpost build`
    #[serde(default = "default_output_dir")]
    pub output: PathBuf,

    /// Fetch content over HTTP from this base URL instead of the site directory
    #[serde(default)]
    pub content_url: Option<String>,
}

fn default_site_dir() -> PathBuf {
    PathBuf::from("site")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("dist")
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            site: default_site_dir(),
            output: default_output_dir(),
            content_url: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotosConfig {
    #[serde(default = "default_photos_api")]
    pub api_base: String,

    #[serde(default = "default_auth_url")]
    pub auth_url: String,

    #[serde(default = "default_token_url")]
    pub token_url: String,

    #[serde(default = "default_redirect_uri")]
    pub redirect_uri: String,

    /// Albums requested per list call
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Album cache, relative to the site directory
    #[serde(default = "default_albums_file")]
    pub albums_file: String,
}

fn default_photos_api() -> String {
    String::from("https://photoslibrary.googleapis.com")
}

fn default_auth_url() -> String {
    String::from("https://accounts.google.com/o/oauth2/v2/auth")
}

fn default_token_url() -> String {
    String::from("https://oauth2.googleapis.com/token")
}

fn default_redirect_uri() -> String {
    String::from("http://localhost")
}

fn default_page_size() -> u32 {
    50
}

fn default_albums_file() -> String {
    String::from("data/albums.json")
}

impl Default for PhotosConfig {
    fn default() -> Self {
        Self {
            api_base: default_photos_api(),
            auth_url: default_auth_url(),
            token_url: default_token_url(),
            redirect_uri: default_redirect_uri(),
            page_size: default_page_size(),
            albums_file: default_albums_file(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarConfig {
    #[serde(default = "default_calendar_api")]
    pub api_base: String,

    #[serde(default)]
    pub calendar_id: Option<String>,

    #[serde(default = "default_max_results")]
    pub max_results: u32,
}

fn default_calendar_api() -> String {
    String::from("https://www.googleapis.com/calendar/v3")
}

fn default_max_results() -> u32 {
    6
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            api_base: default_calendar_api(),
            calendar_id: None,
            max_results: default_max_results(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let mut config: Config = serde_yaml::from_str(&contents)?;

        // Store config file path for relative path resolution
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Load the config file if it exists, otherwise fall back to defaults
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            Self::from_file(path)
        } else {
            tracing::info!("No config at {:?}; using defaults", path);
            Ok(Self::default())
        }
    }

    /// Get the site directory, resolved relative to config file
    pub fn site_dir(&self) -> PathBuf {
        self.resolve_path(&self.paths.site)
    }

    /// Get the output directory, resolved relative to config file
    pub fn output_dir(&self) -> PathBuf {
        self.resolve_path(&self.paths.output)
    }

    /// Location of the persisted album cache on disk
    pub fn albums_path(&self) -> PathBuf {
        self.site_dir().join(&self.photos.albums_file)
    }

    /// Resolve a path relative to the config file location
    fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else if let Some(parent) = self.config_path.as_ref().and_then(|p| p.parent()) {
            parent.join(path)
        } else {
            path.to_path_buf()
        }
    }
}

/// Environment variable names for the secrets trailpost reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Secret {
    ClientId,
    ClientSecret,
    RefreshToken,
    CalendarApiKey,
}

impl Secret {
    pub fn env_var(&self) -> &'static str {
        match self {
            Secret::ClientId => "GOOGLE_CLIENT_ID",
            Secret::ClientSecret => "GOOGLE_CLIENT_SECRET",
            Secret::RefreshToken => "GOOGLE_REFRESH_TOKEN",
            Secret::CalendarApiKey => "GOOGLE_CALENDAR_API_KEY",
        }
    }
}

/// Left in sample configs; treated as unset
const PLACEHOLDER_SECRET: &str = "YOUR_API_KEY_HERE";

/// Credentials supplied through the environment, read once at startup
#[derive(Clone, Default)]
pub struct Secrets {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub refresh_token: Option<String>,
    pub calendar_api_key: Option<String>,
}

impl Secrets {
    pub fn from_env() -> Self {
        let read = |secret: Secret| {
            std::env::var(secret.env_var())
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty() && v != PLACEHOLDER_SECRET)
        };

        Self {
            client_id: read(Secret::ClientId),
            client_secret: read(Secret::ClientSecret),
            refresh_token: read(Secret::RefreshToken),
            calendar_api_key: read(Secret::CalendarApiKey),
        }
    }

    pub fn get(&self, secret: Secret) -> Option<&str> {
        match secret {
            Secret::ClientId => self.client_id.as_deref(),
            Secret::ClientSecret => self.client_secret.as_deref(),
            Secret::RefreshToken => self.refresh_token.as_deref(),
            Secret::CalendarApiKey => self.calendar_api_key.as_deref(),
        }
    }

    /// Fail with every missing name at once
    pub fn require(&self, needed: &[Secret]) -> Result<(), ConfigError> {
        let missing: Vec<&'static str> = needed
            .iter()
            .filter(|s| self.get(**s).is_none())
            .map(|s| s.env_var())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::MissingSecrets(missing))
        }
    }
}

impl fmt::Debug for Secrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mask = |v: &Option<String>| if v.is_some() { "<set>" } else { "<unset>" };
        f.debug_struct("Secrets")
            .field("client_id", &mask(&self.client_id))
            .field("client_secret", &mask(&self.client_secret))
            .field("refresh_token", &mask(&self.refresh_token))
            .field("calendar_api_key", &mask(&self.calendar_api_key))
            .finish()
    }
}
