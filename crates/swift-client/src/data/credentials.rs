use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const DEFAULT_AUTH_PATH: &str = "/auth/1.0";
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(3600);
pub const DEFAULT_CACHE_FILE: &str = "__swift_auth_cache.json";

/// Where, and for how long, authenticated sessions are remembered on disk.
///
/// Owned by each [`Credentials`] value, so two clients never share cache
/// settings by accident.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum CacheConfig {
    Disabled,
    Enabled {
        #[serde(default = "default_ttl_secs")]
        ttl_secs: u64,
        #[serde(default = "default_cache_path")]
        path:     PathBuf,
    },
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self::Enabled {
            ttl_secs: default_ttl_secs(),
            path:     default_cache_path(),
        }
    }
}

impl CacheConfig {
    pub fn enabled(ttl: Duration, path: impl Into<PathBuf>) -> Self {
        Self::Enabled {
            ttl_secs: ttl.as_secs(),
            path:     path.into(),
        }
    }

    pub fn is_enabled(&self) -> bool { matches!(self, Self::Enabled { .. }) }

    pub fn ttl(&self) -> Option<Duration> {
        match self {
            Self::Enabled { ttl_secs, .. } => Some(Duration::from_secs(*ttl_secs)),
            Self::Disabled => None,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Enabled { path, .. } => Some(path),
            Self::Disabled => None,
        }
    }
}

fn default_ttl_secs() -> u64 { DEFAULT_CACHE_TTL.as_secs() }

fn default_cache_path() -> PathBuf { PathBuf::from(DEFAULT_CACHE_FILE) }

fn default_auth_path() -> String { DEFAULT_AUTH_PATH.to_string() }

fn default_true() -> bool { true }

/// Everything needed to open a session against one storage endpoint.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use swift_client::{CacheConfig, Credentials};
///
/// let credentials = Credentials::new("tester:swift", "secret", "https://objects.example.com")
///     .checksum(true)
///     .cache(CacheConfig::enabled(Duration::from_secs(600), "/tmp/swift-auth.json"));
///
/// assert_eq!(credentials.auth_url(), "https://objects.example.com/auth/1.0");
/// ```
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub user:       String,
    pub pass:       String,
    pub base_url:   String,
    #[serde(default = "default_auth_path")]
    pub auth_path:  String,
    #[serde(default = "default_true")]
    pub strict_ssl: bool,
    /// Verify downloads against the server's `ETag` and send one on upload.
    #[serde(default)]
    pub checksum:   bool,
    #[serde(default)]
    pub cache:      CacheConfig,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("pass", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("auth_path", &self.auth_path)
            .field("strict_ssl", &self.strict_ssl)
            .field("checksum", &self.checksum)
            .field("cache", &self.cache)
            .finish()
    }
}

impl Credentials {
    pub fn new(user: impl Into<String>, pass: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            user:       user.into(),
            pass:       pass.into(),
            base_url:   base_url.into(),
            auth_path:  default_auth_path(),
            strict_ssl: true,
            checksum:   false,
            cache:      CacheConfig::default(),
        }
    }

    pub fn auth_path(mut self, auth_path: impl Into<String>) -> Self {
        self.auth_path = auth_path.into();
        self
    }

    pub fn strict_ssl(mut self, strict_ssl: bool) -> Self {
        self.strict_ssl = strict_ssl;
        self
    }

    pub fn checksum(mut self, checksum: bool) -> Self {
        self.checksum = checksum;
        self
    }

    pub fn cache(mut self, cache: CacheConfig) -> Self {
        self.cache = cache;
        self
    }

    pub fn auth_url(&self) -> String { format!("{}{}", self.base_url, self.auth_path) }

    pub fn validate(&self) -> Result<()> {
        if self.user.is_empty() {
            return Err(Error::InvalidCredentials("user is empty"));
        }
        if self.pass.is_empty() {
            return Err(Error::InvalidCredentials("pass is empty"));
        }
        if self.base_url.is_empty() {
            return Err(Error::InvalidCredentials("base_url is empty"));
        }
        Ok(())
    }
}
