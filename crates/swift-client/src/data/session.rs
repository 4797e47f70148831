use std::fmt;

use serde::{Deserialize, Serialize};

/// An authenticated session: the bearer token and where to send requests.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    pub token:       String,
    pub storage_url: String,
    /// Path prefix for account-level requests, relative to `storage_url`.
    pub account:     String,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &"<redacted>")
            .field("storage_url", &self.storage_url)
            .field("account", &self.account)
            .finish()
    }
}

impl Session {
    pub fn new(token: impl Into<String>, storage_url: impl Into<String>) -> Self {
        Self {
            token:       token.into(),
            storage_url: storage_url.into(),
            account:     String::new(),
        }
    }
}

/// Hex MD5 over the serialized credentials. Equal credentials, equal key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(pub(crate) String);

impl CacheKey {
    pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

/// A cached session with its absolute expiry in epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub token:       String,
    pub storage_url: String,
    pub expires_at:  u64,
}

impl CacheEntry {
    pub fn is_fresh_at(&self, now_ms: u64) -> bool { now_ms < self.expires_at }

    pub fn is_expired_at(&self, now_ms: u64) -> bool { now_ms > self.expires_at }

    pub fn to_session(&self) -> Session { Session::new(self.token.clone(), self.storage_url.clone()) }
}
