use swift_verify::Md5Hasher;

use crate::data::{CacheKey, Credentials};

/// Derive the session-cache key for `credentials`.
///
/// Every field participates, so changing the endpoint, the auth path or the
/// cache settings yields a distinct cached session.
pub fn cache_key(credentials: &Credentials) -> Result<CacheKey, serde_json::Error> {
    let encoded = serde_json::to_vec(credentials)?;
    Ok(CacheKey(Md5Hasher::hex_digest(&encoded)))
}
