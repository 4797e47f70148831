use tracing::{debug, warn};

use crate::core::cache_key;
use crate::data::{Credentials, RequestSpec, ResponseEnvelope, Session};
use crate::effects::{AuthClient, Dispatcher, HttpClient, SessionCache};
use crate::error::Result;

#[cfg(feature = "reqwest")]
use crate::effects::ReqwestClient;

/// A connected client bound to one authenticated [`Session`].
///
/// Construction resolves the session once, from the cache when a fresh entry
/// exists and through the auth handshake otherwise. The session is never
/// refreshed; to re-authenticate, build a new client.
pub struct Client<C: HttpClient> {
    dispatcher: Dispatcher<C>,
    session:    Session,
    cached:     bool,
    checksum:   bool,
}

#[cfg(feature = "reqwest")]
impl Client<ReqwestClient> {
    /// Connect over reqwest, honoring `credentials.strict_ssl`.
    pub async fn connect(credentials: Credentials) -> Result<Self> {
        credentials.validate()?;
        let http = ReqwestClient::with_strict_ssl(credentials.strict_ssl)
            .map_err(|e| crate::error::Error::Transport(e.to_string()))?;
        Self::with_http_client(http, credentials).await
    }
}

impl<C: HttpClient> Client<C> {
    /// Resolve a session over `http`.
    ///
    /// Fails with [`Error::InvalidCredentials`](crate::Error::InvalidCredentials)
    /// before any I/O when a required field is empty, and with
    /// [`Error::Authentication`](crate::Error::Authentication) when the cache
    /// misses and the handshake fails. Cache problems are logged, never returned.
    pub async fn with_http_client(http: C, credentials: Credentials) -> Result<Self> {
        credentials.validate()?;

        let cache = SessionCache::from_config(&credentials.cache);
        let key = match cache_key(&credentials) {
            Ok(key) => Some(key),
            Err(e) => {
                warn!(error = %e, "could not derive session cache key");
                None
            }
        };

        let hit = match (&cache, &key) {
            (Some(cache), Some(key)) => cache.read(key),
            _ => None,
        };

        let (session, cached) = match hit {
            Some(entry) => {
                debug!(storage_url = %entry.storage_url, "using cached session");
                (entry.to_session(), true)
            }
            None => {
                let session = AuthClient::new(&http).authenticate(&credentials).await?;
                if let (Some(cache), Some(key)) = (&cache, &key) {
                    if let Err(e) = cache.write(key, &session) {
                        warn!(path = %cache.path().display(), error = %e, "could not cache session");
                    }
                }
                (session, false)
            }
        };

        Ok(Self {
            dispatcher: Dispatcher::new(http).verify_checksum(credentials.checksum),
            session,
            cached,
            checksum: credentials.checksum,
        })
    }

    /// The session every request of this client is sent with.
    pub fn session(&self) -> &Session { &self.session }

    /// Whether the session came from the disk cache rather than a handshake.
    pub fn is_cached(&self) -> bool { self.cached }

    /// Whether uploads carry an `ETag` and octet-stream downloads are verified.
    pub fn checksum(&self) -> bool { self.checksum }

    /// The dispatcher, and through it the transport.
    pub fn dispatcher(&self) -> &Dispatcher<C> { &self.dispatcher }

    /// Dispatch an arbitrary request with this client's session.
    pub async fn request(&self, spec: RequestSpec) -> Result<ResponseEnvelope> {
        self.dispatcher.dispatch(spec, &self.session).await
    }
}
