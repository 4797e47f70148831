//! Immutable configuration and value types.
//!
//! Everything here is plain data: constructed by the caller or by the effects
//! layer and passed by value between the pure core and the I/O edge.

pub mod credentials;
pub mod request;
pub mod response;
pub mod session;

pub use credentials::{CacheConfig, Credentials, DEFAULT_AUTH_PATH, DEFAULT_CACHE_FILE, DEFAULT_CACHE_TTL};
pub use request::{Method, RequestSpec, ResourceLevel, UploadSource};
pub use response::{ResponseBody, ResponseEnvelope};
pub use session::{CacheEntry, CacheKey, Session};
