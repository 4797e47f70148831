//! Client for Swift-compatible object storage (OpenStack Swift, Ceph RGW).
//!
//! # Architecture
//!
//! This crate follows the three-layer pattern:
//! - [`data`] - Immutable configuration and types
//! - [`core`] - Pure transformations: status classification, URL and header
//!   composition, cache keys
//! - [`effects`] - I/O operations with trait abstraction: the v1 auth
//!   handshake, the on-disk session cache, request dispatch
//!
//! [`Client`] ties them together: it resolves a session once at construction,
//! reusing a cached token when one is still fresh, and then issues requests
//! with it.
//!
//! # Example
//!
//! ```no_run
//! use swift_client::{Client, Credentials};
//!
//! # async fn run() -> swift_client::Result<()> {
//! let credentials = Credentials::new("tester:swift", "secret", "https://objects.example.com")
//!     .checksum(true);
//! let client = Client::connect(credentials).await?;
//!
//! client.create_container("photos").await?;
//! client
//!     .upload_object("photos", b"hello".to_vec(), "hello.txt", [("owner", "me")])
//!     .await?;
//! let listing = client.list_objects("photos", [("format", "json")]).await?;
//! println!("{:?}", listing.json());
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod data;
pub mod effects;

mod client;
mod error;
mod resources;

pub use client::Client;
pub use data::{
    CacheConfig, CacheEntry, CacheKey, Credentials, Method, RequestSpec, ResourceLevel,
    ResponseBody, ResponseEnvelope, Session, UploadSource,
};
pub use effects::{HttpClient, SessionCache};
pub use error::{CacheError, DomainError, Error, ErrorKind, Result};

#[cfg(feature = "reqwest")]
pub use effects::ReqwestClient;
