//! I/O at the edge: the HTTP transport seam, the authentication handshake,
//! the on-disk session cache and the request dispatcher.

mod auth;
mod cache;
mod dispatch;
mod http;

pub use auth::AuthClient;
pub use cache::SessionCache;
pub use dispatch::Dispatcher;
pub use http::{BoxStream, HttpClient, HttpRequest, HttpResponse};

#[cfg(feature = "reqwest")]
pub use http::ReqwestClient;

#[cfg(test)]
pub(crate) mod testing;
