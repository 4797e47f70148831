use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;
use futures_util::{Stream, TryStreamExt};

use crate::data::Method;

/// A boxed stream type for HTTP response bodies.
pub type BoxStream<'a, T> = Pin<Box<dyn Stream<Item = T> + Send + 'a>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method:  Method,
    pub url:     String,
    pub headers: Vec<(String, String)>,
    pub body:    Option<Bytes>,
}

/// Status line and headers of a response whose body has not been read yet.
pub struct HttpResponse<E> {
    /// Final URL after any redirects.
    pub url:     String,
    pub status:  u16,
    /// Lowercase header names; repeated headers are joined with `", "`.
    pub headers: BTreeMap<String, String>,
    pub body:    BoxStream<'static, Result<Bytes, E>>,
}

impl<E> HttpResponse<E> {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn is_success(&self) -> bool { (200..300).contains(&self.status) }

    /// Buffer the whole body.
    pub async fn bytes(self) -> Result<Bytes, E> {
        let chunks: Vec<Bytes> = self.body.try_collect().await?;
        Ok(Bytes::from(chunks.concat()))
    }
}

/// Asynchronous HTTP transport.
///
/// The client only needs one primitive: send a request and hand back the
/// status, headers and a body stream. Redirects, TLS and connection handling
/// belong to the implementation.
///
/// # Implementations
///
/// - [`ReqwestClient`]: production implementation using `reqwest`
/// - test doubles that replay canned responses
pub trait HttpClient: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Send `request` and resolve once the status line and headers arrive.
    ///
    /// # Errors
    ///
    /// Only transport failures (DNS, connect, TLS, reset). Non-2xx statuses are
    /// successful responses at this layer.
    fn send(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse<Self::Error>, Self::Error>> + Send;
}

#[cfg(feature = "reqwest")]
mod reqwest_impl {
    use super::*;

    /// Production HTTP client implementation using reqwest.
    #[derive(Debug, Clone)]
    pub struct ReqwestClient {
        client: reqwest::Client,
    }

    impl ReqwestClient {
        /// Client that verifies TLS certificates.
        pub fn new() -> Result<Self, reqwest::Error> { Self::with_strict_ssl(true) }

        /// With `strict_ssl == false` invalid and self-signed certificates are
        /// accepted, which some on-premise gateways require.
        pub fn with_strict_ssl(strict_ssl: bool) -> Result<Self, reqwest::Error> {
            let client = reqwest::Client::builder()
                .danger_accept_invalid_certs(!strict_ssl)
                .build()?;
            Ok(Self { client })
        }
    }

    impl From<reqwest::Client> for ReqwestClient {
        fn from(client: reqwest::Client) -> Self { Self { client } }
    }

    fn to_reqwest(method: Method) -> reqwest::Method {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Head => reqwest::Method::HEAD,
            Method::Put => reqwest::Method::PUT,
            Method::Post => reqwest::Method::POST,
            Method::Delete => reqwest::Method::DELETE,
        }
    }

    impl HttpClient for ReqwestClient {
        type Error = reqwest::Error;

        async fn send(
            &self,
            request: HttpRequest,
        ) -> Result<HttpResponse<Self::Error>, Self::Error> {
            let mut builder = self.client.request(to_reqwest(request.method), &request.url);

            for (key, value) in &request.headers {
                builder = builder.header(key.as_str(), value.as_str());
            }
            if let Some(body) = request.body {
                builder = builder.body(body);
            }

            let response = builder.send().await?;

            let mut headers: BTreeMap<String, String> = BTreeMap::new();
            for (name, value) in response.headers() {
                let Ok(value) = value.to_str() else { continue };
                headers
                    .entry(name.as_str().to_string())
                    .and_modify(|existing| {
                        existing.push_str(", ");
                        existing.push_str(value);
                    })
                    .or_insert_with(|| value.to_string());
            }

            Ok(HttpResponse {
                url: response.url().to_string(),
                status: response.status().as_u16(),
                headers,
                body: Box::pin(response.bytes_stream()),
            })
        }
    }
}

#[cfg(feature = "reqwest")]
pub use reqwest_impl::ReqwestClient;
