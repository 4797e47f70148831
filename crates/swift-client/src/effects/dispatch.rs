use std::path::Path;

use futures_util::StreamExt;
use swift_verify::{Hasher, Md5Hasher, VerificationError};
use tokio::io::AsyncWriteExt;
use tracing::{debug, error, warn};

use crate::core::{
    build_url, classify, default_headers, is_json, is_octet_stream, merge_headers, normalize_etag,
};
use crate::data::{RequestSpec, ResponseBody, ResponseEnvelope, Session};
use crate::effects::http::{BoxStream, HttpClient, HttpRequest, HttpResponse};
use crate::error::{Error, Result};

/// Turns a [`RequestSpec`] into one authenticated HTTP exchange.
///
/// Statuses the classifier recognizes for the request's level become
/// [`Error::Domain`]; everything else, failures included, comes back as a
/// [`ResponseEnvelope`] for the caller to inspect.
pub struct Dispatcher<C: HttpClient> {
    http:            C,
    verify_checksum: bool,
}

impl<C: HttpClient> Dispatcher<C> {
    pub fn new(http: C) -> Self {
        Self {
            http,
            verify_checksum: false,
        }
    }

    /// Compare downloaded `application/octet-stream` bodies with the `ETag`.
    pub fn verify_checksum(mut self, enabled: bool) -> Self {
        self.verify_checksum = enabled;
        self
    }

    pub fn http(&self) -> &C { &self.http }

    pub async fn dispatch(&self, spec: RequestSpec, session: &Session) -> Result<ResponseEnvelope> {
        let url = build_url(&session.storage_url, &spec.path, &spec.query);
        let headers = merge_headers(default_headers(&session.token), spec.headers);
        let action = format!("{} {}", spec.method, url);

        debug!(method = %spec.method, %url, level = %spec.level, "dispatching");
        let response = self
            .http
            .send(HttpRequest {
                method: spec.method,
                url: url.clone(),
                headers,
                body: spec.body,
            })
            .await
            .map_err(|e| {
                error!(%action, error = %e, "request failed");
                Error::Transport(e.to_string())
            })?;

        if let Some(domain) = classify(spec.level, response.status, action) {
            warn!(error = %domain, "storage service rejected request");
            return Err(domain.into());
        }

        match spec.local_file {
            Some(path) => self.save(response, &path).await,
            None => buffer(response).await,
        }
    }

    async fn save(&self, response: HttpResponse<C::Error>, path: &Path) -> Result<ResponseEnvelope> {
        let HttpResponse {
            url,
            status,
            headers,
            body,
        } = response;

        let content_type = headers.get("content-type").map(String::as_str).unwrap_or("");
        let mut hasher = (self.verify_checksum && is_octet_stream(content_type)).then(Md5Hasher::new);
        let mut captured = is_json(content_type).then(Vec::new);

        let bytes = match write_stream(body, path, hasher.as_mut(), captured.as_mut()).await {
            Ok(bytes) => bytes,
            Err(e) => {
                if let Err(cleanup) = tokio::fs::remove_file(path).await {
                    debug!(path = %path.display(), error = %cleanup, "no partial file to remove");
                }
                return Err(e);
            }
        };
        debug!(path = %path.display(), bytes, "saved response body");

        let local_hash = match hasher {
            Some(hasher) => {
                let remote = headers
                    .get("etag")
                    .map(String::as_str)
                    .map(normalize_etag)
                    .unwrap_or("");
                match hasher.verify_hex(remote) {
                    Ok(local) => Some(local),
                    Err(VerificationError::Mismatch { expected, actual }) => {
                        error!(path = %path.display(), remote = %expected, local = %actual, "checksum mismatch");
                        return Err(Error::ChecksumMismatch {
                            remote: expected,
                            local:  actual,
                        });
                    }
                    Err(VerificationError::Io(e)) => return Err(Error::Io(e)),
                }
            }
            None => None,
        };

        let json = captured.and_then(|raw| match serde_json::from_slice(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "saved json body did not decode");
                None
            }
        });

        Ok(ResponseEnvelope {
            url,
            status,
            headers,
            body: ResponseBody::Saved {
                path: path.to_path_buf(),
                bytes,
                json,
            },
            local_hash,
        })
    }
}

async fn write_stream<E: std::error::Error>(
    mut body: BoxStream<'static, std::result::Result<bytes::Bytes, E>>,
    path: &Path,
    mut hasher: Option<&mut Md5Hasher>,
    mut capture: Option<&mut Vec<u8>>,
) -> Result<u64> {
    let mut file = tokio::fs::File::create(path).await?;
    let mut written = 0u64;

    while let Some(chunk) = body.next().await {
        let chunk = chunk.map_err(|e| Error::Transport(e.to_string()))?;
        if let Some(hasher) = hasher.as_deref_mut() {
            hasher.update(&chunk);
        }
        if let Some(capture) = capture.as_deref_mut() {
            capture.extend_from_slice(&chunk);
        }
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }

    file.flush().await?;
    Ok(written)
}

async fn buffer<E: std::error::Error>(response: HttpResponse<E>) -> Result<ResponseEnvelope> {
    let url = response.url.clone();
    let status = response.status;
    let headers = response.headers.clone();
    let bytes = response
        .bytes()
        .await
        .map_err(|e| Error::Transport(e.to_string()))?;

    let content_type = headers.get("content-type").map(String::as_str).unwrap_or("");
    let body = if is_json(content_type) {
        match serde_json::from_slice(&bytes) {
            Ok(value) => ResponseBody::Json(value),
            Err(e) => {
                debug!(%url, error = %e, "json body did not decode, keeping raw bytes");
                ResponseBody::Raw(bytes)
            }
        }
    } else {
        ResponseBody::Raw(bytes)
    };

    Ok(ResponseEnvelope {
        url,
        status,
        headers,
        body,
        local_hash: None,
    })
}
