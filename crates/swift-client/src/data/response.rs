use std::collections::BTreeMap;
use std::path::PathBuf;

use bytes::Bytes;

/// Body of a successful response after content-type dispatch.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    /// `application/json` content that decoded cleanly.
    Json(serde_json::Value),
    /// Anything else, including JSON that failed to decode.
    Raw(Bytes),
    /// The body was streamed to a local file. `json` holds the decoded copy of
    /// an `application/json` body.
    Saved {
        path:  PathBuf,
        bytes: u64,
        json:  Option<serde_json::Value>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResponseEnvelope {
    pub url:        String,
    pub status:     u16,
    /// Header names are lowercase.
    pub headers:    BTreeMap<String, String>,
    pub body:       ResponseBody,
    /// MD5 of a downloaded file, set only when it matched the server's `ETag`.
    pub local_hash: Option<String>,
}

impl ResponseEnvelope {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn etag(&self) -> Option<&str> { self.header("etag") }

    pub fn content_type(&self) -> Option<&str> { self.header("content-type") }

    pub fn json(&self) -> Option<&serde_json::Value> {
        match &self.body {
            ResponseBody::Json(value) => Some(value),
            ResponseBody::Saved { json, .. } => json.as_ref(),
            ResponseBody::Raw(_) => None,
        }
    }

    pub fn is_success(&self) -> bool { (200..300).contains(&self.status) }
}
