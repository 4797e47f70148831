//! Pure transformations: status classification, URL and header composition,
//! cache-key derivation. Nothing in here performs I/O.

mod classify;
mod encode;
mod headers;
mod key;

pub use classify::classify;
pub use encode::{build_query, build_url, encode_path};
pub use headers::{
    USER_AGENT, default_headers, is_json, is_octet_stream, merge_headers, normalize_etag,
    prefixed_headers,
};
pub use key::cache_key;
