use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Bytes left alone inside a path segment: alphanumerics and `-_.!~*'()`.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode each `/`-separated segment of `path` independently.
///
/// # Examples
///
/// ```
/// use swift_client::core::encode_path;
///
/// assert_eq!(encode_path("a/b c"), "a/b%20c");
/// assert_eq!(encode_path("/photos/2024?.jpg"), "/photos/2024%3F.jpg");
/// ```
pub fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| utf8_percent_encode(segment, SEGMENT).to_string())
        .collect::<Vec<_>>()
        .join("/")
}

/// Serialize query pairs in order as `?k=v&k=v`.
///
/// Keys and values are joined verbatim; callers pass values that are already
/// safe to embed in a URL.
pub fn build_query(query: &[(String, String)]) -> String {
    if query.is_empty() {
        return String::new();
    }
    let joined = query
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");
    format!("?{joined}")
}

pub fn build_url(storage_url: &str, path: &str, query: &[(String, String)]) -> String {
    format!("{}{}{}", storage_url, encode_path(path), build_query(query))
}
