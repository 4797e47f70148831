pub const USER_AGENT: &str = concat!("swift-client/", env!("CARGO_PKG_VERSION"));

/// Headers sent with every resource call. The token goes out under both names
/// because older gateways only read `X-Storage-Token`.
pub fn default_headers(token: &str) -> Vec<(String, String)> {
    vec![
        ("User-Agent".to_string(), USER_AGENT.to_string()),
        ("X-Auth-Token".to_string(), token.to_string()),
        ("X-Storage-Token".to_string(), token.to_string()),
        ("Accept".to_string(), "application/json".to_string()),
    ]
}

/// Apply `overrides` on top of `base`; on a case-insensitive name clash the
/// override replaces the base value.
pub fn merge_headers<I>(mut base: Vec<(String, String)>, overrides: I) -> Vec<(String, String)>
where
    I: IntoIterator<Item = (String, String)>,
{
    for (key, value) in overrides {
        base.retain(|(existing, _)| !existing.eq_ignore_ascii_case(&key));
        base.push((key, value));
    }
    base
}

/// `prefix + lowercase(key)` for each pair, as used by the `*-Meta-*` headers.
pub fn prefixed_headers<I, K, V>(prefix: &str, pairs: I) -> Vec<(String, String)>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<String>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (format!("{prefix}{}", k.as_ref().to_lowercase()), v.into()))
        .collect()
}

pub fn is_json(content_type: &str) -> bool { content_type.contains("application/json") }

pub fn is_octet_stream(content_type: &str) -> bool { content_type.contains("octet-stream") }

/// Strip whitespace and the optional double quotes around an entity tag.
pub fn normalize_etag(etag: &str) -> &str { etag.trim().trim_matches('"') }

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_default_headers_carry_token_twice() {
        let headers = default_headers("tk");
        assert!(headers.contains(&("X-Auth-Token".into(), "tk".into())));
        assert!(headers.contains(&("X-Storage-Token".into(), "tk".into())));
        assert!(headers.contains(&("Accept".into(), "application/json".into())));
    }

    #[test]
    fn test_merge_overrides_case_insensitively() {
        let merged = merge_headers(
            default_headers("tk"),
            owned(&[("accept", "text/plain"), ("X-Object-Meta-Color", "blue")]),
        );
        let accepts: Vec<_> = merged
            .iter()
            .filter(|(k, _)| k.eq_ignore_ascii_case("accept"))
            .collect();
        assert_eq!(accepts.len(), 1);
        assert_eq!(accepts[0].1, "text/plain");
        assert!(merged.contains(&("X-Object-Meta-Color".into(), "blue".into())));
        assert_eq!(merged.len(), 5);
    }

    #[test]
    fn test_prefixed_headers_lowercase_keys() {
        assert_eq!(
            prefixed_headers("x-object-meta-", [("Color", "blue")]),
            owned(&[("x-object-meta-color", "blue")])
        );
    }

    #[test]
    fn test_content_type_predicates() {
        assert!(is_json("application/json; charset=utf-8"));
        assert!(!is_json("text/plain"));
        assert!(is_octet_stream("binary/octet-stream"));
        assert!(is_octet_stream("application/octet-stream"));
        assert!(!is_octet_stream("application/json"));
    }

    #[test]
    fn test_normalize_etag() {
        assert_eq!(normalize_etag("\"abc\""), "abc");
        assert_eq!(normalize_etag(" abc "), "abc");
    }
}
