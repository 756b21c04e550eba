//! URL manipulation helpers shared across the expander, providers and
//! pipeline.
//!
//! All helpers are pure and total over arbitrary strings: a malformed URL
//! yields `None`/`false` rather than an error.

use url::Url;

/// Check if a string is an http(s) URL worth processing at all.
#[must_use]
pub fn is_valid_url(url: &str) -> bool {
    if url.is_empty() {
        return false;
    }

    match Url::parse(url) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https"),
        Err(_) => false,
    }
}

/// Case-insensitive substring match of any of `domains` against the whole
/// URL string. Entries may span host and path (e.g. `mercadolivre.com/sec`).
#[must_use]
pub fn matches_any_domain(url: &str, domains: &[&str]) -> bool {
    let lower = url.to_ascii_lowercase();
    domains.iter().any(|domain| lower.contains(domain))
}

/// Drop the query string and fragment, keeping scheme/host/path.
///
/// Returns `None` when the input does not parse as a URL.
#[must_use]
pub fn strip_query_and_fragment(url: &str) -> Option<String> {
    let mut parsed = Url::parse(url).ok()?;
    parsed.set_query(None);
    parsed.set_fragment(None);
    Some(parsed.to_string())
}

/// Remove every query pair whose key is in `keys`, preserving the order of
/// the remaining pairs. An emptied query is removed entirely (no trailing
/// `?`).
pub fn remove_query_params(url: &mut Url, keys: &[&str]) {
    let retained: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| !keys.contains(&key.as_ref()))
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    url.set_query(None);
    if !retained.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in &retained {
            pairs.append_pair(key, value);
        }
    }
}

/// Set a query parameter to exactly one occurrence of `key=value`.
///
/// Any existing occurrences of `key` are removed first, so repeated rewrites
/// with the same config are idempotent.
pub fn set_query_param(url: &mut Url, key: &str, value: &str) {
    remove_query_params(url, &[key]);
    url.query_pairs_mut().append_pair(key, value);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_url_accepts_http_schemes_only() {
        assert!(is_valid_url("https://example.com/a"));
        assert!(is_valid_url("http://example.com"));
        assert!(!is_valid_url(""));
        assert!(!is_valid_url("not a url"));
        assert!(!is_valid_url("ftp://example.com/file"));
        assert!(!is_valid_url("javascript:void(0)"));
    }

    #[test]
    fn domain_matching_is_case_insensitive_and_spans_paths() {
        let domains = &["amzn.to", "mercadolivre.com/sec"];
        assert!(matches_any_domain("https://AMZN.TO/abc", domains));
        assert!(matches_any_domain(
            "https://www.mercadolivre.com/sec/xyz",
            domains
        ));
        assert!(!matches_any_domain("https://example.com", domains));
    }

    #[test]
    fn strip_query_and_fragment_keeps_path() {
        assert_eq!(
            strip_query_and_fragment("https://example.com/p/1?utm_source=x#frag").as_deref(),
            Some("https://example.com/p/1")
        );
        assert_eq!(strip_query_and_fragment("garbage"), None);
    }

    #[test]
    fn remove_query_params_preserves_other_pairs() {
        let mut url = Url::parse("https://example.com/p?a=1&tag=old&b=2").expect("parse");
        remove_query_params(&mut url, &["tag"]);
        assert_eq!(url.as_str(), "https://example.com/p?a=1&b=2");
    }

    #[test]
    fn remove_query_params_drops_empty_query() {
        let mut url = Url::parse("https://example.com/p?tag=old").expect("parse");
        remove_query_params(&mut url, &["tag"]);
        assert_eq!(url.as_str(), "https://example.com/p");
    }

    #[test]
    fn set_query_param_is_idempotent() {
        let mut url = Url::parse("https://example.com/p?tag=old&tag=older").expect("parse");
        set_query_param(&mut url, "tag", "mine-20");
        set_query_param(&mut url, "tag", "mine-20");
        assert_eq!(url.as_str(), "https://example.com/p?tag=mine-20");
    }
}
