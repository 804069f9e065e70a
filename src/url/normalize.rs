use crate::UrlError;
use url::Url;

/// Normalizes a URL into the frontier's deduplication key
///
/// # Normalization Steps
///
/// 1. Trim surrounding whitespace
/// 2. Parse as an absolute URL; reject if malformed
/// 3. Require an http or https scheme and a host
/// 4. Remove the fragment (everything after #)
///
/// Two links that differ only in fragment normalize to the same key, so
/// `http://x/a#one` and `http://x/a#two` produce one frontier record.
///
/// # Examples
///
/// ```
/// use gossamer::url::normalize_url;
///
/// let url = normalize_url("  http://example.com/a#section  ").unwrap();
/// assert_eq!(url.as_str(), "http://example.com/a");
/// ```
pub fn normalize_url(url_str: &str) -> Result<Url, UrlError> {
    let trimmed = url_str.trim();

    let mut url = Url::parse(trimmed).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingHost);
    }

    url.set_fragment(None);

    Ok(url)
}

/// Resolves a link href against its base page to an absolute URL
///
/// Returns None for links that should never enter the frontier:
/// - empty or whitespace-only hrefs
/// - fragment-only hrefs (same-page anchors)
/// - javascript:, mailto:, tel: and data: targets
/// - hrefs that do not resolve to an http(s) URL
///
/// The fragment is stripped from the resolved URL so the result is
/// already in normalized form.
pub fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    match base_url.join(href) {
        Ok(mut absolute) => {
            if absolute.scheme() != "http" && absolute.scheme() != "https" {
                return None;
            }
            absolute.set_fragment(None);
            Some(absolute)
        }
        Err(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("http://example.com/dir/page").unwrap()
    }

    #[test]
    fn test_trim_whitespace() {
        let result = normalize_url("  http://example.com/a  ").unwrap();
        assert_eq!(result.as_str(), "http://example.com/a");
    }

    #[test]
    fn test_strip_fragment() {
        let result = normalize_url("http://example.com/a#frag").unwrap();
        assert_eq!(result.as_str(), "http://example.com/a");
    }

    #[test]
    fn test_fragments_collapse_to_one_key() {
        let a = normalize_url("http://x/a#frag1").unwrap();
        let b = normalize_url("http://x/a#frag2").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "http://x/a");
    }

    #[test]
    fn test_invalid_scheme() {
        let result = normalize_url("ftp://example.com/file");
        assert!(matches!(result.unwrap_err(), UrlError::InvalidScheme(_)));
    }

    #[test]
    fn test_relative_url_rejected() {
        assert!(normalize_url("/just/a/path").is_err());
    }

    #[test]
    fn test_malformed_url() {
        assert!(normalize_url("not a url").is_err());
    }

    #[test]
    fn test_resolve_absolute() {
        let resolved = resolve_link("http://other.com/b", &base()).unwrap();
        assert_eq!(resolved.as_str(), "http://other.com/b");
    }

    #[test]
    fn test_resolve_root_relative() {
        let resolved = resolve_link("/a", &base()).unwrap();
        assert_eq!(resolved.as_str(), "http://example.com/a");
    }

    #[test]
    fn test_resolve_path_relative() {
        let resolved = resolve_link("sibling", &base()).unwrap();
        assert_eq!(resolved.as_str(), "http://example.com/dir/sibling");
    }

    #[test]
    fn test_resolve_strips_fragment() {
        let resolved = resolve_link("/a#section", &base()).unwrap();
        assert_eq!(resolved.as_str(), "http://example.com/a");
    }

    #[test]
    fn test_resolve_skips_fragment_only() {
        assert!(resolve_link("#top", &base()).is_none());
    }

    #[test]
    fn test_resolve_skips_empty() {
        assert!(resolve_link("", &base()).is_none());
        assert!(resolve_link("   ", &base()).is_none());
    }

    #[test]
    fn test_resolve_skips_special_schemes() {
        assert!(resolve_link("javascript:void(0)", &base()).is_none());
        assert!(resolve_link("mailto:a@b.com", &base()).is_none());
        assert!(resolve_link("tel:+123", &base()).is_none());
        assert!(resolve_link("data:text/plain,x", &base()).is_none());
    }
}
