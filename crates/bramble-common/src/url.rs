//! URL resolution utilities.
//!
//! Used to turn the `href` of `<link rel="stylesheet">` and the `src` of
//! `<script>` elements into absolute URLs that the (external) fetch layer can
//! request. Only the cases that appear in real markup are handled: absolute
//! URLs, protocol-relative URLs, host-rooted paths and relative paths with
//! `../` segments.

/// Resolve a potentially relative URL against a base URL.
///
/// # Algorithm
///
/// STEP 1: If `href` already carries a scheme (`scheme://...` or `data:`),
///         return it unchanged.
///
/// STEP 2: Without a usable base (`None`, or a base with no `://`), there is
///         nothing to resolve against; return `href` unchanged.
///
/// STEP 3: Otherwise join `href` with the base:
/// - `//host/path` takes the scheme of the base
/// - `/path` replaces the path of the base
/// - anything else is appended to the base's directory, with each leading
///   `../` climbing one directory but never above the host
#[must_use]
pub fn resolve_url(href: &str, base_url: Option<&str>) -> String {
    // STEP 1
    if href.contains("://") || href.starts_with("data:") {
        return href.to_string();
    }

    // STEP 2
    let Some(base) = base_url else {
        return href.to_string();
    };
    let Some((scheme, host_path)) = base.split_once("://") else {
        return href.to_string();
    };

    // STEP 3
    if let Some(rest) = href.strip_prefix("//") {
        return format!("{scheme}://{rest}");
    }

    if href.starts_with('/') {
        let host = host_path.split_once('/').map_or(host_path, |(host, _)| host);
        return format!("{scheme}://{host}{href}");
    }

    // A base without a path ("http://example.org") is treated as the root
    // directory of its host.
    let (host, path) = host_path
        .split_once('/')
        .map_or((host_path, ""), |(host, path)| (host, path));
    let mut segments: Vec<&str> = path.split('/').collect();
    // The last segment is the document itself, not a directory.
    let _ = segments.pop();

    let mut relative = href;
    while let Some(rest) = relative.strip_prefix("../") {
        relative = rest;
        let _ = segments.pop();
    }

    let mut resolved = format!("{scheme}://{host}");
    for segment in segments {
        resolved.push('/');
        resolved.push_str(segment);
    }
    resolved.push('/');
    resolved.push_str(relative);
    resolved
}

#[cfg(test)]
mod tests {
    use super::resolve_url;

    #[test]
    fn test_absolute_url_is_unchanged() {
        assert_eq!(
            resolve_url("https://cdn.example.com/a.css", Some("http://example.org/")),
            "https://cdn.example.com/a.css"
        );
    }

    #[test]
    fn test_no_base_returns_href() {
        assert_eq!(resolve_url("style.css", None), "style.css");
    }

    #[test]
    fn test_host_rooted_path() {
        assert_eq!(
            resolve_url("/css/main.css", Some("http://example.org/blog/post.html")),
            "http://example.org/css/main.css"
        );
        assert_eq!(
            resolve_url("/main.css", Some("http://example.org")),
            "http://example.org/main.css"
        );
    }

    #[test]
    fn test_relative_path_uses_base_directory() {
        assert_eq!(
            resolve_url("main.css", Some("http://example.org/blog/post.html")),
            "http://example.org/blog/main.css"
        );
        assert_eq!(
            resolve_url("main.css", Some("http://example.org")),
            "http://example.org/main.css"
        );
    }

    #[test]
    fn test_parent_segments_stop_at_host() {
        assert_eq!(
            resolve_url("../main.css", Some("http://example.org/a/b/page.html")),
            "http://example.org/a/main.css"
        );
        assert_eq!(
            resolve_url("../../../main.css", Some("http://example.org/a/page.html")),
            "http://example.org/main.css"
        );
    }

    #[test]
    fn test_protocol_relative() {
        assert_eq!(
            resolve_url("//cdn.example.com/x.js", Some("https://example.org/")),
            "https://cdn.example.com/x.js"
        );
    }
}
