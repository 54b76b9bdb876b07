//! Decides whether a URL belongs to this installation.

use url::Url;

/// Matches URLs against the installation's canonical home host.
///
/// Hosts are compared case-insensitively with a leading `www.` ignored on
/// both sides. A missing or unparsable home URL matches nothing.
///
/// # Examples
///
/// ```
/// use content_exposure::SiteIdentity;
///
/// let site = SiteIdentity::new(Some("https://example.com"));
///
/// assert!(site.matches("https://www.Example.com/x"));
/// assert!(!site.matches("https://evil.com"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteIdentity {
    home_host: Option<String>,
}

impl SiteIdentity {
    /// Builds the matcher from the configured home URL.
    pub fn new(home_url: Option<&str>) -> Self {
        Self {
            home_host: home_url.and_then(normalized_host),
        }
    }

    /// Returns the normalized home host, if any.
    pub fn home_host(&self) -> Option<&str> {
        self.home_host.as_deref()
    }

    /// Does `url` point at this installation?
    pub fn matches(&self, url: &str) -> bool {
        match (&self.home_host, normalized_host(url)) {
            (Some(home), Some(candidate)) => home.eq_ignore_ascii_case(&candidate),
            _ => false,
        }
    }
}

fn normalized_host(url: &str) -> Option<String> {
    let parsed = Url::parse(url.trim()).ok()?;
    let host = parsed.host_str()?.to_ascii_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host);

    if host.is_empty() {
        None
    } else {
        Some(host.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn www_prefix_and_case_are_ignored() {
        let site = SiteIdentity::new(Some("https://example.com"));

        assert!(site.matches("https://www.Example.com/x"));
        assert!(site.matches("http://EXAMPLE.com"));
    }

    #[test]
    fn www_on_home_side_is_ignored() {
        let site = SiteIdentity::new(Some("https://WWW.example.com/blog/"));

        assert_eq!(site.home_host(), Some("example.com"));
        assert!(site.matches("https://example.com/2024/01/post"));
    }

    #[test]
    fn foreign_hosts_do_not_match() {
        let site = SiteIdentity::new(Some("https://example.com"));

        assert!(!site.matches("https://evil.com"));
        assert!(!site.matches("https://example.com.evil.com/"));
        assert!(!site.matches("https://sub.example.com/"));
    }

    #[test]
    fn only_leading_www_is_stripped() {
        let site = SiteIdentity::new(Some("https://example.com"));

        assert!(!site.matches("https://wwwexample.com"));
        assert!(!site.matches("https://www.www.example.com"));
    }

    #[test]
    fn missing_home_url_matches_nothing() {
        let site = SiteIdentity::new(None);

        assert!(!site.matches("https://example.com"));
    }

    #[test]
    fn malformed_urls_do_not_match() {
        let site = SiteIdentity::new(Some("https://example.com"));

        assert!(!site.matches("not a url"));
        assert!(!site.matches(""));
        assert!(!site.matches("mailto:someone@example.com"));

        let broken_home = SiteIdentity::new(Some("::::"));
        assert!(!broken_home.matches("https://example.com"));
    }

    #[test]
    fn matching_is_deterministic() {
        let site = SiteIdentity::new(Some("https://example.com"));

        let first = site.matches("https://www.example.com/a");
        let second = site.matches("https://www.example.com/a");
        assert_eq!(first, second);
    }
}
