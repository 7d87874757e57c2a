//! URL normalization helpers.
//!
//! Stateless functions for splitting, validating and canonicalizing the
//! URLs the client works with. The [`SplitUrl`] type can represent
//! scheme-less and authority-less forms (`//host/path`, `/path?q=1`) that
//! full URL parsers reject, which is exactly what scheme inference and
//! relative-URL detection need.

use std::borrow::Cow;

use crate::error::UrlError;

/// A URL split into its five RFC 3986 components.
///
/// All components are kept as raw strings; nothing is percent-decoded at
/// this level. Use [`SplitUrl::parse`] to build one and
/// [`SplitUrl::to_url_string`] to reassemble it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SplitUrl {
    /// Lowercased scheme, if present (`http`, `https`, ...).
    pub scheme: Option<String>,
    /// The authority (network location) component, if present.
    pub authority: Option<String>,
    /// The path component; may be empty.
    pub path: String,
    /// The raw query string, without the leading `?`.
    pub query: Option<String>,
    /// The fragment, without the leading `#`.
    pub fragment: Option<String>,
}

impl SplitUrl {
    /// Splits a URL string into components.
    ///
    /// Never fails: inputs that lack a scheme or an authority simply leave
    /// those components as `None`.
    #[must_use]
    pub fn parse(url: &str) -> Self {
        let (rest, fragment) = match url.split_once('#') {
            Some((head, frag)) => (head, Some(frag.to_string())),
            None => (url, None),
        };
        let (rest, query) = match rest.split_once('?') {
            Some((head, q)) => (head, Some(q.to_string())),
            None => (rest, None),
        };

        let (scheme, rest) = match split_scheme(rest) {
            Some((scheme, tail)) => (Some(scheme.to_ascii_lowercase()), tail),
            None => (None, rest),
        };

        let (authority, path) = if let Some(tail) = rest.strip_prefix("//") {
            match tail.find('/') {
                Some(idx) => (Some(tail[..idx].to_string()), tail[idx..].to_string()),
                None => (Some(tail.to_string()), String::new()),
            }
        } else {
            (None, rest.to_string())
        };

        Self {
            scheme,
            authority,
            path,
            query,
            fragment,
        }
    }

    /// Returns the host part of the authority, without userinfo or port.
    #[must_use]
    pub fn host(&self) -> Option<&str> {
        let authority = self.authority.as_deref()?;
        let host_port = authority.rsplit('@').next().unwrap_or(authority);
        Some(host_port.split(':').next().unwrap_or(host_port))
    }

    /// Returns the explicit port of the authority, if one is present and
    /// parses as a port number.
    #[must_use]
    pub fn port(&self) -> Option<u16> {
        let authority = self.authority.as_deref()?;
        let host_port = authority.rsplit('@').next().unwrap_or(authority);
        host_port.split_once(':')?.1.parse().ok()
    }

    /// Reassembles the components into a URL string.
    #[must_use]
    pub fn to_url_string(&self) -> String {
        let mut url = String::new();
        if let Some(scheme) = &self.scheme {
            url.push_str(scheme);
            url.push(':');
        }
        if let Some(authority) = &self.authority {
            url.push_str("//");
            url.push_str(authority);
        }
        url.push_str(&self.path);
        if let Some(query) = &self.query {
            url.push('?');
            url.push_str(query);
        }
        if let Some(fragment) = &self.fragment {
            url.push('#');
            url.push_str(fragment);
        }
        url
    }
}

/// Splits a leading `scheme:` prefix off `url`, if the prefix is a valid
/// scheme name (letter followed by letters, digits, `+`, `-` or `.`).
fn split_scheme(url: &str) -> Option<(&str, &str)> {
    let (head, tail) = url.split_once(':')?;
    let mut chars = head.chars();
    let first = chars.next()?;
    if !first.is_ascii_alphabetic() {
        return None;
    }
    if chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')) {
        Some((head, tail))
    } else {
        None
    }
}

/// Returns `true` if the URL has no network-location component.
#[must_use]
pub fn is_relative(url: &str) -> bool {
    SplitUrl::parse(url)
        .authority
        .map_or(true, |authority| authority.is_empty())
}

/// Returns `true` for loopback hostnames.
///
/// Matches `localhost`, `localhost.localdomain` and anything of the form
/// `127.x.x.x`. The dotted check is intentionally naive (it would match
/// `127.sub.example.com`); it mirrors the accepted looseness of the
/// link-prefix heuristic elsewhere in this crate.
#[must_use]
pub fn is_local_host(host: &str) -> bool {
    host == "localhost"
        || host == "localhost.localdomain"
        || (host.starts_with("127.") && host.matches('.').count() == 3)
}

/// Validates a URL and infers a scheme when one is missing.
///
/// Scheme inference: loopback hosts get `http`; explicit ports 80/443 get
/// `http`/`https`; a host with no port gets `https`; any other schemeless
/// URL with a nonstandard port is ambiguous and rejected.
///
/// # Errors
///
/// Returns [`UrlError::NoHost`] when the URL has no network location, and
/// [`UrlError::AmbiguousScheme`] when no scheme can be inferred.
pub fn clean_and_validate(url: &str) -> Result<SplitUrl, UrlError> {
    let mut split = SplitUrl::parse(url);
    if split.authority.as_deref().map_or(true, str::is_empty) {
        return Err(UrlError::NoHost {
            url: url.to_string(),
        });
    }
    if split.scheme.is_none() {
        let host = split.host().unwrap_or_default().to_string();
        let scheme = match split.port() {
            None => {
                if is_local_host(&host) {
                    "http"
                } else {
                    "https"
                }
            }
            Some(80) => "http",
            Some(443) => "https",
            Some(_) => {
                return Err(UrlError::AmbiguousScheme {
                    url: url.to_string(),
                })
            }
        };
        split.scheme = Some(scheme.to_string());
    }
    Ok(split)
}

/// Canonicalizes a URL, splitting off its query parameters.
///
/// Returns the URL with query and fragment stripped, plus the query as an
/// ordered sequence of decoded key/value pairs.
///
/// # Errors
///
/// Returns [`UrlError`] if the URL fails [`clean_and_validate`].
pub fn normalize(url: &str) -> Result<(String, Vec<(String, String)>), UrlError> {
    let mut split = clean_and_validate(url)?;
    let params = split.query.take().map_or_else(Vec::new, |q| parse_qsl(&q));
    split.fragment = None;
    Ok((split.to_url_string(), params))
}

/// Returns the URL truncated to its first three path segments
/// (conventionally `/api/vN`), with query and fragment dropped.
///
/// This is the base a client uses to resolve path-absolute URLs.
///
/// # Errors
///
/// Returns [`UrlError`] if the URL fails [`clean_and_validate`].
pub fn api_base(url: &str) -> Result<String, UrlError> {
    let mut split = clean_and_validate(url)?;
    split.path = split
        .path
        .splitn(4, '/')
        .take(3)
        .collect::<Vec<_>>()
        .join("/");
    split.query = None;
    split.fragment = None;
    Ok(split.to_url_string())
}

/// Parses a query string into an ordered sequence of key/value pairs.
///
/// `+` decodes to a space; percent-escapes are decoded; pairs without a
/// `=` get an empty value; empty pairs are skipped.
#[must_use]
pub fn parse_qsl(query: &str) -> Vec<(String, String)> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (unquote_plus(key), unquote_plus(value))
        })
        .collect()
}

fn unquote_plus(component: &str) -> String {
    let spaced = component.replace('+', " ");
    let decoded = urlencoding::decode(&spaced).map(Cow::into_owned).ok();
    decoded.unwrap_or(spaced)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_url() {
        let split = SplitUrl::parse("https://api.example:8443/api/v2/x?a=1#frag");
        assert_eq!(split.scheme.as_deref(), Some("https"));
        assert_eq!(split.authority.as_deref(), Some("api.example:8443"));
        assert_eq!(split.path, "/api/v2/x");
        assert_eq!(split.query.as_deref(), Some("a=1"));
        assert_eq!(split.fragment.as_deref(), Some("frag"));
        assert_eq!(split.host(), Some("api.example"));
        assert_eq!(split.port(), Some(8443));
    }

    #[test]
    fn test_parse_roundtrips() {
        for url in [
            "https://api.example/api/v2/",
            "//host/path",
            "/path/only?x=1",
            "http://user@host:81/p#f",
        ] {
            assert_eq!(SplitUrl::parse(url).to_url_string(), url);
        }
    }

    #[test]
    fn test_is_relative() {
        assert!(is_relative("/api/v2/exercises/"));
        assert!(is_relative("exercises/1/"));
        assert!(!is_relative("//host/api/"));
        assert!(!is_relative("https://host/api/"));
    }

    #[test]
    fn test_is_local_host() {
        assert!(is_local_host("localhost"));
        assert!(is_local_host("localhost.localdomain"));
        assert!(is_local_host("127.0.0.1"));
        assert!(is_local_host("127.1.2.3"));
        assert!(!is_local_host("128.0.0.1"));
        assert!(!is_local_host("example.com"));
        assert!(!is_local_host("127.0.1"));
    }

    #[test]
    fn test_clean_and_validate_rejects_no_host() {
        let err = clean_and_validate("/api/v2/").unwrap_err();
        assert!(matches!(err, UrlError::NoHost { .. }));
    }

    #[test]
    fn test_clean_and_validate_infers_http_for_localhost() {
        let split = clean_and_validate("//localhost/api/v2/").unwrap();
        assert_eq!(split.scheme.as_deref(), Some("http"));
    }

    #[test]
    fn test_clean_and_validate_infers_https_for_public_host() {
        let split = clean_and_validate("//api.example/api/v2/").unwrap();
        assert_eq!(split.scheme.as_deref(), Some("https"));
    }

    #[test]
    fn test_clean_and_validate_infers_scheme_from_standard_ports() {
        let split = clean_and_validate("//api.example:80/x").unwrap();
        assert_eq!(split.scheme.as_deref(), Some("http"));
        let split = clean_and_validate("//api.example:443/x").unwrap();
        assert_eq!(split.scheme.as_deref(), Some("https"));
    }

    #[test]
    fn test_clean_and_validate_rejects_nonstandard_port_without_scheme() {
        let err = clean_and_validate("//api.example:8080/x").unwrap_err();
        assert!(matches!(err, UrlError::AmbiguousScheme { .. }));
    }

    #[test]
    fn test_clean_and_validate_keeps_explicit_scheme() {
        let split = clean_and_validate("http://api.example:8080/x").unwrap();
        assert_eq!(split.scheme.as_deref(), Some("http"));
    }

    #[test]
    fn test_normalize_splits_query_params() {
        let (url, params) =
            normalize("https://api.example/api/v2/s/1/?token=a+b%21&x=1#frag").unwrap();
        assert_eq!(url, "https://api.example/api/v2/s/1/");
        assert_eq!(
            params,
            vec![
                ("token".to_string(), "a b!".to_string()),
                ("x".to_string(), "1".to_string()),
            ]
        );
    }

    #[test]
    fn test_api_base_truncates_to_three_path_segments() {
        let base = api_base("https://api.example/api/v2/exercises/1/?x=1").unwrap();
        assert_eq!(base, "https://api.example/api/v2");
    }

    #[test]
    fn test_api_base_keeps_short_paths() {
        let base = api_base("https://api.example/api").unwrap();
        assert_eq!(base, "https://api.example/api");
        let base = api_base("https://api.example").unwrap();
        assert_eq!(base, "https://api.example");
    }

    #[test]
    fn test_parse_qsl_handles_flags_and_empties() {
        assert_eq!(
            parse_qsl("a=1&flag&&b=two+words"),
            vec![
                ("a".to_string(), "1".to_string()),
                ("flag".to_string(), String::new()),
                ("b".to_string(), "two words".to_string()),
            ]
        );
    }
}
