//! URL utilities for consistent URL handling
//!
//! This module normalizes base URLs so endpoint construction never produces
//! double slashes, and turns the loose host strings typed after `/c` into
//! base URLs.

/// Normalize a base URL by removing trailing slashes
///
/// # Examples
///
/// ```
/// use causerie::utils::url::normalize_base_url;
///
/// assert_eq!(normalize_base_url("https://api.example.com/v1"), "https://api.example.com/v1");
/// assert_eq!(normalize_base_url("https://api.example.com/v1///"), "https://api.example.com/v1");
/// ```
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}

/// Construct a complete API endpoint URL from a base URL and endpoint path
///
/// # Examples
///
/// ```
/// use causerie::utils::url::construct_api_url;
///
/// assert_eq!(
///     construct_api_url("https://api.example.com/v1/", "chat/completions"),
///     "https://api.example.com/v1/chat/completions"
/// );
/// ```
pub fn construct_api_url(base_url: &str, endpoint: &str) -> String {
    let normalized_base = normalize_base_url(base_url);
    let endpoint = endpoint.trim_start_matches('/');
    format!("{}/{}", normalized_base, endpoint)
}

/// Resolve a host string into a base URL.
///
/// A full `scheme://` URL is kept as given. A bare `host` or `host:port` is
/// served over plain HTTP, gets `default_port` when no port is present, and
/// gets `default_path` when no path is present.
///
/// ```
/// use causerie::utils::url::base_url_from_host;
///
/// assert_eq!(
///     base_url_from_host("gpu-box", 11434, "").unwrap(),
///     "http://gpu-box:11434"
/// );
/// assert_eq!(
///     base_url_from_host("gpu-box:9000", 8000, "/v1").unwrap(),
///     "http://gpu-box:9000/v1"
/// );
/// ```
pub fn base_url_from_host(
    input: &str,
    default_port: u16,
    default_path: &str,
) -> Result<String, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err("host is empty".to_string());
    }

    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        let (authority, path) = match trimmed.find('/') {
            Some(index) => trimmed.split_at(index),
            None => (trimmed, ""),
        };
        let has_port = authority
            .rsplit_once(':')
            .is_some_and(|(_, port)| !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()));
        let authority = if has_port {
            authority.to_string()
        } else {
            format!("{authority}:{default_port}")
        };
        let path = if path.trim_matches('/').is_empty() {
            default_path
        } else {
            path
        };
        format!("http://{authority}{path}")
    };

    let url = reqwest::Url::parse(&candidate).map_err(|e| e.to_string())?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!("unsupported scheme '{}'", url.scheme()));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err("missing host name".to_string());
    }

    Ok(normalize_base_url(&candidate))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(
            normalize_base_url("https://api.example.com/v1"),
            "https://api.example.com/v1"
        );
        assert_eq!(
            normalize_base_url("https://api.example.com/v1/"),
            "https://api.example.com/v1"
        );
        assert_eq!(
            normalize_base_url("https://api.example.com/v1///"),
            "https://api.example.com/v1"
        );
        assert_eq!(normalize_base_url(""), "");
        assert_eq!(normalize_base_url("///"), "");
    }

    #[test]
    fn test_construct_api_url() {
        assert_eq!(
            construct_api_url("https://api.example.com/v1", "chat/completions"),
            "https://api.example.com/v1/chat/completions"
        );
        assert_eq!(
            construct_api_url("https://api.example.com/v1/", "/chat/completions"),
            "https://api.example.com/v1/chat/completions"
        );
        assert_eq!(
            construct_api_url("http://localhost:11434", "api/tags"),
            "http://localhost:11434/api/tags"
        );
    }

    #[test]
    fn bare_hosts_get_default_port_and_path() {
        assert_eq!(
            base_url_from_host("localhost", 8000, "/v1").unwrap(),
            "http://localhost:8000/v1"
        );
        assert_eq!(
            base_url_from_host(" 10.0.0.5 ", 11434, "").unwrap(),
            "http://10.0.0.5:11434"
        );
        assert_eq!(
            base_url_from_host("box:8080/api/v2/", 8000, "/v1").unwrap(),
            "http://box:8080/api/v2"
        );
    }

    #[test]
    fn full_urls_are_kept() {
        assert_eq!(
            base_url_from_host("https://llm.example.com/v1/", 8000, "/v1").unwrap(),
            "https://llm.example.com/v1"
        );
        assert_eq!(
            base_url_from_host("http://127.0.0.1:11434", 11434, "").unwrap(),
            "http://127.0.0.1:11434"
        );
    }

    #[test]
    fn malformed_hosts_are_rejected() {
        assert!(base_url_from_host("", 8000, "/v1").is_err());
        assert!(base_url_from_host("   ", 8000, "/v1").is_err());
        assert!(base_url_from_host("::", 8000, "/v1").is_err());
        assert!(base_url_from_host("has space", 8000, "/v1").is_err());
        assert!(base_url_from_host("ftp://files.example.com", 8000, "").is_err());
    }
}
