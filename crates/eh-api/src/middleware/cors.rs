use http::HeaderValue;
use url::Url;

/// Decide whether a browser `Origin` may call the API.
///
/// Loopback origins are always allowed for local development; anything else
/// must match one of the configured origins exactly (scheme, host and port).
pub fn origin_allowed(origin: &HeaderValue, allowed_origins: &[String]) -> bool {
    let origin_str = match origin.to_str() {
        Ok(s) => s,
        Err(_) => return false,
    };

    let url = match Url::parse(origin_str) {
        Ok(u) => u,
        Err(_) => return false,
    };

    let host = match url.host_str() {
        Some(h) => h,
        None => return false,
    };

    if host.eq_ignore_ascii_case("localhost")
        || host == "[::1]"
        || host == "::1"
        || host.starts_with("127.")
    {
        return true;
    }

    let serialized = url.origin().ascii_serialization();
    allowed_origins.iter().any(|o| *o == serialized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_localhost_allowed() {
        let origin = HeaderValue::from_static("http://localhost:3000");
        assert!(origin_allowed(&origin, &[]));

        let origin = HeaderValue::from_static("http://127.0.0.1:5173");
        assert!(origin_allowed(&origin, &[]));

        let origin = HeaderValue::from_static("http://[::1]:8080");
        assert!(origin_allowed(&origin, &[]));
    }

    #[test]
    fn test_configured_origin_exact_match() {
        let allowed = vec!["https://events.example.com".to_string()];

        let origin = HeaderValue::from_static("https://events.example.com");
        assert!(origin_allowed(&origin, &allowed));

        // Different port should not match
        let origin = HeaderValue::from_static("https://events.example.com:8443");
        assert!(!origin_allowed(&origin, &allowed));

        // Different scheme should not match
        let origin = HeaderValue::from_static("http://events.example.com");
        assert!(!origin_allowed(&origin, &allowed));
    }

    #[test]
    fn test_unlisted_origin_rejected() {
        let origin = HeaderValue::from_static("http://192.168.1.50:5173");
        assert!(!origin_allowed(&origin, &[]));

        let origin = HeaderValue::from_static("not-a-url");
        assert!(!origin_allowed(&origin, &[]));
    }
}
