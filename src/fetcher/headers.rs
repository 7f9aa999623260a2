//! Browser-like request headers.
//!
//! Many camera sites reject obvious bot traffic, so every request made by the
//! pipeline looks like a desktop Chrome navigation.

use reqwest::header::{
    HeaderMap, HeaderValue, ACCEPT, ACCEPT_ENCODING, ACCEPT_LANGUAGE, CACHE_CONTROL, CONNECTION,
    DNT, REFERER, UPGRADE_INSECURE_REQUESTS, USER_AGENT,
};
use url::Url;

pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

const BROWSER_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,\
     image/avif,image/webp,image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.7";

/// `<scheme>://<host[:port]>/` of a URL, used as the Referer
pub fn origin_referer(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{}://{}:{}/", url.scheme(), host, port),
        None => format!("{}://{}/", url.scheme(), host),
    })
}

pub fn browser_headers(url: Option<&Url>) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
    headers.insert(ACCEPT, HeaderValue::from_static(BROWSER_ACCEPT));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
    headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("gzip, deflate, br"));
    headers.insert(DNT, HeaderValue::from_static("1"));
    headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
    headers.insert(UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));
    headers.insert("sec-fetch-dest", HeaderValue::from_static("document"));
    headers.insert("sec-fetch-mode", HeaderValue::from_static("navigate"));
    headers.insert("sec-fetch-site", HeaderValue::from_static("none"));
    headers.insert("sec-fetch-user", HeaderValue::from_static("?1"));
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("max-age=0"));

    // Skipped silently if the URL has no host
    if let Some(referer) = url.and_then(origin_referer) {
        if let Ok(value) = HeaderValue::from_str(&referer) {
            headers.insert(REFERER, value);
        }
    }

    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_referer_is_origin() {
        let url = Url::parse("https://zoo.example.org/cams/panda?live=1").unwrap();
        assert_eq!(
            origin_referer(&url).as_deref(),
            Some("https://zoo.example.org/")
        );

        let with_port = Url::parse("http://cam.local:8080/view").unwrap();
        assert_eq!(
            origin_referer(&with_port).as_deref(),
            Some("http://cam.local:8080/")
        );
    }

    #[test]
    fn test_browser_headers_complete() {
        let url = Url::parse("https://example.org/page").unwrap();
        let headers = browser_headers(Some(&url));

        assert_eq!(headers[USER_AGENT], BROWSER_USER_AGENT);
        assert_eq!(headers[REFERER], "https://example.org/");
        assert_eq!(headers[ACCEPT_ENCODING], "gzip, deflate, br");
        assert_eq!(headers["sec-fetch-mode"], "navigate");
        assert!(headers.contains_key(DNT));
        assert!(headers.contains_key(ACCEPT_LANGUAGE));
    }

    #[test]
    fn test_browser_headers_without_url() {
        let headers = browser_headers(None);
        assert!(!headers.contains_key(REFERER));
        assert!(headers.contains_key(USER_AGENT));
    }
}
