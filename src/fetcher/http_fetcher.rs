use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, LOCATION};
use reqwest::{redirect, Client, ClientBuilder, Method, Response};
use tracing::debug;
use url::Url;

use crate::fetcher::headers::browser_headers;
use crate::fetcher::{Fetcher, PageResponse, ProbeResponse, TransportError, MAX_REDIRECTS};

/// reqwest-backed [`Fetcher`].
///
/// Automatic redirects are disabled so the hop count stays observable;
/// `Location` headers are followed by hand.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, TransportError> {
        let client = client_builder().build()?;
        Ok(Self { client })
    }

    /// Send a request, following redirects until a non-redirect response or
    /// until one hop past the limit.
    async fn send_following(
        &self,
        method: Method,
        url: &str,
        timeout: Duration,
    ) -> Result<(Response, usize), TransportError> {
        let origin = Url::parse(url)?;
        let headers = browser_headers(Some(&origin));
        let mut current = origin;
        let mut redirects = 0;

        loop {
            let response = self
                .client
                .request(method.clone(), current.clone())
                .headers(headers.clone())
                .timeout(timeout)
                .send()
                .await?;

            if !response.status().is_redirection() {
                return Ok((response, redirects));
            }

            let Some(location) = response
                .headers()
                .get(LOCATION)
                .and_then(|v| v.to_str().ok())
            else {
                return Ok((response, redirects));
            };

            redirects += 1;
            if redirects > MAX_REDIRECTS {
                debug!("Stopped following redirects for {} after {} hops", url, redirects);
                return Ok((response, redirects));
            }

            let next = current.join(location)?;
            debug!("Redirect {} -> {}", current, next);
            current = next;
        }
    }
}

fn client_builder() -> ClientBuilder {
    Client::builder()
        .redirect(redirect::Policy::none())
        .gzip(true)
        .brotli(true)
        .deflate(true)
}

fn content_type(response: &Response) -> Option<String> {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(String::from)
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn head(&self, url: &str, timeout: Duration) -> Result<ProbeResponse, TransportError> {
        let (response, redirects) = self.send_following(Method::HEAD, url, timeout).await?;

        Ok(ProbeResponse {
            status: response.status().as_u16(),
            content_type: content_type(&response),
            redirects,
            final_url: response.url().to_string(),
        })
    }

    async fn get(&self, url: &str, timeout: Duration) -> Result<PageResponse, TransportError> {
        let (response, redirects) = self.send_following(Method::GET, url, timeout).await?;

        let status = response.status().as_u16();
        let content_type = content_type(&response);
        let final_url = response.url().to_string();
        let body = response.text().await?;

        Ok(PageResponse {
            status,
            content_type,
            redirects,
            final_url,
            body,
        })
    }
}
