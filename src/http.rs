//! Shared HTTP client and fetch helpers.
//!
//! Every request the pipeline makes goes through one [`reqwest::Client`] that
//! carries a browser-like header set. Each call site passes its own timeout so
//! listing pages and images can be bounded differently.

use crate::error::PipelineError;
use reqwest::{Client, Response};
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue, REFERER, UPGRADE_INSECURE_REQUESTS};
use std::time::Duration;
use tracing::{debug, instrument};

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Build the shared client with browser-like default headers.
pub fn build_client() -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
        ),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
    headers.insert(UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));
    headers.insert(REFERER, HeaderValue::from_static("https://www.google.com/"));

    Client::builder()
        .user_agent(USER_AGENT)
        .default_headers(headers)
        .build()
}

/// Send a GET for `url`, treating any non-2xx status as an error.
async fn get_ok(client: &Client, url: &str, timeout: Duration) -> Result<Response, PipelineError> {
    let response = client
        .get(url)
        .timeout(timeout)
        .send()
        .await
        .map_err(|source| network(url, source))?;

    let status = response.status();
    if !status.is_success() {
        return Err(PipelineError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    Ok(response)
}

fn network(url: &str, source: reqwest::Error) -> PipelineError {
    PipelineError::Network {
        url: url.to_string(),
        source,
    }
}

/// GET `url` and return the body bytes.
#[instrument(level = "debug", skip_all, fields(%url))]
pub async fn fetch_bytes(client: &Client, url: &str, timeout: Duration) -> Result<Vec<u8>, PipelineError> {
    let body = get_ok(client, url, timeout)
        .await?
        .bytes()
        .await
        .map_err(|source| network(url, source))?;
    debug!(bytes = body.len(), "Fetched body");
    Ok(body.to_vec())
}

/// GET `url` and return the body as text, decoded per the response charset.
#[instrument(level = "debug", skip_all, fields(%url))]
pub async fn fetch_text(client: &Client, url: &str, timeout: Duration) -> Result<String, PipelineError> {
    let text = get_ok(client, url, timeout)
        .await?
        .text()
        .await
        .map_err(|source| network(url, source))?;
    debug!(chars = text.len(), "Fetched page");
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    const TIMEOUT: Duration = Duration::from_secs(5);

    #[tokio::test]
    async fn test_fetch_text_ok() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/page");
            then.status(200).body("<html>hello</html>");
        });

        let client = build_client().unwrap();
        let body = fetch_text(&client, &server.url("/page"), TIMEOUT).await.unwrap();
        mock.assert();
        assert_eq!(body, "<html>hello</html>");
    }

    #[tokio::test]
    async fn test_fetch_text_honours_declared_charset() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/latin1");
            then.status(200)
                .header("content-type", "text/html; charset=iso-8859-1")
                .body(b"<h3>Montr\xe9al man charged after robbery</h3>".as_slice());
        });

        let client = build_client().unwrap();
        let body = fetch_text(&client, &server.url("/latin1"), TIMEOUT).await.unwrap();
        assert_eq!(body, "<h3>Montréal man charged after robbery</h3>");
    }

    #[tokio::test]
    async fn test_fetch_text_non_2xx_is_status_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/gone");
            then.status(410).body("gone");
        });

        let client = build_client().unwrap();
        let err = fetch_text(&client, &server.url("/gone"), TIMEOUT).await.unwrap_err();
        assert!(matches!(err, PipelineError::Status { status: 410, .. }));
    }

    #[tokio::test]
    async fn test_fetch_sends_browser_headers() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/page")
                .header("referer", "https://www.google.com/")
                .header("accept-language", "en-US,en;q=0.5")
                .header_exists("user-agent");
            then.status(200).body("ok");
        });

        let client = build_client().unwrap();
        fetch_text(&client, &server.url("/page"), TIMEOUT).await.unwrap();
        mock.assert();
    }

    #[tokio::test]
    async fn test_fetch_non_2xx_is_status_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/missing");
            then.status(404).body("not found");
        });

        let client = build_client().unwrap();
        let err = fetch_bytes(&client, &server.url("/missing"), TIMEOUT)
            .await
            .expect_err("404 should fail");
        assert!(matches!(err, PipelineError::Status { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_fetch_connection_refused_is_network_error() {
        let client = build_client().unwrap();
        let err = fetch_bytes(&client, "http://127.0.0.1:9/nothing", TIMEOUT)
            .await
            .expect_err("nothing listens on the discard port");
        assert!(matches!(err, PipelineError::Network { .. }));
    }
}
