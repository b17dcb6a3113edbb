//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests of a run:
//! - Building the HTTP client with the configured user agent
//! - GET of the source listing page
//! - GET of each candidate image
//! - Classifying failures (transport, redirect, client, server)
//!
//! No retry is attempted and no timeout is set beyond the transport defaults.

use crate::config::ClientConfig;
use crate::FlowerError;
use reqwest::{redirect::Policy, Client, Response};

/// Maximum redirect hops followed before the request fails
pub const MAX_REDIRECTS: usize = 10;

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The client configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use flower_images::config::ClientConfig;
/// use flower_images::harvest::build_http_client;
///
/// let client = build_http_client(&ClientConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &ClientConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches the listing page and returns its body as text
pub async fn fetch_page(client: &Client, url: &str) -> Result<String, FlowerError> {
    let response = send_get(client, url).await?;

    response.text().await.map_err(|source| FlowerError::Http {
        url: url.to_string(),
        source,
    })
}

/// Downloads one image and returns the raw response bytes
///
/// The body is not inspected: whatever the server returns is stored.
pub async fn download_image(client: &Client, url: &str) -> Result<Vec<u8>, FlowerError> {
    let response = send_get(client, url).await?;

    let bytes = response.bytes().await.map_err(|source| FlowerError::Http {
        url: url.to_string(),
        source,
    })?;

    Ok(bytes.to_vec())
}

/// Sends a GET and turns every non-2xx outcome into an error
///
/// | Condition | Error |
/// |-----------|-------|
/// | Connection, TLS, body or redirect-limit failure | `Http` |
/// | 3xx left unfollowed | `Redirect` |
/// | 4xx or 5xx | `HttpStatus` |
async fn send_get(client: &Client, url: &str) -> Result<Response, FlowerError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|source| FlowerError::Http {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();

    if status.is_redirection() {
        return Err(FlowerError::Redirect {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    if status.is_client_error() || status.is_server_error() {
        return Err(FlowerError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    Ok(response)
}
