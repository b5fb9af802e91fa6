use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_ENCODING};
use reqwest::{Client, Response};
use sha1::{Digest, Sha1};

use crate::core::error::{LauncherError, LauncherResult};
use crate::core::settings::ResolverSettings;

pub fn build_http_client(settings: &ResolverSettings) -> Result<Client, reqwest::Error> {
    let mut default_headers = HeaderMap::new();
    default_headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("identity"));

    Client::builder()
        .user_agent(settings.user_agent.as_str())
        .timeout(Duration::from_secs(settings.timeout_secs))
        .default_headers(default_headers)
        .build()
}

/// GET `url`, turning non-2xx answers into `FetchStatus`.
pub async fn get_checked(client: &Client, url: &str) -> LauncherResult<Response> {
    tracing::debug!("GET {}", url);
    let resp = client.get(url).send().await?;
    if !resp.status().is_success() {
        return Err(LauncherError::FetchStatus {
            url: url.to_string(),
            status: resp.status().as_u16(),
        });
    }
    Ok(resp)
}

pub async fn get_text(client: &Client, url: &str) -> LauncherResult<String> {
    Ok(get_checked(client, url).await?.text().await?)
}

pub async fn get_bytes(client: &Client, url: &str) -> LauncherResult<Vec<u8>> {
    Ok(get_checked(client, url).await?.bytes().await?.to_vec())
}

/// Like [`get_text`] but a 404 is `None`.
pub async fn get_optional_text(client: &Client, url: &str) -> LauncherResult<Option<String>> {
    match get_text(client, url).await {
        Ok(body) => Ok(Some(body)),
        Err(LauncherError::FetchStatus { status: 404, .. }) => Ok(None),
        Err(e) => Err(e),
    }
}

/// `expected` is the body of a `.sha1` file: the hex digest, maybe followed
/// by a file name.
pub fn verify_sha1(url: &str, bytes: &[u8], expected: &str) -> LauncherResult<()> {
    let expected = expected
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();
    let actual = hex::encode(Sha1::digest(bytes));
    if actual != expected {
        return Err(LauncherError::Sha1Mismatch {
            url: url.to_string(),
            expected,
            actual,
        });
    }
    Ok(())
}
