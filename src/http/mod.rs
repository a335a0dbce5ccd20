//! Outbound HTTP: the shared `reqwest` client and the GET collaborator used
//! to confirm SNS subscriptions.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{info, warn};

use crate::errors::HookError;
use crate::plugin::{FetchResponse, HttpFetcher};

pub(crate) static HTTP_CLIENT: std::sync::LazyLock<Client> = std::sync::LazyLock::new(|| {
    Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .unwrap_or_else(|_| Client::new())
});

/// Diagnostic bodies are cut to this many characters.
const MAX_BODY_CHARS: usize = 2_000;

/// Upper bound on bytes read off the wire; a UTF-8 char is at most four bytes.
const MAX_BODY_BYTES: usize = MAX_BODY_CHARS * 4;

/// Only `http` and `https` URLs are fetched.
///
/// # Errors
///
/// Returns `HookError::HttpError` for unparseable URLs or other schemes.
pub fn validate_fetch_url(raw: &str) -> Result<url::Url, HookError> {
    let parsed = url::Url::parse(raw)
        .map_err(|e| HookError::HttpError(format!("Invalid URL '{raw}': {e}")))?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(HookError::HttpError(format!(
            "URL scheme '{other}' not allowed; only http/https permitted"
        ))),
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ReqwestFetcher;

#[async_trait]
impl HttpFetcher for ReqwestFetcher {
    async fn get(&self, url: &str) -> Result<FetchResponse, HookError> {
        let parsed = validate_fetch_url(url)?;
        if parsed.scheme() == "http" {
            warn!(url = %parsed, "Fetching over plain http");
        }

        let resp = HTTP_CLIENT.get(parsed).send().await?;
        let status = resp.status().as_u16();
        let body = read_body_prefix(resp).await?;

        info!(status, "GET completed");
        Ok(FetchResponse { status, body })
    }
}

/// Reads the body chunk by chunk, stopping once enough bytes are buffered.
async fn read_body_prefix(mut resp: reqwest::Response) -> Result<String, HookError> {
    let mut buf = Vec::new();
    while buf.len() < MAX_BODY_BYTES {
        match resp.chunk().await? {
            Some(chunk) => buf.extend_from_slice(&chunk),
            None => break,
        }
    }
    Ok(body_prefix(&buf))
}

fn body_prefix(bytes: &[u8]) -> String {
    let bytes = &bytes[..bytes.len().min(MAX_BODY_BYTES)];
    String::from_utf8_lossy(bytes)
        .chars()
        .take(MAX_BODY_CHARS)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_fetch_url_accepts_http_schemes() {
        assert!(validate_fetch_url("https://sns.us-east-1.amazonaws.com/?Action=ConfirmSubscription").is_ok());
        assert!(validate_fetch_url("http://localhost:8080/confirm").is_ok());
    }

    #[test]
    fn test_validate_fetch_url_rejects_other_schemes() {
        let err = validate_fetch_url("file:///etc/passwd").unwrap_err();
        assert!(err.to_string().contains("'file'"));

        assert!(validate_fetch_url("").is_err());
        assert!(validate_fetch_url("not a url").is_err());
    }

    #[test]
    fn test_body_prefix_caps_length() {
        let huge = vec![b'a'; MAX_BODY_BYTES * 3];
        assert_eq!(body_prefix(&huge).chars().count(), MAX_BODY_CHARS);

        assert_eq!(body_prefix("héllo <ok/>".as_bytes()), "héllo <ok/>");
        assert_eq!(body_prefix(b""), "");
    }

    #[tokio::test]
    async fn test_fetcher_rejects_before_sending() {
        let result = ReqwestFetcher.get("ftp://example.com/x").await;
        assert!(matches!(result, Err(HookError::HttpError(_))));
    }
}
