use crate::config::ClientConfig;
use crate::domain::ports::SecureChannel;
use crate::error::{CmsClientError, Result, TransportFailure};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::tls::{Certificate, Version};
use reqwest::{Client, StatusCode};
use std::error::Error as _;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Largest response body accepted from the switch. A contact reply is a few
/// hundred bytes.
pub const MAX_RESPONSE_BYTES: usize = 64 * 1024;

/// [`SecureChannel`] over HTTPS with one-way TLS.
///
/// Only the configured CA bundle is trusted (built-in roots are disabled),
/// hostnames are verified, TLS 1.2 is the floor and plain `http` URLs are
/// refused. The inner `reqwest::Client` pools connections and is cheap to
/// share.
#[derive(Debug, Clone)]
pub struct HttpsChannel {
    client: Client,
}

impl HttpsChannel {
    pub fn new(
        ca_bundle_pem: &[u8],
        connect_timeout: Duration,
        read_timeout: Duration,
    ) -> Result<Self> {
        let roots = Certificate::from_pem_bundle(ca_bundle_pem)
            .map_err(|e| CmsClientError::Config(format!("invalid CA bundle: {e}")))?;
        if roots.is_empty() {
            return Err(CmsClientError::Config(
                "CA bundle contains no certificates".to_string(),
            ));
        }

        let mut builder = Client::builder()
            .use_rustls_tls()
            .tls_built_in_root_certs(false)
            .min_tls_version(Version::TLS_1_2)
            .https_only(true)
            .connect_timeout(connect_timeout)
            .read_timeout(read_timeout);
        for root in roots {
            builder = builder.add_root_certificate(root);
        }

        let client = builder
            .build()
            .map_err(|e| CmsClientError::Config(format!("failed to build TLS client: {e}")))?;
        Ok(Self { client })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let pem = std::fs::read(&config.ca_cert_path).map_err(|e| {
            CmsClientError::Config(format!(
                "failed to read CA bundle {}: {e}",
                config.ca_cert_path.display()
            ))
        })?;
        Self::new(&pem, config.connect_timeout, config.read_timeout)
    }
}

#[async_trait]
impl SecureChannel for HttpsChannel {
    async fn post(&self, url: &str, body: String) -> Result<String> {
        let started = Instant::now();
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .body(body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        debug!(
            status = %status,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "switch responded"
        );
        if status != StatusCode::OK {
            warn!(status = %status, "switch returned non-200 status");
            return Err(CmsClientError::Transport {
                kind: TransportFailure::Status(status.as_u16()),
                message: format!("unexpected status {status}"),
            });
        }

        read_capped(response).await
    }
}

async fn read_capped(mut response: reqwest::Response) -> Result<String> {
    if response
        .content_length()
        .is_some_and(|len| len > MAX_RESPONSE_BYTES as u64)
    {
        return Err(oversized());
    }

    let mut body = Vec::new();
    while let Some(chunk) = response.chunk().await.map_err(transport_error)? {
        if body.len() + chunk.len() > MAX_RESPONSE_BYTES {
            return Err(oversized());
        }
        body.extend_from_slice(&chunk);
    }

    String::from_utf8(body).map_err(|_| CmsClientError::Transport {
        kind: TransportFailure::Body,
        message: "response body is not valid UTF-8".to_string(),
    })
}

fn oversized() -> CmsClientError {
    warn!(limit = MAX_RESPONSE_BYTES, "switch response exceeds size limit");
    CmsClientError::Transport {
        kind: TransportFailure::Body,
        message: format!("response body exceeds {MAX_RESPONSE_BYTES} bytes"),
    }
}

fn transport_error(err: reqwest::Error) -> CmsClientError {
    let kind = if err.is_timeout() {
        TransportFailure::Timeout
    } else if err.is_connect() {
        TransportFailure::Connect
    } else if err.is_body() || err.is_decode() {
        TransportFailure::Body
    } else {
        TransportFailure::Request
    };

    // The top-level message is generic; TLS and socket detail lives in the sources.
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }

    CmsClientError::Transport { kind, message }
}
