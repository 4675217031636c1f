//! Connection settings for the switch CMS endpoint.

use crate::error::{CmsClientError, Result};
use reqwest::Url;
use std::path::PathBuf;
use std::time::Duration;

/// Local-development endpoint. Production deployments override it.
pub const DEFAULT_BASE_URL: &str = "https://localhost:8443/api/v1/customer/details";
pub const DEFAULT_PUBLIC_KEY_PATH: &str = "keys/switch_public_key.pem";
pub const DEFAULT_CA_CERT_PATH: &str = "certs/local-ca.pem";
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: Url,
    pub public_key_path: PathBuf,
    /// PEM bundle of the CAs trusted to sign the switch's certificate.
    pub ca_cert_path: PathBuf,
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
}

impl ClientConfig {
    /// Builds a config for `base_url` with every other setting defaulted.
    ///
    /// Only `https` URLs are accepted.
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| CmsClientError::Config(format!("invalid base URL: {e}")))?;
        if base_url.scheme() != "https" {
            return Err(CmsClientError::Config(format!(
                "base URL must use https, got {}",
                base_url.scheme()
            )));
        }

        Ok(Self {
            base_url,
            public_key_path: PathBuf::from(DEFAULT_PUBLIC_KEY_PATH),
            ca_cert_path: PathBuf::from(DEFAULT_CA_CERT_PATH),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            read_timeout: DEFAULT_READ_TIMEOUT,
        })
    }

    pub fn with_public_key_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.public_key_path = path.into();
        self
    }

    pub fn with_ca_cert_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.ca_cert_path = path.into();
        self
    }

    pub fn with_timeouts(mut self, connect: Duration, read: Duration) -> Self {
        self.connect_timeout = connect;
        self.read_timeout = read;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            public_key_path: PathBuf::from(DEFAULT_PUBLIC_KEY_PATH),
            ca_cert_path: PathBuf::from(DEFAULT_CA_CERT_PATH),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            read_timeout: DEFAULT_READ_TIMEOUT,
        }
    }
}
