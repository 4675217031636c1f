use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// One-way TLS channel to the switch.
///
/// Implementations own trust configuration, hostname verification and
/// timeouts. A non-`200` status, timeout or handshake failure is reported as
/// `CmsClientError::Transport`.
#[async_trait]
pub trait SecureChannel: Send + Sync {
    /// POSTs a JSON `body` to `url` and returns the raw response body.
    async fn post(&self, url: &str, body: String) -> Result<String>;
}

/// Public-key encryption of a single sensitive field into Base64 ciphertext.
pub trait PayloadEncryptor: Send + Sync {
    fn encrypt(&self, plain_text: &str) -> Result<String>;
}

pub type SecureChannelRef = Arc<dyn SecureChannel>;
pub type PayloadEncryptorRef = Arc<dyn PayloadEncryptor>;
