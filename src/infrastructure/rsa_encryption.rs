use crate::domain::ports::PayloadEncryptor;
use crate::error::{CmsClientError, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use rsa::pkcs8::DecodePublicKey;
use rsa::traits::PublicKeyParts;
use rsa::{Oaep, RsaPublicKey};
use sha2::Sha256;
use std::path::Path;
use tracing::info;

/// OAEP with SHA-256: two digests plus two bytes of framing.
const OAEP_SHA256_OVERHEAD: usize = 2 * 32 + 2;

/// Encrypts sensitive fields for the switch using RSA-OAEP (SHA-256 digest
/// and MGF1-SHA-256).
///
/// The public key is parsed once at construction and never touched again, so
/// one instance can be shared across concurrent lookups. There is no private
/// key here; ciphertext cannot be decrypted by this process.
#[derive(Debug, Clone)]
pub struct RsaEncryptionService {
    public_key: RsaPublicKey,
}

impl RsaEncryptionService {
    /// Reads a PEM file holding one X.509 (SubjectPublicKeyInfo) RSA key.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let pem = std::fs::read_to_string(path)
            .map_err(|e| CmsClientError::KeyLoad(format!("{}: {e}", path.display())))?;
        let service = Self::from_pem(&pem)?;
        info!(
            path = %path.display(),
            modulus_bits = service.public_key.size() * 8,
            "loaded switch public key"
        );
        Ok(service)
    }

    pub fn from_pem(pem: &str) -> Result<Self> {
        let body: String = pem
            .lines()
            .filter(|line| !line.trim_start().starts_with("-----"))
            .flat_map(str::chars)
            .filter(|c| !c.is_whitespace())
            .collect();
        if body.is_empty() {
            return Err(CmsClientError::KeyLoad("PEM body is empty".to_string()));
        }

        let der = STANDARD
            .decode(body)
            .map_err(|e| CmsClientError::KeyLoad(format!("invalid base64: {e}")))?;
        let public_key = RsaPublicKey::from_public_key_der(&der)
            .map_err(|e| CmsClientError::KeyLoad(format!("not an X.509 RSA public key: {e}")))?;

        Ok(Self { public_key })
    }

    /// Largest plaintext, in bytes, that fits one OAEP block for this key.
    pub fn max_plaintext_len(&self) -> usize {
        self.public_key.size().saturating_sub(OAEP_SHA256_OVERHEAD)
    }

    /// Encrypts `plain_text` into one Base64 ciphertext block.
    ///
    /// Padding is randomized, so equal inputs give different outputs.
    pub fn encrypt(&self, plain_text: &str) -> Result<String> {
        let limit = self.max_plaintext_len();
        if plain_text.len() > limit {
            return Err(CmsClientError::Crypto(format!(
                "plaintext of {} bytes exceeds the {limit}-byte OAEP limit",
                plain_text.len()
            )));
        }

        let mut rng = rand::thread_rng();
        let ciphertext = self
            .public_key
            .encrypt(&mut rng, Oaep::new::<Sha256>(), plain_text.as_bytes())
            .map_err(|e| CmsClientError::Crypto(e.to_string()))?;

        Ok(STANDARD.encode(ciphertext))
    }
}

impl PayloadEncryptor for RsaEncryptionService {
    fn encrypt(&self, plain_text: &str) -> Result<String> {
        RsaEncryptionService::encrypt(self, plain_text)
    }
}
