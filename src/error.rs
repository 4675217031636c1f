use std::fmt;
use thiserror::Error;

/// What went wrong on the wire, kept apart from business outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportFailure {
    /// Connect or read deadline elapsed.
    Timeout,
    /// Connection refused, DNS failure or TLS handshake/certificate rejection.
    Connect,
    /// The switch answered with something other than `200 OK`.
    Status(u16),
    /// The response body could not be read.
    Body,
    /// Any other failure while building or sending the request.
    Request,
}

impl fmt::Display for TransportFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "timeout"),
            Self::Connect => write!(f, "connect"),
            Self::Status(code) => write!(f, "HTTP {code}"),
            Self::Body => write!(f, "body"),
            Self::Request => write!(f, "request"),
        }
    }
}

/// Errors raised by the cardholder contact lookup pipeline.
///
/// None of the messages carry card numbers, ciphertext or contact values.
#[derive(Error, Debug)]
pub enum CmsClientError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("card number failed Luhn checksum validation")]
    ChecksumFailed,
    #[error("failed to load RSA public key: {0}")]
    KeyLoad(String),
    #[error("encryption failed: {0}")]
    Crypto(String),
    #[error("failed to encode request: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("transport failure ({kind}): {message}")]
    Transport {
        kind: TransportFailure,
        message: String,
    },
    #[error("CMS response violated contract: {0}")]
    ContractViolation(String),
    #[error("configuration error: {0}")]
    Config(String),
}

impl CmsClientError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub(crate) fn contract(message: impl Into<String>) -> Self {
        Self::ContractViolation(message.into())
    }

    /// True when the request never left the process.
    pub fn is_pre_dispatch(&self) -> bool {
        matches!(
            self,
            Self::InvalidArgument(_)
                | Self::ChecksumFailed
                | Self::KeyLoad(_)
                | Self::Crypto(_)
                | Self::Encode(_)
                | Self::Config(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, CmsClientError>;
