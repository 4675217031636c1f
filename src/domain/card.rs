use crate::domain::luhn;
use crate::error::{CmsClientError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use zeroize::{Zeroize, ZeroizeOnDrop};

static TRACE_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9]{1,15}$").expect("trace id pattern compiles"));

/// A payment card number that passed the length and Luhn checks.
///
/// The digits are wiped from memory on drop and never appear in `Debug` or
/// `Display` output; both print the first six digits followed by `*`.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct CardNumber(String);

impl CardNumber {
    pub const MIN_LEN: usize = 13;
    pub const MAX_LEN: usize = 19;

    /// Validates a raw card number. Any non-digit, whitespace included, is an
    /// `InvalidArgument`.
    pub fn parse(raw: &str) -> Result<Self> {
        // Precondition failures (empty, non-digit) surface before length or checksum.
        let passes_checksum = luhn::is_valid(raw)?;
        if !(Self::MIN_LEN..=Self::MAX_LEN).contains(&raw.len()) {
            return Err(CmsClientError::invalid(format!(
                "card number must be {}-{} digits",
                Self::MIN_LEN,
                Self::MAX_LEN
            )));
        }
        if !passes_checksum {
            return Err(CmsClientError::ChecksumFailed);
        }

        Ok(Self(raw.to_string()))
    }

    /// The plaintext digits. Only the encryption step should call this.
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn last4(&self) -> &str {
        &self.0[self.0.len() - 4..]
    }

    pub fn masked(&self) -> String {
        format!("{}{}", &self.0[..6], "*".repeat(self.0.len() - 6))
    }
}

impl FromStr for CardNumber {
    type Err = CmsClientError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Debug for CardNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CardNumber").field(&self.masked()).finish()
    }
}

impl fmt::Display for CardNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.masked())
    }
}

/// Correlation identifier sent in plaintext alongside the encrypted payload.
///
/// Always 1-15 ASCII alphanumeric characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TraceId(String);

impl TraceId {
    pub const MAX_LEN: usize = 15;

    pub fn parse(value: &str) -> Result<Self> {
        if TRACE_ID_PATTERN.is_match(value) {
            Ok(Self(value.to_string()))
        } else {
            Err(CmsClientError::invalid(
                "traceId must be alphanumeric and 1-15 characters",
            ))
        }
    }

    /// Derives a fresh id from a random UUID, hyphens dropped and truncated.
    pub fn generate() -> Self {
        let mut id = uuid::Uuid::new_v4().simple().to_string();
        id.truncate(Self::MAX_LEN);
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TraceId {
    type Error = CmsClientError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<TraceId> for String {
    fn from(id: TraceId) -> Self {
        id.0
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_number_rejects_whitespace() {
        for raw in ["4111 1111 1111 1111", "4111111111111111\n", "\t4111111111111111"] {
            assert!(
                matches!(CardNumber::parse(raw), Err(CmsClientError::InvalidArgument(_))),
                "{raw:?} should be a precondition failure"
            );
        }
        let card = CardNumber::parse("4111111111111111").unwrap();
        assert_eq!(card.last4(), "1111");
    }

    #[test]
    fn test_card_number_checksum_failure() {
        assert!(matches!(
            CardNumber::parse("4111111111111112"),
            Err(CmsClientError::ChecksumFailed)
        ));
    }

    #[test]
    fn test_card_number_length_policy() {
        // Luhn-valid but too short for a card
        assert!(matches!(
            CardNumber::parse("59"),
            Err(CmsClientError::InvalidArgument(_))
        ));
        // 20 digits
        assert!(matches!(
            CardNumber::parse("41111111111111111113"),
            Err(CmsClientError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_card_number_rejects_non_digits() {
        assert!(matches!(
            CardNumber::parse("4111-1111-1111-1111"),
            Err(CmsClientError::InvalidArgument(_))
        ));
        assert!(matches!(
            CardNumber::parse("   "),
            Err(CmsClientError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_card_number_never_formats_plaintext() {
        let card = CardNumber::parse("4111111111111111").unwrap();
        assert_eq!(card.to_string(), "411111**********");
        assert_eq!(format!("{card:?}"), r#"CardNumber("411111**********")"#);
        assert!(!format!("{card:?}").contains("4111111111111111"));
    }

    #[test]
    fn test_trace_id_shape() {
        assert!(TraceId::parse("abc123").is_ok());
        assert!(TraceId::parse("A").is_ok());
        assert!(TraceId::parse("123456789012345").is_ok());
        assert!(TraceId::parse("").is_err());
        assert!(TraceId::parse("1234567890123456").is_err());
        assert!(TraceId::parse("trace-1").is_err());
        assert!(TraceId::parse("trace 1").is_err());
    }

    #[test]
    fn test_generated_trace_ids_are_valid_and_distinct() {
        let first = TraceId::generate();
        let second = TraceId::generate();
        assert_eq!(first.as_str().len(), TraceId::MAX_LEN);
        assert!(TraceId::parse(first.as_str()).is_ok());
        assert_ne!(first, second);
    }

    #[test]
    fn test_trace_id_serde_validates() {
        let id: TraceId = serde_json::from_str(r#""abc123""#).unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""abc123""#);
        assert!(serde_json::from_str::<TraceId>(r#""not-valid""#).is_err());
    }
}
