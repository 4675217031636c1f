use super::card::{CardNumber, TraceId};
use super::ports::PayloadEncryptor;
use crate::error::Result;
use serde::Serialize;
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Plaintext cardholder data supplied by the caller for one lookup.
///
/// Only `card_number` is required. The optional fields, when present, are
/// encrypted individually next to it.
#[derive(Clone, Default, Zeroize, ZeroizeOnDrop)]
pub struct CardholderDetails {
    pub card_number: String,
    pub name: Option<String>,
    pub mobile: Option<String>,
    pub email: Option<String>,
}

impl CardholderDetails {
    pub fn new(card_number: impl Into<String>) -> Self {
        Self {
            card_number: card_number.into(),
            name: None,
            mobile: None,
            email: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_mobile(mut self, mobile: impl Into<String>) -> Self {
        self.mobile = Some(mobile.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    fn has_auxiliary_fields(&self) -> bool {
        [&self.name, &self.mobile, &self.email]
            .into_iter()
            .any(|field| field.as_deref().is_some_and(|v| !v.is_empty()))
    }
}

impl fmt::Debug for CardholderDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardholderDetails")
            .field("card_number", &"<redacted>")
            .field("name", &self.name.as_ref().map(|_| "<redacted>"))
            .field("mobile", &self.mobile.as_ref().map(|_| "<redacted>"))
            .field("email", &self.email.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Per-field ciphertext container used when more than the card number is sent.
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptedFields {
    pub card_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Opaque ciphertext bound for the switch.
///
/// Serializes either as a bare Base64 string (card number only) or as an
/// [`EncryptedFields`] object.
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum EncryptedPayload {
    Single(String),
    Fields(EncryptedFields),
}

impl EncryptedPayload {
    /// Encrypts the validated card and any non-empty auxiliary fields.
    pub fn seal(
        card: &CardNumber,
        details: &CardholderDetails,
        encryptor: &dyn PayloadEncryptor,
    ) -> Result<Self> {
        let card_number = encryptor.encrypt(card.expose())?;
        if !details.has_auxiliary_fields() {
            return Ok(Self::Single(card_number));
        }

        let seal_optional = |field: &Option<String>| -> Result<Option<String>> {
            match field.as_deref() {
                Some(value) if !value.is_empty() => encryptor.encrypt(value).map(Some),
                _ => Ok(None),
            }
        };

        Ok(Self::Fields(EncryptedFields {
            card_number,
            name: seal_optional(&details.name)?,
            mobile: seal_optional(&details.mobile)?,
            email: seal_optional(&details.email)?,
        }))
    }

    /// Number of ciphertext units carried.
    pub fn field_count(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Fields(fields) => {
                1 + [&fields.name, &fields.mobile, &fields.email]
                    .into_iter()
                    .filter(|f| f.is_some())
                    .count()
            }
        }
    }
}

impl fmt::Debug for EncryptedPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EncryptedPayload({} field(s))", self.field_count())
    }
}

impl fmt::Debug for EncryptedFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EncryptedFields(<opaque>)")
    }
}

/// Wire body POSTed to the switch.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CmsRequest {
    pub trace_id: TraceId,
    pub payload: EncryptedPayload,
}
