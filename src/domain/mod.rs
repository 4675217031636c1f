//! Pure types and ports: checksum validation, card and trace identifiers,
//! request payloads and response value objects.

pub mod card;
pub mod luhn;
pub mod ports;
pub mod request;
pub mod response;
