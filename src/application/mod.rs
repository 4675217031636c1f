//! Application layer orchestrating a cardholder contact lookup.
//!
//! `SwitchCmsClient` validates the card, encrypts it, hands the request to the
//! injected secure channel and parses the switch's answer.

pub mod client;
