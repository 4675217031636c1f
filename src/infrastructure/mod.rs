//! Adapters behind the domain ports: RSA-OAEP encryption and the HTTPS channel.

pub mod https_channel;
pub mod rsa_encryption;
