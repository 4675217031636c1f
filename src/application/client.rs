use crate::domain::card::{CardNumber, TraceId};
use crate::domain::ports::{PayloadEncryptorRef, SecureChannelRef};
use crate::domain::request::{CardholderDetails, CmsRequest, EncryptedPayload};
use crate::domain::response::CmsResponse;
use crate::error::{CmsClientError, Result};
use tracing::{info, warn};

/// Looks up a cardholder's registered mobile number and email at the switch.
///
/// Each call is independent: validate, encrypt, POST, parse. There is no
/// retry, and a card that fails validation never reaches the channel. The
/// channel and encryptor are shared, read-only collaborators, so one client
/// can serve any number of concurrent lookups.
pub struct SwitchCmsClient {
    channel: SecureChannelRef,
    encryptor: PayloadEncryptorRef,
    endpoint: String,
}

impl SwitchCmsClient {
    /// Creates a new `SwitchCmsClient`.
    ///
    /// # Arguments
    ///
    /// * `channel` - Pre-configured TLS channel; the client never rebuilds it.
    /// * `encryptor` - Encrypts card data before it leaves the process.
    /// * `endpoint` - Full URL of the switch customer-details endpoint.
    pub fn new(
        channel: SecureChannelRef,
        encryptor: PayloadEncryptorRef,
        endpoint: impl Into<String>,
    ) -> Self {
        Self {
            channel,
            encryptor,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Looks up contact details for `card_number` alone.
    pub async fn send_cardholder_contact_request(
        &self,
        trace_id: &str,
        card_number: &str,
    ) -> Result<CmsResponse> {
        self.send_lookup(trace_id, &CardholderDetails::new(card_number))
            .await
    }

    /// Looks up contact details, also sending any auxiliary fields in
    /// `details`, each encrypted separately.
    pub async fn send_lookup(
        &self,
        trace_id: &str,
        details: &CardholderDetails,
    ) -> Result<CmsResponse> {
        let trace_id = TraceId::parse(trace_id)?;
        let card = CardNumber::parse(&details.card_number).inspect_err(|e| {
            warn!(trace_id = %trace_id, error = %e, "card rejected before dispatch");
        })?;

        let payload = EncryptedPayload::seal(&card, details, self.encryptor.as_ref())
            .inspect_err(|e| warn!(trace_id = %trace_id, error = %e, "encryption failed"))?;
        let request = CmsRequest {
            trace_id: trace_id.clone(),
            payload,
        };
        let body = serde_json::to_string(&request).map_err(CmsClientError::Encode)?;
        drop(request);

        info!(
            trace_id = %trace_id,
            card = %card,
            endpoint = %self.endpoint,
            "dispatching cardholder contact lookup"
        );
        let raw = self
            .channel
            .post(&self.endpoint, body)
            .await
            .inspect_err(|e| warn!(trace_id = %trace_id, error = %e, "switch call failed"))?;

        let response = CmsResponse::from_json(&raw).inspect_err(|e| {
            warn!(trace_id = %trace_id, error = %e, "switch response rejected");
        })?;
        if response.trace_id != trace_id.as_str() {
            return Err(CmsClientError::contract(
                "traceId in response does not match the request",
            ));
        }

        info!(
            trace_id = %trace_id,
            flag = %response.api_resp_flag,
            mobile_present = response.mobile_number.is_present(),
            email_present = response.email_id.is_present(),
            "cardholder contact lookup completed"
        );
        Ok(response)
    }
}
