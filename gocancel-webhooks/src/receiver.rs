//! Webhook receiver for handling incoming deliveries

use crate::payload::validate_at;
use crate::{Result, Tolerance, WebhookConfig, WebhookError};
use chrono::Utc;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;
use tracing::{debug, warn};

/// Receiver for incoming webhooks signed with one endpoint secret
#[derive(Clone)]
pub struct WebhookReceiver {
    secret: Vec<u8>,
    tolerance: Tolerance,
    signature_header: String,
}

impl WebhookReceiver {
    /// Create a new receiver with the given secret and the default tolerance
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self::from_config(secret, &WebhookConfig::default())
    }

    /// Create a receiver from a configuration
    pub fn from_config(secret: impl AsRef<[u8]>, config: &WebhookConfig) -> Self {
        Self {
            secret: secret.as_ref().to_vec(),
            tolerance: config.tolerance_policy(),
            signature_header: config.signature_header.clone(),
        }
    }

    /// Set the tolerance window
    pub fn with_tolerance(mut self, tolerance: Duration) -> Self {
        self.tolerance = Tolerance::Enforce(tolerance);
        self
    }

    /// Accept signatures of any age
    pub fn ignoring_tolerance(mut self) -> Self {
        self.tolerance = Tolerance::Ignore;
        self
    }

    /// The freshness policy in effect
    pub fn tolerance(&self) -> Tolerance {
        self.tolerance
    }

    /// Verify an incoming webhook signature
    pub fn verify(&self, payload: &[u8], signature: &str) -> Result<()> {
        let result = validate_at(payload, signature, &self.secret, self.tolerance, Utc::now());

        match &result {
            Ok(()) => debug!(payload_len = payload.len(), "webhook signature verified"),
            Err(err) => warn!(
                kind = err.kind(),
                payload_len = payload.len(),
                "rejected webhook delivery: {}",
                err
            ),
        }

        result
    }

    /// Verify and deserialize an incoming webhook body
    pub fn receive<T: DeserializeOwned>(&self, payload: &[u8], signature: &str) -> Result<T> {
        self.verify(payload, signature)?;
        Self::decode(payload)
    }

    /// Verify the signature found in the request headers.
    ///
    /// The header name is matched case-insensitively; a missing header is
    /// reported as [`WebhookError::NotSigned`].
    pub fn verify_from_headers(
        &self,
        payload: &[u8],
        headers: &HashMap<String, String>,
    ) -> Result<()> {
        let signature = self.find_signature(headers).unwrap_or_default();
        self.verify(payload, signature)
    }

    /// Verify and deserialize a webhook from HTTP headers and body
    pub fn receive_from_request<T: DeserializeOwned>(
        &self,
        payload: &[u8],
        headers: &HashMap<String, String>,
    ) -> Result<T> {
        self.verify_from_headers(payload, headers)?;
        Self::decode(payload)
    }

    fn find_signature<'a>(&self, headers: &'a HashMap<String, String>) -> Option<&'a str> {
        headers
            .get(&self.signature_header)
            .or_else(|| {
                headers
                    .iter()
                    .find(|(name, _)| name.eq_ignore_ascii_case(&self.signature_header))
                    .map(|(_, value)| value)
            })
            .map(String::as_str)
    }

    fn decode<T: DeserializeOwned>(payload: &[u8]) -> Result<T> {
        serde_json::from_slice(payload).map_err(|e| {
            let err = WebhookError::from(e);
            warn!(kind = err.kind(), "verified webhook body failed to decode: {}", err);
            err
        })
    }
}

impl fmt::Debug for WebhookReceiver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebhookReceiver")
            .field("secret", &"[redacted]")
            .field("tolerance", &self.tolerance)
            .field("signature_header", &self.signature_header)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WebhookSigner;
    use chrono::DateTime;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Event {
        id: String,
        object: String,
    }

    #[test]
    fn test_receiver_creation() {
        let receiver = WebhookReceiver::new("test-secret");
        assert_eq!(receiver.tolerance(), Tolerance::Enforce(Duration::from_secs(300)));
    }

    #[test]
    fn test_receiver_with_tolerance() {
        let receiver = WebhookReceiver::new("test-secret").with_tolerance(Duration::from_secs(60));
        assert_eq!(receiver.tolerance(), Tolerance::Enforce(Duration::from_secs(60)));
    }

    #[test]
    fn test_receiver_from_config() {
        let config = WebhookConfig::builder()
            .ignore_tolerance()
            .signature_header("X-Signature")
            .build();
        let receiver = WebhookReceiver::from_config("test-secret", &config);

        assert_eq!(receiver.tolerance(), Tolerance::Ignore);
        assert_eq!(receiver.signature_header, "X-Signature");
    }

    #[test]
    fn test_verify_valid_signature() {
        let secret = "test-secret";
        let receiver = WebhookReceiver::new(secret);
        let signature = WebhookSigner::new(secret).sign(b"test payload");

        assert_eq!(receiver.verify(b"test payload", &signature), Ok(()));
    }

    #[test]
    fn test_verify_invalid_signature() {
        let receiver = WebhookReceiver::new("correct-secret");
        let signature = WebhookSigner::new("wrong-secret").sign(b"test payload");

        assert_eq!(
            receiver.verify(b"test payload", &signature),
            Err(WebhookError::NoValidSignature)
        );
    }

    #[test]
    fn test_verify_old_signature() {
        let secret = "test-secret";
        let old = DateTime::from_timestamp(12345, 0).unwrap();
        let signature = WebhookSigner::new(secret).sign_at(b"payload", old);

        assert_eq!(
            WebhookReceiver::new(secret).verify(b"payload", &signature),
            Err(WebhookError::TooOld)
        );
        assert_eq!(
            WebhookReceiver::new(secret)
                .ignoring_tolerance()
                .verify(b"payload", &signature),
            Ok(())
        );
    }

    #[test]
    fn test_receive_and_parse() {
        let secret = "test-secret";
        let receiver = WebhookReceiver::new(secret);
        let body = br#"{"id":"evt_1","object":"event"}"#;
        let signature = WebhookSigner::new(secret).sign(body);

        let event: Event = receiver.receive(body, &signature).unwrap();
        assert_eq!(
            event,
            Event {
                id: "evt_1".to_string(),
                object: "event".to_string()
            }
        );
    }

    #[test]
    fn test_receive_rejects_undecodable_body() {
        let secret = "test-secret";
        let receiver = WebhookReceiver::new(secret);
        let body = b"not json";
        let signature = WebhookSigner::new(secret).sign(body);

        let result: Result<Event> = receiver.receive(body, &signature);
        assert!(matches!(result, Err(WebhookError::Payload(_))));
    }

    #[test]
    fn test_receive_does_not_decode_unverified_body() {
        let receiver = WebhookReceiver::new("test-secret");
        let body = br#"{"id":"evt_1","object":"event"}"#;
        let signature = WebhookSigner::new("other").sign(body);

        let result: Result<Event> = receiver.receive(body, &signature);
        assert_eq!(result, Err(WebhookError::NoValidSignature));
    }

    #[test]
    fn test_verify_from_headers() {
        let secret = "test-secret";
        let receiver = WebhookReceiver::new(secret);
        let signature = WebhookSigner::new(secret).sign(b"test payload");

        let mut headers = HashMap::new();
        headers.insert("Gocxl-Signature".to_string(), signature);

        assert_eq!(receiver.verify_from_headers(b"test payload", &headers), Ok(()));
    }

    #[test]
    fn test_verify_from_headers_case_insensitive() {
        let secret = "test-secret";
        let receiver = WebhookReceiver::new(secret);
        let signature = WebhookSigner::new(secret).sign(b"test payload");

        let mut headers = HashMap::new();
        headers.insert("gocxl-signature".to_string(), signature);

        assert_eq!(receiver.verify_from_headers(b"test payload", &headers), Ok(()));
    }

    #[test]
    fn test_verify_missing_signature() {
        let receiver = WebhookReceiver::new("test-secret");
        let headers = HashMap::new();

        assert_eq!(
            receiver.verify_from_headers(b"payload", &headers),
            Err(WebhookError::NotSigned)
        );
    }

    #[test]
    fn test_receive_from_request() {
        let secret = "test-secret";
        let receiver = WebhookReceiver::new(secret);
        let body = br#"{"id":"evt_2","object":"event"}"#;

        let mut headers = HashMap::new();
        headers.insert(
            "Gocxl-Signature".to_string(),
            WebhookSigner::new(secret).sign(body),
        );

        let event: Event = receiver.receive_from_request(body, &headers).unwrap();
        assert_eq!(event.id, "evt_2");
    }

    #[test]
    fn test_debug_redacts_secret() {
        let receiver = WebhookReceiver::new("super-secret-value");
        let debug = format!("{:?}", receiver);

        assert!(debug.contains("WebhookReceiver"));
        assert!(!debug.contains("super-secret-value"));
    }
}
