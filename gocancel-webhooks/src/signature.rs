//! Webhook signature generation

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::fmt;

type HmacSha256 = Hmac<Sha256>;

/// Scheme tag of the signatures this crate produces and accepts
pub const SIGNING_VERSION: &str = "v1";

/// Length in bytes of a `v1` signature
pub const SIGNATURE_LEN: usize = 32;

/// Compute a `v1` signature: HMAC-SHA256 of `"<unix seconds>.<payload>"`
/// keyed by `secret`.
///
/// Only whole seconds of `timestamp` are signed.
pub fn compute_signature(
    timestamp: DateTime<Utc>,
    payload: &[u8],
    secret: impl AsRef<[u8]>,
) -> [u8; SIGNATURE_LEN] {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_ref()).expect("HMAC can take any size key");
    mac.update(timestamp.timestamp().to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);

    let mut signature = [0u8; SIGNATURE_LEN];
    signature.copy_from_slice(&mac.finalize().into_bytes());
    signature
}

/// Produces `Gocxl-Signature` header values.
///
/// More than one secret can be configured while a secret is being rolled;
/// each one contributes its own `v1` entry to the header.
#[derive(Clone)]
pub struct WebhookSigner {
    secrets: Vec<Vec<u8>>,
}

impl WebhookSigner {
    /// Create a signer for a single secret
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self {
            secrets: vec![secret.as_ref().to_vec()],
        }
    }

    /// Also sign with `secret`, emitting an extra `v1` entry
    pub fn with_rotated_secret(mut self, secret: impl AsRef<[u8]>) -> Self {
        self.secrets.push(secret.as_ref().to_vec());
        self
    }

    /// Number of secrets the signer emits signatures for
    pub fn secret_count(&self) -> usize {
        self.secrets.len()
    }

    /// Sign the payload with the current time
    pub fn sign(&self, payload: &[u8]) -> String {
        self.sign_at(payload, Utc::now())
    }

    /// Sign the payload with a specific timestamp
    pub fn sign_at(&self, payload: &[u8], timestamp: DateTime<Utc>) -> String {
        let mut header = format!("t={}", timestamp.timestamp());
        for secret in &self.secrets {
            let signature = compute_signature(timestamp, payload, secret);
            header.push(',');
            header.push_str(SIGNING_VERSION);
            header.push('=');
            header.push_str(&hex::encode(signature));
        }
        header
    }
}

impl fmt::Debug for WebhookSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebhookSigner")
            .field("secrets", &format_args!("[{} redacted]", self.secret_count()))
            .finish()
    }
}

/// Header names used by webhook deliveries
pub mod headers {
    /// The signature header name
    pub const SIGNATURE: &str = "Gocxl-Signature";
}
