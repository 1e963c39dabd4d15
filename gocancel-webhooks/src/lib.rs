//! Webhook signature verification for the GoCancel API
//!
//! GoCancel signs every webhook delivery with a `Gocxl-Signature` header:
//!
//! ```text
//! Gocxl-Signature: t=1495999758,v1=5257a869e7ecebeda32affa62cdca3fa51cad7e77a0e56ff536d0ce8e108d8bd
//! ```
//!
//! `t` is the Unix time of signing and each `v1` is a hex HMAC-SHA256 of
//! `"<t>.<raw body>"` keyed by the endpoint's signing secret. More than one
//! `v1` entry is sent while a secret is being rolled.
//!
//! # Features
//!
//! - **Verification**: constant-time comparison against every `v1` candidate
//! - **Replay protection**: configurable tolerance window (default 5 minutes)
//! - **Signing**: produce headers, including multi-secret rotation headers
//! - **Receiver**: header lookup and JSON decoding for HTTP handlers
//!
//! # Example: Validating a Payload
//!
//! ```rust
//! use gocancel_webhooks::{WebhookSigner, validate_payload};
//!
//! let body = br#"{"id":"evt_123","object":"event"}"#;
//! let header = WebhookSigner::new("wh_secret").sign(body);
//!
//! assert!(validate_payload(body, &header, "wh_secret").is_ok());
//! ```
//!
//! # Example: Receiving Webhooks
//!
//! ```rust,no_run
//! use gocancel_webhooks::{WebhookError, WebhookReceiver};
//! use std::time::Duration;
//!
//! let receiver = WebhookReceiver::new("wh_secret").with_tolerance(Duration::from_secs(60));
//!
//! let body = b"webhook payload";
//! let header = "t=1495999758,v1=abc123...";
//!
//! match receiver.verify(body, header) {
//!     Ok(()) => println!("accepted"),
//!     Err(WebhookError::TooOld) => println!("replayed or delayed delivery"),
//!     Err(err) => println!("rejected: {}", err),
//! }
//! ```

mod config;
mod error;
mod header;
mod payload;
mod receiver;
mod signature;

pub use config::{
    ENV_ENFORCE_TOLERANCE, ENV_SIGNATURE_HEADER, ENV_TOLERANCE_SECS, WebhookConfig,
    WebhookConfigBuilder,
};
pub use error::WebhookError;
pub use header::SignedHeader;
pub use payload::{
    DEFAULT_TOLERANCE, Tolerance, validate_payload, validate_payload_ignoring_tolerance,
    validate_payload_with_policy, validate_payload_with_tolerance,
};
pub use receiver::WebhookReceiver;
pub use signature::{SIGNATURE_LEN, SIGNING_VERSION, WebhookSigner, compute_signature, headers};

/// Result type for webhook operations
pub type Result<T> = std::result::Result<T, WebhookError>;
