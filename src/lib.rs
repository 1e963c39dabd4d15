// GoCancel - Rust client library for the GoCancel API
//
// The HTTP resources of the API map one-to-one onto JSON requests; the part
// that needs care on the consumer side is verifying signed webhook
// deliveries, which lives in the `webhooks` module.

// Re-export optional crates
#[cfg(feature = "webhooks")]
pub use gocancel_webhooks as webhooks;

// Prelude for common imports
#[cfg(feature = "webhooks")]
pub mod prelude {
    pub use crate::webhooks::{
        SignedHeader, Tolerance, WebhookConfig, WebhookError, WebhookReceiver, WebhookSigner,
        compute_signature, validate_payload, validate_payload_ignoring_tolerance,
        validate_payload_with_tolerance,
    };
}
