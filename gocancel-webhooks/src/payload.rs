//! Payload verification against a `Gocxl-Signature` header

use crate::{Result, SignedHeader, WebhookError, compute_signature};
use chrono::{DateTime, TimeDelta, Utc};
use std::time::Duration;
use subtle::ConstantTimeEq;

/// Signatures older than this are rejected by [`validate_payload`]
pub const DEFAULT_TOLERANCE: Duration = Duration::from_secs(300);

/// Freshness policy applied to the signed timestamp
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tolerance {
    /// Reject signatures older than the given window
    Enforce(Duration),

    /// Accept signatures of any age
    Ignore,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::Enforce(DEFAULT_TOLERANCE)
    }
}

impl Tolerance {
    /// Whether a signature made at `timestamp` is stale at `now`
    fn is_expired(&self, timestamp: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        match self {
            Self::Enforce(window) => {
                let window = TimeDelta::from_std(*window).unwrap_or(TimeDelta::MAX);
                now.signed_duration_since(timestamp) > window
            }
            Self::Ignore => false,
        }
    }
}

/// Validate the payload against the header using the default tolerance of
/// five minutes.
pub fn validate_payload(payload: &[u8], header: &str, secret: impl AsRef<[u8]>) -> Result<()> {
    validate_payload_with_policy(payload, header, secret, Tolerance::default())
}

/// Validate the payload against the header, rejecting signatures older than
/// `tolerance`.
pub fn validate_payload_with_tolerance(
    payload: &[u8],
    header: &str,
    secret: impl AsRef<[u8]>,
    tolerance: Duration,
) -> Result<()> {
    validate_payload_with_policy(payload, header, secret, Tolerance::Enforce(tolerance))
}

/// Validate the payload against the header without checking the age of the
/// signature.
pub fn validate_payload_ignoring_tolerance(
    payload: &[u8],
    header: &str,
    secret: impl AsRef<[u8]>,
) -> Result<()> {
    validate_payload_with_policy(payload, header, secret, Tolerance::Ignore)
}

/// Validate the payload against the header under an explicit policy
pub fn validate_payload_with_policy(
    payload: &[u8],
    header: &str,
    secret: impl AsRef<[u8]>,
    tolerance: Tolerance,
) -> Result<()> {
    validate_at(payload, header, secret.as_ref(), tolerance, Utc::now())
}

/// Core check with an injectable clock.
///
/// Staleness is decided before any signature is compared, so an expired
/// delivery reports `TooOld` even when its signature is correct.
pub(crate) fn validate_at(
    payload: &[u8],
    header: &str,
    secret: &[u8],
    tolerance: Tolerance,
    now: DateTime<Utc>,
) -> Result<()> {
    let header = SignedHeader::parse(header)?;

    let expected = compute_signature(header.timestamp(), payload, secret);
    if tolerance.is_expired(header.timestamp(), now) {
        return Err(WebhookError::TooOld);
    }

    // Several v1 entries are sent while a signing secret is being rolled
    let matched = header
        .signatures()
        .iter()
        .any(|candidate| bool::from(expected.as_slice().ct_eq(candidate.as_slice())));

    if matched {
        Ok(())
    } else {
        Err(WebhookError::NoValidSignature)
    }
}
