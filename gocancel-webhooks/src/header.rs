//! `Gocxl-Signature` header parsing

use crate::signature::SIGNING_VERSION;
use crate::{Result, WebhookError};
use chrono::{DateTime, Utc};
use std::str::FromStr;

/// Seconds since the Unix epoch of 0001-01-01T00:00:00Z, the timestamp a
/// header without a `t` pair is signed with
const UNSET_TIMESTAMP_SECS: i64 = -62_135_596_800;

fn unset_timestamp() -> DateTime<Utc> {
    DateTime::from_timestamp(UNSET_TIMESTAMP_SECS, 0).unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// A parsed `Gocxl-Signature` header.
///
/// Looks like `t=1495999758,v1=ABC,v1=DEF,v0=GHI`. Only `v1` entries are kept;
/// a successfully parsed header always holds at least one of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedHeader {
    timestamp: DateTime<Utc>,
    signatures: Vec<Vec<u8>>,
}

impl SignedHeader {
    /// Parse a header value.
    ///
    /// A pair that is not exactly `key=value` aborts the parse, while a `v1`
    /// value that is not valid hex is skipped. Unknown keys are ignored. When
    /// `t` appears more than once the last value wins.
    pub fn parse(header: &str) -> Result<Self> {
        if header.is_empty() {
            return Err(WebhookError::NotSigned);
        }

        let mut timestamp = unset_timestamp();
        let mut signatures = Vec::new();

        for pair in header.split(',') {
            let mut parts = pair.split('=');
            let (key, value) = match (parts.next(), parts.next(), parts.next()) {
                (Some(key), Some(value), None) => (key, value),
                _ => return Err(WebhookError::InvalidHeader),
            };

            match key {
                "t" => {
                    let secs: i64 = value.parse().map_err(|_| WebhookError::InvalidHeader)?;
                    timestamp =
                        DateTime::from_timestamp(secs, 0).ok_or(WebhookError::InvalidHeader)?;
                }
                SIGNING_VERSION => match hex::decode(value) {
                    Ok(signature) => signatures.push(signature),
                    Err(err) => tracing::trace!(error = %err, "skipping undecodable v1 signature"),
                },
                _ => {}
            }
        }

        if signatures.is_empty() {
            return Err(WebhookError::NoValidSignature);
        }

        Ok(Self {
            timestamp,
            signatures,
        })
    }

    /// When the payload was signed
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Decoded `v1` candidates, in header order
    pub fn signatures(&self) -> &[Vec<u8>] {
        &self.signatures
    }
}

impl FromStr for SignedHeader {
    type Err = WebhookError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
