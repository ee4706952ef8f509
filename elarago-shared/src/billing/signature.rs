/// Webhook signature verification
///
/// The provider signs each webhook delivery with HMAC-SHA256 over
/// `"{timestamp}.{payload}"` and sends the result in a header of the form:
///
/// ```text
/// t=1492774577,v1=5257a869e7ecebeda32affa62cdca3fa51cad7e77a0e56ff536d0ce8e108d8bd
/// ```
///
/// Verification recomputes the MAC with the shared secret and compares in
/// constant time ([`hmac::Mac::verify_slice`]). The timestamp must fall
/// within a tolerance window so captured deliveries cannot be replayed
/// later. Multiple `v1` entries are accepted (the provider sends several
/// during secret rotation); any one match passes.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Default replay tolerance (seconds), matching the provider SDK default
pub const DEFAULT_TOLERANCE_SECS: i64 = 300;

/// Signature verification errors
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum SignatureError {
    /// Header is not in the expected `t=...,v1=...` form
    #[error("Malformed signature header")]
    Malformed,

    /// Timestamp is outside the tolerance window
    #[error("Signature timestamp outside tolerance")]
    TimestampOutOfTolerance,

    /// No signature in the header matches the payload
    #[error("Signature mismatch")]
    Mismatch,
}

/// Verifies a signed webhook payload
///
/// # Arguments
///
/// * `secret` - The shared webhook secret
/// * `header` - The raw signature header value
/// * `payload` - The raw (unparsed) request body
/// * `now` - Current time as epoch seconds
/// * `tolerance_secs` - Maximum allowed timestamp skew
///
/// # Errors
///
/// Returns a [`SignatureError`] if the header is malformed, the timestamp is
/// stale, or no signature matches. Nothing may be mutated on failure.
pub fn verify_signature(
    secret: &str,
    header: &str,
    payload: &[u8],
    now: i64,
    tolerance_secs: i64,
) -> Result<(), SignatureError> {
    let mut timestamp: Option<i64> = None;
    let mut signatures: Vec<Vec<u8>> = Vec::new();

    for item in header.split(',') {
        let (key, value) = item.trim().split_once('=').ok_or(SignatureError::Malformed)?;
        match key {
            "t" => {
                timestamp = Some(value.parse().map_err(|_| SignatureError::Malformed)?);
            }
            "v1" => {
                let sig = hex::decode(value).map_err(|_| SignatureError::Malformed)?;
                signatures.push(sig);
            }
            // Unknown schemes (e.g. v0) are skipped, not rejected
            _ => {}
        }
    }

    let timestamp = timestamp.ok_or(SignatureError::Malformed)?;
    if signatures.is_empty() {
        return Err(SignatureError::Malformed);
    }

    if (now - timestamp).abs() > tolerance_secs {
        return Err(SignatureError::TimestampOutOfTolerance);
    }

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC can take key of any size");
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);

    let matched = signatures
        .iter()
        .any(|sig| mac.clone().verify_slice(sig).is_ok());

    if matched {
        Ok(())
    } else {
        Err(SignatureError::Mismatch)
    }
}

/// Computes the signature header for a payload (test and tooling helper)
pub fn sign_payload(secret: &str, payload: &[u8], timestamp: i64) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC can take key of any size");
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);

    format!(
        "t={},v1={}",
        timestamp,
        hex::encode(mac.finalize().into_bytes())
    )
}
