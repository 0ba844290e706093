//! Slack request signing (`v0` scheme).
//!
//! Every inbound request carries `X-Slack-Request-Timestamp` and
//! `X-Slack-Signature: v0=<hex hmac-sha256("v0:{timestamp}:{body}")>`.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use thiserror::Error;

pub const SIGNATURE_HEADER: &str = "x-slack-signature";
pub const TIMESTAMP_HEADER: &str = "x-slack-request-timestamp";
pub const SIGNATURE_VERSION: &str = "v0";
pub const DEFAULT_TOLERANCE_SECS: i64 = 60 * 5;

type HmacSha256 = Hmac<Sha256>;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("missing `{0}` header")]
    MissingHeader(&'static str),
    #[error("request timestamp `{0}` is not a unix timestamp")]
    InvalidTimestamp(String),
    #[error("request timestamp is {age_secs}s away from now")]
    Stale { age_secs: i64 },
    #[error("signature is not a `v0=` hex digest")]
    Malformed,
    #[error("signature does not match request body")]
    Mismatch,
    #[error("signing secret cannot key hmac-sha256")]
    InvalidKey,
}

#[derive(Clone, Debug)]
pub struct RequestVerifier {
    signing_secret: SecretString,
    tolerance_secs: i64,
}

impl RequestVerifier {
    pub fn new(signing_secret: SecretString) -> Self {
        Self { signing_secret, tolerance_secs: DEFAULT_TOLERANCE_SECS }
    }

    pub fn verify(
        &self,
        timestamp: Option<&str>,
        signature: Option<&str>,
        body: &[u8],
        now_unix: i64,
    ) -> Result<(), SignatureError> {
        let timestamp = timestamp.ok_or(SignatureError::MissingHeader(TIMESTAMP_HEADER))?;
        let signature = signature.ok_or(SignatureError::MissingHeader(SIGNATURE_HEADER))?;

        let issued_at: i64 = timestamp
            .trim()
            .parse()
            .map_err(|_| SignatureError::InvalidTimestamp(timestamp.to_owned()))?;
        let age_secs = now_unix
            .checked_sub(issued_at)
            .ok_or_else(|| SignatureError::InvalidTimestamp(timestamp.to_owned()))?;
        if age_secs.unsigned_abs() > self.tolerance_secs.unsigned_abs() {
            return Err(SignatureError::Stale { age_secs });
        }

        let digest = signature
            .trim()
            .strip_prefix(SIGNATURE_VERSION)
            .and_then(|rest| rest.strip_prefix('='))
            .and_then(decode_hex)
            .ok_or(SignatureError::Malformed)?;

        self.mac_for(timestamp.trim(), body)?
            .verify_slice(&digest)
            .map_err(|_| SignatureError::Mismatch)
    }

    /// `v0=` signature for `body`, as Slack would compute it.
    pub fn sign(&self, timestamp: &str, body: &[u8]) -> Result<String, SignatureError> {
        let digest = self.mac_for(timestamp, body)?.finalize().into_bytes();
        let hex: String = digest.iter().map(|byte| format!("{byte:02x}")).collect();
        Ok(format!("{SIGNATURE_VERSION}={hex}"))
    }

    fn mac_for(&self, timestamp: &str, body: &[u8]) -> Result<HmacSha256, SignatureError> {
        let mut mac =
            <HmacSha256 as Mac>::new_from_slice(self.signing_secret.expose_secret().as_bytes())
                .map_err(|_| SignatureError::InvalidKey)?;
        mac.update(SIGNATURE_VERSION.as_bytes());
        mac.update(b":");
        mac.update(timestamp.as_bytes());
        mac.update(b":");
        mac.update(body);
        Ok(mac)
    }
}

fn decode_hex(value: &str) -> Option<Vec<u8>> {
    if value.len() % 2 != 0 {
        return None;
    }

    value
        .as_bytes()
        .chunks(2)
        .map(|pair| Some(hex_nibble(pair[0])? << 4 | hex_nibble(pair[1])?))
        .collect()
}

fn hex_nibble(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}
