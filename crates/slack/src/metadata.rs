//! Correlation token carried through a modal's `private_metadata`.
//!
//! Slack hands the string back untouched on submission, so the payload is
//! versioned and decoded strictly: a token this build cannot read fails the
//! submission instead of posting to the wrong place.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const METADATA_VERSION: u8 = 1;

/// Slack rejects `private_metadata` longer than this.
pub const MAX_METADATA_LEN: usize = 3000;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModalMetadata {
    #[serde(rename = "v")]
    pub version: u8,
    pub channel_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum MetadataError {
    #[error("modal metadata is malformed: {0}")]
    Malformed(String),
    #[error("modal metadata version {found} is not supported")]
    UnsupportedVersion { found: u8 },
    #[error("modal metadata does not name a channel")]
    MissingChannel,
    #[error("modal metadata is {len} bytes, above the private_metadata limit")]
    TooLong { len: usize },
}

impl ModalMetadata {
    pub fn for_channel(channel_id: impl Into<String>) -> Self {
        Self { version: METADATA_VERSION, channel_id: channel_id.into(), message: None }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn encode(&self) -> Result<String, MetadataError> {
        if self.channel_id.trim().is_empty() {
            return Err(MetadataError::MissingChannel);
        }

        let encoded = serde_json::to_string(self)
            .map_err(|error| MetadataError::Malformed(error.to_string()))?;
        if encoded.len() > MAX_METADATA_LEN {
            return Err(MetadataError::TooLong { len: encoded.len() });
        }
        Ok(encoded)
    }

    pub fn decode(raw: &str) -> Result<Self, MetadataError> {
        if raw.trim().is_empty() {
            return Err(MetadataError::Malformed("empty private_metadata".to_owned()));
        }

        let metadata: Self = serde_json::from_str(raw)
            .map_err(|error| MetadataError::Malformed(error.to_string()))?;
        if metadata.version != METADATA_VERSION {
            return Err(MetadataError::UnsupportedVersion { found: metadata.version });
        }
        if metadata.channel_id.trim().is_empty() {
            return Err(MetadataError::MissingChannel);
        }
        Ok(metadata)
    }
}

#[cfg(test)]
mod tests {
    use super::{MetadataError, ModalMetadata, MAX_METADATA_LEN};

    #[test]
    fn encodes_compact_versioned_json() {
        let encoded = ModalMetadata::for_channel("C123").encode().expect("encode");
        assert_eq!(encoded, r#"{"v":1,"channel_id":"C123"}"#);

        let with_message = ModalMetadata::for_channel("C9")
            .with_message("Shortcut triggered")
            .encode()
            .expect("encode");
        assert_eq!(with_message, r#"{"v":1,"channel_id":"C9","message":"Shortcut triggered"}"#);
    }

    #[test]
    fn decodes_what_it_encodes() {
        let metadata = ModalMetadata::for_channel("C42").with_message("hi");
        let decoded = ModalMetadata::decode(&metadata.encode().expect("encode")).expect("decode");
        assert_eq!(decoded, metadata);
    }

    #[test]
    fn rejects_malformed_tokens() {
        assert!(matches!(ModalMetadata::decode(""), Err(MetadataError::Malformed(_))));
        assert!(matches!(ModalMetadata::decode("not json"), Err(MetadataError::Malformed(_))));
        assert!(matches!(
            ModalMetadata::decode(r#"{"channel_id":"C1"}"#),
            Err(MetadataError::Malformed(_))
        ));
    }

    #[test]
    fn rejects_unknown_versions_and_missing_channels() {
        assert_eq!(
            ModalMetadata::decode(r#"{"v":2,"channel_id":"C1"}"#),
            Err(MetadataError::UnsupportedVersion { found: 2 })
        );
        assert_eq!(
            ModalMetadata::decode(r#"{"v":1,"channel_id":"  "}"#),
            Err(MetadataError::MissingChannel)
        );
        assert_eq!(ModalMetadata::for_channel("").encode(), Err(MetadataError::MissingChannel));
    }

    #[test]
    fn refuses_to_encode_oversized_tokens() {
        let metadata = ModalMetadata::for_channel("C1").with_message("x".repeat(MAX_METADATA_LEN));
        assert!(matches!(metadata.encode(), Err(MetadataError::TooLong { .. })));
    }
}
