//! Save blob encoding.
//!
//! A save blob is a JSON envelope around the JSON-encoded
//! [`RegistrySnapshot`]:
//!
//! ```text
//! {
//!   "version": 1,
//!   "saved_at": 120000,
//!   "checksum": "<hex sha-256 of payload>",
//!   "payload": "<snapshot json>"
//! }
//! ```
//!
//! The payload is kept as a string so the checksum covers the exact bytes
//! that were written.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use skill_core::{RegistrySnapshot, Timestamp};

/// Errors raised while encoding or decoding a save blob.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported save version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("checksum mismatch: expected {expected}, computed {computed}")]
    ChecksumMismatch { expected: String, computed: String },
}

#[derive(Debug, Serialize, Deserialize)]
struct SaveEnvelope {
    version: u32,
    saved_at: u64,
    checksum: String,
    payload: String,
}

/// Decoded contents of a save blob.
#[derive(Clone, Debug, PartialEq)]
pub struct SaveFile {
    /// Session clock reading when the save was taken.
    pub saved_at: Timestamp,
    pub snapshot: RegistrySnapshot,
}

/// Encodes and verifies registry save blobs.
pub struct SaveCodec;

impl SaveCodec {
    pub const VERSION: u32 = 1;

    pub fn encode(file: &SaveFile) -> Result<Vec<u8>, CodecError> {
        let payload = serde_json::to_string(&file.snapshot)?;
        let envelope = SaveEnvelope {
            version: Self::VERSION,
            saved_at: file.saved_at.0,
            checksum: Self::checksum(&payload),
            payload,
        };
        Ok(serde_json::to_vec(&envelope)?)
    }

    /// Decodes a blob, rejecting unknown versions and tampered payloads.
    pub fn decode(blob: &[u8]) -> Result<SaveFile, CodecError> {
        let envelope: SaveEnvelope = serde_json::from_slice(blob)?;

        if envelope.version != Self::VERSION {
            return Err(CodecError::UnsupportedVersion {
                found: envelope.version,
                expected: Self::VERSION,
            });
        }

        let computed = Self::checksum(&envelope.payload);
        if computed != envelope.checksum {
            return Err(CodecError::ChecksumMismatch {
                expected: envelope.checksum,
                computed,
            });
        }

        Ok(SaveFile {
            saved_at: Timestamp(envelope.saved_at),
            snapshot: serde_json::from_str(&envelope.payload)?,
        })
    }

    fn checksum(payload: &str) -> String {
        hex::encode(Sha256::digest(payload.as_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skill_core::{
        ActionReward, LevelingCurve, RegistryConfig, SkillAction, SkillDefinition, SkillDetails,
        SkillEngine, SkillRegistry,
    };

    fn registry() -> SkillRegistry {
        let action = SkillAction::new("mine_copper", "Mine copper", 2_000)
            .with_reward(ActionReward::experience("mining", 30));
        let definition =
            SkillDefinition::new("mining", "Mining", LevelingCurve::linear(100)).with_action(action);
        let mut registry = SkillRegistry::new(RegistryConfig::default());
        registry
            .register_skill(SkillEngine::standard(definition), SkillDetails::new("Mining"), vec![])
            .unwrap();
        registry
    }

    #[test]
    fn decodes_what_it_encodes() {
        let mut registry = registry();
        registry.grant_experience(&"mining".into(), 250).unwrap();
        let file = SaveFile {
            saved_at: Timestamp(42_000),
            snapshot: registry.save_all_skills(),
        };

        let blob = SaveCodec::encode(&file).unwrap();
        assert_eq!(SaveCodec::decode(&blob).unwrap(), file);
    }

    #[test]
    fn tampered_payload_fails_checksum() {
        let file = SaveFile {
            saved_at: Timestamp::ZERO,
            snapshot: registry().save_all_skills(),
        };
        let blob = SaveCodec::encode(&file).unwrap();

        let mut envelope: SaveEnvelope = serde_json::from_slice(&blob).unwrap();
        envelope.payload = envelope.payload.replace("\"level\":1", "\"level\":99");
        let tampered = serde_json::to_vec(&envelope).unwrap();

        assert!(matches!(
            SaveCodec::decode(&tampered),
            Err(CodecError::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn future_versions_are_rejected() {
        let blob = br#"{"version":2,"saved_at":0,"checksum":"","payload":"{}"}"#;
        assert!(matches!(
            SaveCodec::decode(blob),
            Err(CodecError::UnsupportedVersion { found: 2, expected: 1 })
        ));
    }

    #[test]
    fn garbage_is_a_json_error() {
        assert!(matches!(SaveCodec::decode(b"not a save"), Err(CodecError::Json(_))));
    }
}
