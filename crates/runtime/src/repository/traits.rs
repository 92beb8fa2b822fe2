//! Repository contract for save slots.

use super::error::Result;

/// Storage for encoded save blobs, keyed by slot name.
pub trait SaveRepository: Send + Sync {
    /// Store `blob` under `slot`, replacing any previous save.
    fn save(&self, slot: &str, blob: &[u8]) -> Result<()>;

    /// Load the blob stored under `slot`.
    fn load(&self, slot: &str) -> Result<Option<Vec<u8>>>;

    fn exists(&self, slot: &str) -> bool;

    fn delete(&self, slot: &str) -> Result<()>;

    /// List slot names in sorted order.
    fn list_slots(&self) -> Result<Vec<String>> {
        Ok(vec![])
    }
}
