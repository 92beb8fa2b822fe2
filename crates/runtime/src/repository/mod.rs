//! Repository layer for save slots.
//!
//! Repositories store opaque save blobs produced by the
//! [`SaveCodec`](crate::codec::SaveCodec). Skill definitions and content are
//! static and loaded by `skill-content`, not stored here.

mod error;
mod memory;
mod traits;

pub use error::RepositoryError;
pub use memory::InMemorySaveRepository;
pub use traits::SaveRepository;
