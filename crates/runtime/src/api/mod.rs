//! Public runtime API surface.
//!
//! Exposes the handle, the event stream, and error types consumers interact with.
mod errors;
mod events;
mod handle;

pub use errors::{Result, RuntimeError};
pub use events::{RuntimeEvent, SkillSummary};
pub use handle::RuntimeHandle;
