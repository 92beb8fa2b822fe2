//! Background workers driven by the runtime.
//!
//! The session worker owns the registry and host state; everything else talks
//! to it through [`Command`]s.
mod clock;
mod session;

pub use clock::SessionClock;
pub use session::{Autosave, Command, SessionWorker};
