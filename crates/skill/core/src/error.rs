//! Common error infrastructure for skill-core.
//!
//! Domain-specific errors live next to the code that raises them
//! (`ActionFailure` in the engine, `DefinitionError` with definitions,
//! `RegistryError` with the registry). This module holds the shared severity
//! classification and the trait every one of them implements.
//!
//! # Design Principles
//!
//! - **Returned, not panicked**: every failure a host can trigger is a value
//! - **Severity Classification**: errors are categorized for recovery strategies
//! - **Stable codes**: `error_code()` strings are safe to log and match on

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: the same request may succeed later (busy, unlucky roll)
/// - **Validation**: the request is wrong and should not be retried unchanged
/// - **Internal**: an invariant was violated; indicates a bug
/// - **Fatal**: the component cannot be used (e.g. malformed definition)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable error - can retry with same or alternative action.
    ///
    /// Examples: already performing an action, random failure roll
    Recoverable,

    /// Validation error - invalid input, should not retry without changes.
    ///
    /// Examples: unknown action id, locked action
    Validation,

    /// Internal error - unexpected state inconsistency.
    Internal,

    /// Fatal error - the affected component cannot be used.
    ///
    /// Examples: skill definition without actions
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all skill-core errors.
///
/// # Implementation Guidelines
///
/// - All error enums should implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait SkillError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Default implementation uses the error type name.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
