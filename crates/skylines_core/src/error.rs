//! Error types for the core library
//!
//! Only [`Error::FormatIncompatible`] is meant to be caught by ordinary
//! control flow: it is the signal that moves format sniffing on. Everything else
//! is either surfaced to the caller or a programmer error.

use thiserror::Error;

/// The core error type
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A type tag or concrete type has no registry entry
    #[error("Unknown type: {0}")]
    UnknownType(String),

    /// A node's shape or text does not match the type being decoded
    #[error("Incompatible format for {expected}: {reason}")]
    FormatIncompatible { expected: String, reason: String },

    /// Normalizing or dividing a vector by zero
    #[error("Division by zero: {0}")]
    DivisionByZero(&'static str),

    /// The tag is already bound to a different type
    #[error("Type tag '{tag}' is already registered for {existing}")]
    DuplicateTag { tag: String, existing: &'static str },

    /// The type is already bound to a different tag
    #[error("Type {type_name} is already registered as '{tag}'")]
    TypeAlreadyTagged { type_name: &'static str, tag: String },

    /// The tag names a primitive kind (`xsi:int`, ...)
    #[error("Type tag '{0}' is reserved for primitives")]
    ReservedTag(String),

    /// A primitive was encoded without a field name
    #[error("Primitive value needs a field name")]
    UnnamedPrimitive,

    /// The process-wide registry was installed twice
    #[error("Type registry is already installed")]
    RegistryInstalled,

    /// The process-wide registry was read before installation
    #[error("Type registry has not been installed")]
    RegistryNotInstalled,

    /// Document (de)serialization error
    #[error("Document error: {0}")]
    Document(String),
}

impl Error {
    /// Build a [`Error::FormatIncompatible`]
    pub fn incompatible(expected: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::FormatIncompatible {
            expected: expected.into(),
            reason: reason.into(),
        }
    }

    /// Whether this is the recoverable "not this shape" signal
    pub fn is_incompatible(&self) -> bool {
        matches!(self, Self::FormatIncompatible { .. })
    }

    /// Whether this error indicates a bug in the calling code rather than bad input
    pub fn is_programmer_error(&self) -> bool {
        matches!(
            self,
            Self::DuplicateTag { .. }
                | Self::TypeAlreadyTagged { .. }
                | Self::ReservedTag(_)
                | Self::UnnamedPrimitive
                | Self::RegistryInstalled
                | Self::RegistryNotInstalled
        )
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Document(e.to_string())
    }
}

/// Result type alias
pub type Result<T> = core::result::Result<T, Error>;
