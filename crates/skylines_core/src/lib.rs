//! # skylines_core - Tree serialization core
//!
//! Polymorphic (de)serialization between Rust values and a schema-free tree
//! compatible with the game's XML save/import format:
//! - **TreeNode**: named node with ordered attributes and children
//! - **TypeRegistry**: bijective table of type tags and decoders
//! - **Encoder / Decoder**: generic drivers over primitives and [`Serializable`] values
//!
//! This crate performs no I/O and emits no log lines; failures are returned
//! as [`Error`] values for the caller to handle.
//!
//! ## Format sniffing
//! [`Error::FormatIncompatible`] is recoverable. Decoding never mutates the
//! node, so callers may try several candidate types against the same node
//! (see [`Decoder::sniff`]).

pub mod decoder;
pub mod document;
pub mod encoder;
pub mod error;
pub mod node;
pub mod scalar;
pub mod serializable;
pub mod type_registry;

pub use decoder::{Decoder, Fields, TypeHint};
pub use document::{from_json, to_json, to_xml_string, XmlOptions};
pub use encoder::{Encodable, Encoder};
pub use error::{Error, Result};
pub use node::{NodeRef, TreeNode, TYPE_ATTRIBUTE};
pub use scalar::{Primitive, PrimitiveKind, Scalar};
pub use serializable::{Decode, DynObject, Serializable, Value};
pub use type_registry::{TypeDescriptor, TypeRegistry};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::decoder::{Decoder, TypeHint};
    pub use crate::encoder::{Encodable, Encoder};
    pub use crate::error::{Error, Result};
    pub use crate::node::TreeNode;
    pub use crate::scalar::{PrimitiveKind, Scalar};
    pub use crate::serializable::{Decode, DynObject, Serializable, Value};
    pub use crate::type_registry::TypeRegistry;
}
