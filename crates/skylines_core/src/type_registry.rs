//! Type registry mapping type tags to decoders
//!
//! The registry is a bijection between string type tags (the `xsi:type`
//! discriminator of the external format) and concrete Rust types. It is
//! built once during startup and only read afterwards; the process-wide
//! instance is guarded by a one-time-init cell.

use core::any::{type_name, TypeId};
use core::fmt;
use std::collections::HashMap;
use std::sync::OnceLock;

use indexmap::IndexMap;

use crate::decoder::Decoder;
use crate::error::{Error, Result};
use crate::node::TreeNode;
use crate::scalar::PrimitiveKind;
use crate::serializable::{Decode, DynObject};

/// Rebuilds a boxed value from a node
pub type DecodeFn = fn(&TreeNode, &Decoder<'_>) -> Result<Box<dyn DynObject>>;

static GLOBAL: OnceLock<TypeRegistry> = OnceLock::new();

/// Registry entry for one concrete type
#[derive(Clone)]
pub struct TypeDescriptor {
    tag: String,
    type_id: TypeId,
    type_name: &'static str,
    decode: DecodeFn,
}

impl TypeDescriptor {
    /// Descriptor for a concrete type under the given tag
    pub fn of<T>(tag: impl Into<String>) -> Self
    where
        T: DynObject + Decode + Clone + PartialEq,
    {
        Self {
            tag: tag.into(),
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
            decode: decode_boxed::<T>,
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Run this type's decoder against a node
    pub fn decode(&self, node: &TreeNode, decoder: &Decoder<'_>) -> Result<Box<dyn DynObject>> {
        (self.decode)(node, decoder)
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("tag", &self.tag)
            .field("type_name", &self.type_name)
            .finish()
    }
}

fn decode_boxed<T>(node: &TreeNode, decoder: &Decoder<'_>) -> Result<Box<dyn DynObject>>
where
    T: DynObject + Decode + Clone + PartialEq,
{
    T::decode_from(node, decoder).map(|value| Box::new(value) as Box<dyn DynObject>)
}

/// Ordered table of registered types
#[derive(Default)]
pub struct TypeRegistry {
    /// Registration order is preserved
    by_tag: IndexMap<String, TypeDescriptor>,
    by_id: HashMap<TypeId, String>,
}

impl TypeRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a type under a tag
    ///
    /// Registering the same type under the same tag again is a no-op.
    pub fn register<T>(&mut self, tag: impl Into<String>) -> Result<&mut Self>
    where
        T: DynObject + Decode + Clone + PartialEq,
    {
        self.register_descriptor(TypeDescriptor::of::<T>(tag))
    }

    /// Register a prepared descriptor
    ///
    /// Primitive `xsi:` names are rejected so leaf hints never collide with
    /// object tags.
    pub fn register_descriptor(&mut self, descriptor: TypeDescriptor) -> Result<&mut Self> {
        if PrimitiveKind::from_xsi_name(&descriptor.tag).is_some() {
            return Err(Error::ReservedTag(descriptor.tag));
        }
        if let Some(existing) = self.by_tag.get(&descriptor.tag) {
            if existing.type_id == descriptor.type_id {
                return Ok(self);
            }
            return Err(Error::DuplicateTag {
                tag: descriptor.tag,
                existing: existing.type_name,
            });
        }
        if let Some(tag) = self.by_id.get(&descriptor.type_id) {
            return Err(Error::TypeAlreadyTagged {
                type_name: descriptor.type_name,
                tag: tag.clone(),
            });
        }

        self.by_id.insert(descriptor.type_id, descriptor.tag.clone());
        self.by_tag.insert(descriptor.tag.clone(), descriptor);
        Ok(self)
    }

    /// Look a type up by its tag
    pub fn resolve_by_tag(&self, tag: &str) -> Result<&TypeDescriptor> {
        self.by_tag
            .get(tag)
            .ok_or_else(|| Error::UnknownType(tag.to_owned()))
    }

    /// Tag of a registered type
    pub fn tag_for_type(&self, type_id: TypeId) -> Result<&str> {
        self.by_id
            .get(&type_id)
            .map(String::as_str)
            .ok_or_else(|| Error::UnknownType(format!("{type_id:?}")))
    }

    /// Tag of a registered type, by type parameter
    pub fn tag_of<T: 'static>(&self) -> Result<&str> {
        self.by_id
            .get(&TypeId::of::<T>())
            .map(String::as_str)
            .ok_or_else(|| Error::UnknownType(type_name::<T>().to_owned()))
    }

    /// Check if a tag is registered
    pub fn contains_tag(&self, tag: &str) -> bool {
        self.by_tag.contains_key(tag)
    }

    /// Iterate over descriptors in registration order
    pub fn iter(&self) -> impl Iterator<Item = &TypeDescriptor> {
        self.by_tag.values()
    }

    pub fn len(&self) -> usize {
        self.by_tag.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_tag.is_empty()
    }

    /// Install this registry as the process-wide instance
    ///
    /// Fails with [`Error::RegistryInstalled`] if one is already installed;
    /// the installed instance is never replaced.
    pub fn install(self) -> Result<&'static TypeRegistry> {
        let mut pending = Some(self);
        let installed = GLOBAL.get_or_init(|| pending.take().unwrap_or_default());
        match pending {
            None => Ok(installed),
            Some(_) => Err(Error::RegistryInstalled),
        }
    }

    /// The process-wide registry
    pub fn global() -> Result<&'static TypeRegistry> {
        GLOBAL.get().ok_or(Error::RegistryNotInstalled)
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("tags", &self.by_tag.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::Encoder;

    #[derive(Clone, Debug, Default, PartialEq)]
    struct Marker;

    impl crate::Serializable for Marker {
        fn encode_self(&self, encoder: &Encoder<'_>) -> Result<TreeNode> {
            encoder.begin(self)
        }
    }

    impl Decode for Marker {
        fn decode_from(node: &TreeNode, decoder: &Decoder<'_>) -> Result<Self> {
            decoder.fields(node, "Marker").finish()?;
            Ok(Marker)
        }
    }

    #[derive(Clone, Debug, Default, PartialEq)]
    struct Other;

    impl crate::Serializable for Other {
        fn encode_self(&self, encoder: &Encoder<'_>) -> Result<TreeNode> {
            encoder.begin(self)
        }
    }

    impl Decode for Other {
        fn decode_from(_node: &TreeNode, _decoder: &Decoder<'_>) -> Result<Self> {
            Ok(Other)
        }
    }

    #[test]
    fn test_type_registry() {
        let mut registry = TypeRegistry::new();
        registry.register::<Marker>("Marker").unwrap();

        assert!(registry.contains_tag("Marker"));
        assert_eq!(registry.tag_of::<Marker>().unwrap(), "Marker");
        assert_eq!(registry.tag_for_type(TypeId::of::<Marker>()).unwrap(), "Marker");
        assert!(registry.resolve_by_tag("Marker").unwrap().type_name().contains("Marker"));
    }

    #[test]
    fn test_reregistration_is_idempotent() {
        let mut registry = TypeRegistry::new();
        registry.register::<Marker>("Marker").unwrap();
        registry.register::<Marker>("Marker").unwrap();
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_tag_clash_is_rejected() {
        let mut registry = TypeRegistry::new();
        registry.register::<Marker>("Marker").unwrap();

        let err = registry.register::<Other>("Marker").unwrap_err();
        assert!(matches!(err, Error::DuplicateTag { .. }));

        let err = registry.register::<Marker>("Renamed").unwrap_err();
        assert!(matches!(err, Error::TypeAlreadyTagged { .. }));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_primitive_names_are_reserved() {
        let mut registry = TypeRegistry::new();
        let err = registry.register::<Marker>("xsi:int").unwrap_err();
        assert_eq!(err, Error::ReservedTag("xsi:int".into()));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_unknown_lookups() {
        let registry = TypeRegistry::new();
        assert!(matches!(registry.resolve_by_tag("Nope"), Err(Error::UnknownType(_))));
        assert!(matches!(registry.tag_of::<Marker>(), Err(Error::UnknownType(_))));
    }

    #[test]
    fn test_registration_order() {
        let mut registry = TypeRegistry::new();
        registry
            .register::<Other>("Other")
            .unwrap()
            .register::<Marker>("Marker")
            .unwrap();
        let tags: Vec<_> = registry.iter().map(TypeDescriptor::tag).collect();
        assert_eq!(tags, ["Other", "Marker"]);
    }
}
