//! Tree to value decoding
//!
//! Decoding only ever reads the node, so a failed attempt can be retried
//! against the same node as a different type. [`Error::FormatIncompatible`]
//! means "not this shape"; [`Decoder::sniff`] builds on that to try several
//! candidate types in order.

use core::any::{type_name, TypeId};
use core::fmt;

use indexmap::IndexMap;

use crate::error::{Error, Result};
use crate::node::{TreeNode, TYPE_ATTRIBUTE};
use crate::scalar::{Primitive, PrimitiveKind, Scalar};
use crate::serializable::{Decode, DynObject, Value};
use crate::type_registry::TypeRegistry;

/// What to decode a node as, overriding what the node says about itself
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TypeHint<'a> {
    Primitive(PrimitiveKind),
    /// A registered type tag
    Tag(&'a str),
}

impl fmt::Display for TypeHint<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(kind) => write!(f, "{kind}"),
            Self::Tag(tag) => f.write_str(tag),
        }
    }
}

/// Decoder bound to a type registry
#[derive(Clone, Copy, Debug)]
pub struct Decoder<'r> {
    registry: &'r TypeRegistry,
}

impl<'r> Decoder<'r> {
    pub fn new(registry: &'r TypeRegistry) -> Self {
        Self { registry }
    }

    /// Decoder over the process-wide registry
    pub fn global() -> Result<Decoder<'static>> {
        TypeRegistry::global().map(Decoder::new)
    }

    pub fn registry(&self) -> &'r TypeRegistry {
        self.registry
    }

    /// Decode a node into a dynamically typed value
    ///
    /// With a primitive hint the node's text is parsed as that kind. With a
    /// tag hint the hinted type's decoder runs regardless of the node's own
    /// tag. Otherwise containers are resolved through their `xsi:type`
    /// attribute and leaves are parsed from their text. A container whose
    /// `xsi:type` names a primitive kind is a hinted leaf and decodes as one.
    pub fn decode(&self, node: &TreeNode, is_container: bool, hint: Option<TypeHint<'_>>) -> Result<Value> {
        match hint {
            Some(TypeHint::Primitive(kind)) => self.decode_scalar(node, kind).map(Value::Scalar),
            Some(TypeHint::Tag(tag)) => self.decode_tagged(node, tag).map(Value::Object),
            None if is_container && primitive_tag(node).is_none() => self.decode_object(node).map(Value::Object),
            None => self.decode_leaf(node).map(Value::Scalar),
        }
    }

    /// Decode a container node through the tag it carries
    pub fn decode_object(&self, node: &TreeNode) -> Result<Box<dyn DynObject>> {
        let tag = node.type_tag().ok_or_else(|| {
            Error::incompatible("tagged object", format!("node '{}' has no {TYPE_ATTRIBUTE}", node.name()))
        })?;
        if let Some(kind) = primitive_tag(node) {
            return Err(Error::incompatible(
                "tagged object",
                format!("node '{}' is a {kind} leaf", node.name()),
            ));
        }
        self.decode_tagged(node, tag)
    }

    /// Decode a node as the registered type behind `tag`
    pub fn decode_tagged(&self, node: &TreeNode, tag: &str) -> Result<Box<dyn DynObject>> {
        self.registry.resolve_by_tag(tag)?.decode(node, self)
    }

    /// Decode a node as a concrete type
    pub fn decode_as<T: Decode>(&self, node: &TreeNode) -> Result<T> {
        T::decode_from(node, self)
    }

    /// Decode a node as `T`, first checking the tag it carries, if any
    ///
    /// A tag registered for another type, or naming a primitive kind, is
    /// [`Error::FormatIncompatible`]; an unregistered tag is
    /// [`Error::UnknownType`]. Untagged nodes decode as `T` directly.
    pub fn decode_checked<T: Decode + 'static>(&self, node: &TreeNode) -> Result<T> {
        if let Some(tag) = node.type_tag() {
            if let Some(kind) = primitive_tag(node) {
                return Err(Error::incompatible(
                    type_name::<T>(),
                    format!("node '{}' is a {kind} leaf", node.name()),
                ));
            }
            let descriptor = self.registry.resolve_by_tag(tag)?;
            if descriptor.type_id() != TypeId::of::<T>() {
                return Err(Error::incompatible(
                    type_name::<T>(),
                    format!("node '{}' is tagged '{tag}'", node.name()),
                ));
            }
        }
        T::decode_from(node, self)
    }

    /// Decode a leaf as a Rust primitive
    pub fn decode_primitive<P: Primitive>(&self, node: &TreeNode) -> Result<P> {
        let scalar = self.decode_scalar(node, P::KIND)?;
        let rendered = scalar.render();
        P::from_scalar(scalar)
            .ok_or_else(|| Error::incompatible(P::KIND.to_string(), format!("'{rendered}' is out of range")))
    }

    /// Parse a leaf's text as the given kind
    pub fn decode_scalar(&self, node: &TreeNode, kind: PrimitiveKind) -> Result<Scalar> {
        if !node.is_leaf() {
            return Err(Error::incompatible(
                kind.to_string(),
                format!("node '{}' has children", node.name()),
            ));
        }
        Scalar::parse(node.text().unwrap_or_default(), kind)
    }

    /// Parse a leaf using its declared `xsi:type`, or infer the kind
    pub fn decode_leaf(&self, node: &TreeNode) -> Result<Scalar> {
        match node.type_tag().and_then(PrimitiveKind::from_xsi_name) {
            Some(kind) => self.decode_scalar(node, kind),
            None if node.is_leaf() => Ok(Scalar::infer(node.text().unwrap_or_default())),
            None => Err(Error::incompatible(
                "primitive",
                format!("node '{}' has children", node.name()),
            )),
        }
    }

    /// Try each candidate in order until one fits
    ///
    /// Only [`Error::FormatIncompatible`] moves on to the next candidate; any
    /// other error is returned immediately.
    pub fn sniff(&self, node: &TreeNode, candidates: &[TypeHint<'_>]) -> Result<Value> {
        for candidate in candidates {
            match self.decode(node, true, Some(*candidate)) {
                Err(err) if err.is_incompatible() => continue,
                other => return other,
            }
        }
        let tried: Vec<String> = candidates.iter().map(ToString::to_string).collect();
        Err(Error::incompatible(
            format!("any of [{}]", tried.join(", ")),
            format!("node '{}' matched no candidate", node.name()),
        ))
    }

    /// Collect a node's children into a keyword map
    pub fn fields<'a>(&'a self, node: &'a TreeNode, type_name: &'static str) -> Fields<'a> {
        let entries = node
            .children()
            .iter()
            .map(|child| (child.name(), child))
            .collect();
        Fields {
            decoder: self,
            type_name,
            entries,
        }
    }
}

/// Primitive kind named by a node's `xsi:type`, if any
fn primitive_tag(node: &TreeNode) -> Option<PrimitiveKind> {
    node.type_tag().and_then(PrimitiveKind::from_xsi_name)
}

/// Children of a node keyed by name, consumed field by field
///
/// A later child with a duplicate name replaces the earlier one.
#[derive(Debug)]
pub struct Fields<'a> {
    decoder: &'a Decoder<'a>,
    type_name: &'static str,
    entries: IndexMap<&'a str, &'a TreeNode>,
}

impl<'a> Fields<'a> {
    /// Remaining field names in document order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Required primitive field
    pub fn primitive<P: Primitive>(&mut self, name: &str) -> Result<P> {
        let node = self.take(name)?;
        self.decoder.decode_primitive(node).map_err(|e| self.wrap(name, e))
    }

    /// Primitive field falling back to `default` when absent
    pub fn primitive_or<P: Primitive>(&mut self, name: &str, default: P) -> Result<P> {
        if self.contains(name) {
            self.primitive(name)
        } else {
            Ok(default)
        }
    }

    /// Required object field; a tagged child must carry `T`'s tag
    pub fn object<T: Decode + 'static>(&mut self, name: &str) -> Result<T> {
        let node = self.take(name)?;
        self.decoder.decode_checked(node).map_err(|e| self.wrap(name, e))
    }

    /// Object field falling back to `default` when absent
    pub fn object_or<T: Decode + 'static>(&mut self, name: &str, default: T) -> Result<T> {
        if self.contains(name) {
            self.object(name)
        } else {
            Ok(default)
        }
    }

    /// Reject any field that was not consumed
    pub fn finish(self) -> Result<()> {
        match self.entries.keys().next() {
            Some(extra) => Err(Error::incompatible(
                self.type_name,
                format!("unexpected field '{extra}'"),
            )),
            None => Ok(()),
        }
    }

    fn take(&mut self, name: &str) -> Result<&'a TreeNode> {
        self.entries
            .shift_remove(name)
            .ok_or_else(|| Error::incompatible(self.type_name, format!("missing field '{name}'")))
    }

    fn wrap(&self, name: &str, err: Error) -> Error {
        match err {
            Error::FormatIncompatible { reason, .. } => {
                Error::incompatible(self.type_name, format!("field '{name}': {reason}"))
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf_parent() -> TreeNode {
        TreeNode::new("cell")
            .with_child(TreeNode::leaf("ore", "5"))
            .with_child(TreeNode::leaf("oil", "x"))
            .with_child(TreeNode::leaf("flag", "true").with_attribute(TYPE_ATTRIBUTE, "xsi:string"))
    }

    #[test]
    fn test_primitive_hint_parses_text() {
        let registry = TypeRegistry::new();
        let decoder = Decoder::new(&registry);
        let node = TreeNode::leaf("n", "42");
        let value = decoder
            .decode(&node, false, Some(TypeHint::Primitive(PrimitiveKind::Int)))
            .unwrap();
        assert_eq!(value, Value::Scalar(Scalar::Int(42)));
        assert_eq!(value.to_primitive::<i64>(), Some(42));
    }

    #[test]
    fn test_bad_text_is_incompatible() {
        let registry = TypeRegistry::new();
        let decoder = Decoder::new(&registry);
        let err = decoder
            .decode(&TreeNode::leaf("n", "forty"), false, Some(TypeHint::Primitive(PrimitiveKind::Int)))
            .unwrap_err();
        assert!(err.is_incompatible());
    }

    #[test]
    fn test_leaf_honours_declared_type() {
        let registry = TypeRegistry::new();
        let decoder = Decoder::new(&registry);
        let parent = leaf_parent();
        let flag = parent.child("flag").unwrap();
        assert_eq!(decoder.decode(flag, false, None).unwrap(), Value::Scalar(Scalar::String("true".into())));
        let ore = parent.child("ore").unwrap();
        assert_eq!(decoder.decode(ore, false, None).unwrap(), Value::Scalar(Scalar::Int(5)));
    }

    #[test]
    fn test_untagged_container_is_incompatible() {
        let registry = TypeRegistry::new();
        let decoder = Decoder::new(&registry);
        let err = decoder.decode(&leaf_parent(), true, None).unwrap_err();
        assert!(err.is_incompatible());
    }

    #[test]
    fn test_hinted_leaf_decodes_as_container() {
        let registry = TypeRegistry::new();
        let decoder = Decoder::new(&registry);
        let node = TreeNode::leaf("lanes", "12").with_attribute(TYPE_ATTRIBUTE, "xsi:int");

        let value = decoder.decode(&node, true, None).unwrap();
        assert_eq!(value, Value::Scalar(Scalar::Int(12)));

        let err = decoder.decode_object(&node).unwrap_err();
        assert!(err.is_incompatible());
    }

    #[derive(Debug, PartialEq)]
    struct Empty;

    impl Decode for Empty {
        fn decode_from(node: &TreeNode, decoder: &Decoder<'_>) -> Result<Self> {
            decoder.fields(node, "Empty").finish()?;
            Ok(Empty)
        }
    }

    #[test]
    fn test_checked_tags() {
        let registry = TypeRegistry::new();
        let decoder = Decoder::new(&registry);

        assert_eq!(decoder.decode_checked::<Empty>(&TreeNode::new("e")), Ok(Empty));

        let leaf = TreeNode::new("e").with_attribute(TYPE_ATTRIBUTE, "xsi:boolean");
        assert!(decoder.decode_checked::<Empty>(&leaf).unwrap_err().is_incompatible());

        let unknown = TreeNode::new("e").with_attribute(TYPE_ATTRIBUTE, "Building");
        assert_eq!(
            decoder.decode_checked::<Empty>(&unknown),
            Err(Error::UnknownType("Building".into()))
        );
    }

    #[test]
    fn test_unknown_tag() {
        let registry = TypeRegistry::new();
        let decoder = Decoder::new(&registry);
        let node = TreeNode::new("Building").with_attribute(TYPE_ATTRIBUTE, "Building");
        let err = decoder.decode(&node, true, None).unwrap_err();
        assert_eq!(err, Error::UnknownType("Building".into()));
    }

    #[test]
    fn test_fields_consume_by_name() {
        let registry = TypeRegistry::new();
        let decoder = Decoder::new(&registry);
        let node = leaf_parent();
        let mut fields = decoder.fields(&node, "Cell");

        assert_eq!(fields.names().collect::<Vec<_>>(), ["ore", "oil", "flag"]);
        assert_eq!(fields.primitive::<u32>("ore").unwrap(), 5);
        assert_eq!(fields.primitive_or::<u32>("water", 7).unwrap(), 7);
        assert!(fields.primitive::<u32>("oil").unwrap_err().is_incompatible());

        let err = fields.finish().unwrap_err();
        assert_eq!(err, Error::incompatible("Cell", "unexpected field 'flag'"));
    }

    #[test]
    fn test_missing_field() {
        let registry = TypeRegistry::new();
        let decoder = Decoder::new(&registry);
        let node = TreeNode::new("empty");
        let mut fields = decoder.fields(&node, "Thing");
        let err = fields.primitive::<String>("name").unwrap_err();
        assert_eq!(err, Error::incompatible("Thing", "missing field 'name'"));
    }

    #[test]
    fn test_duplicate_names_keep_last() {
        let registry = TypeRegistry::new();
        let decoder = Decoder::new(&registry);
        let node = TreeNode::new("n")
            .with_child(TreeNode::leaf("x", "1"))
            .with_child(TreeNode::leaf("x", "2"));
        let mut fields = decoder.fields(&node, "N");
        assert_eq!(fields.primitive::<i64>("x").unwrap(), 2);
        fields.finish().unwrap();
    }

    #[test]
    fn test_sniff_exhausted() {
        let registry = TypeRegistry::new();
        let decoder = Decoder::new(&registry);
        let node = TreeNode::leaf("n", "abc");
        let err = decoder
            .sniff(
                &node,
                &[TypeHint::Primitive(PrimitiveKind::Int), TypeHint::Primitive(PrimitiveKind::Float)],
            )
            .unwrap_err();
        assert!(err.is_incompatible());

        let value = decoder
            .sniff(
                &node,
                &[TypeHint::Primitive(PrimitiveKind::Int), TypeHint::Primitive(PrimitiveKind::String)],
            )
            .unwrap();
        assert_eq!(value, Value::Scalar(Scalar::String("abc".into())));
    }

    #[test]
    fn test_sniff_stops_on_unknown_type() {
        let registry = TypeRegistry::new();
        let decoder = Decoder::new(&registry);
        let node = TreeNode::leaf("n", "1");
        let err = decoder
            .sniff(&node, &[TypeHint::Tag("Missing"), TypeHint::Primitive(PrimitiveKind::Int)])
            .unwrap_err();
        assert_eq!(err, Error::UnknownType("Missing".into()));
    }
}
