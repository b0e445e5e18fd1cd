//! Value to tree encoding
//!
//! The encoder dispatches between primitives, which become named leaves, and
//! [`Serializable`] values, which encode themselves into tagged nodes through
//! this same encoder. Encoding never mutates the value; the only side effect
//! is appending to a parent when one is given.

use core::any::Any;

use crate::error::{Error, Result};
use crate::node::{TreeNode, TYPE_ATTRIBUTE};
use crate::scalar::{PrimitiveKind, Scalar};
use crate::serializable::Serializable;
use crate::type_registry::TypeRegistry;

/// Something the encoder can turn into a node
#[derive(Clone, Copy, Debug)]
pub enum Encodable<'a> {
    Primitive(&'a Scalar),
    Object(&'a dyn Serializable),
}

/// Encoder bound to a type registry
#[derive(Clone, Copy, Debug)]
pub struct Encoder<'r> {
    registry: &'r TypeRegistry,
}

impl<'r> Encoder<'r> {
    pub fn new(registry: &'r TypeRegistry) -> Self {
        Self { registry }
    }

    /// Encoder over the process-wide registry
    pub fn global() -> Result<Encoder<'static>> {
        TypeRegistry::global().map(Encoder::new)
    }

    pub fn registry(&self) -> &'r TypeRegistry {
        self.registry
    }

    /// Encode a value into a detached node
    ///
    /// Primitives require `name`. Objects are named after their type tag
    /// unless `name` overrides it. `hint` forces the declared type of a
    /// primitive leaf and is ignored for objects.
    pub fn encode(
        &self,
        value: Encodable<'_>,
        name: Option<&str>,
        hint: Option<PrimitiveKind>,
    ) -> Result<TreeNode> {
        match value {
            Encodable::Primitive(scalar) => {
                let name = name.ok_or(Error::UnnamedPrimitive)?;
                Ok(self.primitive_node(name, scalar, hint))
            }
            Encodable::Object(object) => {
                let mut node = object.encode_self(self)?;
                if let Some(name) = name {
                    node.set_name(name);
                }
                Ok(node)
            }
        }
    }

    /// Encode a value and append it as the last child of `parent`
    pub fn encode_into<'p>(
        &self,
        value: Encodable<'_>,
        parent: &'p mut TreeNode,
        name: Option<&str>,
        hint: Option<PrimitiveKind>,
    ) -> Result<&'p mut TreeNode> {
        let node = self.encode(value, name, hint)?;
        Ok(parent.add_child(node))
    }

    /// Encode an object into a detached node named after its tag
    pub fn encode_object(&self, value: &dyn Serializable) -> Result<TreeNode> {
        self.encode(Encodable::Object(value), None, None)
    }

    /// Start the node for an object: named and tagged with its registered tag
    pub fn begin<T: Any>(&self, _value: &T) -> Result<TreeNode> {
        let tag = self.registry.tag_of::<T>()?;
        Ok(TreeNode::new(tag).with_attribute(TYPE_ATTRIBUTE, tag))
    }

    /// Append a primitive field
    pub fn field(&self, node: &mut TreeNode, name: &str, value: impl Into<Scalar>) {
        self.field_as(node, name, value, None);
    }

    /// Append a primitive field with a forced declared type
    pub fn field_as(
        &self,
        node: &mut TreeNode,
        name: &str,
        value: impl Into<Scalar>,
        hint: Option<PrimitiveKind>,
    ) {
        let scalar = value.into();
        node.add_child(self.primitive_node(name, &scalar, hint));
    }

    /// Append an object field
    pub fn object_field(
        &self,
        node: &mut TreeNode,
        name: &str,
        value: &dyn Serializable,
    ) -> Result<()> {
        self.encode_into(Encodable::Object(value), node, Some(name), None)?;
        Ok(())
    }

    fn primitive_node(&self, name: &str, scalar: &Scalar, hint: Option<PrimitiveKind>) -> TreeNode {
        let node = TreeNode::leaf(name, scalar.render());
        match hint {
            Some(kind) => node.with_attribute(TYPE_ATTRIBUTE, kind.xsi_name()),
            None => node,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_leaf() {
        let registry = TypeRegistry::new();
        let encoder = Encoder::new(&registry);
        let node = encoder
            .encode(Encodable::Primitive(&Scalar::Bool(true)), Some("invert"), None)
            .unwrap();
        assert_eq!(node.name(), "invert");
        assert_eq!(node.text(), Some("true"));
        assert_eq!(node.type_tag(), None);
    }

    #[test]
    fn test_primitive_needs_name() {
        let registry = TypeRegistry::new();
        let encoder = Encoder::new(&registry);
        let err = encoder
            .encode(Encodable::Primitive(&Scalar::Int(1)), None, None)
            .unwrap_err();
        assert_eq!(err, Error::UnnamedPrimitive);
    }

    #[test]
    fn test_hint_forces_declared_type() {
        let registry = TypeRegistry::new();
        let encoder = Encoder::new(&registry);
        let mut parent = TreeNode::new("NetOptions");
        encoder.field_as(&mut parent, "follow_terrain", "true", Some(PrimitiveKind::String));
        encoder.field(&mut parent, "node_spacing", 100);

        let follow = &parent.children()[0];
        assert_eq!(follow.attribute(TYPE_ATTRIBUTE), Some("xsi:string"));
        assert_eq!(follow.text(), Some("true"));
        assert_eq!(parent.children()[1].text(), Some("100"));
    }

    #[test]
    fn test_encode_into_appends_last() {
        let registry = TypeRegistry::new();
        let encoder = Encoder::new(&registry);
        let mut parent = TreeNode::new("p").with_child(TreeNode::new("first"));
        let appended = encoder
            .encode_into(Encodable::Primitive(&Scalar::Float(2.5)), &mut parent, Some("w"), None)
            .unwrap();
        assert_eq!(appended.text(), Some("2.5"));
        assert_eq!(parent.children().last().map(TreeNode::name), Some("w"));
    }

    #[test]
    fn test_unregistered_object_fails() {
        #[derive(Debug)]
        struct Loose;
        impl Serializable for Loose {
            fn encode_self(&self, encoder: &Encoder<'_>) -> Result<TreeNode> {
                encoder.begin(self)
            }
        }

        let registry = TypeRegistry::new();
        let encoder = Encoder::new(&registry);
        let err = encoder.encode_object(&Loose).unwrap_err();
        assert!(matches!(err, Error::UnknownType(_)));
    }
}
