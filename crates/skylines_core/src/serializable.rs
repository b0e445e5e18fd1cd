//! The serialization capability and dynamically typed decode results

use core::any::Any;
use core::fmt;

use crate::decoder::Decoder;
use crate::encoder::Encoder;
use crate::error::Result;
use crate::node::TreeNode;
use crate::scalar::{Primitive, Scalar};

/// Types that can encode themselves into a tagged [`TreeNode`]
///
/// Implementations start from [`Encoder::begin`], which names and tags the
/// node with the registered type tag, then add one named child per field
/// through the same encoder.
pub trait Serializable: Any + fmt::Debug + Send + Sync {
    fn encode_self(&self, encoder: &Encoder<'_>) -> Result<TreeNode>;
}

/// Types that can be rebuilt from a [`TreeNode`]
///
/// Must not have side effects: a failed attempt leaves nothing behind, so
/// callers may retry the same node as another type.
pub trait Decode: Sized {
    fn decode_from(node: &TreeNode, decoder: &Decoder<'_>) -> Result<Self>;
}

/// Object-safe view over any registered value
pub trait DynObject: Serializable {
    fn as_any(&self) -> &dyn Any;

    fn as_serializable(&self) -> &dyn Serializable;

    fn clone_object(&self) -> Box<dyn DynObject>;

    fn eq_object(&self, other: &dyn DynObject) -> bool;
}

impl<T: Serializable + Clone + PartialEq> DynObject for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_serializable(&self) -> &dyn Serializable {
        self
    }

    fn clone_object(&self) -> Box<dyn DynObject> {
        Box::new(self.clone())
    }

    fn eq_object(&self, other: &dyn DynObject) -> bool {
        other.as_any().downcast_ref::<T>().is_some_and(|o| o == self)
    }
}

impl dyn DynObject {
    /// Downcast to a concrete type
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.as_any().downcast_ref()
    }

    pub fn is<T: 'static>(&self) -> bool {
        self.as_any().is::<T>()
    }
}

impl PartialEq for dyn DynObject {
    fn eq(&self, other: &Self) -> bool {
        self.eq_object(other)
    }
}

impl Clone for Box<dyn DynObject> {
    fn clone(&self) -> Self {
        self.clone_object()
    }
}

/// Result of a generic decode
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// A primitive leaf
    Scalar(Scalar),
    /// A registered object
    Object(Box<dyn DynObject>),
}

impl Value {
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Self::Scalar(s) => Some(s),
            Self::Object(_) => None,
        }
    }

    pub fn as_object(&self) -> Option<&dyn DynObject> {
        match self {
            Self::Object(o) => Some(o.as_ref()),
            Self::Scalar(_) => None,
        }
    }

    /// Borrow the object as a concrete type
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.as_object()?.downcast_ref()
    }

    /// Convert a scalar into a Rust primitive
    pub fn to_primitive<P: Primitive>(&self) -> Option<P> {
        P::from_scalar(self.as_scalar()?.clone())
    }
}

impl From<Scalar> for Value {
    fn from(v: Scalar) -> Self {
        Self::Scalar(v)
    }
}

impl From<Box<dyn DynObject>> for Value {
    fn from(v: Box<dyn DynObject>) -> Self {
        Self::Object(v)
    }
}
