//! Primitive leaf values and their textual rendering

use core::fmt;

use crate::error::{Error, Result};

/// Primitive kinds a leaf can be rendered or parsed as
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Bool,
    Int,
    Float,
    String,
}

impl PrimitiveKind {
    /// Declared type name written into `xsi:type` when a hint is forced
    pub const fn xsi_name(self) -> &'static str {
        match self {
            Self::Bool => "xsi:boolean",
            Self::Int => "xsi:int",
            Self::Float => "xsi:double",
            Self::String => "xsi:string",
        }
    }

    pub fn from_xsi_name(name: &str) -> Option<Self> {
        match name {
            "xsi:boolean" => Some(Self::Bool),
            "xsi:int" => Some(Self::Int),
            "xsi:double" => Some(Self::Float),
            "xsi:string" => Some(Self::String),
            _ => None,
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => write!(f, "bool"),
            Self::Int => write!(f, "int"),
            Self::Float => write!(f, "float"),
            Self::String => write!(f, "string"),
        }
    }
}

/// A primitive value
#[derive(Clone, Debug, PartialEq)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl Scalar {
    pub fn kind(&self) -> PrimitiveKind {
        match self {
            Self::Bool(_) => PrimitiveKind::Bool,
            Self::Int(_) => PrimitiveKind::Int,
            Self::Float(_) => PrimitiveKind::Float,
            Self::String(_) => PrimitiveKind::String,
        }
    }

    /// Text content of a leaf holding this value
    pub fn render(&self) -> String {
        match self {
            Self::Bool(true) => "true".into(),
            Self::Bool(false) => "false".into(),
            Self::Int(v) => v.to_string(),
            Self::Float(v) => v.to_string(),
            Self::String(v) => v.clone(),
        }
    }

    /// Parse leaf text as the given kind
    pub fn parse(text: &str, kind: PrimitiveKind) -> Result<Self> {
        let trimmed = text.trim();
        let parsed = match kind {
            PrimitiveKind::Bool => match trimmed.to_ascii_lowercase().as_str() {
                "true" => Some(Self::Bool(true)),
                "false" => Some(Self::Bool(false)),
                _ => None,
            },
            PrimitiveKind::Int => trimmed.parse().ok().map(Self::Int),
            PrimitiveKind::Float => trimmed.parse().ok().map(Self::Float),
            PrimitiveKind::String => Some(Self::String(text.to_owned())),
        };
        parsed.ok_or_else(|| Error::incompatible(kind.to_string(), format!("cannot parse '{text}'")))
    }

    /// Guess the kind of untyped leaf text: bool, then int, then float, then string
    pub fn infer(text: &str) -> Self {
        [PrimitiveKind::Bool, PrimitiveKind::Int, PrimitiveKind::Float]
            .into_iter()
            .find_map(|kind| Self::parse(text, kind).ok())
            .unwrap_or_else(|| Self::String(text.to_owned()))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Integers widen to floats
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            Self::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl From<bool> for Scalar {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for Scalar {
    fn from(v: i32) -> Self {
        Self::Int(v as i64)
    }
}

impl From<u32> for Scalar {
    fn from(v: u32) -> Self {
        Self::Int(v as i64)
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<String> for Scalar {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Self::String(v.to_owned())
    }
}

impl From<&String> for Scalar {
    fn from(v: &String) -> Self {
        Self::String(v.clone())
    }
}

/// Rust types that map onto a primitive kind
pub trait Primitive: Sized {
    const KIND: PrimitiveKind;

    fn from_scalar(scalar: Scalar) -> Option<Self>;
}

impl Primitive for bool {
    const KIND: PrimitiveKind = PrimitiveKind::Bool;
    fn from_scalar(scalar: Scalar) -> Option<Self> {
        scalar.as_bool()
    }
}

impl Primitive for i64 {
    const KIND: PrimitiveKind = PrimitiveKind::Int;
    fn from_scalar(scalar: Scalar) -> Option<Self> {
        scalar.as_int()
    }
}

impl Primitive for i32 {
    const KIND: PrimitiveKind = PrimitiveKind::Int;
    fn from_scalar(scalar: Scalar) -> Option<Self> {
        scalar.as_int().and_then(|v| i32::try_from(v).ok())
    }
}

impl Primitive for u32 {
    const KIND: PrimitiveKind = PrimitiveKind::Int;
    fn from_scalar(scalar: Scalar) -> Option<Self> {
        scalar.as_int().and_then(|v| u32::try_from(v).ok())
    }
}

impl Primitive for f64 {
    const KIND: PrimitiveKind = PrimitiveKind::Float;
    fn from_scalar(scalar: Scalar) -> Option<Self> {
        scalar.as_float()
    }
}

impl Primitive for String {
    const KIND: PrimitiveKind = PrimitiveKind::String;
    fn from_scalar(scalar: Scalar) -> Option<Self> {
        match scalar {
            Scalar::String(v) => Some(v),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render() {
        assert_eq!(Scalar::Bool(true).render(), "true");
        assert_eq!(Scalar::Int(-7).render(), "-7");
        assert_eq!(Scalar::Float(3.0).render(), "3");
        assert_eq!(Scalar::Float(0.25).render(), "0.25");
        assert_eq!(Scalar::from("Basic Road").render(), "Basic Road");
    }

    #[test]
    fn test_parse_rejects_bad_text() {
        let err = Scalar::parse("abc", PrimitiveKind::Int).unwrap_err();
        assert!(err.is_incompatible());
        assert!(Scalar::parse("yes", PrimitiveKind::Bool).is_err());
        assert_eq!(Scalar::parse("False", PrimitiveKind::Bool).unwrap(), Scalar::Bool(false));
        assert_eq!(Scalar::parse(" 12 ", PrimitiveKind::Int).unwrap(), Scalar::Int(12));
    }

    #[test]
    fn test_string_keeps_whitespace() {
        assert_eq!(
            Scalar::parse(" a ", PrimitiveKind::String).unwrap(),
            Scalar::String(" a ".into())
        );
    }

    #[test]
    fn test_infer() {
        assert_eq!(Scalar::infer("true"), Scalar::Bool(true));
        assert_eq!(Scalar::infer("100"), Scalar::Int(100));
        assert_eq!(Scalar::infer("1.5"), Scalar::Float(1.5));
        assert_eq!(Scalar::infer("elevated"), Scalar::String("elevated".into()));
    }

    #[test]
    fn test_xsi_names() {
        for kind in [PrimitiveKind::Bool, PrimitiveKind::Int, PrimitiveKind::Float, PrimitiveKind::String] {
            assert_eq!(PrimitiveKind::from_xsi_name(kind.xsi_name()), Some(kind));
        }
        assert_eq!(PrimitiveKind::from_xsi_name("Vector"), None);
    }

    #[test]
    fn test_primitive_ranges() {
        assert_eq!(u32::from_scalar(Scalar::Int(-1)), None);
        assert_eq!(i32::from_scalar(Scalar::Int(5)), Some(5));
        assert_eq!(f64::from_scalar(Scalar::Int(3)), Some(3.0));
    }
}
