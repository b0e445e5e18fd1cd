//! 3D vector with an optional height
//!
//! A [`Vector3`] whose height is undefined lives in the XZ plane: its stored
//! `y` is kept but every getter, computation, comparison and hash treats it
//! as 0.

use core::f64::consts::{PI, TAU};
use core::fmt;
use core::hash::{Hash, Hasher};
use core::ops::{Add, Div, Mul, Sub};
use std::collections::hash_map::DefaultHasher;

use skylines_core::{Decode, Decoder, Encoder, Error, Result, Serializable, TreeNode};

use crate::clamp01;

/// 3D vector; `y` is the height
#[derive(Clone, Copy, Debug)]
pub struct Vector3 {
    x: f64,
    y: f64,
    z: f64,
    height_defined: bool,
}

impl Vector3 {
    /// Type tag in the game's format
    pub const TYPE_TAG: &'static str = "Vector";

    /// Zero vector with defined height
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// Create a vector with defined height
    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self::from_parts(x, y, z, true)
    }

    /// Create a planar vector with undefined height
    #[inline]
    pub const fn vector_xz(x: f64, z: f64) -> Self {
        Self::from_parts(x, 0.0, z, false)
    }

    #[inline]
    pub const fn from_parts(x: f64, y: f64, z: f64, height_defined: bool) -> Self {
        Self {
            x,
            y,
            z,
            height_defined,
        }
    }

    #[inline]
    pub fn x(&self) -> f64 {
        self.x
    }

    /// Height, or 0 when undefined
    #[inline]
    pub fn y(&self) -> f64 {
        if self.height_defined {
            self.y
        } else {
            0.0
        }
    }

    #[inline]
    pub fn z(&self) -> f64 {
        self.z
    }

    #[inline]
    pub fn is_height_defined(&self) -> bool {
        self.height_defined
    }

    pub fn set_x(&mut self, x: f64) {
        self.x = x;
    }

    /// Stores `y`; it stays masked while the height is undefined
    pub fn set_y(&mut self, y: f64) {
        self.y = y;
    }

    pub fn set_z(&mut self, z: f64) {
        self.z = z;
    }

    pub fn set_height_defined(&mut self, height_defined: bool) {
        self.height_defined = height_defined;
    }

    /// A vector is its own position
    #[inline]
    pub fn position(&self) -> Self {
        *self
    }

    /// Component-wise sum; height is defined only if both are
    #[inline]
    pub fn add(self, o: Self) -> Self {
        Self::from_parts(
            self.x + o.x,
            self.y() + o.y(),
            self.z + o.z,
            self.height_defined && o.height_defined,
        )
    }

    /// Component-wise difference; height is defined only if both are
    #[inline]
    pub fn subtract(self, o: Self) -> Self {
        Self::from_parts(
            self.x - o.x,
            self.y() - o.y(),
            self.z - o.z,
            self.height_defined && o.height_defined,
        )
    }

    #[inline]
    pub fn scale(self, factor: f64) -> Self {
        Self::from_parts(self.x * factor, self.y() * factor, self.z * factor, self.height_defined)
    }

    /// Checked division by a scalar
    pub fn divide(self, divisor: f64) -> Result<Self> {
        if divisor == 0.0 {
            return Err(Error::DivisionByZero("vector divided by zero"));
        }
        Ok(self.divide_unchecked(divisor))
    }

    #[inline]
    fn divide_unchecked(self, divisor: f64) -> Self {
        Self::from_parts(self.x / divisor, self.y() / divisor, self.z / divisor, self.height_defined)
    }

    /// Equality over effective components
    pub fn equals(&self, o: &Self) -> bool {
        self.x == o.x && self.y() == o.y() && self.z == o.z && self.height_defined == o.height_defined
    }

    /// Hash consistent with [`Vector3::equals`]
    pub fn hash_value(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }

    /// Dot product in the XZ plane
    #[inline]
    pub fn dot_flat(self, o: Self) -> f64 {
        self.x * o.x + self.z * o.z
    }

    /// Euclidean length over effective components
    #[inline]
    pub fn magnitude(&self) -> f64 {
        (self.x * self.x + self.y() * self.y() + self.z * self.z).sqrt()
    }

    /// Unit vector in the same direction
    pub fn normalized(&self) -> Result<Self> {
        let len = self.magnitude();
        if len == 0.0 {
            return Err(Error::DivisionByZero("cannot normalize a zero-length vector"));
        }
        Ok(self.divide_unchecked(len))
    }

    /// Projection to the XZ plane (height undefined)
    #[inline]
    pub fn flat(&self) -> Self {
        Self::vector_xz(self.x, self.z)
    }

    /// New height-defined vector raised by `dy`
    #[inline]
    pub fn increase_y(&self, dy: f64) -> Self {
        Self::new(self.x, self.y() + dy, self.z)
    }

    /// Interpolate with `t` clamped to [0, 1]
    ///
    /// Weights are reversed relative to the usual convention: `t = 1` yields
    /// `a` and `t = 0` yields `b`.
    pub fn lerp(a: Self, b: Self, t: f64) -> Self {
        Self::lerp_unclamped(a, b, clamp01(t))
    }

    /// Same weights as [`Vector3::lerp`] without clamping; extrapolates outside [0, 1]
    pub fn lerp_unclamped(a: Self, b: Self, t: f64) -> Self {
        a * t + b * (1.0 - t)
    }

    /// Angle to `other` (default +X) in the XZ plane, in [0, 2π)
    ///
    /// Computed as `π - atan2(cross, dot)` to match the game's convention, so
    /// parallel vectors are π apart.
    pub fn flat_angle(&self, other: Option<Self>) -> f64 {
        let o = other.unwrap_or(Self::vector_xz(1.0, 0.0));
        let sin = self.x * o.z - o.x * self.z;
        let cos = self.x * o.x + o.z * self.z;
        let mut angle = PI - sin.atan2(cos);
        if angle < 0.0 {
            angle += TAU;
        }
        if angle >= TAU {
            angle -= TAU;
        }
        angle
    }

    /// Rotate by `angle` radians around `pivot` (default origin) in the XZ plane
    ///
    /// The offset from the pivot loses its height; the result carries only
    /// the pivot's height.
    pub fn flat_rotate(&self, angle: f64, pivot: Option<Self>) -> Self {
        let pivot = pivot.unwrap_or(Self::ZERO);
        let diff = *self - pivot;
        let (sin, cos) = angle.sin_cos();
        pivot + Self::new(diff.x * cos - diff.z * sin, 0.0, diff.x * sin + diff.z * cos)
    }
}

impl Default for Vector3 {
    fn default() -> Self {
        Self::ZERO
    }
}

impl PartialEq for Vector3 {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

/// Reflexive only without NaN coordinates: a vector holding NaN is unequal
/// to itself and must not be used as a hash key. Decoding rejects NaN.
impl Eq for Vector3 {}

impl Hash for Vector3 {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // +0.0 folds -0.0 into 0.0 so equal values hash alike
        (self.x + 0.0).to_bits().hash(state);
        (self.y() + 0.0).to_bits().hash(state);
        (self.z + 0.0).to_bits().hash(state);
        self.height_defined.hash(state);
    }
}

impl fmt::Display for Vector3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.height_defined {
            write!(f, "({:.2}, {:.2}, {:.2})", self.x, self.y, self.z)
        } else {
            write!(f, "({:.2}, undefined, {:.2})", self.x, self.z)
        }
    }
}

impl Add for Vector3 {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Vector3::add(self, rhs)
    }
}

impl Sub for Vector3 {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        self.subtract(rhs)
    }
}

impl Mul<f64> for Vector3 {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: f64) -> Self {
        self.scale(rhs)
    }
}

impl Mul<Vector3> for f64 {
    type Output = Vector3;
    #[inline]
    fn mul(self, rhs: Vector3) -> Vector3 {
        rhs.scale(self)
    }
}

/// Unchecked; use [`Vector3::divide`] to reject a zero divisor
impl Div<f64> for Vector3 {
    type Output = Self;
    #[inline]
    fn div(self, rhs: f64) -> Self {
        self.divide_unchecked(rhs)
    }
}

impl Serializable for Vector3 {
    fn encode_self(&self, encoder: &Encoder<'_>) -> Result<TreeNode> {
        let mut node = encoder.begin(self)?;
        encoder.field(&mut node, "x", self.x);
        encoder.field(&mut node, "y", self.y());
        encoder.field(&mut node, "z", self.z);
        encoder.field(&mut node, "is_height_defined", self.height_defined);
        Ok(node)
    }
}

impl Decode for Vector3 {
    fn decode_from(node: &TreeNode, decoder: &Decoder<'_>) -> Result<Self> {
        let mut fields = decoder.fields(node, Self::TYPE_TAG);
        let x = fields.primitive_or("x", 0.0)?;
        let y = fields.primitive_or("y", 0.0)?;
        let z = fields.primitive_or("z", 0.0)?;
        let height_defined = fields.primitive_or("is_height_defined", true)?;
        fields.finish()?;
        if [x, y, z].iter().any(|c: &f64| c.is_nan()) {
            return Err(Error::incompatible(Self::TYPE_TAG, "coordinates must not be NaN"));
        }
        Ok(Self::from_parts(x, y, z, height_defined))
    }
}
