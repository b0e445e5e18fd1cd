//! Cubic Bezier curves
//!
//! The curve uses the game's reversed parameterization: `position(0)` is the
//! last control point `d` and `position(1)` is the first, `a`. Evaluation is
//! de Casteljau reduction with [`Vector3::lerp_unclamped`], so parameters
//! outside [0, 1] extrapolate.

use core::fmt;

use skylines_core::{Decode, Decoder, Encoder, Result, Serializable, TreeNode};

use crate::vector::Vector3;

/// Four-point Bezier curve
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CubicBezier {
    pub a: Vector3,
    pub b: Vector3,
    pub c: Vector3,
    pub d: Vector3,
}

impl CubicBezier {
    /// Type tag in the game's format
    pub const TYPE_TAG: &'static str = "Bezier";

    pub const fn new(a: Vector3, b: Vector3, c: Vector3, d: Vector3) -> Self {
        Self { a, b, c, d }
    }

    /// Control points in order
    #[inline]
    pub fn controls(&self) -> [Vector3; 4] {
        [self.a, self.b, self.c, self.d]
    }

    /// Same curve traversed the other way
    pub fn reversed(&self) -> Self {
        Self::new(self.d, self.c, self.b, self.a)
    }

    /// Point on the curve
    pub fn position(&self, t: f64) -> Vector3 {
        // reduction never empties four controls down to one
        self.reduce(t, 1)[0]
    }

    /// Unit tangent from the last reduction pair
    pub fn tangent(&self, t: f64) -> Result<Vector3> {
        let pair = self.reduce(t, 2);
        (pair[1] - pair[0]).normalized()
    }

    /// Tangent rotated a quarter turn in the XZ plane
    pub fn flat_normal(&self, t: f64) -> Result<Vector3> {
        Ok(self.tangent(t)?.flat_rotate(core::f64::consts::FRAC_PI_2, None))
    }

    fn reduce(&self, t: f64, remaining: usize) -> Vec<Vector3> {
        let mut controls = self.controls().to_vec();
        while controls.len() > remaining {
            controls = lower(&controls, 1.0 - t);
        }
        controls
    }
}

/// One de Casteljau step
fn lower(controls: &[Vector3], s: f64) -> Vec<Vector3> {
    controls
        .windows(2)
        .map(|pair| Vector3::lerp_unclamped(pair[0], pair[1], 1.0 - s))
        .collect()
}

impl fmt::Display for CubicBezier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}, {}]", self.a, self.b, self.c, self.d)
    }
}

impl Serializable for CubicBezier {
    fn encode_self(&self, encoder: &Encoder<'_>) -> Result<TreeNode> {
        let mut node = encoder.begin(self)?;
        encoder.object_field(&mut node, "a", &self.a)?;
        encoder.object_field(&mut node, "b", &self.b)?;
        encoder.object_field(&mut node, "c", &self.c)?;
        encoder.object_field(&mut node, "d", &self.d)?;
        Ok(node)
    }
}

impl Decode for CubicBezier {
    fn decode_from(node: &TreeNode, decoder: &Decoder<'_>) -> Result<Self> {
        let mut fields = decoder.fields(node, Self::TYPE_TAG);
        let a = fields.object_or("a", Vector3::ZERO)?;
        let b = fields.object_or("b", Vector3::ZERO)?;
        let c = fields.object_or("c", Vector3::ZERO)?;
        let d = fields.object_or("d", Vector3::ZERO)?;
        fields.finish()?;
        Ok(Self::new(a, b, c, d))
    }
}
