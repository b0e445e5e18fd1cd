//! # skylines_math - Planar-aware geometry
//!
//! Geometry primitives matching the game's conventions:
//! - **Vector3**: 3D vector whose height may be undefined (XZ plane only)
//! - **CubicBezier**: four-point curve with the game's reversed parameterization
//!
//! Both types are [`Serializable`](skylines_core::Serializable); call
//! [`register_types`] before encoding them.

pub mod bezier;
pub mod vector;

pub use bezier::CubicBezier;
pub use vector::Vector3;

use skylines_core::{Result, TypeRegistry};

/// Common math constants
pub mod consts {
    pub const PI: f64 = core::f64::consts::PI;
    pub const TAU: f64 = core::f64::consts::TAU;
    pub const FRAC_PI_2: f64 = core::f64::consts::FRAC_PI_2;
    pub const DEG_TO_RAD: f64 = PI / 180.0;
    pub const RAD_TO_DEG: f64 = 180.0 / PI;
}

/// Clamp to [0, 1]
#[inline]
pub fn clamp01(t: f64) -> f64 {
    t.clamp(0.0, 1.0)
}

/// Convert degrees to radians
#[inline]
pub fn radians(degrees: f64) -> f64 {
    degrees * consts::DEG_TO_RAD
}

/// Convert radians to degrees
#[inline]
pub fn degrees(radians: f64) -> f64 {
    radians * consts::RAD_TO_DEG
}

/// Register the geometry types under their external tags
pub fn register_types(registry: &mut TypeRegistry) -> Result<()> {
    registry
        .register::<Vector3>(Vector3::TYPE_TAG)?
        .register::<CubicBezier>(CubicBezier::TYPE_TAG)?;
    Ok(())
}

/// Re-export commonly used types
pub mod prelude {
    pub use crate::bezier::CubicBezier;
    pub use crate::vector::Vector3;
    pub use crate::{clamp01, consts};
}
