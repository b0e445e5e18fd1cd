//! # skylines_model - Domain value objects
//!
//! Value objects exchanged with the game, plus the built-in type table:
//! - **NetOptions**: how a road, rail or path segment is built
//! - **NaturalResourceCell**: resource amounts of one terrain cell
//! - **NetPrefab**: network prefab descriptor reported by the game
//!
//! Call [`bootstrap`] once at startup before encoding or decoding through
//! the process-wide registry.

pub mod net_options;
pub mod prefab;
pub mod resources;

pub use net_options::{FollowTerrain, NetDescriptor, NetOptions};
pub use prefab::NetPrefab;
pub use resources::{NaturalResourceCell, ResourceKind};

pub use skylines_math::{CubicBezier, Vector3};

use skylines_core::{Error, Result, TypeRegistry};

/// Register every built-in type: geometry first, then domain objects
pub fn register_types(registry: &mut TypeRegistry) -> Result<()> {
    skylines_math::register_types(registry)?;
    registry
        .register::<NetOptions>(NetOptions::TYPE_TAG)?
        .register::<NaturalResourceCell>(NaturalResourceCell::TYPE_TAG)?;

    for descriptor in registry.iter() {
        log::debug!("Registered type '{}' -> {}", descriptor.tag(), descriptor.type_name());
    }
    Ok(())
}

/// A fresh registry holding the built-in types
pub fn builtin_registry() -> Result<TypeRegistry> {
    let mut registry = TypeRegistry::new();
    register_types(&mut registry)?;
    Ok(registry)
}

/// Install the built-in registry as the process-wide one
///
/// Safe to call more than once; later calls return the installed registry.
pub fn bootstrap() -> Result<&'static TypeRegistry> {
    match builtin_registry()?.install() {
        Err(Error::RegistryInstalled) => TypeRegistry::global(),
        installed => installed,
    }
}

/// Re-export commonly used types
pub mod prelude {
    pub use crate::net_options::NetOptions;
    pub use crate::prefab::NetPrefab;
    pub use crate::resources::{NaturalResourceCell, ResourceKind};
    pub use crate::{bootstrap, builtin_registry};
    pub use skylines_core::prelude::*;
    pub use skylines_math::prelude::*;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_tags_in_order() {
        let registry = builtin_registry().unwrap();
        let tags: Vec<_> = registry.iter().map(|d| d.tag()).collect();
        assert_eq!(tags, ["Vector", "Bezier", "NetOptions", "NaturalResourceCellBase"]);
    }

    #[test]
    fn test_bootstrap_twice() {
        let first = bootstrap().unwrap();
        let second = bootstrap().unwrap();
        assert!(std::ptr::eq(first, second));
        assert!(first.contains_tag("NetOptions"));
    }
}
