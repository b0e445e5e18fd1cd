//! Options for building road, rail and path segments

use core::fmt;

use skylines_core::{Decode, Decoder, Encoder, PrimitiveKind, Result, Serializable, TreeNode};

use crate::prefab::NetPrefab;

/// Terrain-following setting as sent to the game
///
/// Booleans render as lowercase `true`/`false`; any other token is passed
/// through untouched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FollowTerrain(String);

impl FollowTerrain {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<bool> for FollowTerrain {
    fn from(value: bool) -> Self {
        Self(value.to_string())
    }
}

impl From<&str> for FollowTerrain {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for FollowTerrain {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Anything [`NetOptions::from_descriptor`] accepts
#[derive(Clone, Debug)]
pub enum NetDescriptor<'a> {
    Name(&'a str),
    Options(NetOptions),
    Prefab(&'a NetPrefab),
}

impl<'a> From<&'a str> for NetDescriptor<'a> {
    fn from(name: &'a str) -> Self {
        Self::Name(name)
    }
}

impl<'a> From<&'a String> for NetDescriptor<'a> {
    fn from(name: &'a String) -> Self {
        Self::Name(name)
    }
}

impl From<NetOptions> for NetDescriptor<'_> {
    fn from(options: NetOptions) -> Self {
        Self::Options(options)
    }
}

impl<'a> From<&'a NetPrefab> for NetDescriptor<'a> {
    fn from(prefab: &'a NetPrefab) -> Self {
        Self::Prefab(prefab)
    }
}

/// How a network segment is built
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NetOptions {
    prefab_name: String,
    follow_terrain: String,
    elevation_mode: String,
    invert: bool,
    node_spacing: i64,
}

impl NetOptions {
    /// Type tag in the game's format
    pub const TYPE_TAG: &'static str = "NetOptions";

    pub const DEFAULT_ELEVATION_MODE: &'static str = "default";
    pub const DEFAULT_NODE_SPACING: i64 = 100;

    /// Options for a prefab with every setting at its default
    pub fn new(prefab_name: impl Into<String>) -> Self {
        Self {
            prefab_name: prefab_name.into(),
            follow_terrain: FollowTerrain::from(false).0,
            elevation_mode: Self::DEFAULT_ELEVATION_MODE.to_owned(),
            invert: false,
            node_spacing: Self::DEFAULT_NODE_SPACING,
        }
    }

    /// Options from a prefab name, existing options (returned as is) or a prefab
    pub fn from_descriptor<'a>(descriptor: impl Into<NetDescriptor<'a>>) -> Self {
        match descriptor.into() {
            NetDescriptor::Name(name) => Self::new(name),
            NetDescriptor::Options(options) => options,
            NetDescriptor::Prefab(prefab) => Self::new(prefab.name.as_str()),
        }
    }

    pub fn with_follow_terrain(mut self, follow_terrain: impl Into<FollowTerrain>) -> Self {
        self.follow_terrain = follow_terrain.into().0;
        self
    }

    /// Elevation mode, stored lowercase
    pub fn with_elevation_mode(mut self, elevation_mode: &str) -> Self {
        self.elevation_mode = elevation_mode.to_lowercase();
        self
    }

    pub fn with_invert(mut self, invert: bool) -> Self {
        self.invert = invert;
        self
    }

    pub fn with_node_spacing(mut self, node_spacing: i64) -> Self {
        self.node_spacing = node_spacing;
        self
    }

    pub fn prefab_name(&self) -> &str {
        &self.prefab_name
    }

    pub fn follow_terrain(&self) -> &str {
        &self.follow_terrain
    }

    pub fn elevation_mode(&self) -> &str {
        &self.elevation_mode
    }

    pub fn invert(&self) -> bool {
        self.invert
    }

    pub fn node_spacing(&self) -> i64 {
        self.node_spacing
    }
}

impl fmt::Display for NetOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "NetOptions:")?;
        writeln!(f, "Prefab name: {}", self.prefab_name)?;
        writeln!(f, "Elevation mode: {}", self.elevation_mode)?;
        writeln!(f, "Follow terrain: {}", self.follow_terrain)?;
        writeln!(f, "Invert: {}", self.invert)?;
        writeln!(f, "Node spacing: {}", self.node_spacing)
    }
}

impl Serializable for NetOptions {
    fn encode_self(&self, encoder: &Encoder<'_>) -> Result<TreeNode> {
        let mut node = encoder.begin(self)?;
        // the game reads follow_terrain as a string even when it looks boolean
        encoder.field_as(
            &mut node,
            "follow_terrain",
            self.follow_terrain.as_str(),
            Some(PrimitiveKind::String),
        );
        encoder.field(&mut node, "elevation_mode", self.elevation_mode.as_str());
        encoder.field(&mut node, "prefab_name", self.prefab_name.as_str());
        encoder.field(&mut node, "invert", self.invert);
        encoder.field(&mut node, "node_spacing", self.node_spacing);
        Ok(node)
    }
}

impl Decode for NetOptions {
    fn decode_from(node: &TreeNode, decoder: &Decoder<'_>) -> Result<Self> {
        let mut fields = decoder.fields(node, Self::TYPE_TAG);
        let prefab_name: String = fields.primitive("prefab_name")?;
        let follow_terrain: String = fields.primitive_or("follow_terrain", FollowTerrain::from(false).0)?;
        let elevation_mode: String =
            fields.primitive_or("elevation_mode", Self::DEFAULT_ELEVATION_MODE.to_owned())?;
        let invert = fields.primitive_or("invert", false)?;
        let node_spacing = fields.primitive_or("node_spacing", Self::DEFAULT_NODE_SPACING)?;
        fields.finish()?;

        Ok(Self::new(prefab_name)
            .with_follow_terrain(follow_terrain)
            .with_elevation_mode(&elevation_mode)
            .with_invert(invert)
            .with_node_spacing(node_spacing))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skylines_core::{TypeRegistry, TYPE_ATTRIBUTE};

    #[test]
    fn test_defaults() {
        let options = NetOptions::new("Basic Road");
        assert_eq!(options.prefab_name(), "Basic Road");
        assert_eq!(options.follow_terrain(), "false");
        assert_eq!(options.elevation_mode(), "default");
        assert!(!options.invert());
        assert_eq!(options.node_spacing(), 100);
    }

    #[test]
    fn test_normalization() {
        let options = NetOptions::new("Basic Road")
            .with_follow_terrain(true)
            .with_elevation_mode("Elevated");
        assert_eq!(options.follow_terrain(), "true");
        assert_eq!(options.elevation_mode(), "elevated");

        let options = options.with_follow_terrain("Auto");
        assert_eq!(options.follow_terrain(), "Auto");
    }

    #[test]
    fn test_from_descriptor() {
        let name = String::from("Gravel Road");
        assert_eq!(NetOptions::from_descriptor(&name), NetOptions::new("Gravel Road"));

        let existing = NetOptions::new("Highway").with_invert(true);
        assert_eq!(NetOptions::from_descriptor(existing.clone()), existing);

        let prefab = NetPrefab::new("Train Track");
        assert_eq!(NetOptions::from_descriptor(&prefab).prefab_name(), "Train Track");
    }

    #[test]
    fn test_display() {
        let text = NetOptions::new("Basic Road").to_string();
        assert_eq!(
            text,
            "NetOptions:\nPrefab name: Basic Road\nElevation mode: default\nFollow terrain: false\nInvert: false\nNode spacing: 100\n"
        );
    }

    #[test]
    fn test_encoded_layout() {
        let mut registry = TypeRegistry::new();
        registry.register::<NetOptions>(NetOptions::TYPE_TAG).unwrap();
        let encoder = Encoder::new(&registry);

        let node = encoder.encode_object(&NetOptions::new("Basic Road")).unwrap();
        assert_eq!(node.type_tag(), Some("NetOptions"));
        let names: Vec<_> = node.children().iter().map(TreeNode::name).collect();
        assert_eq!(
            names,
            ["follow_terrain", "elevation_mode", "prefab_name", "invert", "node_spacing"]
        );
        let follow = node.child("follow_terrain").unwrap();
        assert_eq!(follow.attribute(TYPE_ATTRIBUTE), Some("xsi:string"));
        assert_eq!(follow.text(), Some("false"));
        assert_eq!(node.child("node_spacing").and_then(TreeNode::text), Some("100"));
    }

    #[test]
    fn test_decode_requires_prefab_name() {
        let registry = TypeRegistry::new();
        let decoder = Decoder::new(&registry);
        let node = TreeNode::new("NetOptions").with_child(TreeNode::leaf("invert", "true"));
        let err = decoder.decode_as::<NetOptions>(&node).unwrap_err();
        assert!(err.is_incompatible());
    }

    #[test]
    fn test_decode_normalizes() {
        let registry = TypeRegistry::new();
        let decoder = Decoder::new(&registry);
        let node = TreeNode::new("NetOptions")
            .with_child(TreeNode::leaf("prefab_name", "Basic Road"))
            .with_child(TreeNode::leaf("elevation_mode", "GROUND"));
        let options = decoder.decode_as::<NetOptions>(&node).unwrap();
        assert_eq!(options.elevation_mode(), "ground");
        assert_eq!(options.node_spacing(), 100);
    }
}
