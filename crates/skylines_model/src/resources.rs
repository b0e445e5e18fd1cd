//! Natural resources of a terrain cell

use core::fmt;

use skylines_core::{Decode, Decoder, Encoder, Result, Serializable, TreeNode};

/// One kind of natural resource
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Ore,
    Oil,
    Forest,
    Fertility,
    Pollution,
    Water,
}

impl ResourceKind {
    /// Every kind, in encoding order
    pub const ALL: [ResourceKind; 6] = [
        Self::Ore,
        Self::Oil,
        Self::Forest,
        Self::Fertility,
        Self::Pollution,
        Self::Water,
    ];

    /// Field name in the game's format
    pub fn name(self) -> &'static str {
        match self {
            Self::Ore => "ore",
            Self::Oil => "oil",
            Self::Forest => "forest",
            Self::Fertility => "fertility",
            Self::Pollution => "pollution",
            Self::Water => "water",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Resource amounts of a single cell; every amount defaults to 0
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct NaturalResourceCell {
    pub ore: u32,
    pub oil: u32,
    pub forest: u32,
    pub fertility: u32,
    pub pollution: u32,
    pub water: u32,
}

impl NaturalResourceCell {
    /// Type tag in the game's format
    pub const TYPE_TAG: &'static str = "NaturalResourceCellBase";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, kind: ResourceKind) -> u32 {
        match kind {
            ResourceKind::Ore => self.ore,
            ResourceKind::Oil => self.oil,
            ResourceKind::Forest => self.forest,
            ResourceKind::Fertility => self.fertility,
            ResourceKind::Pollution => self.pollution,
            ResourceKind::Water => self.water,
        }
    }

    /// Copy with one amount replaced
    pub fn with(mut self, kind: ResourceKind, amount: u32) -> Self {
        *self.slot(kind) = amount;
        self
    }

    /// Amounts in encoding order
    pub fn iter(&self) -> impl Iterator<Item = (ResourceKind, u32)> + '_ {
        ResourceKind::ALL.into_iter().map(move |kind| (kind, self.get(kind)))
    }

    fn slot(&mut self, kind: ResourceKind) -> &mut u32 {
        match kind {
            ResourceKind::Ore => &mut self.ore,
            ResourceKind::Oil => &mut self.oil,
            ResourceKind::Forest => &mut self.forest,
            ResourceKind::Fertility => &mut self.fertility,
            ResourceKind::Pollution => &mut self.pollution,
            ResourceKind::Water => &mut self.water,
        }
    }
}

impl Serializable for NaturalResourceCell {
    fn encode_self(&self, encoder: &Encoder<'_>) -> Result<TreeNode> {
        let mut node = encoder.begin(self)?;
        for (kind, amount) in self.iter() {
            encoder.field(&mut node, kind.name(), amount);
        }
        Ok(node)
    }
}

impl Decode for NaturalResourceCell {
    fn decode_from(node: &TreeNode, decoder: &Decoder<'_>) -> Result<Self> {
        let mut fields = decoder.fields(node, Self::TYPE_TAG);
        let mut cell = Self::default();
        for kind in ResourceKind::ALL {
            *cell.slot(kind) = fields.primitive_or(kind.name(), 0)?;
        }
        fields.finish()?;
        Ok(cell)
    }
}
