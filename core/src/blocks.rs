//! Block identifiers, biome names and display colors.

use serde::{Deserialize, Serialize};

/// Identifier stored in every cell of the tile grid.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum BlockId {
    /// Air. The only non-solid, non-liquid value.
    #[default]
    Empty,
    /// Soil found directly beneath grass and forest surfaces.
    Dirt,
    /// Bulk rock and the bedrock row.
    Stone,
    /// Shallow ore.
    CopperOre,
    /// Mid-tier ore.
    IronOre,
    /// Rare ore.
    GoldOre,
    /// Tree trunk.
    Wood,
    /// Tree canopy.
    Leaves,
    /// Ocean water. Swimmable, never collided with.
    Water,
    /// Desert and ocean-floor surface material.
    Sand,
    /// Desert decoration.
    Cactus,
    /// Plains surface material.
    Grass,
    /// Mountain surface material.
    Snow,
    /// Frozen water.
    Ice,
}

impl BlockId {
    /// Ore variants that may replace stone inside the ore band.
    pub const ORES: [BlockId; 3] = [BlockId::CopperOre, BlockId::IronOre, BlockId::GoldOre];

    /// Reports whether actors collide with the block.
    #[must_use]
    pub const fn is_solid(self) -> bool {
        !matches!(self, Self::Empty | Self::Water)
    }

    /// Reports whether the block is a swimmable liquid.
    #[must_use]
    pub const fn is_liquid(self) -> bool {
        matches!(self, Self::Water)
    }

    /// Reports whether the block belongs to a tree and so never counts as ground for spawning.
    #[must_use]
    pub const fn is_tree(self) -> bool {
        matches!(self, Self::Wood | Self::Leaves)
    }

    /// Reports whether the block is one of the ore variants.
    #[must_use]
    pub const fn is_ore(self) -> bool {
        matches!(self, Self::CopperOre | Self::IronOre | Self::GoldOre)
    }
}

/// Named terrain style controlling surface material and elevation bias.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Biome {
    /// Dirt surface that grows trees.
    Forest,
    /// Grass surface pulled partway toward sea level.
    Plains,
    /// Sand surface and sand subsoil that grows cacti.
    Desert,
    /// Flat water body at sea level.
    Ocean,
    /// Snow-capped terrain lifted above the base elevation.
    Mountains,
}

impl Biome {
    /// Every biome in hash-selection order.
    pub const ALL: [Biome; 5] = [
        Biome::Forest,
        Biome::Plains,
        Biome::Desert,
        Biome::Ocean,
        Biome::Mountains,
    ];

    /// Material placed on the topmost row of a column in this biome.
    #[must_use]
    pub const fn surface_block(self) -> BlockId {
        match self {
            Self::Forest => BlockId::Dirt,
            Self::Plains => BlockId::Grass,
            Self::Desert | Self::Ocean => BlockId::Sand,
            Self::Mountains => BlockId::Snow,
        }
    }

    /// Material placed in the shallow soil band beneath the surface.
    #[must_use]
    pub const fn soil_block(self) -> BlockId {
        match self {
            Self::Desert => BlockId::Sand,
            _ => BlockId::Dirt,
        }
    }
}

/// Byte RGB color attached to blocks and mobs for presentation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[u8; 3]", into = "[u8; 3]")]
pub struct Rgb {
    red: u8,
    green: u8,
    blue: u8,
}

impl Rgb {
    /// Creates a new color from byte RGB components.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Red component of the color.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the color.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the color.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }
}

impl From<[u8; 3]> for Rgb {
    fn from(value: [u8; 3]) -> Self {
        Self::from_rgb(value[0], value[1], value[2])
    }
}

impl From<Rgb> for [u8; 3] {
    fn from(value: Rgb) -> Self {
        [value.red, value.green, value.blue]
    }
}
