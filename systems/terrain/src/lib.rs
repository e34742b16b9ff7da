#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic, seam-consistent terrain generation.
//!
//! Every decision the generator makes (biome pick, anchor elevation, surface
//! mixing, ore roll, cave noise, decoration) is a pure function of the global
//! tile coordinate and the world seed. Generating a column range in one call
//! or in adjacent pieces therefore yields identical grids, which lets the
//! world grow at either edge without visible seams.

mod noise;

use log::trace;
use serde::{Deserialize, Serialize};
use strata_core::{Biome, BlockId, TileGrid};

use noise::{hash32, hash_cell, lattice_noise, lerp, raised_cosine, unit};

const SALT_SURFACE_MIX: u32 = 0x5f1d_0001;
const SALT_ORE_ROLL: u32 = 0x5f1d_0002;
const SALT_ORE_KIND: u32 = 0x5f1d_0003;
const SALT_CAVE: u32 = 0x5f1d_0004;
const SALT_TREE_ROLL: u32 = 0x5f1d_0005;
const SALT_TREE_HEIGHT: u32 = 0x5f1d_0006;
const SALT_CACTUS_ROLL: u32 = 0x5f1d_0007;
const SALT_CACTUS_HEIGHT: u32 = 0x5f1d_0008;

/// Tunable constants shaping generated terrain.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainParams {
    /// Columns sharing a single biome.
    pub segment_width: u32,
    /// Columns between elevation anchors.
    pub coarse_step: u32,
    /// Columns on either side of a segment boundary that blend both biomes.
    /// Values above half a segment are treated as half a segment.
    pub blend_width: u32,
    /// Amplitude of the jitter added to the surface-mixing probability.
    pub blend_noise: f64,
    /// Sea level as a fraction of the world height, measured from the top.
    pub sea_level_fraction: f64,
    /// Highest anchor elevation as a fraction of the world height.
    pub min_elevation_fraction: f64,
    /// Lowest anchor elevation as a fraction of the world height.
    pub max_elevation_fraction: f64,
    /// How far plains are pulled toward sea level, in `[0, 1]`.
    pub plains_pull: f64,
    /// Rows mountains are lifted above the base elevation.
    pub mountain_lift: u32,
    /// Depth of the water layer in ocean columns.
    pub water_depth: u32,
    /// Depth at which soil gives way to stone.
    pub dirt_depth: u32,
    /// Depth at which ore stops appearing.
    pub stone_depth: u32,
    /// Per-cell chance that stone inside the ore band becomes ore.
    pub ore_chance: f64,
    /// Per-column chance that a forest column grows a tree.
    pub tree_chance: f64,
    /// Per-column chance that a desert column grows a cactus.
    pub cactus_chance: f64,
    /// Lattice spacing of the cave noise, in tiles.
    pub cave_scale: u32,
    /// Cave noise values below this threshold are carved out.
    pub cave_threshold: f64,
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            segment_width: 64,
            coarse_step: 128,
            blend_width: 12,
            blend_noise: 0.35,
            sea_level_fraction: 0.30,
            min_elevation_fraction: 0.35,
            max_elevation_fraction: 0.55,
            plains_pull: 0.4,
            mountain_lift: 8,
            water_depth: 6,
            dirt_depth: 4,
            stone_depth: 30,
            ore_chance: 0.03,
            tree_chance: 0.05,
            cactus_chance: 0.03,
            cave_scale: 8,
            cave_threshold: 0.22,
        }
    }
}

/// Biome mixture at a single column.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BiomeBlend {
    /// Biome of the segment containing the column.
    pub primary: Biome,
    /// Biome of the closest adjacent segment.
    pub neighbour: Biome,
    /// Share of the neighbour in `[0, 0.5)`. Zero outside blend zones.
    pub weight: f64,
}

/// Surface description of a single column before decoration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColumnProfile {
    /// Biome mixture at the column.
    pub blend: BiomeBlend,
    /// Row of the topmost terrain cell, or of the water line in oceans.
    pub surface_row: u32,
    /// Material placed at the surface row (below the water in oceans).
    pub surface_block: BlockId,
}

/// Pure terrain generator bound to a single world seed.
#[derive(Clone, Debug, PartialEq)]
pub struct TerrainField {
    seed: u32,
    params: TerrainParams,
}

impl TerrainField {
    /// Creates a generator for the provided seed.
    #[must_use]
    pub fn new(seed: u32, params: TerrainParams) -> Self {
        Self { seed, params }
    }

    /// Seed every decision is derived from.
    #[must_use]
    pub const fn seed(&self) -> u32 {
        self.seed
    }

    /// Parameters shaping the terrain.
    #[must_use]
    pub fn params(&self) -> &TerrainParams {
        &self.params
    }

    /// Biome of the segment containing the global column.
    #[must_use]
    pub fn biome(&self, global_x: i64) -> Biome {
        self.segment_biome(global_x.div_euclid(self.segment_width()))
    }

    /// Biome mixture at the global column.
    ///
    /// The weight follows a raised-cosine window centred on the closest
    /// segment boundary, reaching just under one half at the boundary and
    /// zero `blend_width` columns away from it.
    #[must_use]
    pub fn blend(&self, global_x: i64) -> BiomeBlend {
        let segment_width = self.segment_width();
        let segment = global_x.div_euclid(segment_width);
        let position = (global_x - segment * segment_width) as f64;
        let primary = self.segment_biome(segment);

        let to_left = position + 0.5;
        let to_right = segment_width as f64 - position - 0.5;
        let (neighbour_segment, distance) = if to_left <= to_right {
            (segment - 1, to_left)
        } else {
            (segment + 1, to_right)
        };
        let neighbour = self.segment_biome(neighbour_segment);

        let blend_width = f64::from(self.blend_width());
        let weight = if neighbour == primary || blend_width <= 0.0 || distance >= blend_width {
            0.0
        } else {
            0.5 * raised_cosine(1.0 - distance / blend_width)
        };

        BiomeBlend {
            primary,
            neighbour,
            weight,
        }
    }

    /// Surface row and material of the global column for a world `height` rows tall.
    #[must_use]
    pub fn profile(&self, global_x: i64, height: u32) -> ColumnProfile {
        let blend = self.blend(global_x);
        let base = self.base_elevation(global_x, height);
        let sea_level = self.sea_level(height);

        let primary_surface = self.biased_elevation(blend.primary, base, sea_level);
        let neighbour_surface = self.biased_elevation(blend.neighbour, base, sea_level);
        let elevation = lerp(primary_surface, neighbour_surface, blend.weight);
        let lowest = i64::from(height).saturating_sub(2).max(0);
        let surface_row = (elevation.floor() as i64).clamp(0, lowest) as u32;

        let mut surface_block = blend.primary.surface_block();
        if blend.weight > 0.0 {
            let jitter = unit(hash_cell(SALT_SURFACE_MIX, self.seed, global_x, 0)) - 0.5;
            if blend.weight + jitter * self.params.blend_noise > 0.5 {
                surface_block = blend.neighbour.surface_block();
            }
        }

        ColumnProfile {
            blend,
            surface_row,
            surface_block,
        }
    }

    /// Generates the complete, decorated column at `global_x`, top to bottom.
    #[must_use]
    pub fn column(&self, global_x: i64, height: u32) -> Vec<BlockId> {
        if height == 0 {
            return Vec::new();
        }
        let profile = self.profile(global_x, height);
        let mut cells = self.fill_column(global_x, height, &profile);

        if let Some(trunk) = self.tree_height(global_x, &profile) {
            for step in 0..trunk {
                if let Some(row) = profile.surface_row.checked_sub(step) {
                    cells[row as usize] = BlockId::Wood;
                }
            }
        } else if let Some(stack) = self.cactus_height(global_x, &profile) {
            for step in 0..stack {
                if let Some(row) = profile.surface_row.checked_sub(step) {
                    cells[row as usize] = BlockId::Cactus;
                }
            }
        }

        for root in global_x - 1..=global_x + 1 {
            let root_profile = if root == global_x {
                profile
            } else {
                self.profile(root, height)
            };
            let Some(trunk) = self.tree_height(root, &root_profile) else {
                continue;
            };
            let top = i64::from(root_profile.surface_row) - i64::from(trunk) + 1;
            for row in top - 1..=top + 1 {
                let Ok(index) = usize::try_from(row) else {
                    continue;
                };
                if let Some(cell) = cells.get_mut(index) {
                    if *cell == BlockId::Empty {
                        *cell = BlockId::Leaves;
                    }
                }
            }
        }

        if let Some(last) = cells.last_mut() {
            *last = BlockId::Stone;
        }
        cells
    }

    /// Generates `width` columns starting at global column `x_offset`.
    #[must_use]
    pub fn generate(&self, x_offset: i64, width: u32, height: u32) -> TileGrid {
        trace!(
            "generating {width}x{height} terrain at global column {x_offset} (seed {})",
            self.seed
        );
        let columns: Vec<Vec<BlockId>> = (0..i64::from(width))
            .map(|local| self.column(x_offset + local, height))
            .collect();
        TileGrid::from_columns(height, &columns)
    }

    fn segment_width(&self) -> i64 {
        i64::from(self.params.segment_width.max(1))
    }

    fn blend_width(&self) -> u32 {
        self.params
            .blend_width
            .min(self.params.segment_width.max(1) / 2)
    }

    fn segment_biome(&self, segment: i64) -> Biome {
        let key = (segment as u32).wrapping_mul(97).wrapping_add(self.seed);
        Biome::ALL[(hash32(key) % Biome::ALL.len() as u32) as usize]
    }

    fn sea_level(&self, height: u32) -> f64 {
        (f64::from(height) * self.params.sea_level_fraction).floor()
    }

    fn anchor_elevation(&self, anchor: i64, height: u32) -> f64 {
        let min = (f64::from(height) * self.params.min_elevation_fraction).floor();
        let max = (f64::from(height) * self.params.max_elevation_fraction).floor();
        let key = (anchor as u32).wrapping_mul(17).wrapping_add(self.seed);
        (min + unit(hash32(key)) * (max - min)).floor()
    }

    fn base_elevation(&self, global_x: i64, height: u32) -> f64 {
        let step = i64::from(self.params.coarse_step.max(1));
        let anchor = global_x.div_euclid(step);
        let t = (global_x - anchor * step) as f64 / step as f64;
        lerp(
            self.anchor_elevation(anchor, height),
            self.anchor_elevation(anchor + 1, height),
            t,
        )
    }

    fn biased_elevation(&self, biome: Biome, base: f64, sea_level: f64) -> f64 {
        match biome {
            Biome::Ocean => sea_level,
            Biome::Plains => lerp(base, sea_level, self.params.plains_pull),
            Biome::Mountains => base - f64::from(self.params.mountain_lift),
            Biome::Forest | Biome::Desert => base,
        }
    }

    fn fill_column(&self, global_x: i64, height: u32, profile: &ColumnProfile) -> Vec<BlockId> {
        let mut cells = vec![BlockId::Empty; height as usize];
        let biome = profile.blend.primary;
        let water = if biome == Biome::Ocean {
            self.params.water_depth
        } else {
            0
        };

        for row in profile.surface_row..height {
            let depth = row - profile.surface_row;
            let index = row as usize;
            if depth < water {
                cells[index] = BlockId::Water;
                continue;
            }

            let ground_depth = depth - water;
            cells[index] = if ground_depth == 0 {
                profile.surface_block
            } else if ground_depth < self.params.dirt_depth {
                biome.soil_block()
            } else if ground_depth < self.params.stone_depth {
                self.stone_or_ore(global_x, i64::from(row))
            } else {
                BlockId::Stone
            };

            if ground_depth >= 1 && self.is_cave(global_x, i64::from(row)) {
                cells[index] = BlockId::Empty;
            }
        }
        cells
    }

    fn stone_or_ore(&self, global_x: i64, row: i64) -> BlockId {
        let roll = unit(hash_cell(SALT_ORE_ROLL, self.seed, global_x, row));
        if roll < self.params.ore_chance {
            let kind = hash_cell(SALT_ORE_KIND, self.seed, global_x, row);
            BlockId::ORES[(kind % BlockId::ORES.len() as u32) as usize]
        } else {
            BlockId::Stone
        }
    }

    fn is_cave(&self, global_x: i64, row: i64) -> bool {
        lattice_noise(SALT_CAVE, self.seed, global_x, row, self.params.cave_scale)
            < self.params.cave_threshold
    }

    fn tree_height(&self, global_x: i64, profile: &ColumnProfile) -> Option<u32> {
        if profile.blend.primary != Biome::Forest || profile.surface_block != BlockId::Dirt {
            return None;
        }
        let roll = unit(hash_cell(SALT_TREE_ROLL, self.seed, global_x, 0));
        (roll < self.params.tree_chance)
            .then(|| 3 + hash_cell(SALT_TREE_HEIGHT, self.seed, global_x, 0) % 3)
    }

    fn cactus_height(&self, global_x: i64, profile: &ColumnProfile) -> Option<u32> {
        if profile.blend.primary != Biome::Desert || profile.surface_block != BlockId::Sand {
            return None;
        }
        let roll = unit(hash_cell(SALT_CACTUS_ROLL, self.seed, global_x, 0));
        (roll < self.params.cactus_chance)
            .then(|| 2 + hash_cell(SALT_CACTUS_HEIGHT, self.seed, global_x, 0) % 2)
    }
}
