#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Strata tile-world simulation.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots such as [`TileGridView`] and [`MobView`], and respond exclusively
//! with new command batches.

mod blocks;
mod catalog;
mod grid;
mod inventory;

use serde::{Deserialize, Serialize};

pub use blocks::{Biome, BlockId, Rgb};
pub use catalog::{BlockCatalog, CatalogError, ItemCategory, ItemInfo, MIN_MINING_TIME};
pub use grid::{GridError, TileCoord, TileGrid, TileGridView};
pub use inventory::{Hotbar, Inventory, HOTBAR_SLOTS, INVENTORY_CAPACITY};

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Runs the player phase of a tick: world extension check, player
    /// physics, vitals and action resolution.
    Step {
        /// Input bits supplied for this tick.
        intent: ActionIntent,
    },
    /// Selects the hotbar slot whose item the use action applies.
    SelectHotbarSlot {
        /// Zero-based hotbar slot index.
        slot: usize,
    },
    /// Moves a held inventory item into the first empty hotbar slot.
    ShiftToHotbar {
        /// Name of the item to shift.
        item: String,
    },
    /// Splices freshly generated columns onto one edge ahead of the player.
    ExtendWorld {
        /// Edge that receives the columns.
        side: ExtensionSide,
        /// Number of columns to generate.
        columns: u32,
    },
    /// Overrides the player's facing, used for aiming up or down.
    SetFacing {
        /// Facing to adopt.
        facing: Facing,
    },
    /// Requests that a mob be spawned on the surface of a column.
    SpawnMob {
        /// Class of the mob to create.
        class: MobClass,
        /// Local column the mob is placed in.
        column: u32,
    },
    /// Supplies the movement decision a mob executes on the next advance.
    SteerMob {
        /// Mob receiving the steering decision.
        mob: MobId,
        /// Horizontal displacement in pixels.
        horizontal: i32,
        /// Whether the mob should jump.
        jump: bool,
    },
    /// Requests that a ranged mob launch a projectile.
    FireProjectile {
        /// Mob launching the projectile.
        mob: MobId,
        /// Horizontal projectile speed in pixels per tick.
        velocity_x: i32,
        /// Vertical projectile speed in pixels per tick.
        velocity_y: i32,
    },
    /// Integrates every mob, resolves melee contact and ticks cooldowns.
    AdvanceMobs,
    /// Moves every projectile and resolves its collisions.
    AdvanceProjectiles,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the player phase of a new tick started.
    TimeAdvanced {
        /// Number of ticks elapsed since the world was created.
        tick: u64,
    },
    /// Reports that new terrain columns were spliced into the grid.
    WorldExtended {
        /// Edge that received the columns.
        side: ExtensionSide,
        /// Number of columns appended.
        columns: u32,
        /// Global column index of local column zero after the extension.
        x_offset: i64,
    },
    /// Reports that a block finished mining and became empty.
    BlockMined {
        /// Local tile that was cleared.
        tile: TileCoord,
        /// Block that occupied the tile.
        block: BlockId,
        /// Item credited to the inventory, if any.
        item: Option<String>,
    },
    /// Reports that the player placed a block.
    BlockPlaced {
        /// Local tile that received the block.
        tile: TileCoord,
        /// Block that was placed.
        block: BlockId,
    },
    /// Reports that the player ate a food item.
    FoodEaten {
        /// Name of the consumed item.
        item: String,
    },
    /// Reports that an item could not be credited because every slot is taken.
    InventoryFull {
        /// Item that was rejected.
        item: String,
    },
    /// Announces that a mob entered the world.
    MobSpawned {
        /// Identifier assigned to the mob.
        mob: MobId,
        /// Class of the spawned mob.
        class: MobClass,
        /// Pixel rectangle occupied at spawn.
        rect: PixelRect,
    },
    /// Reports damage dealt to a mob.
    MobDamaged {
        /// Mob that was struck.
        mob: MobId,
        /// Damage applied.
        damage: i32,
        /// Health left after the hit.
        remaining: i32,
    },
    /// Reports that a mob reached zero health and was removed.
    MobKilled {
        /// Mob that was removed.
        mob: MobId,
        /// Class of the removed mob.
        class: MobClass,
    },
    /// Reports that a ranged mob launched a projectile.
    ProjectileFired {
        /// Identifier assigned to the projectile.
        projectile: ProjectileId,
        /// Mob that fired it.
        mob: MobId,
    },
    /// Reports that a projectile left play.
    ProjectileRemoved {
        /// Projectile that was removed.
        projectile: ProjectileId,
    },
    /// Reports that the player lost health.
    PlayerDamaged {
        /// Health removed.
        amount: f32,
        /// Cause of the damage.
        source: DamageSource,
    },
    /// Reports that food was credited after a passive mob died.
    FoodCredited {
        /// Food units credited.
        amount: u32,
    },
    /// Reports that the player's health reached zero.
    PlayerDied,
}

/// Cause attached to [`Event::PlayerDamaged`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DamageSource {
    /// Contact with a melee mob.
    Melee(MobId),
    /// Hit by a projectile.
    Projectile(ProjectileId),
    /// Food meter empty.
    Starvation,
    /// Oxygen meter empty.
    Drowning,
}

/// World edge that receives new columns during extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExtensionSide {
    /// Columns prepended before local column zero.
    Left,
    /// Columns appended after the last column.
    Right,
}

/// Five independent input bits consumed once per tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActionIntent {
    /// Walk left.
    pub move_left: bool,
    /// Walk right.
    pub move_right: bool,
    /// Jump, or swim upward while submerged.
    pub jump: bool,
    /// Apply the selected hotbar item to the aimed tile.
    pub use_item: bool,
    /// Mine the aimed tile or strike whatever stands in it.
    pub destroy: bool,
}

impl ActionIntent {
    /// Intent with every bit cleared.
    pub const IDLE: Self = Self::from_bits(0);

    /// Decodes intent bits ordered left, right, jump, use, destroy from the
    /// least significant bit upward.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        Self {
            move_left: bits & 0b0_0001 != 0,
            move_right: bits & 0b0_0010 != 0,
            jump: bits & 0b0_0100 != 0,
            use_item: bits & 0b0_1000 != 0,
            destroy: bits & 0b1_0000 != 0,
        }
    }

    /// Encodes the intent using the layout accepted by [`Self::from_bits`].
    #[must_use]
    pub const fn to_bits(self) -> u8 {
        (self.move_left as u8)
            | (self.move_right as u8) << 1
            | (self.jump as u8) << 2
            | (self.use_item as u8) << 3
            | (self.destroy as u8) << 4
    }

    /// Horizontal direction requested by the move bits. Opposing bits cancel.
    #[must_use]
    pub const fn horizontal(self) -> i32 {
        match (self.move_left, self.move_right) {
            (true, false) => -1,
            (false, true) => 1,
            _ => 0,
        }
    }

    /// Reports whether any bit that costs food is set.
    #[must_use]
    pub const fn is_exerting(self) -> bool {
        self.move_left || self.move_right || self.jump
    }
}

/// Unit direction used to aim at the neighbouring tile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Facing {
    /// Toward lower columns.
    Left,
    /// Toward higher columns.
    #[default]
    Right,
    /// Toward lower rows.
    Up,
    /// Toward higher rows.
    Down,
}

impl Facing {
    /// Column and row deltas of the facing.
    #[must_use]
    pub const fn vector(self) -> (i32, i32) {
        match self {
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
            Self::Up => (0, -1),
            Self::Down => (0, 1),
        }
    }
}

/// Axis-aligned rectangle in integer pixel coordinates. Y grows downward.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelRect {
    x: i32,
    y: i32,
    width: i32,
    height: i32,
}

impl PixelRect {
    /// Creates a rectangle from its top-left corner and size.
    #[must_use]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle covering a whole tile.
    #[must_use]
    pub const fn from_tile(tile: TileCoord, tile_size: i32) -> Self {
        Self::new(
            tile.column() * tile_size,
            tile.row() * tile_size,
            tile_size,
            tile_size,
        )
    }

    /// Width in pixels.
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.height
    }

    /// Leftmost pixel column.
    #[must_use]
    pub const fn left(&self) -> i32 {
        self.x
    }

    /// One past the rightmost pixel column.
    #[must_use]
    pub const fn right(&self) -> i32 {
        self.x + self.width
    }

    /// Topmost pixel row.
    #[must_use]
    pub const fn top(&self) -> i32 {
        self.y
    }

    /// One past the bottom pixel row.
    #[must_use]
    pub const fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// Horizontal center, rounded toward the left edge.
    #[must_use]
    pub const fn center_x(&self) -> i32 {
        self.x + self.width / 2
    }

    /// Vertical center, rounded toward the top edge.
    #[must_use]
    pub const fn center_y(&self) -> i32 {
        self.y + self.height / 2
    }

    /// Moves the rectangle so its left edge sits at `left`.
    pub fn set_left(&mut self, left: i32) {
        self.x = left;
    }

    /// Moves the rectangle so its right edge sits at `right`.
    pub fn set_right(&mut self, right: i32) {
        self.x = right - self.width;
    }

    /// Moves the rectangle so its top edge sits at `top`.
    pub fn set_top(&mut self, top: i32) {
        self.y = top;
    }

    /// Moves the rectangle so its bottom edge sits at `bottom`.
    pub fn set_bottom(&mut self, bottom: i32) {
        self.y = bottom - self.height;
    }

    /// Displaces the rectangle by the provided pixel deltas.
    pub fn translate(&mut self, dx: i32, dy: i32) {
        self.x += dx;
        self.y += dy;
    }

    /// Reports whether the rectangles share interior area. Touching edges do
    /// not count and empty rectangles never intersect.
    #[must_use]
    pub const fn intersects(&self, other: &PixelRect) -> bool {
        self.width > 0
            && self.height > 0
            && other.width > 0
            && other.height > 0
            && self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// Tile containing the rectangle's center.
    #[must_use]
    pub const fn center_tile(&self, tile_size: i32) -> TileCoord {
        TileCoord::new(
            self.center_x().div_euclid(tile_size),
            self.center_y().div_euclid(tile_size),
        )
    }
}

/// Two-dimensional velocity in pixels per tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    /// Horizontal component. Positive is rightward.
    pub x: f32,
    /// Vertical component. Positive is downward.
    pub y: f32,
}

impl Velocity {
    /// Velocity at rest.
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Creates a velocity from its components.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Bounded scalar resource saturated to `[0, max]` on every mutation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Meter {
    value: f32,
    max: f32,
}

impl Meter {
    /// Creates a full meter with the provided maximum.
    #[must_use]
    pub fn full(max: f32) -> Self {
        let max = max.max(0.0);
        Self { value: max, max }
    }

    /// Current value.
    #[must_use]
    pub const fn value(&self) -> f32 {
        self.value
    }

    /// Upper bound.
    #[must_use]
    pub const fn max(&self) -> f32 {
        self.max
    }

    /// Raises the value, saturating at the maximum.
    pub fn add(&mut self, amount: f32) {
        self.value = (self.value + amount).clamp(0.0, self.max);
    }

    /// Lowers the value, saturating at zero.
    pub fn drain(&mut self, amount: f32) {
        self.value = (self.value - amount).clamp(0.0, self.max);
    }

    /// Restores the value to the maximum.
    pub fn fill(&mut self) {
        self.value = self.max;
    }

    /// Reports whether the value reached zero.
    #[must_use]
    pub fn is_depleted(&self) -> bool {
        self.value <= 0.0
    }

    /// Reports whether the value sits at the maximum.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.value >= self.max
    }
}

/// Unique identifier assigned to a mob.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MobId(u32);

impl MobId {
    /// Creates a new identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectileId(u32);

impl ProjectileId {
    /// Creates a new identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Population a mob counts toward for spawn caps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MobCategory {
    /// Hostile mobs that chase and damage the player.
    Enemy,
    /// Harmless mobs that wander and drop food.
    Passive,
}

/// Harmless creature varieties.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PassiveSpecies {
    /// Small, fragile, drops one food.
    Bunny,
    /// Sturdier, drops two food.
    Chicken,
}

impl PassiveSpecies {
    /// Every species in uniform-selection order.
    pub const ALL: [PassiveSpecies; 2] = [PassiveSpecies::Bunny, PassiveSpecies::Chicken];

    /// Food credited when the mob dies.
    #[must_use]
    pub const fn food_drop(self) -> u32 {
        match self {
            Self::Bunny => 1,
            Self::Chicken => 2,
        }
    }
}

/// Static description of a mob used when requesting a spawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MobClass {
    /// Chases the player and hurts it on contact.
    Melee,
    /// Chases the player and fires projectiles from range.
    Ranged,
    /// Wanders and drops food when killed.
    Passive(PassiveSpecies),
}

impl MobClass {
    /// Enemy classes in uniform-selection order.
    pub const ENEMIES: [MobClass; 2] = [MobClass::Melee, MobClass::Ranged];

    /// Population the class counts toward.
    #[must_use]
    pub const fn category(self) -> MobCategory {
        match self {
            Self::Melee | Self::Ranged => MobCategory::Enemy,
            Self::Passive(_) => MobCategory::Passive,
        }
    }

    /// Health the mob spawns with.
    #[must_use]
    pub const fn base_health(self) -> i32 {
        match self {
            Self::Melee => 30,
            Self::Ranged => 20,
            Self::Passive(PassiveSpecies::Bunny) => 10,
            Self::Passive(PassiveSpecies::Chicken) => 15,
        }
    }

    /// Horizontal pixels travelled per tick while following a path.
    #[must_use]
    pub const fn speed(self) -> i32 {
        match self {
            Self::Melee => 3,
            Self::Ranged | Self::Passive(_) => 1,
        }
    }

    /// Presentation color.
    #[must_use]
    pub const fn color(self) -> Rgb {
        match self {
            Self::Melee => Rgb::from_rgb(200, 0, 0),
            Self::Ranged => Rgb::from_rgb(0, 0, 200),
            Self::Passive(PassiveSpecies::Bunny) => Rgb::from_rgb(255, 200, 200),
            Self::Passive(PassiveSpecies::Chicken) => Rgb::from_rgb(255, 255, 0),
        }
    }
}

/// Live mob variant with its kind-specific state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MobKind {
    /// Contact-damage chaser.
    Melee,
    /// Projectile thrower.
    Ranged {
        /// Ticks left before another projectile may be fired.
        cooldown: u32,
    },
    /// Wandering food source.
    Passive {
        /// Creature variety.
        species: PassiveSpecies,
        /// Food credited on death.
        food_drop: u32,
    },
}

impl MobKind {
    /// Fresh state for a newly spawned mob of the provided class.
    #[must_use]
    pub const fn spawn(class: MobClass) -> Self {
        match class {
            MobClass::Melee => Self::Melee,
            MobClass::Ranged => Self::Ranged { cooldown: 0 },
            MobClass::Passive(species) => Self::Passive {
                species,
                food_drop: species.food_drop(),
            },
        }
    }

    /// Static class of the mob.
    #[must_use]
    pub const fn class(&self) -> MobClass {
        match self {
            Self::Melee => MobClass::Melee,
            Self::Ranged { .. } => MobClass::Ranged,
            Self::Passive { species, .. } => MobClass::Passive(*species),
        }
    }

    /// Population the mob counts toward.
    #[must_use]
    pub const fn category(&self) -> MobCategory {
        self.class().category()
    }
}

/// Immutable representation of the player actor used for queries.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayerSnapshot {
    /// Pixel rectangle occupied by the player.
    pub rect: PixelRect,
    /// Current velocity.
    pub velocity: Velocity,
    /// Direction used to aim at a neighbouring tile.
    pub facing: Facing,
    /// Health meter.
    pub health: Meter,
    /// Food meter.
    pub food: Meter,
    /// Oxygen meter.
    pub oxygen: Meter,
    /// Interaction radius in tiles.
    pub reach: u32,
    /// Whether the player overlapped water after the last integration.
    pub in_water: bool,
}

impl PlayerSnapshot {
    /// Minimal numeric summary of the player.
    #[must_use]
    pub fn observation(&self) -> Observation {
        Observation {
            x: self.rect.left() as f32,
            y: self.rect.top() as f32,
            vx: self.velocity.x,
            vy: self.velocity.y,
        }
    }

    /// Tile holding the player's feet, used as the chase target by enemies.
    #[must_use]
    pub const fn standing_tile(&self, tile_size: i32) -> TileCoord {
        feet_tile(&self.rect, tile_size)
    }
}

/// Per-tick numeric observation of the player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Left edge in pixels.
    pub x: f32,
    /// Top edge in pixels.
    pub y: f32,
    /// Horizontal velocity.
    pub vx: f32,
    /// Vertical velocity.
    pub vy: f32,
}

impl Observation {
    /// Packs the observation as `[x, y, vx, vy]`.
    #[must_use]
    pub const fn to_array(self) -> [f32; 4] {
        [self.x, self.y, self.vx, self.vy]
    }
}

/// Immutable representation of a single mob's state used for queries.
#[derive(Clone, Debug, PartialEq)]
pub struct MobSnapshot {
    /// Unique identifier assigned to the mob.
    pub id: MobId,
    /// Variant with its kind-specific state.
    pub kind: MobKind,
    /// Pixel rectangle occupied by the mob.
    pub rect: PixelRect,
    /// Vertical velocity.
    pub velocity_y: f32,
    /// Remaining health.
    pub health: i32,
    /// Whether a solid tile lies directly beneath the mob's footprint.
    pub grounded: bool,
}

impl MobSnapshot {
    /// Tile holding the mob's feet, the start of its path searches.
    #[must_use]
    pub const fn standing_tile(&self, tile_size: i32) -> TileCoord {
        feet_tile(&self.rect, tile_size)
    }
}

/// Read-only snapshot describing all live mobs.
#[derive(Clone, Debug, Default)]
pub struct MobView {
    snapshots: Vec<MobSnapshot>,
}

impl MobView {
    /// Creates a new mob view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<MobSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured mob snapshots in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &MobSnapshot> {
        self.snapshots.iter()
    }

    /// Snapshot of the provided mob, if it is alive.
    #[must_use]
    pub fn get(&self, mob: MobId) -> Option<&MobSnapshot> {
        self.snapshots
            .binary_search_by_key(&mob, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Number of live mobs belonging to the category.
    #[must_use]
    pub fn count(&self, category: MobCategory) -> usize {
        self.snapshots
            .iter()
            .filter(|snapshot| snapshot.kind.category() == category)
            .count()
    }

    /// Number of live mobs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no mob is alive.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<MobSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a projectile used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProjectileSnapshot {
    /// Unique identifier assigned to the projectile.
    pub id: ProjectileId,
    /// Pixel rectangle occupied by the projectile.
    pub rect: PixelRect,
    /// Horizontal speed in pixels per tick.
    pub velocity_x: i32,
    /// Vertical speed in pixels per tick.
    pub velocity_y: i32,
}

const fn feet_tile(rect: &PixelRect, tile_size: i32) -> TileCoord {
    TileCoord::new(
        rect.center_x().div_euclid(tile_size),
        (rect.bottom() - 1).div_euclid(tile_size),
    )
}
