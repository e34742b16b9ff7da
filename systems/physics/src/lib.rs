#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Axis-separated collision physics for the player and tile-sampled physics for mobs.
//!
//! The player is resolved against rectangle lists derived from the tile grid
//! while mobs sample the grid directly. Both paths move horizontally before
//! vertically, truncate velocities to whole pixels and snap the leading edge to
//! the blocking tile.

use serde::{Deserialize, Serialize};
use strata_core::{ActionIntent, BlockId, Meter, PixelRect, TileCoord, TileGridView, Velocity};

/// Tunable constants for movement and vitals.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Downward acceleration applied to the player each tick.
    pub gravity: f32,
    /// Downward acceleration applied while the player overlaps water.
    pub water_gravity: f32,
    /// Horizontal player speed while a move bit is held.
    pub walk_speed: f32,
    /// Vertical velocity applied by a grounded jump.
    pub jump_velocity: f32,
    /// Vertical velocity applied by a swim stroke.
    pub swim_velocity: f32,
    /// Downward acceleration applied to mobs.
    pub mob_gravity: f32,
    /// Terminal falling speed of mobs.
    pub mob_max_fall_speed: f32,
    /// Vertical velocity applied by a mob jump.
    pub mob_jump_velocity: f32,
    /// Food consumed per tick while exerting.
    pub food_cost: f32,
    /// Health lost per tick while the food meter is empty.
    pub starvation_damage: f32,
    /// Oxygen lost per tick while submerged.
    pub oxygen_drain: f32,
    /// Health lost per tick while submerged with no oxygen left.
    pub drowning_damage: f32,
    /// Oxygen recovered per tick out of water.
    pub oxygen_regen: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 0.8,
            water_gravity: 0.2,
            walk_speed: 5.0,
            jump_velocity: -15.0,
            swim_velocity: -5.0,
            mob_gravity: 0.8,
            mob_max_fall_speed: 10.0,
            mob_jump_velocity: -13.0,
            food_cost: 0.05,
            starvation_damage: 0.1,
            oxygen_drain: 1.0,
            drowning_damage: 0.5,
            oxygen_regen: 2.0,
        }
    }
}

/// Extent of the world in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorldBounds {
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
}

impl WorldBounds {
    /// Bounds covering the grid seen through the view.
    #[must_use]
    pub fn of(view: TileGridView<'_>, tile_size: i32) -> Self {
        let (columns, rows) = view.dimensions();
        Self {
            width: i32::try_from(columns).unwrap_or(i32::MAX).saturating_mul(tile_size),
            height: i32::try_from(rows).unwrap_or(i32::MAX).saturating_mul(tile_size),
        }
    }

    /// Moves the rectangle inside the bounds, favouring the top-left edges.
    pub fn clamp(&self, rect: &mut PixelRect) {
        let x = rect.left().min(self.width - rect.width()).max(0);
        let y = rect.top().min(self.height - rect.height()).max(0);
        rect.set_left(x);
        rect.set_top(y);
    }
}

/// Solid and water rectangles derived from the tile grid.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Collidables {
    solids: Vec<PixelRect>,
    water: Vec<PixelRect>,
}

impl Collidables {
    /// Rebuilds both rectangle lists from the grid.
    #[must_use]
    pub fn from_grid(view: TileGridView<'_>, tile_size: i32) -> Self {
        let (columns, rows) = view.dimensions();
        let mut collidables = Self::default();
        for row in 0..rows as i32 {
            for column in 0..columns as i32 {
                let tile = TileCoord::new(column, row);
                match view.block(tile) {
                    Some(BlockId::Empty) | None => {}
                    Some(BlockId::Water) => {
                        collidables.water.push(PixelRect::from_tile(tile, tile_size));
                    }
                    Some(_) => collidables
                        .solids
                        .push(PixelRect::from_tile(tile, tile_size)),
                }
            }
        }
        collidables
    }

    /// Rectangles that block movement.
    #[must_use]
    pub fn solids(&self) -> &[PixelRect] {
        &self.solids
    }

    /// Rectangles of swimmable water.
    #[must_use]
    pub fn water(&self) -> &[PixelRect] {
        &self.water
    }

    /// Reports whether the rectangle overlaps any water tile.
    #[must_use]
    pub fn in_water(&self, rect: &PixelRect) -> bool {
        self.water.iter().any(|water| water.intersects(rect))
    }
}

/// Rectangle and velocity advanced by the integrators.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Body {
    /// Pixel rectangle occupied by the body.
    pub rect: PixelRect,
    /// Current velocity.
    pub velocity: Velocity,
}

impl Body {
    /// Creates a body at rest.
    #[must_use]
    pub const fn at_rest(rect: PixelRect) -> Self {
        Self {
            rect,
            velocity: Velocity::ZERO,
        }
    }
}

/// Adds gravity and moves the body one axis at a time against the solids.
///
/// Each axis moves by the truncated velocity; every overlapped solid snaps the
/// leading edge back to the solid's near edge and zeroes that velocity
/// component. The result is finally clamped inside the world bounds.
pub fn integrate(body: &mut Body, gravity: f32, solids: &[PixelRect], bounds: WorldBounds) {
    body.velocity.y += gravity;

    body.rect.translate(body.velocity.x as i32, 0);
    for solid in solids {
        if body.rect.intersects(solid) {
            if body.velocity.x > 0.0 {
                body.rect.set_right(solid.left());
            } else if body.velocity.x < 0.0 {
                body.rect.set_left(solid.right());
            }
            body.velocity.x = 0.0;
        }
    }

    body.rect.translate(0, body.velocity.y as i32);
    for solid in solids {
        if body.rect.intersects(solid) {
            if body.velocity.y > 0.0 {
                body.rect.set_bottom(solid.top());
            } else if body.velocity.y < 0.0 {
                body.rect.set_top(solid.bottom());
            }
            body.velocity.y = 0.0;
        }
    }

    bounds.clamp(&mut body.rect);
}

/// Reports whether either footprint tile beneath the rectangle is solid.
///
/// Standing on the bottom edge of the grid always counts as grounded;
/// otherwise a body moving upward never is.
#[must_use]
pub fn is_grounded(rect: &PixelRect, velocity_y: f32, view: TileGridView<'_>, tile_size: i32) -> bool {
    let below = rect.bottom().div_euclid(tile_size);
    let (_, rows) = view.dimensions();
    if i64::from(below) >= i64::from(rows) {
        return true;
    }
    let left = TileCoord::new(rect.left().div_euclid(tile_size), below);
    let right = TileCoord::new((rect.right() - 1).div_euclid(tile_size), below);
    (view.is_solid(left) || view.is_solid(right)) && velocity_y >= 0.0
}

/// Outcome of a single player integration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayerMotion {
    /// Whether the player overlapped water before moving.
    pub started_in_water: bool,
    /// Whether the player overlaps water after moving.
    pub in_water: bool,
}

/// Applies the movement bits, jumps or swims, and integrates the player.
pub fn advance_player(
    body: &mut Body,
    intent: ActionIntent,
    config: &PhysicsConfig,
    collidables: &Collidables,
    view: TileGridView<'_>,
    tile_size: i32,
) -> PlayerMotion {
    let started_in_water = collidables.in_water(&body.rect);

    body.velocity.x = intent.horizontal() as f32 * config.walk_speed;
    if intent.jump {
        if started_in_water {
            body.velocity.y = config.swim_velocity;
        } else if is_grounded(&body.rect, body.velocity.y, view, tile_size) {
            body.velocity.y = config.jump_velocity;
        }
    }

    let gravity = if started_in_water {
        config.water_gravity
    } else {
        config.gravity
    };
    integrate(
        body,
        gravity,
        collidables.solids(),
        WorldBounds::of(view, tile_size),
    );

    PlayerMotion {
        started_in_water,
        in_water: collidables.in_water(&body.rect),
    }
}

/// Bounded health, food and oxygen of the player.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vitals {
    /// Health meter. The session ends when it empties.
    pub health: Meter,
    /// Food meter drained by exertion.
    pub food: Meter,
    /// Oxygen meter drained while submerged.
    pub oxygen: Meter,
}

impl Vitals {
    /// Full meters with the provided maxima.
    #[must_use]
    pub fn full(max_health: f32, max_food: f32, max_oxygen: f32) -> Self {
        Self {
            health: Meter::full(max_health),
            food: Meter::full(max_food),
            oxygen: Meter::full(max_oxygen),
        }
    }
}

/// Health lost during a vitals update, split by cause.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct VitalsDamage {
    /// Health lost to an empty food meter.
    pub starvation: f32,
    /// Health lost to an empty oxygen meter.
    pub drowning: f32,
}

/// Runs the per-tick food and oxygen bookkeeping.
pub fn deplete_vitals(
    vitals: &mut Vitals,
    exerting: bool,
    in_water: bool,
    config: &PhysicsConfig,
) -> VitalsDamage {
    let mut damage = VitalsDamage::default();

    if exerting && !vitals.food.is_depleted() {
        vitals.food.drain(config.food_cost);
    }
    if vitals.food.is_depleted() {
        damage.starvation = drain_health(&mut vitals.health, config.starvation_damage);
    }

    if in_water {
        vitals.oxygen.drain(config.oxygen_drain);
        if vitals.oxygen.is_depleted() {
            damage.drowning = drain_health(&mut vitals.health, config.drowning_damage);
        }
    } else {
        vitals.oxygen.add(config.oxygen_regen);
    }

    damage
}

fn drain_health(health: &mut Meter, amount: f32) -> f32 {
    let before = health.value();
    health.drain(amount);
    before - health.value()
}

/// Reports whether any tile directly beneath the mob's footprint is solid.
#[must_use]
pub fn mob_grounded(rect: &PixelRect, view: TileGridView<'_>, tile_size: i32) -> bool {
    let below = rect.bottom().div_euclid(tile_size);
    footprint_columns(rect, tile_size).any(|column| view.is_solid(TileCoord::new(column, below)))
}

/// Moves a mob by a whole-pixel horizontal step, optionally jumps, applies
/// capped gravity and resolves both axes against sampled tiles.
pub fn advance_mob(
    body: &mut Body,
    horizontal: i32,
    jump: bool,
    config: &PhysicsConfig,
    view: TileGridView<'_>,
    tile_size: i32,
) {
    let bounds = WorldBounds::of(view, tile_size);

    body.rect.translate(horizontal, 0);
    let x = body.rect.left().min(bounds.width - body.rect.width()).max(0);
    body.rect.set_left(x);
    let left = body.rect.left().div_euclid(tile_size);
    let right = (body.rect.right() - 1).div_euclid(tile_size);
    for row in footprint_rows(&body.rect, tile_size) {
        if horizontal > 0 && view.is_solid(TileCoord::new(right, row)) {
            body.rect.set_right(right * tile_size);
            break;
        }
        if horizontal < 0 && view.is_solid(TileCoord::new(left, row)) {
            body.rect.set_left((left + 1) * tile_size);
            break;
        }
    }

    if jump {
        body.velocity.y = config.mob_jump_velocity;
    }
    body.velocity.y = (body.velocity.y + config.mob_gravity).min(config.mob_max_fall_speed);
    body.rect.translate(0, body.velocity.y as i32);
    let y = body.rect.top().min(bounds.height - body.rect.height()).max(0);
    body.rect.set_top(y);

    let top = body.rect.top().div_euclid(tile_size);
    let bottom = (body.rect.bottom() - 1).div_euclid(tile_size);
    if body.velocity.y > 0.0 {
        if footprint_columns(&body.rect, tile_size)
            .any(|column| view.is_solid(TileCoord::new(column, bottom)))
        {
            body.rect.set_bottom(bottom * tile_size);
            body.velocity.y = 0.0;
        }
    } else if body.velocity.y < 0.0
        && footprint_columns(&body.rect, tile_size)
            .any(|column| view.is_solid(TileCoord::new(column, top)))
    {
        body.rect.set_top((top + 1) * tile_size);
        body.velocity.y = 0.0;
    }
}

fn footprint_columns(rect: &PixelRect, tile_size: i32) -> std::ops::RangeInclusive<i32> {
    rect.left().div_euclid(tile_size)..=(rect.right() - 1).div_euclid(tile_size)
}

fn footprint_rows(rect: &PixelRect, tile_size: i32) -> std::ops::RangeInclusive<i32> {
    rect.top().div_euclid(tile_size)..=(rect.bottom() - 1).div_euclid(tile_size)
}
