#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state for the Strata tile-world simulation.
//!
//! The world exclusively owns the tile grid, the player, every mob and every
//! projectile. All mutation flows through [`apply`], which executes a single
//! [`Command`] and appends the resulting [`Event`] values. Systems and adapters
//! observe the world through the read-only [`query`] module.

mod actions;
mod extension;
mod mobs;

use log::{info, trace};
use serde::{Deserialize, Serialize};
use strata_core::{
    ActionIntent, BlockCatalog, Command, DamageSource, Event, Facing, Hotbar, Inventory,
    PixelRect, TileGrid,
};
use strata_system_physics::{
    advance_player, deplete_vitals, Body, Collidables, PhysicsConfig, Vitals,
};
use strata_system_terrain::TerrainField;

use crate::{
    actions::MiningState,
    mobs::{Mob, Projectile},
};

/// Dimensions, player loadout and combat constants of a world.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Columns generated when the world is created.
    pub columns: u32,
    /// Rows of the grid, fixed for the world's lifetime.
    pub rows: u32,
    /// Side length of a tile in pixels.
    pub tile_size: i32,
    /// Pixel x of the player's left edge at spawn.
    pub spawn_x: i32,
    /// Player width in pixels.
    pub player_width: i32,
    /// Player height in pixels.
    pub player_height: i32,
    /// Maximum player health.
    pub max_health: f32,
    /// Maximum player food.
    pub max_food: f32,
    /// Maximum player oxygen.
    pub max_oxygen: f32,
    /// Interaction radius in tiles.
    pub reach: u32,
    /// Item the player starts with, assigned to hotbar slot zero.
    pub starting_item: String,
    /// Units of the starting item.
    pub starting_count: u32,
    /// Inventory item credited when a passive mob dies.
    pub food_item: String,
    /// Distance in tiles from an edge that triggers world extension.
    pub extension_margin: i32,
    /// Damage of a bare-handed strike.
    pub bare_hand_damage: i32,
    /// Health a melee mob removes per tick of contact.
    pub melee_contact_damage: f32,
    /// Health a projectile removes on impact.
    pub projectile_damage: f32,
    /// Side length of a projectile in pixels.
    pub projectile_size: i32,
    /// Ticks a ranged mob waits between shots.
    pub ranged_cooldown: u32,
    /// Movement and vitals constants.
    pub physics: PhysicsConfig,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            columns: 20,
            rows: 30,
            tile_size: 32,
            spawn_x: 50,
            player_width: 19,
            player_height: 28,
            max_health: 100.0,
            max_food: 100.0,
            max_oxygen: 100.0,
            reach: 3,
            starting_item: "dirt".to_owned(),
            starting_count: 10,
            food_item: "food".to_owned(),
            extension_margin: 5,
            bare_hand_damage: 10,
            melee_contact_damage: 1.0,
            projectile_damage: 5.0,
            projectile_size: 8,
            ranged_cooldown: 90,
            physics: PhysicsConfig::default(),
        }
    }
}

#[derive(Clone, Debug)]
struct Player {
    body: Body,
    facing: Facing,
    vitals: Vitals,
    reach: u32,
    in_water: bool,
    inventory: Inventory,
    hotbar: Hotbar,
}

impl Player {
    fn spawn(config: &WorldConfig, grid: &TileGrid) -> Self {
        let tile_size = config.tile_size;
        let column = (config.spawn_x + config.player_width / 2).div_euclid(tile_size);
        let surface = extension::find_surface_y(grid.view(), column, tile_size);
        let mut rect = PixelRect::new(config.spawn_x, 0, config.player_width, config.player_height);
        rect.set_bottom(surface + tile_size);

        let mut inventory = Inventory::new();
        let mut hotbar = Hotbar::new();
        if config.starting_count > 0 && inventory.add(&config.starting_item, config.starting_count) {
            let _ = hotbar.set(0, &config.starting_item);
        }

        Self {
            body: Body::at_rest(rect),
            facing: Facing::Right,
            vitals: Vitals::full(config.max_health, config.max_food, config.max_oxygen),
            reach: config.reach,
            in_water: false,
            inventory,
            hotbar,
        }
    }
}

/// Represents the authoritative tile world.
#[derive(Debug)]
pub struct World {
    config: WorldConfig,
    catalog: BlockCatalog,
    terrain: TerrainField,
    grid: TileGrid,
    x_offset: i64,
    collidables: Collidables,
    player: Player,
    mining: MiningState,
    mobs: Vec<Mob>,
    projectiles: Vec<Projectile>,
    next_mob_id: u32,
    next_projectile_id: u32,
    tick: u64,
    player_dead: bool,
}

impl World {
    /// Generates the initial grid at global column zero and spawns the player.
    #[must_use]
    pub fn new(config: WorldConfig, catalog: BlockCatalog, terrain: TerrainField) -> Self {
        let grid = terrain.generate(0, config.columns, config.rows);
        Self::with_grid(config, catalog, terrain, grid)
    }

    /// Creates a world around a prepared grid placed at global column zero.
    ///
    /// The terrain field still supplies every column added by extension.
    #[must_use]
    pub fn with_grid(
        config: WorldConfig,
        catalog: BlockCatalog,
        terrain: TerrainField,
        grid: TileGrid,
    ) -> Self {
        let collidables = Collidables::from_grid(grid.view(), config.tile_size);
        let player = Player::spawn(&config, &grid);
        info!(
            "world created: {}x{} tiles, seed {}, player at ({}, {})",
            grid.columns(),
            grid.rows(),
            terrain.seed(),
            player.body.rect.left(),
            player.body.rect.top()
        );
        Self {
            config,
            catalog,
            terrain,
            grid,
            x_offset: 0,
            collidables,
            player,
            mining: MiningState::default(),
            mobs: Vec::new(),
            projectiles: Vec::new(),
            next_mob_id: 0,
            next_projectile_id: 0,
            tick: 0,
            player_dead: false,
        }
    }

    fn step(&mut self, intent: ActionIntent, out_events: &mut Vec<Event>) {
        self.tick = self.tick.saturating_add(1);
        out_events.push(Event::TimeAdvanced { tick: self.tick });

        self.maybe_extend(out_events);

        match intent.horizontal() {
            -1 => self.player.facing = Facing::Left,
            1 => self.player.facing = Facing::Right,
            _ => {}
        }
        let motion = advance_player(
            &mut self.player.body,
            intent,
            &self.config.physics,
            &self.collidables,
            self.grid.view(),
            self.config.tile_size,
        );
        self.player.in_water = motion.in_water;

        let damage = deplete_vitals(
            &mut self.player.vitals,
            intent.is_exerting(),
            motion.in_water,
            &self.config.physics,
        );
        if damage.starvation > 0.0 {
            out_events.push(Event::PlayerDamaged {
                amount: damage.starvation,
                source: DamageSource::Starvation,
            });
        }
        if damage.drowning > 0.0 {
            out_events.push(Event::PlayerDamaged {
                amount: damage.drowning,
                source: DamageSource::Drowning,
            });
        }

        self.resolve_actions(intent, out_events);
        self.check_player_death(out_events);
    }

    fn hurt_player(&mut self, amount: f32, source: DamageSource, out_events: &mut Vec<Event>) {
        let health = &mut self.player.vitals.health;
        let before = health.value();
        health.drain(amount);
        let dealt = before - health.value();
        if dealt > 0.0 {
            out_events.push(Event::PlayerDamaged {
                amount: dealt,
                source,
            });
        }
        self.check_player_death(out_events);
    }

    fn check_player_death(&mut self, out_events: &mut Vec<Event>) {
        if !self.player_dead && self.player.vitals.health.is_depleted() {
            self.player_dead = true;
            info!("player died on tick {}", self.tick);
            out_events.push(Event::PlayerDied);
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Step { intent } => world.step(intent, out_events),
        Command::SelectHotbarSlot { slot } => {
            if !world.player.hotbar.select(slot) {
                trace!("ignoring selection of hotbar slot {slot}");
            }
        }
        Command::ShiftToHotbar { item } => {
            let _ = world.player.hotbar.shift_from(&world.player.inventory, &item);
        }
        Command::ExtendWorld { side, columns } => world.extend(side, columns, out_events),
        Command::SetFacing { facing } => world.player.facing = facing,
        Command::SpawnMob { class, column } => world.spawn_mob(class, column, out_events),
        Command::SteerMob {
            mob,
            horizontal,
            jump,
        } => world.steer_mob(mob, horizontal, jump),
        Command::FireProjectile {
            mob,
            velocity_x,
            velocity_y,
        } => world.fire_projectile(mob, velocity_x, velocity_y, out_events),
        Command::AdvanceMobs => world.advance_mobs(out_events),
        Command::AdvanceProjectiles => world.advance_projectiles(out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use strata_core::{
        BlockCatalog, Hotbar, Inventory, MobView, Observation, PlayerSnapshot,
        ProjectileSnapshot, TileCoord, TileGridView,
    };
    use strata_system_physics::Collidables;

    use super::{extension, World};

    /// Read-only view of the live tile grid.
    #[must_use]
    pub fn tile_grid(world: &World) -> TileGridView<'_> {
        world.grid.view()
    }

    /// Global column index of local column zero.
    #[must_use]
    pub fn x_offset(world: &World) -> i64 {
        world.x_offset
    }

    /// Side length of a tile in pixels.
    #[must_use]
    pub fn tile_size(world: &World) -> i32 {
        world.config.tile_size
    }

    /// Number of player steps executed so far.
    #[must_use]
    pub fn tick(world: &World) -> u64 {
        world.tick
    }

    /// Solid and water rectangles matching the current grid.
    #[must_use]
    pub fn collidables(world: &World) -> &Collidables {
        &world.collidables
    }

    /// Block catalog the world was created with.
    #[must_use]
    pub fn catalog(world: &World) -> &BlockCatalog {
        &world.catalog
    }

    /// Pixel top at which a tile-tall actor stands on the column's surface.
    #[must_use]
    pub fn find_surface_y(world: &World, column: i32) -> i32 {
        extension::find_surface_y(world.grid.view(), column, world.config.tile_size)
    }

    /// Snapshot of the player actor.
    #[must_use]
    pub fn player(world: &World) -> PlayerSnapshot {
        let player = &world.player;
        PlayerSnapshot {
            rect: player.body.rect,
            velocity: player.body.velocity,
            facing: player.facing,
            health: player.vitals.health,
            food: player.vitals.food,
            oxygen: player.vitals.oxygen,
            reach: player.reach,
            in_water: player.in_water,
        }
    }

    /// Minimal per-tick numeric summary of the player.
    #[must_use]
    pub fn observation(world: &World) -> Observation {
        player(world).observation()
    }

    /// Items held by the player.
    #[must_use]
    pub fn inventory(world: &World) -> &Inventory {
        &world.player.inventory
    }

    /// Hotbar of the player.
    #[must_use]
    pub fn hotbar(world: &World) -> &Hotbar {
        &world.player.hotbar
    }

    /// Tile aimed at by the player's facing.
    #[must_use]
    pub fn aim_target(world: &World) -> TileCoord {
        world.aim_target()
    }

    /// Tile being mined and the ticks accumulated on it.
    #[must_use]
    pub fn mining(world: &World) -> Option<(TileCoord, u32)> {
        world
            .mining
            .target
            .map(|target| (target, world.mining.progress))
    }

    /// Captures a read-only view of the live mobs.
    #[must_use]
    pub fn mob_view(world: &World) -> MobView {
        let view = world.grid.view();
        MobView::from_snapshots(
            world
                .mobs
                .iter()
                .map(|mob| mob.snapshot(view, world.config.tile_size))
                .collect(),
        )
    }

    /// Snapshots of the live projectiles in identifier order.
    #[must_use]
    pub fn projectiles(world: &World) -> Vec<ProjectileSnapshot> {
        world
            .projectiles
            .iter()
            .map(|projectile| projectile.snapshot())
            .collect()
    }

    /// Reports whether the player's health reached zero.
    #[must_use]
    pub fn is_player_dead(world: &World) -> bool {
        world.player.vitals.health.is_depleted()
    }
}
