#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Mob behaviour: path following, ranged attacks, wandering and spawn policy.
//!
//! The system never touches mob geometry. It reads snapshots, keeps per-mob
//! path bookkeeping and answers each tick with steering, firing and spawn
//! commands that the world executes on its next mob advance.

use std::collections::BTreeMap;

use log::{debug, trace};
use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use strata_core::{
    Command, Event, ExtensionSide, MobCategory, MobClass, MobId, MobKind, MobSnapshot, MobView,
    PassiveSpecies, PlayerSnapshot, TileCoord, TileGridView,
};
use strata_system_pathfinding::{surface_walkable, Pathfinder, DEFAULT_MAX_EXPANSIONS};

const RNG_STREAM_SPAWN: &str = "entity-ai/spawn";
const RNG_STREAM_WANDER: &str = "entity-ai/wander";

/// Vertical speeds below this magnitude count as standing still for jumps.
const RESTING_VELOCITY: f32 = 1e-3;

/// Tunable behaviour and spawn parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Ticks a path stays valid before it is recomputed.
    pub repath_interval: u64,
    /// Upper bound on live enemies.
    pub max_enemies: usize,
    /// Upper bound on live passive mobs.
    pub max_passive: usize,
    /// Per-tick probability of requesting an enemy spawn.
    pub enemy_spawn_chance: f64,
    /// Per-tick probability of requesting a passive spawn.
    pub passive_spawn_chance: f64,
    /// Horizontal pixel distance below which ranged mobs fire.
    pub ranged_reach_x: i32,
    /// Vertical pixel distance below which ranged mobs fire.
    pub ranged_reach_y: i32,
    /// Horizontal projectile speed in pixels per tick.
    pub projectile_speed: i32,
    /// Whether passive mobs travel to sampled walkable tiles instead of
    /// ambling on a timer.
    pub pathfinding_wander: bool,
    /// Shortest amble held by a passive mob, in ticks.
    pub wander_min_ticks: u32,
    /// Exclusive upper bound of an amble, in ticks.
    pub wander_max_ticks: u32,
    /// Expansion budget of a single path search.
    pub max_path_expansions: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            repath_interval: 30,
            max_enemies: 5,
            max_passive: 5,
            enemy_spawn_chance: 0.001,
            passive_spawn_chance: 0.005,
            ranged_reach_x: 300,
            ranged_reach_y: 100,
            projectile_speed: 5,
            pathfinding_wander: false,
            wander_min_ticks: 30,
            wander_max_ticks: 90,
            max_path_expansions: DEFAULT_MAX_EXPANSIONS,
        }
    }
}

/// Remembered path of a single mob.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct PathState {
    path: Option<Vec<TileCoord>>,
    path_index: usize,
    last_path_tick: u64,
    last_target_tile: Option<TileCoord>,
}

impl PathState {
    fn is_exhausted(&self) -> bool {
        self.path
            .as_ref()
            .map_or(true, |path| self.path_index >= path.len())
    }

    fn is_stale(&self, tick: u64, target: TileCoord, interval: u64) -> bool {
        self.is_exhausted()
            || tick.saturating_sub(self.last_path_tick) > interval
            || self.last_target_tile != Some(target)
    }

    fn replace(&mut self, path: Vec<TileCoord>, tick: u64, target: TileCoord) {
        self.path = Some(path);
        self.path_index = 0;
        self.last_path_tick = tick;
        self.last_target_tile = Some(target);
    }

    fn waypoint(&self) -> Option<TileCoord> {
        self.path.as_ref()?.get(self.path_index).copied()
    }

    fn shift(&mut self, columns: i32) {
        if let Some(path) = self.path.as_mut() {
            for tile in path.iter_mut() {
                *tile = tile.offset(columns, 0);
            }
        }
        self.last_target_tile = self.last_target_tile.map(|tile| tile.offset(columns, 0));
    }
}

/// Direction a passive mob keeps until its timer runs out.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Amble {
    direction: i32,
    remaining: u32,
}

/// Pure system deciding what every mob does next.
#[derive(Debug)]
pub struct EntityAi {
    config: Config,
    pathfinder: Pathfinder,
    spawn_rng: ChaCha8Rng,
    wander_rng: ChaCha8Rng,
    tick: u64,
    paths: BTreeMap<MobId, PathState>,
    ambles: BTreeMap<MobId, Amble>,
}

impl EntityAi {
    /// Creates the system with random streams derived from the world seed.
    #[must_use]
    pub fn new(seed: u32, config: Config) -> Self {
        let base = u64::from(seed);
        Self {
            pathfinder: Pathfinder::new(config.max_path_expansions),
            spawn_rng: ChaCha8Rng::seed_from_u64(derive_labeled_seed(base, RNG_STREAM_SPAWN)),
            wander_rng: ChaCha8Rng::seed_from_u64(derive_labeled_seed(base, RNG_STREAM_WANDER)),
            config,
            tick: 0,
            paths: BTreeMap::new(),
            ambles: BTreeMap::new(),
        }
    }

    /// Parameters the system was created with.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Waypoints the mob has yet to reach, if it holds a path.
    #[must_use]
    pub fn planned_path(&self, mob: MobId) -> Option<&[TileCoord]> {
        let state = self.paths.get(&mob)?;
        let path = state.path.as_deref()?;
        Some(path.get(state.path_index..).unwrap_or_default())
    }

    /// Consumes the tick's events and snapshots to emit mob commands.
    ///
    /// Nothing is emitted unless the events contain [`Event::TimeAdvanced`].
    pub fn handle(
        &mut self,
        events: &[Event],
        mobs: &MobView,
        player: &PlayerSnapshot,
        grid: TileGridView<'_>,
        tile_size: i32,
        out: &mut Vec<Command>,
    ) {
        let mut ticked = false;
        for event in events {
            match event {
                Event::TimeAdvanced { tick } => {
                    self.tick = *tick;
                    ticked = true;
                }
                Event::WorldExtended {
                    side: ExtensionSide::Left,
                    columns,
                    ..
                } => self.shift_paths(*columns),
                Event::MobKilled { mob, .. } => {
                    let _ = self.paths.remove(mob);
                    let _ = self.ambles.remove(mob);
                }
                _ => {}
            }
        }

        if !ticked {
            return;
        }

        self.paths.retain(|mob, _| mobs.get(*mob).is_some());
        self.ambles.retain(|mob, _| mobs.get(*mob).is_some());

        let target = player.standing_tile(tile_size);
        for mob in mobs.iter() {
            match mob.kind {
                MobKind::Melee => self.chase(mob, target, grid, tile_size, out),
                MobKind::Ranged { cooldown } => {
                    self.chase(mob, target, grid, tile_size, out);
                    self.aim(mob, player, cooldown, out);
                }
                MobKind::Passive { .. } => {
                    if self.config.pathfinding_wander {
                        self.roam(mob, grid, tile_size, out);
                    } else {
                        self.amble(mob, out);
                    }
                }
            }
        }

        self.roll_spawns(mobs, grid, out);
    }

    fn shift_paths(&mut self, columns: u32) {
        let columns = i32::try_from(columns).unwrap_or(i32::MAX);
        for state in self.paths.values_mut() {
            state.shift(columns);
        }
    }

    fn chase(
        &mut self,
        mob: &MobSnapshot,
        target: TileCoord,
        grid: TileGridView<'_>,
        tile_size: i32,
        out: &mut Vec<Command>,
    ) {
        let state = self.paths.entry(mob.id).or_default();
        if state.is_stale(self.tick, target, self.config.repath_interval) {
            let start = mob.standing_tile(tile_size);
            match self.pathfinder.find_path(grid, start, target) {
                Some(path) => {
                    debug!(
                        "mob {} repathed {start:?} -> {target:?} ({} tiles)",
                        mob.id.get(),
                        path.len()
                    );
                    state.replace(path, self.tick, target);
                }
                None => trace!("mob {} has no path to {target:?}", mob.id.get()),
            }
        }
        follow_path(state, mob, tile_size, out);
    }

    fn aim(&self, mob: &MobSnapshot, player: &PlayerSnapshot, cooldown: u32, out: &mut Vec<Command>) {
        if cooldown > 0 {
            return;
        }
        let dx = player.rect.center_x() - mob.rect.center_x();
        let dy = player.rect.center_y() - mob.rect.center_y();
        if dx.abs() >= self.config.ranged_reach_x || dy.abs() >= self.config.ranged_reach_y {
            return;
        }

        let speed = self.config.projectile_speed.abs();
        let velocity_x = if dx > 0 { speed } else { -speed };
        let velocity_y = (dy as f32 / dx.abs().max(1) as f32 * speed as f32) as i32;
        out.push(Command::FireProjectile {
            mob: mob.id,
            velocity_x,
            velocity_y,
        });
    }

    fn roam(
        &mut self,
        mob: &MobSnapshot,
        grid: TileGridView<'_>,
        tile_size: i32,
        out: &mut Vec<Command>,
    ) {
        let state = self.paths.entry(mob.id).or_default();
        if state.is_exhausted() {
            let (columns, _) = grid.dimensions();
            if columns > 0 {
                let column = self.wander_rng.gen_range(0..columns);
                let goal = surface_walkable(grid, i32::try_from(column).unwrap_or(i32::MAX));
                let path = goal.and_then(|goal| {
                    self.pathfinder
                        .find_path(grid, mob.standing_tile(tile_size), goal)
                        .map(|path| (path, goal))
                });
                if let Some((path, goal)) = path {
                    state.replace(path, self.tick, goal);
                }
            }
        }
        follow_path(state, mob, tile_size, out);
    }

    fn amble(&mut self, mob: &MobSnapshot, out: &mut Vec<Command>) {
        let min = self.config.wander_min_ticks.max(1);
        let max = self.config.wander_max_ticks.max(min + 1);
        let amble = self.ambles.entry(mob.id).or_default();
        if amble.remaining == 0 {
            amble.direction = self.wander_rng.gen_range(-1..=1);
            amble.remaining = self.wander_rng.gen_range(min..max);
        }
        amble.remaining -= 1;

        let horizontal = amble.direction * mob.kind.class().speed();
        if horizontal != 0 {
            out.push(Command::SteerMob {
                mob: mob.id,
                horizontal,
                jump: false,
            });
        }
    }

    fn roll_spawns(&mut self, mobs: &MobView, grid: TileGridView<'_>, out: &mut Vec<Command>) {
        let (columns, _) = grid.dimensions();
        if columns == 0 {
            return;
        }

        if mobs.count(MobCategory::Enemy) < self.config.max_enemies
            && self.spawn_rng.gen::<f64>() < self.config.enemy_spawn_chance
        {
            if let Some(class) = MobClass::ENEMIES.choose(&mut self.spawn_rng).copied() {
                self.request_spawn(class, columns, out);
            }
        }

        if mobs.count(MobCategory::Passive) < self.config.max_passive
            && self.spawn_rng.gen::<f64>() < self.config.passive_spawn_chance
        {
            if let Some(species) = PassiveSpecies::ALL.choose(&mut self.spawn_rng).copied() {
                self.request_spawn(MobClass::Passive(species), columns, out);
            }
        }
    }

    fn request_spawn(&mut self, class: MobClass, columns: u32, out: &mut Vec<Command>) {
        let column = self.spawn_rng.gen_range(0..columns);
        debug!("requesting {class:?} spawn in column {column}");
        out.push(Command::SpawnMob { class, column });
    }
}

/// Steers toward the current waypoint, advancing it once the mob's center is
/// within one speed step of the waypoint's center.
fn follow_path(state: &mut PathState, mob: &MobSnapshot, tile_size: i32, out: &mut Vec<Command>) {
    let Some(waypoint) = state.waypoint() else {
        return;
    };

    let speed = mob.kind.class().speed();
    let target_x = waypoint.column() * tile_size + tile_size / 2;
    let target_y = waypoint.row() * tile_size;
    let offset = target_x - mob.rect.center_x();

    let horizontal = if offset.abs() <= speed {
        state.path_index += 1;
        0
    } else {
        speed * offset.signum()
    };
    let jump = target_y + tile_size < mob.rect.bottom()
        && offset.abs() <= tile_size
        && mob.grounded
        && mob.velocity_y.abs() < RESTING_VELOCITY;

    if horizontal != 0 || jump {
        out.push(Command::SteerMob {
            mob: mob.id,
            horizontal,
            jump,
        });
    }
}

fn derive_labeled_seed(base: u64, label: &str) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(base.to_le_bytes());
    hasher.update(label.as_bytes());
    let digest = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::{BlockId, Facing, Meter, PixelRect, TileGrid, Velocity};

    const TILE: i32 = 32;

    fn quiet() -> Config {
        Config {
            enemy_spawn_chance: 0.0,
            passive_spawn_chance: 0.0,
            ..Config::default()
        }
    }

    /// Stone floor on the bottom row.
    fn floor(columns: u32) -> TileGrid {
        let mut grid = TileGrid::new(columns, 4);
        for column in 0..columns as i32 {
            assert!(grid.set(TileCoord::new(column, 3), BlockId::Stone));
        }
        grid
    }

    fn player_at(x: i32, y: i32) -> PlayerSnapshot {
        PlayerSnapshot {
            rect: PixelRect::new(x, y, 19, 28),
            velocity: Velocity::ZERO,
            facing: Facing::Right,
            health: Meter::full(100.0),
            food: Meter::full(100.0),
            oxygen: Meter::full(100.0),
            reach: 3,
            in_water: false,
        }
    }

    fn mob_at(id: u32, kind: MobKind, x: i32, y: i32) -> MobSnapshot {
        MobSnapshot {
            id: MobId::new(id),
            kind,
            rect: PixelRect::new(x, y, TILE, TILE),
            velocity_y: 0.0,
            health: kind.class().base_health(),
            grounded: true,
        }
    }

    fn rewind(ai: &mut EntityAi, mob: MobId, index: usize) {
        if let Some(state) = ai.paths.get_mut(&mob) {
            state.path_index = index;
        }
    }

    fn tick(tick: u64) -> Vec<Event> {
        vec![Event::TimeAdvanced { tick }]
    }

    #[test]
    fn nothing_happens_without_time_advancing() {
        let grid = floor(10);
        let mut ai = EntityAi::new(
            3,
            Config {
                enemy_spawn_chance: 1.0,
                passive_spawn_chance: 1.0,
                ..Config::default()
            },
        );
        let mobs = MobView::from_snapshots(vec![mob_at(1, MobKind::Melee, 40, 64)]);
        let mut out = Vec::new();

        ai.handle(&[], &mobs, &player_at(230, 68), grid.view(), TILE, &mut out);

        assert!(out.is_empty());
    }

    #[test]
    fn repath_triggers_reset_the_path_index() {
        let grid = floor(10);
        let mut ai = EntityAi::new(1, quiet());
        let id = MobId::new(1);
        let mobs = MobView::from_snapshots(vec![mob_at(1, MobKind::Melee, 40, 64)]);
        let far = player_at(230, 68);
        let mut out = Vec::new();

        ai.handle(&tick(1), &mobs, &far, grid.view(), TILE, &mut out);
        let state = ai.paths[&id].clone();
        assert_eq!(state.path_index, 0);
        assert_eq!(state.path.as_ref().map(Vec::len), Some(7));
        assert_eq!(state.last_target_tile, Some(TileCoord::new(7, 2)));
        assert_eq!(
            out,
            vec![Command::SteerMob {
                mob: id,
                horizontal: -3,
                jump: false
            }]
        );

        // Fresh path is kept.
        rewind(&mut ai, id, 2);
        ai.handle(&tick(2), &mobs, &far, grid.view(), TILE, &mut out);
        assert_eq!(ai.paths[&id].path_index, 2);
        assert_eq!(ai.paths[&id].last_path_tick, 1);

        // Exhausted path.
        rewind(&mut ai, id, 7);
        ai.handle(&tick(3), &mobs, &far, grid.view(), TILE, &mut out);
        assert_eq!(ai.paths[&id].path_index, 0);
        assert_eq!(ai.paths[&id].last_path_tick, 3);

        // Interval elapsed.
        rewind(&mut ai, id, 3);
        ai.handle(&tick(34), &mobs, &far, grid.view(), TILE, &mut out);
        assert_eq!(ai.paths[&id].path_index, 0);
        assert_eq!(ai.paths[&id].last_path_tick, 34);

        // Target moved.
        rewind(&mut ai, id, 3);
        let nearer = player_at(198, 68);
        ai.handle(&tick(35), &mobs, &nearer, grid.view(), TILE, &mut out);
        let state = &ai.paths[&id];
        assert_eq!(state.path_index, 0);
        assert_eq!(state.last_target_tile, Some(TileCoord::new(6, 2)));
        assert_eq!(state.path.as_ref().map(Vec::len), Some(6));
    }

    #[test]
    fn unreachable_target_keeps_the_previous_path() {
        let grid = floor(10);
        let mut ai = EntityAi::new(1, quiet());
        let id = MobId::new(1);
        let mobs = MobView::from_snapshots(vec![mob_at(1, MobKind::Melee, 40, 64)]);
        let mut out = Vec::new();

        ai.handle(&tick(1), &mobs, &player_at(230, 68), grid.view(), TILE, &mut out);
        let before = ai.paths[&id].clone();

        // Airborne player: its standing tile has no floor beneath it.
        ai.handle(&tick(2), &mobs, &player_at(230, 0), grid.view(), TILE, &mut out);

        assert_eq!(ai.paths[&id], before);
    }

    #[test]
    fn step_up_waypoint_triggers_a_jump() {
        let mut grid = floor(10);
        assert!(grid.set(TileCoord::new(3, 2), BlockId::Stone));
        let mut ai = EntityAi::new(1, quiet());
        let id = MobId::new(1);
        let mobs = MobView::from_snapshots(vec![mob_at(1, MobKind::Melee, 64, 64)]);
        let player = player_at(166, 68);
        let mut out = Vec::new();

        ai.handle(&tick(1), &mobs, &player, grid.view(), TILE, &mut out);
        assert!(out.is_empty());
        assert_eq!(
            ai.planned_path(id),
            Some(&[TileCoord::new(3, 1), TileCoord::new(4, 2), TileCoord::new(5, 2)][..])
        );

        ai.handle(&tick(2), &mobs, &player, grid.view(), TILE, &mut out);
        assert_eq!(
            out,
            vec![Command::SteerMob {
                mob: id,
                horizontal: 3,
                jump: true
            }]
        );
    }

    #[test]
    fn airborne_mobs_do_not_jump() {
        let mut grid = floor(10);
        assert!(grid.set(TileCoord::new(3, 2), BlockId::Stone));
        let mut ai = EntityAi::new(1, quiet());
        let mut mob = mob_at(1, MobKind::Melee, 64, 64);
        mob.velocity_y = -4.0;
        let mobs = MobView::from_snapshots(vec![mob]);
        let player = player_at(166, 68);
        let mut out = Vec::new();

        ai.handle(&tick(1), &mobs, &player, grid.view(), TILE, &mut out);
        ai.handle(&tick(2), &mobs, &player, grid.view(), TILE, &mut out);

        assert_eq!(
            out,
            vec![Command::SteerMob {
                mob: MobId::new(1),
                horizontal: 3,
                jump: false
            }]
        );
    }

    #[test]
    fn ranged_mob_fires_when_in_reach_and_ready() {
        let grid = floor(20);
        let mut ai = EntityAi::new(1, quiet());
        let ready = MobView::from_snapshots(vec![mob_at(1, MobKind::Ranged { cooldown: 0 }, 32, 64)]);
        let mut out = Vec::new();

        ai.handle(&tick(1), &ready, &player_at(230, 16), grid.view(), TILE, &mut out);
        assert_eq!(
            out,
            vec![Command::FireProjectile {
                mob: MobId::new(1),
                velocity_x: 5,
                velocity_y: -1
            }]
        );

        out.clear();
        let cooling =
            MobView::from_snapshots(vec![mob_at(1, MobKind::Ranged { cooldown: 12 }, 32, 64)]);
        ai.handle(&tick(2), &cooling, &player_at(230, 16), grid.view(), TILE, &mut out);
        assert!(out.is_empty());

        ai.handle(&tick(3), &ready, &player_at(400, 16), grid.view(), TILE, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn projectiles_aim_left_at_targets_behind() {
        let grid = floor(20);
        let mut ai = EntityAi::new(1, quiet());
        let mobs = MobView::from_snapshots(vec![mob_at(1, MobKind::Ranged { cooldown: 0 }, 320, 64)]);
        let mut out = Vec::new();

        ai.handle(&tick(1), &mobs, &player_at(200, 0), grid.view(), TILE, &mut out);

        // dx = 209 - 336 = -127, dy = 14 - 80 = -66.
        assert_eq!(
            out.last(),
            Some(&Command::FireProjectile {
                mob: MobId::new(1),
                velocity_x: -5,
                velocity_y: -2
            })
        );
    }

    #[test]
    fn amble_holds_its_direction_until_the_timer_expires() {
        let grid = floor(10);
        let mut ai = EntityAi::new(9, quiet());
        let id = MobId::new(4);
        let kind = MobKind::spawn(MobClass::Passive(PassiveSpecies::Bunny));
        let mobs = MobView::from_snapshots(vec![mob_at(4, kind, 96, 64)]);
        let player = player_at(10, 68);
        let mut out = Vec::new();

        ai.handle(&tick(1), &mobs, &player, grid.view(), TILE, &mut out);
        let first = ai.ambles[&id];
        assert!((29..89).contains(&first.remaining));

        for step in 0..first.remaining {
            out.clear();
            ai.handle(&tick(2 + u64::from(step)), &mobs, &player, grid.view(), TILE, &mut out);
            assert_eq!(ai.ambles[&id].direction, first.direction);
            let expected = (first.direction != 0).then_some(Command::SteerMob {
                mob: id,
                horizontal: first.direction,
                jump: false,
            });
            assert_eq!(out.first().cloned(), expected);
        }
        assert_eq!(ai.ambles[&id].remaining, 0);
    }

    #[test]
    fn pathfinding_wander_targets_a_walkable_tile() {
        let grid = floor(10);
        let mut ai = EntityAi::new(
            5,
            Config {
                pathfinding_wander: true,
                ..quiet()
            },
        );
        let id = MobId::new(2);
        let kind = MobKind::spawn(MobClass::Passive(PassiveSpecies::Chicken));
        let mobs = MobView::from_snapshots(vec![mob_at(2, kind, 32, 64)]);
        let mut out = Vec::new();

        ai.handle(&tick(1), &mobs, &player_at(10, 68), grid.view(), TILE, &mut out);

        let goal = ai.paths[&id]
            .path
            .as_ref()
            .and_then(|path| path.last().copied())
            .expect("flat floor always yields a wander path");
        assert_eq!(goal.row(), 2);
        assert!(ai.ambles.is_empty());
    }

    #[test]
    fn spawn_requests_respect_population_caps() {
        let grid = floor(10);
        let eager = Config {
            enemy_spawn_chance: 1.0,
            passive_spawn_chance: 1.0,
            ..Config::default()
        };
        let mut ai = EntityAi::new(11, eager.clone());
        let mut out = Vec::new();

        ai.handle(&tick(1), &MobView::default(), &player_at(10, 68), grid.view(), TILE, &mut out);
        let classes: Vec<MobCategory> = out
            .iter()
            .filter_map(|command| match command {
                Command::SpawnMob { class, column } => {
                    assert!(*column < 10);
                    Some(class.category())
                }
                _ => None,
            })
            .collect();
        assert_eq!(classes, vec![MobCategory::Enemy, MobCategory::Passive]);

        let crowd = MobView::from_snapshots(
            (1..=5)
                .map(|id| mob_at(id, MobKind::Melee, 32 * id as i32, 0))
                .collect(),
        );
        let mut capped = EntityAi::new(
            11,
            Config {
                max_passive: 0,
                ..eager
            },
        );
        out.clear();
        capped.handle(&tick(1), &crowd, &player_at(10, 68), grid.view(), TILE, &mut out);
        assert!(!out
            .iter()
            .any(|command| matches!(command, Command::SpawnMob { .. })));
    }

    #[test]
    fn killed_mobs_lose_their_state() {
        let grid = floor(10);
        let mut ai = EntityAi::new(1, quiet());
        let id = MobId::new(1);
        let mobs = MobView::from_snapshots(vec![mob_at(1, MobKind::Melee, 40, 64)]);
        let mut out = Vec::new();

        ai.handle(&tick(1), &mobs, &player_at(230, 68), grid.view(), TILE, &mut out);
        assert!(ai.planned_path(id).is_some());

        let events = vec![Event::MobKilled {
            mob: id,
            class: MobClass::Melee,
        }];
        ai.handle(&events, &mobs, &player_at(230, 68), grid.view(), TILE, &mut out);
        assert_eq!(ai.planned_path(id), None);
    }

    #[test]
    fn labelled_seeds_separate_streams() {
        assert_ne!(
            derive_labeled_seed(7, RNG_STREAM_SPAWN),
            derive_labeled_seed(7, RNG_STREAM_WANDER)
        );
        assert_eq!(
            derive_labeled_seed(7, RNG_STREAM_SPAWN),
            derive_labeled_seed(7, RNG_STREAM_SPAWN)
        );
    }
}
