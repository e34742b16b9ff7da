#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Single-step entry point of the Strata simulation.
//!
//! A [`Session`] owns the world together with the entity AI and runs one
//! complete tick per [`Session::step`]: the player phase, mob decisions, mob
//! integration, projectile flight and the termination check, in that order.

mod config;

pub use config::{ConfigError, SessionConfig};

use log::{debug, info};
use strata_core::{
    ActionIntent, BlockCatalog, Command, Event, ExtensionSide, Facing, Observation,
};
use strata_system_entity_ai::EntityAi;
use strata_system_terrain::TerrainField;
use strata_world::{self as world, query, World};

/// Result of a single tick.
#[derive(Clone, Debug, PartialEq)]
pub struct StepOutcome {
    /// Player position and velocity after the tick.
    pub observation: Observation,
    /// Whether the player's health reached zero.
    pub terminated: bool,
    /// Every event broadcast while the tick ran, preceded by those raised by
    /// out-of-band commands issued since the previous tick.
    pub events: Vec<Event>,
}

/// Deterministic simulation session.
#[derive(Debug)]
pub struct Session {
    config: SessionConfig,
    catalog: BlockCatalog,
    seed: u32,
    world: World,
    ai: EntityAi,
    pending: Vec<Event>,
    terminated: bool,
}

impl Session {
    /// Builds a session, loading the configured block catalog.
    pub fn new(config: SessionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let catalog = config.block_catalog()?;
        Ok(Self::with_catalog(config, catalog))
    }

    /// Builds a session around an already loaded catalog.
    #[must_use]
    pub fn with_catalog(config: SessionConfig, catalog: BlockCatalog) -> Self {
        let seed = config.seed;
        let (world, ai) = build(&config, &catalog, seed);
        info!("session started with seed {seed}");
        Self {
            config,
            catalog,
            seed,
            world,
            ai,
            pending: Vec::new(),
            terminated: false,
        }
    }

    /// Regenerates the world and restarts the AI, optionally with a new seed.
    ///
    /// Returns the observation of the freshly spawned player.
    pub fn reset(&mut self, seed: Option<u32>) -> Observation {
        if let Some(seed) = seed {
            self.seed = seed;
        }
        let (world, ai) = build(&self.config, &self.catalog, self.seed);
        self.world = world;
        self.ai = ai;
        self.pending.clear();
        self.terminated = false;
        info!("session reset with seed {}", self.seed);
        query::observation(&self.world)
    }

    /// Runs one tick with the provided intent.
    ///
    /// Once terminated the session stays frozen until [`Session::reset`].
    pub fn step(&mut self, intent: ActionIntent) -> StepOutcome {
        if self.terminated {
            return StepOutcome {
                observation: query::observation(&self.world),
                terminated: true,
                events: std::mem::take(&mut self.pending),
            };
        }

        let mut events = std::mem::take(&mut self.pending);
        world::apply(&mut self.world, Command::Step { intent }, &mut events);

        let mut commands = Vec::new();
        let mobs = query::mob_view(&self.world);
        let player = query::player(&self.world);
        self.ai.handle(
            &events,
            &mobs,
            &player,
            query::tile_grid(&self.world),
            query::tile_size(&self.world),
            &mut commands,
        );
        for command in commands {
            world::apply(&mut self.world, command, &mut events);
        }
        world::apply(&mut self.world, Command::AdvanceMobs, &mut events);
        world::apply(&mut self.world, Command::AdvanceProjectiles, &mut events);

        self.terminated = query::is_player_dead(&self.world);
        if self.terminated {
            info!(
                "session terminated on tick {} with seed {}",
                query::tick(&self.world),
                self.seed
            );
        }
        StepOutcome {
            observation: query::observation(&self.world),
            terminated: self.terminated,
            events,
        }
    }

    /// Selects the hotbar slot the use action applies.
    pub fn select_hotbar_slot(&mut self, slot: usize) {
        self.submit(Command::SelectHotbarSlot { slot });
    }

    /// Moves a held item onto the first empty hotbar slot.
    pub fn shift_to_hotbar(&mut self, item: &str) {
        self.submit(Command::ShiftToHotbar {
            item: item.to_owned(),
        });
    }

    /// Overrides the player's facing for aiming up or down.
    pub fn set_facing(&mut self, facing: Facing) {
        self.submit(Command::SetFacing { facing });
    }

    /// Generates columns ahead of the player outside the tick.
    pub fn pre_extend(&mut self, side: ExtensionSide, columns: u32) {
        debug!("pre-extending {side:?} by {columns} columns");
        self.submit(Command::ExtendWorld { side, columns });
    }

    fn submit(&mut self, command: Command) {
        world::apply(&mut self.world, command, &mut self.pending);
    }

    /// Seed the current world was generated from.
    #[must_use]
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Configuration the session was built from.
    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Read-only access to the world for presentation.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Read-only access to the mob decision system.
    #[must_use]
    pub fn ai(&self) -> &EntityAi {
        &self.ai
    }

    /// Current player observation.
    #[must_use]
    pub fn observation(&self) -> Observation {
        query::observation(&self.world)
    }

    /// Reports whether the player died since the last reset.
    #[must_use]
    pub fn is_terminated(&self) -> bool {
        self.terminated
    }
}

fn build(config: &SessionConfig, catalog: &BlockCatalog, seed: u32) -> (World, EntityAi) {
    let terrain = TerrainField::new(seed, config.terrain.clone());
    let world = World::new(config.world.clone(), catalog.clone(), terrain);
    let ai = EntityAi::new(seed, config.ai.clone());
    (world, ai)
}
