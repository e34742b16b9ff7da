use strata_core::{
    ActionIntent, BlockCatalog, BlockId, Command, DamageSource, Event, ExtensionSide, Facing,
    MobClass, MobId, PassiveSpecies, PixelRect, ProjectileId, TileCoord, TileGrid,
};
use strata_system_terrain::{TerrainField, TerrainParams};
use strata_world::{self as world, query, World, WorldConfig};

const DESTROY: ActionIntent = ActionIntent {
    destroy: true,
    ..ActionIntent::IDLE
};

const USE: ActionIntent = ActionIntent {
    use_item: true,
    ..ActionIntent::IDLE
};

fn catalog() -> BlockCatalog {
    BlockCatalog::builtin().expect("builtin catalog parses")
}

/// Twelve columns over a dirt row 6 and a stone row 7, plus `extra` blocks.
/// The player rests in column 1 aiming at tile (2, 5).
fn flat_world_with(config: WorldConfig, extra: &[(TileCoord, BlockId)]) -> World {
    let mut grid = TileGrid::new(12, 8);
    for column in 0..12 {
        assert!(grid.set(TileCoord::new(column, 6), BlockId::Dirt));
        assert!(grid.set(TileCoord::new(column, 7), BlockId::Stone));
    }
    for (tile, block) in extra {
        assert!(grid.set(*tile, *block));
    }
    World::with_grid(
        WorldConfig {
            spawn_x: 36,
            extension_margin: 0,
            ..config
        },
        catalog(),
        TerrainField::new(11, TerrainParams::default()),
        grid,
    )
}

fn flat_world(config: WorldConfig) -> World {
    flat_world_with(config, &[])
}

fn with_stone_ahead() -> World {
    flat_world_with(
        WorldConfig::default(),
        &[(TileCoord::new(2, 5), BlockId::Stone)],
    )
}

fn step(world: &mut World, intent: ActionIntent) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, Command::Step { intent }, &mut events);
    events
}

fn run(world: &mut World, command: Command) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, command, &mut events);
    events
}

#[test]
fn player_spawns_on_the_surface_aiming_right() {
    let world = flat_world(WorldConfig::default());
    let player = query::player(&world);
    assert_eq!(player.rect, PixelRect::new(36, 164, 19, 28));
    assert_eq!(query::aim_target(&world), TileCoord::new(2, 5));
    assert_eq!(query::inventory(&world).count("dirt"), 10);
    assert_eq!(query::hotbar(&world).slot(0), Some("dirt"));
    assert_eq!(query::find_surface_y(&world, 4), 5 * 32);
}

#[test]
fn mining_stone_takes_sixty_ticks_and_lands_on_the_hotbar() {
    let mut world = with_stone_ahead();
    let target = TileCoord::new(2, 5);

    for _ in 0..59 {
        let events = step(&mut world, DESTROY);
        assert!(!events
            .iter()
            .any(|event| matches!(event, Event::BlockMined { .. })));
    }
    assert_eq!(query::mining(&world), Some((target, 59)));
    assert_eq!(query::tile_grid(&world).block(target), Some(BlockId::Stone));

    let events = step(&mut world, DESTROY);
    assert!(events.contains(&Event::BlockMined {
        tile: target,
        block: BlockId::Stone,
        item: Some("stone".to_owned()),
    }));
    assert_eq!(query::tile_grid(&world).block(target), Some(BlockId::Empty));
    assert_eq!(query::inventory(&world).count("stone"), 1);
    assert_eq!(query::hotbar(&world).slot(1), Some("stone"));
    assert_eq!(query::mining(&world), None);
    assert!(!query::collidables(&world)
        .solids()
        .contains(&PixelRect::from_tile(target, 32)));
}

#[test]
fn releasing_destroy_resets_mining_progress() {
    let mut world = with_stone_ahead();
    for _ in 0..30 {
        let _ = step(&mut world, DESTROY);
    }
    let _ = step(&mut world, ActionIntent::IDLE);
    assert_eq!(query::mining(&world), None);

    for _ in 0..30 {
        let _ = step(&mut world, DESTROY);
    }
    assert_eq!(
        query::mining(&world),
        Some((TileCoord::new(2, 5), 30))
    );
    assert_eq!(
        query::tile_grid(&world).block(TileCoord::new(2, 5)),
        Some(BlockId::Stone)
    );
}

#[test]
fn turning_to_another_tile_restarts_mining() {
    let mut world = with_stone_ahead();
    let stone = TileCoord::new(2, 5);
    for _ in 0..30 {
        let _ = step(&mut world, DESTROY);
    }
    assert_eq!(query::mining(&world), Some((stone, 30)));

    let _ = run(
        &mut world,
        Command::SetFacing {
            facing: Facing::Down,
        },
    );
    let _ = step(&mut world, DESTROY);
    assert_eq!(query::mining(&world), Some((TileCoord::new(1, 6), 1)));

    let _ = run(
        &mut world,
        Command::SetFacing {
            facing: Facing::Right,
        },
    );
    let _ = step(&mut world, DESTROY);
    assert_eq!(query::mining(&world), Some((stone, 1)));
    assert_eq!(query::tile_grid(&world).block(stone), Some(BlockId::Stone));
    assert_eq!(
        query::tile_grid(&world).block(TileCoord::new(1, 6)),
        Some(BlockId::Dirt)
    );
}

#[test]
fn placing_the_selected_block_fills_the_aimed_tile_once() {
    let mut world = flat_world(WorldConfig::default());
    let target = TileCoord::new(2, 5);

    let events = step(&mut world, USE);
    assert_eq!(
        events.last(),
        Some(&Event::BlockPlaced {
            tile: target,
            block: BlockId::Dirt,
        })
    );
    assert_eq!(query::inventory(&world).count("dirt"), 9);
    assert!(query::collidables(&world)
        .solids()
        .contains(&PixelRect::from_tile(target, 32)));

    let events = step(&mut world, USE);
    assert!(!events
        .iter()
        .any(|event| matches!(event, Event::BlockPlaced { .. })));
    assert_eq!(query::inventory(&world).count("dirt"), 9);
}

#[test]
fn three_bare_hand_strikes_kill_a_melee_mob() {
    let mut world = flat_world(WorldConfig::default());
    let _ = run(
        &mut world,
        Command::SpawnMob {
            class: MobClass::Melee,
            column: 2,
        },
    );

    let mut remaining = Vec::new();
    let mut killed = false;
    for _ in 0..3 {
        for event in step(&mut world, DESTROY) {
            match event {
                Event::MobDamaged { remaining: left, .. } => remaining.push(left),
                Event::MobKilled { mob, class } => {
                    assert_eq!((mob, class), (MobId::new(0), MobClass::Melee));
                    killed = true;
                }
                _ => {}
            }
        }
    }

    assert_eq!(remaining, vec![20, 10, 0]);
    assert!(killed);
    assert!(query::mob_view(&world).is_empty());
}

#[test]
fn a_sword_kills_a_ranged_mob_in_one_use() {
    let mut world = flat_world(WorldConfig {
        starting_item: "sword".to_owned(),
        starting_count: 1,
        ..WorldConfig::default()
    });
    assert_eq!(query::hotbar(&world).selected_item(), Some("sword"));
    let _ = run(
        &mut world,
        Command::SpawnMob {
            class: MobClass::Ranged,
            column: 2,
        },
    );

    let events = step(&mut world, USE);
    assert!(events.contains(&Event::MobDamaged {
        mob: MobId::new(0),
        damage: 20,
        remaining: 0,
    }));
    assert!(events.contains(&Event::MobKilled {
        mob: MobId::new(0),
        class: MobClass::Ranged,
    }));
    assert!(query::mob_view(&world).is_empty());
    assert_eq!(query::inventory(&world).count("sword"), 1);
    assert_eq!(
        query::tile_grid(&world).block(TileCoord::new(2, 5)),
        Some(BlockId::Empty)
    );
}

#[test]
fn killing_a_passive_mob_credits_food() {
    let mut world = flat_world(WorldConfig::default());
    let _ = run(
        &mut world,
        Command::SpawnMob {
            class: MobClass::Passive(PassiveSpecies::Chicken),
            column: 2,
        },
    );

    let _ = step(&mut world, DESTROY);
    let events = step(&mut world, DESTROY);

    assert!(events.contains(&Event::FoodCredited { amount: 2 }));
    assert_eq!(query::inventory(&world).count("food"), 2);
    assert_eq!(query::hotbar(&world).slot(1), Some("food"));
}

#[test]
fn melee_contact_hurts_on_every_advance() {
    let mut world = flat_world(WorldConfig::default());
    let _ = run(
        &mut world,
        Command::SpawnMob {
            class: MobClass::Melee,
            column: 1,
        },
    );

    for _ in 0..2 {
        let events = run(&mut world, Command::AdvanceMobs);
        assert_eq!(
            events,
            vec![Event::PlayerDamaged {
                amount: 1.0,
                source: DamageSource::Melee(MobId::new(0)),
            }]
        );
    }
    assert_eq!(query::player(&world).health.value(), 98.0);
}

#[test]
fn projectiles_fly_until_they_hit_the_player() {
    let mut world = flat_world(WorldConfig::default());
    let _ = run(
        &mut world,
        Command::SpawnMob {
            class: MobClass::Ranged,
            column: 9,
        },
    );
    let fire = Command::FireProjectile {
        mob: MobId::new(0),
        velocity_x: -5,
        velocity_y: 0,
    };
    assert_eq!(
        run(&mut world, fire.clone()),
        vec![Event::ProjectileFired {
            projectile: ProjectileId::new(0),
            mob: MobId::new(0),
        }]
    );
    assert!(run(&mut world, fire).is_empty());

    for _ in 0..49 {
        assert!(run(&mut world, Command::AdvanceProjectiles).is_empty());
    }
    let events = run(&mut world, Command::AdvanceProjectiles);
    assert_eq!(
        events,
        vec![
            Event::PlayerDamaged {
                amount: 5.0,
                source: DamageSource::Projectile(ProjectileId::new(0)),
            },
            Event::ProjectileRemoved {
                projectile: ProjectileId::new(0),
            },
        ]
    );
    assert!(query::projectiles(&world).is_empty());
    assert_eq!(query::player(&world).health.value(), 95.0);
}

#[test]
fn death_is_reported_once() {
    let mut world = flat_world(WorldConfig {
        max_health: 2.0,
        ..WorldConfig::default()
    });
    let _ = run(
        &mut world,
        Command::SpawnMob {
            class: MobClass::Melee,
            column: 1,
        },
    );

    let mut deaths = 0;
    for _ in 0..5 {
        deaths += run(&mut world, Command::AdvanceMobs)
            .iter()
            .filter(|event| **event == Event::PlayerDied)
            .count();
    }
    assert_eq!(deaths, 1);
    assert!(query::is_player_dead(&world));
}

#[test]
fn hotbar_commands_select_and_shift_items() {
    let mut world = flat_world(WorldConfig::default());
    let _ = run(&mut world, Command::SelectHotbarSlot { slot: 3 });
    let _ = run(&mut world, Command::SelectHotbarSlot { slot: 99 });
    assert_eq!(query::hotbar(&world).selected(), 3);

    let _ = run(
        &mut world,
        Command::ShiftToHotbar {
            item: "stone".to_owned(),
        },
    );
    assert_eq!(query::hotbar(&world).slot(1), None);
}

#[test]
fn first_step_extends_the_default_world_to_the_left() {
    let terrain = TerrainField::new(7, TerrainParams::default());
    let mut world = World::new(WorldConfig::default(), catalog(), terrain.clone());
    assert_eq!(query::player(&world).rect.left(), 50);

    let events = step(&mut world, ActionIntent::IDLE);
    assert!(events.contains(&Event::WorldExtended {
        side: ExtensionSide::Left,
        columns: 10,
        x_offset: -10,
    }));
    assert_eq!(query::x_offset(&world), -10);
    assert_eq!(query::player(&world).rect.left(), 370);

    let expected = terrain.generate(-10, 30, 30);
    assert_eq!(
        query::tile_grid(&world).iter().collect::<Vec<_>>(),
        expected.view().iter().collect::<Vec<_>>()
    );

    let events = step(&mut world, ActionIntent::IDLE);
    assert!(!events
        .iter()
        .any(|event| matches!(event, Event::WorldExtended { .. })));
}
