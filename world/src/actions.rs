//! Player actions on the aimed tile: placing, eating, striking and mining.

use log::{debug, trace};
use strata_core::{ActionIntent, BlockId, Event, ItemCategory, PixelRect, TileCoord};

use crate::World;

/// Tile currently being mined and the consecutive ticks spent on it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct MiningState {
    pub(crate) target: Option<TileCoord>,
    pub(crate) progress: u32,
}

impl MiningState {
    fn reset(&mut self) {
        *self = Self::default();
    }

    pub(crate) fn shift(&mut self, columns: i32) {
        self.target = self.target.map(|target| target.offset(columns, 0));
    }
}

impl World {
    pub(crate) fn aim_target(&self) -> TileCoord {
        let (dx, dy) = self.player.facing.vector();
        self.player
            .body
            .rect
            .center_tile(self.config.tile_size)
            .offset(dx, dy)
    }

    fn within_reach(&self, target: TileCoord) -> bool {
        let origin = self.player.body.rect.center_tile(self.config.tile_size);
        let dx = i64::from(target.column() - origin.column());
        let dy = i64::from(target.row() - origin.row());
        let reach = i64::from(self.player.reach);
        dx * dx + dy * dy <= reach * reach
    }

    /// Resolves the use and destroy bits against the aimed tile.
    pub(crate) fn resolve_actions(&mut self, intent: ActionIntent, out_events: &mut Vec<Event>) {
        let target = self.aim_target();
        if !self.grid.view().contains(target) || !self.within_reach(target) {
            self.mining.reset();
            return;
        }

        if intent.use_item {
            self.use_selected(target, out_events);
        }
        if intent.destroy {
            self.destroy(target, out_events);
        } else {
            self.mining.reset();
        }
    }

    fn use_selected(&mut self, target: TileCoord, out_events: &mut Vec<Event>) {
        let Some(item) = self.player.hotbar.selected_item().map(str::to_owned) else {
            return;
        };
        if self.player.inventory.count(&item) == 0 {
            return;
        }
        let Some(info) = self.catalog.info(&item) else {
            trace!("selected item {item} is not in the catalog");
            return;
        };
        let (category, damage) = (info.category, info.damage);

        match category {
            ItemCategory::Block => {
                let Some(block) = self.catalog.block_for_item(&item) else {
                    return;
                };
                let footprint = PixelRect::from_tile(target, self.config.tile_size);
                if self.grid.get(target) != Some(BlockId::Empty)
                    || footprint.intersects(&self.player.body.rect)
                {
                    return;
                }
                let _ = self.grid.set(target, block);
                let _ = self.player.inventory.remove(&item, 1);
                self.derive_collidables();
                out_events.push(Event::BlockPlaced {
                    tile: target,
                    block,
                });
            }
            ItemCategory::Food => {
                if self.player.vitals.food.is_full() {
                    return;
                }
                let _ = self.player.inventory.remove(&item, 1);
                self.player.vitals.food.fill();
                out_events.push(Event::FoodEaten { item });
            }
            ItemCategory::Weapon => {
                let damage = i32::try_from(damage).unwrap_or(i32::MAX);
                self.strike(target, damage, out_events);
            }
        }
    }

    fn destroy(&mut self, target: TileCoord, out_events: &mut Vec<Event>) {
        let block = self.grid.get(target).unwrap_or_default();
        if block == BlockId::Empty || block.is_liquid() {
            self.mining.reset();
            self.strike(target, self.config.bare_hand_damage, out_events);
            return;
        }

        if self.mining.target != Some(target) {
            self.mining = MiningState {
                target: Some(target),
                progress: 0,
            };
        }
        self.mining.progress += 1;
        if self.mining.progress < self.catalog.mining_time(block) {
            return;
        }
        self.mining.reset();

        let item = self.catalog.item_for_block(block).map(str::to_owned);
        if let Some(item) = &item {
            if !self.credit(item, 1, out_events) {
                return;
            }
        }
        let _ = self.grid.set(target, BlockId::Empty);
        self.derive_collidables();
        debug!("mined {block:?} at {target:?}");
        out_events.push(Event::BlockMined {
            tile: target,
            block,
            item,
        });
    }

    fn strike(&mut self, target: TileCoord, damage: i32, out_events: &mut Vec<Event>) {
        if damage <= 0 {
            return;
        }
        let area = PixelRect::from_tile(target, self.config.tile_size);
        self.damage_mobs(area, damage, out_events);
    }

    /// Adds items to the inventory, placing new ones on the hotbar.
    ///
    /// Reports `false` and emits [`Event::InventoryFull`] when no slot is free;
    /// the caller keeps whatever would have been consumed.
    pub(crate) fn credit(&mut self, item: &str, amount: u32, out_events: &mut Vec<Event>) -> bool {
        if !self.player.inventory.add(item, amount) {
            out_events.push(Event::InventoryFull {
                item: item.to_owned(),
            });
            return false;
        }
        let _ = self.player.hotbar.auto_assign(item);
        true
    }

    /// Credits the food drop of a killed passive mob, falling back to the
    /// food meter when the inventory has no room.
    pub(crate) fn credit_food(&mut self, amount: u32, out_events: &mut Vec<Event>) {
        let item = self.config.food_item.clone();
        if !self.credit(&item, amount, out_events) {
            self.player.vitals.food.add(amount as f32);
        }
        out_events.push(Event::FoodCredited { amount });
    }
}

#[cfg(test)]
mod tests {
    use strata_core::{BlockCatalog, Command, TileGrid, INVENTORY_CAPACITY};
    use strata_system_terrain::{TerrainField, TerrainParams};

    use super::*;
    use crate::{apply, WorldConfig};

    fn world_with_stone_ahead() -> World {
        let mut grid = TileGrid::new(8, 6);
        for column in 0..8 {
            assert!(grid.set(TileCoord::new(column, 4), BlockId::Dirt));
            assert!(grid.set(TileCoord::new(column, 5), BlockId::Stone));
        }
        assert!(grid.set(TileCoord::new(2, 3), BlockId::Stone));
        let config = WorldConfig {
            spawn_x: 36,
            extension_margin: 0,
            ..WorldConfig::default()
        };
        World::with_grid(
            config,
            BlockCatalog::builtin().expect("builtin catalog parses"),
            TerrainField::new(1, TerrainParams::default()),
            grid,
        )
    }

    #[test]
    fn full_inventory_leaves_the_block_in_place() {
        let mut world = world_with_stone_ahead();
        for index in 0..INVENTORY_CAPACITY {
            let _ = world.player.inventory.add(&format!("keepsake-{index}"), 1);
        }
        let mut events = Vec::new();
        let destroy = ActionIntent {
            destroy: true,
            ..ActionIntent::IDLE
        };
        for _ in 0..60 {
            apply(&mut world, Command::Step { intent: destroy }, &mut events);
        }

        assert_eq!(world.grid.get(TileCoord::new(2, 3)), Some(BlockId::Stone));
        assert!(events.contains(&Event::InventoryFull {
            item: "stone".to_owned()
        }));
        assert!(!events
            .iter()
            .any(|event| matches!(event, Event::BlockMined { .. })));
        assert_eq!(world.mining, MiningState::default());
    }

    #[test]
    fn targets_beyond_reach_are_ignored() {
        let mut world = world_with_stone_ahead();
        world.player.reach = 0;
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::Step {
                intent: ActionIntent {
                    destroy: true,
                    ..ActionIntent::IDLE
                },
            },
            &mut events,
        );
        assert_eq!(world.mining, MiningState::default());
    }

    #[test]
    fn eating_refills_food_only_when_hungry() {
        let mut world = world_with_stone_ahead();
        let _ = world.player.inventory.add("food", 2);
        assert!(world.player.hotbar.set(1, "food"));
        assert!(world.player.hotbar.select(1));
        let eat = Command::Step {
            intent: ActionIntent {
                use_item: true,
                ..ActionIntent::IDLE
            },
        };
        let mut events = Vec::new();

        apply(&mut world, eat.clone(), &mut events);
        assert_eq!(world.player.inventory.count("food"), 2);

        world.player.vitals.food.drain(40.0);
        apply(&mut world, eat, &mut events);
        assert_eq!(world.player.inventory.count("food"), 1);
        assert!(world.player.vitals.food.is_full());
        assert!(events.contains(&Event::FoodEaten {
            item: "food".to_owned()
        }));
    }
}
