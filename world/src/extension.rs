//! Edge growth, surface placement and collision geometry upkeep.

use log::{debug, warn};
use strata_core::{Event, ExtensionSide, TileCoord, TileGridView};
use strata_system_physics::{Collidables, WorldBounds};

use crate::World;

/// Pixel top at which a tile-tall actor rests on the column's surface.
///
/// The surface is the first solid tile below row zero that is not part of a
/// tree. Columns without one place the actor just above the bedrock row.
pub(crate) fn find_surface_y(view: TileGridView<'_>, column: i32, tile_size: i32) -> i32 {
    let (_, rows) = view.dimensions();
    let rows = i32::try_from(rows).unwrap_or(i32::MAX);
    let surface = (0..rows).find(|row| {
        view.block(TileCoord::new(column, *row))
            .is_some_and(|block| block.is_solid() && !block.is_tree())
    });
    let row = surface.map_or(rows - 2, |row| row - 1);
    (row * tile_size).max(0)
}

impl World {
    /// Grows the world by half its width on any edge the player is close to.
    pub(crate) fn maybe_extend(&mut self, out_events: &mut Vec<Event>) {
        let threshold = self.config.extension_margin * self.config.tile_size;

        let bounds = WorldBounds::of(self.grid.view(), self.config.tile_size);
        if self.player.body.rect.right() > bounds.width - threshold {
            self.extend(ExtensionSide::Right, self.grid.columns() / 2, out_events);
        }
        if self.player.body.rect.left() < threshold {
            self.extend(ExtensionSide::Left, self.grid.columns() / 2, out_events);
        }
    }

    /// Splices `columns` generated columns onto the requested edge.
    ///
    /// Left extensions move every entity right by the added width and lower the
    /// global offset so global coordinates stay fixed.
    pub(crate) fn extend(&mut self, side: ExtensionSide, columns: u32, out_events: &mut Vec<Event>) {
        if columns == 0 {
            return;
        }

        let rows = self.grid.rows();
        let spliced = match side {
            ExtensionSide::Right => {
                let origin = self.x_offset + i64::from(self.grid.columns());
                let slice = self.terrain.generate(origin, columns, rows);
                self.grid.append_right(&slice)
            }
            ExtensionSide::Left => {
                let origin = self.x_offset - i64::from(columns);
                let slice = self.terrain.generate(origin, columns, rows);
                let spliced = self.grid.prepend_left(&slice);
                if spliced.is_ok() {
                    self.x_offset = origin;
                }
                spliced
            }
        };
        if let Err(error) = spliced {
            warn!("discarding {side:?} extension: {error}");
            return;
        }

        if side == ExtensionSide::Left {
            let shift = i32::try_from(columns).unwrap_or(i32::MAX);
            self.shift_entities(shift);
        }
        self.derive_collidables();

        debug!(
            "extended {side:?} by {columns} columns: width {}, offset {}",
            self.grid.columns(),
            self.x_offset
        );
        out_events.push(Event::WorldExtended {
            side,
            columns,
            x_offset: self.x_offset,
        });
    }

    /// Rebuilds the rectangle lists after any terrain mutation.
    pub(crate) fn derive_collidables(&mut self) {
        self.collidables = Collidables::from_grid(self.grid.view(), self.config.tile_size);
    }

    fn shift_entities(&mut self, columns: i32) {
        let pixels = columns.saturating_mul(self.config.tile_size);
        self.player.body.rect.translate(pixels, 0);
        for mob in &mut self.mobs {
            mob.body.rect.translate(pixels, 0);
        }
        for projectile in &mut self.projectiles {
            projectile.rect.translate(pixels, 0);
        }
        self.mining.shift(columns);
    }
}
