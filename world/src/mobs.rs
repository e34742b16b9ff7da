//! Mob and projectile populations owned by the world.

use log::{debug, trace};
use strata_core::{
    DamageSource, Event, MobClass, MobId, MobKind, MobSnapshot, PixelRect, ProjectileId,
    ProjectileSnapshot, TileGridView,
};
use strata_system_physics::{advance_mob, mob_grounded, Body, WorldBounds};

use crate::{extension::find_surface_y, World};

/// Movement decision consumed by the next mob advance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Steering {
    horizontal: i32,
    jump: bool,
}

/// Live mob stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct Mob {
    id: MobId,
    kind: MobKind,
    pub(crate) body: Body,
    health: i32,
    steering: Steering,
}

impl Mob {
    pub(crate) fn snapshot(&self, view: TileGridView<'_>, tile_size: i32) -> MobSnapshot {
        MobSnapshot {
            id: self.id,
            kind: self.kind,
            rect: self.body.rect,
            velocity_y: self.body.velocity.y,
            health: self.health,
            grounded: mob_grounded(&self.body.rect, view, tile_size),
        }
    }
}

/// Live projectile stored inside the world.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Projectile {
    id: ProjectileId,
    pub(crate) rect: PixelRect,
    velocity_x: i32,
    velocity_y: i32,
}

impl Projectile {
    pub(crate) fn snapshot(&self) -> ProjectileSnapshot {
        ProjectileSnapshot {
            id: self.id,
            rect: self.rect,
            velocity_x: self.velocity_x,
            velocity_y: self.velocity_y,
        }
    }
}

impl World {
    fn mob_index(&self, mob: MobId) -> Option<usize> {
        self.mobs.binary_search_by_key(&mob, |entry| entry.id).ok()
    }

    /// Places a tile-sized mob on the surface of a local column.
    pub(crate) fn spawn_mob(&mut self, class: MobClass, column: u32, out_events: &mut Vec<Event>) {
        if column >= self.grid.columns() {
            trace!("ignoring {class:?} spawn outside the grid at column {column}");
            return;
        }
        let tile_size = self.config.tile_size;
        let column = i32::try_from(column).unwrap_or(i32::MAX);
        let top = find_surface_y(self.grid.view(), column, tile_size);
        let rect = PixelRect::new(column * tile_size, top, tile_size, tile_size);

        let id = MobId::new(self.next_mob_id);
        self.next_mob_id = self.next_mob_id.saturating_add(1);
        self.mobs.push(Mob {
            id,
            kind: MobKind::spawn(class),
            body: Body::at_rest(rect),
            health: class.base_health(),
            steering: Steering::default(),
        });
        debug!("spawned {class:?} mob {} at column {column}", id.get());
        out_events.push(Event::MobSpawned {
            mob: id,
            class,
            rect,
        });
    }

    pub(crate) fn steer_mob(&mut self, mob: MobId, horizontal: i32, jump: bool) {
        if let Some(index) = self.mob_index(mob) {
            self.mobs[index].steering = Steering { horizontal, jump };
        }
    }

    /// Launches a projectile from a ready ranged mob and restarts its cooldown.
    pub(crate) fn fire_projectile(
        &mut self,
        mob: MobId,
        velocity_x: i32,
        velocity_y: i32,
        out_events: &mut Vec<Event>,
    ) {
        let Some(index) = self.mob_index(mob) else {
            return;
        };
        let shooter = &mut self.mobs[index];
        let MobKind::Ranged { cooldown } = &mut shooter.kind else {
            trace!("mob {} cannot fire", mob.get());
            return;
        };
        if *cooldown > 0 {
            return;
        }
        *cooldown = self.config.ranged_cooldown;

        let size = self.config.projectile_size;
        let rect = PixelRect::new(
            shooter.body.rect.center_x(),
            shooter.body.rect.center_y(),
            size,
            size,
        );
        let id = ProjectileId::new(self.next_projectile_id);
        self.next_projectile_id = self.next_projectile_id.saturating_add(1);
        self.projectiles.push(Projectile {
            id,
            rect,
            velocity_x,
            velocity_y,
        });
        out_events.push(Event::ProjectileFired { projectile: id, mob });
    }

    /// Integrates every mob with its pending steering, ticks ranged cooldowns
    /// and applies melee contact damage.
    pub(crate) fn advance_mobs(&mut self, out_events: &mut Vec<Event>) {
        let tile_size = self.config.tile_size;
        let view = self.grid.view();
        for mob in &mut self.mobs {
            let Steering { horizontal, jump } = std::mem::take(&mut mob.steering);
            advance_mob(
                &mut mob.body,
                horizontal,
                jump,
                &self.config.physics,
                view,
                tile_size,
            );
            if let MobKind::Ranged { cooldown } = &mut mob.kind {
                *cooldown = cooldown.saturating_sub(1);
            }
        }

        let player = self.player.body.rect;
        let contacts: Vec<MobId> = self
            .mobs
            .iter()
            .filter(|mob| mob.kind == MobKind::Melee && mob.body.rect.intersects(&player))
            .map(|mob| mob.id)
            .collect();
        for mob in contacts {
            self.hurt_player(
                self.config.melee_contact_damage,
                DamageSource::Melee(mob),
                out_events,
            );
        }
    }

    /// Moves every projectile and removes those that left the world, struck a
    /// solid tile or hit the player.
    pub(crate) fn advance_projectiles(&mut self, out_events: &mut Vec<Event>) {
        let tile_size = self.config.tile_size;
        let view = self.grid.view();
        let width = WorldBounds::of(view, tile_size).width;
        let player = self.player.body.rect;

        let mut hits = Vec::new();
        let mut removed = Vec::new();
        for projectile in &mut self.projectiles {
            projectile
                .rect
                .translate(projectile.velocity_x, projectile.velocity_y);
            let rect = projectile.rect;
            if rect.right() < 0 || rect.left() > width || view.is_solid(rect.center_tile(tile_size)) {
                removed.push(projectile.id);
            } else if rect.intersects(&player) {
                hits.push(projectile.id);
                removed.push(projectile.id);
            }
        }
        self.projectiles
            .retain(|projectile| !removed.contains(&projectile.id));

        for projectile in hits {
            self.hurt_player(
                self.config.projectile_damage,
                DamageSource::Projectile(projectile),
                out_events,
            );
        }
        for projectile in removed {
            out_events.push(Event::ProjectileRemoved { projectile });
        }
    }

    /// Damages every mob overlapping `area`, removing those whose health runs
    /// out in the same call.
    pub(crate) fn damage_mobs(&mut self, area: PixelRect, damage: i32, out_events: &mut Vec<Event>) {
        let mut killed = Vec::new();
        for mob in &mut self.mobs {
            if !mob.body.rect.intersects(&area) {
                continue;
            }
            mob.health -= damage;
            out_events.push(Event::MobDamaged {
                mob: mob.id,
                damage,
                remaining: mob.health,
            });
            if mob.health <= 0 {
                killed.push((mob.id, mob.kind));
            }
        }
        if killed.is_empty() {
            return;
        }
        self.mobs.retain(|mob| mob.health > 0);

        for (mob, kind) in killed {
            debug!("mob {} killed", mob.get());
            out_events.push(Event::MobKilled {
                mob,
                class: kind.class(),
            });
            if let MobKind::Passive { food_drop, .. } = kind {
                self.credit_food(food_drop, out_events);
            }
        }
    }
}
