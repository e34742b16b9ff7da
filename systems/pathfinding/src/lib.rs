#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Grid-aware A* search with level, step-up and short-drop moves.
//!
//! A tile is walkable when it holds air and the tile beneath it is solid.
//! Every move costs one step regardless of its kind, and the heuristic is the
//! Manhattan distance to the goal.

use std::{
    cmp::Reverse,
    collections::{BinaryHeap, HashMap},
};

use log::{trace, warn};
use strata_core::{BlockId, TileCoord, TileGridView};

/// Default bound on the number of tiles expanded by a single search.
pub const DEFAULT_MAX_EXPANSIONS: usize = 4096;

/// Deepest ledge drop considered as a single move.
pub const MAX_DROP: i32 = 2;

/// Reports whether a tile is air resting on solid ground.
#[must_use]
pub fn is_walkable(view: TileGridView<'_>, tile: TileCoord) -> bool {
    view.block(tile) == Some(BlockId::Empty) && view.is_solid(tile.offset(0, 1))
}

/// Appends the tiles reachable from `tile` in a single move.
///
/// For each horizontal direction at most one neighbour is produced: a level
/// move, otherwise a one-tile step up, otherwise the shallowest ledge drop of
/// at most [`MAX_DROP`] tiles.
pub fn neighbors(view: TileGridView<'_>, tile: TileCoord, out: &mut Vec<TileCoord>) {
    for dx in [-1, 1] {
        let level = tile.offset(dx, 0);
        if is_walkable(view, level) {
            out.push(level);
            continue;
        }

        let step = tile.offset(dx, -1);
        if is_walkable(view, step) {
            out.push(step);
            continue;
        }

        if let Some(landing) = (1..=MAX_DROP)
            .map(|drop| tile.offset(dx, drop))
            .find(|landing| is_walkable(view, *landing))
        {
            out.push(landing);
        }
    }
}

/// Topmost walkable tile of a column, if any.
#[must_use]
pub fn surface_walkable(view: TileGridView<'_>, column: i32) -> Option<TileCoord> {
    let (_, rows) = view.dimensions();
    (0..rows as i32)
        .map(|row| TileCoord::new(column, row))
        .find(|tile| is_walkable(view, *tile))
}

/// A* search bounded by a maximum number of expansions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pathfinder {
    max_expansions: usize,
}

impl Pathfinder {
    /// Creates a pathfinder that gives up after `max_expansions` expansions.
    #[must_use]
    pub const fn new(max_expansions: usize) -> Self {
        Self { max_expansions }
    }

    /// Upper bound on tiles expanded per search.
    #[must_use]
    pub const fn max_expansions(&self) -> usize {
        self.max_expansions
    }

    /// Finds a shortest path from `start` to `goal`, both included.
    ///
    /// The start tile need not be walkable, so airborne mobs can still plan.
    /// Returns `None` when the goal is not walkable, the open set empties, or
    /// the expansion budget runs out.
    #[must_use]
    pub fn find_path(
        &self,
        view: TileGridView<'_>,
        start: TileCoord,
        goal: TileCoord,
    ) -> Option<Vec<TileCoord>> {
        if start == goal {
            return Some(vec![start]);
        }
        if !view.contains(start) || !is_walkable(view, goal) {
            return None;
        }

        let mut open = BinaryHeap::<(Reverse<u32>, Reverse<u32>, TileCoord)>::new();
        let mut g_scores = HashMap::<TileCoord, u32>::new();
        let mut came_from = HashMap::<TileCoord, TileCoord>::new();
        let mut scratch = Vec::with_capacity(2);

        let _ = g_scores.insert(start, 0);
        open.push((Reverse(start.manhattan_distance(goal)), Reverse(0), start));

        let mut expanded = 0usize;
        while let Some((_, Reverse(cost), current)) = open.pop() {
            if g_scores.get(&current).is_some_and(|best| cost > *best) {
                continue;
            }
            if current == goal {
                trace!("path {start:?} -> {goal:?} found after {expanded} expansions");
                return Some(reconstruct(&came_from, start, goal));
            }

            expanded += 1;
            if expanded > self.max_expansions {
                warn!(
                    "path search {start:?} -> {goal:?} abandoned after {} expansions",
                    self.max_expansions
                );
                return None;
            }

            scratch.clear();
            neighbors(view, current, &mut scratch);
            for &next in &scratch {
                let tentative = cost + 1;
                if g_scores.get(&next).map_or(true, |known| tentative < *known) {
                    let _ = g_scores.insert(next, tentative);
                    let _ = came_from.insert(next, current);
                    open.push((
                        Reverse(tentative + next.manhattan_distance(goal)),
                        Reverse(tentative),
                        next,
                    ));
                }
            }
        }

        None
    }
}

impl Default for Pathfinder {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_EXPANSIONS)
    }
}

fn reconstruct(
    came_from: &HashMap<TileCoord, TileCoord>,
    start: TileCoord,
    goal: TileCoord,
) -> Vec<TileCoord> {
    let mut path = vec![goal];
    let mut cursor = goal;
    while cursor != start {
        match came_from.get(&cursor) {
            Some(previous) => {
                cursor = *previous;
                path.push(cursor);
            }
            None => break,
        }
    }
    path.reverse();
    path
}
