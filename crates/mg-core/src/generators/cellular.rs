//! Cellular automata caves
//!
//! Random fill, a few rounds of a simultaneous smoothing rule, then an
//! optional cleanup that drops tiny caves, fills small pillars and joins
//! the surviving caves. Cleanup retries with relaxed thresholds when
//! `degrade_attempts` is set; otherwise the last smoothed grid is kept
//! as is.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use super::{BuildContext, Layout, PlacedRoom, Strategy};
use crate::error::{ConfigError, check_bounds, check_positive, check_probability, check_range};
use crate::map::{Coord, Grid, HallStyle, RegionAnalyzer, RoomGraph, Tile};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CellularAutomata {
    pub smooth_iterations: u32,
    /// Derive both wall thresholds from the search radius
    pub auto_wall_density: bool,
    pub min_wall_count: i32,
    pub max_wall_count: i32,
    /// Neighbourhood radius `k`; the window holds `(2k+1)^2 - 1` cells
    pub search_radius: i32,
    /// Chance of an interior cell starting as floor
    pub random_fill_percent: f64,
    pub clean_map: bool,
    /// Cleanup attempts before thresholds are relaxed
    pub clean_attempts: u32,
    /// Relax `min_rooms` and `min_room_area` after each failed batch
    pub degrade_attempts: bool,
    pub min_rooms: usize,
    pub min_room_area: usize,
    /// Wall pillars up to this size become floor
    pub min_island_area: usize,
    pub hall_style: HallStyle,
}

impl Default for CellularAutomata {
    fn default() -> Self {
        Self {
            smooth_iterations: 5,
            auto_wall_density: true,
            min_wall_count: 4,
            max_wall_count: 4,
            search_radius: 1,
            random_fill_percent: 0.40,
            clean_map: true,
            clean_attempts: 5,
            degrade_attempts: true,
            min_rooms: 1,
            min_room_area: 25,
            min_island_area: 50,
            hall_style: HallStyle::DottedLine,
        }
    }
}

impl CellularAutomata {
    /// Largest number of walls the search window can hold
    pub fn window_size(&self) -> i32 {
        4 * self.search_radius * (self.search_radius + 1)
    }

    /// `(min, max)` wall counts. Fewer than `min` walls around a cell makes
    /// it floor, more than `max` makes it wall.
    pub fn wall_thresholds(&self) -> (i32, i32) {
        if self.auto_wall_density {
            let t = 2 * self.search_radius * (self.search_radius + 1);
            (t, t)
        } else {
            (self.min_wall_count, self.max_wall_count)
        }
    }

    /// Interior cells become floor with `random_fill_percent` chance; the
    /// outer ring is wall
    pub fn seed_grid(&self, grid: &mut Grid, ctx: &mut BuildContext<'_>) {
        let fill = self.random_fill_percent;
        let noise = &mut *ctx.noise;
        grid.create_container(grid.bounds(), 1, Tile::Wall, |_| {
            if noise.chance(fill) { Tile::Floor } else { Tile::Wall }
        });
    }

    /// One simultaneous smoothing step
    pub fn smooth(&self, grid: &mut Grid) {
        let (min_wall, max_wall) = self.wall_thresholds();
        let current = grid.clone();
        for x in 0..grid.width() {
            for y in 0..grid.height() {
                let c = Coord::new(x, y);
                if !grid.is_interior(c, 1) {
                    grid.set(c, Tile::Wall);
                    continue;
                }
                let walls = current.wall_count(c, self.search_radius);
                if walls < min_wall {
                    grid.set(c, Tile::Floor);
                } else if walls > max_wall {
                    grid.set(c, Tile::Wall);
                }
            }
        }
    }

    /// Remove small caves and pillars, then connect what is left. Returns
    /// `None` when fewer than `min_rooms` caves of `min_room_area` survive;
    /// the grid is only written on success.
    fn clean(
        &self,
        grid: &mut Grid,
        ctx: &mut BuildContext<'_>,
        min_rooms: usize,
        min_room_area: usize,
    ) -> Option<Layout> {
        let floors = RegionAnalyzer::new(grid).typed_regions(Tile::Floor);
        if floors.iter().filter(|r| r.len() >= min_room_area).count() < min_rooms {
            return None;
        }
        let mut cleaned = grid.clone();
        for region in floors.iter().filter(|r| r.len() < min_room_area) {
            cleaned.fill_mask(region.cells(), Tile::Wall);
        }

        self.fill_islands(&mut cleaned);

        let rooms = RegionAnalyzer::new(&cleaned).typed_regions(Tile::Floor);
        if rooms.len() < min_rooms {
            return None;
        }
        *grid = cleaned;
        Some(connect_regions(grid, ctx, rooms, self.hall_style))
    }

    /// Wall regions up to `min_island_area` become floor. Regions touching
    /// the outer ring are never islands.
    fn fill_islands(&self, grid: &mut Grid) {
        let islands: Vec<_> = RegionAnalyzer::new(grid)
            .typed_regions(Tile::Wall)
            .into_iter()
            .filter(|r| r.len() <= self.min_island_area)
            .filter(|r| r.cells().iter().all(|&c| grid.is_interior(c, 1)))
            .collect();
        for island in &islands {
            grid.fill_mask(island.cells(), Tile::Floor);
        }
    }

    /// Cleanup after every retry ran out: keep caves of at least
    /// `min_room_area`, or the biggest one if none is that large
    fn best_effort(&self, grid: &mut Grid, ctx: &mut BuildContext<'_>, min_room_area: usize) -> Layout {
        let mut floors = RegionAnalyzer::new(grid).typed_regions(Tile::Floor);
        let Some(largest) = floors.pop() else {
            return Layout::default();
        };
        for region in floors.iter().filter(|r| r.len() < min_room_area) {
            grid.fill_mask(region.cells(), Tile::Wall);
        }
        debug!("kept largest cave of {} tiles", largest.len());

        self.fill_islands(grid);
        let rooms = RegionAnalyzer::new(grid).typed_regions(Tile::Floor);
        connect_regions(grid, ctx, rooms, self.hall_style)
    }
}

/// Turn floor regions into a room graph and link every room to the hub
fn connect_regions(
    grid: &mut Grid,
    ctx: &mut BuildContext<'_>,
    regions: Vec<crate::map::Region>,
    style: HallStyle,
) -> Layout {
    let mut graph = RoomGraph::from_regions(regions, grid);
    let rooms = graph
        .rooms()
        .iter()
        .filter_map(|room| {
            room.bounds().map(|bounds| PlacedRoom {
                bounds,
                area: room.size(),
            })
        })
        .collect();
    let corridors = graph.connect_closest_rooms(grid, style, ctx.hall_max_width, ctx.noise);
    Layout { rooms, corridors }
}

impl Strategy for CellularAutomata {
    fn validate(&self) -> Result<(), ConfigError> {
        check_bounds("search_radius", self.search_radius as i64, 1, 8)?;
        check_probability("random_fill_percent", self.random_fill_percent)?;
        if !self.auto_wall_density {
            check_range("wall_count", self.min_wall_count, self.max_wall_count)?;
            check_bounds("min_wall_count", self.min_wall_count as i64, 1, self.window_size() as i64)?;
            check_bounds("max_wall_count", self.max_wall_count as i64, 1, self.window_size() as i64)?;
        }
        if self.clean_map {
            check_positive("clean_attempts", self.clean_attempts as i64)?;
            check_positive("min_rooms", self.min_rooms as i64)?;
        }
        Ok(())
    }

    fn build(&self, grid: &mut Grid, ctx: &mut BuildContext<'_>) -> Layout {
        let mut min_rooms = self.min_rooms;
        let mut min_room_area = self.min_room_area;
        let mut attempts = 0;
        let mut total = 0;

        loop {
            self.seed_grid(grid, ctx);
            for _ in 0..self.smooth_iterations {
                self.smooth(grid);
            }
            total += 1;

            if !self.clean_map {
                info!("cellular automata: {} floor tiles, no cleanup", grid.count(Tile::Floor));
                return Layout::default();
            }

            if let Some(layout) = self.clean(grid, ctx, min_rooms, min_room_area) {
                info!(
                    "cellular automata: {} caves, {} corridors after {} attempts",
                    layout.rooms.len(),
                    layout.corridors.len(),
                    total
                );
                return layout;
            }
            debug!("cellular automata: attempt {} rejected", total);

            attempts += 1;
            if attempts < self.clean_attempts {
                continue;
            }
            if !self.degrade_attempts {
                warn!(
                    "cellular automata: no acceptable cave after {} attempts, keeping the uncleaned grid",
                    total
                );
                return Layout::default();
            }
            attempts = 0;
            min_rooms = min_rooms.saturating_sub(1).max(1);
            min_room_area = min_room_area.saturating_sub(1).max(1);
            debug!(
                "cellular automata: relaxed to {} rooms of {} tiles",
                min_rooms, min_room_area
            );
            if min_rooms + min_room_area <= 2 {
                warn!("cellular automata: thresholds exhausted after {} attempts", total);
                return self.best_effort(grid, ctx, min_room_area);
            }
        }
    }
}
