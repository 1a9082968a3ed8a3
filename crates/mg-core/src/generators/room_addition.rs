//! Room addition dungeon
//!
//! Start with one room in the middle of the map, then keep generating room
//! shapes and dropping them next to the existing layout. A room is kept only
//! if its bounding box is clear of every other room and a short tunnel can
//! reach the nearest one. Finally, straight shortcuts are punched through
//! thin walls separating areas that are far apart on foot.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use super::cellular::CellularAutomata;
use super::{BuildContext, Layout, PlacedRoom, Strategy};
use crate::error::{ConfigError, check_bounds, check_positive, check_probability, check_range};
use crate::map::{Coord, Corridor, Grid, HallStyle, Rect, RegionAnalyzer, Tile, create_hall};

/// Candidate room shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
pub enum RoomShape {
    /// Walled rectangle
    Square,
    /// Two overlapping bars
    Cross,
    /// Small cellular automata patch
    CellularAutomata,
    /// Large cellular automata patch, only used for the first room
    Cavern,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomAddition {
    /// Side of a cellular automata room
    pub room_max_size: i32,
    /// Smallest cave a cellular automata room may keep
    pub room_min_size: i32,
    pub max_num_rooms: usize,

    pub square_room_max_size: i32,
    pub square_room_min_size: i32,
    pub cross_room_max_size: i32,
    pub cross_room_min_size: i32,

    /// Chance the first room is a cavern
    pub cavern_chance: f64,
    pub cavern_max_size: i32,
    /// Fill chance handed to cellular automata rooms as their
    /// `random_fill_percent`, so it is the chance a cell starts as floor
    pub wall_probability: f64,

    pub square_room_chance: f64,
    pub cross_room_chance: f64,

    pub build_room_attempts: usize,
    pub place_room_attempts: usize,
    pub max_tunnel_length: i32,
    pub hall_style: HallStyle,

    pub include_shortcuts: bool,
    pub shortcut_attempts: usize,
    pub shortcut_length: i32,
    /// A shortcut is only dug if walking around is longer than this
    pub min_path_finding_distance: usize,
}

impl Default for RoomAddition {
    fn default() -> Self {
        Self {
            room_max_size: 15,
            room_min_size: 6,
            max_num_rooms: 30,
            square_room_max_size: 12,
            square_room_min_size: 6,
            cross_room_max_size: 12,
            cross_room_min_size: 6,
            cavern_chance: 0.4,
            cavern_max_size: 35,
            wall_probability: 0.40,
            square_room_chance: 0.2,
            cross_room_chance: 0.15,
            build_room_attempts: 500,
            place_room_attempts: 20,
            max_tunnel_length: 12,
            hall_style: HallStyle::LHall,
            include_shortcuts: true,
            shortcut_attempts: 500,
            shortcut_length: 5,
            min_path_finding_distance: 50,
        }
    }
}

/// A generated room shape in its own buffer. Floor cells never touch the
/// buffer edge.
#[derive(Debug, Clone)]
struct Stamp {
    shape: RoomShape,
    grid: Grid,
}

impl Stamp {
    fn floors(&self) -> Vec<Coord> {
        self.grid.coords_of(Tile::Floor)
    }
}

/// An accepted room
#[derive(Debug, Clone)]
struct AddedRoom {
    bounds: Rect,
    edges: Vec<Coord>,
}

/// Manhattan gap between two rectangles, zero when they overlap
fn rect_gap(a: &Rect, b: &Rect) -> i32 {
    let gap_x = (b.x - (a.right() - 1)).max(a.x - (b.right() - 1)).max(0);
    let gap_y = (b.y - (a.bottom() - 1)).max(a.y - (b.bottom() - 1)).max(0);
    gap_x + gap_y
}

/// Round down to an even number
fn even(v: i32) -> i32 {
    v / 2 * 2
}

/// Fill every floor region except the largest
fn keep_largest_region(grid: &mut Grid) {
    let mut floors = RegionAnalyzer::new(grid).typed_regions(Tile::Floor);
    floors.pop();
    for region in &floors {
        grid.fill_mask(region.cells(), Tile::Wall);
    }
}

impl RoomAddition {
    fn pick_shape(&self, have_rooms: bool, ctx: &mut BuildContext<'_>) -> RoomShape {
        let choice = ctx.noise.next_double();
        if have_rooms {
            if choice < self.square_room_chance {
                RoomShape::Square
            } else if choice < self.square_room_chance + self.cross_room_chance {
                RoomShape::Cross
            } else {
                RoomShape::CellularAutomata
            }
        } else if choice < self.cavern_chance {
            RoomShape::Cavern
        } else {
            RoomShape::Square
        }
    }

    fn generate_room(&self, shape: RoomShape, map_w: i32, map_h: i32, ctx: &mut BuildContext<'_>) -> Stamp {
        let grid = match shape {
            RoomShape::Square => self.square_room(ctx),
            RoomShape::Cross => self.cross_room(ctx),
            RoomShape::CellularAutomata => {
                let side = self.room_max_size.min(map_w).min(map_h);
                self.cellular_room(side, side, ctx)
            }
            RoomShape::Cavern => {
                let w = self.cavern_max_size.min(map_w);
                let h = self.cavern_max_size.min(map_h);
                self.cellular_room(w, h, ctx)
            }
        };
        Stamp { shape, grid }
    }

    /// Walled rectangle at most half as tall as it is wide
    fn square_room(&self, ctx: &mut BuildContext<'_>) -> Grid {
        let w = ctx.noise.next_range(self.square_room_min_size, self.square_room_max_size);
        let min_h = self.square_room_min_size.max(w / 2).min(self.square_room_max_size);
        let h = ctx.noise.next_range(min_h, self.square_room_max_size);
        let mut grid = Grid::new(w, h, Tile::Wall);
        grid.create_container(grid.bounds(), 1, Tile::Wall, |_| Tile::Floor);
        grid
    }

    /// Horizontal and vertical bar crossing at the centre, even sizes
    fn cross_room(&self, ctx: &mut BuildContext<'_>) -> Grid {
        let noise = &mut *ctx.noise;
        let horizontal_w = even(noise.next_range(self.cross_room_min_size + 2, self.cross_room_max_size));
        let vertical_h = even(noise.next_range(self.cross_room_min_size + 2, self.cross_room_max_size));
        let horizontal_h = even(noise.next_range(self.cross_room_min_size, vertical_h - 2)).min(vertical_h);
        let vertical_w = even(noise.next_range(self.cross_room_min_size, horizontal_w - 2)).min(horizontal_w);

        let mut grid = Grid::new(horizontal_w + 2, vertical_h + 2, Tile::Wall);
        let vertical_offset = vertical_h / 2 - horizontal_h / 2;
        grid.fill_rect(
            Rect::new(1, 1 + vertical_offset, horizontal_w, horizontal_h),
            Tile::Floor,
        );
        let horizontal_offset = horizontal_w / 2 - vertical_w / 2;
        grid.fill_rect(
            Rect::new(1 + horizontal_offset, 1, vertical_w, vertical_h),
            Tile::Floor,
        );
        grid
    }

    /// Cellular automata patch reduced to its largest cave
    fn cellular_room(&self, w: i32, h: i32, ctx: &mut BuildContext<'_>) -> Grid {
        let params = CellularAutomata {
            random_fill_percent: self.wall_probability,
            min_room_area: self.room_min_size.max(1) as usize,
            ..CellularAutomata::default()
        };
        let mut grid = Grid::new(w.max(3), h.max(3), Tile::Wall);
        let mut sub = BuildContext {
            noise: &mut *ctx.noise,
            hall_max_width: ctx.hall_max_width,
        };
        params.build(&mut grid, &mut sub);
        keep_largest_region(&mut grid);
        grid
    }

    /// Nearest accepted room by tunnel length, as `(index, new edge, old
    /// edge, length)`. Rooms farther than `max_tunnel_length` are ignored.
    fn nearest_room(&self, rooms: &[AddedRoom], bounds: Rect, edges: &[Coord]) -> Option<(usize, Coord, Coord, i32)> {
        let mut best: Option<(usize, Coord, Coord, i32)> = None;
        for (i, room) in rooms.iter().enumerate() {
            if rect_gap(&bounds, &room.bounds) > self.max_tunnel_length {
                continue;
            }
            for &from in edges {
                for &to in &room.edges {
                    let length = from.manhattan(to);
                    if best.is_none_or(|(_, _, _, l)| length < l) {
                        best = Some((i, from, to, length));
                    }
                }
            }
        }
        best.filter(|&(_, _, _, length)| length <= self.max_tunnel_length)
    }

    /// Copy the stamp's floor into the map at `offset` and record the room
    fn add_room(&self, grid: &mut Grid, stamp: &Stamp, offset: Coord, rooms: &mut Vec<AddedRoom>, layout: &mut Layout) {
        let cells: Vec<Coord> = stamp.floors().iter().map(|c| c.offset(offset.x, offset.y)).collect();
        grid.fill_mask(&cells, Tile::Floor);
        let edges = stamp
            .floors()
            .into_iter()
            .filter(|&c| stamp.grid.has_cross_neighbor(c, Tile::Wall))
            .map(|c| c.offset(offset.x, offset.y))
            .collect();
        let Some(bounds) = Rect::bounding(&cells) else {
            return;
        };
        rooms.push(AddedRoom { bounds, edges });
        layout.rooms.push(PlacedRoom {
            bounds,
            area: cells.len(),
        });
    }

    /// Try to drop `stamp` somewhere it clears every room and can be
    /// tunnelled to its nearest neighbour
    fn place_room(
        &self,
        grid: &mut Grid,
        stamp: &Stamp,
        rooms: &mut Vec<AddedRoom>,
        layout: &mut Layout,
        ctx: &mut BuildContext<'_>,
    ) -> bool {
        let (sw, sh) = (stamp.grid.width(), stamp.grid.height());
        let floors = stamp.floors();
        let Some(local_bounds) = Rect::bounding(&floors) else {
            return false;
        };
        let local_edges: Vec<Coord> = floors
            .iter()
            .copied()
            .filter(|&c| stamp.grid.has_cross_neighbor(c, Tile::Wall))
            .collect();

        for _ in 0..self.place_room_attempts {
            let x = ctx.noise.next_range(0, grid.width() - sw);
            let y = ctx.noise.next_range(0, grid.height() - sh);
            if x > grid.width() - sw || y > grid.height() - sh {
                return false;
            }

            let footprint = Rect::new(x, y, sw, sh);
            if rooms.iter().any(|r| r.bounds.intersects(&footprint)) {
                continue;
            }

            let bounds = Rect::new(local_bounds.x + x, local_bounds.y + y, local_bounds.w, local_bounds.h);
            let edges: Vec<Coord> = local_edges.iter().map(|c| c.offset(x, y)).collect();
            let Some((_, from, to, _)) = self.nearest_room(rooms, bounds, &edges) else {
                continue;
            };

            self.add_room(grid, stamp, Coord::new(x, y), rooms, layout);
            let style = create_hall(grid, from, to, self.hall_style, ctx.hall_max_width, ctx.noise);
            layout.corridors.push(Corridor { from, to, style });
            return true;
        }
        false
    }

    /// Punch straight tunnels through walls of at most `shortcut_length`
    /// cells when the floor on either side is far apart on foot
    fn add_shortcuts(&self, grid: &mut Grid, layout: &mut Layout, ctx: &mut BuildContext<'_>) {
        const DIRECTIONS: [(i32, i32); 4] = [(0, -1), (0, 1), (1, 0), (-1, 0)];
        let mut floors = grid.coords_of(Tile::Floor);
        let mut dug = 0;

        for _ in 0..self.shortcut_attempts {
            let Some(&start) = ctx.noise.choose(&floors) else {
                return;
            };
            let (dx, dy) = DIRECTIONS[ctx.noise.next_below(3) as usize];

            let mut run = Vec::new();
            let mut cursor = start.offset(dx, dy);
            while grid.is_interior(cursor, 1) && grid.tile(cursor) == Tile::Wall && run.len() as i32 <= self.shortcut_length {
                run.push(cursor);
                cursor = cursor.offset(dx, dy);
            }
            let lands_on_floor = grid.is_interior(cursor, 1) && grid.tile(cursor) == Tile::Floor;
            if run.is_empty() || run.len() as i32 > self.shortcut_length || !lands_on_floor {
                continue;
            }

            let walk = RegionAnalyzer::new(grid).path_distance(start, cursor, Tile::Floor);
            if walk.is_some_and(|d| d <= self.min_path_finding_distance) {
                continue;
            }

            debug!("room addition: shortcut {:?} -> {:?}, walk was {:?}", start, cursor, walk);
            grid.fill_mask(&run, Tile::Floor);
            // a straight run is an L-hall with one empty leg
            layout.corridors.push(Corridor {
                from: start,
                to: cursor,
                style: HallStyle::LHall,
            });
            floors = grid.coords_of(Tile::Floor);
            dug += 1;
        }
        debug!("room addition: {} shortcuts", dug);
    }
}

impl Strategy for RoomAddition {
    fn validate(&self) -> Result<(), ConfigError> {
        check_positive("room_min_size", self.room_min_size as i64)?;
        check_range("room_size", self.room_min_size, self.room_max_size)?;
        check_bounds("room_max_size", self.room_max_size as i64, 3, i32::MAX as i64)?;
        check_positive("max_num_rooms", self.max_num_rooms as i64)?;
        check_bounds("square_room_min_size", self.square_room_min_size as i64, 3, i32::MAX as i64)?;
        check_range("square_room_size", self.square_room_min_size, self.square_room_max_size)?;
        check_bounds("cross_room_min_size", self.cross_room_min_size as i64, 2, i32::MAX as i64)?;
        check_range("cross_room_size", self.cross_room_min_size, self.cross_room_max_size)?;
        check_bounds("cavern_max_size", self.cavern_max_size as i64, 3, i32::MAX as i64)?;
        check_probability("cavern_chance", self.cavern_chance)?;
        check_probability("wall_probability", self.wall_probability)?;
        check_probability("square_room_chance", self.square_room_chance)?;
        check_probability("cross_room_chance", self.cross_room_chance)?;
        check_probability("square_room_chance + cross_room_chance", self.square_room_chance + self.cross_room_chance)?;
        check_positive("place_room_attempts", self.place_room_attempts as i64)?;
        check_bounds("max_tunnel_length", self.max_tunnel_length as i64, 0, i32::MAX as i64)?;
        if self.include_shortcuts {
            check_positive("shortcut_length", self.shortcut_length as i64)?;
        }
        Ok(())
    }

    fn build(&self, grid: &mut Grid, ctx: &mut BuildContext<'_>) -> Layout {
        grid.fill(Tile::Wall);
        let (w, h) = (grid.width(), grid.height());
        let mut layout = Layout::default();
        let mut rooms: Vec<AddedRoom> = Vec::with_capacity(self.max_num_rooms);

        // seed room, centred
        for _ in 0..self.place_room_attempts {
            let shape = self.pick_shape(false, ctx);
            let stamp = self.generate_room(shape, w, h, ctx);
            let (sw, sh) = (stamp.grid.width(), stamp.grid.height());
            if sw > w || sh > h || stamp.floors().is_empty() {
                debug!("room addition: {} seed room does not fit", stamp.shape);
                continue;
            }
            let offset = Coord::new((w - sw) / 2, (h - sh) / 2);
            self.add_room(grid, &stamp, offset, &mut rooms, &mut layout);
            break;
        }
        if rooms.is_empty() {
            warn!("room addition: no seed room fits a {}x{} map", w, h);
            return layout;
        }

        for attempt in 0..self.build_room_attempts {
            if rooms.len() >= self.max_num_rooms {
                break;
            }
            let shape = self.pick_shape(true, ctx);
            let stamp = self.generate_room(shape, w, h, ctx);
            if !self.place_room(grid, &stamp, &mut rooms, &mut layout, ctx) {
                debug!("room addition: attempt {} could not place {}", attempt, stamp.shape);
            }
        }

        if self.include_shortcuts {
            self.add_shortcuts(grid, &mut layout, ctx);
        }

        info!(
            "room addition: {} rooms, {} tunnels",
            layout.rooms.len(),
            layout.corridors.len()
        );
        layout
    }
}
