//! Corridor carving between two points
//!
//! Every routine writes floor only. Callers pass endpoints that are inside
//! the grid; the straight and staircase routines never leave the bounding
//! box of their endpoints so they cannot step outside either.

use mg_rng::NoiseSource;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::grid::Grid;
use super::rect::Coord;
use super::tile::Tile;

/// How a corridor between two points is shaped
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumIter, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum HallStyle {
    /// Chain of discs along a straight line
    DottedLine,
    /// Axis-aligned staircase with random steps
    Meander,
    /// One horizontal and one vertical segment
    #[default]
    LHall,
    /// Pick one of the above per corridor
    Random,
}

/// Which leg of an L-hall is carved first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LOrder {
    /// Corner at `(to.x, from.y)`
    HorizontalFirst,
    /// Corner at `(from.x, to.y)`
    VerticalFirst,
}

/// A carved corridor, as reported in a generation layout. Straight
/// shortcuts are reported as `LHall` with `from` and `to` on one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Corridor {
    pub from: Coord,
    pub to: Coord,
    /// Resolved style (never `Random`)
    pub style: HallStyle,
}

/// Axis of a straight carve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Fill a straight run. For a horizontal run `fixed` is the row and the
/// run covers columns `a..=b` (in either order); vertical is the transpose.
pub fn carve_straight(grid: &mut Grid, axis: Axis, fixed: i32, a: i32, b: i32, tile: Tile) {
    for v in a.min(b)..=a.max(b) {
        let c = match axis {
            Axis::Horizontal => Coord::new(v, fixed),
            Axis::Vertical => Coord::new(fixed, v),
        };
        grid.set(c, tile);
    }
}

/// Carve an L-shaped hall. `order` of `None` flips a coin. Returns the
/// order actually used.
pub fn carve_l_hall(
    grid: &mut Grid,
    from: Coord,
    to: Coord,
    order: Option<LOrder>,
    noise: &mut NoiseSource,
) -> LOrder {
    let order = order.unwrap_or_else(|| {
        if noise.next_bool() {
            LOrder::HorizontalFirst
        } else {
            LOrder::VerticalFirst
        }
    });
    match order {
        LOrder::HorizontalFirst => {
            carve_straight(grid, Axis::Horizontal, from.y, from.x, to.x, Tile::Floor);
            carve_straight(grid, Axis::Vertical, to.x, from.y, to.y, Tile::Floor);
        }
        LOrder::VerticalFirst => {
            carve_straight(grid, Axis::Vertical, from.x, from.y, to.y, Tile::Floor);
            carve_straight(grid, Axis::Horizontal, to.y, from.x, to.x, Tile::Floor);
        }
    }
    order
}

/// Carve a staircase path, flipping a coin at each step to choose which
/// axis advances toward `to`. Once one axis is aligned the rest is straight.
pub fn carve_meander(grid: &mut Grid, from: Coord, to: Coord, noise: &mut NoiseSource) {
    let step_x = (to.x - from.x).signum();
    let step_y = (to.y - from.y).signum();
    let mut cur = from;
    grid.set(cur, Tile::Floor);
    while cur != to {
        let can_x = cur.x != to.x;
        let can_y = cur.y != to.y;
        if can_x && can_y {
            if noise.next_bool() {
                cur.x += step_x;
            } else {
                cur.y += step_y;
            }
        } else if can_x {
            cur.x += step_x;
        } else {
            cur.y += step_y;
        }
        grid.set(cur, Tile::Floor);
    }
}

/// Stamp a disc of random radius `1..=max(1, hall_max_width / 2)` on every
/// point of the line between `from` and `to`. Discs stay one cell clear of
/// the grid edge.
pub fn carve_dotted_line(
    grid: &mut Grid,
    from: Coord,
    to: Coord,
    hall_max_width: i32,
    noise: &mut NoiseSource,
) {
    let max_radius = (hall_max_width / 2).max(1);
    for point in Grid::line(from, to) {
        let radius = noise.next_range(1, max_radius);
        grid.draw_circle(point, radius, Tile::Floor, 1);
    }
}

/// Carve a hall of the given style and return the style actually used
pub fn create_hall(
    grid: &mut Grid,
    from: Coord,
    to: Coord,
    style: HallStyle,
    hall_max_width: i32,
    noise: &mut NoiseSource,
) -> HallStyle {
    let style = match style {
        HallStyle::Random => match noise.next_range(0, 2) {
            0 => HallStyle::DottedLine,
            1 => HallStyle::Meander,
            _ => HallStyle::LHall,
        },
        other => other,
    };
    match style {
        HallStyle::DottedLine => carve_dotted_line(grid, from, to, hall_max_width, noise),
        HallStyle::Meander => carve_meander(grid, from, to, noise),
        HallStyle::LHall | HallStyle::Random => {
            carve_l_hall(grid, from, to, None, noise);
        }
    }
    style
}
