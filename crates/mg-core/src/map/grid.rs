//! Tile grid and fill/draw primitives
//!
//! Cells are stored column-major (`tiles[x][y]`). Dimensions never change
//! after allocation. Area primitives clip to the grid; single-cell writes
//! outside the grid are a caller bug and panic.

use std::fmt;

use super::rect::{Coord, Rect};
use super::tile::Tile;

/// 2D tile buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: i32,
    height: i32,
    tiles: Vec<Vec<Tile>>,
}

impl Grid {
    /// Allocate a grid with every cell set to `fill`
    pub fn new(width: i32, height: i32, fill: Tile) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            width,
            height,
            tiles: vec![vec![fill; height as usize]; width as usize],
        }
    }

    /// Parse rows of `#`/`.` glyphs. Returns `None` on ragged rows or
    /// unknown glyphs.
    pub fn from_ascii(text: &str) -> Option<Self> {
        let rows: Vec<&str> = text.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
        let height = rows.len() as i32;
        let width = rows.first().map_or(0, |r| r.chars().count()) as i32;
        let mut grid = Grid::new(width, height, Tile::Wall);
        for (y, row) in rows.iter().enumerate() {
            if row.chars().count() as i32 != width {
                return None;
            }
            for (x, c) in row.chars().enumerate() {
                grid.tiles[x][y] = Tile::from_ascii(c)?;
            }
        }
        Some(grid)
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// The whole grid as a rectangle
    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }

    pub fn in_bounds(&self, c: Coord) -> bool {
        c.x >= 0 && c.x < self.width && c.y >= 0 && c.y < self.height
    }

    /// Check if `c` is at least `margin` cells away from every edge
    pub fn is_interior(&self, c: Coord, margin: i32) -> bool {
        c.x >= margin && c.x < self.width - margin && c.y >= margin && c.y < self.height - margin
    }

    pub fn get(&self, c: Coord) -> Option<Tile> {
        if self.in_bounds(c) {
            Some(self.tiles[c.x as usize][c.y as usize])
        } else {
            None
        }
    }

    /// Tile at `c`. Panics when `c` is outside the grid.
    pub fn tile(&self, c: Coord) -> Tile {
        assert!(self.in_bounds(c), "tile {:?} outside {}x{} grid", c, self.width, self.height);
        self.tiles[c.x as usize][c.y as usize]
    }

    /// Set the tile at `c`. Panics when `c` is outside the grid.
    pub fn set(&mut self, c: Coord, tile: Tile) {
        assert!(self.in_bounds(c), "tile {:?} outside {}x{} grid", c, self.width, self.height);
        self.tiles[c.x as usize][c.y as usize] = tile;
    }

    /// Overwrite every cell
    pub fn fill(&mut self, tile: Tile) {
        for column in &mut self.tiles {
            column.fill(tile);
        }
    }

    /// Fill the part of `area` that lies inside the grid
    pub fn fill_rect(&mut self, area: Rect, tile: Tile) {
        let Some(clipped) = area.intersection(&self.bounds()) else {
            return;
        };
        for x in clipped.x..clipped.right() {
            for y in clipped.y..clipped.bottom() {
                self.tiles[x as usize][y as usize] = tile;
            }
        }
    }

    /// Set every listed coordinate
    pub fn fill_mask(&mut self, coords: &[Coord], tile: Tile) {
        for &c in coords {
            self.set(c, tile);
        }
    }

    /// Copy `source` into this grid with its origin at `(offset_x, offset_y)`.
    /// Cells falling outside this grid are dropped.
    pub fn blit(&mut self, source: &Grid, offset_x: i32, offset_y: i32) {
        for x in 0..source.width {
            for y in 0..source.height {
                let dest = Coord::new(x + offset_x, y + offset_y);
                if self.in_bounds(dest) {
                    self.tiles[dest.x as usize][dest.y as usize] = source.tiles[x as usize][y as usize];
                }
            }
        }
    }

    /// Fill `area` as a walled container: cells within `border_strength` of
    /// the area's edge become `outer`, the rest take whatever `inner`
    /// returns. Cells are visited column by column, so a stateful `inner`
    /// (e.g. a noise draw) sees a stable order.
    pub fn create_container<F>(&mut self, area: Rect, border_strength: i32, outer: Tile, mut inner: F)
    where
        F: FnMut(Coord) -> Tile,
    {
        for x in area.x..area.right() {
            for y in area.y..area.bottom() {
                let c = Coord::new(x, y);
                if !self.in_bounds(c) {
                    continue;
                }
                let rx = x - area.x;
                let ry = y - area.y;
                let on_border = border_strength > 0
                    && (rx < border_strength
                        || ry < border_strength
                        || rx >= area.w - border_strength
                        || ry >= area.h - border_strength);
                let tile = if on_border { outer } else { inner(c) };
                self.tiles[x as usize][y as usize] = tile;
            }
        }
    }

    /// Number of cells holding `tile`
    pub fn count(&self, tile: Tile) -> usize {
        self.tiles.iter().flatten().filter(|&&t| t == tile).count()
    }

    /// Coordinates of every cell holding `tile`, column by column
    pub fn coords_of(&self, tile: Tile) -> Vec<Coord> {
        let mut coords = Vec::new();
        for x in 0..self.width {
            for y in 0..self.height {
                if self.tiles[x as usize][y as usize] == tile {
                    coords.push(Coord::new(x, y));
                }
            }
        }
        coords
    }

    /// Count walls in the `(2r+1)^2 - 1` window around `c`.
    /// Out-of-range neighbours count as walls.
    pub fn wall_count(&self, c: Coord, radius: i32) -> i32 {
        let mut count = 0;
        for nx in c.x - radius..=c.x + radius {
            for ny in c.y - radius..=c.y + radius {
                if nx == c.x && ny == c.y {
                    continue;
                }
                match self.get(Coord::new(nx, ny)) {
                    Some(Tile::Floor) => {}
                    Some(Tile::Wall) | None => count += 1,
                }
            }
        }
        count
    }

    /// Check whether any orthogonal neighbour holds `tile`.
    /// Out-of-range neighbours count as walls.
    pub fn has_cross_neighbor(&self, c: Coord, tile: Tile) -> bool {
        c.cross_neighbors()
            .iter()
            .any(|&n| self.get(n).unwrap_or(Tile::Wall) == tile)
    }

    /// Integer line from `from` to `to`, both endpoints included.
    ///
    /// Steps along the longer axis and moves the minor axis whenever the
    /// accumulated error reaches the major length.
    pub fn line(from: Coord, to: Coord) -> Vec<Coord> {
        let mut x = from.x;
        let mut y = from.y;
        let dx = to.x - x;
        let dy = to.y - y;

        let mut inverted = false;
        let mut step = dx.signum();
        let mut gradient = dy.signum();
        let mut longest = dx.abs();
        let mut shortest = dy.abs();

        if longest < shortest {
            inverted = true;
            longest = dy.abs();
            shortest = dx.abs();
            step = dy.signum();
            gradient = dx.signum();
        }

        let mut points = Vec::with_capacity(longest as usize + 1);
        let mut accumulation = longest / 2;
        for _ in 0..longest {
            points.push(Coord::new(x, y));
            if inverted {
                y += step;
            } else {
                x += step;
            }
            accumulation += shortest;
            if accumulation >= longest {
                if inverted {
                    x += gradient;
                } else {
                    y += gradient;
                }
                accumulation -= longest;
            }
        }
        points.push(Coord::new(x, y));
        points
    }

    /// Stamp a filled disc (`dx^2 + dy^2 <= r^2`), skipping cells closer
    /// than `margin` to the grid edge
    pub fn draw_circle(&mut self, center: Coord, radius: i32, tile: Tile, margin: i32) {
        for dx in -radius..=radius {
            for dy in -radius..=radius {
                if dx * dx + dy * dy > radius * radius {
                    continue;
                }
                let c = center.offset(dx, dy);
                if self.is_interior(c, margin) {
                    self.tiles[c.x as usize][c.y as usize] = tile;
                }
            }
        }
    }

    /// Rows of glyphs, top to bottom
    pub fn to_ascii_rows(&self) -> Vec<String> {
        (0..self.height)
            .map(|y| {
                (0..self.width)
                    .map(|x| self.tiles[x as usize][y as usize].to_ascii())
                    .collect()
            })
            .collect()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.to_ascii_rows() {
            writeln!(f, "{}", row)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_grid() {
        let grid = Grid::new(8, 5, Tile::Wall);
        assert_eq!(grid.width(), 8);
        assert_eq!(grid.height(), 5);
        assert_eq!(grid.count(Tile::Wall), 40);
        assert_eq!(grid.get(Coord::new(8, 0)), None);
        assert_eq!(grid.get(Coord::new(-1, 0)), None);
    }

    #[test]
    #[should_panic]
    fn test_set_out_of_bounds_panics() {
        let mut grid = Grid::new(4, 4, Tile::Wall);
        grid.set(Coord::new(4, 1), Tile::Floor);
    }

    #[test]
    fn test_fill_rect_clips() {
        let mut grid = Grid::new(10, 10, Tile::Wall);
        grid.fill_rect(Rect::new(7, 7, 10, 10), Tile::Floor);
        assert_eq!(grid.count(Tile::Floor), 9);
        assert_eq!(grid.tile(Coord::new(9, 9)), Tile::Floor);
        assert_eq!(grid.tile(Coord::new(6, 9)), Tile::Wall);
    }

    #[test]
    fn test_fill_mask() {
        let mut grid = Grid::new(5, 5, Tile::Wall);
        grid.fill_mask(&[Coord::new(1, 1), Coord::new(3, 2)], Tile::Floor);
        assert_eq!(grid.coords_of(Tile::Floor), vec![Coord::new(1, 1), Coord::new(3, 2)]);
    }

    #[test]
    fn test_blit_with_offset() {
        let mut dest = Grid::new(10, 10, Tile::Wall);
        let source = Grid::new(3, 2, Tile::Floor);
        dest.blit(&source, 8, 4);
        // only a 2x2 corner fits
        assert_eq!(dest.count(Tile::Floor), 4);
        assert_eq!(dest.tile(Coord::new(8, 4)), Tile::Floor);
        assert_eq!(dest.tile(Coord::new(9, 5)), Tile::Floor);
        assert_eq!(dest.tile(Coord::new(7, 4)), Tile::Wall);
    }

    #[test]
    fn test_create_container() {
        let mut grid = Grid::new(12, 12, Tile::Floor);
        grid.create_container(Rect::new(2, 2, 6, 5), 1, Tile::Wall, |_| Tile::Floor);
        // ring of the container is wall, interior floor
        assert_eq!(grid.tile(Coord::new(2, 2)), Tile::Wall);
        assert_eq!(grid.tile(Coord::new(7, 6)), Tile::Wall);
        assert_eq!(grid.tile(Coord::new(3, 3)), Tile::Floor);
        assert_eq!(grid.tile(Coord::new(6, 5)), Tile::Floor);

        let mut thick = Grid::new(10, 10, Tile::Floor);
        thick.create_container(thick.bounds(), 2, Tile::Wall, |_| Tile::Floor);
        assert_eq!(thick.count(Tile::Floor), 36);
    }

    #[test]
    fn test_create_container_visits_in_column_order() {
        let mut grid = Grid::new(4, 4, Tile::Wall);
        let mut visited = Vec::new();
        grid.create_container(grid.bounds(), 1, Tile::Wall, |c| {
            visited.push(c);
            Tile::Floor
        });
        assert_eq!(
            visited,
            vec![Coord::new(1, 1), Coord::new(1, 2), Coord::new(2, 1), Coord::new(2, 2)]
        );
    }

    #[test]
    fn test_wall_count_treats_outside_as_wall() {
        let grid = Grid::new(5, 5, Tile::Floor);
        assert_eq!(grid.wall_count(Coord::new(2, 2), 1), 0);
        assert_eq!(grid.wall_count(Coord::new(0, 0), 1), 5);
        assert_eq!(grid.wall_count(Coord::new(2, 2), 2), 0);
        assert_eq!(grid.wall_count(Coord::new(0, 2), 2), 10);
    }

    #[test]
    fn test_has_cross_neighbor() {
        let grid = Grid::from_ascii(
            "#####
             #...#
             #...#
             #...#
             #####",
        )
        .unwrap();
        assert!(grid.has_cross_neighbor(Coord::new(1, 2), Tile::Wall));
        assert!(!grid.has_cross_neighbor(Coord::new(2, 2), Tile::Wall));
        assert!(grid.has_cross_neighbor(Coord::new(0, 0), Tile::Wall));
    }

    #[test]
    fn test_line_endpoints_and_continuity() {
        let cases = [
            (Coord::new(0, 0), Coord::new(7, 3)),
            (Coord::new(5, 9), Coord::new(2, 0)),
            (Coord::new(4, 4), Coord::new(4, 4)),
            (Coord::new(0, 6), Coord::new(6, 0)),
        ];
        for (from, to) in cases {
            let line = Grid::line(from, to);
            assert_eq!(line.first(), Some(&from));
            assert_eq!(line.last(), Some(&to));
            for pair in line.windows(2) {
                assert!((pair[0].x - pair[1].x).abs() <= 1);
                assert!((pair[0].y - pair[1].y).abs() <= 1);
            }
        }
    }

    #[test]
    fn test_line_horizontal() {
        let line = Grid::line(Coord::new(1, 2), Coord::new(4, 2));
        assert_eq!(
            line,
            vec![Coord::new(1, 2), Coord::new(2, 2), Coord::new(3, 2), Coord::new(4, 2)]
        );
    }

    #[test]
    fn test_draw_circle_respects_margin() {
        let mut grid = Grid::new(10, 10, Tile::Wall);
        grid.draw_circle(Coord::new(5, 5), 1, Tile::Floor, 1);
        assert_eq!(grid.count(Tile::Floor), 5);

        let mut edge = Grid::new(10, 10, Tile::Wall);
        edge.draw_circle(Coord::new(1, 1), 2, Tile::Floor, 1);
        assert_eq!(edge.tile(Coord::new(0, 1)), Tile::Wall);
        assert_eq!(edge.tile(Coord::new(1, 0)), Tile::Wall);
        assert_eq!(edge.tile(Coord::new(1, 1)), Tile::Floor);
    }

    #[test]
    fn test_ascii_round_trip() {
        let text = "####\n#..#\n####\n";
        let grid = Grid::from_ascii(text).unwrap();
        assert_eq!(grid.to_string(), text);
        assert!(Grid::from_ascii("###\n##\n").is_none());
    }
}
