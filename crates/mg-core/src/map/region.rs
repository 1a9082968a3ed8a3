//! Connected-component labelling over a grid
//!
//! Regions are 4-connected (no diagonals) sets of same-tile cells.

use std::collections::VecDeque;

use super::grid::Grid;
use super::rect::{Coord, Rect};
use super::tile::Tile;

/// A maximal 4-connected set of cells sharing one tile type.
/// Cells are kept in flood order, starting with the seed cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    tile: Tile,
    cells: Vec<Coord>,
}

impl Region {
    pub fn tile(&self) -> Tile {
        self.tile
    }

    pub fn cells(&self) -> &[Coord] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, c: Coord) -> bool {
        self.cells.contains(&c)
    }

    pub fn bounds(&self) -> Option<Rect> {
        Rect::bounding(&self.cells)
    }

    pub fn into_cells(self) -> Vec<Coord> {
        self.cells
    }
}

/// Flood-fill helper borrowing a grid
pub struct RegionAnalyzer<'a> {
    grid: &'a Grid,
}

impl<'a> RegionAnalyzer<'a> {
    pub fn new(grid: &'a Grid) -> Self {
        Self { grid }
    }

    /// Collect the region containing `start`. Returns an empty region when
    /// `start` is outside the grid.
    pub fn flood_fill(&self, start: Coord) -> Region {
        let mut visited = self.visited_flags();
        match self.grid.get(start) {
            Some(tile) => self.flood_from(start, tile, &mut visited),
            None => Region {
                tile: Tile::Wall,
                cells: Vec::new(),
            },
        }
    }

    /// Every region in the grid, smallest first. Ties keep sweep order.
    pub fn all_regions(&self) -> Vec<Region> {
        self.sweep(|_| true)
    }

    /// Regions made of `tile`, smallest first
    pub fn typed_regions(&self, tile: Tile) -> Vec<Region> {
        self.sweep(|t| t == tile)
    }

    /// Split a region list by tile type
    pub fn partition(regions: Vec<Region>, tile: Tile) -> (Vec<Region>, Vec<Region>) {
        regions.into_iter().partition(|r| r.tile == tile)
    }

    /// Walking distance from `from` to `to` over cells of `tile`, or `None`
    /// when unreachable
    pub fn path_distance(&self, from: Coord, to: Coord, tile: Tile) -> Option<usize> {
        if self.grid.get(from) != Some(tile) || self.grid.get(to) != Some(tile) {
            return None;
        }
        let mut distance = vec![vec![usize::MAX; self.grid.height() as usize]; self.grid.width() as usize];
        let mut queue = VecDeque::new();
        distance[from.x as usize][from.y as usize] = 0;
        queue.push_back(from);

        while let Some(c) = queue.pop_front() {
            let d = distance[c.x as usize][c.y as usize];
            if c == to {
                return Some(d);
            }
            for n in c.cross_neighbors() {
                if self.grid.get(n) == Some(tile) && distance[n.x as usize][n.y as usize] == usize::MAX {
                    distance[n.x as usize][n.y as usize] = d + 1;
                    queue.push_back(n);
                }
            }
        }
        None
    }

    fn visited_flags(&self) -> Vec<Vec<bool>> {
        vec![vec![false; self.grid.height() as usize]; self.grid.width() as usize]
    }

    fn sweep<F: Fn(Tile) -> bool>(&self, filter: F) -> Vec<Region> {
        let mut visited = self.visited_flags();
        let mut regions = Vec::new();
        for x in 0..self.grid.width() {
            for y in 0..self.grid.height() {
                let c = Coord::new(x, y);
                let tile = self.grid.tile(c);
                if visited[x as usize][y as usize] || !filter(tile) {
                    continue;
                }
                regions.push(self.flood_from(c, tile, &mut visited));
            }
        }
        regions.sort_by_key(Region::len);
        regions
    }

    fn flood_from(&self, start: Coord, tile: Tile, visited: &mut [Vec<bool>]) -> Region {
        let mut cells = Vec::new();
        let mut queue = VecDeque::new();
        visited[start.x as usize][start.y as usize] = true;
        queue.push_back(start);

        while let Some(c) = queue.pop_front() {
            cells.push(c);
            for n in c.cross_neighbors() {
                if self.grid.get(n) != Some(tile) || visited[n.x as usize][n.y as usize] {
                    continue;
                }
                visited[n.x as usize][n.y as usize] = true;
                queue.push_back(n);
            }
        }

        Region { tile, cells }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Grid {
        Grid::from_ascii(
            "##########
             #...##..##
             #...##..##
             ######..##
             #.#.######
             ##########",
        )
        .unwrap()
    }

    #[test]
    fn test_flood_fill_is_four_connected() {
        let grid = sample();
        let analyzer = RegionAnalyzer::new(&grid);
        // (1,4) and (3,4) only touch diagonally through walls
        let region = analyzer.flood_fill(Coord::new(1, 4));
        assert_eq!(region.tile(), Tile::Floor);
        assert_eq!(region.len(), 1);
        assert_eq!(region.cells()[0], Coord::new(1, 4));
    }

    #[test]
    fn test_typed_regions_sorted_ascending() {
        let grid = sample();
        let floors = RegionAnalyzer::new(&grid).typed_regions(Tile::Floor);
        let sizes: Vec<usize> = floors.iter().map(Region::len).collect();
        assert_eq!(sizes, vec![1, 1, 6, 6]);
        assert!(floors.iter().all(|r| r.tile() == Tile::Floor));
    }

    #[test]
    fn test_all_regions_cover_grid() {
        let grid = sample();
        let regions = RegionAnalyzer::new(&grid).all_regions();
        let total: usize = regions.iter().map(Region::len).sum();
        assert_eq!(total, 60);
        let (walls, floors) = RegionAnalyzer::partition(regions, Tile::Wall);
        assert_eq!(floors.len(), 4);
        assert!(walls.iter().all(|r| r.tile() == Tile::Wall));
        assert_eq!(walls.iter().map(Region::len).sum::<usize>(), grid.count(Tile::Wall));
    }

    #[test]
    fn test_flood_fill_outside_grid() {
        let grid = sample();
        assert!(RegionAnalyzer::new(&grid).flood_fill(Coord::new(-1, 3)).is_empty());
    }

    #[test]
    fn test_path_distance() {
        let grid = Grid::from_ascii(
            "#######
             #.....#
             #####.#
             #.....#
             #######",
        )
        .unwrap();
        let analyzer = RegionAnalyzer::new(&grid);
        assert_eq!(analyzer.path_distance(Coord::new(1, 1), Coord::new(1, 3), Tile::Floor), Some(10));
        assert_eq!(analyzer.path_distance(Coord::new(1, 1), Coord::new(1, 1), Tile::Floor), Some(0));
        assert_eq!(analyzer.path_distance(Coord::new(1, 1), Coord::new(0, 0), Tile::Floor), None);
    }
}
