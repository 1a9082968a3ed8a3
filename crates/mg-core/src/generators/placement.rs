//! Spawn point selection

use mg_rng::NoiseSource;
use serde::{Deserialize, Serialize};

use crate::map::{Coord, Grid, Tile};

/// A position in world units, origin at the centre of the map
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WorldPoint {
    pub x: f32,
    pub y: f32,
}

/// Pick a floor tile well away from walls.
///
/// Floor tiles are ranked by how many walls lie within two cells. The
/// leading run of tiles with no wall directly around them is the candidate
/// pool; one is drawn from it. Returns `None` on a map without floor.
pub fn placement_floor_tile(grid: &Grid, noise: &mut NoiseSource) -> Option<Coord> {
    let mut floors = grid.coords_of(Tile::Floor);
    if floors.is_empty() {
        return None;
    }
    floors.sort_by_key(|&c| grid.wall_count(c, 2));

    let mut last = 0;
    while last + 1 < floors.len() && grid.wall_count(floors[last + 1], 1) == 0 {
        last += 1;
    }
    let index = noise.next_below(last as i32) as usize;
    floors.get(index).copied()
}

/// Convert a tile coordinate to the centre of that tile in world units
pub fn spawn_point(grid: &Grid, tile: Coord, unit_size: f32) -> WorldPoint {
    WorldPoint {
        x: -(grid.width() as f32) / 2.0 + tile.x as f32 * unit_size + unit_size / 2.0,
        y: -(grid.height() as f32) / 2.0 + tile.y as f32 * unit_size + unit_size / 2.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_floor() {
        let grid = Grid::new(10, 10, Tile::Wall);
        let mut noise = NoiseSource::new(1);
        assert_eq!(placement_floor_tile(&grid, &mut noise), None);
    }

    #[test]
    fn test_picks_open_tile() {
        // open hall with a thin corridor hanging off it
        let grid = Grid::from_ascii(
            "###############
             #.........#####
             #.........#####
             #..............
             #.........#####
             #.........#####
             ###############",
        )
        .unwrap();
        for seed in 0..20 {
            let mut noise = NoiseSource::new(seed);
            let c = placement_floor_tile(&grid, &mut noise).unwrap();
            assert_eq!(grid.tile(c), Tile::Floor);
            assert_eq!(grid.wall_count(c, 1), 0, "seed {} picked {:?}", seed, c);
        }
    }

    #[test]
    fn test_single_floor_tile() {
        let grid = Grid::from_ascii(
            "###
             #.#
             ###",
        )
        .unwrap();
        let mut noise = NoiseSource::new(4);
        assert_eq!(placement_floor_tile(&grid, &mut noise), Some(Coord::new(1, 1)));
    }

    #[test]
    fn test_spawn_point_centres_tile() {
        let grid = Grid::new(10, 6, Tile::Wall);
        let p = spawn_point(&grid, Coord::new(0, 0), 1.0);
        assert_eq!(p, WorldPoint { x: -4.5, y: -2.5 });
        let p = spawn_point(&grid, Coord::new(5, 3), 2.0);
        assert_eq!(p, WorldPoint { x: 6.0, y: 4.0 });
    }
}
