//! Rooms extracted from floor regions and the graph connecting them
//!
//! The largest room is the hub. Connecting two rooms adds an undirected
//! edge; if either side is reachable from the hub, everything linked to the
//! other side becomes reachable as well.

use hashbrown::HashSet;
use log::debug;
use mg_rng::NoiseSource;

use super::corridor::{Corridor, HallStyle, create_hall};
use super::grid::Grid;
use super::rect::{Coord, Rect};
use super::region::Region;
use super::tile::Tile;

/// A floor region retained after cleanup
#[derive(Debug, Clone)]
pub struct Room {
    tiles: Vec<Coord>,
    /// Tiles with an orthogonal wall neighbour
    edge_tiles: Vec<Coord>,
    /// Indices of directly connected rooms in the owning graph
    connected: HashSet<usize>,
    is_main: bool,
    accessible: bool,
}

impl Room {
    pub fn new(tiles: Vec<Coord>, grid: &Grid) -> Self {
        let edge_tiles = tiles
            .iter()
            .copied()
            .filter(|&c| grid.has_cross_neighbor(c, Tile::Wall))
            .collect();
        Self {
            tiles,
            edge_tiles,
            connected: HashSet::new(),
            is_main: false,
            accessible: false,
        }
    }

    pub fn size(&self) -> usize {
        self.tiles.len()
    }

    pub fn tiles(&self) -> &[Coord] {
        &self.tiles
    }

    pub fn edge_tiles(&self) -> &[Coord] {
        &self.edge_tiles
    }

    pub fn bounds(&self) -> Option<Rect> {
        Rect::bounding(&self.tiles)
    }

    pub fn connections(&self) -> &HashSet<usize> {
        &self.connected
    }

    pub fn is_connected(&self, other: usize) -> bool {
        self.connected.contains(&other)
    }

    pub fn is_main(&self) -> bool {
        self.is_main
    }

    pub fn is_accessible(&self) -> bool {
        self.accessible
    }
}

/// Closest pair of edge tiles between two rooms
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgePair {
    pub from: Coord,
    pub to: Coord,
    pub distance_sq: i32,
}

/// Rooms plus their connection graph
#[derive(Debug, Clone, Default)]
pub struct RoomGraph {
    rooms: Vec<Room>,
}

impl RoomGraph {
    /// Build rooms from floor regions, largest first. The first becomes the
    /// hub.
    pub fn from_regions(regions: Vec<Region>, grid: &Grid) -> Self {
        let mut rooms: Vec<Room> = regions
            .into_iter()
            .map(|r| Room::new(r.into_cells(), grid))
            .collect();
        rooms.sort_by(|a, b| b.size().cmp(&a.size()));
        if let Some(main) = rooms.first_mut() {
            main.is_main = true;
            main.accessible = true;
        }
        Self { rooms }
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Index of the hub room
    pub fn main_room(&self) -> Option<usize> {
        self.rooms.iter().position(Room::is_main)
    }

    /// Add an undirected edge and propagate hub reachability
    pub fn connect(&mut self, a: usize, b: usize) {
        if a == b || a >= self.rooms.len() || b >= self.rooms.len() {
            return;
        }
        self.rooms[a].connected.insert(b);
        self.rooms[b].connected.insert(a);
        if self.rooms[a].accessible {
            self.set_accessible(b);
        } else if self.rooms[b].accessible {
            self.set_accessible(a);
        }
    }

    /// Mark `start` and every room linked to it as reachable from the hub
    pub fn set_accessible(&mut self, start: usize) {
        let mut stack = vec![start];
        while let Some(idx) = stack.pop() {
            if self.rooms[idx].accessible && idx != start {
                continue;
            }
            self.rooms[idx].accessible = true;
            for &n in &self.rooms[idx].connected {
                if !self.rooms[n].accessible {
                    stack.push(n);
                }
            }
        }
    }

    /// Closest pair of edge tiles between rooms `a` and `b`. The first pair
    /// found wins ties.
    pub fn closest_edges(&self, a: usize, b: usize) -> Option<EdgePair> {
        let mut best: Option<EdgePair> = None;
        for &from in &self.rooms[a].edge_tiles {
            for &to in &self.rooms[b].edge_tiles {
                let distance_sq = from.distance_sq(to);
                if best.is_none_or(|p| distance_sq < p.distance_sq) {
                    best = Some(EdgePair { from, to, distance_sq });
                }
            }
        }
        best
    }

    /// Check that a breadth-first walk from the hub visits every room
    pub fn all_reachable_from_main(&self) -> bool {
        let Some(main) = self.main_room() else {
            return true;
        };
        let mut seen = vec![false; self.rooms.len()];
        let mut queue = std::collections::VecDeque::from([main]);
        seen[main] = true;
        while let Some(idx) = queue.pop_front() {
            for &n in &self.rooms[idx].connected {
                if !seen[n] {
                    seen[n] = true;
                    queue.push_back(n);
                }
            }
        }
        seen.into_iter().all(|s| s)
    }

    /// Link every room to the hub, carving a hall for each new edge.
    ///
    /// First every isolated room is joined to its nearest unconnected
    /// neighbour. Then, while some room is unreachable, the closest pair of
    /// (unreachable, reachable) rooms is joined.
    pub fn connect_closest_rooms(
        &mut self,
        grid: &mut Grid,
        style: HallStyle,
        hall_max_width: i32,
        noise: &mut NoiseSource,
    ) -> Vec<Corridor> {
        let mut corridors = Vec::new();
        let n = self.rooms.len();

        for a in 0..n {
            if !self.rooms[a].connected.is_empty() {
                continue;
            }
            let mut best: Option<(usize, EdgePair)> = None;
            for b in 0..n {
                if a == b || self.rooms[a].is_connected(b) {
                    continue;
                }
                if let Some(pair) = self.closest_edges(a, b)
                    && best.is_none_or(|(_, p)| pair.distance_sq < p.distance_sq)
                {
                    best = Some((b, pair));
                }
            }
            if let Some((b, pair)) = best {
                corridors.push(self.create_passage(grid, a, b, pair, style, hall_max_width, noise));
            }
        }

        loop {
            let mut best: Option<(usize, usize, EdgePair)> = None;
            for a in (0..n).filter(|&i| !self.rooms[i].accessible) {
                for b in (0..n).filter(|&i| self.rooms[i].accessible) {
                    if self.rooms[a].is_connected(b) {
                        continue;
                    }
                    if let Some(pair) = self.closest_edges(a, b)
                        && best.is_none_or(|(_, _, p)| pair.distance_sq < p.distance_sq)
                    {
                        best = Some((a, b, pair));
                    }
                }
            }
            match best {
                Some((a, b, pair)) => {
                    corridors.push(self.create_passage(grid, a, b, pair, style, hall_max_width, noise));
                }
                None => break,
            }
        }

        debug!("connected {} rooms with {} corridors", n, corridors.len());
        corridors
    }

    #[allow(clippy::too_many_arguments)]
    fn create_passage(
        &mut self,
        grid: &mut Grid,
        a: usize,
        b: usize,
        pair: EdgePair,
        style: HallStyle,
        hall_max_width: i32,
        noise: &mut NoiseSource,
    ) -> Corridor {
        self.connect(a, b);
        let style = create_hall(grid, pair.from, pair.to, style, hall_max_width, noise);
        Corridor {
            from: pair.from,
            to: pair.to,
            style,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::region::RegionAnalyzer;

    fn three_rooms() -> Grid {
        Grid::from_ascii(
            "##################
             #....#######.....#
             #....#######.....#
             #....#######.....#
             ##################
             ##################
             ######...#########
             ######...#########
             ##################",
        )
        .unwrap()
    }

    fn graph_for(grid: &Grid) -> RoomGraph {
        let regions = RegionAnalyzer::new(grid).typed_regions(Tile::Floor);
        RoomGraph::from_regions(regions, grid)
    }

    #[test]
    fn test_rooms_sorted_and_hub_marked() {
        let grid = three_rooms();
        let graph = graph_for(&grid);
        let sizes: Vec<usize> = graph.rooms().iter().map(Room::size).collect();
        assert_eq!(sizes, vec![15, 12, 6]);
        assert_eq!(graph.main_room(), Some(0));
        assert!(graph.rooms()[0].is_accessible());
        assert!(!graph.rooms()[1].is_accessible());
    }

    #[test]
    fn test_edge_tiles() {
        let grid = three_rooms();
        let graph = graph_for(&grid);
        // only the middle row of the 5x3 room has interior tiles
        assert_eq!(graph.rooms()[0].edge_tiles().len(), 12);
        assert!(!graph.rooms()[0].edge_tiles().contains(&Coord::new(14, 2)));
        assert_eq!(graph.rooms()[2].edge_tiles().len(), 6);
    }

    #[test]
    fn test_accessibility_propagates() {
        let grid = three_rooms();
        let mut graph = graph_for(&grid);
        graph.connect(1, 2);
        assert!(!graph.rooms()[1].is_accessible());
        assert!(!graph.rooms()[2].is_accessible());
        graph.connect(0, 1);
        assert!(graph.rooms()[1].is_accessible());
        assert!(graph.rooms()[2].is_accessible());
        assert!(graph.all_reachable_from_main());
    }

    #[test]
    fn test_closest_edges() {
        let grid = three_rooms();
        let graph = graph_for(&grid);
        let pair = graph.closest_edges(0, 1).unwrap();
        // right room starts at x=12, left room ends at x=4
        assert_eq!(pair.distance_sq, 64);
        assert_eq!(pair.from.x, 12);
        assert_eq!(pair.to.x, 4);
    }

    #[test]
    fn test_connect_closest_rooms_spans_graph() {
        let mut grid = three_rooms();
        let mut graph = graph_for(&grid);
        let mut noise = NoiseSource::new(5);
        let corridors = graph.connect_closest_rooms(&mut grid, HallStyle::DottedLine, 6, &mut noise);
        assert!(!corridors.is_empty());
        assert!(graph.all_reachable_from_main());
        assert!(graph.rooms().iter().all(Room::is_accessible));

        // the carved grid is one floor region
        let floors = RegionAnalyzer::new(&grid).typed_regions(Tile::Floor);
        assert_eq!(floors.len(), 1);
    }

    #[test]
    fn test_connect_far_apart_clusters() {
        // two pairs that pair up with each other first, then get bridged
        let mut grid = Grid::from_ascii(
            "##########################
             #...#...###########...#..#
             #...#...###########...#..#
             ##########################",
        )
        .unwrap();
        let mut graph = graph_for(&grid);
        assert_eq!(graph.len(), 4);
        let mut noise = NoiseSource::new(11);
        let corridors = graph.connect_closest_rooms(&mut grid, HallStyle::LHall, 6, &mut noise);
        assert!(corridors.len() >= 3);
        assert!(graph.all_reachable_from_main());
        assert_eq!(RegionAnalyzer::new(&grid).typed_regions(Tile::Floor).len(), 1);
    }

    #[test]
    fn test_single_room_needs_no_corridor() {
        let mut grid = Grid::from_ascii(
            "#####
             #...#
             #####",
        )
        .unwrap();
        let mut graph = graph_for(&grid);
        let mut noise = NoiseSource::new(1);
        assert!(graph.connect_closest_rooms(&mut grid, HallStyle::DottedLine, 6, &mut noise).is_empty());
        assert!(graph.all_reachable_from_main());
    }
}
