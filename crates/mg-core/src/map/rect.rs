//! Integer coordinates and rectangles
//!
//! `Rect` is the lightweight area descriptor used for rooms, BSP leaves
//! and fill regions. Its edges are half-open: a rect covers
//! `x..x + w` by `y..y + h`.

use serde::{Deserialize, Serialize};

/// A grid coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Squared euclidean distance
    pub fn distance_sq(&self, other: Coord) -> i32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Manhattan distance (length of an L-shaped hall between the two)
    pub fn manhattan(&self, other: Coord) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    pub const fn offset(&self, dx: i32, dy: i32) -> Coord {
        Coord::new(self.x + dx, self.y + dy)
    }

    /// The four orthogonal neighbours (north, south, east, west)
    pub fn cross_neighbors(&self) -> [Coord; 4] {
        [
            self.offset(0, -1),
            self.offset(0, 1),
            self.offset(1, 0),
            self.offset(-1, 0),
        ]
    }
}

impl From<(i32, i32)> for Coord {
    fn from((x, y): (i32, i32)) -> Self {
        Coord::new(x, y)
    }
}

/// Axis-aligned integer rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Exclusive right edge
    pub const fn right(&self) -> i32 {
        self.x + self.w
    }

    /// Exclusive bottom edge
    pub const fn bottom(&self) -> i32 {
        self.y + self.h
    }

    pub const fn area(&self) -> i32 {
        self.w * self.h
    }

    pub const fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    pub fn center(&self) -> Coord {
        Coord::new(self.x + self.w / 2, self.y + self.h / 2)
    }

    pub fn contains(&self, c: Coord) -> bool {
        c.x >= self.x && c.x < self.right() && c.y >= self.y && c.y < self.bottom()
    }

    /// Check if this rectangle fully contains another
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Strict overlap: rects that only share an edge do not intersect
    pub fn intersects(&self, other: &Rect) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Calculate the intersection of two rectangles
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        if !self.intersects(other) {
            return None;
        }
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        Some(Rect::new(
            x,
            y,
            self.right().min(other.right()) - x,
            self.bottom().min(other.bottom()) - y,
        ))
    }

    /// Shrink on every side by `margin`
    pub fn inset(&self, margin: i32) -> Rect {
        Rect::new(
            self.x + margin,
            self.y + margin,
            (self.w - 2 * margin).max(0),
            (self.h - 2 * margin).max(0),
        )
    }

    /// Smallest rect covering every coordinate; `None` for an empty input
    pub fn bounding(coords: &[Coord]) -> Option<Rect> {
        let first = coords.first()?;
        let (mut lx, mut ly, mut hx, mut hy) = (first.x, first.y, first.x, first.y);
        for c in coords {
            lx = lx.min(c.x);
            ly = ly.min(c.y);
            hx = hx.max(c.x);
            hy = hy.max(c.y);
        }
        Some(Rect::new(lx, ly, hx - lx + 1, hy - ly + 1))
    }

    /// Every coordinate inside the rect, column by column
    pub fn coords(&self) -> impl Iterator<Item = Coord> + '_ {
        (self.x..self.right()).flat_map(move |x| (self.y..self.bottom()).map(move |y| Coord::new(x, y)))
    }
}
