//! Binary space partition tree
//!
//! A leaf has either no children or exactly two. Children always tile their
//! parent's rectangle.

use mg_rng::NoiseSource;

use super::rect::Rect;

/// Smallest dimension a split may produce
pub const MIN_LEAF_SIZE: i32 = 10;

/// Chance that an undersized leaf is split anyway
const VOLUNTARY_SPLIT_CHANCE: f64 = 0.2;

/// Node of the partition tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leaf {
    rect: Rect,
    children: Option<Box<[Leaf; 2]>>,
    room: Option<Rect>,
}

impl Leaf {
    pub fn new(rect: Rect) -> Self {
        Self {
            rect,
            children: None,
            room: None,
        }
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn children(&self) -> Option<&[Leaf; 2]> {
        self.children.as_deref()
    }

    pub fn is_terminal(&self) -> bool {
        self.children.is_none()
    }

    /// Room carved in this leaf (terminal leaves only)
    pub fn room(&self) -> Option<Rect> {
        self.room
    }

    pub(crate) fn set_room(&mut self, room: Rect) {
        debug_assert!(self.is_terminal(), "rooms only go in terminal leaves");
        self.room = Some(room);
    }

    pub(crate) fn children_mut(&mut self) -> Option<&mut [Leaf; 2]> {
        self.children.as_deref_mut()
    }

    /// Split this leaf in two. Returns false when already split or when the
    /// leaf is too small along the chosen axis.
    ///
    /// A coin flip picks the axis unless one side is at least 1.25 times
    /// the other, in which case the longer side is cut.
    pub fn split(&mut self, noise: &mut NoiseSource) -> bool {
        if self.children.is_some() {
            return false;
        }

        let Rect { x, y, w, h } = self.rect;
        let mut split_horizontally = noise.next_bool();
        if w as f64 / h as f64 >= 1.25 {
            split_horizontally = false;
        } else if h as f64 / w as f64 >= 1.25 {
            split_horizontally = true;
        }

        let max = if split_horizontally { h } else { w } - MIN_LEAF_SIZE;
        if max <= MIN_LEAF_SIZE {
            return false;
        }
        let split = noise.next_range(MIN_LEAF_SIZE, max);

        let halves = if split_horizontally {
            [Rect::new(x, y, w, split), Rect::new(x, y + split, w, h - split)]
        } else {
            [Rect::new(x, y, split, h), Rect::new(x + split, y, w - split, h)]
        };
        self.children = Some(Box::new(halves.map(Leaf::new)));
        true
    }

    /// Split repeatedly until a full pass splits nothing. Terminal leaves
    /// larger than `leaf_max_size` always try to split; smaller ones try
    /// with a 20% chance. Returns the number of splits made.
    pub fn split_all(&mut self, leaf_max_size: i32, noise: &mut NoiseSource) -> usize {
        let mut total = 0;
        loop {
            let made = self.split_pass(leaf_max_size, noise);
            if made == 0 {
                return total;
            }
            total += made;
        }
    }

    fn split_pass(&mut self, leaf_max_size: i32, noise: &mut NoiseSource) -> usize {
        match self.children.as_deref_mut() {
            Some([left, right]) => left.split_pass(leaf_max_size, noise) + right.split_pass(leaf_max_size, noise),
            None => {
                let oversize = self.rect.w > leaf_max_size || self.rect.h > leaf_max_size;
                if (oversize || noise.next_double() < VOLUNTARY_SPLIT_CHANCE) && self.split(noise) {
                    1
                } else {
                    0
                }
            }
        }
    }

    /// Terminal leaves, left to right
    pub fn terminal_leaves(&self) -> Vec<&Leaf> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(leaf) = stack.pop() {
            match leaf.children() {
                Some([left, right]) => {
                    stack.push(right);
                    stack.push(left);
                }
                None => out.push(leaf),
            }
        }
        out
    }

    /// Every node, pre-order
    pub fn nodes(&self) -> Vec<&Leaf> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(leaf) = stack.pop() {
            out.push(leaf);
            if let Some([left, right]) = leaf.children() {
                stack.push(right);
                stack.push(left);
            }
        }
        out
    }

    /// One room standing for this subtree. When both children have one, a
    /// coin flip picks.
    pub fn representative_room(&self, noise: &mut NoiseSource) -> Option<Rect> {
        if let Some(room) = self.room {
            return Some(room);
        }
        let [left, right] = self.children()?;
        match (left.representative_room(noise), right.representative_room(noise)) {
            (Some(a), Some(b)) => Some(if noise.next_bool() { a } else { b }),
            (a, b) => a.or(b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::rect::Coord;

    fn assert_tiles_root(root: &Leaf) {
        let leaves = root.terminal_leaves();
        let area: i32 = leaves.iter().map(|l| l.rect().area()).sum();
        assert_eq!(area, root.rect().area());
        for (i, a) in leaves.iter().enumerate() {
            assert!(root.rect().contains_rect(&a.rect()));
            for b in &leaves[i + 1..] {
                assert!(a.rect().intersection(&b.rect()).is_none());
            }
        }
    }

    #[test]
    fn test_split_produces_two_children() {
        let mut noise = NoiseSource::new(3);
        let mut leaf = Leaf::new(Rect::new(1, 1, 40, 40));
        assert!(leaf.split(&mut noise));
        let [a, b] = leaf.children().unwrap();
        assert_eq!(a.rect().area() + b.rect().area(), 1600);
        assert!(a.rect().w >= MIN_LEAF_SIZE && a.rect().h >= MIN_LEAF_SIZE);
        assert!(b.rect().w >= MIN_LEAF_SIZE && b.rect().h >= MIN_LEAF_SIZE);
        // already split
        assert!(!leaf.split(&mut noise));
    }

    #[test]
    fn test_wide_leaf_splits_vertically() {
        let mut noise = NoiseSource::new(8);
        let mut leaf = Leaf::new(Rect::new(0, 0, 50, 20));
        assert!(leaf.split(&mut noise));
        let [a, b] = leaf.children().unwrap();
        assert_eq!(a.rect().h, 20);
        assert_eq!(b.rect().h, 20);
        assert_eq!(a.rect().w + b.rect().w, 50);
    }

    #[test]
    fn test_small_leaf_refuses_split() {
        let mut noise = NoiseSource::new(1);
        let mut leaf = Leaf::new(Rect::new(0, 0, 20, 20));
        assert!(!leaf.split(&mut noise));
        assert!(leaf.is_terminal());
    }

    #[test]
    fn test_split_all_tiles_root() {
        for seed in 0..25 {
            let mut noise = NoiseSource::new(seed);
            let mut root = Leaf::new(Rect::new(1, 1, 98, 78));
            let splits = root.split_all(24, &mut noise);
            assert_eq!(root.terminal_leaves().len(), splits + 1);
            for node in root.nodes() {
                match node.children() {
                    Some([a, b]) => {
                        assert_eq!(a.rect().area() + b.rect().area(), node.rect().area());
                    }
                    None => {
                        assert!(node.rect().w <= 24 || node.rect().w - MIN_LEAF_SIZE <= MIN_LEAF_SIZE);
                    }
                }
            }
            assert_tiles_root(&root);
        }
    }

    #[test]
    fn test_representative_room() {
        let mut noise = NoiseSource::new(4);
        let mut root = Leaf::new(Rect::new(0, 0, 40, 20));
        assert_eq!(root.representative_room(&mut noise), None);
        assert!(root.split(&mut noise));
        let first = Rect::new(2, 2, 4, 4);
        if let Some([left, _]) = root.children_mut() {
            left.set_room(first);
        }
        assert_eq!(root.representative_room(&mut noise), Some(first));
        assert!(first.contains(Coord::new(3, 3)));
    }
}
