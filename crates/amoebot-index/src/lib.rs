//! Triangular lattice coordinates and node occupancy indexing.
//!
//! The x-axis runs left-right and the y-axis runs northeast-southwest. Global
//! directions are numbered counter-clockwise starting from east:
//! `0=E, 1=NE, 2=NW, 3=W, 4=SW, 5=SE`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use thiserror::Error;

/// Number of lattice directions around a node.
pub const NUM_DIRS: usize = 6;

const X_OFFSET: [i32; NUM_DIRS] = [1, 0, -1, -1, 0, 1];
const Y_OFFSET: [i32; NUM_DIRS] = [0, 1, 1, 0, -1, -1];

/// Returns the direction antiparallel to `dir`.
#[must_use]
pub const fn opposite(dir: usize) -> usize {
    assert!(dir < NUM_DIRS, "direction out of range");
    (dir + 3) % NUM_DIRS
}

/// A node of the triangular lattice in axial coordinates.
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
pub struct Node {
    pub x: i32,
    pub y: i32,
}

impl Node {
    /// The lattice origin `(0, 0)`.
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    /// Construct a node from axial coordinates.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the node adjacent to this one in the given global direction.
    ///
    /// # Panics
    /// Panics when `dir` is not in `0..6`.
    #[must_use]
    pub fn node_in_dir(self, dir: usize) -> Self {
        assert!(dir < NUM_DIRS, "direction {dir} out of range");
        Self::new(self.x + X_OFFSET[dir], self.y + Y_OFFSET[dir])
    }

    /// Iterate over the six adjacent nodes in direction order.
    pub fn neighbors(self) -> impl Iterator<Item = Node> {
        (0..NUM_DIRS).map(move |dir| self.node_in_dir(dir))
    }

    /// Global direction leading from `self` to `other`, if they are adjacent.
    #[must_use]
    pub fn dir_to(self, other: Node) -> Option<usize> {
        (0..NUM_DIRS).find(|&dir| self.node_in_dir(dir) == other)
    }

    /// Returns true when `other` shares a lattice edge with `self`.
    #[must_use]
    pub fn is_adjacent(self, other: Node) -> bool {
        self.dir_to(other).is_some()
    }
}

/// Errors emitted by occupancy index implementations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IndexError {
    /// The node is already held by another owner.
    #[error("node ({}, {}) is already occupied", .node.x, .node.y)]
    Occupied { node: Node },
}

/// Common behaviour exposed by node occupancy indices.
///
/// An index holds at most one owner per node. Owners are small copyable
/// handles (arena keys, dense indices) rather than the owning values.
pub trait OccupancyIndex<K: Copy + Eq> {
    /// Owner of `node`, if any.
    fn occupant(&self, node: Node) -> Option<K>;

    /// Record `owner` at `node`. Claiming a node the same owner already holds is
    /// a no-op; claiming one held by someone else fails.
    fn claim(&mut self, node: Node, owner: K) -> Result<(), IndexError>;

    /// Hand `node` to `owner` regardless of the previous owner, returning it.
    fn reassign(&mut self, node: Node, owner: K) -> Option<K>;

    /// Vacate `node`, returning the owner that held it.
    fn release(&mut self, node: Node) -> Option<K>;

    /// Number of occupied nodes.
    fn len(&self) -> usize;

    /// Returns true when `node` has an owner.
    fn is_occupied(&self, node: Node) -> bool {
        self.occupant(node).is_some()
    }

    /// Returns true when no node is occupied.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Ordered node map; iteration follows the `Node` ordering (x, then y).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NodeMap<K> {
    owners: BTreeMap<Node, K>,
}

impl<K> Default for NodeMap<K> {
    fn default() -> Self {
        Self {
            owners: BTreeMap::new(),
        }
    }
}

impl<K: Copy + Eq> NodeMap<K> {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Iterate over `(node, owner)` pairs in node order.
    pub fn iter(&self) -> impl Iterator<Item = (Node, K)> + '_ {
        self.owners.iter().map(|(node, owner)| (*node, *owner))
    }

    /// Nodes currently held by `owner`.
    pub fn nodes_of(&self, owner: K) -> impl Iterator<Item = Node> + '_ {
        self.owners
            .iter()
            .filter(move |(_, held)| **held == owner)
            .map(|(node, _)| *node)
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.owners.clear();
    }
}

impl<K: Copy + Eq> OccupancyIndex<K> for NodeMap<K> {
    fn occupant(&self, node: Node) -> Option<K> {
        self.owners.get(&node).copied()
    }

    fn claim(&mut self, node: Node, owner: K) -> Result<(), IndexError> {
        match self.owners.entry(node) {
            Entry::Vacant(slot) => {
                slot.insert(owner);
                Ok(())
            }
            Entry::Occupied(slot) if *slot.get() == owner => Ok(()),
            Entry::Occupied(_) => Err(IndexError::Occupied { node }),
        }
    }

    fn reassign(&mut self, node: Node, owner: K) -> Option<K> {
        self.owners.insert(node, owner)
    }

    fn release(&mut self, node: Node) -> Option<K> {
        self.owners.remove(&node)
    }

    fn len(&self) -> usize {
        self.owners.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn antiparallel_directions_cancel() {
        let start = Node::new(3, -2);
        for dir in 0..NUM_DIRS {
            assert_eq!(start.node_in_dir(dir).node_in_dir(opposite(dir)), start);
        }
    }

    #[test]
    fn neighbor_offsets_follow_compass() {
        let origin = Node::ORIGIN;
        let expected = [
            Node::new(1, 0),
            Node::new(0, 1),
            Node::new(-1, 1),
            Node::new(-1, 0),
            Node::new(0, -1),
            Node::new(1, -1),
        ];
        assert_eq!(origin.neighbors().collect::<Vec<_>>(), expected);
        assert_eq!(origin.dir_to(Node::new(-1, 1)), Some(2));
        assert!(!origin.is_adjacent(Node::new(1, 1)));
        assert!(!origin.is_adjacent(origin));
    }

    #[test]
    fn node_ordering_compares_x_first() {
        assert!(Node::new(0, 5) < Node::new(1, -5));
        assert!(Node::new(1, -5) < Node::new(1, 0));
    }

    #[test]
    fn claim_rejects_second_owner() {
        let mut index = NodeMap::new();
        let node = Node::new(2, 2);
        index.claim(node, 7_u32).expect("vacant node");
        index.claim(node, 7).expect("same owner is idempotent");
        assert_eq!(index.claim(node, 8), Err(IndexError::Occupied { node }));
        assert_eq!(index.occupant(node), Some(7));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn reassign_and_release_track_owner() {
        let mut index = NodeMap::new();
        let node = Node::ORIGIN;
        assert_eq!(index.reassign(node, 1_u8), None);
        assert_eq!(index.reassign(node, 2), Some(1));
        index.claim(Node::new(1, 0), 2).expect("claim");
        assert_eq!(index.nodes_of(2).count(), 2);
        assert_eq!(index.release(node), Some(2));
        assert!(!index.is_occupied(node));
        assert_eq!(index.release(node), None);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn node_in_dir_rejects_bad_direction() {
        let _ = Node::ORIGIN.node_in_dir(6);
    }

    #[test]
    fn node_serializes_as_struct() {
        let json = serde_json::to_string(&Node::new(-1, 4)).expect("serialize");
        assert_eq!(json, r#"{"x":-1,"y":4}"#);
    }
}
