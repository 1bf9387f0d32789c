//! Per-particle geometry: occupied nodes, local compass and label queries.
//!
//! Terminology:
//! - global direction: compass direction shared by the lattice, see
//!   [`amoebot_index`];
//! - local direction: `(global - orientation) mod 6`, the particle's own view;
//! - label: the particle's name for an edge towards an unoccupied neighbour
//!   node, see [`crate::labels`].

use crate::labels::{self, check_dir, check_label};
use amoebot_index::{NUM_DIRS, Node, opposite};
use serde::{Deserialize, Serialize};

/// Geometric state of a particle: one node when contracted, two adjacent
/// nodes (head and tail) when expanded.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Body {
    head: Node,
    global_tail_dir: Option<usize>,
    orientation: usize,
}

impl Body {
    /// Construct a body from its head, the global direction from head to tail
    /// (`None` when contracted) and its compass offset.
    ///
    /// # Panics
    /// Panics when a direction or the orientation is outside `0..6`.
    #[must_use]
    pub fn new(head: Node, global_tail_dir: Option<usize>, orientation: usize) -> Self {
        assert!(orientation < NUM_DIRS, "orientation {orientation} out of range");
        if let Some(dir) = global_tail_dir {
            check_dir(dir);
        }
        Self {
            head,
            global_tail_dir,
            orientation,
        }
    }

    /// Contracted body occupying `head`.
    #[must_use]
    pub fn contracted(head: Node, orientation: usize) -> Self {
        Self::new(head, None, orientation)
    }

    #[must_use]
    pub const fn head(&self) -> Node {
        self.head
    }

    #[must_use]
    pub const fn orientation(&self) -> usize {
        self.orientation
    }

    /// Global direction from head to tail, `None` while contracted.
    #[must_use]
    pub const fn global_tail_dir(&self) -> Option<usize> {
        self.global_tail_dir
    }

    #[must_use]
    pub const fn is_contracted(&self) -> bool {
        self.global_tail_dir.is_none()
    }

    #[must_use]
    pub const fn is_expanded(&self) -> bool {
        self.global_tail_dir.is_some()
    }

    /// Node occupied by the tail.
    ///
    /// # Panics
    /// Panics when the particle is contracted.
    #[must_use]
    pub fn tail(&self) -> Node {
        let dir = self.expanded_global_tail_dir();
        self.head.node_in_dir(dir)
    }

    /// Nodes owned by this particle, head first.
    pub fn occupied_nodes(&self) -> impl Iterator<Item = Node> {
        let tail = self.global_tail_dir.map(|dir| self.head.node_in_dir(dir));
        std::iter::once(self.head).chain(tail)
    }

    /// Local direction from head to tail, `None` while contracted.
    #[must_use]
    pub fn tail_dir(&self) -> Option<usize> {
        self.global_tail_dir.map(|dir| self.global_to_local(dir))
    }

    #[must_use]
    pub fn local_to_global(&self, local_dir: usize) -> usize {
        check_dir(local_dir);
        (self.orientation + local_dir) % NUM_DIRS
    }

    #[must_use]
    pub fn global_to_local(&self, global_dir: usize) -> usize {
        check_dir(global_dir);
        (global_dir + NUM_DIRS - self.orientation) % NUM_DIRS
    }

    /// Number of labels valid in the current occupancy (6 or 10).
    #[must_use]
    pub fn label_count(&self) -> usize {
        labels::label_count(self.global_tail_dir)
    }

    /// Local direction the edge `label` points in.
    #[must_use]
    pub fn label_to_dir(&self, label: usize) -> usize {
        labels::label_to_dir(self.tail_dir(), label)
    }

    /// Global direction the edge `label` points in.
    #[must_use]
    pub fn label_to_global_dir(&self, label: usize) -> usize {
        self.local_to_global(self.label_to_dir(label))
    }

    /// Labels which address pairwise distinct neighbour nodes.
    #[must_use]
    pub fn unique_labels(&self) -> Vec<usize> {
        if self.is_contracted() {
            return labels::CONTRACTED_LABELS.to_vec();
        }
        (0..labels::EXPANDED_LABEL_COUNT)
            .filter(|&label| {
                let previous = (label + labels::EXPANDED_LABEL_COUNT - 1)
                    % labels::EXPANDED_LABEL_COUNT;
                self.neighbor_node_via_label(label) != self.neighbor_node_via_label(previous)
            })
            .collect()
    }

    /// Labels incident to the head; all six labels while contracted.
    #[must_use]
    pub fn head_labels(&self) -> &'static [usize] {
        labels::head_labels(self.tail_dir())
    }

    /// Labels incident to the tail.
    ///
    /// # Panics
    /// Panics when the particle is contracted.
    #[must_use]
    pub fn tail_labels(&self) -> &'static [usize] {
        labels::tail_labels(self.expanded_tail_dir())
    }

    #[must_use]
    pub fn is_head_label(&self, label: usize) -> bool {
        check_label(label, labels::EXPANDED_LABEL_COUNT);
        self.head_labels().contains(&label)
    }

    #[must_use]
    pub fn is_tail_label(&self, label: usize) -> bool {
        check_label(label, labels::EXPANDED_LABEL_COUNT);
        self.tail_labels().contains(&label)
    }

    /// Head label of the edge pointing in local direction `dir`.
    #[must_use]
    pub fn dir_to_head_label(&self, dir: usize) -> usize {
        labels::dir_to_head_label(self.tail_dir(), dir)
    }

    /// Tail label of the edge pointing in local direction `dir`.
    #[must_use]
    pub fn dir_to_tail_label(&self, dir: usize) -> usize {
        labels::dir_to_tail_label(self.expanded_tail_dir(), dir)
    }

    /// Label that makes a contraction vacate the head.
    #[must_use]
    pub fn head_contraction_label(&self) -> usize {
        labels::head_contraction_label(self.expanded_tail_dir())
    }

    /// Label that makes a contraction vacate the tail.
    #[must_use]
    pub fn tail_contraction_label(&self) -> usize {
        labels::tail_contraction_label(self.expanded_tail_dir())
    }

    /// Local direction of `label` once expanded in local direction
    /// `expansion_dir`.
    #[must_use]
    pub fn label_to_dir_after_expansion(&self, label: usize, expansion_dir: usize) -> usize {
        labels::label_to_dir(Some(self.planned_tail_dir(expansion_dir)), label)
    }

    #[must_use]
    pub fn head_labels_after_expansion(&self, expansion_dir: usize) -> &'static [usize] {
        labels::head_labels(Some(self.planned_tail_dir(expansion_dir)))
    }

    #[must_use]
    pub fn tail_labels_after_expansion(&self, expansion_dir: usize) -> &'static [usize] {
        labels::tail_labels(self.planned_tail_dir(expansion_dir))
    }

    #[must_use]
    pub fn is_head_label_after_expansion(&self, label: usize, expansion_dir: usize) -> bool {
        self.head_labels_after_expansion(expansion_dir).contains(&label)
    }

    #[must_use]
    pub fn is_tail_label_after_expansion(&self, label: usize, expansion_dir: usize) -> bool {
        self.tail_labels_after_expansion(expansion_dir).contains(&label)
    }

    #[must_use]
    pub fn dir_to_head_label_after_expansion(&self, dir: usize, expansion_dir: usize) -> usize {
        labels::dir_to_head_label(Some(self.planned_tail_dir(expansion_dir)), dir)
    }

    #[must_use]
    pub fn dir_to_tail_label_after_expansion(&self, dir: usize, expansion_dir: usize) -> usize {
        labels::dir_to_tail_label(self.planned_tail_dir(expansion_dir), dir)
    }

    #[must_use]
    pub fn head_contraction_label_after_expansion(&self, expansion_dir: usize) -> usize {
        labels::head_contraction_label(self.planned_tail_dir(expansion_dir))
    }

    #[must_use]
    pub fn tail_contraction_label_after_expansion(&self, expansion_dir: usize) -> usize {
        labels::tail_contraction_label(self.planned_tail_dir(expansion_dir))
    }

    /// Head when contracted; otherwise the node `label` is incident to.
    #[must_use]
    pub fn occupied_node_incident_to_label(&self, label: usize) -> Node {
        check_label(label, self.label_count());
        if self.is_contracted() || self.is_head_label(label) {
            self.head
        } else {
            self.tail()
        }
    }

    /// Node reached from the particle along the edge `label`.
    #[must_use]
    pub fn neighbor_node_via_label(&self, label: usize) -> Node {
        self.occupied_node_incident_to_label(label)
            .node_in_dir(self.label_to_global_dir(label))
    }

    /// Label of the edge pointing in `global_dir` that reaches `node`.
    ///
    /// # Panics
    /// Panics when `node` is not reached by such an edge.
    #[must_use]
    pub fn label_of_neighbor_node_in_global_dir(&self, node: Node, global_dir: usize) -> usize {
        check_dir(global_dir);
        (0..self.label_count())
            .find(|&label| {
                self.label_to_global_dir(label) == global_dir
                    && self.neighbor_node_via_label(label) == node
            })
            .unwrap_or_else(|| {
                panic!(
                    "node ({}, {}) is not a neighbour in global direction {global_dir}",
                    node.x, node.y
                )
            })
    }

    /// Local direction of this particle matching the neighbour's local
    /// direction `neighbor_dir`.
    #[must_use]
    pub fn neighbor_dir_to_dir(&self, neighbor: &Body, neighbor_dir: usize) -> usize {
        self.global_to_local(neighbor.local_to_global(neighbor_dir))
    }

    /// Local direction of the neighbour matching this particle's local
    /// direction `dir`.
    #[must_use]
    pub fn dir_to_neighbor_dir(&self, neighbor: &Body, dir: usize) -> usize {
        neighbor.global_to_local(self.local_to_global(dir))
    }

    /// Whether the neighbour's edge `neighbor_label` ends at any of this
    /// particle's nodes.
    #[must_use]
    pub fn points_at_me(&self, neighbor: &Body, neighbor_label: usize) -> bool {
        self.points_at_my_head(neighbor, neighbor_label)
            || (self.is_expanded() && self.points_at_my_tail(neighbor, neighbor_label))
    }

    #[must_use]
    pub fn points_at_my_head(&self, neighbor: &Body, neighbor_label: usize) -> bool {
        neighbor.neighbor_node_via_label(neighbor_label) == self.head
    }

    /// # Panics
    /// Panics when this particle is contracted.
    #[must_use]
    pub fn points_at_my_tail(&self, neighbor: &Body, neighbor_label: usize) -> bool {
        neighbor.neighbor_node_via_label(neighbor_label) == self.tail()
    }

    /// Expand the head into the node along `global_dir`.
    pub(crate) fn expand_towards(&mut self, global_dir: usize) {
        assert!(self.is_contracted(), "expanding an expanded particle");
        self.head = self.head.node_in_dir(global_dir);
        self.global_tail_dir = Some(opposite(global_dir));
    }

    /// Become expanded with `head` as the new head and the tail along
    /// `global_tail_dir` (used when pulled by a neighbour).
    pub(crate) fn expand_into(&mut self, head: Node, global_tail_dir: usize) {
        assert!(self.is_contracted(), "expanding an expanded particle");
        debug_assert_eq!(head.node_in_dir(global_tail_dir), self.head);
        self.head = head;
        self.global_tail_dir = Some(global_tail_dir);
    }

    /// Give up the head; the particle remains at its old tail.
    pub(crate) fn retract_head(&mut self) -> Node {
        let vacated = self.head;
        self.head = self.tail();
        self.global_tail_dir = None;
        vacated
    }

    /// Give up the tail.
    pub(crate) fn retract_tail(&mut self) -> Node {
        let vacated = self.tail();
        self.global_tail_dir = None;
        vacated
    }

    fn expanded_global_tail_dir(&self) -> usize {
        self.global_tail_dir
            .unwrap_or_else(|| panic!("contracted particle has no tail"))
    }

    fn expanded_tail_dir(&self) -> usize {
        self.global_to_local(self.expanded_global_tail_dir())
    }

    fn planned_tail_dir(&self, expansion_dir: usize) -> usize {
        assert!(self.is_contracted(), "expansion planning requires a contracted particle");
        opposite(expansion_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_and_global_directions_are_inverse() {
        for orientation in 0..6 {
            let body = Body::contracted(Node::ORIGIN, orientation);
            for dir in 0..6 {
                assert_eq!(body.global_to_local(body.local_to_global(dir)), dir);
                assert_eq!(body.local_to_global(body.global_to_local(dir)), dir);
            }
        }
    }

    #[test]
    fn contracted_labels_follow_local_compass() {
        let body = Body::contracted(Node::new(2, -1), 4);
        assert_eq!(body.label_count(), 6);
        for label in 0..6 {
            assert_eq!(body.label_to_dir(label), label);
            assert_eq!(
                body.neighbor_node_via_label(label),
                body.head().node_in_dir((label + 4) % 6)
            );
        }
        assert_eq!(body.unique_labels(), vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn expanded_labels_reach_each_boundary_node() {
        for orientation in 0..6 {
            for global_tail_dir in 0..6 {
                let body = Body::new(Node::ORIGIN, Some(global_tail_dir), orientation);
                let occupied: Vec<Node> = body.occupied_nodes().collect();
                assert_eq!(occupied.len(), 2);
                let mut reached: Vec<Node> =
                    (0..10).map(|label| body.neighbor_node_via_label(label)).collect();
                assert!(reached.iter().all(|node| !occupied.contains(node)));
                reached.sort();
                reached.dedup();
                assert_eq!(reached.len(), 8);
                assert_eq!(body.unique_labels().len(), 8);
            }
        }
    }

    #[test]
    fn label_zero_points_away_in_local_direction_zero() {
        for orientation in 0..6 {
            for global_tail_dir in 0..6 {
                let body = Body::new(Node::ORIGIN, Some(global_tail_dir), orientation);
                assert_eq!(body.label_to_dir(0), 0);
                let target = body.neighbor_node_via_label(0);
                let adjacent = body
                    .occupied_nodes()
                    .filter(|node| node.is_adjacent(target))
                    .count();
                assert_eq!(adjacent, 1);
            }
        }
    }

    #[test]
    fn head_and_tail_labels_touch_their_nodes() {
        let body = Body::new(Node::new(1, 1), Some(2), 5);
        for &label in body.head_labels() {
            assert_eq!(body.occupied_node_incident_to_label(label), body.head());
            assert!(body.neighbor_node_via_label(label).is_adjacent(body.head()));
        }
        for &label in body.tail_labels() {
            assert_eq!(body.occupied_node_incident_to_label(label), body.tail());
            assert!(body.neighbor_node_via_label(label).is_adjacent(body.tail()));
        }
    }

    #[test]
    fn label_direction_round_trips() {
        let body = Body::new(Node::ORIGIN, Some(4), 1);
        for &label in body.head_labels() {
            let dir = body.label_to_dir(label);
            assert_eq!(body.dir_to_head_label(dir), label);
        }
        for &label in body.tail_labels() {
            let dir = body.label_to_dir(label);
            assert_eq!(body.dir_to_tail_label(dir), label);
        }
    }

    #[test]
    fn after_expansion_matches_real_expansion() {
        for orientation in 0..6 {
            for dir in 0..6 {
                let planned = Body::contracted(Node::ORIGIN, orientation);
                let mut expanded = planned;
                expanded.expand_towards(planned.local_to_global(dir));
                assert_eq!(expanded.tail_dir(), Some(opposite(dir)));
                for label in 0..10 {
                    assert_eq!(
                        planned.label_to_dir_after_expansion(label, dir),
                        expanded.label_to_dir(label)
                    );
                }
                assert_eq!(planned.head_labels_after_expansion(dir), expanded.head_labels());
                assert_eq!(planned.tail_labels_after_expansion(dir), expanded.tail_labels());
                assert_eq!(
                    planned.head_contraction_label_after_expansion(dir),
                    expanded.head_contraction_label()
                );
                assert_eq!(
                    planned.tail_contraction_label_after_expansion(dir),
                    expanded.tail_contraction_label()
                );
                let probe = (dir + 1) % 6;
                assert_eq!(
                    planned.dir_to_head_label_after_expansion(probe, dir),
                    expanded.dir_to_head_label(probe)
                );
                assert!(planned.is_head_label_after_expansion(
                    expanded.dir_to_head_label(probe),
                    dir
                ));
                assert_eq!(
                    planned.dir_to_tail_label_after_expansion(probe, dir),
                    expanded.dir_to_tail_label(probe)
                );
                assert!(planned.is_tail_label_after_expansion(
                    expanded.dir_to_tail_label(probe),
                    dir
                ));
            }
        }
    }

    #[test]
    fn contraction_labels_address_the_kept_node() {
        let body = Body::new(Node::ORIGIN, Some(0), 3);
        let head_label = body.head_contraction_label();
        assert!(body.is_tail_label(head_label));
        assert_eq!(body.occupied_node_incident_to_label(head_label), body.tail());
        let tail_label = body.tail_contraction_label();
        assert!(body.is_head_label(tail_label));
        assert_eq!(body.occupied_node_incident_to_label(tail_label), body.head());
    }

    #[test]
    fn neighbor_direction_conversions_are_inverse() {
        let me = Body::contracted(Node::ORIGIN, 2);
        let neighbor = Body::contracted(Node::new(1, 0), 5);
        for dir in 0..6 {
            let theirs = me.dir_to_neighbor_dir(&neighbor, dir);
            assert_eq!(me.neighbor_dir_to_dir(&neighbor, theirs), dir);
            assert_eq!(neighbor.local_to_global(theirs), me.local_to_global(dir));
        }
    }

    #[test]
    fn points_at_contracted_head() {
        let me = Body::contracted(Node::ORIGIN, 0);
        let neighbor = Body::contracted(Node::new(1, 0), 1);
        for label in 0..6 {
            let expected = neighbor.neighbor_node_via_label(label) == me.head();
            assert_eq!(me.points_at_my_head(&neighbor, label), expected);
            assert_eq!(me.points_at_me(&neighbor, label), expected);
        }
        let west = neighbor.global_to_local(3);
        assert!(me.points_at_my_head(&neighbor, west));
    }

    #[test]
    fn points_at_expanded_head_and_tail() {
        // Head at (0,0), tail at (-1,0); the neighbour touches both from the north.
        let me = Body::new(Node::ORIGIN, Some(3), 4);
        let neighbor = Body::contracted(Node::new(-1, 1), 2);
        let to_head = neighbor.global_to_local(5);
        let to_tail = neighbor.global_to_local(4);
        assert!(me.points_at_my_head(&neighbor, to_head));
        assert!(!me.points_at_my_tail(&neighbor, to_head));
        assert!(me.points_at_my_tail(&neighbor, to_tail));
        assert!(me.points_at_me(&neighbor, to_tail));
        for label in 0..6 {
            let target = neighbor.neighbor_node_via_label(label);
            assert_eq!(me.points_at_my_head(&neighbor, label), target == me.head());
            assert_eq!(me.points_at_my_tail(&neighbor, label), target == me.tail());
        }
    }

    #[test]
    fn label_of_neighbor_node_finds_matching_edge() {
        let body = Body::new(Node::ORIGIN, Some(0), 0);
        let node = body.tail().node_in_dir(0);
        let label = body.label_of_neighbor_node_in_global_dir(node, 0);
        assert_eq!(label, 0);
        assert_eq!(body.neighbor_node_via_label(label), node);
    }

    #[test]
    #[should_panic(expected = "no tail")]
    fn tail_of_contracted_particle_panics() {
        let _ = Body::contracted(Node::ORIGIN, 0).tail();
    }

    #[test]
    #[should_panic(expected = "orientation")]
    fn orientation_out_of_range_panics() {
        let _ = Body::contracted(Node::ORIGIN, 6);
    }
}
