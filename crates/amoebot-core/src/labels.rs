//! Port labelling tables for contracted and expanded particles.
//!
//! A label names an edge between a particle and a neighbouring node it does not
//! occupy. A contracted particle labels its six edges by local direction. An
//! expanded particle has ten such edges; label 0 is the edge in local direction
//! 0 that points away from the particle, and labels increase counter-clockwise.
//!
//! Every table is indexed by the particle's local tail direction, so the same
//! combinatorial structure serves every orientation.

/// Number of labels around a contracted particle.
pub const CONTRACTED_LABEL_COUNT: usize = 6;
/// Number of labels around an expanded particle.
pub const EXPANDED_LABEL_COUNT: usize = 10;

/// Labels of a contracted particle.
pub const CONTRACTED_LABELS: [usize; CONTRACTED_LABEL_COUNT] = [0, 1, 2, 3, 4, 5];

/// Head labels of an expanded particle, indexed by local tail direction. The
/// tail arc for tail direction `t` is the head arc for `(t + 3) % 6`.
const HEAD_ARCS: [[usize; 5]; 6] = [
    [3, 4, 5, 6, 7],
    [4, 5, 6, 7, 8],
    [7, 8, 9, 0, 1],
    [8, 9, 0, 1, 2],
    [9, 0, 1, 2, 3],
    [2, 3, 4, 5, 6],
];

/// Label pointing straight away from the head/tail axis on the far side.
const CONTRACTION_LABELS: [usize; 6] = [0, 1, 4, 5, 6, 9];

/// Local direction of each expanded label, indexed by local tail direction.
const LABEL_DIRS: [[usize; EXPANDED_LABEL_COUNT]; 6] = [
    [0, 1, 2, 1, 2, 3, 4, 5, 4, 5],
    [0, 1, 2, 3, 2, 3, 4, 5, 0, 5],
    [0, 1, 0, 1, 2, 3, 4, 3, 4, 5],
    [0, 1, 2, 1, 2, 3, 4, 5, 4, 5],
    [0, 1, 2, 3, 2, 3, 4, 5, 0, 5],
    [0, 1, 0, 1, 2, 3, 4, 3, 4, 5],
];

pub(crate) fn check_dir(dir: usize) {
    assert!(dir < 6, "direction {dir} out of range");
}

pub(crate) fn check_label(label: usize, limit: usize) {
    assert!(label < limit, "label {label} out of range for {limit} labels");
}

/// Number of valid labels for the given occupancy.
#[must_use]
pub const fn label_count(tail_dir: Option<usize>) -> usize {
    match tail_dir {
        None => CONTRACTED_LABEL_COUNT,
        Some(_) => EXPANDED_LABEL_COUNT,
    }
}

/// Local direction the edge `label` points in.
#[must_use]
pub fn label_to_dir(tail_dir: Option<usize>, label: usize) -> usize {
    match tail_dir {
        None => {
            check_label(label, CONTRACTED_LABEL_COUNT);
            label
        }
        Some(tail_dir) => {
            check_dir(tail_dir);
            check_label(label, EXPANDED_LABEL_COUNT);
            LABEL_DIRS[tail_dir][label]
        }
    }
}

/// Labels incident to the head (all labels while contracted).
#[must_use]
pub fn head_labels(tail_dir: Option<usize>) -> &'static [usize] {
    match tail_dir {
        None => &CONTRACTED_LABELS,
        Some(tail_dir) => {
            check_dir(tail_dir);
            &HEAD_ARCS[tail_dir]
        }
    }
}

/// Labels incident to the tail of an expanded particle.
#[must_use]
pub fn tail_labels(tail_dir: usize) -> &'static [usize] {
    check_dir(tail_dir);
    &HEAD_ARCS[(tail_dir + 3) % 6]
}

/// Label whose use in a contraction vacates the head.
#[must_use]
pub fn head_contraction_label(tail_dir: usize) -> usize {
    check_dir(tail_dir);
    CONTRACTION_LABELS[tail_dir]
}

/// Label whose use in a contraction vacates the tail.
#[must_use]
pub fn tail_contraction_label(tail_dir: usize) -> usize {
    check_dir(tail_dir);
    CONTRACTION_LABELS[(tail_dir + 3) % 6]
}

/// Head label of the edge pointing in local direction `dir`.
///
/// # Panics
/// Panics for the direction from head to tail, which carries no head label.
#[must_use]
pub fn dir_to_head_label(tail_dir: Option<usize>, dir: usize) -> usize {
    check_dir(dir);
    head_labels(tail_dir)
        .iter()
        .copied()
        .find(|&label| label_to_dir(tail_dir, label) == dir)
        .unwrap_or_else(|| panic!("no head label points in direction {dir}"))
}

/// Tail label of the edge pointing in local direction `dir`.
///
/// # Panics
/// Panics for the direction from tail to head, which carries no tail label.
#[must_use]
pub fn dir_to_tail_label(tail_dir: usize, dir: usize) -> usize {
    check_dir(dir);
    tail_labels(tail_dir)
        .iter()
        .copied()
        .find(|&label| label_to_dir(Some(tail_dir), label) == dir)
        .unwrap_or_else(|| panic!("no tail label points in direction {dir}"))
}
