//! User-editable piecewise-linear curve.
//!
//! A sparse set of up to 16 control nodes sorted by normalized position.
//! Node 0 is special: it cannot be deleted and doubles as the virtual closing
//! node at position 1.0, so a query past the last node wraps back to it.

use core::cmp::Ordering;

/// Maximum number of nodes in a set.
pub const MAX_NODES: usize = 16;
/// A curve needs at least two nodes to interpolate between.
pub const MIN_NODES: usize = 2;

/// Positions closer than this are treated as coincident.
const MIN_SPAN: f32 = 1e-8;
/// Tolerance when matching a node at the query position itself.
const POS_EPSILON: f32 = 1e-4;

/// One control node. `pos` is a normalized 0..1 position within the cycle and
/// `val` a normalized 0..1 value (remapped to -1..1 downstream).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveNode {
    pub pos: f32,
    pub val: f32,
    /// Shape exponent reserved for curved segments; the sampled port model
    /// only drives linear segments, so it is carried but not applied.
    pub curve: f32,
}

impl CurveNode {
    #[inline]
    pub const fn new(pos: f32, val: f32) -> Self {
        Self {
            pos,
            val,
            curve: 0.0,
        }
    }
}

impl Default for CurveNode {
    fn default() -> Self {
        Self::new(0.0, 0.5)
    }
}

/// A validated node set with a position-sorted index.
///
/// Sorting is stable by (position, insertion index): duplicate positions keep
/// their insertion order rather than inheriting whatever the sort felt like.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeSet {
    nodes: [CurveNode; MAX_NODES],
    sorted: [usize; MAX_NODES],
    num_nodes: usize,
}

impl NodeSet {
    /// Build a set from the active nodes. The count is clamped into
    /// `[MIN_NODES, MAX_NODES]`; missing nodes default.
    pub fn new(active: &[CurveNode]) -> Self {
        let mut nodes = [CurveNode::default(); MAX_NODES];
        let num_nodes = active.len().clamp(MIN_NODES, MAX_NODES);
        for (slot, node) in nodes.iter_mut().zip(active.iter()) {
            *slot = CurveNode {
                pos: node.pos.clamp(0.0, 1.0),
                val: node.val.clamp(0.0, 1.0),
                curve: node.curve,
            };
        }

        let mut set = Self {
            nodes,
            sorted: [0; MAX_NODES],
            num_nodes,
        };
        set.resort();
        set
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.num_nodes
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.num_nodes == 0
    }

    #[inline]
    pub fn node(&self, index: usize) -> &CurveNode {
        &self.nodes[index]
    }

    fn resort(&mut self) {
        for (i, slot) in self.sorted.iter_mut().enumerate() {
            *slot = i;
        }
        let nodes = &self.nodes;
        self.sorted[..self.num_nodes].sort_by(|&a, &b| {
            nodes[a]
                .pos
                .partial_cmp(&nodes[b].pos)
                .unwrap_or(Ordering::Equal)
                .then(a.cmp(&b))
        });
    }

    /// Index of the node with the greatest position at or below `ratio`.
    /// Falls back to the lowest-positioned node when nothing is below.
    pub fn prev_index(&self, ratio: f32) -> usize {
        let mut best_pos = -1.0;
        let mut best_idx = self.sorted[0];
        for &idx in &self.sorted[..self.num_nodes] {
            let pos = self.nodes[idx].pos;
            if pos > best_pos && pos < ratio + POS_EPSILON {
                best_pos = pos;
                best_idx = idx;
            }
        }
        best_idx
    }

    /// Index of the node with the smallest position at or above `ratio`, or
    /// `None` when the query is past the last node and the bracketing point
    /// is the virtual copy of node 0 at position 1.0.
    pub fn next_index(&self, ratio: f32) -> Option<usize> {
        let mut best_pos = f32::INFINITY;
        let mut best_idx = None;
        for &idx in &self.sorted[..self.num_nodes] {
            let pos = self.nodes[idx].pos;
            if pos < best_pos && pos >= ratio {
                best_pos = pos;
                best_idx = Some(idx);
            }
        }
        best_idx
    }

    /// Interpolated value at a cycle ratio in `[0, 1)`.
    ///
    /// Output stays in the node value range 0..1; the waveform pipeline
    /// remaps it to -1..1.
    pub fn value_at(&self, ratio: f32) -> f32 {
        let prev = *self.node(self.prev_index(ratio));
        let next = match self.next_index(ratio) {
            Some(idx) => *self.node(idx),
            // Wrap: the closing point is node 0's value at position 1.0.
            None => CurveNode {
                pos: 1.0,
                ..self.nodes[0]
            },
        };
        interpolate(&prev, &next, ratio)
    }
}

impl Default for NodeSet {
    /// A flat two-node line at mid value.
    fn default() -> Self {
        Self::new(&[CurveNode::new(0.0, 0.5), CurveNode::new(1.0, 0.5)])
    }
}

/// Linear interpolation between two bracketing nodes. Coincident nodes
/// (span below `MIN_SPAN`) return the earlier node's value unchanged.
#[inline]
pub(crate) fn interpolate(prev: &CurveNode, next: &CurveNode, ratio: f32) -> f32 {
    let span = next.pos - prev.pos;
    if span < MIN_SPAN {
        return prev.val;
    }
    let slope = (next.val - prev.val) / span;
    slope * (ratio - prev.pos) + prev.val
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_two_node_line() {
        let set = NodeSet::new(&[CurveNode::new(0.0, 1.0), CurveNode::new(1.0, 0.0)]);
        assert_relative_eq!(set.value_at(0.0), 1.0);
        assert_relative_eq!(set.value_at(0.5), 0.5);
        assert_relative_eq!(set.value_at(0.99), 0.01, epsilon = 1e-6);
    }

    #[test]
    fn test_wraparound_to_node_zero() {
        // Last node at 0.5; past it the bracketing point is node 0 at 1.0.
        let set = NodeSet::new(&[CurveNode::new(0.0, 1.0), CurveNode::new(0.5, 0.0)]);
        assert!(set.next_index(0.75).is_none());
        // Halfway between (0.5, 0.0) and the virtual (1.0, 1.0).
        assert_relative_eq!(set.value_at(0.75), 0.5);
    }

    #[test]
    fn test_coincident_nodes_return_prev_value() {
        let set = NodeSet::new(&[
            CurveNode::new(0.0, 0.2),
            CurveNode::new(0.5, 0.8),
            CurveNode::new(0.5, 0.1),
        ]);
        let v = set.value_at(0.5);
        assert!(v.is_finite());
        // Stable order: the first-inserted node at 0.5 is the "prev".
        assert_relative_eq!(v, 0.8);
    }

    #[test]
    fn test_duplicate_positions_keep_insertion_order() {
        let set = NodeSet::new(&[
            CurveNode::new(0.0, 0.0),
            CurveNode::new(0.3, 0.4),
            CurveNode::new(0.3, 0.9),
        ]);
        // Equal positions must sort by insertion index, deterministically.
        let order: Vec<usize> = (0..set.len()).map(|i| set.sorted[i]).collect();
        assert_eq!(order, vec![0, 1, 2]);
    }

    #[test]
    fn test_midpoint_of_three_nodes() {
        let set = NodeSet::new(&[
            CurveNode::new(0.0, 0.0),
            CurveNode::new(0.5, 1.0),
            CurveNode::new(1.0, 0.0),
        ]);
        assert_relative_eq!(set.value_at(0.25), 0.5);
        assert_relative_eq!(set.value_at(0.75), 0.5);
    }

    #[test]
    fn test_count_is_clamped() {
        let set = NodeSet::new(&[CurveNode::new(0.0, 0.3)]);
        assert_eq!(set.len(), MIN_NODES);

        let many = [CurveNode::new(0.5, 0.5); 32];
        let set = NodeSet::new(&many);
        assert_eq!(set.len(), MAX_NODES);
    }

    #[test]
    fn test_values_are_clamped_on_entry() {
        let set = NodeSet::new(&[CurveNode::new(-0.5, 2.0), CurveNode::new(1.5, -1.0)]);
        assert_eq!(set.node(0).pos, 0.0);
        assert_eq!(set.node(0).val, 1.0);
        assert_eq!(set.node(1).pos, 1.0);
        assert_eq!(set.node(1).val, 0.0);
    }
}
