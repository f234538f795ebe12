// Static k-d tree over particle centers.
//
// Built once by recursive median splits on the axis of largest spread. Points
// live in a single permutation array; every node owns a contiguous range of
// it. After a split at `mid`, the left child holds coordinates <= the split
// value and the right child holds coordinates >= it, so a radius query descends
// into each side whose half-space the query sphere reaches.

use crate::error::{ContactError, Result};
use crate::spatial::{SpatialIndex, padded_reach};
use glam::f64::DVec3;
use smallvec::SmallVec;

/// Default number of points stored in a leaf.
pub const DEFAULT_LEAF_SIZE: usize = 8;

#[derive(Debug, Clone, Copy)]
enum Node {
    Leaf {
        start: usize,
        end: usize,
    },
    Split {
        axis: usize,
        value: f64,
        left: usize,
        right: usize,
    },
}

/// A balanced, immutable k-d tree.
pub struct KdTree {
    centers: Vec<DVec3>,
    order: Vec<usize>,
    nodes: Vec<Node>,
    leaf_size: usize,
}

impl KdTree {
    pub fn from_centers(centers: &[DVec3]) -> Self {
        Self::with_leaf_size(centers, DEFAULT_LEAF_SIZE)
    }

    /// Builds a tree whose leaves hold at most `leaf_size` points (minimum 1).
    pub fn with_leaf_size(centers: &[DVec3], leaf_size: usize) -> Self {
        let leaf_size = leaf_size.max(1);
        let mut tree = Self {
            centers: centers.to_vec(),
            order: (0..centers.len()).collect(),
            nodes: Vec::with_capacity(2 * centers.len() / leaf_size + 1),
            leaf_size,
        };
        if !centers.is_empty() {
            tree.build(0, centers.len());
        }
        tree
    }

    pub fn leaf_size(&self) -> usize {
        self.leaf_size
    }

    /// Number of tree nodes, leaves included.
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    fn build(&mut self, start: usize, end: usize) -> usize {
        let node_id = self.nodes.len();
        if end - start <= self.leaf_size {
            self.nodes.push(Node::Leaf { start, end });
            return node_id;
        }

        let axis = self.widest_axis(start, end);
        let mid = start + (end - start) / 2;
        let centers = &self.centers;
        self.order[start..end].select_nth_unstable_by(mid - start, |&a, &b| {
            centers[a][axis].total_cmp(&centers[b][axis])
        });
        let value = self.centers[self.order[mid]][axis];

        // Reserve the slot; children are filled in once their ids are known.
        self.nodes.push(Node::Leaf { start, end });
        let left = self.build(start, mid);
        let right = self.build(mid, end);
        self.nodes[node_id] = Node::Split {
            axis,
            value,
            left,
            right,
        };
        node_id
    }

    fn widest_axis(&self, start: usize, end: usize) -> usize {
        let first = self.centers[self.order[start]];
        let (min, max) = self.order[start + 1..end]
            .iter()
            .fold((first, first), |(lo, hi), &i| {
                (lo.min(self.centers[i]), hi.max(self.centers[i]))
            });
        let spread = max - min;
        if spread.x >= spread.y && spread.x >= spread.z {
            0
        } else if spread.y >= spread.z {
            1
        } else {
            2
        }
    }
}

impl SpatialIndex for KdTree {
    fn len(&self) -> usize {
        self.centers.len()
    }

    fn center(&self, id: usize) -> DVec3 {
        self.centers[id]
    }

    fn for_each_within(&self, point: DVec3, radius: f64, f: &mut dyn FnMut(usize)) {
        if self.nodes.is_empty() || radius.is_nan() || radius < 0.0 || !point.is_finite() {
            return;
        }
        let reach = padded_reach(radius, point.abs().max_element());

        let mut stack: SmallVec<[usize; 64]> = SmallVec::new();
        stack.push(0);
        while let Some(node_id) = stack.pop() {
            match self.nodes[node_id] {
                Node::Leaf { start, end } => {
                    for &j in &self.order[start..end] {
                        if point.distance(self.centers[j]) <= radius {
                            f(j);
                        }
                    }
                }
                Node::Split {
                    axis,
                    value,
                    left,
                    right,
                } => {
                    let p = point[axis];
                    if p - reach <= value {
                        stack.push(left);
                    }
                    if p + reach >= value {
                        stack.push(right);
                    }
                }
            }
        }
    }

    fn nearest(&self, point: DVec3) -> Result<(usize, f64)> {
        if self.nodes.is_empty() {
            return Err(ContactError::EmptyIndex);
        }
        if !point.is_finite() {
            return Err(ContactError::NonFiniteQuery(point.to_array()));
        }

        let mut best = (usize::MAX, f64::INFINITY);
        let mut stack: SmallVec<[(usize, f64); 64]> = SmallVec::new();
        stack.push((0, 0.0));
        while let Some((node_id, plane_distance)) = stack.pop() {
            if plane_distance > best.1 {
                continue;
            }
            match self.nodes[node_id] {
                Node::Leaf { start, end } => {
                    for &j in &self.order[start..end] {
                        let d = point.distance(self.centers[j]);
                        // Ties resolve to the lowest id for reproducible answers.
                        if d < best.1 || (d == best.1 && j < best.0) {
                            best = (j, d);
                        }
                    }
                }
                Node::Split {
                    axis,
                    value,
                    left,
                    right,
                } => {
                    let offset = point[axis] - value;
                    let (near, far) = if offset <= 0.0 { (left, right) } else { (right, left) };
                    // Far side first so the near side is popped next.
                    stack.push((far, plane_distance.max(offset.abs())));
                    stack.push((near, plane_distance));
                }
            }
        }
        Ok(best)
    }
}
