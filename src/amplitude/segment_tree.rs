// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Lazy range-affine segment tree over the amplitude vector.
//!
//! Each node stores the sum of its subtree and a pending affine tag
//! `x ↦ mul·x + add` that has been applied to the node's own sum but not yet
//! pushed to its children. Both Grover operations are affine maps over a
//! range, so each one costs O(log N):
//!
//! - oracle on `i`: `(-1, 0)` over `[i, i]`
//! - diffusion: `(-1, 2·mean)` over `[0, N-1]`, with `mean` read from the
//!   root sum
//!
//! A node's sum does not bound the magnitude of its leaves once negative
//! multipliers are involved, so the tree keeps no composable maximum.
//! [`find_max_amplitude_index`](AmplitudeVector::find_max_amplitude_index)
//! instead materializes every leaf in a single O(N) read-only pass that
//! composes the pending tags on the way down.

use super::r#trait::{validate_index, validate_size, AmplitudeVector, EngineKind, DEFAULT_MAX_SIZE};
use crate::error::AmplitudeError;

/// Affine transform `x ↦ mul·x + add`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineTag {
    /// Multiplier
    pub mul: f64,
    /// Additive term
    pub add: f64,
}

impl AffineTag {
    /// The identity transform `(1, 0)`.
    pub const IDENTITY: AffineTag = AffineTag { mul: 1.0, add: 0.0 };

    /// Create a tag.
    pub fn new(mul: f64, add: f64) -> Self {
        Self { mul, add }
    }

    /// Whether this is exactly the identity.
    pub fn is_identity(&self) -> bool {
        self.mul == 1.0 && self.add == 0.0
    }

    /// Compose so that `inner` runs first and `self` second.
    ///
    /// `self.after(inner).apply(x) == self.apply(inner.apply(x))`.
    pub fn after(self, inner: AffineTag) -> AffineTag {
        AffineTag {
            mul: self.mul * inner.mul,
            add: self.mul * inner.add + self.add,
        }
    }

    /// Evaluate the transform at `x`.
    pub fn apply(self, x: f64) -> f64 {
        self.mul * x + self.add
    }
}

impl Default for AffineTag {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Node {
    sum: f64,
    tag: AffineTag,
}

/// Amplitude engine backed by a lazy range-affine segment tree.
///
/// Nodes live in a flat vector of `4N` slots with the root at index 1 and
/// the children of `i` at `2i` and `2i + 1`. Ranges are inclusive.
#[derive(Debug, Clone)]
pub struct SegmentTreeAmplitude {
    nodes: Vec<Node>,
    size: usize,
    max_size: usize,
}

impl SegmentTreeAmplitude {
    /// Create an uninitialized engine with the default size bound.
    pub fn new() -> Self {
        Self::with_max_size(DEFAULT_MAX_SIZE)
    }

    /// Create an uninitialized engine accepting at most `max_size` amplitudes.
    pub fn with_max_size(max_size: usize) -> Self {
        Self {
            nodes: Vec::new(),
            size: 0,
            max_size,
        }
    }

    /// Apply `x ↦ mul·x + add` to every amplitude in `[start, end]`.
    pub fn range_affine_update(
        &mut self,
        start: usize,
        end: usize,
        mul: f64,
        add: f64,
    ) -> Result<(), AmplitudeError> {
        let size = self.check_range(start, end)?;
        self.update(1, 0, size - 1, start, end, AffineTag::new(mul, add));
        Ok(())
    }

    /// Sum of the amplitudes in `[start, end]`.
    ///
    /// Pending tags along the visited paths are pushed down, hence `&mut`.
    pub fn range_sum(&mut self, start: usize, end: usize) -> Result<f64, AmplitudeError> {
        let size = self.check_range(start, end)?;
        Ok(self.query(1, 0, size - 1, start, end))
    }

    fn initialized_size(&self) -> Result<usize, AmplitudeError> {
        if self.size == 0 {
            return Err(AmplitudeError::NotInitialized);
        }
        Ok(self.size)
    }

    fn check_range(&self, start: usize, end: usize) -> Result<usize, AmplitudeError> {
        let size = self.initialized_size()?;
        if start > end || end >= size {
            return Err(AmplitudeError::InvalidRange { start, end, size });
        }
        Ok(size)
    }

    fn build(&mut self, node: usize, start: usize, end: usize, value: f64) {
        if start == end {
            self.nodes[node] = Node {
                sum: value,
                tag: AffineTag::IDENTITY,
            };
            return;
        }
        let mid = start + (end - start) / 2;
        self.build(2 * node, start, mid, value);
        self.build(2 * node + 1, mid + 1, end, value);
        self.nodes[node] = Node {
            sum: self.nodes[2 * node].sum + self.nodes[2 * node + 1].sum,
            tag: AffineTag::IDENTITY,
        };
    }

    /// Apply `tag` to the node's own sum and layer it over its pending tag.
    fn apply_tag(&mut self, node: usize, start: usize, end: usize, tag: AffineTag) {
        let len = (end - start + 1) as f64;
        let n = &mut self.nodes[node];
        n.sum = tag.mul * n.sum + tag.add * len;
        n.tag = tag.after(n.tag);
    }

    fn push(&mut self, node: usize, start: usize, end: usize) {
        let tag = self.nodes[node].tag;
        if tag.is_identity() {
            return;
        }
        if start != end {
            let mid = start + (end - start) / 2;
            self.apply_tag(2 * node, start, mid, tag);
            self.apply_tag(2 * node + 1, mid + 1, end, tag);
        }
        self.nodes[node].tag = AffineTag::IDENTITY;
    }

    fn update(&mut self, node: usize, start: usize, end: usize, lo: usize, hi: usize, tag: AffineTag) {
        self.push(node, start, end);

        if hi < start || end < lo {
            return;
        }
        if lo <= start && end <= hi {
            self.apply_tag(node, start, end, tag);
            return;
        }

        let mid = start + (end - start) / 2;
        self.update(2 * node, start, mid, lo, hi, tag);
        self.update(2 * node + 1, mid + 1, end, lo, hi, tag);
        self.nodes[node].sum = self.nodes[2 * node].sum + self.nodes[2 * node + 1].sum;
    }

    fn query(&mut self, node: usize, start: usize, end: usize, lo: usize, hi: usize) -> f64 {
        self.push(node, start, end);

        if hi < start || end < lo {
            return 0.0;
        }
        if lo <= start && end <= hi {
            return self.nodes[node].sum;
        }

        let mid = start + (end - start) / 2;
        self.query(2 * node, start, mid, lo, hi) + self.query(2 * node + 1, mid + 1, end, lo, hi)
    }

    /// Value of one leaf without mutating the tree, O(log N).
    fn leaf_value(&self, index: usize) -> f64 {
        let (mut node, mut start, mut end) = (1, 0, self.size - 1);
        // Ancestors' tags are newer than their descendants', so each one
        // wraps the composition accumulated so far.
        let mut pending = AffineTag::IDENTITY;
        while start != end {
            pending = pending.after(self.nodes[node].tag);
            let mid = start + (end - start) / 2;
            if index <= mid {
                node *= 2;
                end = mid;
            } else {
                node = 2 * node + 1;
                start = mid + 1;
            }
        }
        pending.apply(self.nodes[node].sum)
    }

    /// Append every leaf value under `node` to `out`, O(subtree size).
    fn collect_leaves(
        &self,
        node: usize,
        start: usize,
        end: usize,
        pending: AffineTag,
        out: &mut Vec<f64>,
    ) {
        if start == end {
            out.push(pending.apply(self.nodes[node].sum));
            return;
        }
        let pending = pending.after(self.nodes[node].tag);
        let mid = start + (end - start) / 2;
        self.collect_leaves(2 * node, start, mid, pending, out);
        self.collect_leaves(2 * node + 1, mid + 1, end, pending, out);
    }
}

impl Default for SegmentTreeAmplitude {
    fn default() -> Self {
        Self::new()
    }
}

impl AmplitudeVector for SegmentTreeAmplitude {
    fn kind(&self) -> EngineKind {
        EngineKind::SegmentTree
    }

    fn size(&self) -> usize {
        self.size
    }

    fn initialize(&mut self, size: i64) -> Result<(), AmplitudeError> {
        let requested = size;
        let size = validate_size(size, self.max_size)?;
        let node_count = size.checked_mul(4).ok_or(AmplitudeError::InvalidSize {
            size: requested,
            max: self.max_size,
        })?;
        self.nodes = vec![Node::default(); node_count];
        self.size = size;
        self.build(1, 0, size - 1, 1.0 / (size as f64).sqrt());
        Ok(())
    }

    fn apply_oracle(&mut self, target_index: i64) -> Result<(), AmplitudeError> {
        let size = self.initialized_size()?;
        let index = validate_index(target_index, size)?;
        self.update(1, 0, size - 1, index, index, AffineTag::new(-1.0, 0.0));
        Ok(())
    }

    fn apply_diffusion(&mut self) -> Result<(), AmplitudeError> {
        let size = self.initialized_size()?;
        let mean = self.query(1, 0, size - 1, 0, size - 1) / size as f64;
        self.update(1, 0, size - 1, 0, size - 1, AffineTag::new(-1.0, 2.0 * mean));
        Ok(())
    }

    fn amplitude_at(&self, index: usize) -> Result<f64, AmplitudeError> {
        let size = self.initialized_size()?;
        if index >= size {
            return Err(AmplitudeError::InvalidIndex {
                index: index as i64,
                size,
            });
        }
        Ok(self.leaf_value(index))
    }

    fn all_amplitudes(&self) -> Result<Vec<f64>, AmplitudeError> {
        let size = self.initialized_size()?;
        let mut out = Vec::with_capacity(size);
        self.collect_leaves(1, 0, size - 1, AffineTag::IDENTITY, &mut out);
        Ok(out)
    }
}
