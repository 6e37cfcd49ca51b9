// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Fenwick-tree amplitude engine.
//!
//! Keeps the raw amplitudes alongside a 1-indexed binary indexed tree of
//! their prefix sums. Point updates and prefix queries cost O(log N). The
//! diffusion step has to rewrite every amplitude individually, so it costs
//! O(N log N); the segment-tree engine exists to remove that factor. The
//! tree is rebuilt from the raw amplitudes after each diffusion so rounding
//! in the point deltas never accumulates across rounds.

use super::r#trait::{
    max_probability_index, validate_index, validate_size, AmplitudeVector, EngineKind,
    DEFAULT_MAX_SIZE,
};
use crate::error::AmplitudeError;

#[inline]
fn lowbit(i: usize) -> usize {
    i & i.wrapping_neg()
}

/// Amplitude engine backed by a Fenwick (binary indexed) tree.
#[derive(Debug, Clone)]
pub struct FenwickTreeAmplitude {
    /// Prefix-sum tree, 1-indexed; slot 0 is unused.
    tree: Vec<f64>,
    /// Raw amplitudes, 0-indexed.
    amplitudes: Vec<f64>,
    max_size: usize,
}

impl FenwickTreeAmplitude {
    /// Create an uninitialized engine with the default size bound.
    pub fn new() -> Self {
        Self::with_max_size(DEFAULT_MAX_SIZE)
    }

    /// Create an uninitialized engine accepting at most `max_size` amplitudes.
    pub fn with_max_size(max_size: usize) -> Self {
        Self {
            tree: Vec::new(),
            amplitudes: Vec::new(),
            max_size,
        }
    }

    /// Sum of the amplitudes in `[0, index]`.
    pub fn prefix_sum(&self, index: usize) -> Result<f64, AmplitudeError> {
        let size = self.initialized_size()?;
        if index >= size {
            return Err(AmplitudeError::InvalidIndex {
                index: index as i64,
                size,
            });
        }
        Ok(self.query(index))
    }

    fn initialized_size(&self) -> Result<usize, AmplitudeError> {
        if self.amplitudes.is_empty() {
            return Err(AmplitudeError::NotInitialized);
        }
        Ok(self.amplitudes.len())
    }

    /// Linear-time construction: each slot pushes its total to its parent.
    fn rebuild(&mut self) {
        let n = self.amplitudes.len();
        self.tree = vec![0.0; n + 1];
        for i in 1..=n {
            self.tree[i] += self.amplitudes[i - 1];
            let parent = i + lowbit(i);
            if parent <= n {
                self.tree[parent] += self.tree[i];
            }
        }
    }

    /// Add `delta` to the amplitude at `index` (0-indexed).
    fn add(&mut self, index: usize, delta: f64) {
        let n = self.amplitudes.len();
        self.amplitudes[index] += delta;
        let mut i = index + 1;
        while i <= n {
            self.tree[i] += delta;
            i += lowbit(i);
        }
    }

    /// Replace the amplitude at `index`, keeping the tree consistent.
    fn set(&mut self, index: usize, value: f64) {
        let delta = value - self.amplitudes[index];
        self.add(index, delta);
        // Avoid drift between the raw value and old + delta.
        self.amplitudes[index] = value;
    }

    fn query(&self, index: usize) -> f64 {
        let mut i = index + 1;
        let mut sum = 0.0;
        while i > 0 {
            sum += self.tree[i];
            i -= lowbit(i);
        }
        sum
    }
}

impl Default for FenwickTreeAmplitude {
    fn default() -> Self {
        Self::new()
    }
}

impl AmplitudeVector for FenwickTreeAmplitude {
    fn kind(&self) -> EngineKind {
        EngineKind::Fenwick
    }

    fn size(&self) -> usize {
        self.amplitudes.len()
    }

    fn initialize(&mut self, size: i64) -> Result<(), AmplitudeError> {
        let size = validate_size(size, self.max_size)?;
        self.amplitudes = vec![1.0 / (size as f64).sqrt(); size];
        self.rebuild();
        Ok(())
    }

    fn apply_oracle(&mut self, target_index: i64) -> Result<(), AmplitudeError> {
        let size = self.initialized_size()?;
        let index = validate_index(target_index, size)?;
        let old = self.amplitudes[index];
        self.set(index, -old);
        Ok(())
    }

    fn apply_diffusion(&mut self) -> Result<(), AmplitudeError> {
        let size = self.initialized_size()?;
        let mean = self.query(size - 1) / size as f64;
        for index in 0..size {
            let old = self.amplitudes[index];
            self.set(index, 2.0 * mean - old);
        }
        // N point deltas leave the tree rounded away from the raw values;
        // resync so the next round's mean is read from exact prefix sums.
        self.rebuild();
        Ok(())
    }

    fn amplitude_at(&self, index: usize) -> Result<f64, AmplitudeError> {
        let size = self.initialized_size()?;
        self.amplitudes
            .get(index)
            .copied()
            .ok_or(AmplitudeError::InvalidIndex {
                index: index as i64,
                size,
            })
    }

    fn all_amplitudes(&self) -> Result<Vec<f64>, AmplitudeError> {
        self.initialized_size()?;
        Ok(self.amplitudes.clone())
    }

    fn find_max_amplitude_index(&self) -> Result<usize, AmplitudeError> {
        max_probability_index(&self.amplitudes).ok_or(AmplitudeError::NotInitialized)
    }

    fn total_probability(&self) -> Result<f64, AmplitudeError> {
        self.initialized_size()?;
        Ok(self.amplitudes.iter().map(|a| a * a).sum())
    }
}
