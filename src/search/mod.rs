// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Grover search orchestration.
//!
//! Drives a freshly allocated amplitude engine through
//! `floor(π/4 · √N)` oracle/diffusion rounds and reports whether the most
//! probable index matches the target.

use std::f64::consts::PI;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info_span};

use crate::amplitude::r#trait::validate_index;
use crate::amplitude::{EngineKind, DEFAULT_MAX_SIZE};
use crate::error::Result;

/// Number of oracle/diffusion rounds for a search space of `size`.
///
/// `floor(π/4 · √size)`: 1 → 0, 3 → 1, 16 → 3, 1024 → 25.
pub fn iteration_count(size: usize) -> usize {
    (PI / 4.0 * (size as f64).sqrt()).floor() as usize
}

/// Outcome of one search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    /// Index with the highest probability after the final round
    pub found_index: usize,
    /// Index the oracle marked
    pub target_index: usize,
    /// Whether `found_index == target_index`
    pub success: bool,
    /// Wall-clock time spent in the engine
    pub execution_time_millis: u64,
    /// Number of amplitudes
    pub search_space_size: usize,
    /// Oracle/diffusion rounds performed
    pub iterations: usize,
    /// Engine that produced the result
    pub engine: EngineKind,
}

/// Search orchestrator.
///
/// Holds only the engine choice and size bound; every call to
/// [`execute`](Self::execute) allocates its own engine, so a `GroverSearch`
/// can be copied freely across threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroverSearch {
    engine: EngineKind,
    max_size: usize,
}

impl GroverSearch {
    /// Create an orchestrator using `engine` with the default size bound.
    pub fn new(engine: EngineKind) -> Self {
        Self::with_max_size(engine, DEFAULT_MAX_SIZE)
    }

    /// Create an orchestrator accepting at most `max_size` amplitudes.
    pub fn with_max_size(engine: EngineKind, max_size: usize) -> Self {
        Self { engine, max_size }
    }

    /// Configured engine kind.
    pub fn engine(&self) -> EngineKind {
        self.engine
    }

    /// Configured size bound.
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Run a full search for `target_index` in a space of `search_space_size`.
    ///
    /// The target is validated before the first round, so a space of size 1
    /// (zero rounds) still rejects an out-of-range target.
    pub fn execute(&self, search_space_size: i64, target_index: i64) -> Result<SearchResult> {
        let span = info_span!(
            "grover_search",
            engine = %self.engine,
            size = search_space_size,
            target = target_index
        );
        let _guard = span.enter();

        let start = Instant::now();

        let mut amplitudes = self.engine.create(self.max_size);
        amplitudes.initialize(search_space_size)?;
        let size = amplitudes.size();
        let target = validate_index(target_index, size)?;

        let iterations = iteration_count(size);
        for _ in 0..iterations {
            amplitudes.apply_oracle(target_index)?;
            amplitudes.apply_diffusion()?;
        }

        let found_index = amplitudes.find_max_amplitude_index()?;
        let execution_time_millis = start.elapsed().as_millis() as u64;

        debug!(
            found_index,
            iterations,
            elapsed_ms = execution_time_millis,
            "Search finished"
        );

        Ok(SearchResult {
            found_index,
            target_index: target,
            success: found_index == target,
            execution_time_millis,
            search_space_size: size,
            iterations,
            engine: self.engine,
        })
    }
}

impl Default for GroverSearch {
    fn default() -> Self {
        Self::new(EngineKind::default())
    }
}
