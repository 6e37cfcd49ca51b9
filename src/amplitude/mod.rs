// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Amplitude engines for classical Grover amplitude amplification.
//!
//! This module provides the [`AmplitudeVector`] trait and its two backing
//! structures:
//!
//! - [`SegmentTreeAmplitude`]: lazy range-affine segment tree. Oracle and
//!   diffusion are both O(log N).
//! - [`FenwickTreeAmplitude`]: prefix-sum tree over the raw amplitudes. Oracle
//!   is O(log N), diffusion is O(N log N).
//!
//! Engines are selected through [`EngineKind`], which doubles as the factory
//! handing out a fresh, unshared engine for every search.
//!
//! # Complexity
//!
//! | Operation                    | Segment tree | Fenwick    |
//! |------------------------------|--------------|------------|
//! | `initialize`                 | O(N)         | O(N)       |
//! | `apply_oracle`               | O(log N)     | O(log N)   |
//! | `apply_diffusion`            | O(log N)     | O(N log N) |
//! | `find_max_amplitude_index`   | O(N)         | O(N)       |

pub mod fenwick;
pub mod segment_tree;
pub mod r#trait;

pub use fenwick::FenwickTreeAmplitude;
pub use r#trait::{max_probability_index, AmplitudeVector, EngineKind, DEFAULT_MAX_SIZE};
pub use segment_tree::{AffineTag, SegmentTreeAmplitude};
