// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Amplitude vector trait definition.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{FenwickTreeAmplitude, SegmentTreeAmplitude};
use crate::error::AmplitudeError;

/// Default upper bound on the number of amplitudes an engine will allocate.
pub const DEFAULT_MAX_SIZE: usize = 1_000_000;

/// Backing structure used for an amplitude vector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineKind {
    /// Lazy range-affine segment tree
    #[default]
    SegmentTree,
    /// Fenwick (binary indexed) tree
    Fenwick,
}

impl EngineKind {
    /// All engine kinds, primary first.
    pub const ALL: [EngineKind; 2] = [EngineKind::SegmentTree, EngineKind::Fenwick];

    /// Allocate a fresh, uninitialized engine of this kind.
    ///
    /// Every search must obtain its own engine through this call; engines
    /// are stateful and never shared.
    pub fn create(self, max_size: usize) -> Box<dyn AmplitudeVector> {
        debug!(engine = %self, max_size, "Creating amplitude engine");
        match self {
            EngineKind::SegmentTree => Box::new(SegmentTreeAmplitude::with_max_size(max_size)),
            EngineKind::Fenwick => Box::new(FenwickTreeAmplitude::with_max_size(max_size)),
        }
    }
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineKind::SegmentTree => write!(f, "segment_tree"),
            EngineKind::Fenwick => write!(f, "fenwick"),
        }
    }
}

impl FromStr for EngineKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "segment_tree" | "segment" => Ok(EngineKind::SegmentTree),
            "fenwick" | "fenwick_tree" | "bit" => Ok(EngineKind::Fenwick),
            other => Err(format!(
                "unknown engine '{}' (expected segment_tree or fenwick)",
                other
            )),
        }
    }
}

/// The capability set every amplitude engine implements.
///
/// An engine starts uninitialized. `initialize` must succeed before any
/// other call; until then every operation returns
/// [`AmplitudeError::NotInitialized`]. Calling `initialize` again discards
/// the current state and starts over from the uniform superposition.
///
/// Sizes and indices are accepted as `i64` so that negative request values
/// reach the engine's own validation instead of wrapping.
pub trait AmplitudeVector: Send {
    /// Which backing structure this engine uses.
    fn kind(&self) -> EngineKind;

    /// Number of amplitudes, or 0 before `initialize`.
    fn size(&self) -> usize;

    /// Allocate `size` amplitudes, each set to 1/√size.
    fn initialize(&mut self, size: i64) -> Result<(), AmplitudeError>;

    /// Negate the amplitude at `target_index` (phase flip).
    fn apply_oracle(&mut self, target_index: i64) -> Result<(), AmplitudeError>;

    /// Replace every amplitude `v` with `2·mean − v`.
    fn apply_diffusion(&mut self) -> Result<(), AmplitudeError>;

    /// Amplitude at `index` with every pending transform applied.
    fn amplitude_at(&self, index: usize) -> Result<f64, AmplitudeError>;

    /// All amplitudes in index order with every pending transform applied.
    fn all_amplitudes(&self) -> Result<Vec<f64>, AmplitudeError>;

    /// Index of the largest squared amplitude.
    ///
    /// Ties go to the lowest index; see [`max_probability_index`].
    fn find_max_amplitude_index(&self) -> Result<usize, AmplitudeError> {
        let amplitudes = self.all_amplitudes()?;
        max_probability_index(&amplitudes).ok_or(AmplitudeError::NotInitialized)
    }

    /// Σaᵢ², which stays 1 (within rounding) for a normalized state.
    fn total_probability(&self) -> Result<f64, AmplitudeError> {
        Ok(self.all_amplitudes()?.iter().map(|a| a * a).sum())
    }

    /// Whether `initialize` has succeeded.
    fn is_initialized(&self) -> bool {
        self.size() > 0
    }
}

/// Index of the largest `a²` in `amplitudes`, lowest index on ties.
///
/// The sign of an amplitude carries no probability, so `-0.9` beats `0.5`.
/// Returns `None` for an empty slice.
pub fn max_probability_index(amplitudes: &[f64]) -> Option<usize> {
    let (first, rest) = amplitudes.split_first()?;
    let mut best_index = 0;
    let mut best_probability = first * first;
    for (offset, amplitude) in rest.iter().enumerate() {
        let probability = amplitude * amplitude;
        if probability > best_probability {
            best_probability = probability;
            best_index = offset + 1;
        }
    }
    Some(best_index)
}

/// Check a requested size against `[1, max]`.
pub(crate) fn validate_size(size: i64, max: usize) -> Result<usize, AmplitudeError> {
    usize::try_from(size)
        .ok()
        .filter(|&n| n > 0 && n <= max)
        .ok_or(AmplitudeError::InvalidSize { size, max })
}

/// Check an index against `[0, size)`.
pub(crate) fn validate_index(index: i64, size: usize) -> Result<usize, AmplitudeError> {
    usize::try_from(index)
        .ok()
        .filter(|&i| i < size)
        .ok_or(AmplitudeError::InvalidIndex { index, size })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_size() {
        assert_eq!(validate_size(1, 10), Ok(1));
        assert_eq!(validate_size(10, 10), Ok(10));
        assert_eq!(
            validate_size(0, 10),
            Err(AmplitudeError::InvalidSize { size: 0, max: 10 })
        );
        assert_eq!(
            validate_size(-1, 10),
            Err(AmplitudeError::InvalidSize { size: -1, max: 10 })
        );
        assert_eq!(
            validate_size(11, 10),
            Err(AmplitudeError::InvalidSize { size: 11, max: 10 })
        );
    }

    #[test]
    fn test_validate_index() {
        assert_eq!(validate_index(0, 4), Ok(0));
        assert_eq!(validate_index(3, 4), Ok(3));
        assert_eq!(
            validate_index(4, 4),
            Err(AmplitudeError::InvalidIndex { index: 4, size: 4 })
        );
        assert_eq!(
            validate_index(-1, 4),
            Err(AmplitudeError::InvalidIndex { index: -1, size: 4 })
        );
    }

    #[test]
    fn test_max_probability_index_uses_square() {
        assert_eq!(max_probability_index(&[0.5, -0.9, 0.1]), Some(1));
    }

    #[test]
    fn test_max_probability_index_ties_pick_lowest() {
        assert_eq!(max_probability_index(&[0.5, 0.5, 0.5]), Some(0));
        assert_eq!(max_probability_index(&[0.1, -0.7, 0.7]), Some(1));
    }

    #[test]
    fn test_max_probability_index_empty() {
        assert_eq!(max_probability_index(&[]), None);
    }

    #[test]
    fn test_engine_kind_parse() {
        assert_eq!("segment_tree".parse::<EngineKind>(), Ok(EngineKind::SegmentTree));
        assert_eq!("Segment-Tree".parse::<EngineKind>(), Ok(EngineKind::SegmentTree));
        assert_eq!("fenwick".parse::<EngineKind>(), Ok(EngineKind::Fenwick));
        assert_eq!("BIT".parse::<EngineKind>(), Ok(EngineKind::Fenwick));
        assert!("heap".parse::<EngineKind>().is_err());
    }

    #[test]
    fn test_engine_kind_display_round_trips() {
        for kind in EngineKind::ALL {
            assert_eq!(kind.to_string().parse::<EngineKind>(), Ok(kind));
        }
    }

    #[test]
    fn test_engine_kind_default_is_segment_tree() {
        assert_eq!(EngineKind::default(), EngineKind::SegmentTree);
    }

    #[test]
    fn test_create_returns_fresh_uninitialized_engine() {
        for kind in EngineKind::ALL {
            let engine = kind.create(16);
            assert_eq!(engine.kind(), kind);
            assert!(!engine.is_initialized());
            assert_eq!(engine.size(), 0);
        }
    }

    #[test]
    fn test_create_honors_max_size() {
        for kind in EngineKind::ALL {
            let mut engine = kind.create(8);
            assert!(engine.initialize(8).is_ok());
            assert_eq!(
                engine.initialize(9),
                Err(AmplitudeError::InvalidSize { size: 9, max: 8 })
            );
        }
    }

    #[test]
    fn test_engine_kind_serde() {
        let json = serde_json::to_string(&EngineKind::Fenwick).unwrap();
        assert_eq!(json, "\"fenwick\"");
        let kind: EngineKind = serde_yaml::from_str("segment_tree").unwrap();
        assert_eq!(kind, EngineKind::SegmentTree);
    }
}
