// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Shared test utilities for engine tests.

use approx::assert_relative_eq;

/// Tolerance used for amplitude comparisons.
pub const TOLERANCE: f64 = 1e-9;

/// Assert two amplitude vectors match element-wise within [`TOLERANCE`].
#[track_caller]
pub fn assert_amplitudes_eq(actual: &[f64], expected: &[f64]) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "amplitude vector length mismatch"
    );
    for (a, e) in actual.iter().zip(expected) {
        assert_relative_eq!(*a, *e, epsilon = TOLERANCE);
    }
}
