// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! QubitOS Grover Search
//!
//! Classical simulation of Grover's amplitude amplification over a real
//! valued state vector. The amplitude vector lives in a lazy range-affine
//! segment tree, so both the oracle and the diffusion step run in O(log N)
//! instead of the O(N) of a plain array scan.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │            REST Server (axum)            │
//! ├─────────────────────────────────────────┤
//! │        Validation  →  GroverSearch       │
//! ├────────────────────┬────────────────────┤
//! │  SegmentTree       │  FenwickTree       │
//! │  O(log N) diffuse  │  O(N log N) diffuse│
//! └────────────────────┴────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`amplitude`]: Amplitude vector trait and engines
//! - [`search`]: Search orchestration
//! - [`server`]: REST server implementation
//! - [`config`]: Configuration management
//! - [`validation`]: Input validation utilities
//! - [`error`]: Error types
//!
//! # Example
//!
//! ```
//! use qubit_os_grover::amplitude::EngineKind;
//! use qubit_os_grover::search::GroverSearch;
//!
//! let result = GroverSearch::new(EngineKind::SegmentTree)
//!     .execute(1024, 512)
//!     .unwrap();
//! assert!(result.success);
//! assert_eq!(result.iterations, 25);
//! ```

pub mod amplitude;
pub mod config;
pub mod error;
pub mod search;
pub mod server;
pub mod validation;

pub use config::Config;
pub use error::{Error, Result};

#[cfg(test)]
pub mod test_utils;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
