// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Search server implementation.
//!
//! Exposes the Grover search orchestrator over a REST (axum) API.
//!
//! # Usage
//!
//! ```ignore
//! use qubit_os_grover::config::Config;
//! use qubit_os_grover::server;
//!
//! let config = Config::load(None)?;
//! server::run_server(&config.server, config.search()).await?;
//! ```

pub mod rest;

pub use rest::RestServer;

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Semaphore};
use tracing::{info, warn};

use crate::config::ServerConfig;
use crate::error::Result;
use crate::search::GroverSearch;

/// Shared state for the server.
pub struct ServerState {
    /// Search orchestrator; allocates a fresh engine per request
    pub search: GroverSearch,

    /// Permits for searches running at once; each holds one engine in memory
    pub search_permits: Arc<Semaphore>,

    /// Shutdown signal sender
    shutdown_tx: watch::Sender<bool>,

    /// Shutdown signal receiver
    shutdown_rx: watch::Receiver<bool>,
}

impl ServerState {
    /// Create new server state running at most `max_concurrent_searches`
    /// searches at a time.
    pub fn new(search: GroverSearch, max_concurrent_searches: usize) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        Self {
            search,
            search_permits: Arc::new(Semaphore::new(max_concurrent_searches)),
            shutdown_tx,
            shutdown_rx,
        }
    }

    /// Get a shutdown receiver.
    pub fn shutdown_receiver(&self) -> watch::Receiver<bool> {
        self.shutdown_rx.clone()
    }

    /// Signal shutdown.
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(true);
    }
}

/// Run the REST server until Ctrl-C, then drain within the shutdown timeout.
pub async fn run_server(config: &ServerConfig, search: GroverSearch) -> Result<()> {
    let state = Arc::new(ServerState::new(search, config.max_concurrent_searches));
    let rest_server = RestServer::new(state.clone());

    info!(
        port = config.port,
        engine = %search.engine(),
        max_search_space_size = search.max_size(),
        max_concurrent_searches = config.max_concurrent_searches,
        "Starting search server"
    );

    // Set up signal handler for graceful shutdown
    let state_for_signal = state.clone();
    tokio::spawn(async move {
        if let Ok(()) = tokio::signal::ctrl_c().await {
            info!("Received shutdown signal, initiating graceful shutdown");
            state_for_signal.shutdown();
        }
    });

    let mut shutdown_rx = state.shutdown_receiver();
    let serve = rest_server.serve(config);
    tokio::pin!(serve);

    tokio::select! {
        result = &mut serve => return result,
        _ = shutdown_rx.changed() => {}
    }

    let shutdown_timeout = Duration::from_secs(config.shutdown_timeout_sec);
    info!(timeout_secs = config.shutdown_timeout_sec, "Waiting for shutdown to complete");

    match tokio::time::timeout(shutdown_timeout, serve).await {
        Ok(result) => result,
        Err(_) => {
            warn!(
                timeout_secs = config.shutdown_timeout_sec,
                "Graceful shutdown timed out, dropping in-flight requests"
            );
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shutdown_signal() {
        let state = ServerState::new(GroverSearch::default(), 1);
        let rx = state.shutdown_receiver();
        assert!(!*rx.borrow());

        state.shutdown();
        assert!(*rx.borrow());
        assert!(rx.has_changed().unwrap());
    }

    #[test]
    fn test_search_permits_match_config() {
        let state = ServerState::new(GroverSearch::default(), 3);
        assert_eq!(state.search_permits.available_permits(), 3);
    }
}
