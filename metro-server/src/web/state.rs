//! Application state for the web layer.

use std::sync::Arc;

use crate::cache::RouteCache;
use crate::network::Network;
use crate::planner::{RouteConfig, RoutePlanner};

/// Shared application state.
///
/// The network and configuration are read-only after startup, so handlers
/// share them without locking.
#[derive(Clone)]
pub struct AppState {
    /// The transit network
    pub network: Arc<Network>,

    /// Route planner configuration
    pub config: Arc<RouteConfig>,

    /// Cached route answers
    pub cache: Arc<RouteCache>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(network: Network, config: RouteConfig, cache: RouteCache) -> Self {
        Self {
            network: Arc::new(network),
            config: Arc::new(config),
            cache: Arc::new(cache),
        }
    }

    /// A planner borrowing the shared network and configuration.
    pub fn planner(&self) -> RoutePlanner<'_> {
        RoutePlanner::new(&self.network, &self.config)
    }
}
