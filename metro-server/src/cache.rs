//! Caching layer for route answers.
//!
//! The network never changes after startup, so an answer for a given
//! (origin, destination) pair stays valid for the life of the process. The
//! TTL and capacity only bound memory use. Failed searches are not cached.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;
use tracing::debug;

use crate::domain::StationName;
use crate::planner::{FinalAnswer, RoutePlanner, SearchError, SearchRequest};

/// Cache key: (origin, destination).
type RouteKey = (StationName, StationName);

/// Configuration for the cache.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(600),
            max_capacity: 10_000,
        }
    }
}

/// Cache for route answers.
pub struct RouteCache {
    routes: MokaCache<RouteKey, Arc<FinalAnswer>>,
}

impl RouteCache {
    /// Create a new cache with the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let routes = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { routes }
    }

    /// Get a cached answer.
    pub async fn get(&self, request: &SearchRequest) -> Option<Arc<FinalAnswer>> {
        self.routes
            .get(&(request.origin.clone(), request.destination.clone()))
            .await
    }

    /// Insert an answer into the cache.
    pub async fn insert(&self, request: &SearchRequest, answer: Arc<FinalAnswer>) {
        self.routes
            .insert(
                (request.origin.clone(), request.destination.clone()),
                answer,
            )
            .await;
    }

    /// Plan a route, using the cache if available.
    pub async fn plan(
        &self,
        planner: &RoutePlanner<'_>,
        request: &SearchRequest,
    ) -> Result<Arc<FinalAnswer>, SearchError> {
        if let Some(cached) = self.get(request).await {
            return Ok(cached);
        }

        let answer = Arc::new(planner.plan(request)?);
        self.insert(request, answer.clone()).await;
        debug!(
            origin = %request.origin,
            destination = %request.destination,
            entries = self.routes.entry_count(),
            "cached route"
        );
        Ok(answer)
    }

    /// Invalidate all cached entries.
    pub fn invalidate_all(&self) {
        self.routes.invalidate_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::{LineDefinitions, Network};
    use crate::planner::RouteConfig;

    fn station(s: &str) -> StationName {
        StationName::parse(s).unwrap()
    }

    fn network(config: &RouteConfig) -> Network {
        let defs = LineDefinitions::from_json_str(
            r#"{ "L1": { "stations": { "A": [0.0, 0.0], "B": [0.5, 0.5], "C": [1.0, 1.0] } } }"#,
        )
        .unwrap();
        Network::build(&defs, &config.network_params())
    }

    #[test]
    fn default_config() {
        let config = CacheConfig::default();
        assert_eq!(config.ttl, Duration::from_secs(600));
        assert_eq!(config.max_capacity, 10_000);
    }

    #[tokio::test]
    async fn caches_successful_answers() {
        let config = RouteConfig::default();
        let network = network(&config);
        let planner = RoutePlanner::new(&network, &config);
        let cache = RouteCache::new(&CacheConfig::default());
        let request = SearchRequest::new(station("A"), station("C"));

        assert!(cache.get(&request).await.is_none());

        let first = cache.plan(&planner, &request).await.unwrap();
        let second = cache.plan(&planner, &request).await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(*first, planner.plan(&request).unwrap());
    }

    #[tokio::test]
    async fn direction_is_part_of_the_key() {
        let config = RouteConfig::default();
        let network = network(&config);
        let planner = RoutePlanner::new(&network, &config);
        let cache = RouteCache::new(&CacheConfig::default());

        let forward = SearchRequest::new(station("A"), station("C"));
        let backward = SearchRequest::new(station("C"), station("A"));
        cache.plan(&planner, &forward).await.unwrap();

        assert!(cache.get(&forward).await.is_some());
        assert!(cache.get(&backward).await.is_none());
    }

    #[tokio::test]
    async fn errors_are_not_cached() {
        let config = RouteConfig::default();
        let network = network(&config);
        let planner = RoutePlanner::new(&network, &config);
        let cache = RouteCache::new(&CacheConfig::default());
        let request = SearchRequest::new(station("A"), station("Nowhere"));

        assert!(cache.plan(&planner, &request).await.is_err());
        assert!(cache.get(&request).await.is_none());
    }

    #[tokio::test]
    async fn invalidate_clears_entries() {
        let config = RouteConfig::default();
        let network = network(&config);
        let planner = RoutePlanner::new(&network, &config);
        let cache = RouteCache::new(&CacheConfig::default());
        let request = SearchRequest::new(station("A"), station("B"));

        cache.plan(&planner, &request).await.unwrap();
        cache.invalidate_all();
        assert!(cache.get(&request).await.is_none());
    }
}
