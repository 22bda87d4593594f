//! Route search configuration.

use std::fmt;
use std::str::FromStr;

use tracing::{info, warn};

use crate::config::{ConfigError, parse_var};
use crate::network::{Network, NetworkParams};

/// How the shortest-path search orders its frontier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchMode {
    /// Best-first search guided by straight-line walking time.
    #[default]
    AStar,
    /// Uninformed search (zero heuristic). Always optimal.
    Exact,
}

impl FromStr for SearchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "astar" | "a*" => Ok(SearchMode::AStar),
            "exact" | "dijkstra" => Ok(SearchMode::Exact),
            other => Err(format!("expected astar or exact, got {other}")),
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchMode::AStar => f.write_str("astar"),
            SearchMode::Exact => f.write_str("exact"),
        }
    }
}

/// Constants used to build the network and answer route queries.
///
/// All times are in minutes; `walk_speed` is in map pixels per minute.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteConfig {
    /// Width of the map image the coordinates are normalized against.
    pub image_width: f64,

    /// Height of the map image the coordinates are normalized against.
    pub image_height: f64,

    /// Walking speed (pixels per minute).
    pub walk_speed: f64,

    /// Time to enter the network at the origin.
    pub board_time: f64,

    /// Time between consecutive stations on a line.
    pub ride_time: f64,

    /// Time to change lines at a station.
    pub transfer_time: f64,

    /// Search strategy.
    pub search_mode: SearchMode,
}

impl RouteConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(
        image_width: f64,
        image_height: f64,
        walk_speed: f64,
        board_time: f64,
        ride_time: f64,
        transfer_time: f64,
    ) -> Self {
        Self {
            image_width,
            image_height,
            walk_speed,
            board_time,
            ride_time,
            transfer_time,
            search_mode: SearchMode::default(),
        }
    }

    /// Returns a copy using the given search mode.
    pub fn with_search_mode(mut self, search_mode: SearchMode) -> Self {
        self.search_mode = search_mode;
        self
    }

    /// Parameters for building the base network.
    pub fn network_params(&self) -> NetworkParams {
        NetworkParams {
            image_width: self.image_width,
            image_height: self.image_height,
            ride_time: self.ride_time,
            transfer_time: self.transfer_time,
        }
    }

    /// Check that every constant is finite and strictly positive.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let checks = [
            ("METRO_IMAGE_WIDTH", self.image_width),
            ("METRO_IMAGE_HEIGHT", self.image_height),
            ("METRO_WALK_SPEED", self.walk_speed),
            ("METRO_BOARD_TIME", self.board_time),
            ("METRO_RIDE_TIME", self.ride_time),
            ("METRO_TRANSFER_TIME", self.transfer_time),
        ];

        for (name, value) in checks {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NonPositive { name, value });
            }
        }
        Ok(())
    }

    /// Build from a variable lookup, falling back to defaults, and validate.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let config = Self {
            image_width: parse_var(&lookup, "METRO_IMAGE_WIDTH")?.unwrap_or(defaults.image_width),
            image_height: parse_var(&lookup, "METRO_IMAGE_HEIGHT")?
                .unwrap_or(defaults.image_height),
            walk_speed: parse_var(&lookup, "METRO_WALK_SPEED")?.unwrap_or(defaults.walk_speed),
            board_time: parse_var(&lookup, "METRO_BOARD_TIME")?.unwrap_or(defaults.board_time),
            ride_time: parse_var(&lookup, "METRO_RIDE_TIME")?.unwrap_or(defaults.ride_time),
            transfer_time: parse_var(&lookup, "METRO_TRANSFER_TIME")?
                .unwrap_or(defaults.transfer_time),
            search_mode: parse_var(&lookup, "METRO_SEARCH_MODE")?
                .unwrap_or(defaults.search_mode),
        };
        config.validate()?;
        Ok(config)
    }

    /// Build from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Settle the search mode against a built network.
    ///
    /// A* is only kept when the walking estimate never exceeds a base edge
    /// and every station's nodes share one position; otherwise the search
    /// falls back to [`SearchMode::Exact`].
    pub fn for_network(mut self, network: &Network) -> Self {
        if self.search_mode != SearchMode::AStar {
            return self;
        }

        let check = network.heuristic_check(self.walk_speed);
        if check.is_consistent() {
            info!(walk_speed = self.walk_speed, "walking heuristic is admissible");
        } else {
            warn!(
                violations = check.violations.len(),
                worst_excess = check.worst_excess,
                split_stations = check.split_stations.len(),
                "walking heuristic overestimates some edges, using exact search"
            );
            self.search_mode = SearchMode::Exact;
        }
        self
    }
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            image_width: 396.0,
            image_height: 443.0,
            walk_speed: 20.0,
            board_time: 2.0,
            ride_time: 2.0,
            transfer_time: 5.0,
            search_mode: SearchMode::AStar,
        }
    }
}
