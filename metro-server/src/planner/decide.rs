//! Transit versus direct walking.

use serde::Serialize;
use tracing::debug;

use crate::domain::{EdgeKind, StationName};
use crate::geometry::{self, round2};

use super::search::{PathResult, RoutePlanner, SearchError, SearchRequest, Step};

/// Which way the final answer travels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TravelMode {
    Transit,
    Walk,
}

/// The answer returned to callers.
#[derive(Debug, Clone, PartialEq)]
pub struct FinalAnswer {
    pub steps: Vec<Step>,

    /// Total minutes for the chosen mode.
    pub total_time: f64,

    /// Minutes to walk straight from origin to destination.
    pub direct_walk_time: f64,

    pub mode: TravelMode,
}

impl FinalAnswer {
    pub fn is_walk(&self) -> bool {
        self.mode == TravelMode::Walk
    }
}

impl RoutePlanner<'_> {
    /// Straight-line walking time between two stations' canonical positions,
    /// rounded to 2 decimal places.
    pub fn direct_walk_time(
        &self,
        origin: &StationName,
        destination: &StationName,
    ) -> Result<f64, SearchError> {
        let network = self.network();
        let from = network
            .station_position(origin)
            .map_err(|_| SearchError::UnknownStation(origin.clone()))?;
        let to = network
            .station_position(destination)
            .map_err(|_| SearchError::UnknownStation(destination.clone()))?;
        Ok(round2(geometry::walk_time(from, to, self.config().walk_speed)))
    }

    /// Replace a transit path with a single walking step when walking is
    /// strictly faster. Equal times keep transit.
    pub fn decide(
        &self,
        origin: &StationName,
        destination: &StationName,
        path: PathResult,
    ) -> Result<FinalAnswer, SearchError> {
        let direct_walk_time = self.direct_walk_time(origin, destination)?;

        if direct_walk_time < path.total_time {
            debug!(
                %origin,
                %destination,
                walk = direct_walk_time,
                transit = path.total_time,
                "walking beats transit"
            );
            return Ok(FinalAnswer {
                steps: vec![Step {
                    from: origin.clone(),
                    to: destination.clone(),
                    time: direct_walk_time,
                    kind: EdgeKind::Walk,
                }],
                total_time: direct_walk_time,
                direct_walk_time,
                mode: TravelMode::Walk,
            });
        }

        Ok(FinalAnswer {
            steps: path.steps,
            total_time: path.total_time,
            direct_walk_time,
            mode: TravelMode::Transit,
        })
    }

    /// Search, then choose between the transit path and walking.
    pub fn plan(&self, request: &SearchRequest) -> Result<FinalAnswer, SearchError> {
        let path = self.find_path(request)?;
        self.decide(&request.origin, &request.destination, path)
    }
}
