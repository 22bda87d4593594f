//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::EdgeKind;
use crate::network::Network;
use crate::planner::{FinalAnswer, Step, TravelMode};

/// Request to plan a route.
///
/// Both fields are required; they are optional here so a missing field is
/// reported as a clear 400 rather than a JSON error.
#[derive(Debug, Deserialize)]
pub struct RouteRequest {
    /// Origin station name
    pub start: Option<String>,

    /// Destination station name
    pub end: Option<String>,
}

/// One step of a route.
#[derive(Debug, Serialize)]
pub struct StepResult {
    /// From station name
    pub from: String,

    /// To station name
    pub to: String,

    /// Minutes, rounded to 2 decimal places
    pub time: f64,

    /// ride, transfer or walk
    #[serde(rename = "type")]
    pub kind: EdgeKind,
}

/// Response for route planning.
#[derive(Debug, Serialize)]
pub struct RouteResponse {
    /// Steps in travel order
    pub steps: Vec<StepResult>,

    /// Total minutes. Named `distance` on the wire for the map page.
    #[serde(rename = "distance")]
    pub total_time: f64,

    /// Minutes to walk directly, for comparison
    pub walk_direct: f64,

    /// Whether the answer rides the network or walks
    pub mode: TravelMode,
}

/// Request to search stations by name.
#[derive(Debug, Deserialize)]
pub struct StationSearchRequest {
    /// Search query (substring of the station name)
    pub q: String,

    /// Maximum number of results
    pub limit: Option<usize>,
}

/// Response for station search.
#[derive(Debug, Serialize)]
pub struct StationSearchResponse {
    /// Matching station names, prefix matches first
    pub stations: Vec<String>,
}

/// A station on a line, with its map position.
#[derive(Debug, Serialize)]
pub struct LineStationResult {
    pub name: String,
    pub x: f64,
    pub y: f64,
}

/// A line for map drawing.
#[derive(Debug, Serialize)]
pub struct LineResult {
    pub name: String,
    pub color: Option<String>,
    pub stations: Vec<LineStationResult>,
}

/// Response listing every line.
#[derive(Debug, Serialize)]
pub struct LinesResponse {
    pub lines: Vec<LineResult>,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

// Conversion implementations

impl StepResult {
    /// Create from a planner step.
    pub fn from_step(step: &Step) -> Self {
        Self {
            from: step.from.to_string(),
            to: step.to.to_string(),
            time: step.time,
            kind: step.kind,
        }
    }
}

impl RouteResponse {
    /// Create from a final answer.
    pub fn from_answer(answer: &FinalAnswer) -> Self {
        Self {
            steps: answer.steps.iter().map(StepResult::from_step).collect(),
            total_time: answer.total_time,
            walk_direct: answer.direct_walk_time,
            mode: answer.mode,
        }
    }
}

impl LinesResponse {
    /// Create from the network, in dataset order.
    pub fn from_network(network: &Network) -> Self {
        let lines = network
            .lines()
            .iter()
            .map(|line| LineResult {
                name: line.name.to_string(),
                color: line.color.clone(),
                stations: line
                    .nodes
                    .iter()
                    .map(|&id| {
                        let node = network.node(id);
                        LineStationResult {
                            name: node.station.to_string(),
                            x: node.position.x,
                            y: node.position.y,
                        }
                    })
                    .collect(),
            })
            .collect();

        Self { lines }
    }
}
