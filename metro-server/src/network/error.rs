//! Network and dataset error types.

use std::path::PathBuf;

use crate::domain::{InvalidName, LineName, StationName};

/// Errors raised while loading the dataset or querying the network.
///
/// Everything except `UnknownStation` is a startup configuration error.
#[derive(Debug, thiserror::Error)]
pub enum NetworkError {
    /// Dataset file could not be read
    #[error("failed to read dataset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Dataset is not valid JSON of the expected shape
    #[error("invalid dataset JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Dataset defines no lines at all
    #[error("dataset contains no lines")]
    EmptyDataset,

    /// A line has no stations
    #[error("line {0} has no stations")]
    EmptyLine(LineName),

    /// The same line name appears twice
    #[error("line {0} is defined more than once")]
    DuplicateLine(LineName),

    /// A line or station name failed validation
    #[error("invalid {what} name: {source}")]
    InvalidName {
        what: &'static str,
        #[source]
        source: InvalidName,
    },

    /// A coordinate is not finite or lies outside [0, 1]
    #[error("station {station} on line {line} has coordinate {coord:?} outside [0, 1]")]
    InvalidCoordinate {
        line: LineName,
        station: StationName,
        coord: [f64; 2],
    },

    /// A station is listed twice in a row on one line
    #[error("station {station} is repeated consecutively on line {line}")]
    RepeatedStation { line: LineName, station: StationName },

    /// Lookup of a station that is not in the network
    #[error("unknown station: {0}")]
    UnknownStation(StationName),
}
