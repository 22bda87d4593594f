//! Edge kind tags.

use std::fmt;

use serde::Serialize;

/// What a network edge (or a reported step) represents.
///
/// `Board` and `Alight` name the virtual hops between a query's entry/exit
/// and the network. They are never stored on base edges and never reported
/// as steps; they exist so the full vocabulary has one serialized form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// Travel between consecutive stations on one line.
    Ride,
    /// Change between two lines at the same station.
    Transfer,
    /// Entering the network at the origin station (query overlay only).
    Board,
    /// Leaving the network at the destination station (query overlay only).
    Alight,
    /// Walking directly from origin to destination, bypassing the network.
    Walk,
}

impl EdgeKind {
    /// Stable lowercase label, matching the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeKind::Ride => "ride",
            EdgeKind::Transfer => "transfer",
            EdgeKind::Board => "board",
            EdgeKind::Alight => "alight",
            EdgeKind::Walk => "walk",
        }
    }
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
