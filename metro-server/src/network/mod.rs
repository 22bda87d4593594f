//! Transit network model.
//!
//! The network is built once from the line dataset and is read-only for
//! the rest of the process. Every (station, line) pair becomes a node;
//! consecutive stations on a line are joined by ride edges and the nodes of
//! a multi-line station are pairwise joined by transfer edges.

mod dataset;
mod error;
mod graph;

pub use dataset::{LineDefinition, LineDefinitions, StationEntry};
pub use error::NetworkError;
pub use graph::{Edge, EdgeId, HeuristicCheck, Line, Network, NetworkParams, Node, NodeId};
