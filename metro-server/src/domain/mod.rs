//! Domain types for the metro route planner.
//!
//! Names are validated at construction time, so code that receives a
//! `StationName` or `LineName` can trust it is a usable dataset key.

mod edge_kind;
mod name;

pub use edge_kind::EdgeKind;
pub use name::{InvalidName, LineName, StationName};
