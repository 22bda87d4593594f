//! Web layer for the metro route planner.
//!
//! Provides HTTP endpoints for the map page, station lookup and routing.

mod dto;
mod routes;
mod state;
pub mod templates;

pub use dto::*;
pub use routes::create_router;
pub use state::AppState;
pub use templates::*;
