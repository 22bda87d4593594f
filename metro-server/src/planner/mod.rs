//! Route planner using A* search.
//!
//! This module answers: "what is the fastest way from this station to that
//! one, and is it faster to just walk?"
//!
//! The search runs over the shared network with virtual entry and exit
//! vertices attached per query, then the result is compared against a
//! straight-line walking estimate.

mod config;
mod decide;
mod search;


pub use config::{RouteConfig, SearchMode};
pub use decide::{FinalAnswer, TravelMode};
pub use search::{PathResult, RoutePlanner, SearchError, SearchRequest, Step};
