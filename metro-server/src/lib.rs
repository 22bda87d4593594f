//! Metro route planner server.
//!
//! A web application that answers: "what is the quickest way from this
//! station to that one, and would it be faster to just walk?"

pub mod cache;
pub mod config;
pub mod domain;
pub mod geometry;
pub mod network;
pub mod planner;
pub mod web;
