//! Test fixtures for errand-batcher.
//!
//! Provides realistic test data:
//! - Raleigh / Durham area locations
//! - Builders for orders and drivers

pub mod raleigh_locations;

pub use raleigh_locations::*;
