//! errand-batcher core
//!
//! Groups pickup/dropoff errands into driver batches and sequences their
//! stops into drivable routes.

pub mod traits;
pub mod error;
pub mod model;
pub mod haversine;
pub mod sequencer;
pub mod insertion;
pub mod pool;
pub mod assembler;
pub mod solver;
pub mod polyline;

pub use error::{PlanError, Result};
pub use model::{Batch, BatchStatus, Driver, GeoPoint, Order, Route, RouteNode, StopKind};
pub use solver::{cluster_orders, plan, BatchOptions, PlannerResult, UnassignedOrder, UnassignedReason};
pub use traits::{Courier, DistanceModel, DriverStatus, Errand};
