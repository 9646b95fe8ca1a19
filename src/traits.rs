//! Core domain traits for the batching engine.
//!
//! These are intentionally minimal. Host applications implement them for
//! their own order and driver records; `model::Order` and `model::Driver`
//! are ready-made implementations.

use std::fmt::Debug;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use crate::model::GeoPoint;

/// Unique identifier for planner entities.
pub trait Id: Clone + Eq + Hash + Debug {}

impl<T> Id for T where T: Clone + Eq + Hash + Debug {}

/// An errand: one pickup followed by one dropoff.
pub trait Errand {
    type Id: Id;
    type DriverId: Id;

    fn id(&self) -> &Self::Id;

    /// Resolved pickup point. Implementations fall back to the store or
    /// business location when no explicit pickup is recorded.
    fn pickup(&self) -> Option<GeoPoint>;

    /// Delivery (customer) point.
    fn dropoff(&self) -> Option<GeoPoint>;

    /// Driver this errand is already assigned to, if any.
    fn assigned_driver(&self) -> Option<&Self::DriverId>;

    /// Both endpoints, or None if the errand cannot be batched.
    fn endpoints(&self) -> Option<(GeoPoint, GeoPoint)> {
        Some((self.pickup()?, self.dropoff()?))
    }
}

/// The driver that carries out batches.
pub trait Courier {
    type Id: Id;

    fn id(&self) -> &Self::Id;

    fn name(&self) -> &str;

    /// Current position; the head of every route built for this driver.
    fn location(&self) -> GeoPoint;

    fn status(&self) -> DriverStatus;
}

/// Driver capability, checked by a single discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriverStatus {
    /// May accept new work.
    Available,
    /// On shift but not accepting more work this session.
    Busy,
    Offline,
}

impl DriverStatus {
    pub fn is_available(self) -> bool {
        matches!(self, DriverStatus::Available)
    }
}

/// Travel cost between two points, in kilometers.
pub trait DistanceModel {
    fn distance_km(&self, from: GeoPoint, to: GeoPoint) -> f64;
}

impl<M: DistanceModel + ?Sized> DistanceModel for &M {
    fn distance_km(&self, from: GeoPoint, to: GeoPoint) -> f64 {
        (**self).distance_km(from, to)
    }
}
