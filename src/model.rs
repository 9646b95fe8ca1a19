//! Value types flowing through the engine: points, stops, routes, batches,
//! plus ready-made order and driver records.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{PlanError, Result};
use crate::polyline::Polyline;
use crate::traits::{Courier, DistanceModel, DriverStatus, Errand, Id};

/// WGS84 coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

impl From<(f64, f64)> for GeoPoint {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self { lat, lng }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopKind {
    Pickup,
    Dropoff,
}

/// A single stop in a route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteNode<OrderId> {
    pub location: GeoPoint,
    pub kind: StopKind,
    pub order_id: OrderId,
    /// Distance from the previous stop (or the route start), once annotated.
    pub leg_km: Option<f64>,
}

impl<OrderId> RouteNode<OrderId> {
    pub fn pickup(order_id: OrderId, location: GeoPoint) -> Self {
        Self {
            location,
            kind: StopKind::Pickup,
            order_id,
            leg_km: None,
        }
    }

    pub fn dropoff(order_id: OrderId, location: GeoPoint) -> Self {
        Self {
            location,
            kind: StopKind::Dropoff,
            order_id,
            leg_km: None,
        }
    }
}

/// Ordered stop sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Route<OrderId> {
    nodes: Vec<RouteNode<OrderId>>,
}

impl<OrderId> Default for Route<OrderId> {
    fn default() -> Self {
        Self { nodes: Vec::new() }
    }
}

impl<OrderId: Id> Route<OrderId> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_nodes(nodes: Vec<RouteNode<OrderId>>) -> Self {
        Self { nodes }
    }

    /// Two-stop route for a single errand.
    pub fn seeded(order_id: OrderId, pickup: GeoPoint, dropoff: GeoPoint) -> Self {
        Self {
            nodes: vec![
                RouteNode::pickup(order_id.clone(), pickup),
                RouteNode::dropoff(order_id, dropoff),
            ],
        }
    }

    pub fn nodes(&self) -> &[RouteNode<OrderId>] {
        &self.nodes
    }

    pub fn into_nodes(self) -> Vec<RouteNode<OrderId>> {
        self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub(crate) fn push(&mut self, node: RouteNode<OrderId>) {
        self.nodes.push(node);
    }

    /// Index of the given stop for an order.
    pub fn position_of(&self, order_id: &OrderId, kind: StopKind) -> Option<usize> {
        self.nodes
            .iter()
            .position(|node| node.kind == kind && &node.order_id == order_id)
    }

    /// Sum of consecutive legs, starting with `start` -> first stop.
    pub fn total_distance_km<M: DistanceModel>(&self, start: GeoPoint, model: &M) -> f64 {
        let mut prev = start;
        let mut total = 0.0;
        for node in &self.nodes {
            total += model.distance_km(prev, node.location);
            prev = node.location;
        }
        total
    }

    /// Fill in `leg_km` on every node and return the total.
    pub fn annotate<M: DistanceModel>(&mut self, start: GeoPoint, model: &M) -> f64 {
        let mut prev = start;
        let mut total = 0.0;
        for node in &mut self.nodes {
            let leg = model.distance_km(prev, node.location);
            node.leg_km = Some(leg);
            total += leg;
            prev = node.location;
        }
        total
    }

    /// Every order must have exactly one pickup, exactly one dropoff, and
    /// the pickup must come first.
    pub fn check_precedence(&self) -> Result<()> {
        let mut seen: HashMap<&OrderId, (Option<usize>, Option<usize>)> = HashMap::new();
        let mut first_seen: Vec<&OrderId> = Vec::new();

        for (index, node) in self.nodes.iter().enumerate() {
            let entry = seen.entry(&node.order_id).or_insert_with(|| {
                first_seen.push(&node.order_id);
                (None, None)
            });
            let slot = match node.kind {
                StopKind::Pickup => &mut entry.0,
                StopKind::Dropoff => &mut entry.1,
            };
            if slot.is_some() {
                return Err(violation(&node.order_id, format!("duplicate {:?} stop", node.kind)));
            }
            *slot = Some(index);
        }

        for order_id in first_seen {
            match seen[order_id] {
                (Some(pickup), Some(dropoff)) if pickup < dropoff => {}
                (Some(pickup), Some(dropoff)) => {
                    return Err(violation(
                        order_id,
                        format!("dropoff at {dropoff} precedes pickup at {pickup}"),
                    ));
                }
                (None, _) => return Err(violation(order_id, "missing pickup stop".into())),
                (_, None) => return Err(violation(order_id, "missing dropoff stop".into())),
            }
        }

        Ok(())
    }

    /// Stop coordinates in travel order, for mapping/directions services.
    pub fn waypoints(&self) -> Polyline {
        Polyline::new(self.nodes.iter().map(|node| node.location).collect())
    }
}

fn violation<OrderId: Id>(order_id: &OrderId, reason: String) -> PlanError {
    PlanError::InvariantViolation {
        order_id: format!("{order_id:?}"),
        reason,
    }
}

/// Lifecycle of a batch. The engine only ever creates `Assigned`; the
/// other transitions belong to order fulfillment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchStatus {
    #[default]
    Assigned,
    PickedUp,
    Delivered,
    Cancelled,
}

/// Orders grouped for one driver, with their stop sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Batch<DriverId, OrderId> {
    pub driver_id: DriverId,
    pub driver_name: String,
    /// In acceptance order: seed first, then each accepted insertion.
    pub order_ids: Vec<OrderId>,
    pub route: Route<OrderId>,
    /// Includes the leg from the driver's position to the first stop.
    pub total_distance_km: f64,
    pub status: BatchStatus,
}

impl<DriverId, OrderId: Id> Batch<DriverId, OrderId> {
    pub fn len(&self) -> usize {
        self.order_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order_ids.is_empty()
    }

    pub fn contains(&self, order_id: &OrderId) -> bool {
        self.order_ids.contains(order_id)
    }
}

/// Stock order record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    /// Explicit pickup point; falls back to `store_location`.
    pub pickup: Option<GeoPoint>,
    pub store_location: Option<GeoPoint>,
    pub dropoff: Option<GeoPoint>,
    pub driver_id: Option<String>,
}

impl Order {
    pub fn new(id: impl Into<String>, pickup: GeoPoint, dropoff: GeoPoint) -> Self {
        Self {
            id: id.into(),
            pickup: Some(pickup),
            store_location: None,
            dropoff: Some(dropoff),
            driver_id: None,
        }
    }
}

impl Errand for Order {
    type Id = String;
    type DriverId = String;

    fn id(&self) -> &String {
        &self.id
    }

    fn pickup(&self) -> Option<GeoPoint> {
        self.pickup
            .filter(GeoPoint::is_finite)
            .or(self.store_location.filter(GeoPoint::is_finite))
    }

    fn dropoff(&self) -> Option<GeoPoint> {
        self.dropoff.filter(GeoPoint::is_finite)
    }

    fn assigned_driver(&self) -> Option<&String> {
        self.driver_id.as_ref()
    }
}

/// Stock driver record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Driver {
    pub id: String,
    pub name: String,
    pub location: GeoPoint,
    pub status: DriverStatus,
}

impl Driver {
    pub fn available(id: impl Into<String>, name: impl Into<String>, location: GeoPoint) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            location,
            status: DriverStatus::Available,
        }
    }
}

impl Courier for Driver {
    type Id = String;

    fn id(&self) -> &String {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn location(&self) -> GeoPoint {
        self.location
    }

    fn status(&self) -> DriverStatus {
        self.status
    }
}
