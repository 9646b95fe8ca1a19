//! Cheapest pickup/dropoff pair insertion.
//!
//! Tries every pickup slot `p` in `0..=len` and every dropoff slot `d` in
//! `p+1..=len+1` of the grown sequence. Because `d > p` is built into the
//! search space, any route produced here keeps pickup-before-dropoff for
//! the inserted order and leaves the relative order of existing stops
//! untouched.
//!
//! O(L²) slot pairs, each costed in O(L) without materializing the
//! candidate route; only the winner is built.

use crate::haversine::Haversine;
use crate::model::{GeoPoint, Route, RouteNode};
use crate::traits::{DistanceModel, Id};

/// Winning insertion for one errand.
#[derive(Debug, Clone, PartialEq)]
pub struct Insertion<OrderId> {
    pub route: Route<OrderId>,
    /// Added distance over the current route, in kilometers.
    pub detour_km: f64,
    /// Index of the pickup stop in `route`.
    pub pickup_index: usize,
    /// Index of the dropoff stop in `route`.
    pub dropoff_index: usize,
}

pub fn best_insertion<OrderId: Id>(
    route: &Route<OrderId>,
    pickup: GeoPoint,
    dropoff: GeoPoint,
    driver_start: GeoPoint,
    order_id: &OrderId,
) -> Option<Insertion<OrderId>> {
    best_insertion_with(route, pickup, dropoff, driver_start, order_id, &Haversine)
}

/// Cheapest insertion under the given distance model.
///
/// The first minimal-detour slot pair in `(p, d)` lexicographic order wins.
/// Returns None only when no candidate has a finite length.
pub fn best_insertion_with<OrderId, M>(
    route: &Route<OrderId>,
    pickup: GeoPoint,
    dropoff: GeoPoint,
    driver_start: GeoPoint,
    order_id: &OrderId,
    model: &M,
) -> Option<Insertion<OrderId>>
where
    OrderId: Id,
    M: DistanceModel,
{
    let nodes = route.nodes();
    let len = nodes.len();
    let current = route.total_distance_km(driver_start, model);

    let mut best: Option<(usize, usize, f64)> = None;
    for p in 0..=len {
        for d in p + 1..=len + 1 {
            let candidate = spliced_distance(nodes, p, d, pickup, dropoff, driver_start, model);
            if !candidate.is_finite() {
                continue;
            }
            if best.is_none_or(|(_, _, best_km)| candidate < best_km) {
                best = Some((p, d, candidate));
            }
        }
    }

    let (p, d, distance) = best?;
    let mut grown = Vec::with_capacity(len + 2);
    grown.extend_from_slice(nodes);
    grown.insert(p, RouteNode::pickup(order_id.clone(), pickup));
    grown.insert(d, RouteNode::dropoff(order_id.clone(), dropoff));

    Some(Insertion {
        route: Route::from_nodes(grown),
        detour_km: distance - current,
        pickup_index: p,
        dropoff_index: d,
    })
}

/// Length of `nodes` with `pickup` at final index `p` and `dropoff` at
/// final index `d` (p < d), measured from `start`.
fn spliced_distance<OrderId, M: DistanceModel>(
    nodes: &[RouteNode<OrderId>],
    p: usize,
    d: usize,
    pickup: GeoPoint,
    dropoff: GeoPoint,
    start: GeoPoint,
    model: &M,
) -> f64 {
    debug_assert!(p < d && d <= nodes.len() + 1);

    let mut prev = start;
    let mut total = 0.0;
    let mut original = nodes.iter();
    for index in 0..nodes.len() + 2 {
        let here = if index == p {
            pickup
        } else if index == d {
            dropoff
        } else {
            match original.next() {
                Some(node) => node.location,
                None => break,
            }
        };
        total += model.distance_km(prev, here);
        prev = here;
    }
    total
}
