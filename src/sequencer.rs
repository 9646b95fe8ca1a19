//! Nearest-neighbor stop sequencing.
//!
//! Standalone utility for ordering the stops of an already-fixed set of
//! errands when no detour limit applies. Every pickup is visited before
//! any dropoff, which is coarser than per-order precedence but always
//! satisfies it.
//!
//! O(n²) point selections for n stops.

use crate::haversine::Haversine;
use crate::model::{GeoPoint, Route, RouteNode};
use crate::traits::{DistanceModel, Errand};

/// Sequence errands by great-circle nearest neighbor.
pub fn sequence<E: Errand>(
    errands: &[E],
    driver_start: GeoPoint,
    explicit_start: Option<GeoPoint>,
) -> Route<E::Id> {
    sequence_with(errands, driver_start, explicit_start, &Haversine)
}

/// Sequence errands using the given distance model.
///
/// The walk starts at `explicit_start` if given, else the first pickup,
/// else the driver's position. Errands without resolvable endpoints are
/// skipped.
pub fn sequence_with<E, M>(
    errands: &[E],
    driver_start: GeoPoint,
    explicit_start: Option<GeoPoint>,
    model: &M,
) -> Route<E::Id>
where
    E: Errand,
    M: DistanceModel,
{
    let mut pickups = Vec::new();
    let mut dropoffs = Vec::new();
    for errand in errands {
        if let Some((pickup, dropoff)) = errand.endpoints() {
            pickups.push(RouteNode::pickup(errand.id().clone(), pickup));
            dropoffs.push(RouteNode::dropoff(errand.id().clone(), dropoff));
        }
    }

    let mut current = explicit_start
        .or_else(|| pickups.first().map(|node| node.location))
        .unwrap_or(driver_start);

    let mut route = Route::new();
    for mut pool in [pickups, dropoffs] {
        while let Some(index) = nearest(&pool, current, model) {
            let node = pool.remove(index);
            current = node.location;
            route.push(node);
        }
    }

    route
}

/// Index of the node closest to `from`; first one wins ties.
fn nearest<OrderId, M: DistanceModel>(
    pool: &[RouteNode<OrderId>],
    from: GeoPoint,
    model: &M,
) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (index, node) in pool.iter().enumerate() {
        let d = model.distance_km(from, node.location);
        if best.is_none_or(|(_, best_d)| d < best_d) {
            best = Some((index, d));
        }
    }
    best.map(|(index, _)| index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Order, StopKind};

    fn order(id: &str, pickup: (f64, f64), dropoff: (f64, f64)) -> Order {
        Order::new(id, pickup.into(), dropoff.into())
    }

    #[test]
    fn test_empty_input_gives_empty_route() {
        let route = sequence::<Order>(&[], GeoPoint::new(0.0, 0.0), None);
        assert!(route.is_empty());
    }

    #[test]
    fn test_all_pickups_before_dropoffs() {
        let orders = vec![
            order("a", (35.00, -78.00), (35.05, -78.00)),
            order("b", (35.02, -78.00), (35.01, -78.00)),
            order("c", (35.04, -78.00), (35.03, -78.00)),
        ];
        let route = sequence(&orders, GeoPoint::new(35.0, -78.0), None);

        assert_eq!(route.len(), 6);
        let kinds: Vec<StopKind> = route.nodes().iter().map(|n| n.kind).collect();
        assert!(kinds[..3].iter().all(|k| *k == StopKind::Pickup));
        assert!(kinds[3..].iter().all(|k| *k == StopKind::Dropoff));
        assert!(route.check_precedence().is_ok());
    }

    #[test]
    fn test_nearest_neighbor_order() {
        // Pickups along a line; walk should go a, b, c then nearest dropoff from c.
        let orders = vec![
            order("a", (35.00, -78.00), (35.10, -78.00)),
            order("c", (35.02, -78.00), (35.03, -78.00)),
            order("b", (35.01, -78.00), (35.20, -78.00)),
        ];
        let route = sequence(&orders, GeoPoint::new(0.0, 0.0), None);
        let ids: Vec<&str> = route.nodes().iter().map(|n| n.order_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c", "c", "a", "b"]);
    }

    #[test]
    fn test_explicit_start_changes_first_pickup() {
        let orders = vec![
            order("a", (35.00, -78.00), (35.05, -78.00)),
            order("b", (35.10, -78.00), (35.15, -78.00)),
        ];
        let route = sequence(&orders, GeoPoint::new(35.0, -78.0), Some(GeoPoint::new(35.11, -78.0)));
        assert_eq!(route.nodes()[0].order_id, "b");
    }

    #[test]
    fn test_skips_orders_without_geometry() {
        let mut broken = order("x", (35.0, -78.0), (35.1, -78.0));
        broken.dropoff = None;
        let orders = vec![broken, order("a", (35.0, -78.0), (35.01, -78.0))];

        let route = sequence(&orders, GeoPoint::new(35.0, -78.0), None);
        assert_eq!(route.len(), 2);
        assert!(route.nodes().iter().all(|n| n.order_id == "a"));
    }
}
