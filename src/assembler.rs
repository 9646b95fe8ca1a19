//! Per-driver batch assembly.
//!
//! Seed a batch from the next pool order, grow it with whichever remaining
//! order has the cheapest insertion while that detour stays within the
//! limit, close it, repeat. Orders only ever move from the pool into a
//! closed batch.

use rayon::prelude::*;
use tracing::{debug, trace, warn};

use crate::error::Result;
use crate::insertion::{best_insertion_with, Insertion};
use crate::model::{Batch, BatchStatus, Route};
use crate::pool::OrderPool;
use crate::solver::BatchOptions;
use crate::traits::{Courier, DistanceModel, Errand};

/// What one driver took out of the pool.
#[derive(Debug, Clone)]
pub struct Assembly<DriverId, OrderId> {
    pub batches: Vec<Batch<DriverId, OrderId>>,
    /// Every order placed into one of `batches`.
    pub assigned: Vec<OrderId>,
    /// Orders popped as seeds but unusable for lack of geometry.
    pub discarded: Vec<OrderId>,
}

pub fn build_batches_for_driver<'a, E, C, M>(
    driver: &C,
    pool: &mut OrderPool<'a, E>,
    options: &BatchOptions,
    model: &M,
) -> Result<Assembly<C::Id, E::Id>>
where
    E: Errand + Sync,
    E::Id: Send + Sync,
    C: Courier,
    M: DistanceModel + Sync,
{
    let start = driver.location();
    let allowance = options.max_batches_per_driver.unwrap_or(usize::MAX);
    let mut assembly = Assembly {
        batches: Vec::new(),
        assigned: Vec::new(),
        discarded: Vec::new(),
    };

    while !pool.is_empty() && assembly.batches.len() < allowance {
        let Some(seed) = pool.pop_front() else { break };
        let Some((pickup, dropoff)) = seed.endpoints() else {
            warn!(order_id = ?seed.id(), "discarding order without pickup/dropoff");
            assembly.discarded.push(seed.id().clone());
            continue;
        };

        let mut route = Route::seeded(seed.id().clone(), pickup, dropoff);
        let mut order_ids = vec![seed.id().clone()];

        while order_ids.len() < options.max_orders_per_batch && !pool.is_empty() {
            let Some((index, insertion)) = cheapest_candidate(&route, pool, driver, options, model)
            else {
                break;
            };
            if insertion.detour_km > options.max_detour_km {
                trace!(detour_km = insertion.detour_km, "best candidate exceeds detour limit");
                break;
            }
            let Some(order) = pool.take(index) else { break };

            trace!(
                order_id = ?order.id(),
                detour_km = insertion.detour_km,
                pickup_index = insertion.pickup_index,
                dropoff_index = insertion.dropoff_index,
                "accepted insertion"
            );
            route = insertion.route;
            order_ids.push(order.id().clone());
        }

        route.check_precedence()?;
        let total_distance_km = route.annotate(start, model);

        debug!(
            driver_id = ?driver.id(),
            orders = order_ids.len(),
            stops = route.len(),
            total_distance_km,
            "closed batch"
        );

        assembly.assigned.extend(order_ids.iter().cloned());
        assembly.batches.push(Batch {
            driver_id: driver.id().clone(),
            driver_name: driver.name().to_string(),
            order_ids,
            route,
            total_distance_km,
            status: BatchStatus::Assigned,
        });
    }

    Ok(assembly)
}

/// Remaining pool order with the smallest insertion detour against
/// `route`. Earliest pool order wins ties.
fn cheapest_candidate<'a, E, C, M>(
    route: &Route<E::Id>,
    pool: &OrderPool<'a, E>,
    driver: &C,
    options: &BatchOptions,
    model: &M,
) -> Option<(usize, Insertion<E::Id>)>
where
    E: Errand + Sync,
    E::Id: Send + Sync,
    C: Courier,
    M: DistanceModel + Sync,
{
    let start = driver.location();
    let evaluate = |(index, order): (usize, &'a E)| {
        let (pickup, dropoff) = order.endpoints()?;
        best_insertion_with(route, pickup, dropoff, start, order.id(), model)
            .map(|insertion| (index, insertion))
    };

    let candidates: Vec<(usize, &'a E)> = pool.iter().collect();
    let evaluated: Vec<Option<(usize, Insertion<E::Id>)>> = if options.parallel_candidates {
        candidates.into_par_iter().map(evaluate).collect()
    } else {
        candidates.into_iter().map(evaluate).collect()
    };

    evaluated
        .into_iter()
        .flatten()
        .fold(None, |best: Option<(usize, Insertion<E::Id>)>, candidate| match best {
            Some(current) if current.1.detour_km <= candidate.1.detour_km => Some(current),
            _ => Some(candidate),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::haversine::Haversine;
    use crate::model::{Driver, GeoPoint, Order, StopKind};

    fn order(id: &str, pickup: (f64, f64), dropoff: (f64, f64)) -> Order {
        Order::new(id, pickup.into(), dropoff.into())
    }

    fn driver() -> Driver {
        Driver::available("d1", "Dana", GeoPoint::new(35.0, -78.0))
    }

    fn run(orders: &[Order], options: &BatchOptions) -> Assembly<String, String> {
        let mut pool = OrderPool::new(orders);
        build_batches_for_driver(&driver(), &mut pool, options, &Haversine).unwrap()
    }

    #[test]
    fn test_single_order_single_batch() {
        let orders = vec![order("o1", (35.0, -78.0), (35.01, -78.0))];
        let assembly = run(&orders, &BatchOptions::default());

        assert_eq!(assembly.batches.len(), 1);
        let batch = &assembly.batches[0];
        assert_eq!(batch.order_ids, vec!["o1".to_string()]);
        assert_eq!(batch.route.len(), 2);
        assert_eq!(batch.route.nodes()[0].kind, StopKind::Pickup);
        assert_eq!(batch.route.nodes()[1].kind, StopKind::Dropoff);
        assert_eq!(batch.status, BatchStatus::Assigned);
        assert_eq!(batch.driver_name, "Dana");
    }

    #[test]
    fn test_grows_with_cheapest_candidate_first() {
        let orders = vec![
            order("seed", (35.0, -78.0), (35.02, -78.0)),
            order("far", (35.03, -78.0), (35.04, -78.0)),
            order("near", (35.005, -78.0), (35.015, -78.0)),
        ];
        let assembly = run(&orders, &BatchOptions::default());

        assert_eq!(assembly.batches.len(), 1);
        assert_eq!(assembly.batches[0].order_ids, vec!["seed", "near", "far"]);
    }

    #[test]
    fn test_zero_allowance_leaves_pool_untouched() {
        let orders = vec![order("o1", (35.0, -78.0), (35.01, -78.0))];
        let options = BatchOptions {
            max_batches_per_driver: Some(0),
            ..BatchOptions::default()
        };
        let mut pool = OrderPool::new(&orders);
        let assembly = build_batches_for_driver(&driver(), &mut pool, &options, &Haversine).unwrap();

        assert!(assembly.batches.is_empty());
        assert!(assembly.assigned.is_empty());
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn test_seed_without_geometry_is_discarded() {
        let mut broken = order("broken", (35.0, -78.0), (35.01, -78.0));
        broken.pickup = None;
        let orders = vec![broken, order("o1", (35.0, -78.0), (35.01, -78.0))];
        let assembly = run(&orders, &BatchOptions::default());

        assert_eq!(assembly.discarded, vec!["broken".to_string()]);
        assert_eq!(assembly.assigned, vec!["o1".to_string()]);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let orders: Vec<Order> = (0..12)
            .map(|i| {
                let offset = (i % 4) as f64 * 0.004 + (i / 4) as f64 * 0.05;
                order(&format!("o{i}"), (35.0 + offset, -78.0), (35.01 + offset, -78.002))
            })
            .collect();
        let sequential = run(&orders, &BatchOptions::default());
        let parallel = run(
            &orders,
            &BatchOptions {
                parallel_candidates: true,
                ..BatchOptions::default()
            },
        );

        let ids = |a: &Assembly<String, String>| {
            a.batches.iter().map(|b| b.order_ids.clone()).collect::<Vec<_>>()
        };
        assert_eq!(ids(&sequential), ids(&parallel));
    }
}
