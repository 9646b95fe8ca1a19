//! Clustering orchestrator: hands the shared order pool to each available
//! driver in turn.
//!
//! Earlier drivers get first pick, so driver input order is the tie-break
//! between drivers. Orders that fit nowhere are reported, not errors.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::assembler::build_batches_for_driver;
use crate::error::{PlanError, Result};
use crate::haversine::Haversine;
use crate::model::Batch;
use crate::pool::OrderPool;
use crate::traits::{Courier, DistanceModel, Errand};

/// Default cap on orders in one batch.
pub const DEFAULT_MAX_ORDERS_PER_BATCH: usize = 10;

/// Default detour (km) still considered "on the way".
pub const DEFAULT_MAX_DETOUR_KM: f64 = 3.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchOptions {
    /// Hard cap on orders per batch.
    pub max_orders_per_batch: usize,
    /// Largest insertion detour (km) accepted while growing a batch.
    pub max_detour_km: f64,
    /// Batches one driver may take per run. None = until the pool is empty.
    pub max_batches_per_driver: Option<usize>,
    /// Evaluate growth candidates on the rayon pool. Same result either way.
    pub parallel_candidates: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            max_orders_per_batch: DEFAULT_MAX_ORDERS_PER_BATCH,
            max_detour_km: DEFAULT_MAX_DETOUR_KM,
            max_batches_per_driver: None,
            parallel_candidates: false,
        }
    }
}

impl BatchOptions {
    pub fn with_max_orders(max_orders_per_batch: usize) -> Self {
        Self {
            max_orders_per_batch,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_orders_per_batch == 0 {
            return Err(PlanError::InvalidOptions(
                "max_orders_per_batch must be at least 1".to_string(),
            ));
        }
        if !self.max_detour_km.is_finite() || self.max_detour_km < 0.0 {
            return Err(PlanError::InvalidOptions(format!(
                "max_detour_km must be a non-negative number, got {}",
                self.max_detour_km
            )));
        }
        Ok(())
    }
}

/// Why an order did not end up in any batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnassignedReason {
    /// No resolvable pickup or dropoff point.
    MissingGeometry,
    /// Already carries a driver assignment.
    AlreadyAssigned,
    /// No driver was available this run.
    NoAvailableDriver,
    /// Every available driver was processed and the order was left over.
    NoDriverCapacity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnassignedOrder<OrderId> {
    pub order_id: OrderId,
    pub reason: UnassignedReason,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannerResult<DriverId, OrderId> {
    pub batches: Vec<Batch<DriverId, OrderId>>,
    pub unassigned: Vec<UnassignedOrder<OrderId>>,
}

/// Cluster orders into driver batches. Unassignable orders are left out.
pub fn cluster_orders<E, C>(
    orders: &[E],
    drivers: &[C],
    options: &BatchOptions,
) -> Result<Vec<Batch<C::Id, E::Id>>>
where
    E: Errand + Sync,
    E::Id: Send + Sync,
    C: Courier,
{
    plan(orders, drivers, options).map(|result| result.batches)
}

/// Cluster orders into driver batches and report what was left out.
pub fn plan<E, C>(
    orders: &[E],
    drivers: &[C],
    options: &BatchOptions,
) -> Result<PlannerResult<C::Id, E::Id>>
where
    E: Errand + Sync,
    E::Id: Send + Sync,
    C: Courier,
{
    plan_with(orders, drivers, options, &Haversine)
}

pub fn plan_with<E, C, M>(
    orders: &[E],
    drivers: &[C],
    options: &BatchOptions,
    model: &M,
) -> Result<PlannerResult<C::Id, E::Id>>
where
    E: Errand + Sync,
    E::Id: Send + Sync,
    C: Courier,
    M: DistanceModel + Sync,
{
    options.validate()?;

    let mut unassigned = Vec::new();
    let mut seen = HashSet::new();
    let mut batchable = Vec::with_capacity(orders.len());

    for order in orders {
        if !seen.insert(order.id()) {
            warn!(order_id = ?order.id(), "duplicate order id, keeping first occurrence");
            continue;
        }
        if order.assigned_driver().is_some() {
            unassigned.push(UnassignedOrder {
                order_id: order.id().clone(),
                reason: UnassignedReason::AlreadyAssigned,
            });
        } else if order.endpoints().is_none() {
            warn!(order_id = ?order.id(), "order has no resolvable pickup/dropoff, skipping");
            unassigned.push(UnassignedOrder {
                order_id: order.id().clone(),
                reason: UnassignedReason::MissingGeometry,
            });
        } else {
            batchable.push(order);
        }
    }

    let available: Vec<&C> = drivers
        .iter()
        .filter(|d| d.status().is_available())
        .filter(|d| {
            let located = d.location().is_finite();
            if !located {
                warn!(driver_id = ?d.id(), "driver has no usable location, skipping");
            }
            located
        })
        .collect();
    if available.is_empty() {
        info!(orders = batchable.len(), "no available drivers, nothing to batch");
        unassigned.extend(batchable.into_iter().map(|order| UnassignedOrder {
            order_id: order.id().clone(),
            reason: UnassignedReason::NoAvailableDriver,
        }));
        return Ok(PlannerResult {
            batches: Vec::new(),
            unassigned,
        });
    }

    let mut pool = OrderPool::new(batchable);
    let mut batches = Vec::new();

    for driver in &available {
        if pool.is_empty() {
            break;
        }
        let assembly = build_batches_for_driver(*driver, &mut pool, options, model)?;
        debug!(
            driver_id = ?driver.id(),
            batches = assembly.batches.len(),
            orders = assembly.assigned.len(),
            remaining = pool.len(),
            "driver assembled"
        );
        unassigned.extend(assembly.discarded.into_iter().map(|order_id| UnassignedOrder {
            order_id,
            reason: UnassignedReason::MissingGeometry,
        }));
        batches.extend(assembly.batches);
    }

    unassigned.extend(pool.into_remaining().into_iter().map(|order| UnassignedOrder {
        order_id: order.id().clone(),
        reason: UnassignedReason::NoDriverCapacity,
    }));

    info!(
        drivers = available.len(),
        batches = batches.len(),
        unassigned = unassigned.len(),
        "clustering complete"
    );

    Ok(PlannerResult { batches, unassigned })
}
