//! Raleigh / Durham area locations for realistic test fixtures.
//!
//! Coordinates are approximate landmark positions, good to ~100 m.

#![allow(dead_code)]

use errand_batcher::{Driver, DriverStatus, GeoPoint, Order};

/// A named location with coordinates.
#[derive(Debug, Clone, Copy)]
pub struct Location {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub const fn new(name: &'static str, lat: f64, lng: f64) -> Self {
        Self { name, lat, lng }
    }

    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lng)
    }
}

// ============================================================================
// Downtown Raleigh (pickup side: kitchens and shops)
// ============================================================================

pub const DOWNTOWN_STORES: &[Location] = &[
    Location::new("State Capitol", 35.7804, -78.6391),
    Location::new("Glenwood South", 35.7880, -78.6445),
    Location::new("Fayetteville Street", 35.7760, -78.6395),
    Location::new("City Market", 35.7770, -78.6350),
    Location::new("Warehouse District", 35.7745, -78.6455),
];

// ============================================================================
// Inner-ring neighborhoods (dropoff side)
// ============================================================================

pub const NEAR_HOMES: &[Location] = &[
    Location::new("Cameron Village", 35.7902, -78.6572),
    Location::new("Five Points", 35.8030, -78.6440),
    Location::new("Oakwood", 35.7850, -78.6300),
    Location::new("Boylan Heights", 35.7735, -78.6525),
    Location::new("Mordecai", 35.7960, -78.6345),
];

// ============================================================================
// Outlying areas (well beyond a 3 km detour from downtown)
// ============================================================================

pub const OUTLYING: &[Location] = &[
    Location::new("Durham Bulls Park", 35.9916, -78.9042),
    Location::new("Duke Chapel", 36.0019, -78.9403),
    Location::new("RDU Airport", 35.8801, -78.7880),
    Location::new("Cary Town Hall", 35.7871, -78.7811),
];

pub const DEPOT: Location = Location::new("NC State Belltower", 35.7863, -78.6633);

// ============================================================================
// Builders
// ============================================================================

/// Order from `from` to `to`.
pub fn errand(id: &str, from: &Location, to: &Location) -> Order {
    Order::new(id, from.point(), to.point())
}

/// Order with raw coordinates.
pub fn errand_at(id: &str, pickup: (f64, f64), dropoff: (f64, f64)) -> Order {
    Order::new(id, pickup.into(), dropoff.into())
}

pub fn driver_at(id: &str, location: &Location) -> Driver {
    Driver::available(id, id.to_uppercase(), location.point())
}

pub fn driver_with_status(id: &str, location: &Location, status: DriverStatus) -> Driver {
    Driver {
        status,
        ..driver_at(id, location)
    }
}

/// Every downtown store paired with every near home, ids "s{i}h{j}".
pub fn downtown_errands() -> Vec<Order> {
    let mut orders = Vec::new();
    for (i, store) in DOWNTOWN_STORES.iter().enumerate() {
        for (j, home) in NEAR_HOMES.iter().enumerate() {
            orders.push(errand(&format!("s{i}h{j}"), store, home));
        }
    }
    orders
}
