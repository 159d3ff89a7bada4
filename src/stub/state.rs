use std::sync::atomic::{AtomicI64, Ordering};

use dashmap::DashMap;

use crate::models::ids::{CourierId, OrderId, Track};
use crate::models::order::OrderRecord;
use crate::observability::metrics::Metrics;

const FIRST_TRACK: i64 = 100_001;

#[derive(Debug, Clone)]
pub struct CourierAccount {
    pub id: CourierId,
    pub login: String,
    pub password: String,
    pub first_name: String,
}

pub struct StubState {
    pub couriers: DashMap<CourierId, CourierAccount>,
    pub logins: DashMap<String, CourierId>,
    pub orders: DashMap<OrderId, OrderRecord>,
    pub tracks: DashMap<Track, OrderId>,
    pub metrics: Metrics,
    next_courier_id: AtomicI64,
    next_order_id: AtomicI64,
    next_track: AtomicI64,
}

impl StubState {
    pub fn new() -> Self {
        Self {
            couriers: DashMap::new(),
            logins: DashMap::new(),
            orders: DashMap::new(),
            tracks: DashMap::new(),
            metrics: Metrics::new(),
            next_courier_id: AtomicI64::new(1),
            next_order_id: AtomicI64::new(1),
            next_track: AtomicI64::new(FIRST_TRACK),
        }
    }

    pub fn allocate_courier_id(&self) -> CourierId {
        CourierId(self.next_courier_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Ids and tracks come from separate sequences so they never coincide.
    pub fn allocate_order_handles(&self) -> (OrderId, Track) {
        (
            OrderId(self.next_order_id.fetch_add(1, Ordering::Relaxed)),
            Track(self.next_track.fetch_add(1, Ordering::Relaxed)),
        )
    }
}

impl Default for StubState {
    fn default() -> Self {
        Self::new()
    }
}
