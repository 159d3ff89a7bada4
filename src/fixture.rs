use std::mem;

use reqwest::StatusCode;
use tracing::{debug, warn};

use crate::clients::{CourierClient, OrderClient};
use crate::error::HarnessError;
use crate::models::courier::CourierCredentials;
use crate::models::ids::{CourierId, Track};
use crate::models::order::Order;
use crate::rest::{ApiResponse, Transport};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fixture {
    /// Released by logging in for the id, then deleting.
    Courier(CourierCredentials),
    /// Released by cancelling.
    Order(Track),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerState {
    Idle,
    Armed,
    Released,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupAnomaly {
    pub fixture: Fixture,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupReport {
    pub released: usize,
    pub anomalies: Vec<CleanupAnomaly>,
}

impl CleanupReport {
    pub fn is_clean(&self) -> bool {
        self.anomalies.is_empty()
    }
}

/// Releases recorded fixtures in creation order, on `release()` or on drop.
pub struct FixtureTracker {
    couriers: CourierClient,
    orders: OrderClient,
    fixtures: Vec<Fixture>,
    state: TrackerState,
}

impl FixtureTracker {
    pub fn new(transport: &Transport) -> Self {
        Self {
            couriers: CourierClient::new(transport.clone()),
            orders: OrderClient::new(transport.clone()),
            fixtures: Vec::new(),
            state: TrackerState::Idle,
        }
    }

    pub fn state(&self) -> TrackerState {
        self.state
    }

    pub fn fixtures(&self) -> &[Fixture] {
        &self.fixtures
    }

    pub fn couriers(&self) -> &CourierClient {
        &self.couriers
    }

    pub fn orders(&self) -> &OrderClient {
        &self.orders
    }

    pub fn track_courier(&mut self, courier: CourierCredentials) {
        self.record(Fixture::Courier(courier));
    }

    pub fn track_order(&mut self, track: Track) {
        self.record(Fixture::Order(track));
    }

    /// Stops tracking a fixture the scenario already released itself.
    pub fn forget(&mut self, fixture: &Fixture) -> bool {
        let before = self.fixtures.len();
        self.fixtures.retain(|tracked| tracked != fixture);
        self.fixtures.len() != before
    }

    /// Creates a courier and records it if the service answered `201`.
    pub fn create_courier(
        &mut self,
        courier: &CourierCredentials,
    ) -> Result<ApiResponse, HarnessError> {
        let response = self.couriers.create(courier)?;
        if response.status() == StatusCode::CREATED {
            self.track_courier(courier.clone());
        }
        Ok(response)
    }

    /// Creates an order and records its track if the service answered `201`.
    pub fn create_order(&mut self, order: &Order) -> Result<ApiResponse, HarnessError> {
        let response = self.orders.create(order)?;
        if response.status() == StatusCode::CREATED {
            match response.extract_as::<Track>("track") {
                Ok(track) => self.track_order(track),
                Err(err) => warn!(error = %err, "created order carries no track; it will not be cancelled"),
            }
        }
        Ok(response)
    }

    /// Attempts release of every recorded fixture, in creation order.
    pub fn release(&mut self) -> CleanupReport {
        let fixtures = mem::take(&mut self.fixtures);
        let mut report = CleanupReport::default();

        for fixture in fixtures {
            let outcome = match &fixture {
                Fixture::Courier(courier) => self.release_courier(courier),
                Fixture::Order(track) => self.release_order(*track),
            };

            match outcome {
                Ok(()) => {
                    debug!(fixture = ?fixture, "fixture released");
                    report.released += 1;
                }
                Err(reason) => {
                    warn!(fixture = ?fixture, reason = %reason, "fixture release failed");
                    report.anomalies.push(CleanupAnomaly { fixture, reason });
                }
            }
        }

        self.state = TrackerState::Released;
        report
    }

    fn record(&mut self, fixture: Fixture) {
        debug!(fixture = ?fixture, "fixture recorded");
        self.fixtures.push(fixture);
        self.state = TrackerState::Armed;
    }

    fn release_courier(&self, courier: &CourierCredentials) -> Result<(), String> {
        let login = self.couriers.login(courier).map_err(|err| err.to_string())?;
        if login.status() != StatusCode::OK {
            return Err(format!(
                "login for cleanup answered {}: {}",
                login.status_code(),
                login.text()
            ));
        }

        let id: CourierId = login.extract_as("id").map_err(|err| err.to_string())?;
        let deleted = self.couriers.delete_by_id(id).map_err(|err| err.to_string())?;
        if deleted.status() != StatusCode::OK {
            return Err(format!(
                "delete of courier {id} answered {}: {}",
                deleted.status_code(),
                deleted.text()
            ));
        }

        Ok(())
    }

    fn release_order(&self, track: Track) -> Result<(), String> {
        let cancelled = self
            .orders
            .cancel(Some(track))
            .map_err(|err| err.to_string())?;
        if cancelled.status() != StatusCode::OK {
            return Err(format!(
                "cancel of track {track} answered {}: {}",
                cancelled.status_code(),
                cancelled.text()
            ));
        }

        Ok(())
    }
}

impl Drop for FixtureTracker {
    fn drop(&mut self) {
        if self.state == TrackerState::Armed {
            let report = self.release();
            if !report.is_clean() {
                warn!(
                    anomalies = report.anomalies.len(),
                    released = report.released,
                    "fixture cleanup finished with anomalies"
                );
            }
        }
    }
}
