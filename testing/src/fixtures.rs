//! Ready-made trips, routes and vehicles for engine tests.

use crate::catalog_mocks::InMemoryTripCatalog;
use crate::mocks::test_clock;
use crate::occupancy_mocks::InMemoryOccupancyStore;
use seatplan_core::environment::{TripRecord, VehicleTypeRecord};
use seatplan_core::layout::LayoutConfig;
use seatplan_core::route::RouteStop;
use seatplan_core::service::{EngineConfig, EngineEnvironment, ReservationRequest, SeatEngine};
use seatplan_core::types::{
    BookingPolicy, RouteId, SalesControl, SeatNumber, StopId, TripId, VehicleTypeId,
};
use std::sync::Arc;

/// A route whose stops are named in order, origin first.
#[must_use]
pub fn named_route(names: &[&str]) -> (RouteId, Vec<RouteStop>) {
    let stops = (0..)
        .zip(names)
        .map(|(stop_index, name)| RouteStop {
            stop_id: StopId::new(),
            stop_index,
            name: (*name).to_string(),
        })
        .collect();
    (RouteId::new(), stops)
}

/// A vehicle type without a stored map, so the engine builds it.
#[must_use]
pub fn vehicle_type(name: &str, layout: LayoutConfig) -> VehicleTypeRecord {
    VehicleTypeRecord {
        id: VehicleTypeId::new(),
        name: name.to_string(),
        layout,
        seat_map: None,
    }
}

/// One trip wired to an engine over in-memory collaborators.
pub struct TestTrip {
    /// Engine under test
    pub engine: Arc<SeatEngine>,
    /// Catalog holding the trip, its vehicle type and its route
    pub catalog: InMemoryTripCatalog,
    /// Occupancy store
    pub store: InMemoryOccupancyStore,
    /// The trip
    pub trip: TripRecord,
    /// Route stops in order
    pub stops: Vec<StopId>,
}

impl TestTrip {
    /// Trip with open sales.
    #[must_use]
    pub fn new(policy: BookingPolicy, layout: LayoutConfig, stop_names: &[&str]) -> Self {
        Self::with_sales_control(policy, layout, stop_names, SalesControl::Open)
    }

    /// Trip with the given sales control.
    #[must_use]
    pub fn with_sales_control(
        policy: BookingPolicy,
        layout: LayoutConfig,
        stop_names: &[&str],
        sales_control: SalesControl,
    ) -> Self {
        let (route_id, route) = named_route(stop_names);
        let stops = route.iter().map(|stop| stop.stop_id).collect();
        let vehicle = vehicle_type("Test coach", layout);
        let trip = TripRecord {
            id: TripId::new(),
            route_id,
            vehicle_type_id: vehicle.id,
            booking_policy: policy,
            sales_control,
        };

        let catalog = InMemoryTripCatalog::new()
            .with_vehicle_type(vehicle)
            .with_route(route_id, route)
            .with_trip(trip.clone());
        let store = InMemoryOccupancyStore::new();
        let env = EngineEnvironment::new(
            Arc::new(catalog.clone()),
            Arc::new(store.clone()),
            Arc::new(test_clock()),
        );

        Self {
            engine: Arc::new(SeatEngine::new(env, EngineConfig::default())),
            catalog,
            store,
            trip,
            stops,
        }
    }

    /// Stop at a route position.
    ///
    /// # Panics
    ///
    /// Panics if the route has no such stop.
    #[must_use]
    pub fn stop(&self, index: usize) -> StopId {
        self.stops[index]
    }

    /// Reservation of `seats` between two route positions.
    #[must_use]
    pub fn reservation(&self, seats: &[u32], from: usize, to: usize) -> ReservationRequest {
        ReservationRequest {
            trip_id: self.trip.id,
            seats: seats.iter().copied().map(SeatNumber::new).collect(),
            from_stop: self.stop(from),
            to_stop: self.stop(to),
        }
    }
}
