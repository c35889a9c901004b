//! In-memory trip catalog.

#![allow(clippy::unwrap_used)] // Test infrastructure uses unwrap for simplicity
#![allow(clippy::missing_panics_doc)] // Test utilities document panics where critical

use seatplan_core::environment::{TripCatalog, TripRecord, VehicleTypeRecord};
use seatplan_core::error::CatalogError;
use seatplan_core::route::RouteStop;
use seatplan_core::types::{RouteId, TripId, VehicleTypeId};
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

#[derive(Debug, Default)]
struct Records {
    trips: HashMap<TripId, TripRecord>,
    vehicle_types: HashMap<VehicleTypeId, VehicleTypeRecord>,
    routes: HashMap<RouteId, Vec<RouteStop>>,
}

/// `HashMap`-backed [`TripCatalog`].
///
/// Counts vehicle-type and route loads so tests can assert on caching.
#[derive(Clone, Debug, Default)]
pub struct InMemoryTripCatalog {
    records: Arc<RwLock<Records>>,
    vehicle_type_loads: Arc<AtomicUsize>,
    route_loads: Arc<AtomicUsize>,
}

impl InMemoryTripCatalog {
    /// Create an empty catalog
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a trip.
    pub fn insert_trip(&self, trip: TripRecord) {
        self.records.write().unwrap().trips.insert(trip.id, trip);
    }

    /// Add or replace a vehicle type.
    pub fn insert_vehicle_type(&self, vehicle_type: VehicleTypeRecord) {
        self.records
            .write()
            .unwrap()
            .vehicle_types
            .insert(vehicle_type.id, vehicle_type);
    }

    /// Add or replace a route.
    pub fn insert_route(&self, route_id: RouteId, stops: Vec<RouteStop>) {
        self.records.write().unwrap().routes.insert(route_id, stops);
    }

    /// Builder form of [`insert_trip`](Self::insert_trip).
    #[must_use]
    pub fn with_trip(self, trip: TripRecord) -> Self {
        self.insert_trip(trip);
        self
    }

    /// Builder form of [`insert_vehicle_type`](Self::insert_vehicle_type).
    #[must_use]
    pub fn with_vehicle_type(self, vehicle_type: VehicleTypeRecord) -> Self {
        self.insert_vehicle_type(vehicle_type);
        self
    }

    /// Builder form of [`insert_route`](Self::insert_route).
    #[must_use]
    pub fn with_route(self, route_id: RouteId, stops: Vec<RouteStop>) -> Self {
        self.insert_route(route_id, stops);
        self
    }

    /// Times a vehicle type was loaded.
    #[must_use]
    pub fn vehicle_type_loads(&self) -> usize {
        self.vehicle_type_loads.load(Ordering::SeqCst)
    }

    /// Times a route was loaded.
    #[must_use]
    pub fn route_loads(&self) -> usize {
        self.route_loads.load(Ordering::SeqCst)
    }
}

impl TripCatalog for InMemoryTripCatalog {
    fn load_trip(
        &self,
        trip_id: TripId,
    ) -> Pin<Box<dyn Future<Output = Result<Option<TripRecord>, CatalogError>> + Send + '_>> {
        Box::pin(async move { Ok(self.records.read().unwrap().trips.get(&trip_id).cloned()) })
    }

    fn load_vehicle_type(
        &self,
        vehicle_type_id: VehicleTypeId,
    ) -> Pin<Box<dyn Future<Output = Result<Option<VehicleTypeRecord>, CatalogError>> + Send + '_>> {
        Box::pin(async move {
            self.vehicle_type_loads.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .records
                .read()
                .unwrap()
                .vehicle_types
                .get(&vehicle_type_id)
                .cloned())
        })
    }

    fn load_route_stops(
        &self,
        route_id: RouteId,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<RouteStop>, CatalogError>> + Send + '_>> {
        Box::pin(async move {
            self.route_loads.fetch_add(1, Ordering::SeqCst);
            self.records
                .read()
                .unwrap()
                .routes
                .get(&route_id)
                .cloned()
                .ok_or_else(|| CatalogError::NotFound {
                    kind: "route",
                    id: route_id.to_string(),
                })
        })
    }

    fn save_vehicle_type(
        &self,
        record: VehicleTypeRecord,
    ) -> Pin<Box<dyn Future<Output = Result<(), CatalogError>> + Send + '_>> {
        Box::pin(async move {
            self.insert_vehicle_type(record);
            Ok(())
        })
    }
}
