//! Injected collaborators of the seat engine.
//!
//! The engine never traverses relations on its own. It asks a
//! [`TripCatalog`] for plain records (trip, vehicle type, route stops) and a
//! [`Clock`] for the time. Production wires in the `PostgreSQL` catalog;
//! tests use the in-memory catalog and a fixed clock from `seatplan-testing`.
//!
//! # Dyn Compatibility
//!
//! Traits return `Pin<Box<dyn Future>>` instead of using `async fn` so they
//! can be held as `Arc<dyn TripCatalog>`.

use crate::error::CatalogError;
use crate::layout::{LayoutConfig, SeatMap};
use crate::route::RouteStop;
use crate::types::{BookingPolicy, RouteId, SalesControl, TripId, VehicleTypeId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;

/// Clock trait - abstracts time operations for testability
pub trait Clock: Send + Sync {
    /// Get the current time
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A scheduled trip, flattened to the facts the engine needs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripRecord {
    /// Trip identifier
    pub id: TripId,
    /// Route travelled
    pub route_id: RouteId,
    /// Type of the vehicle assigned to the trip
    pub vehicle_type_id: VehicleTypeId,
    /// Seat reuse policy
    pub booking_policy: BookingPolicy,
    /// Whether intermediate stops may sell tickets
    pub sales_control: SalesControl,
}

/// A vehicle type's seat configuration and stored map.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleTypeRecord {
    /// Vehicle type identifier
    pub id: VehicleTypeId,
    /// Display name
    pub name: String,
    /// Configuration the map was generated from
    pub layout: LayoutConfig,
    /// Stored map; source of truth when present
    pub seat_map: Option<SeatMap>,
}

/// Access to trips, vehicle types and routes.
pub trait TripCatalog: Send + Sync {
    /// Load a trip.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] on storage failure.
    fn load_trip(
        &self,
        trip_id: TripId,
    ) -> Pin<Box<dyn Future<Output = Result<Option<TripRecord>, CatalogError>> + Send + '_>>;

    /// Load a vehicle type with its stored seat map.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] on storage failure or an undecodable map.
    fn load_vehicle_type(
        &self,
        vehicle_type_id: VehicleTypeId,
    ) -> Pin<Box<dyn Future<Output = Result<Option<VehicleTypeRecord>, CatalogError>> + Send + '_>>;

    /// Load a route's stops in any order.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] on storage failure.
    fn load_route_stops(
        &self,
        route_id: RouteId,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<RouteStop>, CatalogError>> + Send + '_>>;

    /// Insert or replace a vehicle type together with its seat map.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] on storage failure.
    fn save_vehicle_type(
        &self,
        record: VehicleTypeRecord,
    ) -> Pin<Box<dyn Future<Output = Result<(), CatalogError>> + Send + '_>>;
}
