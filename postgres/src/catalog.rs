//! Trips, vehicle types and route stop orders.

use crate::{to_i32, to_u32};
use seatplan_core::environment::{TripCatalog, TripRecord, VehicleTypeRecord};
use seatplan_core::error::{CatalogError, LayoutError};
use seatplan_core::layout::{ColumnSplit, LayoutConfig, SeatMap};
use seatplan_core::route::RouteStop;
use seatplan_core::types::{BookingPolicy, RouteId, SalesControl, StopId, TripId, VehicleTypeId};
use sqlx::PgPool;
use std::future::Future;
use std::pin::Pin;
use uuid::Uuid;

type VehicleTypeRow = (Uuid, String, i32, String, Vec<i32>, i32, Option<serde_json::Value>);

fn storage(context: &str) -> impl Fn(sqlx::Error) -> CatalogError + '_ {
    move |e| CatalogError::Storage(format!("{context}: {e}"))
}

fn corrupt(kind: &'static str) -> impl Fn(String) -> CatalogError {
    move |message| CatalogError::Corrupt { kind, message }
}

fn decode_vehicle_type(row: VehicleTypeRow) -> Result<VehicleTypeRecord, CatalogError> {
    let (id, name, seat_count, seat_configuration, doors, last_row_seats, seat_map) = row;
    let invalid = corrupt("vehicle type");

    let seat_configuration: ColumnSplit = seat_configuration
        .parse()
        .map_err(|e: LayoutError| invalid(e.to_string()))?;
    let doors = doors
        .into_iter()
        .map(|door| to_u32(door, "door position"))
        .collect::<Result<Vec<_>, _>>()
        .map_err(&invalid)?;
    let layout = LayoutConfig::new(to_u32(seat_count, "seat_count").map_err(&invalid)?, seat_configuration)
        .with_doors(doors)
        .with_last_row_seats(to_u32(last_row_seats, "last_row_seats").map_err(&invalid)?);
    let seat_map = seat_map
        .map(serde_json::from_value::<SeatMap>)
        .transpose()
        .map_err(|e| invalid(format!("seat map: {e}")))?;

    Ok(VehicleTypeRecord {
        id: VehicleTypeId::from_uuid(id),
        name,
        layout,
        seat_map,
    })
}

/// `PostgreSQL`-backed [`TripCatalog`].
///
/// A trip's vehicle type is reached through its vehicle
/// (`trips.vehicle_id -> vehicles.vehicle_type_id`).
#[derive(Clone)]
pub struct PostgresTripCatalog {
    pool: PgPool,
}

impl PostgresTripCatalog {
    /// Create a catalog over an existing connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Access the underlying connection pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl TripCatalog for PostgresTripCatalog {
    fn load_trip(
        &self,
        trip_id: TripId,
    ) -> Pin<Box<dyn Future<Output = Result<Option<TripRecord>, CatalogError>> + Send + '_>> {
        Box::pin(async move {
            let row: Option<(Uuid, Uuid, Uuid, String, String)> = sqlx::query_as(
                "SELECT t.id, t.route_id, v.vehicle_type_id, t.booking_policy, t.sales_control
                 FROM trips t
                 JOIN vehicles v ON v.id = t.vehicle_id
                 WHERE t.id = $1",
            )
            .bind(trip_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(storage("Failed to load trip"))?;

            let Some((id, route_id, vehicle_type_id, policy, sales_control)) = row else {
                return Ok(None);
            };
            let invalid = corrupt("trip");
            Ok(Some(TripRecord {
                id: TripId::from_uuid(id),
                route_id: RouteId::from_uuid(route_id),
                vehicle_type_id: VehicleTypeId::from_uuid(vehicle_type_id),
                booking_policy: policy
                    .parse::<BookingPolicy>()
                    .map_err(|e| invalid(e.to_string()))?,
                sales_control: sales_control
                    .parse::<SalesControl>()
                    .map_err(|e| invalid(e.to_string()))?,
            }))
        })
    }

    fn load_vehicle_type(
        &self,
        vehicle_type_id: VehicleTypeId,
    ) -> Pin<Box<dyn Future<Output = Result<Option<VehicleTypeRecord>, CatalogError>> + Send + '_>> {
        Box::pin(async move {
            let row: Option<VehicleTypeRow> = sqlx::query_as(
                "SELECT id, name, seat_count, seat_configuration, door_positions, last_row_seats, seat_map
                 FROM vehicle_types
                 WHERE id = $1",
            )
            .bind(vehicle_type_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(storage("Failed to load vehicle type"))?;

            row.map(decode_vehicle_type).transpose()
        })
    }

    fn load_route_stops(
        &self,
        route_id: RouteId,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<RouteStop>, CatalogError>> + Send + '_>> {
        Box::pin(async move {
            let rows: Vec<(Uuid, i32, String)> = sqlx::query_as(
                "SELECT rso.stop_id, rso.stop_index, s.name
                 FROM route_stop_orders rso
                 JOIN stops s ON s.id = rso.stop_id
                 WHERE rso.route_id = $1
                 ORDER BY rso.stop_index",
            )
            .bind(route_id.as_uuid())
            .fetch_all(&self.pool)
            .await
            .map_err(storage("Failed to load route stops"))?;

            if rows.is_empty() {
                return Err(CatalogError::NotFound {
                    kind: "route",
                    id: route_id.to_string(),
                });
            }

            rows.into_iter()
                .map(|(stop_id, stop_index, name)| -> Result<RouteStop, CatalogError> {
                    Ok(RouteStop {
                        stop_id: StopId::from_uuid(stop_id),
                        stop_index: to_u32(stop_index, "stop_index").map_err(corrupt("route"))?,
                        name,
                    })
                })
                .collect()
        })
    }

    fn save_vehicle_type(
        &self,
        record: VehicleTypeRecord,
    ) -> Pin<Box<dyn Future<Output = Result<(), CatalogError>> + Send + '_>> {
        Box::pin(async move {
            let invalid = corrupt("vehicle type");
            let layout = &record.layout;
            let doors = layout
                .door_positions
                .iter()
                .map(|&door| to_i32(door, "door position"))
                .collect::<Result<Vec<_>, _>>()
                .map_err(&invalid)?;
            let seat_map = record
                .seat_map
                .as_ref()
                .map(serde_json::to_value)
                .transpose()
                .map_err(|e| invalid(format!("seat map: {e}")))?;

            sqlx::query(
                "INSERT INTO vehicle_types
                 (id, name, seat_count, seat_configuration, door_positions, last_row_seats, seat_map, updated_at)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, now())
                 ON CONFLICT (id) DO UPDATE SET
                     name = EXCLUDED.name,
                     seat_count = EXCLUDED.seat_count,
                     seat_configuration = EXCLUDED.seat_configuration,
                     door_positions = EXCLUDED.door_positions,
                     last_row_seats = EXCLUDED.last_row_seats,
                     seat_map = EXCLUDED.seat_map,
                     updated_at = now()",
            )
            .bind(record.id.as_uuid())
            .bind(&record.name)
            .bind(to_i32(layout.seat_count, "seat_count").map_err(&invalid)?)
            .bind(layout.seat_configuration.to_string())
            .bind(doors)
            .bind(to_i32(layout.last_row_seats, "last_row_seats").map_err(&invalid)?)
            .bind(seat_map)
            .execute(&self.pool)
            .await
            .map_err(storage("Failed to save vehicle type"))?;

            tracing::debug!(vehicle_type_id = %record.id, "Vehicle type stored");
            Ok(())
        })
    }
}
