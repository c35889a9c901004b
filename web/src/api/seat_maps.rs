//! Seat map generation and vehicle-type storage.
//!
//! - POST /api/seat-maps - Generate a seat map from a configuration
//! - PUT /api/vehicle-types/:id - Store a vehicle type and its generated map

use crate::error::AppError;
use crate::state::AppState;
use axum::{
    Json,
    extract::{Path, State},
};
use seatplan_core::SeatEngine;
use seatplan_core::environment::VehicleTypeRecord;
use seatplan_core::layout::{LayoutConfig, SeatMap};
use seatplan_core::types::VehicleTypeId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Generated seat map.
#[derive(Debug, Serialize, Deserialize)]
pub struct SeatMapResponse {
    /// Seats on the map
    pub seat_count: u32,
    /// Rows of cells, driver row first
    pub seat_map: SeatMap,
}

/// Generate the seat map of a configuration without storing anything.
///
/// ```bash
/// curl -X POST http://localhost:8080/api/seat-maps \
///   -H 'content-type: application/json' \
///   -d '{"seat_count": 50, "seat_configuration": "2+2", "door_positions": [1, 6]}'
/// ```
pub async fn build_seat_map(Json(config): Json<LayoutConfig>) -> Result<Json<SeatMapResponse>, AppError> {
    let seat_map = SeatEngine::build_seat_map(&config)?;
    Ok(Json(SeatMapResponse {
        seat_count: seat_map.seat_count(),
        seat_map,
    }))
}

/// Body of a vehicle-type save.
#[derive(Debug, Deserialize)]
pub struct SaveVehicleTypeRequest {
    /// Display name
    pub name: String,
    /// Seat configuration
    #[serde(flatten)]
    pub layout: LayoutConfig,
}

/// Store a vehicle type with its generated map.
pub async fn save_vehicle_type(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    Json(request): Json<SaveVehicleTypeRequest>,
) -> Result<Json<VehicleTypeRecord>, AppError> {
    let record = state
        .engine
        .save_vehicle_type(VehicleTypeId::from_uuid(id), request.name, request.layout)
        .await?;
    Ok(Json(record))
}
