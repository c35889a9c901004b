//! Trip seat endpoints.
//!
//! - GET /api/trips/:id/suggestions - Ranked seats for a destination
//! - GET /api/trips/:id/seat-map - Seat map annotated with occupants
//! - GET /api/trips/:id/occupancy - Occupancy statistics
//! - POST /api/trips/:id/reservations - Reserve seats for an interval

use crate::error::AppError;
use crate::state::AppState;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use seatplan_core::service::{OccupancyStats, ReservationRequest};
use seatplan_core::suggestion::SeatSuggestion;
use seatplan_core::types::{SeatNumber, StopId, TicketSegment, TripId};
use seatplan_core::view::SeatMapView;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

fn default_quantity() -> usize {
    1
}

/// Query of the suggestion endpoint.
#[derive(Debug, Deserialize)]
pub struct SuggestionQuery {
    /// Where the passenger alights
    pub destination_stop_id: Uuid,
    /// Where the passenger boards; the route origin when absent
    pub boarding_stop_id: Option<Uuid>,
    /// Seats wanted
    #[serde(default = "default_quantity")]
    pub quantity: usize,
}

/// Ranked seats plus the trip's occupancy.
#[derive(Debug, Serialize, Deserialize)]
pub struct SuggestionResponse {
    /// Best seats first
    pub suggestions: Vec<SeatSuggestion>,
    /// Trip occupancy at the time of the request
    pub stats: OccupancyStats,
}

/// Rank available seats for a passenger.
///
/// ```bash
/// curl 'http://localhost:8080/api/trips/<trip>/suggestions?destination_stop_id=<stop>&quantity=2'
/// ```
pub async fn suggest_seats(
    Path(trip_id): Path<Uuid>,
    Query(query): Query<SuggestionQuery>,
    State(state): State<AppState>,
) -> Result<Json<SuggestionResponse>, AppError> {
    let trip_id = TripId::from_uuid(trip_id);
    let suggestions = state
        .engine
        .suggest_seats(
            trip_id,
            StopId::from_uuid(query.destination_stop_id),
            query.quantity,
            query.boarding_stop_id.map(StopId::from_uuid),
        )
        .await?;
    let stats = state.engine.occupancy_stats(trip_id).await?;

    Ok(Json(SuggestionResponse { suggestions, stats }))
}

/// Query of the seat-map endpoint.
#[derive(Debug, Deserialize)]
pub struct SeatMapQuery {
    /// Window start; the route origin when absent
    pub from_stop_id: Option<Uuid>,
    /// Window end; the route terminus when absent
    pub to_stop_id: Option<Uuid>,
}

/// Seat map annotated with who holds each seat during the window.
pub async fn seat_map_view(
    Path(trip_id): Path<Uuid>,
    Query(query): Query<SeatMapQuery>,
    State(state): State<AppState>,
) -> Result<Json<SeatMapView>, AppError> {
    let view = state
        .engine
        .seat_map_view(
            TripId::from_uuid(trip_id),
            query.from_stop_id.map(StopId::from_uuid),
            query.to_stop_id.map(StopId::from_uuid),
        )
        .await?;
    Ok(Json(view))
}

/// Occupancy statistics of a trip.
pub async fn occupancy(
    Path(trip_id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<OccupancyStats>, AppError> {
    Ok(Json(state.engine.occupancy_stats(TripId::from_uuid(trip_id)).await?))
}

/// Body of a reservation.
#[derive(Debug, Deserialize)]
pub struct ReserveSeatsRequest {
    /// Seats, one ticket each
    pub seats: Vec<SeatNumber>,
    /// Boarding stop
    pub from_stop_id: Uuid,
    /// Alighting stop
    pub to_stop_id: Uuid,
}

/// Issued tickets.
#[derive(Debug, Serialize, Deserialize)]
pub struct ReserveSeatsResponse {
    /// One segment per reserved seat
    pub tickets: Vec<TicketSegment>,
}

/// Reserve every requested seat, or none.
///
/// Returns 201 with the issued tickets, 409 with the unavailable seats, or
/// 422 for an invalid seat or stop.
pub async fn reserve_seats(
    Path(trip_id): Path<Uuid>,
    State(state): State<AppState>,
    Json(request): Json<ReserveSeatsRequest>,
) -> Result<(StatusCode, Json<ReserveSeatsResponse>), AppError> {
    let tickets = state
        .engine
        .reserve_seats(ReservationRequest {
            trip_id: TripId::from_uuid(trip_id),
            seats: request.seats,
            from_stop: StopId::from_uuid(request.from_stop_id),
            to_stop: StopId::from_uuid(request.to_stop_id),
        })
        .await?;
    Ok((StatusCode::CREATED, Json(ReserveSeatsResponse { tickets })))
}
