//! Ticket endpoints.
//!
//! - DELETE /api/tickets/:id - Cancel a ticket and free its seat
//! - GET /api/ticket-settings - Ticket printing settings

use crate::config::TicketSettings;
use crate::error::AppError;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use seatplan_core::SeatEngine;
use seatplan_core::types::TicketId;
use std::sync::Arc;
use uuid::Uuid;

/// Free the seat held by a ticket. Unknown tickets also return 204.
pub async fn release_ticket(
    Path(ticket_id): Path<Uuid>,
    State(engine): State<Arc<SeatEngine>>,
) -> Result<StatusCode, AppError> {
    engine.release_seat(TicketId::from_uuid(ticket_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Ticket printing settings.
pub async fn ticket_settings(State(settings): State<Arc<TicketSettings>>) -> Json<TicketSettings> {
    Json(settings.as_ref().clone())
}
