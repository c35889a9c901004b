//! Application state for Axum handlers.

use crate::config::TicketSettings;
use axum::extract::FromRef;
use seatplan_core::SeatEngine;
use std::sync::Arc;

/// Application state shared across all HTTP handlers.
///
/// Cloned (cheaply via `Arc`) for each request. The engine owns the catalog
/// and occupancy store it was built with, so handlers never touch storage
/// directly.
#[derive(Clone)]
pub struct AppState {
    /// Seat engine for every trip
    pub engine: Arc<SeatEngine>,
    /// Ticket printing settings, read-only
    pub ticket_settings: Arc<TicketSettings>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(engine: Arc<SeatEngine>, ticket_settings: TicketSettings) -> Self {
        Self {
            engine,
            ticket_settings: Arc::new(ticket_settings),
        }
    }
}

impl FromRef<AppState> for Arc<SeatEngine> {
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.engine)
    }
}

impl FromRef<AppState> for Arc<TicketSettings> {
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.ticket_settings)
    }
}
