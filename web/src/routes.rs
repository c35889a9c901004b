//! Router configuration.

use crate::api::{health, seat_maps, tickets, trips};
use crate::state::AppState;
use axum::{
    Router,
    routing::{delete, get, post, put},
};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Build the complete Axum router.
///
/// Health check at the root, everything else under `/api`.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/seat-maps", post(seat_maps::build_seat_map))
        .route("/vehicle-types/:id", put(seat_maps::save_vehicle_type))
        .route("/trips/:id/suggestions", get(trips::suggest_seats))
        .route("/trips/:id/seat-map", get(trips::seat_map_view))
        .route("/trips/:id/occupancy", get(trips::occupancy))
        .route("/trips/:id/reservations", post(trips::reserve_seats))
        .route("/tickets/:id", delete(tickets::release_ticket))
        .route("/ticket-settings", get(tickets::ticket_settings));

    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api", api_routes)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}
