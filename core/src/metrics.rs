//! Prometheus metrics recorded by the seat engine.
//!
//! # Exported Metrics
//!
//! ## Counters
//! - `seatplan_reservations_total{status}` - Reservation attempts by outcome
//!   (`reserved`, `conflict`, `rejected`)
//! - `seatplan_seats_reserved_total` - Seats successfully reserved
//! - `seatplan_releases_total{status}` - Release calls (`released`, `unknown`)
//! - `seatplan_suggestions_total{policy}` - Suggestion requests by booking policy
//!
//! ## Histograms
//! - `seatplan_suggestion_candidates` - Seats returned per suggestion request

use metrics::{describe_counter, describe_histogram};

/// Reservation attempts by outcome.
pub const RESERVATIONS_TOTAL: &str = "seatplan_reservations_total";
/// Seats reserved.
pub const SEATS_RESERVED_TOTAL: &str = "seatplan_seats_reserved_total";
/// Release calls.
pub const RELEASES_TOTAL: &str = "seatplan_releases_total";
/// Suggestion requests.
pub const SUGGESTIONS_TOTAL: &str = "seatplan_suggestions_total";
/// Suggestions returned per request.
pub const SUGGESTION_CANDIDATES: &str = "seatplan_suggestion_candidates";

/// Register metric descriptions. Call once at startup, before recording.
pub fn register_engine_metrics() {
    describe_counter!(
        RESERVATIONS_TOTAL,
        "Total reservation attempts by status (reserved, conflict, rejected)"
    );
    describe_counter!(SEATS_RESERVED_TOTAL, "Total seats reserved");
    describe_counter!(
        RELEASES_TOTAL,
        "Total ticket releases by status (released, unknown)"
    );
    describe_counter!(SUGGESTIONS_TOTAL, "Total seat suggestion requests by booking policy");
    describe_histogram!(
        SUGGESTION_CANDIDATES,
        "Number of seats returned per suggestion request"
    );

    tracing::info!("Seat engine metrics registered");
}
