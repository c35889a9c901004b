//! Ranked seat suggestions.
//!
//! [`SuggestionEngine::suggest`] is a pure read-side computation: it filters
//! the vehicle's seats down to those available for the requested interval,
//! scores each with a [`SeatScorer`], and returns the best `quantity` seats.
//! A suggestion is advisory. Reservation re-checks availability.

use crate::geometry::SeatGeometryIndex;
use crate::occupancy::OccupancySegmentIndex;
use crate::scoring::{ScoringContext, ScoringWeights, SeatScorer, TripLength, ZonePlan, ZoneScorer};
use crate::types::{BookingPolicy, SeatNumber, Segment};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Resolved stop indices of a suggestion request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SuggestionRequest {
    /// Boarding stop index, 0 = origin
    pub boarding: u32,
    /// Alighting stop index
    pub destination: u32,
    /// Maximum number of seats to return
    pub quantity: usize,
}

impl SuggestionRequest {
    /// Interval the new passenger would occupy. A destination at or before
    /// the boarding stop is widened to one hop.
    #[must_use]
    pub fn segment(&self) -> Segment {
        Segment::new(self.boarding, self.destination.max(self.boarding + 1))
    }
}

/// One suggested seat.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatSuggestion {
    /// Suggested seat
    pub seat_number: SeatNumber,
    /// Desirability, higher is better
    pub score: i64,
    /// Why this seat was picked
    pub reason: String,
}

/// Ranks available seats for a trip.
#[derive(Clone)]
pub struct SuggestionEngine {
    scorer: Arc<dyn SeatScorer>,
}

impl SuggestionEngine {
    /// Engine using a custom scorer.
    #[must_use]
    pub fn new(scorer: Arc<dyn SeatScorer>) -> Self {
        Self { scorer }
    }

    /// Engine using [`ZoneScorer`] with the given weights.
    #[must_use]
    pub fn with_weights(weights: ScoringWeights) -> Self {
        Self::new(Arc::new(ZoneScorer::new(weights)))
    }

    /// Suggests up to `request.quantity` seats, best first, ties by seat
    /// number. Bulk trips get an empty list.
    #[must_use]
    pub fn suggest(
        &self,
        policy: BookingPolicy,
        geometry: &SeatGeometryIndex,
        total_stops: u32,
        occupancy: &OccupancySegmentIndex,
        request: SuggestionRequest,
    ) -> Vec<SeatSuggestion> {
        if !policy.assigns_seats() || request.quantity == 0 {
            return Vec::new();
        }

        let requested = request.segment();
        let ctx = ScoringContext {
            geometry,
            occupancy,
            zones: ZonePlan::new(total_stops, geometry.seat_count()),
            requested,
            trip_length: TripLength::classify(request.boarding, requested.to, total_stops),
        };

        let mut ranked: Vec<SeatSuggestion> = geometry
            .seats()
            .iter()
            .filter(|seat| occupancy.is_available(seat.number, requested, policy))
            .map(|seat| {
                let scored = self.scorer.score_candidate(seat, &ctx);
                SeatSuggestion {
                    seat_number: seat.number,
                    score: scored.score,
                    reason: scored.reason,
                }
            })
            .collect();

        ranked.sort_by(|a, b| b.score.cmp(&a.score).then(a.seat_number.cmp(&b.seat_number)));
        ranked.truncate(request.quantity);
        ranked
    }
}

impl Default for SuggestionEngine {
    fn default() -> Self {
        Self::new(Arc::new(ZoneScorer::default()))
    }
}

impl std::fmt::Debug for SuggestionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SuggestionEngine").finish_non_exhaustive()
    }
}
