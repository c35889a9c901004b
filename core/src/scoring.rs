//! Seat desirability scoring.
//!
//! A [`SeatScorer`] turns one candidate seat plus the request context into a
//! score and a short explanation. The default [`ZoneScorer`] combines:
//!
//! 1. **Destination zoning.** Seats are split into `N = max(1, stops - 1)`
//!    equal bands by door-proximity rank. Passengers leaving early are steered
//!    to the band nearest the door, passengers riding to the end to the
//!    farthest band.
//! 2. **Refinement inside the zone.** Aisle beats window beats middle. Long
//!    trips favour rear rows and avoid door-adjacent seats. Medium trips favour
//!    the middle of their band.
//! 3. **Egress on short hops.** For one-hop or short trips the quickest exit
//!    (door-side aisle, other aisle, window, middle) outranks everything else.
//! 4. **Anti-blocking.** A seat whose aisle-side neighbour is held by someone
//!    alighting at a different stop is penalized.

use crate::geometry::{Seat, SeatGeometryIndex, SeatKind};
use crate::occupancy::OccupancySegmentIndex;
use crate::types::Segment;
use serde::{Deserialize, Serialize};

/// Destination ratio at or below which a trip counts as short.
pub const SHORT_TRIP_RATIO: f64 = 0.3;

/// Destination ratio above which a trip counts as long.
pub const LONG_TRIP_RATIO: f64 = 0.7;

/// How far along the route the passenger travels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TripLength {
    /// One hop, or destination within the first 30% of the route
    Short,
    /// Between the short and long thresholds
    Medium,
    /// Destination beyond 70% of the route
    Long,
}

impl TripLength {
    /// Classifies a request by its destination's position on the route.
    #[must_use]
    pub fn classify(boarding: u32, destination: u32, total_stops: u32) -> Self {
        let span = total_stops.saturating_sub(1).max(1);
        let ratio = f64::from(destination) / f64::from(span);
        if destination.saturating_sub(boarding) <= 1 || ratio <= SHORT_TRIP_RATIO {
            Self::Short
        } else if ratio > LONG_TRIP_RATIO {
            Self::Long
        } else {
            Self::Medium
        }
    }
}

/// Partition of seats into destination zones by proximity rank.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ZonePlan {
    zones: u32,
    seats: u32,
}

impl ZonePlan {
    /// `max(1, total_stops - 1)` zones over `seat_count` ranks.
    #[must_use]
    pub fn new(total_stops: u32, seat_count: u32) -> Self {
        Self {
            zones: total_stops.saturating_sub(1).max(1),
            seats: seat_count.max(1),
        }
    }

    /// Number of zones.
    #[must_use]
    pub const fn zone_count(&self) -> u32 {
        self.zones
    }

    /// Zone (1-based) of a proximity rank. Zone 1 is nearest the door.
    #[must_use]
    pub fn zone_of(&self, proximity_rank: u32) -> u32 {
        let offset = u64::from(proximity_rank.saturating_sub(1)) * u64::from(self.zones);
        let zone = offset / u64::from(self.seats) + 1;
        u32::try_from(zone).unwrap_or(self.zones).min(self.zones)
    }

    /// Zone a destination index should be seated in.
    #[must_use]
    pub fn target_zone(&self, destination: u32) -> u32 {
        destination.clamp(1, self.zones)
    }

    /// Inclusive proximity-rank range of a zone. `lo > hi` for an empty zone.
    #[must_use]
    pub fn band(&self, zone: u32) -> (u32, u32) {
        let seats = u64::from(self.seats);
        let zones = u64::from(self.zones);
        let lo = (u64::from(zone.saturating_sub(1)) * seats).div_ceil(zones) + 1;
        let hi = (u64::from(zone) * seats).div_ceil(zones);
        (
            u32::try_from(lo).unwrap_or(u32::MAX),
            u32::try_from(hi).unwrap_or(u32::MAX),
        )
    }
}

/// Everything a scorer may look at besides the seat itself.
#[derive(Clone, Copy, Debug)]
pub struct ScoringContext<'a> {
    /// Vehicle geometry
    pub geometry: &'a SeatGeometryIndex,
    /// Current occupancy of the trip
    pub occupancy: &'a OccupancySegmentIndex,
    /// Destination zones for this route and vehicle
    pub zones: ZonePlan,
    /// Interval the new passenger will occupy
    pub requested: Segment,
    /// Trip length class of the request
    pub trip_length: TripLength,
}

/// Score and explanation for one candidate seat.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CandidateScore {
    /// Higher is better
    pub score: i64,
    /// Short human-readable justification
    pub reason: String,
}

/// Scores candidate seats for a suggestion request.
///
/// Implementations must be deterministic: equal inputs give equal scores.
pub trait SeatScorer: Send + Sync {
    /// Scores one available seat.
    fn score_candidate(&self, seat: &Seat, ctx: &ScoringContext<'_>) -> CandidateScore;
}

/// Tunable weights of [`ZoneScorer`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringWeights {
    /// Bonus for a seat in the destination's zone
    pub zone_match_bonus: i64,
    /// Base penalty for a seat outside the destination's zone
    pub zone_miss_base: i64,
    /// Extra penalty per zone of distance
    pub zone_miss_step: i64,
    /// Bonus for aisle seats
    pub aisle_bonus: i64,
    /// Bonus for window seats
    pub window_bonus: i64,
    /// Maximum bonus for the rearmost row on long trips
    pub rear_bonus: i64,
    /// Penalty for seats next to a door on long trips
    pub door_noise_penalty: i64,
    /// Maximum bonus for the centre of the zone band on medium trips
    pub medium_centre_bonus: i64,
    /// Penalty for seats that would block or be blocked by a neighbour
    pub blocking_penalty: i64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            zone_match_bonus: 2000,
            zone_miss_base: 1000,
            zone_miss_step: 500,
            aisle_bonus: 150,
            window_bonus: 50,
            rear_bonus: 100,
            door_noise_penalty: 75,
            medium_centre_bonus: 50,
            blocking_penalty: 200,
        }
    }
}

/// Destination-zone scorer.
#[derive(Clone, Debug, Default)]
pub struct ZoneScorer {
    weights: ScoringWeights,
}

impl ZoneScorer {
    /// Scorer with custom weights.
    #[must_use]
    pub const fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    /// Weights in use.
    #[must_use]
    pub const fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Larger than any spread the zone, refinement and blocking terms can
    /// produce, so one egress tier always outranks the next.
    fn egress_step(&self, zones: u32) -> i64 {
        let w = &self.weights;
        let zone_spread = w.zone_match_bonus + w.zone_miss_base + w.zone_miss_step * i64::from(zones);
        let refinement = w.aisle_bonus.max(w.window_bonus)
            + w.rear_bonus
            + w.door_noise_penalty
            + w.medium_centre_bonus;
        zone_spread + 2 * refinement + w.blocking_penalty + 1
    }

    fn medium_centre_bonus(&self, seat: &Seat, zone: u32, zones: &ZonePlan) -> i64 {
        let (lo, hi) = zones.band(zone);
        let span = hi.saturating_sub(lo).max(1);
        let offset = (2 * seat.proximity_rank).abs_diff(lo + hi).min(span);
        self.weights.medium_centre_bonus * i64::from(span - offset) / i64::from(span)
    }

    fn rear_bonus(&self, seat: &Seat, geometry: &SeatGeometryIndex) -> i64 {
        let last_row = i64::from(geometry.last_row().max(1));
        self.weights.rear_bonus * i64::from(seat.position.row) / last_row
    }
}

/// Whether a non-aisle seat's path to the aisle runs through a passenger
/// whose stop differs from the new passenger's.
fn blocks_neighbour(seat: &Seat, ctx: &ScoringContext<'_>) -> bool {
    seat.kind != SeatKind::Aisle
        && seat.adjacent_aisle_seats.iter().any(|neighbour| {
            ctx.occupancy
                .occupants(*neighbour, ctx.requested)
                .any(|occupant| occupant.segment.to != ctx.requested.to)
        })
}

fn egress_tier(seat: &Seat, geometry: &SeatGeometryIndex) -> i64 {
    match seat.kind {
        SeatKind::Aisle if geometry.is_door_side(seat) => 3,
        SeatKind::Aisle => 2,
        SeatKind::Window => 1,
        SeatKind::Middle => 0,
    }
}

impl SeatScorer for ZoneScorer {
    fn score_candidate(&self, seat: &Seat, ctx: &ScoringContext<'_>) -> CandidateScore {
        let w = &self.weights;
        let mut reasons: Vec<&'static str> = Vec::new();

        let zone = ctx.zones.zone_of(seat.proximity_rank);
        let distance = zone.abs_diff(ctx.zones.target_zone(ctx.requested.to));
        let mut score = if distance == 0 {
            reasons.push("in the zone for this destination");
            w.zone_match_bonus
        } else {
            reasons.push("outside the zone for this destination");
            -(w.zone_miss_base + w.zone_miss_step * i64::from(distance))
        };

        match seat.kind {
            SeatKind::Aisle => {
                score += w.aisle_bonus;
                reasons.push("aisle seat");
            }
            SeatKind::Window => {
                score += w.window_bonus;
                reasons.push("window seat");
            }
            SeatKind::Middle => reasons.push("middle seat"),
        }

        match ctx.trip_length {
            TripLength::Short => {
                let tier = egress_tier(seat, ctx.geometry);
                score += tier * self.egress_step(ctx.zones.zone_count());
                if tier == 3 {
                    reasons.push("door side for a quick exit");
                }
            }
            TripLength::Medium => {
                let bonus = self.medium_centre_bonus(seat, zone, &ctx.zones);
                if bonus > 0 {
                    score += bonus;
                    reasons.push("centre of its zone");
                }
            }
            TripLength::Long => {
                let bonus = self.rear_bonus(seat, ctx.geometry);
                if bonus > 0 {
                    score += bonus;
                    reasons.push("further back for a long ride");
                }
                if matches!(seat.door_distance, Some(d) if d <= 1) {
                    score -= w.door_noise_penalty;
                    reasons.push("next to a door");
                }
            }
        }

        if blocks_neighbour(seat, ctx) {
            score -= w.blocking_penalty;
            reasons.push("aisle neighbour leaves at a different stop");
        }

        CandidateScore {
            score,
            reason: reasons.join(", "),
        }
    }
}
