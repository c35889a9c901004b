//! Error taxonomy for the seat engine.
//!
//! Configuration problems (`LayoutError`, `RouteError`) surface when a vehicle
//! type or route is saved. Occupancy conflicts are expected and frequent; they
//! travel as the typed [`SeatConflict`] value rather than as a storage failure.

use crate::types::{SeatNumber, StopId, TripId, VehicleTypeId};
use thiserror::Error;

/// A seat layout configuration the builder cannot satisfy, or a stored seat
/// map that breaks the numbering invariant.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// Seat count must be positive.
    #[error("seat count must be positive")]
    NoSeats,

    /// Configuration string is not `left+right`.
    #[error("seat configuration must look like \"2+2\", got {0:?}")]
    InvalidConfiguration(String),

    /// Each side of the aisle needs at least one column.
    #[error("both column groups must be positive, got {left}+{right}")]
    NonPositiveColumns {
        /// Columns left of the aisle
        left: u32,
        /// Columns right of the aisle
        right: u32,
    },

    /// Seat count above the supported maximum.
    #[error("seat count {seat_count} exceeds the maximum of {max}")]
    TooManySeats {
        /// Declared seat count
        seat_count: u32,
        /// Largest accepted seat count
        max: u32,
    },

    /// A column group wider than the supported maximum.
    #[error("column groups {left}+{right} exceed the maximum of {max} per side")]
    TooManyColumns {
        /// Columns left of the aisle
        left: u32,
        /// Columns right of the aisle
        right: u32,
        /// Largest accepted group
        max: u32,
    },

    /// The last row needs at least one seat.
    #[error("last row must hold at least one seat")]
    EmptyLastRow,

    /// Stored map holds a different number of seats than declared.
    #[error("seat map holds {actual} seats, expected {expected}")]
    SeatCountMismatch {
        /// Declared seat count
        expected: u32,
        /// Seats found in the map
        actual: u32,
    },

    /// Stored map numbers are not exactly `1..=seat_count`.
    #[error("seat number {0} is duplicated or out of sequence")]
    BadSeatNumber(SeatNumber),
}

/// A route whose stop ordering is not usable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    /// Route has no stops.
    #[error("route has no stops")]
    Empty,

    /// Stop indices must run `0, 1, 2, ...` without gaps.
    #[error("stop index {found} found where {expected} was expected")]
    NonContiguous {
        /// The next index that should appear
        expected: u32,
        /// The index that appeared instead
        found: u32,
    },

    /// A stop appears twice on the route.
    #[error("stop {0} appears more than once")]
    DuplicateStop(StopId),
}

/// Requested seats are not available for the requested interval.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("seats unavailable for the requested interval: {}", join_seats(.seats))]
pub struct SeatConflict {
    /// Conflicting seats, ascending
    pub seats: Vec<SeatNumber>,
}

impl SeatConflict {
    /// Builds a conflict report, sorting and de-duplicating the seats.
    #[must_use]
    pub fn new(mut seats: Vec<SeatNumber>) -> Self {
        seats.sort_unstable();
        seats.dedup();
        Self { seats }
    }
}

fn join_seats(seats: &[SeatNumber]) -> String {
    seats
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Errors from an occupancy store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Atomic check-and-insert found a conflicting segment; nothing was written.
    #[error(transparent)]
    Conflict(#[from] SeatConflict),

    /// Trip row does not exist in the store.
    #[error("trip not found: {0}")]
    TripNotFound(TripId),

    /// Database failure.
    #[error("storage error: {0}")]
    Storage(String),
}

/// Errors from the trip/vehicle/route catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Record is missing.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Kind of record
        kind: &'static str,
        /// Identifier that was looked up
        id: String,
    },

    /// Stored record cannot be decoded.
    #[error("corrupt {kind} record: {message}")]
    Corrupt {
        /// Kind of record
        kind: &'static str,
        /// Decoding failure
        message: String,
    },

    /// Database failure.
    #[error("storage error: {0}")]
    Storage(String),
}

/// Errors surfaced by [`SeatEngine`](crate::service::SeatEngine) operations.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Seats taken for the requested interval. The caller may re-suggest.
    #[error(transparent)]
    SeatConflict(SeatConflict),

    /// Seat number outside `1..=seat_count`.
    #[error("seat {seat} does not exist (vehicle has {seat_count} seats)")]
    InvalidSeatNumber {
        /// Rejected seat
        seat: SeatNumber,
        /// Seats on the vehicle
        seat_count: u32,
    },

    /// Stop is not on the trip's route.
    #[error("stop {0} is not on this route")]
    UnknownStop(StopId),

    /// Request is malformed.
    #[error("validation error: {0}")]
    Validation(String),

    /// Vehicle layout cannot be built or the stored map is inconsistent.
    #[error("malformed configuration: {0}")]
    MalformedConfiguration(#[from] LayoutError),

    /// Route stop ordering is inconsistent.
    #[error("malformed route: {0}")]
    MalformedRoute(#[from] RouteError),

    /// Trip does not exist.
    #[error("trip not found: {0}")]
    TripNotFound(TripId),

    /// Vehicle type does not exist.
    #[error("vehicle type not found: {0}")]
    VehicleTypeNotFound(VehicleTypeId),

    /// Bulk trips sell unnumbered tickets.
    #[error("trip {0} uses bulk sales and has no seat assignment")]
    SeatAssignmentDisabled(TripId),

    /// Booking policy cannot change once tickets exist.
    #[error("trip {trip_id} has {active_segments} active tickets; booking policy is locked")]
    PolicyLocked {
        /// Trip whose policy change was rejected
        trip_id: TripId,
        /// Active ticket segments on the trip
        active_segments: usize,
    },

    /// Occupancy store failure.
    #[error("store error: {0}")]
    Store(StoreError),

    /// Catalog failure.
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

impl From<StoreError> for EngineError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(conflict) => Self::SeatConflict(conflict),
            StoreError::TripNotFound(trip_id) => Self::TripNotFound(trip_id),
            other @ StoreError::Storage(_) => Self::Store(other),
        }
    }
}

impl From<SeatConflict> for EngineError {
    fn from(conflict: SeatConflict) -> Self {
        Self::SeatConflict(conflict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_lists_seats_sorted_and_unique() {
        let conflict = SeatConflict::new(vec![
            SeatNumber::new(7),
            SeatNumber::new(3),
            SeatNumber::new(7),
        ]);
        assert_eq!(conflict.seats, vec![SeatNumber::new(3), SeatNumber::new(7)]);
        assert_eq!(
            conflict.to_string(),
            "seats unavailable for the requested interval: 3, 7"
        );
    }

    #[test]
    fn store_conflict_becomes_engine_conflict() {
        let err: EngineError = StoreError::Conflict(SeatConflict::new(vec![SeatNumber::new(2)])).into();
        assert!(matches!(err, EngineError::SeatConflict(c) if c.seats == vec![SeatNumber::new(2)]));
    }
}
