//! Domain types for the seat inventory engine.
//!
//! Identifiers, seat numbers, stop-index segments, booking policies and the
//! ticket-segment record that describes one passenger's occupancy of a seat.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

// ============================================================================
// Identifiers
// ============================================================================

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            #[doc = concat!("Creates a new random `", stringify!($name), "`")]
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            #[doc = concat!("Create a `", stringify!($name), "` from a `Uuid`")]
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Get the inner UUID
            #[must_use]
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

uuid_id!(
    /// Unique identifier for a scheduled trip
    TripId
);
uuid_id!(
    /// Unique identifier for a route (ordered stop sequence)
    RouteId
);
uuid_id!(
    /// Unique identifier for a vehicle type (seat layout template)
    VehicleTypeId
);
uuid_id!(
    /// Unique identifier for a stop (station)
    StopId
);
uuid_id!(
    /// Unique identifier for an issued ticket
    TicketId
);

// ============================================================================
// Seats and segments
// ============================================================================

/// A seat number, `1..=seat_count` within a vehicle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeatNumber(u32);

impl SeatNumber {
    /// Wraps a raw seat number.
    #[must_use]
    pub const fn new(number: u32) -> Self {
        Self(number)
    }

    /// The raw number.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for SeatNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for SeatNumber {
    fn from(number: u32) -> Self {
        Self(number)
    }
}

/// Half-open stop-index interval `[from, to)` occupied by one passenger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Segment {
    /// Boarding stop index (inclusive)
    pub from: u32,
    /// Alighting stop index (exclusive)
    pub to: u32,
}

impl Segment {
    /// Creates a segment without validating `from < to`.
    #[must_use]
    pub const fn new(from: u32, to: u32) -> Self {
        Self { from, to }
    }

    /// A segment covering no stops.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.from >= self.to
    }

    /// Half-open overlap: `[a,b)` and `[c,d)` overlap iff `a < d && c < b`.
    #[must_use]
    pub const fn overlaps(&self, other: &Self) -> bool {
        self.from < other.to && other.from < self.to
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.from, self.to)
    }
}

// ============================================================================
// Trip policies
// ============================================================================

/// Seat reuse rule of a trip. Fixed once tickets exist.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingPolicy {
    /// No seat assignment and no suggestions
    Bulk,
    /// One active segment per seat, never reused
    SeatAssignment,
    /// Several non-overlapping segments per seat
    SemiIntelligent,
}

impl BookingPolicy {
    /// Wire/database name of the policy.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bulk => "bulk",
            Self::SeatAssignment => "seat_assignment",
            Self::SemiIntelligent => "semi_intelligent",
        }
    }

    /// Whether passengers hold numbered seats under this policy.
    #[must_use]
    pub const fn assigns_seats(self) -> bool {
        !matches!(self, Self::Bulk)
    }
}

impl fmt::Display for BookingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown policy or sales-control name.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {kind}: {value}")]
pub struct ParseEnumError {
    /// What was being parsed
    pub kind: &'static str,
    /// The rejected input
    pub value: String,
}

impl FromStr for BookingPolicy {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bulk" => Ok(Self::Bulk),
            "seat_assignment" => Ok(Self::SeatAssignment),
            "semi_intelligent" => Ok(Self::SemiIntelligent),
            other => Err(ParseEnumError {
                kind: "booking policy",
                value: other.to_string(),
            }),
        }
    }
}

/// Whether a trip sells tickets from intermediate stops.
///
/// A closed trip only sells tickets boarding at the route origin.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SalesControl {
    /// Tickets may board at any stop
    Open,
    /// Tickets board at the origin only
    #[default]
    Closed,
}

impl SalesControl {
    /// Wire/database name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }
}

impl FromStr for SalesControl {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(Self::Open),
            "closed" => Ok(Self::Closed),
            other => Err(ParseEnumError {
                kind: "sales control",
                value: other.to_string(),
            }),
        }
    }
}

// ============================================================================
// Occupancy records
// ============================================================================

/// One passenger's occupancy of one seat over a stop interval.
///
/// Created together with ticket issuance, removed on cancellation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketSegment {
    /// Ticket owning this segment
    pub ticket_id: TicketId,
    /// Trip the ticket belongs to
    pub trip_id: TripId,
    /// Occupied seat
    pub seat: SeatNumber,
    /// Occupied stop interval
    pub segment: Segment,
    /// Alighting stop
    pub destination_stop: StopId,
    /// When the ticket was issued
    pub issued_at: DateTime<Utc>,
}
