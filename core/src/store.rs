//! Durable per-trip occupancy.
//!
//! An [`OccupancyStore`] owns the ticket-segments of every trip. Its write
//! operation is the only place where the no-overlap invariant is enforced
//! against concurrent writers, so implementations must run the check and the
//! insert as one atomic unit per trip:
//!
//! - `PostgresOccupancyStore` locks the trip row (`SELECT ... FOR UPDATE`)
//!   and checks inside the transaction.
//! - `InMemoryOccupancyStore` holds one mutex across check and insert.

use crate::error::StoreError;
use crate::types::{BookingPolicy, TicketId, TicketSegment, TripId};
use std::future::Future;
use std::pin::Pin;

/// Storage for ticket-segments with atomic batch reservation.
pub trait OccupancyStore: Send + Sync {
    /// Load the active segments of a trip.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Storage`] on storage failure.
    fn load_segments(
        &self,
        trip_id: TripId,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<TicketSegment>, StoreError>> + Send + '_>>;

    /// Atomically check and insert every segment, or none.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Conflict`] if any seat is unavailable under `policy`;
    ///   nothing is written
    /// - [`StoreError::TripNotFound`] if the trip does not exist
    /// - [`StoreError::Storage`] on storage failure
    fn reserve_segments(
        &self,
        trip_id: TripId,
        policy: BookingPolicy,
        segments: Vec<TicketSegment>,
    ) -> Pin<Box<dyn Future<Output = Result<(), StoreError>> + Send + '_>>;

    /// Delete a ticket's segment, returning it if it existed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Storage`] on storage failure.
    fn release_ticket(
        &self,
        ticket_id: TicketId,
    ) -> Pin<Box<dyn Future<Output = Result<Option<TicketSegment>, StoreError>> + Send + '_>>;
}
