//! In-memory occupancy store.
//!
//! One mutex guards every trip's [`OccupancySegmentIndex`]; reservation
//! checks and inserts under that lock, which gives the same all-or-nothing,
//! one-winner behaviour as the `PostgreSQL` store's row lock.

#![allow(clippy::unwrap_used)] // Test infrastructure uses unwrap for simplicity
#![allow(clippy::missing_panics_doc)] // Test utilities document panics where critical

use seatplan_core::error::StoreError;
use seatplan_core::occupancy::OccupancySegmentIndex;
use seatplan_core::store::OccupancyStore;
use seatplan_core::types::{BookingPolicy, TicketId, TicketSegment, TripId};
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

/// `HashMap`-backed [`OccupancyStore`] for fast, deterministic tests.
///
/// # Example
///
/// ```
/// use seatplan_testing::InMemoryOccupancyStore;
/// use seatplan_core::types::TripId;
///
/// let store = InMemoryOccupancyStore::new();
/// assert!(store.segments(TripId::new()).is_empty());
/// ```
#[derive(Clone, Debug, Default)]
pub struct InMemoryOccupancyStore {
    trips: Arc<Mutex<HashMap<TripId, OccupancySegmentIndex>>>,
}

impl InMemoryOccupancyStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a trip with existing segments, bypassing availability checks.
    pub fn seed(&self, trip_id: TripId, segments: impl IntoIterator<Item = TicketSegment>) {
        let mut trips = self.trips.lock().unwrap();
        let index = trips.entry(trip_id).or_default();
        for segment in segments {
            // Bulk skips checks, so seeding never fails.
            let _ = index.reserve(segment, BookingPolicy::Bulk);
        }
    }

    /// Active segments of a trip, by seat.
    #[must_use]
    pub fn segments(&self, trip_id: TripId) -> Vec<TicketSegment> {
        self.trips
            .lock()
            .unwrap()
            .get(&trip_id)
            .map(|index| index.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Number of active segments across all trips.
    #[must_use]
    pub fn len(&self) -> usize {
        self.trips
            .lock()
            .unwrap()
            .values()
            .map(OccupancySegmentIndex::active_segments)
            .sum()
    }

    /// Whether no trip holds any segment.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl OccupancyStore for InMemoryOccupancyStore {
    fn load_segments(
        &self,
        trip_id: TripId,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<TicketSegment>, StoreError>> + Send + '_>> {
        Box::pin(async move { Ok(self.segments(trip_id)) })
    }

    fn reserve_segments(
        &self,
        trip_id: TripId,
        policy: BookingPolicy,
        segments: Vec<TicketSegment>,
    ) -> Pin<Box<dyn Future<Output = Result<(), StoreError>> + Send + '_>> {
        Box::pin(async move {
            let mut trips = self.trips.lock().unwrap();
            trips
                .entry(trip_id)
                .or_default()
                .reserve_batch(segments, policy)
                .map_err(StoreError::from)
        })
    }

    fn release_ticket(
        &self,
        ticket_id: TicketId,
    ) -> Pin<Box<dyn Future<Output = Result<Option<TicketSegment>, StoreError>> + Send + '_>> {
        Box::pin(async move {
            let mut trips = self.trips.lock().unwrap();
            Ok(trips.values_mut().find_map(|index| index.release(ticket_id)))
        })
    }
}
