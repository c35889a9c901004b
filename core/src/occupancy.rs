//! Per-trip seat occupancy over stop intervals.
//!
//! [`OccupancySegmentIndex`] holds the active ticket-segments of one trip and
//! answers availability questions under a [`BookingPolicy`]:
//!
//! - `seat_assignment`: a seat with any active segment is taken for the
//!   rest of the trip.
//! - `semi_intelligent`: a seat is free for `[from, to)` when none of its
//!   segments overlap that interval.
//! - `bulk`: seats are never checked.
//!
//! Writes go through [`reserve`](OccupancySegmentIndex::reserve) and
//! [`reserve_batch`](OccupancySegmentIndex::reserve_batch), which check and
//! insert in one step so that the non-overlap invariant holds. Stores run
//! these inside their own critical section or transaction.

use crate::error::SeatConflict;
use crate::types::{BookingPolicy, SeatNumber, Segment, TicketId, TicketSegment};
use std::collections::{BTreeMap, HashMap};

/// Active ticket-segments of one trip, grouped by seat.
#[derive(Clone, Debug, Default)]
pub struct OccupancySegmentIndex {
    by_seat: BTreeMap<SeatNumber, Vec<TicketSegment>>,
    by_ticket: HashMap<TicketId, SeatNumber>,
}

impl OccupancySegmentIndex {
    /// An empty trip.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds the index from stored segments without re-checking them.
    #[must_use]
    pub fn from_segments(segments: impl IntoIterator<Item = TicketSegment>) -> Self {
        let mut index = Self::new();
        for segment in segments {
            index.insert(segment);
        }
        index
    }

    /// Whether `seat` can take a passenger for `segment`.
    #[must_use]
    pub fn is_available(&self, seat: SeatNumber, segment: Segment, policy: BookingPolicy) -> bool {
        let active = self.segments_for(seat);
        match policy {
            BookingPolicy::Bulk => true,
            BookingPolicy::SeatAssignment => active.is_empty(),
            BookingPolicy::SemiIntelligent => active.iter().all(|t| !t.segment.overlaps(&segment)),
        }
    }

    /// Checks availability and inserts one segment.
    ///
    /// # Errors
    ///
    /// Returns [`SeatConflict`] if the seat is taken for the interval; the
    /// index is left unchanged.
    pub fn reserve(&mut self, segment: TicketSegment, policy: BookingPolicy) -> Result<(), SeatConflict> {
        self.reserve_batch(vec![segment], policy)
    }

    /// Checks every segment, then inserts all of them or none.
    ///
    /// Seats repeated inside the batch conflict with each other when their
    /// intervals collide under `policy`.
    ///
    /// # Errors
    ///
    /// Returns [`SeatConflict`] listing every seat that could not be taken;
    /// nothing is inserted.
    pub fn reserve_batch(
        &mut self,
        segments: Vec<TicketSegment>,
        policy: BookingPolicy,
    ) -> Result<(), SeatConflict> {
        if policy.assigns_seats() {
            let mut conflicts = Vec::new();
            for (i, candidate) in segments.iter().enumerate() {
                let collides_in_batch = segments[..i].iter().any(|earlier| {
                    earlier.seat == candidate.seat
                        && (policy == BookingPolicy::SeatAssignment
                            || earlier.segment.overlaps(&candidate.segment))
                });
                if collides_in_batch || !self.is_available(candidate.seat, candidate.segment, policy) {
                    conflicts.push(candidate.seat);
                }
            }
            if !conflicts.is_empty() {
                return Err(SeatConflict::new(conflicts));
            }
        }

        for segment in segments {
            self.insert(segment);
        }
        Ok(())
    }

    /// Removes a cancelled ticket's segment. Unknown tickets are ignored.
    pub fn release(&mut self, ticket_id: TicketId) -> Option<TicketSegment> {
        let seat = self.by_ticket.remove(&ticket_id)?;
        let active = self.by_seat.get_mut(&seat)?;
        let position = active.iter().position(|t| t.ticket_id == ticket_id)?;
        let released = active.remove(position);
        if active.is_empty() {
            self.by_seat.remove(&seat);
        }
        Some(released)
    }

    /// Seats with a segment overlapping `window`, each mapped to the
    /// overlapping occupant that alights first.
    #[must_use]
    pub fn occupied_view(&self, window: Segment) -> BTreeMap<SeatNumber, &TicketSegment> {
        self.by_seat
            .iter()
            .filter_map(|(seat, active)| {
                active
                    .iter()
                    .filter(|t| t.segment.overlaps(&window))
                    .min_by_key(|t| t.segment.to)
                    .map(|nearest| (*seat, nearest))
            })
            .collect()
    }

    /// Occupants of `seat` whose interval overlaps `window`.
    pub fn occupants(&self, seat: SeatNumber, window: Segment) -> impl Iterator<Item = &TicketSegment> {
        self.segments_for(seat)
            .iter()
            .filter(move |t| t.segment.overlaps(&window))
    }

    /// Active segments on a seat.
    #[must_use]
    pub fn segments_for(&self, seat: SeatNumber) -> &[TicketSegment] {
        self.by_seat.get(&seat).map(Vec::as_slice).unwrap_or_default()
    }

    /// Segment belonging to a ticket.
    #[must_use]
    pub fn ticket(&self, ticket_id: TicketId) -> Option<&TicketSegment> {
        let seat = self.by_ticket.get(&ticket_id)?;
        self.segments_for(*seat).iter().find(|t| t.ticket_id == ticket_id)
    }

    /// Number of active segments.
    #[must_use]
    pub fn active_segments(&self) -> usize {
        self.by_ticket.len()
    }

    /// Number of seats holding at least one active segment.
    #[must_use]
    pub fn occupied_seats(&self) -> usize {
        self.by_seat.len()
    }

    /// All active segments, by seat.
    pub fn iter(&self) -> impl Iterator<Item = &TicketSegment> {
        self.by_seat.values().flatten()
    }

    fn insert(&mut self, segment: TicketSegment) {
        self.by_ticket.insert(segment.ticket_id, segment.seat);
        self.by_seat.entry(segment.seat).or_default().push(segment);
    }
}
