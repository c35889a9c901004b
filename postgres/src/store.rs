//! Ticket segments in `trip_seat_segments`.

use crate::{RESERVE_TRANSACTION_SECONDS, to_i32, to_u32};
use chrono::{DateTime, Utc};
use seatplan_core::error::StoreError;
use seatplan_core::occupancy::OccupancySegmentIndex;
use seatplan_core::store::OccupancyStore;
use seatplan_core::types::{
    BookingPolicy, SeatNumber, Segment, StopId, TicketId, TicketSegment, TripId,
};
use sqlx::{PgExecutor, PgPool};
use std::future::Future;
use std::pin::Pin;
use std::time::Instant;
use uuid::Uuid;

type SegmentRow = (Uuid, Uuid, i32, i32, i32, Uuid, DateTime<Utc>);

fn storage(context: &str) -> impl Fn(sqlx::Error) -> StoreError + '_ {
    move |e| StoreError::Storage(format!("{context}: {e}"))
}

fn decode(row: SegmentRow) -> Result<TicketSegment, StoreError> {
    let (ticket_id, trip_id, seat, from, to, destination, issued_at) = row;
    Ok(TicketSegment {
        ticket_id: TicketId::from_uuid(ticket_id),
        trip_id: TripId::from_uuid(trip_id),
        seat: SeatNumber::new(to_u32(seat, "seat_number").map_err(StoreError::Storage)?),
        segment: Segment::new(
            to_u32(from, "from_index").map_err(StoreError::Storage)?,
            to_u32(to, "to_index").map_err(StoreError::Storage)?,
        ),
        destination_stop: StopId::from_uuid(destination),
        issued_at,
    })
}

async fn fetch_segments<'e>(
    executor: impl PgExecutor<'e>,
    trip_id: TripId,
) -> Result<Vec<TicketSegment>, StoreError> {
    let rows: Vec<SegmentRow> = sqlx::query_as(
        "SELECT ticket_id, trip_id, seat_number, from_index, to_index, destination_stop_id, issued_at
         FROM trip_seat_segments
         WHERE trip_id = $1
         ORDER BY seat_number, from_index",
    )
    .bind(trip_id.as_uuid())
    .fetch_all(executor)
    .await
    .map_err(storage("Failed to load segments"))?;

    rows.into_iter().map(decode).collect()
}

/// `PostgreSQL`-backed [`OccupancyStore`].
///
/// Reservation runs in one transaction that first locks the trip row with
/// `SELECT ... FOR UPDATE`. Concurrent writers for the same trip queue on
/// that lock, so each one checks availability against everything committed
/// before it; writers for different trips do not contend.
#[derive(Clone)]
pub struct PostgresOccupancyStore {
    pool: PgPool,
}

impl PostgresOccupancyStore {
    /// Create a store over an existing connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Access the underlying connection pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn reserve_locked(
        &self,
        trip_id: TripId,
        policy: BookingPolicy,
        segments: Vec<TicketSegment>,
    ) -> Result<(), StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(storage("Failed to start transaction"))?;

        let locked: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM trips WHERE id = $1 FOR UPDATE")
            .bind(trip_id.as_uuid())
            .fetch_optional(&mut *tx)
            .await
            .map_err(storage("Failed to lock trip"))?;
        if locked.is_none() {
            return Err(StoreError::TripNotFound(trip_id));
        }

        // Dropping `tx` on any early return rolls the transaction back.
        let mut index = OccupancySegmentIndex::from_segments(fetch_segments(&mut *tx, trip_id).await?);
        index.reserve_batch(segments.clone(), policy)?;

        for segment in &segments {
            sqlx::query(
                "INSERT INTO trip_seat_segments
                 (ticket_id, trip_id, seat_number, from_index, to_index, destination_stop_id, issued_at)
                 VALUES ($1, $2, $3, $4, $5, $6, $7)",
            )
            .bind(segment.ticket_id.as_uuid())
            .bind(trip_id.as_uuid())
            .bind(to_i32(segment.seat.get(), "seat_number").map_err(StoreError::Storage)?)
            .bind(to_i32(segment.segment.from, "from_index").map_err(StoreError::Storage)?)
            .bind(to_i32(segment.segment.to, "to_index").map_err(StoreError::Storage)?)
            .bind(segment.destination_stop.as_uuid())
            .bind(segment.issued_at)
            .execute(&mut *tx)
            .await
            .map_err(storage("Failed to insert segment"))?;
        }

        tx.commit().await.map_err(storage("Failed to commit reservation"))?;
        Ok(())
    }
}

impl OccupancyStore for PostgresOccupancyStore {
    fn load_segments(
        &self,
        trip_id: TripId,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<TicketSegment>, StoreError>> + Send + '_>> {
        Box::pin(async move { fetch_segments(&self.pool, trip_id).await })
    }

    fn reserve_segments(
        &self,
        trip_id: TripId,
        policy: BookingPolicy,
        segments: Vec<TicketSegment>,
    ) -> Pin<Box<dyn Future<Output = Result<(), StoreError>> + Send + '_>> {
        Box::pin(async move {
            let started = Instant::now();
            let result = self.reserve_locked(trip_id, policy, segments).await;
            metrics::histogram!(RESERVE_TRANSACTION_SECONDS).record(started.elapsed().as_secs_f64());
            if let Err(StoreError::Conflict(conflict)) = &result {
                tracing::debug!(trip_id = %trip_id, seats = ?conflict.seats, "Reservation rolled back");
            }
            result
        })
    }

    fn release_ticket(
        &self,
        ticket_id: TicketId,
    ) -> Pin<Box<dyn Future<Output = Result<Option<TicketSegment>, StoreError>> + Send + '_>> {
        Box::pin(async move {
            let row: Option<SegmentRow> = sqlx::query_as(
                "DELETE FROM trip_seat_segments
                 WHERE ticket_id = $1
                 RETURNING ticket_id, trip_id, seat_number, from_index, to_index, destination_stop_id, issued_at",
            )
            .bind(ticket_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(storage("Failed to release ticket"))?;

            row.map(decode).transpose()
        })
    }
}
