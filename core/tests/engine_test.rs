//! Seat engine operations over in-memory collaborators.
//!
//! Run with: `cargo test --test engine_test`

#![allow(clippy::expect_used, clippy::unwrap_used)]

use seatplan_core::environment::{Clock, VehicleTypeRecord};
use seatplan_core::error::LayoutError;
use seatplan_core::layout::{ColumnSplit, LayoutConfig, SeatCell, SeatMap};
use seatplan_core::types::{BookingPolicy, SalesControl, SeatNumber, StopId, TicketId, TripId};
use seatplan_core::{EngineError, SeatEngine};
use seatplan_testing::{TestTrip, init_test_tracing, test_clock};

const STOPS: &[&str] = &["Lomé", "Tsévié", "Notsé"];

fn small_coach() -> LayoutConfig {
    LayoutConfig::new(8, ColumnSplit::new(2, 2)).with_doors([1])
}

fn seats(numbers: &[SeatNumber]) -> Vec<u32> {
    numbers.iter().map(|n| n.get()).collect()
}

#[test]
fn build_seat_map_rejects_malformed_configuration() {
    let err = SeatEngine::build_seat_map(&LayoutConfig::new(12, ColumnSplit::new(2, 0))).unwrap_err();
    assert!(matches!(
        err,
        EngineError::MalformedConfiguration(LayoutError::NonPositiveColumns { left: 2, right: 0 })
    ));

    let map = SeatEngine::build_seat_map(&small_coach()).unwrap();
    assert_eq!(map.seat_count(), 8);
}

#[tokio::test]
async fn one_hop_suggestion_prefers_door_side_aisle() {
    init_test_tracing();
    let trip = TestTrip::new(BookingPolicy::SeatAssignment, small_coach(), STOPS);

    let ranked = trip
        .engine
        .suggest_seats(trip.trip.id, trip.stop(1), 3, None)
        .await
        .unwrap();

    let numbers: Vec<u32> = ranked.iter().map(|s| s.seat_number.get()).collect();
    assert_eq!(numbers, vec![3, 1, 4]);
    assert!(!ranked[0].reason.is_empty());
}

#[tokio::test]
async fn bulk_trip_suggests_nothing_and_refuses_seats() {
    let trip = TestTrip::new(BookingPolicy::Bulk, small_coach(), STOPS);

    let ranked = trip
        .engine
        .suggest_seats(trip.trip.id, trip.stop(2), 4, None)
        .await
        .unwrap();
    assert!(ranked.is_empty());

    let err = trip.engine.reserve_seats(trip.reservation(&[1], 0, 2)).await.unwrap_err();
    assert!(matches!(err, EngineError::SeatAssignmentDisabled(id) if id == trip.trip.id));
}

#[tokio::test]
async fn unknown_destination_falls_back_to_origin_for_suggestions() {
    let trip = TestTrip::new(BookingPolicy::SeatAssignment, small_coach(), STOPS);

    let ranked = trip
        .engine
        .suggest_seats(trip.trip.id, StopId::new(), 8, None)
        .await
        .unwrap();
    assert_eq!(ranked.len(), 8);
}

#[tokio::test]
async fn reserved_seat_is_no_longer_suggested_and_conflicts() {
    let trip = TestTrip::new(BookingPolicy::SeatAssignment, small_coach(), STOPS);

    let best = trip
        .engine
        .suggest_seats(trip.trip.id, trip.stop(2), 1, None)
        .await
        .unwrap()
        .remove(0);
    let tickets = trip
        .engine
        .reserve_seats(trip.reservation(&[best.seat_number.get()], 0, 2))
        .await
        .unwrap();
    assert_eq!(tickets.len(), 1);
    assert_eq!(tickets[0].issued_at, test_clock().now());

    let again = trip
        .engine
        .suggest_seats(trip.trip.id, trip.stop(2), 8, None)
        .await
        .unwrap();
    assert_eq!(again.len(), 7);
    assert!(again.iter().all(|s| s.seat_number != best.seat_number));

    let err = trip
        .engine
        .reserve_seats(trip.reservation(&[best.seat_number.get()], 0, 1))
        .await
        .unwrap_err();
    match err {
        EngineError::SeatConflict(conflict) => assert_eq!(conflict.seats, vec![best.seat_number]),
        other => panic!("expected conflict, got {other:?}"),
    }
}

#[tokio::test]
async fn semi_intelligent_reuses_seat_after_alighting() {
    let trip = TestTrip::new(BookingPolicy::SemiIntelligent, small_coach(), STOPS);
    trip.engine.reserve_seats(trip.reservation(&[5], 0, 1)).await.unwrap();

    let later = trip
        .engine
        .suggest_seats(trip.trip.id, trip.stop(2), 8, Some(trip.stop(1)))
        .await
        .unwrap();
    assert!(later.iter().any(|s| s.seat_number.get() == 5));

    let from_origin = trip
        .engine
        .suggest_seats(trip.trip.id, trip.stop(2), 8, None)
        .await
        .unwrap();
    assert!(from_origin.iter().all(|s| s.seat_number.get() != 5));

    trip.engine.reserve_seats(trip.reservation(&[5], 1, 2)).await.unwrap();
    assert_eq!(trip.store.segments(trip.trip.id).len(), 2);
}

#[tokio::test]
async fn batch_with_one_taken_seat_reserves_nothing() {
    let trip = TestTrip::new(BookingPolicy::SeatAssignment, small_coach(), STOPS);
    trip.engine.reserve_seats(trip.reservation(&[2], 0, 2)).await.unwrap();

    let err = trip
        .engine
        .reserve_seats(trip.reservation(&[1, 2, 3], 0, 1))
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::SeatConflict(ref c) if seats(&c.seats) == vec![2]));
    assert_eq!(trip.store.segments(trip.trip.id).len(), 1);
}

#[tokio::test]
async fn rejects_invalid_requests_before_touching_the_store() {
    let trip = TestTrip::new(BookingPolicy::SeatAssignment, small_coach(), STOPS);

    let err = trip.engine.reserve_seats(trip.reservation(&[9], 0, 2)).await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidSeatNumber { seat, seat_count: 8 } if seat.get() == 9));

    let err = trip.engine.reserve_seats(trip.reservation(&[0], 0, 2)).await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidSeatNumber { .. }));

    let mut request = trip.reservation(&[1], 0, 2);
    let stranger = StopId::new();
    request.to_stop = stranger;
    let err = trip.engine.reserve_seats(request).await.unwrap_err();
    assert!(matches!(err, EngineError::UnknownStop(id) if id == stranger));

    let err = trip.engine.reserve_seats(trip.reservation(&[1], 2, 1)).await.unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));

    let err = trip.engine.reserve_seats(trip.reservation(&[1, 1], 0, 2)).await.unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));

    let err = trip.engine.reserve_seats(trip.reservation(&[], 0, 2)).await.unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));

    let too_many: Vec<u32> = (1..=8).collect();
    let big = TestTrip::new(
        BookingPolicy::SeatAssignment,
        LayoutConfig::new(20, ColumnSplit::new(2, 2)),
        STOPS,
    );
    let mut nine = too_many.clone();
    nine.push(9);
    assert!(big.engine.reserve_seats(big.reservation(&too_many, 0, 1)).await.is_ok());
    let err = big.engine.reserve_seats(big.reservation(&nine, 1, 2)).await.unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));

    assert!(trip.store.is_empty());
}

#[tokio::test]
async fn closed_sales_only_board_at_origin() {
    let trip = TestTrip::with_sales_control(
        BookingPolicy::SemiIntelligent,
        small_coach(),
        STOPS,
        SalesControl::Closed,
    );

    let err = trip.engine.reserve_seats(trip.reservation(&[1], 1, 2)).await.unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
    assert!(trip.engine.reserve_seats(trip.reservation(&[1], 0, 2)).await.is_ok());
}

#[tokio::test]
async fn release_frees_the_seat_and_ignores_unknown_tickets() {
    let trip = TestTrip::new(BookingPolicy::SeatAssignment, small_coach(), STOPS);
    let tickets = trip.engine.reserve_seats(trip.reservation(&[6], 0, 2)).await.unwrap();

    trip.engine.release_seat(tickets[0].ticket_id).await.unwrap();
    trip.engine.release_seat(TicketId::new()).await.unwrap();

    assert!(trip.store.is_empty());
    assert!(trip.engine.reserve_seats(trip.reservation(&[6], 0, 1)).await.is_ok());
}

#[tokio::test]
async fn seat_map_view_counts_and_windows() {
    let trip = TestTrip::new(BookingPolicy::SemiIntelligent, small_coach(), STOPS);

    let empty = trip.engine.seat_map_view(trip.trip.id, None, None).await.unwrap();
    assert_eq!(empty.occupied_seats_count, 0);
    assert_eq!(empty.available_seats_count, 8);

    trip.engine.reserve_seats(trip.reservation(&[4], 0, 1)).await.unwrap();
    trip.engine.reserve_seats(trip.reservation(&[7], 1, 2)).await.unwrap();

    let whole = trip.engine.seat_map_view(trip.trip.id, None, None).await.unwrap();
    assert_eq!(whole.occupied_seats_count, 2);
    assert_eq!(whole.available_seats_count, 6);

    let second_leg = trip
        .engine
        .seat_map_view(trip.trip.id, Some(trip.stop(1)), Some(trip.stop(2)))
        .await
        .unwrap();
    assert_eq!(second_leg.occupied_seats_count, 1);
}

#[tokio::test]
async fn occupancy_stats_reports_rate() {
    let trip = TestTrip::new(BookingPolicy::SeatAssignment, small_coach(), STOPS);
    trip.engine.reserve_seats(trip.reservation(&[1, 2], 0, 2)).await.unwrap();

    let stats = trip.engine.occupancy_stats(trip.trip.id).await.unwrap();
    assert_eq!(stats.total_seats, 8);
    assert_eq!(stats.occupied_seats, 2);
    assert_eq!(stats.available_seats, 6);
    assert!((stats.occupancy_rate - 25.0).abs() < f64::EPSILON);
    assert_eq!(stats.booking_type, BookingPolicy::SeatAssignment);
    assert_eq!(stats.vehicle_type, "Test coach");
}

#[tokio::test]
async fn policy_is_locked_once_tickets_exist() {
    let trip = TestTrip::new(BookingPolicy::SeatAssignment, small_coach(), STOPS);

    assert!(trip
        .engine
        .check_policy_change(trip.trip.id, BookingPolicy::SemiIntelligent)
        .await
        .is_ok());

    trip.engine.reserve_seats(trip.reservation(&[3], 0, 1)).await.unwrap();

    let err = trip
        .engine
        .check_policy_change(trip.trip.id, BookingPolicy::Bulk)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::PolicyLocked { active_segments: 1, .. }));
    assert!(trip
        .engine
        .check_policy_change(trip.trip.id, BookingPolicy::SeatAssignment)
        .await
        .is_ok());
}

#[tokio::test]
async fn unknown_trip_is_reported() {
    let trip = TestTrip::new(BookingPolicy::SeatAssignment, small_coach(), STOPS);
    let missing = TripId::new();

    let err = trip.engine.suggest_seats(missing, trip.stop(1), 1, None).await.unwrap_err();
    assert!(matches!(err, EngineError::TripNotFound(id) if id == missing));
}

#[tokio::test]
async fn geometry_and_route_are_cached_until_invalidated() {
    let trip = TestTrip::new(BookingPolicy::SeatAssignment, small_coach(), STOPS);

    for _ in 0..3 {
        trip.engine.suggest_seats(trip.trip.id, trip.stop(1), 1, None).await.unwrap();
    }
    assert_eq!(trip.catalog.vehicle_type_loads(), 1);
    assert_eq!(trip.catalog.route_loads(), 1);

    trip.engine.invalidate_vehicle_type(trip.trip.vehicle_type_id).await;
    trip.engine.invalidate_route(trip.trip.route_id).await;
    trip.engine.suggest_seats(trip.trip.id, trip.stop(1), 1, None).await.unwrap();
    assert_eq!(trip.catalog.vehicle_type_loads(), 2);
    assert_eq!(trip.catalog.route_loads(), 2);
}

#[tokio::test]
async fn stored_seat_map_is_the_source_of_truth() {
    let trip = TestTrip::new(BookingPolicy::SeatAssignment, small_coach(), STOPS);
    let stored = SeatMap::from_rows(vec![vec![
        SeatCell::Seat { number: SeatNumber::new(2) },
        SeatCell::Aisle,
        SeatCell::Seat { number: SeatNumber::new(1) },
    ]]);
    trip.catalog.insert_vehicle_type(VehicleTypeRecord {
        id: trip.trip.vehicle_type_id,
        name: "Minibus".to_string(),
        layout: LayoutConfig::new(2, ColumnSplit::new(1, 1)),
        seat_map: Some(stored),
    });

    let view = trip.engine.seat_map_view(trip.trip.id, None, None).await.unwrap();
    assert_eq!(view.total_seats, 2);
    assert_eq!(view.seat_map.len(), 1);
}

#[tokio::test]
async fn stored_map_disagreeing_with_seat_count_is_malformed() {
    let trip = TestTrip::new(BookingPolicy::SeatAssignment, small_coach(), STOPS);
    trip.catalog.insert_vehicle_type(VehicleTypeRecord {
        id: trip.trip.vehicle_type_id,
        name: "Broken".to_string(),
        layout: LayoutConfig::new(3, ColumnSplit::new(1, 1)),
        seat_map: Some(SeatMap::from_rows(vec![vec![SeatCell::Seat { number: SeatNumber::new(1) }]])),
    });

    let err = trip.engine.occupancy_stats(trip.trip.id).await.unwrap_err();
    assert!(matches!(
        err,
        EngineError::MalformedConfiguration(LayoutError::SeatCountMismatch { expected: 3, actual: 1 })
    ));
}

#[tokio::test]
async fn saving_a_vehicle_type_replaces_the_cached_geometry() {
    let trip = TestTrip::new(BookingPolicy::SeatAssignment, small_coach(), STOPS);
    let before = trip.engine.occupancy_stats(trip.trip.id).await.unwrap();
    assert_eq!(before.total_seats, 8);

    let saved = trip
        .engine
        .save_vehicle_type(
            trip.trip.vehicle_type_id,
            "Long coach".to_string(),
            LayoutConfig::new(13, ColumnSplit::new(2, 2)),
        )
        .await
        .unwrap();
    assert_eq!(saved.seat_map.as_ref().map(SeatMap::seat_count), Some(13));

    let after = trip.engine.occupancy_stats(trip.trip.id).await.unwrap();
    assert_eq!(after.total_seats, 13);
    assert_eq!(after.vehicle_type, "Long coach");
}

#[tokio::test]
async fn malformed_vehicle_type_is_not_saved() {
    let trip = TestTrip::new(BookingPolicy::SeatAssignment, small_coach(), STOPS);

    let err = trip
        .engine
        .save_vehicle_type(
            trip.trip.vehicle_type_id,
            "Nothing".to_string(),
            LayoutConfig::new(0, ColumnSplit::new(2, 2)),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::MalformedConfiguration(LayoutError::NoSeats)));

    let stats = trip.engine.occupancy_stats(trip.trip.id).await.unwrap();
    assert_eq!(stats.total_seats, 8);
}
