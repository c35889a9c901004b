//! Proptest strategies for seat engine types.

use proptest::collection::btree_set;
use proptest::prelude::*;
use seatplan_core::layout::{ColumnSplit, LayoutConfig};
use seatplan_core::types::Segment;

/// Buildable vehicle configurations: 1–80 seats, 1–3 columns per side,
/// up to four door slots, rear row of 1–6 seats.
pub fn layout_config() -> impl Strategy<Value = LayoutConfig> {
    (
        1u32..=80,
        1u32..=3,
        1u32..=3,
        btree_set(0u32..40, 0..4),
        1u32..=6,
    )
        .prop_map(|(seat_count, left, right, doors, last_row_seats)| {
            LayoutConfig::new(seat_count, ColumnSplit::new(left, right))
                .with_doors(doors)
                .with_last_row_seats(last_row_seats)
        })
}

/// Non-empty stop interval on a route of `total_stops` stops.
///
/// `total_stops` must be at least 2.
pub fn segment(total_stops: u32) -> impl Strategy<Value = Segment> {
    (0..total_stops - 1).prop_flat_map(move |from| (Just(from), from + 1..total_stops))
        .prop_map(|(from, to)| Segment::new(from, to))
}
