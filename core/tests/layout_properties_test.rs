//! Property tests for seat layout generation and geometry.
//!
//! Run with: `cargo test --test layout_properties_test`

#![allow(clippy::expect_used, clippy::unwrap_used)]

use proptest::prelude::*;
use seatplan_core::geometry::SeatGeometryIndex;
use seatplan_core::layout::{SeatCell, SeatLayoutBuilder};
use seatplan_testing::properties::layout_config;

proptest! {
    #[test]
    fn builds_exactly_seat_count_seats_numbered_in_order(config in layout_config()) {
        let map = SeatLayoutBuilder::build(&config).unwrap();

        let numbers: Vec<u32> = map.seat_numbers().map(|n| n.get()).collect();
        let expected: Vec<u32> = (1..=config.seat_count).collect();
        prop_assert_eq!(numbers, expected);
    }

    #[test]
    fn build_is_deterministic(config in layout_config()) {
        let first = SeatLayoutBuilder::build(&config).unwrap();
        let second = SeatLayoutBuilder::build(&config).unwrap();
        prop_assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn standard_rows_have_one_aisle_and_rear_row_none(config in layout_config()) {
        let map = SeatLayoutBuilder::build(&config).unwrap();
        let (rear, standard) = map.rows().split_last().unwrap();

        prop_assert_eq!(standard[0][0], SeatCell::Driver);
        for row in standard {
            prop_assert_eq!(row.iter().filter(|c| **c == SeatCell::Aisle).count(), 1);
            prop_assert_eq!(row.len() as u32, config.seat_configuration.slots_per_row() + 1);
        }
        prop_assert!(rear.iter().all(|c| c.seat_number().is_some()));
        prop_assert!(!rear.is_empty());
    }

    #[test]
    fn proximity_rank_is_a_permutation(config in layout_config()) {
        let map = SeatLayoutBuilder::build(&config).unwrap();
        let geometry = SeatGeometryIndex::from_map(&map).unwrap();

        let mut ranks: Vec<u32> = geometry.seats().iter().map(|s| s.proximity_rank).collect();
        ranks.sort_unstable();
        prop_assert_eq!(ranks, (1..=config.seat_count).collect::<Vec<_>>());
    }

    #[test]
    fn aisle_side_neighbours_share_the_row(config in layout_config()) {
        let map = SeatLayoutBuilder::build(&config).unwrap();
        let geometry = SeatGeometryIndex::from_map(&map).unwrap();

        for seat in geometry.seats() {
            for neighbour in &seat.adjacent_aisle_seats {
                let other = geometry.seat(*neighbour).unwrap();
                prop_assert_eq!(other.position.row, seat.position.row);
                prop_assert_ne!(other.number, seat.number);
            }
        }
    }
}
