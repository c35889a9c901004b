//! Seat layout generation.
//!
//! [`SeatLayoutBuilder`] turns a compact vehicle-type configuration (seat
//! count, `left+right` column split, door slots, last-row size) into a
//! [`SeatMap`]: rows of [`SeatCell`]s with seats numbered `1..=seat_count` in
//! row-major order.
//!
//! Row 0 is the driver row. Standard rows follow, each with one aisle cell
//! between the column groups, until `seat_count - last_row_seats` seats are
//! placed. A final aisle-less row holds the remaining seats.
//!
//! Door slots are 1-based and continuous across standard rows; slot 0 is the
//! front door next to the driver and takes no seat.

use crate::error::LayoutError;
use crate::types::SeatNumber;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Seats in the rear row when a configuration does not say otherwise.
pub const DEFAULT_LAST_ROW_SEATS: u32 = 5;

/// Largest seat count a configuration may declare.
pub const MAX_SEAT_COUNT: u32 = 500;

/// Largest column group on either side of the aisle.
pub const MAX_COLUMNS_PER_SIDE: u32 = 10;

/// Column split of a standard row, written `left+right` (e.g. `"2+2"`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ColumnSplit {
    /// Columns left of the aisle
    pub left: u32,
    /// Columns right of the aisle
    pub right: u32,
}

impl ColumnSplit {
    /// Creates a split.
    #[must_use]
    pub const fn new(left: u32, right: u32) -> Self {
        Self { left, right }
    }

    /// Seat slots per standard row.
    #[must_use]
    pub const fn slots_per_row(self) -> u32 {
        self.left.saturating_add(self.right)
    }
}

impl FromStr for ColumnSplit {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || LayoutError::InvalidConfiguration(s.to_string());
        let (left, right) = s.split_once('+').ok_or_else(invalid)?;
        let left = left.trim().parse().map_err(|_| invalid())?;
        let right = right.trim().parse().map_err(|_| invalid())?;
        Ok(Self { left, right })
    }
}

impl TryFrom<String> for ColumnSplit {
    type Error = LayoutError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ColumnSplit> for String {
    fn from(split: ColumnSplit) -> Self {
        split.to_string()
    }
}

impl fmt::Display for ColumnSplit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}+{}", self.left, self.right)
    }
}

const fn default_last_row_seats() -> u32 {
    DEFAULT_LAST_ROW_SEATS
}

/// Vehicle-type seat configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Total passenger seats
    pub seat_count: u32,
    /// Column split of standard rows
    pub seat_configuration: ColumnSplit,
    /// Door slot indices (0 = front door beside the driver)
    #[serde(default)]
    pub door_positions: BTreeSet<u32>,
    /// Seats in the rear row
    #[serde(default = "default_last_row_seats")]
    pub last_row_seats: u32,
}

impl LayoutConfig {
    /// Configuration with no doors and the default rear row.
    #[must_use]
    pub const fn new(seat_count: u32, seat_configuration: ColumnSplit) -> Self {
        Self {
            seat_count,
            seat_configuration,
            door_positions: BTreeSet::new(),
            last_row_seats: DEFAULT_LAST_ROW_SEATS,
        }
    }

    /// Adds door slots.
    #[must_use]
    pub fn with_doors(mut self, doors: impl IntoIterator<Item = u32>) -> Self {
        self.door_positions.extend(doors);
        self
    }

    /// Overrides the rear row size.
    #[must_use]
    pub const fn with_last_row_seats(mut self, last_row_seats: u32) -> Self {
        self.last_row_seats = last_row_seats;
        self
    }

    /// Rejects configurations the builder cannot satisfy.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError`] for a zero seat count, an empty column group,
    /// an empty last row, or a seat count or column group above
    /// [`MAX_SEAT_COUNT`] / [`MAX_COLUMNS_PER_SIDE`].
    pub const fn validate(&self) -> Result<(), LayoutError> {
        if self.seat_count == 0 {
            return Err(LayoutError::NoSeats);
        }
        if self.seat_count > MAX_SEAT_COUNT {
            return Err(LayoutError::TooManySeats {
                seat_count: self.seat_count,
                max: MAX_SEAT_COUNT,
            });
        }
        let ColumnSplit { left, right } = self.seat_configuration;
        if left == 0 || right == 0 {
            return Err(LayoutError::NonPositiveColumns { left, right });
        }
        if left > MAX_COLUMNS_PER_SIDE || right > MAX_COLUMNS_PER_SIDE {
            return Err(LayoutError::TooManyColumns {
                left,
                right,
                max: MAX_COLUMNS_PER_SIDE,
            });
        }
        if self.last_row_seats == 0 {
            return Err(LayoutError::EmptyLastRow);
        }
        Ok(())
    }
}

/// One cell of a seat map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SeatCell {
    /// Passenger seat
    Seat {
        /// Seat number
        number: SeatNumber,
    },
    /// Walkway between column groups
    Aisle,
    /// Door opening
    Door,
    /// Unused floor space
    Empty,
    /// Driver position
    Driver,
}

impl SeatCell {
    /// Seat number if this is a seat.
    #[must_use]
    pub const fn seat_number(&self) -> Option<SeatNumber> {
        match self {
            Self::Seat { number } => Some(*number),
            _ => None,
        }
    }

    /// Aisle, door and empty cells leave room to step out of a seat.
    #[must_use]
    pub const fn is_passage(&self) -> bool {
        matches!(self, Self::Aisle | Self::Door | Self::Empty)
    }
}

/// A vehicle's 2-D seat layout.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeatMap {
    rows: Vec<Vec<SeatCell>>,
}

impl SeatMap {
    /// Wraps rows loaded from storage. Use
    /// [`SeatGeometryIndex::from_map`](crate::geometry::SeatGeometryIndex::from_map)
    /// to check the numbering invariant.
    #[must_use]
    pub const fn from_rows(rows: Vec<Vec<SeatCell>>) -> Self {
        Self { rows }
    }

    /// Rows front to back.
    #[must_use]
    pub fn rows(&self) -> &[Vec<SeatCell>] {
        &self.rows
    }

    /// Number of seat cells.
    #[must_use]
    pub fn seat_count(&self) -> u32 {
        let count = self
            .rows
            .iter()
            .flatten()
            .filter(|cell| cell.seat_number().is_some())
            .count();
        u32::try_from(count).unwrap_or(u32::MAX)
    }

    /// Seat numbers in row-major order.
    pub fn seat_numbers(&self) -> impl Iterator<Item = SeatNumber> + '_ {
        self.rows.iter().flatten().filter_map(SeatCell::seat_number)
    }
}

/// Builds seat maps from [`LayoutConfig`]s.
#[derive(Clone, Copy, Debug, Default)]
pub struct SeatLayoutBuilder;

impl SeatLayoutBuilder {
    /// Generates the seat map for a configuration.
    ///
    /// Deterministic: identical configurations produce identical maps.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError`] when the configuration fails
    /// [`LayoutConfig::validate`].
    pub fn build(config: &LayoutConfig) -> Result<SeatMap, LayoutError> {
        config.validate()?;

        let split = config.seat_configuration;
        let standard_quota = config.seat_count.saturating_sub(config.last_row_seats);
        let mut seats = SeatSequence::new(standard_quota);
        let mut rows = Vec::new();

        rows.push(driver_row(split, &config.door_positions, &mut seats));

        let mut row_index: u32 = 1;
        while seats.placed < standard_quota {
            let start_slot = (row_index - 1) * split.slots_per_row() + 1;
            let mut row = Vec::with_capacity(split.slots_per_row() as usize + 1);
            for i in 0..split.left {
                row.push(slot_cell(start_slot + i, &config.door_positions, &mut seats));
            }
            row.push(SeatCell::Aisle);
            for i in 0..split.right {
                row.push(slot_cell(
                    start_slot + split.left + i,
                    &config.door_positions,
                    &mut seats,
                ));
            }
            rows.push(row);
            row_index += 1;
        }

        let remaining = config.seat_count - seats.placed;
        let last_row = (0..remaining)
            .map(|_| SeatCell::Seat {
                number: seats.take(),
            })
            .collect();
        rows.push(last_row);

        Ok(SeatMap { rows })
    }
}

/// Hands out sequential seat numbers up to a quota.
struct SeatSequence {
    next: u32,
    placed: u32,
    quota: u32,
}

impl SeatSequence {
    const fn new(quota: u32) -> Self {
        Self {
            next: 1,
            placed: 0,
            quota,
        }
    }

    fn take(&mut self) -> SeatNumber {
        let number = SeatNumber::new(self.next);
        self.next += 1;
        self.placed += 1;
        number
    }

    fn seat_or_empty(&mut self) -> SeatCell {
        if self.placed < self.quota {
            SeatCell::Seat {
                number: self.take(),
            }
        } else {
            SeatCell::Empty
        }
    }
}

fn driver_row(split: ColumnSplit, doors: &BTreeSet<u32>, seats: &mut SeatSequence) -> Vec<SeatCell> {
    let mut row = Vec::with_capacity(split.slots_per_row() as usize + 1);
    row.push(SeatCell::Driver);
    row.extend((1..split.left).map(|_| SeatCell::Empty));
    row.push(SeatCell::Aisle);
    if doors.contains(&0) {
        row.push(SeatCell::Door);
        row.extend((1..split.right).map(|_| SeatCell::Empty));
    } else {
        row.extend((0..split.right).map(|_| seats.seat_or_empty()));
    }
    row
}

fn slot_cell(slot: u32, doors: &BTreeSet<u32>, seats: &mut SeatSequence) -> SeatCell {
    if doors.contains(&slot) {
        SeatCell::Door
    } else {
        seats.seat_or_empty()
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)] // Panics: Test will fail if the layout is rejected
mod tests {
    use super::*;

    fn seat(n: u32) -> SeatCell {
        SeatCell::Seat {
            number: SeatNumber::new(n),
        }
    }

    #[test]
    fn eight_seat_coach_with_middle_door() {
        let config = LayoutConfig::new(8, ColumnSplit::new(2, 2)).with_doors([1]);
        let map = SeatLayoutBuilder::build(&config).expect("valid layout");

        assert_eq!(
            map.rows(),
            &[
                vec![SeatCell::Driver, SeatCell::Empty, SeatCell::Aisle, seat(1), seat(2)],
                vec![SeatCell::Door, seat(3), SeatCell::Aisle, SeatCell::Empty, SeatCell::Empty],
                vec![seat(4), seat(5), seat(6), seat(7), seat(8)],
            ]
        );
    }

    #[test]
    fn front_door_replaces_co_driver_seats() {
        let config = LayoutConfig::new(9, ColumnSplit::new(2, 2)).with_doors([0]);
        let map = SeatLayoutBuilder::build(&config).expect("valid layout");

        assert_eq!(
            map.rows()[0],
            vec![SeatCell::Driver, SeatCell::Empty, SeatCell::Aisle, SeatCell::Door, SeatCell::Empty]
        );
        assert_eq!(map.rows()[1], vec![seat(1), seat(2), SeatCell::Aisle, seat(3), seat(4)]);
        assert_eq!(map.seat_count(), 9);
    }

    #[test]
    fn last_row_covering_all_seats_leaves_only_driver_and_rear_rows() {
        let config = LayoutConfig::new(4, ColumnSplit::new(2, 2)).with_last_row_seats(6);
        let map = SeatLayoutBuilder::build(&config).expect("valid layout");

        assert_eq!(map.rows().len(), 2);
        assert_eq!(
            map.rows()[0],
            vec![SeatCell::Driver, SeatCell::Empty, SeatCell::Aisle, SeatCell::Empty, SeatCell::Empty]
        );
        assert_eq!(map.rows()[1], vec![seat(1), seat(2), seat(3), seat(4)]);
    }

    #[test]
    fn door_slot_past_the_quota_is_still_a_door() {
        // 2+1 split: slots 1..=3 fill row 1, slot 4 opens row 2.
        let config = LayoutConfig::new(8, ColumnSplit::new(2, 1))
            .with_doors([4])
            .with_last_row_seats(3);
        let map = SeatLayoutBuilder::build(&config).expect("valid layout");

        assert_eq!(map.rows()[2][0], SeatCell::Door);
        assert_eq!(map.seat_count(), 8);
    }

    #[test]
    fn every_standard_row_has_one_aisle() {
        let config = LayoutConfig::new(45, ColumnSplit::new(2, 2)).with_doors([0, 11]);
        let map = SeatLayoutBuilder::build(&config).expect("valid layout");
        let (rear, standard) = map.rows().split_last().expect("has rows");

        for row in standard {
            assert_eq!(row.iter().filter(|c| **c == SeatCell::Aisle).count(), 1);
        }
        assert!(rear.iter().all(|c| c.seat_number().is_some()));
        assert_eq!(rear.len(), 5);
    }

    #[test]
    fn rejects_unbuildable_configurations() {
        assert_eq!(
            SeatLayoutBuilder::build(&LayoutConfig::new(0, ColumnSplit::new(2, 2))),
            Err(LayoutError::NoSeats)
        );
        assert_eq!(
            SeatLayoutBuilder::build(&LayoutConfig::new(10, ColumnSplit::new(0, 2))),
            Err(LayoutError::NonPositiveColumns { left: 0, right: 2 })
        );
        assert_eq!(
            SeatLayoutBuilder::build(
                &LayoutConfig::new(10, ColumnSplit::new(2, 2)).with_last_row_seats(0)
            ),
            Err(LayoutError::EmptyLastRow)
        );
    }

    #[test]
    fn rejects_oversized_configurations() {
        let huge: ColumnSplit = "4294967295+1".parse().expect("parses as numbers");
        assert_eq!(huge.slots_per_row(), u32::MAX);
        assert_eq!(
            SeatLayoutBuilder::build(&LayoutConfig::new(10, huge)),
            Err(LayoutError::TooManyColumns {
                left: u32::MAX,
                right: 1,
                max: MAX_COLUMNS_PER_SIDE,
            })
        );
        assert_eq!(
            SeatLayoutBuilder::build(&LayoutConfig::new(
                u32::MAX,
                ColumnSplit::new(2, 2)
            )),
            Err(LayoutError::TooManySeats {
                seat_count: u32::MAX,
                max: MAX_SEAT_COUNT,
            })
        );

        let widest = LayoutConfig::new(MAX_SEAT_COUNT, ColumnSplit::new(MAX_COLUMNS_PER_SIDE, 1));
        let map = SeatLayoutBuilder::build(&widest).expect("largest accepted layout");
        assert_eq!(map.seat_count(), MAX_SEAT_COUNT);
    }

    #[test]
    fn parses_column_split() {
        assert_eq!("2+1".parse::<ColumnSplit>(), Ok(ColumnSplit::new(2, 1)));
        assert_eq!(" 3 + 2 ".parse::<ColumnSplit>(), Ok(ColumnSplit::new(3, 2)));
        assert!("22".parse::<ColumnSplit>().is_err());
        assert!("a+b".parse::<ColumnSplit>().is_err());
        assert!("-1+2".parse::<ColumnSplit>().is_err());
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let config: LayoutConfig =
            serde_json::from_str(r#"{"seat_count": 30, "seat_configuration": "2+2"}"#)
                .expect("valid json");
        assert_eq!(config.last_row_seats, DEFAULT_LAST_ROW_SEATS);
        assert!(config.door_positions.is_empty());
    }

    #[test]
    fn seat_map_json_uses_type_tags() {
        let json = serde_json::to_value(SeatMap::from_rows(vec![vec![
            SeatCell::Driver,
            SeatCell::Aisle,
            seat(1),
        ]]))
        .expect("serializable");
        assert_eq!(
            json,
            serde_json::json!([[{"type": "driver"}, {"type": "aisle"}, {"type": "seat", "number": 1}]])
        );
    }
}
