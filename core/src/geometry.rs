//! Per-seat facts derived from a [`SeatMap`].
//!
//! For every seat cell the index records its grid position, its type
//! (window, aisle or middle), the seats between it and the aisle, and how
//! close it is to a door. The index is built once per vehicle type and
//! shared read-only by every suggestion request.

use crate::error::LayoutError;
use crate::layout::{SeatCell, SeatMap};
use crate::types::SeatNumber;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Position of a cell in the seat map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPos {
    /// Row index, 0 = driver row
    pub row: u32,
    /// Column index within the row
    pub col: u32,
}

impl GridPos {
    /// Manhattan distance between two cells.
    #[must_use]
    pub const fn manhattan(self, other: Self) -> u32 {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }
}

/// Seat type by horizontal neighbourhood.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeatKind {
    /// Against the vehicle wall
    Window,
    /// Next to an aisle, door or empty cell
    Aisle,
    /// Between two seats
    Middle,
}

impl SeatKind {
    /// Display name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Window => "window",
            Self::Aisle => "aisle",
            Self::Middle => "middle",
        }
    }
}

/// Which side of the aisle a cell sits on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeatSide {
    /// Left of the row's aisle
    Left,
    /// Right of the row's aisle
    Right,
    /// Row without an aisle (rear bench)
    Rear,
}

/// Derived facts about one seat.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Seat {
    /// Seat number
    pub number: SeatNumber,
    /// Grid position
    pub position: GridPos,
    /// Window, aisle or middle
    pub kind: SeatKind,
    /// Side of the aisle
    pub side: SeatSide,
    /// Seats between this one and the aisle, nearest first
    pub adjacent_aisle_seats: SmallVec<[SeatNumber; 4]>,
    /// Manhattan distance to the nearest door, `None` without doors
    pub door_distance: Option<u32>,
    /// 1-based rank by door distance, ties by seat number
    pub proximity_rank: u32,
}

/// Seat facts for a whole vehicle, indexed by seat number.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeatGeometryIndex {
    seats: Vec<Seat>,
    doors: Vec<GridPos>,
    door_sides: SmallVec<[SeatSide; 2]>,
    last_row: u32,
}

impl SeatGeometryIndex {
    /// Derives seat facts from a map.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::BadSeatNumber`] unless the map's seats are
    /// numbered exactly `1..=n` without duplicates.
    pub fn from_map(map: &SeatMap) -> Result<Self, LayoutError> {
        let rows = map.rows();
        let mut doors = Vec::new();
        let mut door_sides: SmallVec<[SeatSide; 2]> = SmallVec::new();
        let mut seats = Vec::new();

        for (r, row) in rows.iter().enumerate() {
            let aisle_col = row.iter().position(|cell| *cell == SeatCell::Aisle);
            for (c, cell) in row.iter().enumerate() {
                let position = GridPos {
                    row: to_u32(r),
                    col: to_u32(c),
                };
                match cell {
                    SeatCell::Door => {
                        doors.push(position);
                        let side = side_of(c, aisle_col);
                        if !door_sides.contains(&side) {
                            door_sides.push(side);
                        }
                    }
                    SeatCell::Seat { number } => seats.push(Seat {
                        number: *number,
                        position,
                        kind: classify(row, c),
                        side: side_of(c, aisle_col),
                        adjacent_aisle_seats: aisle_side_seats(row, c),
                        door_distance: None,
                        proximity_rank: 0,
                    }),
                    _ => {}
                }
            }
        }

        seats.sort_by_key(|seat| seat.number);
        for (expected, seat) in (1..).zip(&seats) {
            if seat.number.get() != expected {
                return Err(LayoutError::BadSeatNumber(seat.number));
            }
        }

        for seat in &mut seats {
            seat.door_distance = doors.iter().map(|door| door.manhattan(seat.position)).min();
        }
        let mut by_proximity: Vec<usize> = (0..seats.len()).collect();
        by_proximity.sort_by_key(|&i| (seats[i].door_distance.unwrap_or(u32::MAX), seats[i].number));
        for (rank, i) in (1..).zip(by_proximity) {
            seats[i].proximity_rank = rank;
        }

        Ok(Self {
            seats,
            doors,
            door_sides,
            last_row: to_u32(rows.len().saturating_sub(1)),
        })
    }

    /// Facts for one seat.
    #[must_use]
    pub fn seat(&self, number: SeatNumber) -> Option<&Seat> {
        let index = usize::try_from(number.get().checked_sub(1)?).ok()?;
        self.seats.get(index)
    }

    /// All seats, ascending by number.
    #[must_use]
    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    /// Number of seats.
    #[must_use]
    pub fn seat_count(&self) -> u32 {
        to_u32(self.seats.len())
    }

    /// Whether `number` is a seat on this vehicle.
    #[must_use]
    pub fn contains(&self, number: SeatNumber) -> bool {
        (1..=self.seat_count()).contains(&number.get())
    }

    /// Door cells.
    #[must_use]
    pub fn doors(&self) -> &[GridPos] {
        &self.doors
    }

    /// Whether the seat is on the same side of the aisle as a door.
    #[must_use]
    pub fn is_door_side(&self, seat: &Seat) -> bool {
        seat.side != SeatSide::Rear && self.door_sides.contains(&seat.side)
    }

    /// Index of the rear row.
    #[must_use]
    pub const fn last_row(&self) -> u32 {
        self.last_row
    }
}

fn to_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

fn side_of(col: usize, aisle_col: Option<usize>) -> SeatSide {
    match aisle_col {
        Some(aisle) if col < aisle => SeatSide::Left,
        Some(_) => SeatSide::Right,
        None => SeatSide::Rear,
    }
}

fn classify(row: &[SeatCell], col: usize) -> SeatKind {
    let left = col.checked_sub(1).and_then(|c| row.get(c));
    let right = row.get(col + 1);
    match (left, right) {
        (None, _) | (_, None) => SeatKind::Window,
        (Some(l), Some(r)) if l.is_passage() || r.is_passage() => SeatKind::Aisle,
        _ => SeatKind::Middle,
    }
}

/// Seats between `col` and the nearest passage cell. A direction that runs
/// into the row edge or the driver contributes nothing.
fn aisle_side_seats(row: &[SeatCell], col: usize) -> SmallVec<[SeatNumber; 4]> {
    let mut found = SmallVec::new();

    let mut between = SmallVec::<[SeatNumber; 4]>::new();
    for cell in row[..col].iter().rev() {
        match cell {
            SeatCell::Seat { number } => between.push(*number),
            c if c.is_passage() => {
                found.extend(between.drain(..));
                break;
            }
            _ => break,
        }
    }

    between.clear();
    for cell in &row[col + 1..] {
        match cell {
            SeatCell::Seat { number } => between.push(*number),
            c if c.is_passage() => {
                found.extend(between.drain(..));
                break;
            }
            _ => break,
        }
    }

    found
}
