//! Seat map annotated with occupancy, for display.

use crate::layout::{SeatCell, SeatMap};
use crate::occupancy::OccupancySegmentIndex;
use crate::route::RouteStopIndex;
use crate::types::{SeatNumber, Segment};
use serde::Serialize;

/// Colour of a free seat.
pub const FREE_SEAT_COLOR: &str = "#94A3B8";

/// Colour of an occupied seat on a route with a single stop.
pub const SINGLE_STOP_COLOR: &str = "#3B82F6";

/// Colour for an occupant alighting at `stop_order` (1-based) out of
/// `total_stops`. Lightness runs from 85% for the first stop down to 30%
/// for the last.
#[must_use]
pub fn stop_color(stop_order: u32, total_stops: u32) -> String {
    if total_stops <= 1 {
        return SINGLE_STOP_COLOR.to_string();
    }
    let ratio = (f64::from(stop_order.saturating_sub(1)) / f64::from(total_stops - 1)).clamp(0.0, 1.0);
    let lightness = ((85.0 - 55.0 * ratio) * 100.0).round() / 100.0;
    format!("hsl(220, 100%, {lightness}%)")
}

/// One cell of the annotated map.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ViewCell {
    /// Passenger seat with its occupancy
    Seat {
        /// Seat number
        number: SeatNumber,
        /// Whether a passenger holds the seat in the viewed window
        #[serde(rename = "isOccupied")]
        is_occupied: bool,
        /// Where the first-leaving occupant gets off
        destination_name: Option<String>,
        /// Display colour
        color: String,
    },
    /// Walkway
    Aisle,
    /// Door
    Door,
    /// Unused space
    Empty,
    /// Driver
    Driver,
}

/// Occupancy of a trip's seats over a stop window.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SeatMapView {
    /// Annotated rows
    pub seat_map: Vec<Vec<ViewCell>>,
    /// Stop window the occupancy was computed for
    pub window: Segment,
    /// Seats on the vehicle
    pub total_seats: u32,
    /// Seats held during the window
    pub occupied_seats_count: u32,
    /// Seats free for the whole window
    pub available_seats_count: u32,
}

impl SeatMapView {
    /// Annotates `map` with the occupants overlapping `window`.
    #[must_use]
    pub fn build(
        map: &SeatMap,
        route: &RouteStopIndex,
        occupancy: &OccupancySegmentIndex,
        window: Segment,
    ) -> Self {
        let occupied = occupancy.occupied_view(window);
        let total_stops = route.total_stops();
        let mut occupied_count = 0;

        let seat_map = map
            .rows()
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| match *cell {
                        SeatCell::Seat { number } => match occupied.get(&number) {
                            Some(occupant) => {
                                occupied_count += 1;
                                let alighting = occupant.segment.to;
                                ViewCell::Seat {
                                    number,
                                    is_occupied: true,
                                    destination_name: route.stop_at(alighting).map(|s| s.name.clone()),
                                    color: stop_color(alighting + 1, total_stops),
                                }
                            }
                            None => ViewCell::Seat {
                                number,
                                is_occupied: false,
                                destination_name: None,
                                color: FREE_SEAT_COLOR.to_string(),
                            },
                        },
                        SeatCell::Aisle => ViewCell::Aisle,
                        SeatCell::Door => ViewCell::Door,
                        SeatCell::Empty => ViewCell::Empty,
                        SeatCell::Driver => ViewCell::Driver,
                    })
                    .collect()
            })
            .collect();

        let total_seats = map.seat_count();
        Self {
            seat_map,
            window,
            total_seats,
            occupied_seats_count: occupied_count,
            available_seats_count: total_seats.saturating_sub(occupied_count),
        }
    }
}
