//! # Seatplan Core
//!
//! Seat inventory and suggestion engine for bus ticketing.
//!
//! Given a trip, the physical seat layout of its vehicle and a passenger's
//! boarding and alighting stops, the engine derives seat geometry from a
//! compact configuration, tracks which seats are held over which part of the
//! route, and ranks free seats by desirability.
//!
//! ## Components
//!
//! Leaves first:
//!
//! - [`layout`]: `SeatLayoutBuilder` turns a vehicle-type configuration into a
//!   2-D [`SeatMap`](layout::SeatMap)
//! - [`geometry`]: `SeatGeometryIndex` derives window/aisle/middle type,
//!   aisle-side neighbours and door-proximity rank per seat
//! - [`route`]: `RouteStopIndex` maps stops to their position on a route
//! - [`occupancy`]: `OccupancySegmentIndex` holds a trip's ticket-segments
//!   and enforces the no-overlap rule of each booking policy
//! - [`scoring`] and [`suggestion`]: rank available seats
//! - [`view`]: seat map annotated with occupancy for display
//!
//! [`service::SeatEngine`] wires these to the injected collaborators
//! ([`environment::TripCatalog`], [`store::OccupancyStore`],
//! [`environment::Clock`]).
//!
//! ## Example
//!
//! ```
//! use seatplan_core::geometry::SeatGeometryIndex;
//! use seatplan_core::layout::{ColumnSplit, LayoutConfig, SeatLayoutBuilder};
//! use seatplan_core::occupancy::OccupancySegmentIndex;
//! use seatplan_core::suggestion::{SuggestionEngine, SuggestionRequest};
//! use seatplan_core::types::BookingPolicy;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = LayoutConfig::new(8, ColumnSplit::new(2, 2)).with_doors([1]);
//! let map = SeatLayoutBuilder::build(&config)?;
//! let geometry = SeatGeometryIndex::from_map(&map)?;
//!
//! let ranked = SuggestionEngine::default().suggest(
//!     BookingPolicy::SeatAssignment,
//!     &geometry,
//!     3,
//!     &OccupancySegmentIndex::new(),
//!     SuggestionRequest { boarding: 0, destination: 1, quantity: 1 },
//! );
//! assert_eq!(ranked[0].seat_number.get(), 3);
//! # Ok(())
//! # }
//! ```

pub mod environment;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod metrics;
pub mod occupancy;
pub mod route;
pub mod scoring;
pub mod service;
pub mod store;
pub mod suggestion;
pub mod types;
pub mod view;

// Re-export commonly used types
pub use error::{EngineError, SeatConflict};
pub use service::{EngineConfig, EngineEnvironment, SeatEngine};
pub use types::{BookingPolicy, SeatNumber, Segment, TicketId, TripId};
