//! # Seatplan Testing
//!
//! Testing utilities for the seat engine.
//!
//! This crate provides:
//! - Mock implementations of the engine's collaborators (clock, trip catalog,
//!   occupancy store)
//! - Fixtures wiring a [`SeatEngine`](seatplan_core::SeatEngine) to one trip
//! - Property-based testing strategies
//!
//! ## Example
//!
//! ```
//! use seatplan_core::layout::{ColumnSplit, LayoutConfig};
//! use seatplan_core::types::BookingPolicy;
//! use seatplan_testing::TestTrip;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let trip = TestTrip::new(
//!     BookingPolicy::SeatAssignment,
//!     LayoutConfig::new(8, ColumnSplit::new(2, 2)).with_doors([1]),
//!     &["Lomé", "Tsévié", "Notsé"],
//! );
//!
//! let ranked = trip.engine.suggest_seats(trip.trip.id, trip.stop(1), 2, None).await?;
//! assert_eq!(ranked.len(), 2);
//! # Ok(())
//! # }
//! ```

use chrono::{DateTime, Utc};
use seatplan_core::environment::Clock;

pub mod catalog_mocks;
pub mod fixtures;
pub mod occupancy_mocks;
pub mod properties;

/// Mock implementations for testing.
pub mod mocks {
    use super::{Clock, DateTime, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use seatplan_testing::mocks::FixedClock;
    /// use seatplan_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Fixed clock at 2025-01-01 00:00:00 UTC
    ///
    /// # Panics
    ///
    /// Panics if the hardcoded timestamp fails to parse.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }
}

/// Install a `tracing` subscriber that writes through the test harness.
///
/// Safe to call from every test; only the first call installs it.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

// Re-export commonly used items
pub use catalog_mocks::InMemoryTripCatalog;
pub use fixtures::{TestTrip, named_route, vehicle_type};
pub use mocks::{FixedClock, test_clock};
pub use occupancy_mocks::InMemoryOccupancyStore;
