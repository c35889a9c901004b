//! `PostgreSQL` persistence for the seat engine.
//!
//! This crate implements the two storage seams of `seatplan-core`:
//!
//! - [`PostgresTripCatalog`] - trips, vehicle types (with their stored seat
//!   maps) and route stop orders, implementing `TripCatalog`
//! - [`PostgresOccupancyStore`] - ticket segments, implementing
//!   `OccupancyStore` with a per-trip row lock around check-and-insert
//!
//! Schema migrations are embedded and applied with [`migrate`].
//!
//! # Example
//!
//! ```no_run
//! use seatplan_postgres::{PostgresOccupancyStore, PostgresTripCatalog};
//! use sqlx::PgPool;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = PgPool::connect("postgres://localhost/seatplan").await?;
//! seatplan_postgres::migrate(&pool).await?;
//!
//! let catalog = PostgresTripCatalog::new(pool.clone());
//! let store = PostgresOccupancyStore::new(pool);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use metrics::describe_histogram;
use sqlx::PgPool;

mod catalog;
mod store;

pub use catalog::PostgresTripCatalog;
pub use store::PostgresOccupancyStore;

/// Time spent inside the reservation transaction, lock wait included.
pub const RESERVE_TRANSACTION_SECONDS: &str = "seatplan_store_reserve_transaction_seconds";

/// Apply the embedded schema migrations.
///
/// # Errors
///
/// Returns [`sqlx::migrate::MigrateError`] if a migration fails.
pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Register metric descriptions for the store. Call once at startup.
pub fn register_store_metrics() {
    describe_histogram!(
        RESERVE_TRANSACTION_SECONDS,
        metrics::Unit::Seconds,
        "Duration of the per-trip reservation transaction"
    );
}

fn to_u32(value: i32, column: &str) -> Result<u32, String> {
    u32::try_from(value).map_err(|_| format!("negative {column}: {value}"))
}

fn to_i32(value: u32, column: &str) -> Result<i32, String> {
    i32::try_from(value).map_err(|_| format!("{column} out of range: {value}"))
}
