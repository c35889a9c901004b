//! HTTP surface of the seat engine.
//!
//! Handlers are thin adapters: they parse identifiers and bodies, call one
//! [`SeatEngine`](seatplan_core::SeatEngine) operation, and map
//! [`EngineError`](seatplan_core::EngineError) to a status code through
//! [`AppError`].
//!
//! # Example
//!
//! ```ignore
//! use seatplan_web::{AppState, build_router, config::Config};
//!
//! let config = Config::from_env();
//! let app = build_router(AppState::new(engine, config.tickets));
//! axum::serve(listener, app).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod api;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;

pub use config::{Config, TicketSettings};
pub use error::AppError;
pub use routes::build_router;
pub use state::AppState;
