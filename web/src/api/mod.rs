//! HTTP handlers.

pub mod health;
pub mod seat_maps;
pub mod tickets;
pub mod trips;
