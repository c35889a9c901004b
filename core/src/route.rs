//! Ordinal stop positions along a route.

use crate::error::RouteError;
use crate::types::StopId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One stop of a route with its 0-based position.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteStop {
    /// Stop identifier
    pub stop_id: StopId,
    /// Position along the route, 0 = origin
    pub stop_index: u32,
    /// Display name
    pub name: String,
}

/// `stop_id → stop_index` lookup for one route.
#[derive(Clone, Debug)]
pub struct RouteStopIndex {
    stops: Vec<RouteStop>,
    positions: HashMap<StopId, u32>,
}

impl RouteStopIndex {
    /// Indexes a route's stops. Input order does not matter.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError`] if the route is empty, indices are not
    /// `0..n` without gaps, or a stop repeats.
    pub fn new(mut stops: Vec<RouteStop>) -> Result<Self, RouteError> {
        if stops.is_empty() {
            return Err(RouteError::Empty);
        }
        stops.sort_by_key(|stop| stop.stop_index);

        let mut positions = HashMap::with_capacity(stops.len());
        for (expected, stop) in (0..).zip(&stops) {
            if stop.stop_index != expected {
                return Err(RouteError::NonContiguous {
                    expected,
                    found: stop.stop_index,
                });
            }
            if positions.insert(stop.stop_id, stop.stop_index).is_some() {
                return Err(RouteError::DuplicateStop(stop.stop_id));
            }
        }

        Ok(Self { stops, positions })
    }

    /// Index of a stop, if it is on the route.
    #[must_use]
    pub fn index_of(&self, stop_id: &StopId) -> Option<u32> {
        self.positions.get(stop_id).copied()
    }

    /// Index of a stop, falling back to the origin (0) when unknown.
    #[must_use]
    pub fn resolve_or_origin(&self, stop_id: &StopId) -> u32 {
        self.index_of(stop_id).unwrap_or_else(|| {
            tracing::debug!(stop_id = %stop_id, "Unknown stop, using route origin");
            0
        })
    }

    /// Index of a stop, falling back to [`total_stops`](Self::total_stops)
    /// when unknown. Used for upper bounds.
    #[must_use]
    pub fn resolve_or_terminus(&self, stop_id: &StopId) -> u32 {
        self.index_of(stop_id).unwrap_or_else(|| self.total_stops())
    }

    /// Number of stops on the route.
    #[must_use]
    pub fn total_stops(&self) -> u32 {
        u32::try_from(self.stops.len()).unwrap_or(u32::MAX)
    }

    /// Stop at a position.
    #[must_use]
    pub fn stop_at(&self, stop_index: u32) -> Option<&RouteStop> {
        self.stops.get(usize::try_from(stop_index).ok()?)
    }

    /// Stops in route order.
    #[must_use]
    pub fn stops(&self) -> &[RouteStop] {
        &self.stops
    }
}
