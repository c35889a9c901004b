//! The seat engine: request-level operations over the injected collaborators.
//!
//! [`SeatEngine`] loads plain records from the [`TripCatalog`], derives and
//! caches the pure indices (geometry per vehicle type, stop index per route),
//! reads live occupancy from the [`OccupancyStore`], and delegates writes to
//! the store's atomic reservation.
//!
//! | Operation | Method |
//! |-----------|--------|
//! | build a seat map | [`SeatEngine::build_seat_map`] |
//! | save a vehicle type | [`SeatEngine::save_vehicle_type`] |
//! | suggest seats | [`SeatEngine::suggest_seats`] |
//! | annotated seat map | [`SeatEngine::seat_map_view`] |
//! | reserve seats | [`SeatEngine::reserve_seats`] |
//! | release a ticket | [`SeatEngine::release_seat`] |
//! | occupancy statistics | [`SeatEngine::occupancy_stats`] |
//! | policy change guard | [`SeatEngine::check_policy_change`] |

use crate::environment::{Clock, TripCatalog, TripRecord, VehicleTypeRecord};
use crate::error::{EngineError, LayoutError};
use crate::geometry::SeatGeometryIndex;
use crate::layout::{LayoutConfig, SeatLayoutBuilder, SeatMap};
use crate::metrics::{
    RELEASES_TOTAL, RESERVATIONS_TOTAL, SEATS_RESERVED_TOTAL, SUGGESTIONS_TOTAL, SUGGESTION_CANDIDATES,
};
use crate::occupancy::OccupancySegmentIndex;
use crate::route::RouteStopIndex;
use crate::scoring::ScoringWeights;
use crate::store::OccupancyStore;
use crate::suggestion::{SeatSuggestion, SuggestionEngine, SuggestionRequest};
use crate::types::{
    BookingPolicy, RouteId, SalesControl, SeatNumber, Segment, StopId, TicketId, TicketSegment, TripId,
    VehicleTypeId,
};
use crate::view::SeatMapView;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Default cap on seats per reservation.
pub const DEFAULT_MAX_SEATS_PER_RESERVATION: usize = 8;

/// Injected dependencies of the engine.
#[derive(Clone)]
pub struct EngineEnvironment {
    /// Trip, vehicle type and route records
    pub catalog: Arc<dyn TripCatalog>,
    /// Ticket-segment storage
    pub store: Arc<dyn OccupancyStore>,
    /// Time source for issue timestamps
    pub clock: Arc<dyn Clock>,
}

impl EngineEnvironment {
    /// Bundles the collaborators.
    #[must_use]
    pub fn new(catalog: Arc<dyn TripCatalog>, store: Arc<dyn OccupancyStore>, clock: Arc<dyn Clock>) -> Self {
        Self { catalog, store, clock }
    }
}

/// Engine settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Maximum seats in one reservation
    pub max_seats_per_reservation: usize,
    /// Scoring weights
    pub weights: ScoringWeights,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_seats_per_reservation: DEFAULT_MAX_SEATS_PER_RESERVATION,
            weights: ScoringWeights::default(),
        }
    }
}

/// A vehicle type's seat map with its derived geometry.
#[derive(Clone, Debug)]
pub struct VehicleGeometry {
    /// Vehicle type
    pub vehicle_type_id: VehicleTypeId,
    /// Display name
    pub name: String,
    /// Seat map
    pub map: SeatMap,
    /// Seat facts
    pub index: SeatGeometryIndex,
}

impl VehicleGeometry {
    /// Uses the stored map when present, otherwise builds one from the
    /// configuration.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError`] if the configuration cannot be built or the
    /// stored map disagrees with the declared seat count.
    pub fn from_record(record: &VehicleTypeRecord) -> Result<Self, LayoutError> {
        let map = match &record.seat_map {
            Some(stored) => stored.clone(),
            None => SeatLayoutBuilder::build(&record.layout)?,
        };
        let index = SeatGeometryIndex::from_map(&map)?;
        if index.seat_count() != record.layout.seat_count {
            return Err(LayoutError::SeatCountMismatch {
                expected: record.layout.seat_count,
                actual: index.seat_count(),
            });
        }
        Ok(Self {
            vehicle_type_id: record.id,
            name: record.name.clone(),
            map,
            index,
        })
    }
}

/// Seats to reserve on one trip, all for the same interval.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationRequest {
    /// Trip
    pub trip_id: TripId,
    /// Seats, one ticket each
    pub seats: Vec<SeatNumber>,
    /// Boarding stop
    pub from_stop: StopId,
    /// Alighting stop
    pub to_stop: StopId,
}

/// Occupancy summary of a trip.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OccupancyStats {
    /// Seats on the vehicle
    pub total_seats: u32,
    /// Seats holding at least one active ticket
    pub occupied_seats: u32,
    /// Seats holding none
    pub available_seats: u32,
    /// Active tickets (several per seat under `semi_intelligent`)
    pub active_tickets: u32,
    /// `occupied / total` in percent, two decimals
    pub occupancy_rate: f64,
    /// Trip booking policy
    pub booking_type: BookingPolicy,
    /// Vehicle type name
    pub vehicle_type: String,
}

struct TripContext {
    trip: TripRecord,
    vehicle: Arc<VehicleGeometry>,
    route: Arc<RouteStopIndex>,
}

/// Seat inventory and suggestion service for all trips.
pub struct SeatEngine {
    env: EngineEnvironment,
    config: EngineConfig,
    suggestions: SuggestionEngine,
    vehicles: RwLock<HashMap<VehicleTypeId, Arc<VehicleGeometry>>>,
    routes: RwLock<HashMap<RouteId, Arc<RouteStopIndex>>>,
}

impl SeatEngine {
    /// Engine with the default [`ZoneScorer`](crate::scoring::ZoneScorer).
    #[must_use]
    pub fn new(env: EngineEnvironment, config: EngineConfig) -> Self {
        let suggestions = SuggestionEngine::with_weights(config.weights.clone());
        Self::with_suggestion_engine(env, config, suggestions)
    }

    /// Engine with a custom suggestion engine (e.g. another scorer).
    #[must_use]
    pub fn with_suggestion_engine(
        env: EngineEnvironment,
        config: EngineConfig,
        suggestions: SuggestionEngine,
    ) -> Self {
        Self {
            env,
            config,
            suggestions,
            vehicles: RwLock::new(HashMap::new()),
            routes: RwLock::new(HashMap::new()),
        }
    }

    /// Engine settings.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Generates a seat map for a vehicle-type configuration.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::MalformedConfiguration`] if the configuration
    /// cannot be built.
    pub fn build_seat_map(config: &LayoutConfig) -> Result<SeatMap, EngineError> {
        SeatLayoutBuilder::build(config).map_err(|e| {
            tracing::warn!(error = %e, seat_count = config.seat_count, "Rejected seat configuration");
            EngineError::MalformedConfiguration(e)
        })
    }

    /// Builds the seat map of a vehicle type, stores both, and drops the
    /// cached geometry so the next request sees the new map.
    ///
    /// # Errors
    ///
    /// - [`EngineError::MalformedConfiguration`] if the configuration cannot
    ///   be built; nothing is stored
    /// - [`EngineError::Catalog`] on storage failure
    #[tracing::instrument(skip(self, name, layout), fields(vehicle_type_id = %id))]
    pub async fn save_vehicle_type(
        &self,
        id: VehicleTypeId,
        name: String,
        layout: LayoutConfig,
    ) -> Result<VehicleTypeRecord, EngineError> {
        let seat_map = Self::build_seat_map(&layout)?;
        let record = VehicleTypeRecord {
            id,
            name,
            layout,
            seat_map: Some(seat_map),
        };
        self.env.catalog.save_vehicle_type(record.clone()).await?;
        self.invalidate_vehicle_type(id).await;
        tracing::info!(seats = record.layout.seat_count, "Vehicle type saved");
        Ok(record)
    }

    /// Ranks available seats for a passenger going to `destination`.
    ///
    /// Unknown stops fall back to the origin. Bulk trips return an empty
    /// list.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] if the trip, its vehicle type or its route
    /// cannot be loaded.
    #[tracing::instrument(skip(self), fields(trip_id = %trip_id))]
    pub async fn suggest_seats(
        &self,
        trip_id: TripId,
        destination: StopId,
        quantity: usize,
        boarding: Option<StopId>,
    ) -> Result<Vec<SeatSuggestion>, EngineError> {
        let trip = self.trip(trip_id).await?;
        metrics::counter!(SUGGESTIONS_TOTAL, "policy" => trip.booking_policy.as_str()).increment(1);
        if !trip.booking_policy.assigns_seats() {
            tracing::debug!("Bulk trip, no seat suggestions");
            return Ok(Vec::new());
        }

        let ctx = self.context(trip).await?;
        let request = SuggestionRequest {
            boarding: boarding.map_or(0, |stop| ctx.route.resolve_or_origin(&stop)),
            destination: ctx.route.resolve_or_origin(&destination),
            quantity,
        };
        let occupancy = self.occupancy(trip_id).await?;

        let ranked = self.suggestions.suggest(
            ctx.trip.booking_policy,
            &ctx.vehicle.index,
            ctx.route.total_stops(),
            &occupancy,
            request,
        );

        #[allow(clippy::cast_precision_loss)]
        metrics::histogram!(SUGGESTION_CANDIDATES).record(ranked.len() as f64);
        tracing::debug!(
            boarding = request.boarding,
            destination = request.destination,
            returned = ranked.len(),
            "Suggested seats"
        );
        Ok(ranked)
    }

    /// Seat map annotated with the occupants of `[from, to)`.
    ///
    /// Missing or unknown bounds widen to the whole route.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] if the trip, its vehicle type, its route or
    /// its occupancy cannot be loaded.
    #[tracing::instrument(skip(self), fields(trip_id = %trip_id))]
    pub async fn seat_map_view(
        &self,
        trip_id: TripId,
        from: Option<StopId>,
        to: Option<StopId>,
    ) -> Result<SeatMapView, EngineError> {
        let trip = self.trip(trip_id).await?;
        let ctx = self.context(trip).await?;
        let window = Segment::new(
            from.map_or(0, |stop| ctx.route.resolve_or_origin(&stop)),
            to.map_or_else(
                || ctx.route.total_stops(),
                |stop| ctx.route.resolve_or_terminus(&stop),
            ),
        );
        let occupancy = self.occupancy(trip_id).await?;

        Ok(SeatMapView::build(&ctx.vehicle.map, &ctx.route, &occupancy, window))
    }

    /// Reserves every requested seat for `[from_stop, to_stop)`, or none.
    ///
    /// Seat numbers and stops are validated before the store is touched;
    /// the store re-checks availability atomically.
    ///
    /// # Errors
    ///
    /// - [`EngineError::SeatConflict`] listing the seats already taken
    /// - [`EngineError::InvalidSeatNumber`] for a seat outside the vehicle
    /// - [`EngineError::UnknownStop`] for a stop not on the route
    /// - [`EngineError::SeatAssignmentDisabled`] on bulk trips
    /// - [`EngineError::Validation`] for an empty, oversized or duplicated
    ///   seat list, a reversed interval, or boarding past the origin on a
    ///   closed trip
    #[tracing::instrument(
        skip(self, request),
        fields(trip_id = %request.trip_id, seats = request.seats.len())
    )]
    pub async fn reserve_seats(&self, request: ReservationRequest) -> Result<Vec<TicketSegment>, EngineError> {
        let result = self.try_reserve(request).await;
        match &result {
            Ok(tickets) => {
                metrics::counter!(RESERVATIONS_TOTAL, "status" => "reserved").increment(1);
                metrics::counter!(SEATS_RESERVED_TOTAL).increment(tickets.len() as u64);
                tracing::info!(tickets = tickets.len(), "Seats reserved");
            }
            Err(EngineError::SeatConflict(conflict)) => {
                metrics::counter!(RESERVATIONS_TOTAL, "status" => "conflict").increment(1);
                tracing::warn!(seats = ?conflict.seats, "Seat conflict");
            }
            Err(e) => {
                metrics::counter!(RESERVATIONS_TOTAL, "status" => "rejected").increment(1);
                tracing::warn!(error = %e, "Reservation rejected");
            }
        }
        result
    }

    async fn try_reserve(&self, request: ReservationRequest) -> Result<Vec<TicketSegment>, EngineError> {
        let trip = self.trip(request.trip_id).await?;
        if !trip.booking_policy.assigns_seats() {
            return Err(EngineError::SeatAssignmentDisabled(trip.id));
        }
        if request.seats.is_empty() {
            return Err(EngineError::Validation("at least one seat is required".to_string()));
        }
        if request.seats.len() > self.config.max_seats_per_reservation {
            return Err(EngineError::Validation(format!(
                "at most {} seats per reservation",
                self.config.max_seats_per_reservation
            )));
        }
        let mut seen = HashSet::with_capacity(request.seats.len());
        if let Some(repeated) = request.seats.iter().find(|seat| !seen.insert(**seat)) {
            return Err(EngineError::Validation(format!("seat {repeated} requested twice")));
        }

        let ctx = self.context(trip).await?;
        let seat_count = ctx.vehicle.index.seat_count();
        if let Some(&seat) = request.seats.iter().find(|seat| !ctx.vehicle.index.contains(**seat)) {
            return Err(EngineError::InvalidSeatNumber { seat, seat_count });
        }

        let from = ctx
            .route
            .index_of(&request.from_stop)
            .ok_or(EngineError::UnknownStop(request.from_stop))?;
        let to = ctx
            .route
            .index_of(&request.to_stop)
            .ok_or(EngineError::UnknownStop(request.to_stop))?;
        if from >= to {
            return Err(EngineError::Validation(
                "boarding stop must come before the destination".to_string(),
            ));
        }
        if ctx.trip.sales_control == SalesControl::Closed && from != 0 {
            return Err(EngineError::Validation(
                "sales are closed: tickets board at the origin only".to_string(),
            ));
        }

        let issued_at = self.env.clock.now();
        let tickets: Vec<TicketSegment> = request
            .seats
            .iter()
            .map(|&seat| TicketSegment {
                ticket_id: TicketId::new(),
                trip_id: ctx.trip.id,
                seat,
                segment: Segment::new(from, to),
                destination_stop: request.to_stop,
                issued_at,
            })
            .collect();

        self.env
            .store
            .reserve_segments(ctx.trip.id, ctx.trip.booking_policy, tickets.clone())
            .await?;
        Ok(tickets)
    }

    /// Frees the seat held by a cancelled ticket. Unknown tickets are a
    /// no-op.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Store`] on storage failure.
    #[tracing::instrument(skip(self), fields(ticket_id = %ticket_id))]
    pub async fn release_seat(&self, ticket_id: TicketId) -> Result<(), EngineError> {
        match self.env.store.release_ticket(ticket_id).await? {
            Some(released) => {
                metrics::counter!(RELEASES_TOTAL, "status" => "released").increment(1);
                tracing::info!(trip_id = %released.trip_id, seat = %released.seat, "Seat released");
            }
            None => {
                metrics::counter!(RELEASES_TOTAL, "status" => "unknown").increment(1);
                tracing::debug!("No active segment for ticket");
            }
        }
        Ok(())
    }

    /// Seat occupancy summary of a trip.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] if the trip, its vehicle type or its occupancy
    /// cannot be loaded.
    #[tracing::instrument(skip(self), fields(trip_id = %trip_id))]
    pub async fn occupancy_stats(&self, trip_id: TripId) -> Result<OccupancyStats, EngineError> {
        let trip = self.trip(trip_id).await?;
        let vehicle = self.vehicle(trip.vehicle_type_id).await?;
        let occupancy = self.occupancy(trip_id).await?;

        let total_seats = vehicle.index.seat_count();
        let occupied_seats = u32::try_from(occupancy.occupied_seats()).unwrap_or(u32::MAX).min(total_seats);
        let occupancy_rate = if total_seats == 0 {
            0.0
        } else {
            (f64::from(occupied_seats) / f64::from(total_seats) * 100.0 * 100.0).round() / 100.0
        };

        Ok(OccupancyStats {
            total_seats,
            occupied_seats,
            available_seats: total_seats - occupied_seats,
            active_tickets: u32::try_from(occupancy.active_segments()).unwrap_or(u32::MAX),
            occupancy_rate,
            booking_type: trip.booking_policy,
            vehicle_type: vehicle.name.clone(),
        })
    }

    /// Rejects a booking policy change on a trip that already has tickets.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::PolicyLocked`] if `next` differs from the
    /// current policy and active tickets exist.
    #[tracing::instrument(skip(self), fields(trip_id = %trip_id))]
    pub async fn check_policy_change(&self, trip_id: TripId, next: BookingPolicy) -> Result<(), EngineError> {
        let trip = self.trip(trip_id).await?;
        if trip.booking_policy == next {
            return Ok(());
        }
        let active_segments = self.env.store.load_segments(trip_id).await?.len();
        if active_segments > 0 {
            tracing::warn!(from = %trip.booking_policy, to = %next, active_segments, "Policy change rejected");
            return Err(EngineError::PolicyLocked {
                trip_id,
                active_segments,
            });
        }
        Ok(())
    }

    /// Drops the cached geometry of a vehicle type after it was updated.
    pub async fn invalidate_vehicle_type(&self, vehicle_type_id: VehicleTypeId) {
        self.vehicles.write().await.remove(&vehicle_type_id);
    }

    /// Drops the cached stop index of a route after it was updated.
    pub async fn invalidate_route(&self, route_id: RouteId) {
        self.routes.write().await.remove(&route_id);
    }

    async fn trip(&self, trip_id: TripId) -> Result<TripRecord, EngineError> {
        self.env
            .catalog
            .load_trip(trip_id)
            .await?
            .ok_or(EngineError::TripNotFound(trip_id))
    }

    async fn context(&self, trip: TripRecord) -> Result<TripContext, EngineError> {
        let vehicle = self.vehicle(trip.vehicle_type_id).await?;
        let route = self.route(trip.route_id).await?;
        Ok(TripContext { trip, vehicle, route })
    }

    async fn occupancy(&self, trip_id: TripId) -> Result<OccupancySegmentIndex, EngineError> {
        let segments = self.env.store.load_segments(trip_id).await.map_err(EngineError::from)?;
        Ok(OccupancySegmentIndex::from_segments(segments))
    }

    async fn vehicle(&self, vehicle_type_id: VehicleTypeId) -> Result<Arc<VehicleGeometry>, EngineError> {
        if let Some(cached) = self.vehicles.read().await.get(&vehicle_type_id) {
            return Ok(Arc::clone(cached));
        }

        let record = self
            .env
            .catalog
            .load_vehicle_type(vehicle_type_id)
            .await?
            .ok_or(EngineError::VehicleTypeNotFound(vehicle_type_id))?;
        let geometry = Arc::new(VehicleGeometry::from_record(&record)?);
        tracing::debug!(vehicle_type_id = %vehicle_type_id, seats = geometry.index.seat_count(), "Cached vehicle geometry");

        self.vehicles
            .write()
            .await
            .insert(vehicle_type_id, Arc::clone(&geometry));
        Ok(geometry)
    }

    async fn route(&self, route_id: RouteId) -> Result<Arc<RouteStopIndex>, EngineError> {
        if let Some(cached) = self.routes.read().await.get(&route_id) {
            return Ok(Arc::clone(cached));
        }

        let stops = self.env.catalog.load_route_stops(route_id).await?;
        let route = Arc::new(RouteStopIndex::new(stops)?);
        tracing::debug!(route_id = %route_id, stops = route.total_stops(), "Cached route stops");

        self.routes.write().await.insert(route_id, Arc::clone(&route));
        Ok(route)
    }
}
