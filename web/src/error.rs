//! Error types for web handlers.
//!
//! [`AppError`] bridges [`EngineError`] and HTTP responses, implementing
//! Axum's `IntoResponse` trait.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use seatplan_core::EngineError;
use seatplan_core::error::CatalogError;
use seatplan_core::types::SeatNumber;
use serde::Serialize;
use std::fmt;

/// Application error type for web handlers.
///
/// This type wraps domain errors and provides HTTP-friendly error responses.
/// It implements Axum's `IntoResponse` trait to automatically convert errors
/// into HTTP responses.
///
/// # Examples
///
/// ```ignore
/// async fn handler(State(state): State<AppState>) -> Result<Json<OccupancyStats>, AppError> {
///     let stats = state.engine.occupancy_stats(trip_id).await?;
///     Ok(Json(stats))
/// }
/// ```
#[derive(Debug)]
pub struct AppError {
    /// HTTP status code
    status: StatusCode,
    /// Error message (user-facing)
    message: String,
    /// Error code (for client error handling)
    code: String,
    /// Seats that caused a conflict, echoed to the client
    seats: Option<Vec<SeatNumber>>,
    /// Internal error (for logging, not exposed to client)
    source: Option<anyhow::Error>,
}

impl AppError {
    /// Create a new application error.
    #[must_use]
    pub const fn new(status: StatusCode, message: String, code: String) -> Self {
        Self {
            status,
            message,
            code,
            seats: None,
            source: None,
        }
    }

    /// HTTP status of this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Create a new error with a source error.
    #[must_use]
    pub fn with_source(mut self, source: anyhow::Error) -> Self {
        self.source = Some(source);
        self
    }

    /// Create a 404 Not Found error.
    #[must_use]
    pub fn not_found(resource: impl fmt::Display, id: impl fmt::Display) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            format!("{resource} with id {id} not found"),
            "NOT_FOUND".to_string(),
        )
    }

    /// Create a 409 Conflict error.
    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::CONFLICT,
            message.into(),
            "CONFLICT".to_string(),
        )
    }

    /// Create a 422 Unprocessable Entity error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            message.into(),
            "VALIDATION_ERROR".to_string(),
        )
    }

    /// Create a 500 Internal Server Error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            message.into(),
            "INTERNAL_SERVER_ERROR".to_string(),
        )
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Error response body (JSON).
#[derive(Debug, Serialize)]
struct ErrorResponse {
    /// Error code (for client error handling).
    code: String,
    /// Human-readable error message.
    message: String,
    /// Unavailable seats, on conflicts only.
    #[serde(skip_serializing_if = "Option::is_none")]
    seats: Option<Vec<SeatNumber>>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log internal errors
        if self.status.is_server_error() {
            if let Some(source) = &self.source {
                tracing::error!(
                    status = %self.status,
                    code = %self.code,
                    message = %self.message,
                    error = %source,
                    "Internal server error"
                );
            } else {
                tracing::error!(
                    status = %self.status,
                    code = %self.code,
                    message = %self.message,
                    "Internal server error"
                );
            }
        }

        let body = ErrorResponse {
            code: self.code,
            message: self.message,
            seats: self.seats,
        };

        (self.status, Json(body)).into_response()
    }
}

/// Map engine errors to status codes: conflicts are 409, bad input is 422,
/// missing records are 404, and storage failures are 500.
impl From<EngineError> for AppError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::SeatConflict(conflict) => {
                let mut response = Self::conflict(conflict.to_string());
                response.seats = Some(conflict.seats);
                response
            }
            EngineError::PolicyLocked { .. } => Self::conflict(err.to_string()),
            EngineError::InvalidSeatNumber { .. }
            | EngineError::UnknownStop(_)
            | EngineError::Validation(_)
            | EngineError::MalformedConfiguration(_)
            | EngineError::SeatAssignmentDisabled(_) => Self::validation(err.to_string()),
            EngineError::TripNotFound(id) => Self::not_found("Trip", id),
            EngineError::VehicleTypeNotFound(id) => Self::not_found("Vehicle type", id),
            EngineError::Catalog(CatalogError::NotFound { kind, id }) => Self::not_found(kind, id),
            EngineError::MalformedRoute(_) | EngineError::Catalog(_) | EngineError::Store(_) => {
                let message = err.to_string();
                Self::internal("An internal error occurred").with_source(anyhow::anyhow!(message))
            }
        }
    }
}

/// Convert `anyhow::Error` to `AppError`.
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::internal("An internal error occurred").with_source(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seatplan_core::SeatConflict;
    use seatplan_core::error::LayoutError;
    use seatplan_core::types::{SeatNumber, StopId, TripId};

    #[test]
    fn test_error_display() {
        let err = AppError::validation("Invalid input");
        assert_eq!(err.to_string(), "[VALIDATION_ERROR] Invalid input");
    }

    #[test]
    fn test_not_found() {
        let err = AppError::not_found("Trip", "123");
        assert_eq!(err.to_string(), "[NOT_FOUND] Trip with id 123 not found");
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn seat_conflict_is_409() {
        let err = AppError::from(EngineError::SeatConflict(SeatConflict::new(vec![
            SeatNumber::new(7),
            SeatNumber::new(3),
        ])));
        assert_eq!(err.status, StatusCode::CONFLICT);
        assert_eq!(err.message, "seats unavailable for the requested interval: 3, 7");
        assert_eq!(err.seats, Some(vec![SeatNumber::new(3), SeatNumber::new(7)]));
    }

    #[test]
    fn bad_input_is_422() {
        for engine_error in [
            EngineError::InvalidSeatNumber {
                seat: SeatNumber::new(60),
                seat_count: 50,
            },
            EngineError::UnknownStop(StopId::new()),
            EngineError::MalformedConfiguration(LayoutError::NoSeats),
            EngineError::Validation("at least one seat is required".to_string()),
        ] {
            let err = AppError::from(engine_error);
            assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
            assert_eq!(err.code, "VALIDATION_ERROR");
        }
    }

    #[test]
    fn missing_trip_is_404() {
        let err = AppError::from(EngineError::TripNotFound(TripId::new()));
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn storage_failure_hides_details() {
        let err = AppError::from(EngineError::Catalog(CatalogError::Storage("connection reset".to_string())));
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, "An internal error occurred");
        assert!(err.source.is_some());
    }
}
