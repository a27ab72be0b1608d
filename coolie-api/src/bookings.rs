use axum::{
    extract::{Json, State},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use tracing::{error, info, warn};

use coolie_core::{BookingRequest, BookingRow, NewBooking, StoredBooking};
use coolie_shared::models::events::BookingCreatedEvent;
use coolie_shared::Masked;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct BookingResponse {
    status: &'static str,
    #[serde(flatten)]
    booking: StoredBooking,
    /// Present only when the helper came from another station.
    #[serde(skip_serializing_if = "Option::is_none")]
    fallback: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BookingListResponse {
    bookings: Vec<BookingRow>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/book", post(create_booking))
        .route("/bookings", get(list_bookings))
}

/// POST /book
async fn create_booking(
    State(state): State<AppState>,
    Json(req): Json<BookingRequest>,
) -> Result<Json<BookingResponse>, AppError> {
    let record = req.into_record(&state.field_defaults)?;

    let assignment = {
        let mut rng = rand::thread_rng();
        state.assigner.assign(&record.city, &mut rng)?
    };
    if let Some(notice) = &assignment.fallback {
        warn!("{}", notice);
    }

    let fare = state.fares.fare(record.luggage_weight);
    if !fare.is_finite() {
        return Err(AppError::ValidationError(format!(
            "luggage_weight {} is too large to price",
            record.luggage_weight
        )));
    }
    let booking = NewBooking::new(record, assignment.helper, fare);

    let stored = state.bookings.create_booking(booking).await.map_err(|e| {
        error!("Failed to create booking: {}", e);
        AppError::from(e)
    })?;

    let event = BookingCreatedEvent {
        booking_id: stored.id,
        passenger: Masked::new(stored.booking.record.name.clone()),
        city: stored.booking.record.city.clone(),
        helper: stored.booking.helper.clone(),
        fare: stored.booking.fare,
        created_at: stored.booking.timestamp.clone(),
    };
    info!(?event, "Booking confirmed");

    Ok(Json(BookingResponse {
        status: "success",
        booking: stored,
        fallback: assignment.fallback,
    }))
}

/// GET /bookings
async fn list_bookings(
    State(state): State<AppState>,
) -> Result<Json<BookingListResponse>, AppError> {
    let bookings = state.bookings.list_bookings().await.map_err(|e| {
        error!("Failed to list bookings: {}", e);
        AppError::from(e)
    })?;

    Ok(Json(BookingListResponse { bookings }))
}
