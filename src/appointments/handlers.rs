use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use bson::{oid::ObjectId, DateTime};
use tracing::instrument;

use crate::{
    appointments::{
        dto::{
            AppointmentResponse, CreateAppointmentRequest, CreatedAppointmentResponse,
            MessageResponse, UpdateAppointmentRequest,
        },
        services,
    },
    auth::extractors::{authenticated, restricted, CurrentUser, ADMIN_ONLY},
    db::parse_object_id,
    error::{AppError, AppJson},
    state::AppState,
};

/// Booking a hotel needs any authenticated identity.
pub fn booking_routes(state: &AppState) -> Router<AppState> {
    Router::new().route(
        "/hotels/:id/appointments",
        authenticated(post(add_appointment), state),
    )
}

pub fn admin_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/appointments",
            restricted(get(list_appointments), state, ADMIN_ONLY),
        )
        .route(
            "/appointments/:id",
            restricted(
                get(get_appointment)
                    .put(update_appointment)
                    .delete(delete_appointment),
                state,
                ADMIN_ONLY,
            ),
        )
}

fn appointment_id(raw: &str) -> Result<ObjectId, AppError> {
    parse_object_id(raw).ok_or_else(|| AppError::Validation("Invalid ID Format".into()))
}

#[instrument(skip(state, claims, payload))]
pub async fn add_appointment(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
    Path(hotel_id): Path<String>,
    AppJson(payload): AppJson<CreateAppointmentRequest>,
) -> Result<(StatusCode, Json<CreatedAppointmentResponse>), AppError> {
    let hotel_id = parse_object_id(&hotel_id)
        .ok_or_else(|| AppError::Validation("Invalid Hotel ID Format".into()))?;
    let appt = services::add_appointment(
        &state,
        &claims,
        hotel_id,
        DateTime::from_time_0_3(payload.appt_date),
    )
    .await?;
    Ok((
        StatusCode::CREATED,
        Json(CreatedAppointmentResponse {
            message: "Appointment created successfully",
            appointment: appt.into(),
        }),
    ))
}

#[instrument(skip(state))]
pub async fn list_appointments(
    State(state): State<AppState>,
) -> Result<Json<Vec<AppointmentResponse>>, AppError> {
    let all = services::list_appointments(&state).await?;
    Ok(Json(all.into_iter().map(AppointmentResponse::from).collect()))
}

#[instrument(skip(state))]
pub async fn get_appointment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<AppointmentResponse>, AppError> {
    let appt = services::get_appointment(&state, appointment_id(&id)?).await?;
    Ok(Json(appt.into()))
}

#[instrument(skip(state, payload))]
pub async fn update_appointment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<UpdateAppointmentRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = appointment_id(&id)?;
    services::update_appointment(&state, id, payload.validate()?).await?;
    Ok(Json(MessageResponse {
        message: "Appointment updated successfully",
    }))
}

#[instrument(skip(state))]
pub async fn delete_appointment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    services::delete_appointment(&state, appointment_id(&id)?).await?;
    Ok(Json(MessageResponse {
        message: "Appointment deleted successfully",
    }))
}
