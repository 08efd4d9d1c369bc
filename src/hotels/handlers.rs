use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use bson::oid::ObjectId;
use tracing::instrument;

use crate::{
    auth::extractors::{restricted, ADMIN_ONLY},
    db::parse_object_id,
    error::{AppError, AppJson},
    hotels::{
        dto::{CreateHotelRequest, DeleteHotelResponse, HotelResponse, UpdateHotelRequest},
        services,
    },
    state::AppState,
};

/// Reads are public; writes need an admin token.
pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/hotels",
            get(list_hotels).merge(restricted(post(create_hotel), state, ADMIN_ONLY)),
        )
        .route(
            "/hotels/:id",
            get(get_hotel).merge(restricted(
                put(update_hotel).delete(delete_hotel),
                state,
                ADMIN_ONLY,
            )),
        )
}

pub(crate) fn hotel_id(raw: &str) -> Result<ObjectId, AppError> {
    parse_object_id(raw).ok_or_else(|| AppError::Validation("Invalid ID Format".into()))
}

#[instrument(skip(state))]
pub async fn list_hotels(
    State(state): State<AppState>,
) -> Result<Json<Vec<HotelResponse>>, AppError> {
    let hotels = services::list_hotels(&state).await?;
    Ok(Json(hotels.into_iter().map(HotelResponse::from).collect()))
}

#[instrument(skip(state))]
pub async fn get_hotel(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<HotelResponse>, AppError> {
    let hotel = services::get_hotel(&state, hotel_id(&id)?).await?;
    Ok(Json(hotel.into()))
}

#[instrument(skip(state, payload))]
pub async fn create_hotel(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateHotelRequest>,
) -> Result<(StatusCode, Json<HotelResponse>), AppError> {
    let hotel = services::create_hotel(&state, payload.validate()?).await?;
    Ok((StatusCode::CREATED, Json(hotel.into())))
}

#[instrument(skip(state, payload))]
pub async fn update_hotel(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<UpdateHotelRequest>,
) -> Result<Json<HotelResponse>, AppError> {
    let id = hotel_id(&id)?;
    let hotel = services::update_hotel(&state, id, payload.validate()?).await?;
    Ok(Json(hotel.into()))
}

#[instrument(skip(state))]
pub async fn delete_hotel(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteHotelResponse>, AppError> {
    let removed = services::delete_hotel(&state, hotel_id(&id)?).await?;
    Ok(Json(DeleteHotelResponse {
        success: true,
        deleted_appointments: removed,
    }))
}
