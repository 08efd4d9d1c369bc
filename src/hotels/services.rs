use bson::oid::ObjectId;
use tracing::{error, info};

use crate::error::AppError;
use crate::hotels::repo_types::{Hotel, HotelChanges, NewHotel};
use crate::state::AppState;

pub async fn list_hotels(st: &AppState) -> Result<Vec<Hotel>, AppError> {
    let hotels = st.hotels.list().await.map_err(|e| {
        error!(error = %e, "list hotels failed");
        AppError::Internal("Error fetching hotels".into())
    })?;
    if hotels.is_empty() {
        return Err(AppError::NotFound("No hotels found".into()));
    }
    Ok(hotels)
}

pub async fn get_hotel(st: &AppState, id: ObjectId) -> Result<Hotel, AppError> {
    match st.hotels.find_by_id(id).await {
        Ok(Some(h)) => Ok(h),
        Ok(None) => Err(AppError::NotFound("Hotel not found".into())),
        Err(e) => {
            error!(error = %e, hotel_id = %id, "find hotel failed");
            Err(AppError::Internal("Error fetching hotel".into()))
        }
    }
}

pub async fn create_hotel(st: &AppState, hotel: NewHotel) -> Result<Hotel, AppError> {
    let id = st.hotels.insert(hotel.clone()).await.map_err(|e| {
        error!(error = %e, "insert hotel failed");
        AppError::Internal("Failed to create hotel".into())
    })?;
    info!(hotel_id = %id, "hotel created");
    Ok(hotel.with_id(id))
}

pub async fn update_hotel(
    st: &AppState,
    id: ObjectId,
    changes: HotelChanges,
) -> Result<Hotel, AppError> {
    match st.hotels.update(id, changes).await {
        Ok(Some(h)) => {
            info!(hotel_id = %id, "hotel updated");
            Ok(h)
        }
        Ok(None) => Err(AppError::NotFound("Hotel not found".into())),
        Err(e) => {
            error!(error = %e, hotel_id = %id, "update hotel failed");
            Err(AppError::Internal("Failed to update hotel".into()))
        }
    }
}

/// Deletes the hotel, then every appointment that references it. The two
/// steps are not atomic: if the second fails the hotel is already gone and
/// its appointments are left orphaned.
pub async fn delete_hotel(st: &AppState, id: ObjectId) -> Result<u64, AppError> {
    match st.hotels.delete(id).await {
        Ok(true) => {}
        Ok(false) => return Err(AppError::NotFound("Hotel not found".into())),
        Err(e) => {
            error!(error = %e, hotel_id = %id, "delete hotel failed");
            return Err(AppError::Internal("Failed to delete hotel".into()));
        }
    }

    let removed = st.appointments.delete_by_hotel(id).await.map_err(|e| {
        error!(error = %e, hotel_id = %id, "cascade delete of appointments failed");
        AppError::Internal("Failed to delete hotel appointments".into())
    })?;
    info!(hotel_id = %id, appointments = removed, "hotel deleted");
    Ok(removed)
}
