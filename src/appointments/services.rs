use bson::{oid::ObjectId, DateTime};
use rand::{distributions::Alphanumeric, Rng};
use tracing::{error, info};

use crate::appointments::repo_types::{Appointment, AppointmentChanges, NewAppointment};
use crate::auth::{claims::Claims, services::who_am_i};
use crate::error::AppError;
use crate::hotels::services::get_hotel;
use crate::state::AppState;

/// Random `[a-zA-Z0-9]` string of 6 to 8 characters.
pub fn generate_wifi_password() -> String {
    let mut rng = rand::thread_rng();
    let len = rng.gen_range(6..=8);
    (0..len).map(|_| rng.sample(Alphanumeric) as char).collect()
}

/// Books `hotel_id` for the caller. The booking user is resolved from the
/// token, never taken from the request body.
pub async fn add_appointment(
    st: &AppState,
    claims: &Claims,
    hotel_id: ObjectId,
    appt_date: DateTime,
) -> Result<Appointment, AppError> {
    let hotel = get_hotel(st, hotel_id).await?;
    let user = who_am_i(st, claims).await?;

    let new_appt = NewAppointment {
        appt_date,
        user: user.id,
        hotel: hotel.id,
        wifi_password: generate_wifi_password(),
        created_at: DateTime::now(),
    };
    let id = st.appointments.insert(new_appt.clone()).await.map_err(|e| {
        error!(error = %e, "insert appointment failed");
        AppError::Internal("Failed to create appointment".into())
    })?;
    info!(appointment_id = %id, hotel_id = %hotel.id, user_id = %user.id, "appointment created");
    Ok(new_appt.with_id(id))
}

pub async fn list_appointments(st: &AppState) -> Result<Vec<Appointment>, AppError> {
    let all = st.appointments.list().await.map_err(|e| {
        error!(error = %e, "list appointments failed");
        AppError::Internal("Error fetching appointments".into())
    })?;
    if all.is_empty() {
        return Err(AppError::NotFound("No appointments found".into()));
    }
    Ok(all)
}

pub async fn get_appointment(st: &AppState, id: ObjectId) -> Result<Appointment, AppError> {
    match st.appointments.find_by_id(id).await {
        Ok(Some(a)) => Ok(a),
        Ok(None) => Err(AppError::NotFound("Appointment not found".into())),
        Err(e) => {
            error!(error = %e, appointment_id = %id, "find appointment failed");
            Err(AppError::Internal("Error fetching appointment".into()))
        }
    }
}

pub async fn update_appointment(
    st: &AppState,
    id: ObjectId,
    changes: AppointmentChanges,
) -> Result<(), AppError> {
    match st.appointments.update(id, changes).await {
        Ok(true) => {
            info!(appointment_id = %id, "appointment updated");
            Ok(())
        }
        Ok(false) => Err(AppError::NotFound("Appointment not found".into())),
        Err(e) => {
            error!(error = %e, appointment_id = %id, "update appointment failed");
            Err(AppError::Internal("Failed to update appointment".into()))
        }
    }
}

pub async fn delete_appointment(st: &AppState, id: ObjectId) -> Result<(), AppError> {
    match st.appointments.delete(id).await {
        Ok(true) => {
            info!(appointment_id = %id, "appointment deleted");
            Ok(())
        }
        Ok(false) => Err(AppError::NotFound("Appointment not found".into())),
        Err(e) => {
            error!(error = %e, appointment_id = %id, "delete appointment failed");
            Err(AppError::Internal("Failed to delete appointment".into()))
        }
    }
}
