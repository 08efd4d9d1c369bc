use bson::DateTime;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::appointments::repo_types::{Appointment, AppointmentChanges};
use crate::error::AppError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAppointmentRequest {
    #[serde(with = "time::serde::rfc3339")]
    pub appt_date: OffsetDateTime,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAppointmentRequest {
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub appt_date: Option<OffsetDateTime>,
    #[serde(default)]
    pub wifi_password: Option<String>,
}

impl UpdateAppointmentRequest {
    pub fn validate(self) -> Result<AppointmentChanges, AppError> {
        if matches!(&self.wifi_password, Some(p) if p.trim().is_empty()) {
            return Err(AppError::Validation("wifiPassword must not be empty".into()));
        }
        Ok(AppointmentChanges {
            appt_date: self.appt_date.map(DateTime::from_time_0_3),
            wifi_password: self.wifi_password,
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentResponse {
    pub id: String,
    #[serde(with = "time::serde::rfc3339")]
    pub appt_date: OffsetDateTime,
    pub user: String,
    pub hotel: String,
    pub wifi_password: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<Appointment> for AppointmentResponse {
    fn from(a: Appointment) -> Self {
        Self {
            id: a.id.to_hex(),
            appt_date: a.appt_date.to_time_0_3(),
            user: a.user.to_hex(),
            hotel: a.hotel.to_hex(),
            wifi_password: a.wifi_password,
            created_at: a.created_at.to_time_0_3(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CreatedAppointmentResponse {
    pub message: &'static str,
    pub appointment: AppointmentResponse,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}
