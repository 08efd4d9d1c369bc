use bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

/// Appointment document in the `appointments` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(rename = "apptDate")]
    pub appt_date: DateTime,
    pub user: ObjectId,               // booking user
    pub hotel: ObjectId,              // booked hotel, cascade-deleted with it
    #[serde(rename = "wifiPassword", default)]
    pub wifi_password: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAppointment {
    #[serde(rename = "apptDate")]
    pub appt_date: DateTime,
    pub user: ObjectId,
    pub hotel: ObjectId,
    #[serde(rename = "wifiPassword")]
    pub wifi_password: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime,
}

impl NewAppointment {
    pub fn with_id(self, id: ObjectId) -> Appointment {
        Appointment {
            id,
            appt_date: self.appt_date,
            user: self.user,
            hotel: self.hotel,
            wifi_password: self.wifi_password,
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AppointmentChanges {
    pub appt_date: Option<DateTime>,
    pub wifi_password: Option<String>,
}

impl AppointmentChanges {
    pub fn is_empty(&self) -> bool {
        self.appt_date.is_none() && self.wifi_password.is_none()
    }

    pub fn to_set_document(&self) -> bson::Document {
        let mut set = bson::Document::new();
        if let Some(d) = self.appt_date {
            set.insert("apptDate", d);
        }
        if let Some(p) = &self.wifi_password {
            set.insert("wifiPassword", p.clone());
        }
        set
    }

    pub fn apply(self, appt: &mut Appointment) {
        if let Some(d) = self.appt_date {
            appt.appt_date = d;
        }
        if let Some(p) = self.wifi_password {
            appt.wifi_password = p;
        }
    }
}
