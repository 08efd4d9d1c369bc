//! In-memory stores backing `AppState::fake`.

use async_trait::async_trait;
use bson::oid::ObjectId;
use tokio::sync::RwLock;

use super::StoreError;
use crate::appointments::{
    repo::AppointmentStore,
    repo_types::{Appointment, AppointmentChanges, NewAppointment},
};
use crate::auth::{
    repo::UserStore,
    repo_types::{NewUser, User},
};
use crate::hotels::{
    repo::HotelStore,
    repo_types::{Hotel, HotelChanges, NewHotel},
};

/// Mirrors the unique index on `users.email`.
#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<Vec<User>>,
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn exists_by_email(&self, email: &str) -> Result<bool, StoreError> {
        Ok(self.users.read().await.iter().any(|u| u.email == email))
    }

    async fn insert(&self, user: NewUser) -> Result<ObjectId, StoreError> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::Duplicate);
        }
        let id = ObjectId::new();
        users.push(user.with_id(id));
        Ok(id)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .users
            .read()
            .await
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }
}

#[derive(Default)]
pub struct MemoryHotelStore {
    hotels: RwLock<Vec<Hotel>>,
}

#[async_trait]
impl HotelStore for MemoryHotelStore {
    async fn list(&self) -> Result<Vec<Hotel>, StoreError> {
        Ok(self.hotels.read().await.clone())
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<Hotel>, StoreError> {
        Ok(self.hotels.read().await.iter().find(|h| h.id == id).cloned())
    }

    async fn insert(&self, hotel: NewHotel) -> Result<ObjectId, StoreError> {
        let id = ObjectId::new();
        self.hotels.write().await.push(hotel.with_id(id));
        Ok(id)
    }

    async fn update(
        &self,
        id: ObjectId,
        changes: HotelChanges,
    ) -> Result<Option<Hotel>, StoreError> {
        let mut hotels = self.hotels.write().await;
        Ok(hotels.iter_mut().find(|h| h.id == id).map(|h| {
            changes.apply(h);
            h.clone()
        }))
    }

    async fn delete(&self, id: ObjectId) -> Result<bool, StoreError> {
        let mut hotels = self.hotels.write().await;
        let before = hotels.len();
        hotels.retain(|h| h.id != id);
        Ok(hotels.len() < before)
    }
}

#[derive(Default)]
pub struct MemoryAppointmentStore {
    appointments: RwLock<Vec<Appointment>>,
}

#[async_trait]
impl AppointmentStore for MemoryAppointmentStore {
    async fn list(&self) -> Result<Vec<Appointment>, StoreError> {
        Ok(self.appointments.read().await.clone())
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<Appointment>, StoreError> {
        Ok(self
            .appointments
            .read()
            .await
            .iter()
            .find(|a| a.id == id)
            .cloned())
    }

    async fn insert(&self, appt: NewAppointment) -> Result<ObjectId, StoreError> {
        let id = ObjectId::new();
        self.appointments.write().await.push(appt.with_id(id));
        Ok(id)
    }

    async fn update(
        &self,
        id: ObjectId,
        changes: AppointmentChanges,
    ) -> Result<bool, StoreError> {
        let mut appointments = self.appointments.write().await;
        match appointments.iter_mut().find(|a| a.id == id) {
            Some(a) => {
                changes.apply(a);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: ObjectId) -> Result<bool, StoreError> {
        let mut appointments = self.appointments.write().await;
        let before = appointments.len();
        appointments.retain(|a| a.id != id);
        Ok(appointments.len() < before)
    }

    async fn delete_by_hotel(&self, hotel: ObjectId) -> Result<u64, StoreError> {
        let mut appointments = self.appointments.write().await;
        let before = appointments.len();
        appointments.retain(|a| a.hotel != hotel);
        Ok((before - appointments.len()) as u64)
    }
}
