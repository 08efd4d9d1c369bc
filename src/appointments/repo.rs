use std::time::Duration;

use async_trait::async_trait;
use bson::{doc, oid::ObjectId};
use futures_util::TryStreamExt;
use mongodb::{Collection, Database};

use crate::appointments::repo_types::{Appointment, AppointmentChanges, NewAppointment};
use crate::db::{with_deadline, StoreError, APPOINTMENT_COLLECTION};

#[async_trait]
pub trait AppointmentStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Appointment>, StoreError>;
    async fn find_by_id(&self, id: ObjectId) -> Result<Option<Appointment>, StoreError>;
    async fn insert(&self, appt: NewAppointment) -> Result<ObjectId, StoreError>;
    /// True if an appointment with `id` exists.
    async fn update(&self, id: ObjectId, changes: AppointmentChanges)
        -> Result<bool, StoreError>;
    async fn delete(&self, id: ObjectId) -> Result<bool, StoreError>;
    /// Removes every appointment for `hotel`; returns how many.
    async fn delete_by_hotel(&self, hotel: ObjectId) -> Result<u64, StoreError>;
}

#[derive(Clone)]
pub struct MongoAppointmentStore {
    appointments: Collection<Appointment>,
    deadline: Duration,
}

impl MongoAppointmentStore {
    pub fn new(db: &Database, deadline: Duration) -> Self {
        Self {
            appointments: db.collection(APPOINTMENT_COLLECTION),
            deadline,
        }
    }
}

#[async_trait]
impl AppointmentStore for MongoAppointmentStore {
    async fn list(&self) -> Result<Vec<Appointment>, StoreError> {
        with_deadline(self.deadline, async {
            self.appointments.find(doc! {}).await?.try_collect().await
        })
        .await
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<Appointment>, StoreError> {
        with_deadline(self.deadline, self.appointments.find_one(doc! { "_id": id })).await
    }

    async fn insert(&self, appt: NewAppointment) -> Result<ObjectId, StoreError> {
        let pending = self.appointments.clone_with_type::<NewAppointment>();
        let res = with_deadline(self.deadline, pending.insert_one(appt)).await?;
        res.inserted_id
            .as_object_id()
            .ok_or_else(|| StoreError::Database("inserted id is not an ObjectId".into()))
    }

    async fn update(
        &self,
        id: ObjectId,
        changes: AppointmentChanges,
    ) -> Result<bool, StoreError> {
        if changes.is_empty() {
            return Ok(self.find_by_id(id).await?.is_some());
        }
        let update = doc! { "$set": changes.to_set_document() };
        let res = with_deadline(
            self.deadline,
            self.appointments.update_one(doc! { "_id": id }, update),
        )
        .await?;
        Ok(res.matched_count > 0)
    }

    async fn delete(&self, id: ObjectId) -> Result<bool, StoreError> {
        let res = with_deadline(
            self.deadline,
            self.appointments.delete_one(doc! { "_id": id }),
        )
        .await?;
        Ok(res.deleted_count > 0)
    }

    async fn delete_by_hotel(&self, hotel: ObjectId) -> Result<u64, StoreError> {
        let res = with_deadline(
            self.deadline,
            self.appointments.delete_many(doc! { "hotel": hotel }),
        )
        .await?;
        Ok(res.deleted_count)
    }
}
