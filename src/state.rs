use std::sync::Arc;

use crate::appointments::repo::{AppointmentStore, MongoAppointmentStore};
use crate::auth::jwt::JwtKeys;
use crate::auth::repo::{MongoUserStore, UserStore};
use crate::config::AppConfig;
use crate::db;
use crate::hotels::repo::{HotelStore, MongoHotelStore};

/// Shared, read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub jwt: JwtKeys,
    pub users: Arc<dyn UserStore>,
    pub hotels: Arc<dyn HotelStore>,
    pub appointments: Arc<dyn AppointmentStore>,
}

impl AppState {
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let config = Arc::new(config);

        let database = db::connect(&config.mongodb_uri, &config.mongodb_db).await?;
        db::ensure_indexes(&database).await?;

        let deadline = config.db_timeout();
        let users = Arc::new(MongoUserStore::new(&database, deadline)) as Arc<dyn UserStore>;
        let hotels = Arc::new(MongoHotelStore::new(&database, deadline)) as Arc<dyn HotelStore>;
        let appointments =
            Arc::new(MongoAppointmentStore::new(&database, deadline)) as Arc<dyn AppointmentStore>;

        Ok(Self::from_parts(config, users, hotels, appointments))
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        users: Arc<dyn UserStore>,
        hotels: Arc<dyn HotelStore>,
        appointments: Arc<dyn AppointmentStore>,
    ) -> Self {
        let jwt = JwtKeys::new(&config.jwt);
        Self {
            config,
            jwt,
            users,
            hotels,
            appointments,
        }
    }

    /// In-memory stores and a fixed secret.
    #[cfg(test)]
    pub fn fake() -> Self {
        use crate::config::{CookieConfig, JwtConfig};
        use crate::db::memory::{MemoryAppointmentStore, MemoryHotelStore, MemoryUserStore};

        let config = Arc::new(AppConfig {
            host: "127.0.0.1".into(),
            port: 8080,
            json_logs: false,
            mongodb_uri: "mongodb://localhost:27017".into(),
            mongodb_db: "test".into(),
            db_timeout_secs: 10,
            jwt: JwtConfig {
                secret: "test".into(),
                ttl_hours: 72,
            },
            cookie: CookieConfig {
                ttl_hours: 24,
                secure: false,
            },
        });

        Self::from_parts(
            config,
            Arc::new(MemoryUserStore::default()),
            Arc::new(MemoryHotelStore::default()),
            Arc::new(MemoryAppointmentStore::default()),
        )
    }
}
