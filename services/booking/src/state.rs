use sea_orm::DatabaseConnection;

use crate::infra::db::{DbBookingRepository, DbOutboxRepository, DbSlotCacheRepository};
use crate::infra::grpc::{GrpcSlotBus, GrpcSlotCatalog};

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub slot_bus: GrpcSlotBus,
    pub slot_catalog: GrpcSlotCatalog,
}

impl AppState {
    pub fn booking_repo(&self) -> DbBookingRepository {
        DbBookingRepository {
            db: self.db.clone(),
        }
    }

    pub fn outbox_repo(&self) -> DbOutboxRepository {
        DbOutboxRepository {
            db: self.db.clone(),
        }
    }

    pub fn slot_cache_repo(&self) -> DbSlotCacheRepository {
        DbSlotCacheRepository {
            db: self.db.clone(),
        }
    }

    pub fn slot_catalog(&self) -> GrpcSlotCatalog {
        self.slot_catalog.clone()
    }

    pub fn bus(&self) -> GrpcSlotBus {
        self.slot_bus.clone()
    }
}
