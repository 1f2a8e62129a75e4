use sea_orm::entity::prelude::*;

/// Booking aggregate root. The saga drives `status`; game/slot fields are a
/// denormalized snapshot taken at creation time, not a source of truth.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "bookings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub booking_number: String,
    pub user_id: Uuid,
    pub game_id: i64,
    pub game_time_slot_id: i64,
    pub game_name: String,
    pub game_code: String,
    pub club_name: String,
    pub slot_date: Date,
    pub start_time: String,
    pub end_time: String,
    pub player_count: i32,
    pub unit_price: i64,
    pub service_fee: i64,
    pub total_price: i64,
    pub status: String,
    #[sea_orm(unique)]
    pub idempotency_key: String,
    pub saga_fail_reason: Option<String>,
    pub user_email: String,
    pub user_name: String,
    pub user_phone: Option<String>,
    pub special_requests: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::booking_histories::Entity")]
    BookingHistories,
}

impl Related<super::booking_histories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BookingHistories.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
