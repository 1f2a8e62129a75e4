use sea_orm::entity::prelude::*;

/// Eventually-consistent mirror of a game time slot. Counters are adjusted
/// locally on confirm/cancel but the course service stays authoritative.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "game_time_slot_cache")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub game_time_slot_id: i64,
    pub game_id: i64,
    pub slot_date: Date,
    pub start_time: String,
    pub end_time: String,
    pub max_players: i32,
    pub booked_players: i32,
    pub available_players: i32,
    pub unit_price: i64,
    pub is_available: bool,
    pub status: String,
    pub synced_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
