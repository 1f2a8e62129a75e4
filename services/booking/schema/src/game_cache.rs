use sea_orm::entity::prelude::*;

/// Eventually-consistent mirror of a game owned by the course service.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "game_cache")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub game_id: i64,
    pub name: String,
    pub code: String,
    pub club_name: String,
    pub location: String,
    pub base_price: i64,
    pub max_players: i32,
    pub is_active: bool,
    pub synced_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
