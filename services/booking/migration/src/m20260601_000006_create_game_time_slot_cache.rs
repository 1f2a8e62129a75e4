use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(GameTimeSlotCache::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GameTimeSlotCache::GameTimeSlotId)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(GameTimeSlotCache::GameId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(GameTimeSlotCache::SlotDate).date().not_null())
                    .col(
                        ColumnDef::new(GameTimeSlotCache::StartTime)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(GameTimeSlotCache::EndTime).string().not_null())
                    .col(
                        ColumnDef::new(GameTimeSlotCache::MaxPlayers)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GameTimeSlotCache::BookedPlayers)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(GameTimeSlotCache::AvailablePlayers)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GameTimeSlotCache::UnitPrice)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GameTimeSlotCache::IsAvailable)
                            .boolean()
                            .not_null(),
                    )
                    .col(ColumnDef::new(GameTimeSlotCache::Status).string().not_null())
                    .col(
                        ColumnDef::new(GameTimeSlotCache::SyncedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Index for availability listings (game + date).
        manager
            .create_index(
                Index::create()
                    .table(GameTimeSlotCache::Table)
                    .col(GameTimeSlotCache::GameId)
                    .col(GameTimeSlotCache::SlotDate)
                    .name("idx_game_time_slot_cache_game_id_slot_date")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(GameTimeSlotCache::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum GameTimeSlotCache {
    Table,
    GameTimeSlotId,
    GameId,
    SlotDate,
    StartTime,
    EndTime,
    MaxPlayers,
    BookedPlayers,
    AvailablePlayers,
    UnitPrice,
    IsAvailable,
    Status,
    SyncedAt,
}
