use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(GameCache::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GameCache::GameId)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(GameCache::Name).string().not_null())
                    .col(ColumnDef::new(GameCache::Code).string().not_null())
                    .col(ColumnDef::new(GameCache::ClubName).string().not_null())
                    .col(ColumnDef::new(GameCache::Location).string().not_null())
                    .col(ColumnDef::new(GameCache::BasePrice).big_integer().not_null())
                    .col(ColumnDef::new(GameCache::MaxPlayers).integer().not_null())
                    .col(ColumnDef::new(GameCache::IsActive).boolean().not_null())
                    .col(
                        ColumnDef::new(GameCache::SyncedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(GameCache::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum GameCache {
    Table,
    GameId,
    Name,
    Code,
    ClubName,
    Location,
    BasePrice,
    MaxPlayers,
    IsActive,
    SyncedAt,
}
