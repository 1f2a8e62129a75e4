use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Bookings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Bookings::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Bookings::BookingNumber)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Bookings::UserId).uuid().not_null())
                    .col(ColumnDef::new(Bookings::GameId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Bookings::GameTimeSlotId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Bookings::GameName).string().not_null())
                    .col(ColumnDef::new(Bookings::GameCode).string().not_null())
                    .col(ColumnDef::new(Bookings::ClubName).string().not_null())
                    .col(ColumnDef::new(Bookings::SlotDate).date().not_null())
                    .col(ColumnDef::new(Bookings::StartTime).string().not_null())
                    .col(ColumnDef::new(Bookings::EndTime).string().not_null())
                    .col(ColumnDef::new(Bookings::PlayerCount).integer().not_null())
                    .col(ColumnDef::new(Bookings::UnitPrice).big_integer().not_null())
                    .col(
                        ColumnDef::new(Bookings::ServiceFee)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Bookings::TotalPrice)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Bookings::Status).string().not_null())
                    .col(
                        ColumnDef::new(Bookings::IdempotencyKey)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Bookings::SagaFailReason).string())
                    .col(ColumnDef::new(Bookings::UserEmail).string().not_null())
                    .col(ColumnDef::new(Bookings::UserName).string().not_null())
                    .col(ColumnDef::new(Bookings::UserPhone).string())
                    .col(ColumnDef::new(Bookings::SpecialRequests).string())
                    .col(
                        ColumnDef::new(Bookings::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Bookings::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Index for the timeout sweeper (status + created_at range scan).
        manager
            .create_index(
                Index::create()
                    .table(Bookings::Table)
                    .col(Bookings::Status)
                    .col(Bookings::CreatedAt)
                    .name("idx_bookings_status_created_at")
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(Bookings::Table)
                    .col(Bookings::UserId)
                    .name("idx_bookings_user_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Bookings::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Bookings {
    Table,
    Id,
    BookingNumber,
    UserId,
    GameId,
    GameTimeSlotId,
    GameName,
    GameCode,
    ClubName,
    SlotDate,
    StartTime,
    EndTime,
    PlayerCount,
    UnitPrice,
    ServiceFee,
    TotalPrice,
    Status,
    IdempotencyKey,
    SagaFailReason,
    UserEmail,
    UserName,
    UserPhone,
    SpecialRequests,
    CreatedAt,
    UpdatedAt,
}
