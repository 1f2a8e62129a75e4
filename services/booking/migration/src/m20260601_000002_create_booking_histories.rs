use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BookingHistories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BookingHistories::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(BookingHistories::BookingId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(BookingHistories::Action).string().not_null())
                    .col(
                        ColumnDef::new(BookingHistories::Details)
                            .json_binary()
                            .not_null(),
                    )
                    .col(ColumnDef::new(BookingHistories::UserId).uuid().not_null())
                    .col(
                        ColumnDef::new(BookingHistories::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(BookingHistories::Table, BookingHistories::BookingId)
                            .to(Bookings::Table, Bookings::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(BookingHistories::Table)
                    .col(BookingHistories::BookingId)
                    .name("idx_booking_histories_booking_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BookingHistories::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum BookingHistories {
    Table,
    Id,
    BookingId,
    Action,
    Details,
    UserId,
    CreatedAt,
}

#[derive(Iden)]
enum Bookings {
    Table,
    Id,
}
