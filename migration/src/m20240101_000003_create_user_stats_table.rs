use sea_orm_migration::prelude::*;

use crate::m20240101_000001_create_users_table::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserStats::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserStats::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(UserStats::UserId)
                            .integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(UserStats::TotalGames)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(UserStats::Wins).integer().not_null().default(0))
                    .col(
                        ColumnDef::new(UserStats::Losses)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(UserStats::Draws).integer().not_null().default(0))
                    .col(
                        ColumnDef::new(UserStats::CurrentStreak)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(UserStats::BestStreak)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(UserStats::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_stats_user_id")
                            .from(UserStats::Table, UserStats::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserStats::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum UserStats {
    Table,
    Id,
    UserId,
    TotalGames,
    Wins,
    Losses,
    Draws,
    CurrentStreak,
    BestStreak,
    UpdatedAt,
}
