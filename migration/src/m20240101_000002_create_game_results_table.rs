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
                    .table(GameResults::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GameResults::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(GameResults::UserId).integer().null())
                    .col(ColumnDef::new(GameResults::PlayerChoice).string().not_null())
                    .col(
                        ColumnDef::new(GameResults::ComputerChoice)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(GameResults::Result).string().not_null())
                    .col(
                        ColumnDef::new(GameResults::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_game_results_user_id")
                            .from(GameResults::Table, GameResults::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Recent-games lookups filter by user and sort by time
        manager
            .create_index(
                Index::create()
                    .name("idx_game_results_user_created")
                    .table(GameResults::Table)
                    .col(GameResults::UserId)
                    .col(GameResults::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(GameResults::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum GameResults {
    Table,
    Id,
    UserId,
    PlayerChoice,
    ComputerChoice,
    Result,
    CreatedAt,
}
