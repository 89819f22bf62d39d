use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Username,
    PasswordHash,
    Role,
    CreatedAt,
}

#[derive(DeriveIden)]
enum BilliardTables {
    Table,
    Id,
    Name,
    Owner,
}

#[derive(DeriveIden)]
enum GameRecords {
    Table,
    Id,
    TableId,
    StartTime,
    EndTime,
    PriceMinor,
    PaymentStatus,
    State,
    CustomerName,
    CreatedBy,
    Confirmed,
    Archived,
}

#[derive(DeriveIden)]
enum UserActivities {
    Table,
    Id,
    UserId,
    Action,
    Timestamp,
    Details,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Username)
                            .string_len(80)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::PasswordHash).string_len(120).not_null())
                    .col(ColumnDef::new(Users::Role).string_len(20).not_null())
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("CURRENT_TIMESTAMP"))
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(BilliardTables::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BilliardTables::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BilliardTables::Name).string_len(50).not_null())
                    .col(ColumnDef::new(BilliardTables::Owner).string_len(20).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(GameRecords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GameRecords::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(GameRecords::TableId).big_integer().not_null())
                    .col(
                        ColumnDef::new(GameRecords::StartTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GameRecords::EndTime)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(GameRecords::PriceMinor)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(GameRecords::PaymentStatus)
                            .string_len(20)
                            .not_null()
                            .default("loan"),
                    )
                    .col(
                        ColumnDef::new(GameRecords::State)
                            .string_len(20)
                            .not_null()
                            .default("in_progress"),
                    )
                    .col(ColumnDef::new(GameRecords::CustomerName).string_len(100).null())
                    .col(ColumnDef::new(GameRecords::CreatedBy).string_len(80).not_null())
                    .col(
                        ColumnDef::new(GameRecords::Confirmed)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(GameRecords::Archived)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_game_records_table_id")
                            .from(GameRecords::Table, GameRecords::TableId)
                            .to(BilliardTables::Table, BilliardTables::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(UserActivities::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserActivities::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(UserActivities::UserId).big_integer().not_null())
                    .col(ColumnDef::new(UserActivities::Action).string_len(200).not_null())
                    .col(
                        ColumnDef::new(UserActivities::Timestamp)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(UserActivities::Details).string_len(500).null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_activities_user_id")
                            .from(UserActivities::Table, UserActivities::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_game_records_start_time")
                    .table(GameRecords::Table)
                    .col(GameRecords::StartTime)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_user_activities_timestamp")
                    .table(UserActivities::Table)
                    .col(UserActivities::Timestamp)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserActivities::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(GameRecords::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(BilliardTables::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}
