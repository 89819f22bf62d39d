use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 同一张球台同时只能有一局进行中，由库里的部分唯一索引兜底。
        // sea-query 的索引构建器写不出部分索引，这里直接执行 SQL
        // （PostgreSQL 与 SQLite 语法一致）。
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX idx_game_records_active_table \
                 ON game_records (table_id) WHERE state = 'in_progress'",
            )
            .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP INDEX idx_game_records_active_table")
            .await?;
        Ok(())
    }
}
