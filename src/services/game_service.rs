use std::collections::HashSet;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, EntityTrait, QueryFilter, QueryOrder, Set,
    SqlErr, TransactionTrait,
};

use crate::database::DbConn;
use crate::entities::{billiard_tables, game_records};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::record_activity;
use crate::utils::{elapsed_hours, local_day_bounds, session_price_minor, today_local};

/// 对局生命周期：开台 → 结束 → 确认，归档与删除由管理员处理。
/// 每个变更操作单独一个事务，审计写入同一事务。
#[derive(Clone)]
pub struct GameService {
    db: DbConn,
    hourly_rate: f64,
}

impl GameService {
    pub fn new(db: DbConn, hourly_rate: f64) -> Self {
        Self { db, hourly_rate }
    }

    /// 非管理员只能操作自己名下的球台
    fn authorize_table(actor: &CurrentUser, table: &billiard_tables::Model) -> AppResult<()> {
        if actor.role.is_admin() || actor.role == table.owner {
            Ok(())
        } else {
            Err(AppError::PermissionDenied)
        }
    }

    async fn find_table(
        txn: &DatabaseTransaction,
        table_id: i64,
    ) -> AppResult<billiard_tables::Model> {
        billiard_tables::Entity::find_by_id(table_id)
            .one(txn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Table {table_id} not found")))
    }

    pub async fn list_tables(&self, actor: &CurrentUser) -> AppResult<Vec<TableResponse>> {
        let mut query = billiard_tables::Entity::find();
        if !actor.role.is_admin() {
            query = query.filter(billiard_tables::Column::Owner.eq(actor.role));
        }
        let tables = query
            .order_by_asc(billiard_tables::Column::Id)
            .all(&self.db)
            .await?;

        let occupied: HashSet<i64> = game_records::Entity::find()
            .filter(game_records::Column::State.eq(GameState::InProgress))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|record| record.table_id)
            .collect();

        Ok(tables
            .into_iter()
            .map(|table| TableResponse {
                occupied: occupied.contains(&table.id),
                id: table.id,
                name: table.name,
                owner: table.owner,
            })
            .collect())
    }

    pub async fn create_table(
        &self,
        actor: &CurrentUser,
        request: CreateTableRequest,
    ) -> AppResult<TableResponse> {
        if !actor.role.is_admin() {
            return Err(AppError::PermissionDenied);
        }
        let name = request.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::Validation("Table name is required".to_string()));
        }
        if request.owner.is_admin() {
            return Err(AppError::Validation(
                "Tables must belong to an owner".to_string(),
            ));
        }

        let txn = self.db.begin().await?;
        let table = billiard_tables::ActiveModel {
            name: Set(name),
            owner: Set(request.owner),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        record_activity(
            &txn,
            actor.id,
            "Created table",
            Some(format!("Table: {}, Owner: {}", table.name, table.owner)),
        )
        .await?;
        txn.commit().await?;

        Ok(TableResponse {
            id: table.id,
            name: table.name,
            owner: table.owner,
            occupied: false,
        })
    }

    /// 进行中对局的实时视图。价格按当前时刻折算，不落库。
    pub async fn list_active(&self, actor: &CurrentUser) -> AppResult<Vec<ActiveGameResponse>> {
        let mut query = game_records::Entity::find()
            .find_also_related(billiard_tables::Entity)
            .filter(game_records::Column::State.eq(GameState::InProgress));
        if !actor.role.is_admin() {
            query = query.filter(billiard_tables::Column::Owner.eq(actor.role));
        }
        let rows = query
            .order_by_asc(game_records::Column::StartTime)
            .all(&self.db)
            .await?;

        let now = Utc::now();
        let mut games = Vec::with_capacity(rows.len());
        for (record, table) in rows {
            let table = table.ok_or_else(|| {
                AppError::Internal(format!("Game record {} has no table", record.id))
            })?;
            games.push(ActiveGameResponse {
                id: record.id,
                table_id: table.id,
                table_name: table.name,
                table_owner: table.owner,
                start_time: record.start_time,
                duration_hours: elapsed_hours(record.start_time, now),
                running_price_minor: session_price_minor(record.start_time, now, self.hourly_rate),
            });
        }
        Ok(games)
    }

    /// 未归档记录列表（看板用），管理员可见全部
    pub async fn list_records(&self, actor: &CurrentUser) -> AppResult<Vec<GameRecordResponse>> {
        let mut query = game_records::Entity::find()
            .find_also_related(billiard_tables::Entity)
            .filter(game_records::Column::Archived.eq(false));
        if !actor.role.is_admin() {
            query = query.filter(billiard_tables::Column::Owner.eq(actor.role));
        }
        let rows = query
            .order_by_desc(game_records::Column::StartTime)
            .all(&self.db)
            .await?;

        rows.into_iter()
            .map(|(record, table)| {
                let table = table.ok_or_else(|| {
                    AppError::Internal(format!("Game record {} has no table", record.id))
                })?;
                Ok(GameRecordResponse {
                    id: record.id,
                    table_id: table.id,
                    table_name: table.name,
                    table_owner: table.owner,
                    start_time: record.start_time,
                    end_time: record.end_time,
                    price_minor: record.price_minor,
                    payment_status: record.payment_status,
                    state: record.state,
                    customer_name: record.customer_name,
                    created_by: record.created_by,
                    confirmed: record.confirmed,
                    archived: record.archived,
                })
            })
            .collect()
    }

    pub async fn start_game(
        &self,
        actor: &CurrentUser,
        request: StartGameRequest,
    ) -> AppResult<GameRecordResponse> {
        let txn = self.db.begin().await?;
        let table = Self::find_table(&txn, request.table_id).await?;
        Self::authorize_table(actor, &table)?;

        let active = game_records::Entity::find()
            .filter(game_records::Column::TableId.eq(table.id))
            .filter(game_records::Column::State.eq(GameState::InProgress))
            .one(&txn)
            .await?;
        if active.is_some() {
            return Err(AppError::Conflict(
                "Table already has an active game".to_string(),
            ));
        }

        let customer_name = request
            .customer_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string);

        let inserted = game_records::ActiveModel {
            table_id: Set(table.id),
            start_time: Set(Utc::now()),
            price_minor: Set(0),
            payment_status: Set(PaymentStatus::Loan),
            state: Set(GameState::InProgress),
            customer_name: Set(customer_name),
            created_by: Set(actor.username.clone()),
            confirmed: Set(false),
            archived: Set(false),
            ..Default::default()
        }
        .insert(&txn)
        .await;

        // 并发开台由库里的唯一索引兜底，输家拿到冲突错误
        let record = match inserted {
            Ok(record) => record,
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                return Err(AppError::Conflict(
                    "Table already has an active game".to_string(),
                ));
            }
            Err(e) => return Err(e.into()),
        };

        record_activity(
            &txn,
            actor.id,
            "Started game",
            Some(format!("Table: {}", table.name)),
        )
        .await?;
        txn.commit().await?;

        log::info!("Game {} started on table {}", record.id, table.name);
        Ok(Self::response_from(record, table))
    }

    pub async fn end_game(
        &self,
        actor: &CurrentUser,
        request: EndGameRequest,
    ) -> AppResult<EndGameResponse> {
        let txn = self.db.begin().await?;
        let table = Self::find_table(&txn, request.table_id).await?;
        Self::authorize_table(actor, &table)?;

        let record = game_records::Entity::find()
            .filter(game_records::Column::TableId.eq(table.id))
            .filter(game_records::Column::State.eq(GameState::InProgress))
            .one(&txn)
            .await?
            .ok_or_else(|| {
                AppError::NotFound("No active game found for this table".to_string())
            })?;

        let now = Utc::now();
        let price_minor = session_price_minor(record.start_time, now, self.hourly_rate);
        let payment_status = request.payment_status.unwrap_or(PaymentStatus::Paid);
        let customer_name = record.customer_name.clone();
        let record_id = record.id;

        let mut active: game_records::ActiveModel = record.into();
        active.end_time = Set(Some(now));
        active.state = Set(GameState::Finished);
        active.price_minor = Set(price_minor);
        active.payment_status = Set(payment_status);
        active.update(&txn).await?;

        record_activity(
            &txn,
            actor.id,
            "Ended game",
            Some(format!(
                "Table: {}, Customer: {}, Price: {}, Payment: {}",
                table.name,
                customer_name.as_deref().unwrap_or("-"),
                price_minor,
                payment_status
            )),
        )
        .await?;
        txn.commit().await?;

        log::info!("Game {record_id} ended with price {price_minor}");
        Ok(EndGameResponse {
            record_id,
            price_minor,
        })
    }

    /// 读取时刻折算的当前价，没有任何后台计时器
    pub async fn current_price(
        &self,
        actor: &CurrentUser,
        record_id: i64,
    ) -> AppResult<CurrentPriceResponse> {
        let (record, table) = self.find_record_with_table(record_id).await?;
        Self::authorize_table(actor, &table)?;

        let response = match record.state {
            GameState::InProgress => {
                let now = Utc::now();
                CurrentPriceResponse {
                    record_id: record.id,
                    duration_hours: elapsed_hours(record.start_time, now),
                    running_price_minor: session_price_minor(
                        record.start_time,
                        now,
                        self.hourly_rate,
                    ),
                }
            }
            GameState::Finished => {
                let end = record.end_time.unwrap_or(record.start_time);
                CurrentPriceResponse {
                    record_id: record.id,
                    duration_hours: elapsed_hours(record.start_time, end),
                    running_price_minor: record.price_minor,
                }
            }
        };
        Ok(response)
    }

    pub async fn update_record(
        &self,
        actor: &CurrentUser,
        record_id: i64,
        request: UpdateGameRequest,
    ) -> AppResult<GameRecordResponse> {
        let txn = self.db.begin().await?;
        let record = game_records::Entity::find_by_id(record_id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Game record {record_id} not found")))?;
        let table = Self::find_table(&txn, record.table_id).await?;
        Self::authorize_table(actor, &table)?;

        // 已确认记录冻结，只有结算拆分 / 归档 / 删除能再动它
        if record.confirmed {
            return Err(AppError::AlreadyConfirmed);
        }

        let mut customer_name = record.customer_name.clone();
        let mut confirmed = record.confirmed;
        let mut active: game_records::ActiveModel = record.clone().into();

        if let Some(price_minor) = request.price_minor {
            if price_minor < 0 {
                return Err(AppError::Validation(
                    "Price must not be negative".to_string(),
                ));
            }
            active.price_minor = Set(price_minor);
        }

        if let Some(name) = &request.customer_name {
            let name = name.trim();
            if name.is_empty() {
                return Err(AppError::Validation(
                    "Customer name must not be empty".to_string(),
                ));
            }
            customer_name = Some(name.to_string());
            active.customer_name = Set(customer_name.clone());
        }

        if let Some(payment_status) = request.payment_status {
            active.payment_status = Set(payment_status);
            // 标记已付即视为确认
            if payment_status == PaymentStatus::Paid {
                confirmed = true;
            }
        }

        if request.confirm.unwrap_or(false) {
            if customer_name.as_deref().is_none_or(str::is_empty) {
                return Err(AppError::Validation(
                    "Customer name is required".to_string(),
                ));
            }
            confirmed = true;
        }

        active.confirmed = Set(confirmed);
        let updated = active.update(&txn).await?;

        record_activity(
            &txn,
            actor.id,
            "Updated game",
            Some(format!("Game ID: {record_id}")),
        )
        .await?;
        txn.commit().await?;

        Ok(Self::response_from(updated, table))
    }

    /// 管理员纠错用，不看状态直接删
    pub async fn delete_record(&self, actor: &CurrentUser, record_id: i64) -> AppResult<()> {
        if !actor.role.is_admin() {
            return Err(AppError::PermissionDenied);
        }

        let txn = self.db.begin().await?;
        let record = game_records::Entity::find_by_id(record_id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Game record {record_id} not found")))?;

        game_records::Entity::delete_by_id(record.id).exec(&txn).await?;
        record_activity(
            &txn,
            actor.id,
            "Deleted game",
            Some(format!(
                "Game ID: {}, Customer: {}, Price: {}",
                record.id,
                record.customer_name.as_deref().unwrap_or("-"),
                record.price_minor
            )),
        )
        .await?;
        txn.commit().await?;
        Ok(())
    }

    /// 日结归档：当天已确认未归档的记录整体移出看板，留作历史发票
    pub async fn archive_today(&self, actor: &CurrentUser) -> AppResult<u64> {
        if !actor.role.is_admin() {
            return Err(AppError::PermissionDenied);
        }

        let today = today_local();
        let (day_start, day_end) = local_day_bounds(today)?;

        let txn = self.db.begin().await?;
        let result = game_records::Entity::update_many()
            .col_expr(game_records::Column::Archived, sea_orm::sea_query::Expr::value(true))
            .filter(game_records::Column::Confirmed.eq(true))
            .filter(game_records::Column::Archived.eq(false))
            .filter(game_records::Column::StartTime.gte(day_start))
            .filter(game_records::Column::StartTime.lt(day_end))
            .exec(&txn)
            .await?;

        record_activity(
            &txn,
            actor.id,
            "Archived day",
            Some(format!("Date: {today}, Records: {}", result.rows_affected)),
        )
        .await?;
        txn.commit().await?;

        log::info!("Archived {} records for {today}", result.rows_affected);
        Ok(result.rows_affected)
    }

    async fn find_record_with_table(
        &self,
        record_id: i64,
    ) -> AppResult<(game_records::Model, billiard_tables::Model)> {
        let (record, table) = game_records::Entity::find_by_id(record_id)
            .find_also_related(billiard_tables::Entity)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Game record {record_id} not found")))?;
        let table = table.ok_or_else(|| {
            AppError::Internal(format!("Game record {record_id} has no table"))
        })?;
        Ok((record, table))
    }

    fn response_from(
        record: game_records::Model,
        table: billiard_tables::Model,
    ) -> GameRecordResponse {
        GameRecordResponse {
            id: record.id,
            table_id: table.id,
            table_name: table.name,
            table_owner: table.owner,
            start_time: record.start_time,
            end_time: record.end_time,
            price_minor: record.price_minor,
            payment_status: record.payment_status,
            state: record.state,
            customer_name: record.customer_name,
            created_by: record.created_by,
            confirmed: record.confirmed,
            archived: record.archived,
        }
    }
}
