use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, JoinType, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait, Set, TransactionTrait,
};

use crate::database::DbConn;
use crate::entities::{billiard_tables, game_records};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::record_activity;
use crate::utils::format_mad;

/// 赊账结算：收到的现金按开台时间从旧到新冲抵顾客的赊账记录，
/// 冲不满一条时把那条拆成「已付」与「剩余赊账」两段。
#[derive(Clone)]
pub struct SettlementService {
    db: DbConn,
}

impl SettlementService {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    pub async fn settle_loan(
        &self,
        actor: &CurrentUser,
        request: SettleLoanRequest,
    ) -> AppResult<()> {
        if !actor.role.is_admin() {
            return Err(AppError::PermissionDenied);
        }
        let customer_name = request.customer_name.trim().to_string();
        if customer_name.is_empty() {
            return Err(AppError::Validation(
                "Customer name is required".to_string(),
            ));
        }
        if request.owner.is_admin() {
            return Err(AppError::Validation(
                "Owner must be one of the table owners".to_string(),
            ));
        }
        // 金额校验在碰任何记录之前
        if request.amount_minor <= 0 {
            return Err(AppError::Validation(
                "Settlement amount must be positive".to_string(),
            ));
        }

        let txn = self.db.begin().await?;

        // 最旧的债先还
        let loans = game_records::Entity::find()
            .join(JoinType::InnerJoin, game_records::Relation::Table.def())
            .filter(billiard_tables::Column::Owner.eq(request.owner))
            .filter(game_records::Column::CustomerName.eq(customer_name.as_str()))
            .filter(game_records::Column::PaymentStatus.eq(PaymentStatus::Loan))
            .filter(game_records::Column::Confirmed.eq(true))
            .filter(game_records::Column::Archived.eq(false))
            .order_by_asc(game_records::Column::StartTime)
            .all(&txn)
            .await?;

        let mut remaining = request.amount_minor;
        for record in loans {
            if remaining <= 0 {
                break;
            }

            if remaining >= record.price_minor {
                // 整条冲抵
                remaining -= record.price_minor;
                let mut active: game_records::ActiveModel = record.into();
                active.payment_status = Set(PaymentStatus::Paid);
                active.update(&txn).await?;
            } else {
                // 拆分：已付部分单独成一条，原记录留剩余赊账
                game_records::ActiveModel {
                    table_id: Set(record.table_id),
                    start_time: Set(record.start_time),
                    end_time: Set(record.end_time),
                    price_minor: Set(remaining),
                    payment_status: Set(PaymentStatus::Paid),
                    state: Set(GameState::Finished),
                    customer_name: Set(record.customer_name.clone()),
                    created_by: Set(actor.username.clone()),
                    confirmed: Set(true),
                    archived: Set(false),
                    ..Default::default()
                }
                .insert(&txn)
                .await?;

                let reduced = record.price_minor - remaining;
                let mut active: game_records::ActiveModel = record.into();
                active.price_minor = Set(reduced);
                active.update(&txn).await?;
                remaining = 0;
            }
        }

        // 超出欠款总额的部分直接丢弃，既不报错也不挂账
        record_activity(
            &txn,
            actor.id,
            "Processed loan payment",
            Some(format!(
                "Customer: {}, Owner: {}, Amount: {}",
                customer_name,
                request.owner,
                format_mad(request.amount_minor)
            )),
        )
        .await?;
        txn.commit().await?;

        log::info!(
            "Settled {} against loans of customer {customer_name}",
            format_mad(request.amount_minor)
        );
        Ok(())
    }
}
