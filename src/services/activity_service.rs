use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryOrder, QuerySelect, Set,
};

use crate::database::DbConn;
use crate::entities::user_activities;
use crate::error::{AppError, AppResult};
use crate::models::*;

/// 审计日志追加。与业务变更同事务时传入事务连接，保证一起提交或一起回滚。
pub async fn record_activity<C: ConnectionTrait>(
    conn: &C,
    user_id: i64,
    action: &str,
    details: Option<String>,
) -> AppResult<()> {
    user_activities::ActiveModel {
        user_id: Set(user_id),
        action: Set(action.to_string()),
        timestamp: Set(Utc::now()),
        details: Set(details),
        ..Default::default()
    }
    .insert(conn)
    .await?;
    Ok(())
}

#[derive(Clone)]
pub struct ActivityService {
    db: DbConn,
}

impl ActivityService {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    /// 审计日志只读查询，按时间倒序，仅管理员可见
    pub async fn list(
        &self,
        actor: &CurrentUser,
        query: &ActivityQuery,
    ) -> AppResult<PaginatedResponse<ActivityResponse>> {
        if !actor.role.is_admin() {
            return Err(AppError::PermissionDenied);
        }

        let params = PaginationParams::new(query.page, query.page_size);

        let total = user_activities::Entity::find().count(&self.db).await? as i64;

        let activities = user_activities::Entity::find()
            .order_by_desc(user_activities::Column::Timestamp)
            .offset(params.offset())
            .limit(params.limit())
            .all(&self.db)
            .await?;

        let data = activities.into_iter().map(ActivityResponse::from).collect();
        Ok(PaginatedResponse::new(data, &params, total))
    }
}
