use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ActivityResponse {
    pub id: i64,
    pub user_id: i64,
    pub action: String,
    pub timestamp: DateTime<Utc>,
    pub details: Option<String>,
}

impl From<crate::entities::user_activities::Model> for ActivityResponse {
    fn from(activity: crate::entities::user_activities::Model) -> Self {
        Self {
            id: activity.id,
            user_id: activity.user_id,
            action: activity.action,
            timestamp: activity.timestamp,
            details: activity.details,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ActivityQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}
