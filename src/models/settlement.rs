use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Role;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SettleLoanRequest {
    pub customer_name: String,
    pub owner: Role,
    /// 收款金额（生丁），必须为正
    pub amount_minor: i64,
}
