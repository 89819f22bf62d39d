use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Role;

/// 单个顾客的已付 / 赊账小计（生丁）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CustomerTotals {
    pub paid_minor: i64,
    pub loan_minor: i64,
}

/// 单个台主的汇总，按需重算，从不缓存
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OwnerSummary {
    pub owner: Role,
    pub total_paid_minor: i64,
    pub total_loan_minor: i64,
    pub customers: BTreeMap<String, CustomerTotals>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SummaryResponse {
    pub owners: Vec<OwnerSummary>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SummaryQuery {
    pub owner: Option<Role>,
}
