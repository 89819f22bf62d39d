use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Role;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(20))")]
pub enum PaymentStatus {
    /// 赊账，待结算
    #[sea_orm(string_value = "loan")]
    #[serde(rename = "loan")]
    Loan,
    #[sea_orm(string_value = "paid")]
    #[serde(rename = "paid")]
    Paid,
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentStatus::Loan => write!(f, "loan"),
            PaymentStatus::Paid => write!(f, "paid"),
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(20))")]
pub enum GameState {
    #[sea_orm(string_value = "in_progress")]
    #[serde(rename = "in_progress")]
    InProgress,
    #[sea_orm(string_value = "finished")]
    #[serde(rename = "finished")]
    Finished,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StartGameRequest {
    pub table_id: i64,
    /// 开台时可先登记顾客，也可留空到确认时再填
    pub customer_name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EndGameRequest {
    pub table_id: i64,
    /// 缺省按已付处理
    pub payment_status: Option<PaymentStatus>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EndGameResponse {
    pub record_id: i64,
    /// 结算价（生丁）
    pub price_minor: i64,
}

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateGameRequest {
    pub price_minor: Option<i64>,
    pub customer_name: Option<String>,
    pub payment_status: Option<PaymentStatus>,
    pub confirm: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GameRecordResponse {
    pub id: i64,
    pub table_id: i64,
    pub table_name: String,
    pub table_owner: Role,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub price_minor: i64,
    pub payment_status: PaymentStatus,
    pub state: GameState,
    pub customer_name: Option<String>,
    pub created_by: String,
    pub confirmed: bool,
    pub archived: bool,
}

/// 进行中对局的实时视图，价格按读取时刻折算
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ActiveGameResponse {
    pub id: i64,
    pub table_id: i64,
    pub table_name: String,
    pub table_owner: Role,
    pub start_time: DateTime<Utc>,
    pub duration_hours: f64,
    pub running_price_minor: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CurrentPriceResponse {
    pub record_id: i64,
    pub duration_hours: f64,
    pub running_price_minor: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TableResponse {
    pub id: i64,
    pub name: String,
    pub owner: Role,
    /// 是否有进行中的对局
    pub occupied: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateTableRequest {
    pub name: String,
    pub owner: Role,
}
