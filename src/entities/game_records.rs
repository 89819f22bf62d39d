use crate::models::{GameState, PaymentStatus};
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "game_records")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub table_id: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    /// 生丁（MAD 的 1/100），始终非负
    pub price_minor: i64,
    pub payment_status: PaymentStatus,
    pub state: GameState,
    pub customer_name: Option<String>,
    pub created_by: String,
    pub confirmed: bool,
    pub archived: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::billiard_tables::Entity",
        from = "Column::TableId",
        to = "super::billiard_tables::Column::Id"
    )]
    Table,
}

impl Related<super::billiard_tables::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Table.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
