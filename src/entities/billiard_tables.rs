use crate::models::Role;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "billiard_tables")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub owner: Role,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::game_records::Entity")]
    GameRecords,
}

impl Related<super::game_records::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GameRecords.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
