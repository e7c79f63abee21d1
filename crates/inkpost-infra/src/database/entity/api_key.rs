//! API key entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "api_keys")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub api_key: String,
    #[sea_orm(indexed)]
    pub account_id: Uuid,
    pub name: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::account::Entity",
        from = "Column::AccountId",
        to = "super::account::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Account,
}

impl Related<super::account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for inkpost_core::domain::ApiKey {
    fn from(model: Model) -> Self {
        Self {
            key: model.api_key,
            account_id: model.account_id,
            name: model.name,
            created_at: model.created_at.into(),
        }
    }
}

impl From<inkpost_core::domain::ApiKey> for ActiveModel {
    fn from(key: inkpost_core::domain::ApiKey) -> Self {
        Self {
            api_key: Set(key.key),
            account_id: Set(key.account_id),
            name: Set(key.name),
            created_at: Set(key.created_at.into()),
        }
    }
}
