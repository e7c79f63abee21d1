//! Engagement event entity for SeaORM.
//!
//! `post_id` is a plain indexed string column with no foreign key: events
//! may reference posts that never existed.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use inkpost_core::domain::{EngagementEvent, EventKind};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "engagement_events")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub kind: String,
    #[sea_orm(indexed)]
    pub post_id: Option<String>,
    #[sea_orm(column_type = "JsonBinary")]
    pub payload: Json,
    pub timestamp: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for EngagementEvent {
    fn from(model: Model) -> Self {
        let payload = match model.payload {
            Json::Object(map) => map,
            _ => Default::default(),
        };

        Self {
            id: model.id,
            kind: EventKind::from(model.kind.as_str()),
            post_id: model.post_id,
            timestamp: model.timestamp.into(),
            payload,
        }
    }
}

impl From<EngagementEvent> for ActiveModel {
    fn from(event: EngagementEvent) -> Self {
        Self {
            id: Set(event.id),
            kind: Set(event.kind.as_str().to_string()),
            post_id: Set(event.post_id),
            payload: Set(Json::Object(event.payload)),
            timestamp: Set(event.timestamp.into()),
        }
    }
}
