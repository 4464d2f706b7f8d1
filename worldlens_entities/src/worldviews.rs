use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "worldviews")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    /// JSON-encoded frame (actor, core mechanisms, logic pattern).
    #[sea_orm(column_type = "Text", nullable)]
    pub frame: Option<String>,
    pub total_perceptions: i32,
    pub archived: bool,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::worldview_patterns::Entity")]
    Patterns,
    #[sea_orm(has_many = "super::perception_worldview_links::Entity")]
    Links,
}

impl Related<super::worldview_patterns::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Patterns.def()
    }
}

impl Related<super::perception_worldview_links::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Links.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
