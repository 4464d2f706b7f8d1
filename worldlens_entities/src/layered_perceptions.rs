use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Perceptions written by the extraction pipeline. Read-only here.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "layered_perceptions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub content_id: Option<Uuid>,
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub explicit_claims: Option<Json>,
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub implicit_assumptions: Option<Json>,
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub deep_beliefs: Option<Json>,
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub actor: Option<Json>,
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub mechanisms: Option<Json>,
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub logic_chain: Option<Json>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::perception_worldview_links::Entity")]
    Links,
}

impl Related<super::perception_worldview_links::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Links.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
