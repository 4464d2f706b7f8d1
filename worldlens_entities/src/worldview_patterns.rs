use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "worldview_patterns")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub worldview_id: Uuid,
    /// `surface`, `implicit` or `deep`.
    pub layer: String,
    #[sea_orm(column_type = "Text")]
    pub text: String,
    pub content_hash: String,
    /// Embedding vector as a JSON array of floats.
    #[sea_orm(column_type = "JsonBinary")]
    pub embedding: Json,
    #[sea_orm(column_type = "Double")]
    pub strength: f64,
    /// `active`, `fading` or `dead`.
    pub status: String,
    pub first_seen: DateTimeWithTimeZone,
    pub last_seen: DateTimeWithTimeZone,
    pub decayed_at: Option<DateTimeWithTimeZone>,
    pub appearance_count: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::worldviews::Entity",
        from = "Column::WorldviewId",
        to = "super::worldviews::Column::Id"
    )]
    Worldview,
}

impl Related<super::worldviews::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Worldview.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
