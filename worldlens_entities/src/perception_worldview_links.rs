use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "perception_worldview_links")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub perception_id: Uuid,
    pub worldview_id: Uuid,
    #[sea_orm(column_type = "Double")]
    pub relevance_score: f64,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::layered_perceptions::Entity",
        from = "Column::PerceptionId",
        to = "super::layered_perceptions::Column::Id"
    )]
    Perception,
    #[sea_orm(
        belongs_to = "super::worldviews::Entity",
        from = "Column::WorldviewId",
        to = "super::worldviews::Column::Id"
    )]
    Worldview,
}

impl Related<super::layered_perceptions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Perception.def()
    }
}

impl Related<super::worldviews::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Worldview.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
