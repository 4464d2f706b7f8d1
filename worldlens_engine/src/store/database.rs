use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, Database, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use std::collections::BTreeMap;
use tracing::info;
use uuid::Uuid;
use worldlens_core::{
    Layer, LinkRepo, Pattern, PatternMatch, PatternStatus, PatternStore, Perception,
    PerceptionLink, PerceptionRepo, Worldview, WorldviewRepo,
};
use worldlens_entities::{
    SCHEMA_SQL, layered_perceptions, perception_worldview_links, worldview_patterns, worldviews,
};

use super::convert;
use crate::scoring;

fn live_statuses() -> [&'static str; 2] {
    PatternStatus::LIVE.map(|s| s.as_str())
}

/// Relational store backed by sea-orm.
///
/// Nearest-neighbour search loads the live candidates of one
/// (worldview, layer) and ranks them in-process.
#[derive(Clone)]
pub struct DatabaseStore {
    db: DatabaseConnection,
}

impl DatabaseStore {
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        info!("Connecting to database for DatabaseStore");
        let db = Database::connect(database_url).await?;
        info!("DatabaseStore initialized");
        Ok(Self { db })
    }

    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    #[must_use]
    pub const fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Create missing tables and indexes.
    pub async fn ensure_schema(&self) -> anyhow::Result<()> {
        self.db.execute_unprepared(SCHEMA_SQL).await?;
        info!("Schema ensured");
        Ok(())
    }

    async fn live_in_scope(
        &self,
        worldview_id: &Uuid,
        layer: Layer,
    ) -> anyhow::Result<Vec<worldview_patterns::Model>> {
        Ok(worldview_patterns::Entity::find()
            .filter(worldview_patterns::Column::WorldviewId.eq(*worldview_id))
            .filter(worldview_patterns::Column::Layer.eq(layer.as_str()))
            .filter(worldview_patterns::Column::Status.is_in(live_statuses()))
            .order_by_asc(worldview_patterns::Column::Id)
            .all(&self.db)
            .await?)
    }
}

fn patterns_from_models(models: Vec<worldview_patterns::Model>) -> anyhow::Result<Vec<Pattern>> {
    models.into_iter().map(convert::pattern_from_model).collect()
}

#[async_trait]
impl PatternStore for DatabaseStore {
    async fn insert(&self, pattern: &Pattern) -> anyhow::Result<()> {
        convert::pattern_to_active(pattern).insert(&self.db).await?;
        Ok(())
    }

    async fn update(&self, pattern: &Pattern) -> anyhow::Result<()> {
        convert::pattern_to_active(pattern).update(&self.db).await?;
        Ok(())
    }

    async fn delete(&self, id: &Uuid) -> anyhow::Result<()> {
        worldview_patterns::Entity::delete_by_id(*id)
            .exec(&self.db)
            .await?;
        Ok(())
    }

    async fn delete_by_status(
        &self,
        status: PatternStatus,
        worldview_id: Option<Uuid>,
    ) -> anyhow::Result<u64> {
        let mut query = worldview_patterns::Entity::delete_many()
            .filter(worldview_patterns::Column::Status.eq(status.as_str()));
        if let Some(id) = worldview_id {
            query = query.filter(worldview_patterns::Column::WorldviewId.eq(id));
        }
        Ok(query.exec(&self.db).await?.rows_affected)
    }

    async fn find_by_content_hash(
        &self,
        worldview_id: &Uuid,
        layer: Layer,
        hash: &str,
    ) -> anyhow::Result<Option<Pattern>> {
        worldview_patterns::Entity::find()
            .filter(worldview_patterns::Column::WorldviewId.eq(*worldview_id))
            .filter(worldview_patterns::Column::Layer.eq(layer.as_str()))
            .filter(worldview_patterns::Column::ContentHash.eq(hash))
            .filter(worldview_patterns::Column::Status.is_in(live_statuses()))
            .one(&self.db)
            .await?
            .map(convert::pattern_from_model)
            .transpose()
    }

    async fn find_nearest(
        &self,
        worldview_id: &Uuid,
        layer: Layer,
        embedding: &[f32],
        max_distance: f64,
    ) -> anyhow::Result<Option<PatternMatch>> {
        let candidates = patterns_from_models(self.live_in_scope(worldview_id, layer).await?)?;
        Ok(scoring::nearest(embedding, candidates, max_distance))
    }

    async fn list_live(
        &self,
        worldview_id: Option<Uuid>,
        layer: Option<Layer>,
    ) -> anyhow::Result<Vec<Pattern>> {
        let mut query = worldview_patterns::Entity::find()
            .filter(worldview_patterns::Column::Status.is_in(live_statuses()));
        if let Some(id) = worldview_id {
            query = query.filter(worldview_patterns::Column::WorldviewId.eq(id));
        }
        if let Some(layer) = layer {
            query = query.filter(worldview_patterns::Column::Layer.eq(layer.as_str()));
        }
        let models = query
            .order_by_asc(worldview_patterns::Column::Id)
            .all(&self.db)
            .await?;
        patterns_from_models(models)
    }

    async fn list_weak(
        &self,
        worldview_id: &Uuid,
        layer: Layer,
        below_strength: f64,
    ) -> anyhow::Result<Vec<Pattern>> {
        let models = worldview_patterns::Entity::find()
            .filter(worldview_patterns::Column::WorldviewId.eq(*worldview_id))
            .filter(worldview_patterns::Column::Layer.eq(layer.as_str()))
            .filter(worldview_patterns::Column::Status.is_in(live_statuses()))
            .filter(worldview_patterns::Column::Strength.lt(below_strength))
            .order_by_asc(worldview_patterns::Column::Id)
            .all(&self.db)
            .await?;
        patterns_from_models(models)
    }

    async fn owner_counts(&self, worldview_id: Option<Uuid>) -> anyhow::Result<Vec<(Uuid, u64)>> {
        let mut query = worldview_patterns::Entity::find()
            .select_only()
            .column(worldview_patterns::Column::WorldviewId);
        if let Some(id) = worldview_id {
            query = query.filter(worldview_patterns::Column::WorldviewId.eq(id));
        }
        let owners: Vec<Uuid> = query.into_tuple().all(&self.db).await?;

        let mut counts: BTreeMap<Uuid, u64> = BTreeMap::new();
        for owner in owners {
            *counts.entry(owner).or_default() += 1;
        }
        Ok(counts.into_iter().collect())
    }
}

#[async_trait]
impl WorldviewRepo for DatabaseStore {
    async fn list_active(&self) -> anyhow::Result<Vec<Worldview>> {
        let models = worldviews::Entity::find()
            .filter(worldviews::Column::Archived.eq(false))
            .order_by_asc(worldviews::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(convert::worldview_from_model).collect())
    }

    async fn all_ids(&self) -> anyhow::Result<Vec<Uuid>> {
        let models = worldviews::Entity::find().all(&self.db).await?;
        Ok(models.into_iter().map(|w| w.id).collect())
    }

    async fn find_by_id(&self, id: &Uuid) -> anyhow::Result<Option<Worldview>> {
        let result = worldviews::Entity::find_by_id(*id).one(&self.db).await?;
        Ok(result.map(convert::worldview_from_model))
    }

    async fn set_total_perceptions(&self, id: &Uuid, count: i32) -> anyhow::Result<()> {
        let model = worldviews::ActiveModel {
            id: Set(*id),
            total_perceptions: Set(count),
            ..Default::default()
        };
        model.update(&self.db).await?;
        Ok(())
    }
}

#[async_trait]
impl PerceptionRepo for DatabaseStore {
    async fn list_structured(&self) -> anyhow::Result<Vec<Perception>> {
        let models = layered_perceptions::Entity::find()
            .filter(layered_perceptions::Column::Mechanisms.is_not_null())
            .order_by_asc(layered_perceptions::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(models
            .iter()
            .map(convert::perception_from_model)
            .filter(Perception::is_structured)
            .collect())
    }

    async fn find_by_id(&self, id: &Uuid) -> anyhow::Result<Option<Perception>> {
        let result = layered_perceptions::Entity::find_by_id(*id)
            .one(&self.db)
            .await?;
        Ok(result.as_ref().map(convert::perception_from_model))
    }
}

#[async_trait]
impl LinkRepo for DatabaseStore {
    async fn clear_all(&self) -> anyhow::Result<u64> {
        let result = perception_worldview_links::Entity::delete_many()
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }

    async fn clear_for_perception(&self, perception_id: &Uuid) -> anyhow::Result<u64> {
        let result = perception_worldview_links::Entity::delete_many()
            .filter(perception_worldview_links::Column::PerceptionId.eq(*perception_id))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }

    async fn insert(&self, link: &PerceptionLink) -> anyhow::Result<()> {
        convert::link_to_active(link).insert(&self.db).await?;
        Ok(())
    }

    async fn count_for_worldview(&self, worldview_id: &Uuid) -> anyhow::Result<u64> {
        Ok(perception_worldview_links::Entity::find()
            .filter(perception_worldview_links::Column::WorldviewId.eq(*worldview_id))
            .count(&self.db)
            .await?)
    }
}
