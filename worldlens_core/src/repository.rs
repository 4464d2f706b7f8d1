use async_trait::async_trait;
use uuid::Uuid;

use crate::model::{Layer, Pattern, PatternStatus, Perception, PerceptionLink, Worldview};

/// Nearest-neighbour hit returned by [`PatternStore::find_nearest`].
#[derive(Debug, Clone)]
pub struct PatternMatch {
    pub pattern: Pattern,
    /// Cosine similarity (0.0 - 1.0) between the query and the pattern.
    pub similarity: f64,
}

#[async_trait]
pub trait PatternStore: Send + Sync {
    async fn insert(&self, pattern: &Pattern) -> anyhow::Result<()>;

    async fn update(&self, pattern: &Pattern) -> anyhow::Result<()>;

    async fn delete(&self, id: &Uuid) -> anyhow::Result<()>;

    /// Delete every pattern in `status`, optionally scoped to one worldview.
    async fn delete_by_status(
        &self,
        status: PatternStatus,
        worldview_id: Option<Uuid>,
    ) -> anyhow::Result<u64>;

    /// Live pattern in the scope whose content hash equals `hash`.
    async fn find_by_content_hash(
        &self,
        worldview_id: &Uuid,
        layer: Layer,
        hash: &str,
    ) -> anyhow::Result<Option<Pattern>>;

    /// Closest live pattern in (worldview, layer) within `max_distance`
    /// (cosine distance, `1 - similarity`).
    async fn find_nearest(
        &self,
        worldview_id: &Uuid,
        layer: Layer,
        embedding: &[f32],
        max_distance: f64,
    ) -> anyhow::Result<Option<PatternMatch>>;

    /// Active and fading patterns, optionally scoped.
    async fn list_live(
        &self,
        worldview_id: Option<Uuid>,
        layer: Option<Layer>,
    ) -> anyhow::Result<Vec<Pattern>>;

    /// Live patterns in the scope with strength strictly below `below_strength`.
    async fn list_weak(
        &self,
        worldview_id: &Uuid,
        layer: Layer,
        below_strength: f64,
    ) -> anyhow::Result<Vec<Pattern>>;

    /// Distinct owning worldview ids with their pattern counts (all statuses).
    async fn owner_counts(&self, worldview_id: Option<Uuid>) -> anyhow::Result<Vec<(Uuid, u64)>>;
}

#[async_trait]
pub trait WorldviewRepo: Send + Sync {
    /// Worldviews that are not archived.
    async fn list_active(&self) -> anyhow::Result<Vec<Worldview>>;

    /// Ids of every worldview, archived included.
    async fn all_ids(&self) -> anyhow::Result<Vec<Uuid>>;

    async fn find_by_id(&self, id: &Uuid) -> anyhow::Result<Option<Worldview>>;

    async fn set_total_perceptions(&self, id: &Uuid, count: i32) -> anyhow::Result<()>;
}

#[async_trait]
pub trait PerceptionRepo: Send + Sync {
    /// Perceptions carrying at least one mechanism tag.
    async fn list_structured(&self) -> anyhow::Result<Vec<Perception>>;

    async fn find_by_id(&self, id: &Uuid) -> anyhow::Result<Option<Perception>>;
}

#[async_trait]
pub trait LinkRepo: Send + Sync {
    async fn clear_all(&self) -> anyhow::Result<u64>;

    async fn clear_for_perception(&self, perception_id: &Uuid) -> anyhow::Result<u64>;

    async fn insert(&self, link: &PerceptionLink) -> anyhow::Result<()>;

    async fn count_for_worldview(&self, worldview_id: &Uuid) -> anyhow::Result<u64>;
}
