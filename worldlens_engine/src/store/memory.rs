use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;
use worldlens_core::{
    Layer, LinkRepo, Pattern, PatternMatch, PatternStatus, PatternStore, Perception,
    PerceptionLink, PerceptionRepo, Worldview, WorldviewRepo,
};

use crate::scoring;

/// In-process store implementing every repository trait.
///
/// Backs the integration tests, and `match --dry-run`, which scores a
/// [`MemoryStore::snapshot`] so nothing is written to the real store.
///
/// Mirrors the relational constraints that matter to the engine: a live
/// pattern is unique per (worldview, layer, content hash) and a link is
/// unique per (perception, worldview).
#[derive(Debug, Default)]
pub struct MemoryStore {
    patterns: RwLock<BTreeMap<Uuid, Pattern>>,
    worldviews: RwLock<BTreeMap<Uuid, Worldview>>,
    perceptions: RwLock<BTreeMap<Uuid, Perception>>,
    links: RwLock<Vec<PerceptionLink>>,
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy the active worldviews and structured perceptions of another
    /// store. Patterns and links are not copied.
    pub async fn snapshot(
        worldviews: &dyn WorldviewRepo,
        perceptions: &dyn PerceptionRepo,
    ) -> anyhow::Result<Self> {
        let store = Self::new();
        for worldview in worldviews.list_active().await? {
            store.add_worldview(worldview);
        }
        for perception in perceptions.list_structured().await? {
            store.add_perception(perception);
        }
        Ok(store)
    }

    pub fn add_worldview(&self, worldview: Worldview) {
        write(&self.worldviews).insert(worldview.id, worldview);
    }

    /// Drop a worldview row, leaving its patterns behind.
    pub fn remove_worldview(&self, id: &Uuid) -> Option<Worldview> {
        write(&self.worldviews).remove(id)
    }

    pub fn add_perception(&self, perception: Perception) {
        write(&self.perceptions).insert(perception.id, perception);
    }

    /// Every stored pattern, dead ones included, in id order.
    #[must_use]
    pub fn patterns(&self) -> Vec<Pattern> {
        read(&self.patterns).values().cloned().collect()
    }

    #[must_use]
    pub fn pattern(&self, id: &Uuid) -> Option<Pattern> {
        read(&self.patterns).get(id).cloned()
    }

    #[must_use]
    pub fn links(&self) -> Vec<PerceptionLink> {
        read(&self.links).clone()
    }

    #[must_use]
    pub fn worldview(&self, id: &Uuid) -> Option<Worldview> {
        read(&self.worldviews).get(id).cloned()
    }

    fn live_matching(&self, filter: impl Fn(&Pattern) -> bool) -> Vec<Pattern> {
        read(&self.patterns)
            .values()
            .filter(|p| p.status.is_live() && filter(p))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl PatternStore for MemoryStore {
    async fn insert(&self, pattern: &Pattern) -> anyhow::Result<()> {
        let mut patterns = write(&self.patterns);
        if patterns.contains_key(&pattern.id) {
            anyhow::bail!("Pattern already exists: {}", pattern.id);
        }
        let duplicate = pattern.status.is_live()
            && patterns.values().any(|p| {
                p.status.is_live()
                    && p.worldview_id == pattern.worldview_id
                    && p.layer == pattern.layer
                    && p.content_hash == pattern.content_hash
            });
        if duplicate {
            anyhow::bail!(
                "Live pattern with hash {} already exists in worldview {} ({})",
                pattern.content_hash,
                pattern.worldview_id,
                pattern.layer
            );
        }
        patterns.insert(pattern.id, pattern.clone());
        Ok(())
    }

    async fn update(&self, pattern: &Pattern) -> anyhow::Result<()> {
        let mut patterns = write(&self.patterns);
        let slot = patterns
            .get_mut(&pattern.id)
            .ok_or_else(|| anyhow::anyhow!("Pattern not found: {}", pattern.id))?;
        *slot = pattern.clone();
        Ok(())
    }

    async fn delete(&self, id: &Uuid) -> anyhow::Result<()> {
        write(&self.patterns).remove(id);
        Ok(())
    }

    async fn delete_by_status(
        &self,
        status: PatternStatus,
        worldview_id: Option<Uuid>,
    ) -> anyhow::Result<u64> {
        let mut patterns = write(&self.patterns);
        let before = patterns.len();
        patterns.retain(|_, p| {
            !(p.status == status && worldview_id.is_none_or(|id| p.worldview_id == id))
        });
        Ok((before - patterns.len()) as u64)
    }

    async fn find_by_content_hash(
        &self,
        worldview_id: &Uuid,
        layer: Layer,
        hash: &str,
    ) -> anyhow::Result<Option<Pattern>> {
        Ok(self
            .live_matching(|p| {
                p.worldview_id == *worldview_id && p.layer == layer && p.content_hash == hash
            })
            .into_iter()
            .next())
    }

    async fn find_nearest(
        &self,
        worldview_id: &Uuid,
        layer: Layer,
        embedding: &[f32],
        max_distance: f64,
    ) -> anyhow::Result<Option<PatternMatch>> {
        let candidates = self.live_matching(|p| p.worldview_id == *worldview_id && p.layer == layer);
        Ok(scoring::nearest(embedding, candidates, max_distance))
    }

    async fn list_live(
        &self,
        worldview_id: Option<Uuid>,
        layer: Option<Layer>,
    ) -> anyhow::Result<Vec<Pattern>> {
        Ok(self.live_matching(|p| {
            worldview_id.is_none_or(|id| p.worldview_id == id) && layer.is_none_or(|l| p.layer == l)
        }))
    }

    async fn list_weak(
        &self,
        worldview_id: &Uuid,
        layer: Layer,
        below_strength: f64,
    ) -> anyhow::Result<Vec<Pattern>> {
        Ok(self.live_matching(|p| {
            p.worldview_id == *worldview_id && p.layer == layer && p.strength < below_strength
        }))
    }

    async fn owner_counts(&self, worldview_id: Option<Uuid>) -> anyhow::Result<Vec<(Uuid, u64)>> {
        let mut counts: BTreeMap<Uuid, u64> = BTreeMap::new();
        for p in read(&self.patterns).values() {
            if worldview_id.is_none_or(|id| p.worldview_id == id) {
                *counts.entry(p.worldview_id).or_default() += 1;
            }
        }
        Ok(counts.into_iter().collect())
    }
}

#[async_trait]
impl WorldviewRepo for MemoryStore {
    async fn list_active(&self) -> anyhow::Result<Vec<Worldview>> {
        Ok(read(&self.worldviews)
            .values()
            .filter(|w| !w.archived)
            .cloned()
            .collect())
    }

    async fn all_ids(&self) -> anyhow::Result<Vec<Uuid>> {
        Ok(read(&self.worldviews).keys().copied().collect())
    }

    async fn find_by_id(&self, id: &Uuid) -> anyhow::Result<Option<Worldview>> {
        Ok(self.worldview(id))
    }

    async fn set_total_perceptions(&self, id: &Uuid, count: i32) -> anyhow::Result<()> {
        let mut worldviews = write(&self.worldviews);
        let worldview = worldviews
            .get_mut(id)
            .ok_or_else(|| anyhow::anyhow!("Worldview not found: {id}"))?;
        worldview.total_perceptions = count;
        Ok(())
    }
}

#[async_trait]
impl PerceptionRepo for MemoryStore {
    async fn list_structured(&self) -> anyhow::Result<Vec<Perception>> {
        Ok(read(&self.perceptions)
            .values()
            .filter(|p| p.is_structured())
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: &Uuid) -> anyhow::Result<Option<Perception>> {
        Ok(read(&self.perceptions).get(id).cloned())
    }
}

#[async_trait]
impl LinkRepo for MemoryStore {
    async fn clear_all(&self) -> anyhow::Result<u64> {
        let mut links = write(&self.links);
        let removed = links.len() as u64;
        links.clear();
        Ok(removed)
    }

    async fn clear_for_perception(&self, perception_id: &Uuid) -> anyhow::Result<u64> {
        let mut links = write(&self.links);
        let before = links.len();
        links.retain(|l| l.perception_id != *perception_id);
        Ok((before - links.len()) as u64)
    }

    async fn insert(&self, link: &PerceptionLink) -> anyhow::Result<()> {
        let mut links = write(&self.links);
        if links
            .iter()
            .any(|l| l.perception_id == link.perception_id && l.worldview_id == link.worldview_id)
        {
            anyhow::bail!(
                "Link already exists: {} -> {}",
                link.perception_id,
                link.worldview_id
            );
        }
        links.push(*link);
        Ok(())
    }

    async fn count_for_worldview(&self, worldview_id: &Uuid) -> anyhow::Result<u64> {
        Ok(read(&self.links)
            .iter()
            .filter(|l| l.worldview_id == *worldview_id)
            .count() as u64)
    }
}
