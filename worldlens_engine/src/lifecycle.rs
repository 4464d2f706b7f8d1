use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;
use worldlens_core::{
    ChatMessage, EmbeddingProvider, EngineError, LLMProvider, Layer, LifecycleConfig, Pattern,
    PatternStatus, PatternStore, Perception, Result, WorldviewRepo, content_hash, normalize_text,
    truncate_for_log,
};

use crate::decay::{self, DecayStats};
use crate::filter::{FastFilter, FilterVerdict};
use crate::integrity;
use crate::locks::WorldviewLocks;
use crate::quality::{self, QualityReport, QualityStats};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LayerIntegrationStats {
    /// Items that reinforced an existing pattern.
    pub matched: usize,
    /// Items that created a pattern.
    pub new: usize,
    /// Items rejected before embedding.
    pub filtered: usize,
    /// Items skipped after an embedding or store error.
    pub failed: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IntegrationStats {
    pub surface: LayerIntegrationStats,
    pub implicit: LayerIntegrationStats,
    pub deep: LayerIntegrationStats,
}

impl IntegrationStats {
    #[must_use]
    pub const fn layer(&self, layer: Layer) -> &LayerIntegrationStats {
        match layer {
            Layer::Surface => &self.surface,
            Layer::Implicit => &self.implicit,
            Layer::Deep => &self.deep,
        }
    }

    const fn layer_mut(&mut self, layer: Layer) -> &mut LayerIntegrationStats {
        match layer {
            Layer::Surface => &mut self.surface,
            Layer::Implicit => &mut self.implicit,
            Layer::Deep => &mut self.deep,
        }
    }
}

enum ItemOutcome {
    Reinforced(Uuid),
    Created(Uuid),
}

/// Creation, reinforcement, decay and deletion of worldview patterns.
///
/// Every write to a worldview's pool happens while holding that
/// worldview's lock, which keeps live patterns in one (worldview, layer)
/// pairwise below the layer's similarity threshold.
pub struct PatternLifecycleManager {
    store: Arc<dyn PatternStore>,
    worldviews: Arc<dyn WorldviewRepo>,
    embedder: Arc<dyn EmbeddingProvider>,
    llm: Option<Arc<dyn LLMProvider>>,
    config: LifecycleConfig,
    filter: FastFilter,
    locks: WorldviewLocks,
}

impl PatternLifecycleManager {
    pub fn new(
        store: Arc<dyn PatternStore>,
        worldviews: Arc<dyn WorldviewRepo>,
        embedder: Arc<dyn EmbeddingProvider>,
        config: LifecycleConfig,
    ) -> Self {
        Self {
            store,
            worldviews,
            embedder,
            llm: None,
            config,
            filter: FastFilter::default(),
            locks: WorldviewLocks::new(),
        }
    }

    /// Enable the model-assisted quality check.
    #[must_use]
    pub fn with_text_generator(mut self, llm: Arc<dyn LLMProvider>) -> Self {
        self.llm = Some(llm);
        self
    }

    #[must_use]
    pub const fn config(&self) -> &LifecycleConfig {
        &self.config
    }

    /// Fold the layered items of one perception into a worldview's pool.
    ///
    /// Per-item failures are logged and counted; only an unknown worldview
    /// or a failing worldview lookup aborts the call.
    #[tracing::instrument(skip(self, perception), fields(perception_id = %perception.id))]
    pub async fn integrate_perception(
        &self,
        worldview_id: Uuid,
        perception: &Perception,
    ) -> Result<IntegrationStats> {
        if self.worldviews.find_by_id(&worldview_id).await?.is_none() {
            return Err(EngineError::WorldviewNotFound(worldview_id));
        }

        let _guard = self.locks.acquire(worldview_id).await;
        let now = Utc::now();
        let mut stats = IntegrationStats::default();

        for layer in Layer::ALL {
            for text in perception.items(layer) {
                let entry = stats.layer_mut(layer);

                if text.trim().is_empty() {
                    entry.filtered += 1;
                    continue;
                }
                if layer == Layer::Surface {
                    if let FilterVerdict::Reject(reason) = self.filter.check(text) {
                        debug!(%reason, text = %truncate_for_log(text, 60), "Surface item filtered");
                        entry.filtered += 1;
                        continue;
                    }
                }

                match self.integrate_item(worldview_id, layer, text, now).await {
                    Ok(ItemOutcome::Reinforced(id)) => {
                        debug!(pattern_id = %id, %layer, "Reinforced pattern");
                        entry.matched += 1;
                    }
                    Ok(ItemOutcome::Created(id)) => {
                        debug!(pattern_id = %id, %layer, "Created pattern");
                        entry.new += 1;
                    }
                    Err(e) => {
                        warn!(
                            %worldview_id,
                            %layer,
                            text = %truncate_for_log(text, 60),
                            "Failed to integrate item: {e}"
                        );
                        entry.failed += 1;
                    }
                }
            }
        }

        info!(
            %worldview_id,
            surface = ?stats.surface,
            implicit = ?stats.implicit,
            deep = ?stats.deep,
            "Perception integrated"
        );
        Ok(stats)
    }

    async fn integrate_item(
        &self,
        worldview_id: Uuid,
        layer: Layer,
        text: &str,
        now: DateTime<Utc>,
    ) -> Result<ItemOutcome> {
        let text = normalize_text(text);
        let hash = content_hash(layer.as_str(), &text);

        if let Some(existing) = self
            .store
            .find_by_content_hash(&worldview_id, layer, &hash)
            .await?
        {
            return self.reinforce(existing, now).await;
        }

        let embedding = self
            .embedder
            .embed(&text)
            .await
            .map_err(EngineError::Provider)?;

        let policy = self.config.layers.get(layer);
        let hit = self
            .store
            .find_nearest(&worldview_id, layer, &embedding, policy.max_distance())
            .await?
            .filter(|m| policy.is_match(m.similarity));

        if let Some(hit) = hit {
            debug!(similarity = hit.similarity, "Nearest pattern within threshold");
            return self.reinforce(hit.pattern, now).await;
        }

        let pattern = Pattern::create(
            worldview_id,
            layer,
            &text,
            embedding,
            self.config.initial_strength,
            now,
        );
        self.store.insert(&pattern).await?;
        Ok(ItemOutcome::Created(pattern.id))
    }

    async fn reinforce(&self, mut pattern: Pattern, now: DateTime<Utc>) -> Result<ItemOutcome> {
        pattern.reinforce(
            self.config.reinforcement_increment,
            self.config.max_strength,
            now,
        );
        self.store.update(&pattern).await?;
        Ok(ItemOutcome::Reinforced(pattern.id))
    }

    /// Weaken every live pattern by the days it went unreinforced.
    pub async fn decay_patterns(&self, worldview_id: Option<Uuid>) -> Result<DecayStats> {
        self.decay_patterns_at(worldview_id, Utc::now()).await
    }

    /// [`Self::decay_patterns`] evaluated at a fixed instant.
    #[tracing::instrument(skip(self))]
    pub async fn decay_patterns_at(
        &self,
        worldview_id: Option<Uuid>,
        now: DateTime<Utc>,
    ) -> Result<DecayStats> {
        integrity::verify_pattern_owners(self.store.as_ref(), self.worldviews.as_ref(), worldview_id)
            .await?;

        let mut stats = DecayStats::default();
        for (owner, _) in self.store.owner_counts(worldview_id).await? {
            let _guard = self.locks.acquire(owner).await;
            for pattern in self.store.list_live(Some(owner), None).await? {
                let policy = self.config.layers.get(pattern.layer);
                let outcome = decay::evaluate(&pattern, policy, self.config.dead_floor, now);

                let mut after = pattern.clone();
                if decay::apply(&mut after, outcome) {
                    if let Err(e) = self.store.update(&after).await {
                        warn!(pattern_id = %pattern.id, "Failed to store decayed pattern: {e}");
                        after = pattern.clone();
                    }
                }
                stats.record(pattern.layer, &pattern, &after);
            }
        }

        info!(
            dead = stats.total_dead(),
            surface = ?stats.surface,
            implicit = ?stats.implicit,
            deep = ?stats.deep,
            "Decay complete"
        );
        Ok(stats)
    }

    /// Hard-delete dead patterns. Running it twice deletes nothing the
    /// second time.
    #[tracing::instrument(skip(self))]
    pub async fn cleanup_dead_patterns(&self, worldview_id: Option<Uuid>) -> Result<u64> {
        let removed = self
            .store
            .delete_by_status(PatternStatus::Dead, worldview_id)
            .await?;
        info!(removed, "Dead patterns removed");
        Ok(removed)
    }

    /// Ask the text generator to flag weak surface patterns that carry no
    /// information, and mark those dead.
    ///
    /// `strength_threshold` defaults to the configured value.
    #[tracing::instrument(skip(self))]
    pub async fn cleanup_low_quality_patterns(
        &self,
        worldview_id: Uuid,
        strength_threshold: Option<f64>,
    ) -> Result<QualityStats> {
        let llm = self.llm.as_ref().ok_or_else(|| {
            EngineError::Provider(anyhow::anyhow!("No text-generation provider configured"))
        })?;
        integrity::verify_pattern_owners(
            self.store.as_ref(),
            self.worldviews.as_ref(),
            Some(worldview_id),
        )
        .await?;

        let threshold = strength_threshold.unwrap_or(self.config.quality_strength_threshold);
        let model = self
            .config
            .quality_model
            .as_deref()
            .unwrap_or_else(|| llm.get_default_model());

        let _guard = self.locks.acquire(worldview_id).await;
        let weak = self
            .store
            .list_weak(&worldview_id, Layer::Surface, threshold)
            .await?;

        let mut stats = QualityStats::default();
        for batch in weak.chunks(self.config.quality_batch_size.max(1)) {
            let texts: Vec<&str> = batch.iter().map(|p| p.text.as_str()).collect();
            let prompt = quality::build_prompt(&texts);

            let response = match llm.chat(&[ChatMessage::user(prompt)], model).await {
                Ok(response) => response,
                Err(e) => {
                    warn!(%worldview_id, size = batch.len(), "Quality batch skipped: {e}");
                    stats.failed_batches += 1;
                    continue;
                }
            };

            let report = QualityReport::parse(&response.content).unwrap_or_else(|e| {
                warn!(%worldview_id, "Treating quality response as empty: {e}");
                QualityReport::default()
            });
            stats.checked += batch.len();

            for idx in report.flagged_indices(batch.len()) {
                let Some(pattern) = batch.get(idx) else {
                    continue;
                };
                let mut dead = pattern.clone();
                dead.status = PatternStatus::Dead;
                match self.store.update(&dead).await {
                    Ok(()) => stats.removed += 1,
                    Err(e) => warn!(pattern_id = %dead.id, "Failed to mark pattern dead: {e}"),
                }
            }
        }

        info!(
            checked = stats.checked,
            removed = stats.removed,
            failed_batches = stats.failed_batches,
            "Quality check complete"
        );
        Ok(stats)
    }

    /// Live patterns at or above `min_strength`, strongest first.
    pub async fn get_active_patterns(
        &self,
        worldview_id: Uuid,
        layer: Option<Layer>,
        min_strength: f64,
    ) -> Result<Vec<Pattern>> {
        let mut patterns: Vec<Pattern> = self
            .store
            .list_live(Some(worldview_id), layer)
            .await?
            .into_iter()
            .filter(|p| p.strength >= min_strength)
            .collect();
        patterns.sort_by(|a, b| b.strength.total_cmp(&a.strength));
        Ok(patterns)
    }
}
