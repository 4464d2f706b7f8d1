//! Scores perceptions against worldview frames and records the best links.

mod policy;

pub use policy::{FixedPolicy, MechanismCountClassifier, PolicyClassifier, ScoringPolicy, Weights};

use rayon::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;
use worldlens_core::{
    EngineError, LinkRepo, MatcherConfig, Perception, PerceptionLink, PerceptionRepo, Result,
    Worldview, WorldviewFrame, WorldviewRepo,
};

use crate::scoring;

const ACTOR_SEPARATORS: &[char] = &['/', '(', ')', '·', ','];

/// Per-factor breakdown of one perception-worldview score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchScore {
    pub actor: f64,
    pub mechanism: f64,
    pub logic: f64,
    pub policy: ScoringPolicy,
    /// Weighted sum, clamped to [0, 1].
    pub total: f64,
}

pub struct MechanismMatcher {
    perceptions: Arc<dyn PerceptionRepo>,
    worldviews: Arc<dyn WorldviewRepo>,
    links: Arc<dyn LinkRepo>,
    config: MatcherConfig,
    classifier: Box<dyn PolicyClassifier>,
}

impl MechanismMatcher {
    pub fn new(
        perceptions: Arc<dyn PerceptionRepo>,
        worldviews: Arc<dyn WorldviewRepo>,
        links: Arc<dyn LinkRepo>,
        config: MatcherConfig,
    ) -> Self {
        let classifier = Box::new(MechanismCountClassifier {
            min_tags: config.mechanism_centric_min_tags,
        });
        Self {
            perceptions,
            worldviews,
            links,
            config,
            classifier,
        }
    }

    /// Replace the weighting classifier.
    #[must_use]
    pub fn with_classifier(mut self, classifier: Box<dyn PolicyClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    #[must_use]
    pub const fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// Relevance of `perception` to `worldview`, in [0, 1].
    ///
    /// Worldviews without a parseable frame score 0.
    #[must_use]
    pub fn calculate_match_score(&self, perception: &Perception, worldview: &Worldview) -> f64 {
        self.score(perception, worldview).total
    }

    /// Score with its per-factor breakdown.
    #[must_use]
    pub fn score(&self, perception: &Perception, worldview: &Worldview) -> MatchScore {
        let policy = self.classifier.classify(perception);
        let Some(frame) = worldview.frame.as_ref() else {
            return MatchScore {
                actor: 0.0,
                mechanism: 0.0,
                logic: 0.0,
                policy,
                total: 0.0,
            };
        };

        let actor = self.actor_similarity(perception.actor_subject(), frame.actor_subject());
        let mechanism = mechanism_overlap(perception, frame);
        let logic = logic_similarity(perception, frame);
        let total = policy
            .weights()
            .combine(actor, mechanism, logic)
            .clamp(0.0, 1.0);

        MatchScore {
            actor,
            mechanism,
            logic,
            policy,
            total,
        }
    }

    /// 1.0 when a keyword of the worldview actor occurs in the perception
    /// actor, 0.8 when a synonym pair links them, 0.0 otherwise.
    #[must_use]
    pub fn actor_similarity(&self, perception_actor: &str, worldview_actor: &str) -> f64 {
        let perception_actor = perception_actor.trim().to_lowercase();
        let worldview_actor = worldview_actor.trim().to_lowercase();
        if perception_actor.is_empty() || worldview_actor.is_empty() {
            return 0.0;
        }

        let keyword_hit = worldview_actor
            .split(|c: char| c.is_whitespace() || ACTOR_SEPARATORS.contains(&c))
            .filter(|kw| !kw.is_empty())
            .any(|kw| perception_actor.contains(kw));
        if keyword_hit {
            return 1.0;
        }

        let synonym_hit = self.config.actor_synonyms.iter().any(|(a, b)| {
            let (a, b) = (a.to_lowercase(), b.to_lowercase());
            (perception_actor.contains(&a) && worldview_actor.contains(&b))
                || (perception_actor.contains(&b) && worldview_actor.contains(&a))
        });
        if synonym_hit { 0.8 } else { 0.0 }
    }

    /// Worldviews scoring at least `threshold`, best first, at most
    /// `max_links_per_perception` of them.
    fn rank(
        &self,
        perception: &Perception,
        worldviews: &[Worldview],
        threshold: f64,
    ) -> Vec<(Uuid, f64)> {
        let mut ranked: Vec<(Uuid, f64)> = worldviews
            .iter()
            .map(|w| (w.id, self.calculate_match_score(perception, w)))
            .filter(|(_, score)| *score >= threshold)
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked.truncate(self.config.max_links_per_perception);
        ranked
    }

    /// Rebuild every perception-worldview link from scratch.
    ///
    /// Returns the number of links written.
    #[tracing::instrument(skip(self))]
    pub async fn match_all_perceptions(&self, threshold: f64) -> Result<usize> {
        let perceptions = self.perceptions.list_structured().await?;
        let worldviews = self.worldviews.list_active().await?;
        info!(
            perceptions = perceptions.len(),
            worldviews = worldviews.len(),
            "Matching perceptions"
        );

        let cleared = self.links.clear_all().await?;
        info!(cleared, "Cleared existing links");

        let ranked: Vec<(Uuid, Vec<(Uuid, f64)>)> = perceptions
            .par_iter()
            .map(|p| (p.id, self.rank(p, &worldviews, threshold)))
            .collect();

        let mut created = 0;
        let mut failed = 0;
        for (perception_id, matches) in ranked {
            for (worldview_id, score) in matches {
                if self.write_link(perception_id, worldview_id, score).await {
                    created += 1;
                } else {
                    failed += 1;
                }
            }
        }

        self.refresh_counts(&worldviews).await;
        info!(created, failed, "Matching complete");
        Ok(created)
    }

    /// Re-match one perception, replacing only its own links.
    ///
    /// Returns the linked worldview ids, best first.
    #[tracing::instrument(skip(self))]
    pub async fn match_single_perception(
        &self,
        perception_id: Uuid,
        threshold: f64,
    ) -> Result<Vec<Uuid>> {
        let perception = self
            .perceptions
            .find_by_id(&perception_id)
            .await?
            .ok_or(EngineError::PerceptionNotFound(perception_id))?;
        let worldviews = self.worldviews.list_active().await?;

        self.links.clear_for_perception(&perception_id).await?;

        let mut matched = Vec::new();
        for (worldview_id, score) in self.rank(&perception, &worldviews, threshold) {
            if self.write_link(perception_id, worldview_id, score).await {
                matched.push(worldview_id);
            }
        }

        self.refresh_counts(&worldviews).await;
        info!(matched = matched.len(), "Perception matched");
        Ok(matched)
    }

    async fn write_link(&self, perception_id: Uuid, worldview_id: Uuid, score: f64) -> bool {
        let link = PerceptionLink {
            perception_id,
            worldview_id,
            relevance_score: score,
        };
        match self.links.insert(&link).await {
            Ok(()) => true,
            Err(e) => {
                warn!(%perception_id, %worldview_id, "Failed to write link: {e}");
                false
            }
        }
    }

    async fn refresh_counts(&self, worldviews: &[Worldview]) {
        for worldview in worldviews {
            let count = match self.links.count_for_worldview(&worldview.id).await {
                Ok(count) => i32::try_from(count).unwrap_or(i32::MAX),
                Err(e) => {
                    warn!(worldview_id = %worldview.id, "Failed to count links: {e}");
                    continue;
                }
            };
            if let Err(e) = self
                .worldviews
                .set_total_perceptions(&worldview.id, count)
                .await
            {
                warn!(worldview_id = %worldview.id, "Failed to update perception count: {e}");
            }
        }
    }
}

fn mechanism_overlap(perception: &Perception, frame: &WorldviewFrame) -> f64 {
    let ours: HashSet<&str> = perception.mechanisms.iter().map(String::as_str).collect();
    let theirs: HashSet<&str> = frame.core_mechanisms.iter().map(String::as_str).collect();
    scoring::jaccard(&ours, &theirs)
}

fn logic_similarity(perception: &Perception, frame: &WorldviewFrame) -> f64 {
    let Some(pattern) = frame.logic_pattern.as_ref() else {
        return 0.0;
    };
    if perception.logic_chain.is_empty() {
        return 0.0;
    }
    scoring::token_jaccard(&perception.logic_chain.join(" "), &pattern.as_text())
}
