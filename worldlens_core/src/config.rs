//! Tunables for the pattern lifecycle and the mechanism matcher.
//!
//! Every field carries a serde default so a partial `config.json` section
//! only overrides what it names.

use serde::{Deserialize, Serialize};

use crate::model::Layer;

/// Volatility assumptions for one layer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct LayerPolicy {
    /// Minimum cosine similarity for an item to reinforce an existing pattern.
    pub similarity_threshold: f64,
    /// Fraction of strength retained per inactive day.
    pub decay_rate: f64,
    /// Days without reinforcement after which the pattern expires.
    pub expiration_days: i64,
}

impl LayerPolicy {
    /// Concrete events are rarely true duplicates; they vanish in about a week.
    pub const SURFACE: Self = Self {
        similarity_threshold: 0.85,
        decay_rate: 0.7,
        expiration_days: 7,
    };

    /// Assumptions recur in paraphrase.
    pub const IMPLICIT: Self = Self {
        similarity_threshold: 0.70,
        decay_rate: 0.9,
        expiration_days: 30,
    };

    /// Beliefs are few but worded in highly variable language.
    pub const DEEP: Self = Self {
        similarity_threshold: 0.60,
        decay_rate: 0.95,
        expiration_days: 90,
    };

    /// Cosine-distance cutoff handed to the nearest-neighbour query.
    #[must_use]
    pub fn max_distance(&self) -> f64 {
        1.0 - self.similarity_threshold
    }

    #[must_use]
    pub fn is_match(&self, similarity: f64) -> bool {
        similarity >= self.similarity_threshold
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct LayerPolicies {
    #[serde(default = "LayerPolicies::default_surface")]
    pub surface: LayerPolicy,
    #[serde(default = "LayerPolicies::default_implicit")]
    pub implicit: LayerPolicy,
    #[serde(default = "LayerPolicies::default_deep")]
    pub deep: LayerPolicy,
}

impl LayerPolicies {
    const fn default_surface() -> LayerPolicy {
        LayerPolicy::SURFACE
    }
    const fn default_implicit() -> LayerPolicy {
        LayerPolicy::IMPLICIT
    }
    const fn default_deep() -> LayerPolicy {
        LayerPolicy::DEEP
    }

    #[must_use]
    pub const fn get(&self, layer: Layer) -> &LayerPolicy {
        match layer {
            Layer::Surface => &self.surface,
            Layer::Implicit => &self.implicit,
            Layer::Deep => &self.deep,
        }
    }
}

impl Default for LayerPolicies {
    fn default() -> Self {
        Self {
            surface: LayerPolicy::SURFACE,
            implicit: LayerPolicy::IMPLICIT,
            deep: LayerPolicy::DEEP,
        }
    }
}

/// Configuration for the pattern lifecycle manager.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LifecycleConfig {
    #[serde(default)]
    pub layers: LayerPolicies,

    /// Strength of a newly created pattern.
    #[serde(default = "default_initial_strength")]
    pub initial_strength: f64,

    /// Strength added on every reinforcement.
    #[serde(default = "default_reinforcement_increment")]
    pub reinforcement_increment: f64,

    /// Upper bound on strength.
    #[serde(default = "default_max_strength")]
    pub max_strength: f64,

    /// Patterns decaying below this strength die.
    #[serde(default = "default_dead_floor")]
    pub dead_floor: f64,

    /// Patterns per text-generation request in the quality check.
    #[serde(default = "default_quality_batch_size")]
    pub quality_batch_size: usize,

    /// Surface patterns weaker than this are sent to the quality check.
    #[serde(default = "default_quality_strength_threshold")]
    pub quality_strength_threshold: f64,

    /// Model override for the quality check; provider default when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality_model: Option<String>,
}

const fn default_initial_strength() -> f64 {
    1.0
}
const fn default_reinforcement_increment() -> f64 {
    0.5
}
const fn default_max_strength() -> f64 {
    10.0
}
const fn default_dead_floor() -> f64 {
    0.1
}
const fn default_quality_batch_size() -> usize {
    50
}
const fn default_quality_strength_threshold() -> f64 {
    3.0
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            layers: LayerPolicies::default(),
            initial_strength: default_initial_strength(),
            reinforcement_increment: default_reinforcement_increment(),
            max_strength: default_max_strength(),
            dead_floor: default_dead_floor(),
            quality_batch_size: default_quality_batch_size(),
            quality_strength_threshold: default_quality_strength_threshold(),
            quality_model: None,
        }
    }
}

/// Configuration for the mechanism matcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatcherConfig {
    /// Minimum score for a perception-worldview link.
    #[serde(default = "default_match_threshold")]
    pub threshold: f64,

    /// Links kept per perception, best first.
    #[serde(default = "default_max_links")]
    pub max_links_per_perception: usize,

    /// Distinct mechanism tags from which a perception is scored
    /// mechanism-first instead of actor-first.
    #[serde(default = "default_mechanism_centric_min_tags")]
    pub mechanism_centric_min_tags: usize,

    /// Actor terms treated as near-synonyms (scored 0.8).
    #[serde(default = "default_actor_synonyms")]
    pub actor_synonyms: Vec<(String, String)>,
}

const fn default_match_threshold() -> f64 {
    0.4
}
const fn default_max_links() -> usize {
    3
}
const fn default_mechanism_centric_min_tags() -> usize {
    4
}

fn default_actor_synonyms() -> Vec<(String, String)> {
    [
        ("democrat", "democratic party"),
        ("left", "progressive"),
        ("china", "chinese"),
        ("police", "law enforcement"),
        ("government", "administration"),
        ("press", "media"),
        ("민주", "민주당"),
        ("좌파", "진보"),
        ("중국", "중국계"),
        ("경찰", "공권력"),
        ("정부", "정권"),
        ("언론", "미디어"),
    ]
    .into_iter()
    .map(|(a, b)| (a.to_string(), b.to_string()))
    .collect()
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            threshold: default_match_threshold(),
            max_links_per_perception: default_max_links(),
            mechanism_centric_min_tags: default_mechanism_centric_min_tags(),
            actor_synonyms: default_actor_synonyms(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_are_ordered_strict_to_lenient() {
        let layers = LayerPolicies::default();
        assert!(layers.surface.similarity_threshold > layers.implicit.similarity_threshold);
        assert!(layers.implicit.similarity_threshold > layers.deep.similarity_threshold);
        assert!(layers.surface.decay_rate < layers.implicit.decay_rate);
        assert!(layers.implicit.decay_rate < layers.deep.decay_rate);
    }

    #[test]
    fn raising_threshold_never_turns_miss_into_match() {
        let similarities = [0.0, 0.59, 0.6, 0.7, 0.84, 0.85, 0.99, 1.0];
        let thresholds = [0.5, 0.6, 0.7, 0.85, 0.9, 1.0];
        for sim in similarities {
            for pair in thresholds.windows(2) {
                let low = LayerPolicy {
                    similarity_threshold: pair[0],
                    ..LayerPolicy::IMPLICIT
                };
                let high = LayerPolicy {
                    similarity_threshold: pair[1],
                    ..LayerPolicy::IMPLICIT
                };
                if high.is_match(sim) {
                    assert!(low.is_match(sim), "sim={sim} thresholds={pair:?}");
                }
            }
        }
    }

    #[test]
    fn partial_lifecycle_section_keeps_defaults() {
        let cfg: LifecycleConfig =
            serde_json::from_str(r#"{"reinforcement_increment": 1.0}"#).unwrap_or_default();
        assert!((cfg.reinforcement_increment - 1.0).abs() < f64::EPSILON);
        assert!((cfg.max_strength - 10.0).abs() < f64::EPSILON);
        assert_eq!(cfg.layers, LayerPolicies::default());
    }
}
