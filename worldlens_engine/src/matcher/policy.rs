//! Weighting of the three match factors.

use std::collections::HashSet;
use worldlens_core::Perception;

/// Factor weights. The three should sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weights {
    pub actor: f64,
    pub mechanism: f64,
    pub logic: f64,
}

impl Weights {
    #[must_use]
    pub fn combine(&self, actor: f64, mechanism: f64, logic: f64) -> f64 {
        self.actor
            .mul_add(actor, self.mechanism.mul_add(mechanism, self.logic * logic))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScoringPolicy {
    /// Ordinary perceptions: who is acting matters most.
    ActorCentric,
    /// Perceptions describing many mechanisms at once: how matters most.
    MechanismCentric,
    Custom(Weights),
}

impl ScoringPolicy {
    #[must_use]
    pub const fn weights(&self) -> Weights {
        match self {
            Self::ActorCentric => Weights {
                actor: 0.5,
                mechanism: 0.3,
                logic: 0.2,
            },
            Self::MechanismCentric => Weights {
                actor: 0.3,
                mechanism: 0.5,
                logic: 0.2,
            },
            Self::Custom(weights) => *weights,
        }
    }
}

/// Picks the weighting for a perception.
pub trait PolicyClassifier: Send + Sync {
    fn classify(&self, perception: &Perception) -> ScoringPolicy;
}

/// Mechanism-centric once a perception names at least `min_tags` distinct
/// mechanisms, actor-centric otherwise.
#[derive(Debug, Clone, Copy)]
pub struct MechanismCountClassifier {
    pub min_tags: usize,
}

impl Default for MechanismCountClassifier {
    fn default() -> Self {
        Self { min_tags: 4 }
    }
}

impl PolicyClassifier for MechanismCountClassifier {
    fn classify(&self, perception: &Perception) -> ScoringPolicy {
        let distinct: HashSet<&str> = perception.mechanisms.iter().map(String::as_str).collect();
        if distinct.len() >= self.min_tags {
            ScoringPolicy::MechanismCentric
        } else {
            ScoringPolicy::ActorCentric
        }
    }
}

/// Same policy for every perception.
#[derive(Debug, Clone, Copy)]
pub struct FixedPolicy(pub ScoringPolicy);

impl PolicyClassifier for FixedPolicy {
    fn classify(&self, _perception: &Perception) -> ScoringPolicy {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_mechanisms(tags: &[&str]) -> Perception {
        Perception {
            mechanisms: tags.iter().map(ToString::to_string).collect(),
            ..Perception::default()
        }
    }

    #[test]
    fn four_distinct_tags_switch_to_mechanism_centric() {
        let classifier = MechanismCountClassifier::default();
        assert_eq!(
            classifier.classify(&with_mechanisms(&["a", "b", "c"])),
            ScoringPolicy::ActorCentric
        );
        assert_eq!(
            classifier.classify(&with_mechanisms(&["a", "b", "c", "d"])),
            ScoringPolicy::MechanismCentric
        );
    }

    #[test]
    fn repeated_tags_count_once() {
        let classifier = MechanismCountClassifier::default();
        assert_eq!(
            classifier.classify(&with_mechanisms(&["a", "a", "b", "b"])),
            ScoringPolicy::ActorCentric
        );
    }

    #[test]
    fn builtin_weights_sum_to_one() {
        for policy in [ScoringPolicy::ActorCentric, ScoringPolicy::MechanismCentric] {
            let w = policy.weights();
            assert!((w.actor + w.mechanism + w.logic - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn combine_applies_weights() {
        let w = ScoringPolicy::ActorCentric.weights();
        assert!((w.combine(1.0, 0.5, 0.0) - 0.65).abs() < 1e-9);
    }
}
