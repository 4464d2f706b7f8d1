use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::layer::{Layer, PatternStatus};

/// A recurring claim, assumption or belief inside one worldview and layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Pattern {
    pub id: Uuid,
    pub worldview_id: Uuid,
    pub layer: Layer,
    pub text: String,
    pub content_hash: String,
    pub embedding: Vec<f32>,
    pub strength: f64,
    pub status: PatternStatus,
    pub first_seen: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
    /// Instant up to which decay has already been applied.
    /// `None` means no decay since `last_seen`.
    pub decayed_at: Option<DateTime<Utc>>,
    pub appearance_count: i32,
}

impl Pattern {
    /// Create a freshly observed, active pattern.
    #[must_use]
    pub fn create(
        worldview_id: Uuid,
        layer: Layer,
        text: &str,
        embedding: Vec<f32>,
        initial_strength: f64,
        now: DateTime<Utc>,
    ) -> Self {
        let text = crate::normalize_text(text);
        Self {
            id: Uuid::now_v7(),
            worldview_id,
            layer,
            content_hash: crate::content_hash(layer.as_str(), &text),
            text,
            embedding,
            strength: initial_strength,
            status: PatternStatus::Active,
            first_seen: now,
            last_seen: now,
            decayed_at: None,
            appearance_count: 1,
        }
    }

    /// Record another sighting of this pattern.
    pub fn reinforce(&mut self, increment: f64, max_strength: f64, now: DateTime<Utc>) {
        self.strength = (self.strength + increment).min(max_strength);
        self.last_seen = now;
        self.decayed_at = None;
        self.appearance_count = self.appearance_count.saturating_add(1);
        self.status = PatternStatus::Active;
    }

    /// Point in time from which pending decay is counted.
    #[must_use]
    pub fn decay_anchor(&self) -> DateTime<Utc> {
        self.decayed_at
            .map_or(self.last_seen, |at| at.max(self.last_seen))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn create_starts_active_with_single_appearance() {
        let now = Utc::now();
        let p = Pattern::create(
            Uuid::now_v7(),
            Layer::Implicit,
            "  authority colludes   with opposition groups ",
            vec![1.0, 0.0],
            1.0,
            now,
        );
        assert_eq!(p.text, "authority colludes with opposition groups");
        assert_eq!(p.status, PatternStatus::Active);
        assert_eq!(p.appearance_count, 1);
        assert_eq!(p.first_seen, now);
        assert_eq!(p.last_seen, now);
        assert!((p.strength - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn reinforce_caps_strength_and_revives() {
        let start = Utc::now() - Duration::days(3);
        let mut p = Pattern::create(Uuid::now_v7(), Layer::Deep, "x", vec![], 9.8, start);
        p.status = PatternStatus::Fading;
        p.decayed_at = Some(start + Duration::days(2));

        let now = Utc::now();
        p.reinforce(0.5, 10.0, now);

        assert!((p.strength - 10.0).abs() < f64::EPSILON);
        assert_eq!(p.status, PatternStatus::Active);
        assert_eq!(p.appearance_count, 2);
        assert_eq!(p.last_seen, now);
        assert_eq!(p.decay_anchor(), now);
    }
}
