//! Time-based weakening of unreinforced patterns.
//!
//! Strength is multiplied by the layer's daily rate for every whole day since
//! the decay anchor; the anchor then advances so repeated runs never charge
//! the same day twice.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use worldlens_core::{Layer, LayerPolicy, Pattern, PatternStatus};

/// Result of evaluating one pattern at a point in time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DecayOutcome {
    /// Seen today, or nothing left to charge.
    Unchanged,
    Apply {
        strength: f64,
        status: PatternStatus,
        decayed_at: DateTime<Utc>,
    },
}

/// Decide the new strength and status for `pattern` at `now`.
#[must_use]
pub fn evaluate(
    pattern: &Pattern,
    policy: &LayerPolicy,
    dead_floor: f64,
    now: DateTime<Utc>,
) -> DecayOutcome {
    let days_inactive = (now - pattern.last_seen).num_days();
    if days_inactive <= 0 {
        return DecayOutcome::Unchanged;
    }

    let anchor = pattern.decay_anchor();
    let pending = (now - anchor).num_days().max(0);
    let strength =
        pattern.strength * policy.decay_rate.powi(i32::try_from(pending).unwrap_or(i32::MAX));

    let status = if strength < dead_floor {
        PatternStatus::Dead
    } else if days_inactive > policy.expiration_days {
        match pattern.layer {
            Layer::Deep => PatternStatus::Fading,
            Layer::Surface | Layer::Implicit => PatternStatus::Dead,
        }
    } else {
        pattern.status
    };

    if pending == 0 && status == pattern.status {
        return DecayOutcome::Unchanged;
    }

    DecayOutcome::Apply {
        strength,
        status,
        decayed_at: anchor + Duration::days(pending),
    }
}

/// Write an outcome back onto the pattern. Returns whether anything changed.
pub fn apply(pattern: &mut Pattern, outcome: DecayOutcome) -> bool {
    match outcome {
        DecayOutcome::Unchanged => false,
        DecayOutcome::Apply {
            strength,
            status,
            decayed_at,
        } => {
            pattern.strength = strength;
            pattern.status = status;
            pattern.decayed_at = Some(decayed_at);
            true
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LayerDecayStats {
    /// Live patterns examined.
    pub total: usize,
    /// Patterns whose strength was reduced.
    pub decayed: usize,
    /// Patterns that became fading in this run.
    pub fading: usize,
    /// Patterns that died in this run.
    pub dead: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DecayStats {
    pub surface: LayerDecayStats,
    pub implicit: LayerDecayStats,
    pub deep: LayerDecayStats,
}

impl DecayStats {
    #[must_use]
    pub const fn layer(&self, layer: Layer) -> &LayerDecayStats {
        match layer {
            Layer::Surface => &self.surface,
            Layer::Implicit => &self.implicit,
            Layer::Deep => &self.deep,
        }
    }

    pub const fn layer_mut(&mut self, layer: Layer) -> &mut LayerDecayStats {
        match layer {
            Layer::Surface => &mut self.surface,
            Layer::Implicit => &mut self.implicit,
            Layer::Deep => &mut self.deep,
        }
    }

    /// Record the transition of one pattern.
    pub fn record(&mut self, layer: Layer, before: &Pattern, after: &Pattern) {
        let entry = self.layer_mut(layer);
        entry.total += 1;
        if after.strength < before.strength {
            entry.decayed += 1;
        }
        if after.status != before.status {
            match after.status {
                PatternStatus::Fading => entry.fading += 1,
                PatternStatus::Dead => entry.dead += 1,
                PatternStatus::Active => {}
            }
        }
    }

    #[must_use]
    pub const fn total_dead(&self) -> usize {
        self.surface.dead + self.implicit.dead + self.deep.dead
    }
}
