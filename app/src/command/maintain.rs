use serde::Serialize;
use uuid::Uuid;
use worldlens_engine::DecayStats;

use super::{Engine, print_json};

/// Applies time decay, optionally to a single worldview.
#[derive(Debug, Clone, Copy)]
pub struct DecayStrategy;

impl super::CommandStrategy for DecayStrategy {
    type Input = Option<Uuid>;

    async fn execute(&self, worldview: Self::Input) -> anyhow::Result<()> {
        let engine = Engine::open().await?;
        let stats = engine.lifecycle.decay_patterns(worldview).await?;
        print_json(&stats)
    }
}

/// Deletes dead patterns, optionally for a single worldview.
#[derive(Debug, Clone, Copy)]
pub struct CleanupStrategy;

impl super::CommandStrategy for CleanupStrategy {
    type Input = Option<Uuid>;

    async fn execute(&self, worldview: Self::Input) -> anyhow::Result<()> {
        let engine = Engine::open().await?;
        let removed = engine.lifecycle.cleanup_dead_patterns(worldview).await?;
        println!("Removed {removed} dead patterns");
        Ok(())
    }
}

#[derive(Serialize)]
struct MaintenanceReport {
    decay: DecayStats,
    removed: u64,
}

/// The daily job: decay across all worldviews, then delete what died.
#[derive(Debug, Clone, Copy)]
pub struct MaintainStrategy;

impl super::CommandStrategy for MaintainStrategy {
    type Input = ();

    async fn execute(&self, _input: Self::Input) -> anyhow::Result<()> {
        let engine = Engine::open().await?;
        let decay = engine.lifecycle.decay_patterns(None).await?;
        let removed = engine.lifecycle.cleanup_dead_patterns(None).await?;
        print_json(&MaintenanceReport { decay, removed })
    }
}
