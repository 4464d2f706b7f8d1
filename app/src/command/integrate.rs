use tracing::info;
use uuid::Uuid;
use worldlens_core::PerceptionRepo;

use super::{Engine, print_json};

pub struct IntegrateInput {
    pub worldview: Uuid,
    pub perception: Uuid,
}

/// Folds a stored perception's layered items into a worldview's patterns.
#[derive(Debug, Clone, Copy)]
pub struct IntegrateStrategy;

impl super::CommandStrategy for IntegrateStrategy {
    type Input = IntegrateInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let engine = Engine::open().await?;

        let perception = PerceptionRepo::find_by_id(engine.store.as_ref(), &input.perception)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Perception not found: {}", input.perception))?;

        info!(
            worldview_id = %input.worldview,
            perception_id = %perception.id,
            "Integrating perception"
        );
        let stats = engine
            .lifecycle
            .integrate_perception(input.worldview, &perception)
            .await?;
        print_json(&stats)
    }
}
