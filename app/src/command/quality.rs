use uuid::Uuid;

use super::{Engine, print_json};

pub struct QualityInput {
    pub worldview: Uuid,
    pub threshold: Option<f64>,
}

/// Asks the chat model to flag weak, low-information surface patterns.
#[derive(Debug, Clone, Copy)]
pub struct QualityStrategy;

impl super::CommandStrategy for QualityStrategy {
    type Input = QualityInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let engine = Engine::open().await?;
        let stats = engine
            .lifecycle
            .cleanup_low_quality_patterns(input.worldview, input.threshold)
            .await?;
        print_json(&stats)
    }
}
