use std::sync::Arc;
use uuid::Uuid;
use worldlens_core::PerceptionRepo;
use worldlens_engine::{MechanismMatcher, MemoryStore};

use super::Engine;

pub struct MatchInput {
    pub threshold: Option<f64>,
    pub perception: Option<Uuid>,
    pub dry_run: bool,
}

/// Rebuilds perception-worldview links, for everything or one perception.
#[derive(Debug, Clone, Copy)]
pub struct MatchStrategy;

impl super::CommandStrategy for MatchStrategy {
    type Input = MatchInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let engine = Engine::open().await?;
        let threshold = input.threshold.unwrap_or(engine.config.matcher.threshold);

        if input.dry_run {
            return preview(&engine, input.perception, threshold).await;
        }

        match input.perception {
            Some(id) => {
                let linked = engine.matcher.match_single_perception(id, threshold).await?;
                println!("Perception {id} linked to {} worldviews", linked.len());
                for worldview_id in linked {
                    println!("  {worldview_id}");
                }
            }
            None => {
                let created = engine.matcher.match_all_perceptions(threshold).await?;
                println!("Created {created} links (threshold {threshold})");
            }
        }
        Ok(())
    }
}

/// Score against an in-memory copy and print the links that would be written.
async fn preview(engine: &Engine, perception: Option<Uuid>, threshold: f64) -> anyhow::Result<()> {
    let store = engine.store.as_ref();
    let snapshot = Arc::new(MemoryStore::snapshot(store, store).await?);
    if let Some(id) = perception {
        if let Some(p) = PerceptionRepo::find_by_id(store, &id).await? {
            snapshot.add_perception(p);
        }
    }

    let matcher = MechanismMatcher::new(
        snapshot.clone(),
        snapshot.clone(),
        snapshot.clone(),
        engine.config.matcher.clone(),
    );
    match perception {
        Some(id) => {
            matcher.match_single_perception(id, threshold).await?;
        }
        None => {
            matcher.match_all_perceptions(threshold).await?;
        }
    }

    let mut links = snapshot.links();
    links.sort_by(|a, b| {
        a.perception_id
            .cmp(&b.perception_id)
            .then(b.relevance_score.total_cmp(&a.relevance_score))
    });
    println!("Dry run: {} links would be written (threshold {threshold})", links.len());
    for link in links {
        println!(
            "  {} -> {} ({:.3})",
            link.perception_id, link.worldview_id, link.relevance_score
        );
    }
    Ok(())
}
