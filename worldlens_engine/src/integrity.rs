use std::collections::HashSet;
use uuid::Uuid;
use worldlens_core::{EngineError, PatternStore, Result, WorldviewRepo};

/// Fail when any pattern in scope belongs to a worldview that no longer
/// exists. Batch jobs call this before touching anything.
pub async fn verify_pattern_owners(
    patterns: &dyn PatternStore,
    worldviews: &dyn WorldviewRepo,
    scope: Option<Uuid>,
) -> Result<()> {
    let owners = patterns.owner_counts(scope).await?;
    if owners.is_empty() {
        return Ok(());
    }
    let known: HashSet<Uuid> = worldviews.all_ids().await?.into_iter().collect();
    match owners.into_iter().find(|(id, _)| !known.contains(id)) {
        Some((worldview_id, pattern_count)) => Err(EngineError::DanglingWorldview {
            worldview_id,
            pattern_count,
        }),
        None => Ok(()),
    }
}
