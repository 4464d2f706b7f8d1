//! Model-assisted review of weak surface patterns.
//!
//! Patterns are sent in numbered batches; the model answers with the
//! 1-based numbers of entries that carry no information.

use serde::{Deserialize, Serialize};
use worldlens_core::{EngineError, Result};

/// One entry the reviewer asked to remove.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct FlaggedPattern {
    /// 1-based position in the submitted list.
    pub id: i64,
    #[serde(default)]
    pub reason: String,
}

/// Parsed reviewer answer.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct QualityReport {
    #[serde(default)]
    pub bad_patterns: Vec<FlaggedPattern>,
}

impl QualityReport {
    /// Parse the raw model output, tolerating a fenced code block around
    /// the JSON object.
    pub fn parse(raw: &str) -> Result<Self> {
        let body = strip_code_fence(raw);
        serde_json::from_str(body).map_err(|e| {
            EngineError::MalformedResponse(format!(
                "{e}: {}",
                worldlens_core::truncate_for_log(body, 120)
            ))
        })
    }

    /// 0-based batch positions of flagged entries. Numbers outside
    /// `1..=batch_len` are dropped; duplicates collapse.
    #[must_use]
    pub fn flagged_indices(&self, batch_len: usize) -> Vec<usize> {
        let mut indices: Vec<usize> = self
            .bad_patterns
            .iter()
            .filter_map(|flag| usize::try_from(flag.id).ok())
            .filter(|id| (1..=batch_len).contains(id))
            .map(|id| id - 1)
            .collect();
        indices.sort_unstable();
        indices.dedup();
        indices
    }
}

fn strip_code_fence(raw: &str) -> &str {
    let inner = if let Some((_, rest)) = raw.split_once("```json") {
        rest
    } else if let Some((_, rest)) = raw.split_once("```") {
        rest
    } else {
        return raw.trim();
    };
    inner.split_once("```").map_or(inner, |(body, _)| body).trim()
}

/// Review prompt for one batch of surface pattern texts.
#[must_use]
pub fn build_prompt(texts: &[&str]) -> String {
    let list = texts
        .iter()
        .enumerate()
        .map(|(idx, text)| format!("{}. {text}", idx + 1))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"You review surface-level claims extracted from forum posts.
Identify the entries that are meaningless or carry little information.

Entries:
{list}

A bad entry has one or more of these traits:
1. The subject is unclear (who?)
2. The content is vague (what?)
3. It is a bare emotional reaction
4. It is a generality with no specific event
5. It is speculation without grounds

Reply with JSON only, listing the bad entries and nothing else:
{{"bad_patterns": [{{"id": <number>, "reason": "<short reason>"}}]}}

Do not list good entries."#
    )
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct QualityStats {
    /// Patterns sent for review in batches that got an answer.
    pub checked: usize,
    /// Patterns marked dead.
    pub removed: usize,
    /// Batches skipped because the provider call failed.
    pub failed_batches: usize,
}
