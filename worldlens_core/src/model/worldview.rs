use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::perception::Actor;

/// A belief-system entity. Created and archived by the consolidation process.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Worldview {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Structured description; `None` when missing or in a legacy format.
    #[serde(default)]
    pub frame: Option<WorldviewFrame>,
    #[serde(default)]
    pub total_perceptions: i32,
    #[serde(default)]
    pub archived: bool,
}

/// Actor recorded on a worldview frame, either as a bare string or as the
/// same shape a perception carries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum ActorField {
    Plain(String),
    Described(Actor),
}

impl ActorField {
    #[must_use]
    pub fn subject(&self) -> &str {
        match self {
            Self::Plain(s) => s,
            Self::Described(actor) => &actor.subject,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogicPattern {
    #[serde(default)]
    pub trigger: String,
    #[serde(default)]
    pub conclusion: String,
}

impl LogicPattern {
    /// Trigger and conclusion joined into one text.
    #[must_use]
    pub fn as_text(&self) -> String {
        format!("{} {}", self.trigger, self.conclusion)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct WorldviewFrame {
    #[serde(default)]
    pub actor: Option<ActorField>,
    #[serde(default)]
    pub core_mechanisms: Vec<String>,
    #[serde(default)]
    pub logic_pattern: Option<LogicPattern>,
}

impl WorldviewFrame {
    /// Parse the JSON frame stored on a worldview row.
    ///
    /// Returns `None` for text that is not a JSON object of the expected shape.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        serde_json::from_str::<Self>(raw).ok()
    }

    #[must_use]
    pub fn actor_subject(&self) -> &str {
        self.actor.as_ref().map_or("", ActorField::subject)
    }
}

/// Relevance-scored association between a perception and a worldview.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PerceptionLink {
    pub perception_id: Uuid,
    pub worldview_id: Uuid,
    pub relevance_score: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_accepts_plain_actor() {
        let frame = WorldviewFrame::parse(
            r#"{"actor": "China / left-wing groups", "core_mechanisms": ["collusion"]}"#,
        );
        let frame = frame.unwrap_or_default();
        assert_eq!(frame.actor_subject(), "China / left-wing groups");
        assert_eq!(frame.core_mechanisms, vec!["collusion".to_string()]);
        assert!(frame.logic_pattern.is_none());
    }

    #[test]
    fn frame_accepts_described_actor() {
        let frame = WorldviewFrame::parse(
            r#"{"actor": {"subject": "the government", "purpose": "control"},
                "logic_pattern": {"trigger": "new policy", "conclusion": "hidden agenda"}}"#,
        )
        .unwrap_or_default();
        assert_eq!(frame.actor_subject(), "the government");
        assert_eq!(
            frame.logic_pattern.map(|l| l.as_text()).as_deref(),
            Some("new policy hidden agenda")
        );
    }

    #[test]
    fn legacy_frame_text_does_not_parse() {
        assert!(WorldviewFrame::parse("a free-text legacy frame").is_none());
        assert!(WorldviewFrame::parse("").is_none());
    }
}
