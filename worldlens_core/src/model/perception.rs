use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::layer::Layer;

/// Who a perception is about, and what they are said to want and do.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Actor {
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub purpose: String,
    #[serde(default)]
    pub methods: Vec<String>,
}

/// A structured observation produced upstream from a single source document.
///
/// Read-only to this workspace.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Perception {
    pub id: Uuid,
    #[serde(default)]
    pub content_id: Option<Uuid>,
    #[serde(default)]
    pub explicit_claims: Vec<String>,
    #[serde(default)]
    pub implicit_assumptions: Vec<String>,
    #[serde(default)]
    pub deep_beliefs: Vec<String>,
    #[serde(default)]
    pub actor: Option<Actor>,
    #[serde(default)]
    pub mechanisms: Vec<String>,
    #[serde(default)]
    pub logic_chain: Vec<String>,
}

impl Perception {
    /// Text items carried for the given layer.
    #[must_use]
    pub fn items(&self, layer: Layer) -> &[String] {
        match layer {
            Layer::Surface => &self.explicit_claims,
            Layer::Implicit => &self.implicit_assumptions,
            Layer::Deep => &self.deep_beliefs,
        }
    }

    #[must_use]
    pub fn actor_subject(&self) -> &str {
        self.actor.as_ref().map_or("", |a| a.subject.as_str())
    }

    /// Whether the reasoning-structure fields needed for matching are present.
    #[must_use]
    pub fn is_structured(&self) -> bool {
        !self.mechanisms.is_empty()
    }
}
