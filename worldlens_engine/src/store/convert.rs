use sea_orm::{JsonValue, Set};
use worldlens_core::{Actor, Pattern, Perception, PerceptionLink, Worldview, WorldviewFrame};
use worldlens_entities::{
    layered_perceptions, perception_worldview_links, worldview_patterns, worldviews,
};

fn json_to_embedding(val: &JsonValue) -> Vec<f32> {
    val.as_array()
        .map(|arr| {
            arr.iter()
                .filter_map(|v| v.as_f64().map(|f| f as f32))
                .collect()
        })
        .unwrap_or_default()
}

pub fn embedding_to_json(emb: &[f32]) -> JsonValue {
    JsonValue::Array(emb.iter().map(|f| JsonValue::from(f64::from(*f))).collect())
}

fn json_to_strings(val: Option<&JsonValue>) -> Vec<String> {
    val.and_then(JsonValue::as_array)
        .map(|arr| {
            arr.iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

/// Actor column holds either `{subject, purpose, methods}` or a bare string.
fn json_to_actor(val: &JsonValue) -> Option<Actor> {
    match val {
        JsonValue::String(subject) => Some(Actor {
            subject: subject.clone(),
            ..Actor::default()
        }),
        JsonValue::Object(_) => serde_json::from_value(val.clone()).ok(),
        _ => None,
    }
}

pub fn pattern_from_model(m: worldview_patterns::Model) -> anyhow::Result<Pattern> {
    Ok(Pattern {
        id: m.id,
        worldview_id: m.worldview_id,
        layer: m.layer.parse()?,
        text: m.text,
        content_hash: m.content_hash,
        embedding: json_to_embedding(&m.embedding),
        strength: m.strength,
        status: m.status.parse()?,
        first_seen: m.first_seen.into(),
        last_seen: m.last_seen.into(),
        decayed_at: m.decayed_at.map(Into::into),
        appearance_count: m.appearance_count,
    })
}

pub fn pattern_to_active(p: &Pattern) -> worldview_patterns::ActiveModel {
    worldview_patterns::ActiveModel {
        id: Set(p.id),
        worldview_id: Set(p.worldview_id),
        layer: Set(p.layer.as_str().to_string()),
        text: Set(p.text.clone()),
        content_hash: Set(p.content_hash.clone()),
        embedding: Set(embedding_to_json(&p.embedding)),
        strength: Set(p.strength),
        status: Set(p.status.as_str().to_string()),
        first_seen: Set(p.first_seen.into()),
        last_seen: Set(p.last_seen.into()),
        decayed_at: Set(p.decayed_at.map(Into::into)),
        appearance_count: Set(p.appearance_count),
    }
}

pub fn worldview_from_model(m: worldviews::Model) -> Worldview {
    Worldview {
        id: m.id,
        title: m.title,
        description: m.description.unwrap_or_default(),
        frame: m.frame.as_deref().and_then(WorldviewFrame::parse),
        total_perceptions: m.total_perceptions,
        archived: m.archived,
    }
}

pub fn perception_from_model(m: &layered_perceptions::Model) -> Perception {
    Perception {
        id: m.id,
        content_id: m.content_id,
        explicit_claims: json_to_strings(m.explicit_claims.as_ref()),
        implicit_assumptions: json_to_strings(m.implicit_assumptions.as_ref()),
        deep_beliefs: json_to_strings(m.deep_beliefs.as_ref()),
        actor: m.actor.as_ref().and_then(json_to_actor),
        mechanisms: json_to_strings(m.mechanisms.as_ref()),
        logic_chain: json_to_strings(m.logic_chain.as_ref()),
    }
}

pub fn link_to_active(link: &PerceptionLink) -> perception_worldview_links::ActiveModel {
    perception_worldview_links::ActiveModel {
        id: Set(uuid::Uuid::now_v7()),
        perception_id: Set(link.perception_id),
        worldview_id: Set(link.worldview_id),
        relevance_score: Set(link.relevance_score),
        created_at: Set(chrono::Utc::now().into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn actor_column_accepts_string_or_object() {
        let plain = json_to_actor(&json!("the ruling party")).unwrap();
        assert_eq!(plain.subject, "the ruling party");

        let described = json_to_actor(&json!({"subject": "police", "methods": ["raids"]})).unwrap();
        assert_eq!(described.subject, "police");
        assert_eq!(described.methods, vec!["raids".to_string()]);

        assert!(json_to_actor(&json!(42)).is_none());
    }

    #[test]
    fn list_columns_skip_non_strings() {
        let val = json!(["collusion", 3, "media capture"]);
        assert_eq!(
            json_to_strings(Some(&val)),
            vec!["collusion".to_string(), "media capture".to_string()]
        );
        assert!(json_to_strings(None).is_empty());
    }

    #[test]
    fn embedding_survives_json() {
        let emb = vec![0.25_f32, -1.5, 0.0];
        assert_eq!(json_to_embedding(&embedding_to_json(&emb)), emb);
    }
}
