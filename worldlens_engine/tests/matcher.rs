mod common;

use common::worldview;
use std::sync::Arc;
use uuid::Uuid;
use worldlens_core::{
    Actor, ActorField, EngineError, LinkRepo, LogicPattern, MatcherConfig, Perception,
    PerceptionLink, WorldviewFrame,
};
use worldlens_engine::{MechanismMatcher, MemoryStore};

fn frame(actor: &str, mechanisms: &[&str]) -> WorldviewFrame {
    WorldviewFrame {
        actor: Some(ActorField::Plain(actor.to_string())),
        core_mechanisms: mechanisms.iter().map(ToString::to_string).collect(),
        logic_pattern: Some(LogicPattern {
            trigger: "new policy announced".to_string(),
            conclusion: "hidden agenda".to_string(),
        }),
    }
}

fn perception(actor: &str, mechanisms: &[&str]) -> Perception {
    Perception {
        id: Uuid::now_v7(),
        actor: Some(Actor {
            subject: actor.to_string(),
            ..Actor::default()
        }),
        mechanisms: mechanisms.iter().map(ToString::to_string).collect(),
        logic_chain: vec!["new policy announced".to_string(), "hidden agenda".to_string()],
        ..Perception::default()
    }
}

fn matcher(store: &Arc<MemoryStore>) -> MechanismMatcher {
    MechanismMatcher::new(
        store.clone(),
        store.clone(),
        store.clone(),
        MatcherConfig::default(),
    )
}

#[tokio::test]
async fn match_all_keeps_top_three_and_updates_counts() {
    let store = Arc::new(MemoryStore::new());

    // four frames of decreasing agreement with the perception below
    let best = worldview("best", Some(frame("government", &["surveillance", "censorship"])));
    let second = worldview("second", Some(frame("government", &["surveillance"])));
    let third = worldview("third", Some(frame("government", &["bribery"])));
    let fourth = worldview("fourth", Some(frame("farmers", &["surveillance"])));
    let legacy = worldview("legacy", None);
    let mut archived = worldview("archived", Some(frame("government", &["surveillance", "censorship"])));
    archived.archived = true;
    let ids = [best.id, second.id, third.id, fourth.id];
    for wv in [best, second, third, fourth, legacy.clone(), archived.clone()] {
        store.add_worldview(wv);
    }

    let p = perception("the government", &["surveillance", "censorship"]);
    let unstructured = Perception {
        id: Uuid::now_v7(),
        ..Perception::default()
    };
    store.add_perception(p.clone());
    store.add_perception(unstructured.clone());

    // stale link from an earlier run
    LinkRepo::insert(
        store.as_ref(),
        &PerceptionLink {
            perception_id: unstructured.id,
            worldview_id: legacy.id,
            relevance_score: 0.9,
        },
    )
    .await
    .unwrap();

    let created = matcher(&store).match_all_perceptions(0.4).await.unwrap();
    assert_eq!(created, 3);

    let mut links = store.links();
    links.sort_by(|a, b| b.relevance_score.total_cmp(&a.relevance_score));
    let linked: Vec<Uuid> = links.iter().map(|l| l.worldview_id).collect();
    assert_eq!(linked, ids[..3].to_vec());
    assert!(links.iter().all(|l| l.perception_id == p.id));
    assert!(links.iter().all(|l| (0.4..=1.0).contains(&l.relevance_score)));

    for id in &ids[..3] {
        assert_eq!(store.worldview(id).unwrap().total_perceptions, 1);
    }
    assert_eq!(store.worldview(&ids[3]).unwrap().total_perceptions, 0);
    assert_eq!(store.worldview(&legacy.id).unwrap().total_perceptions, 0);
}

#[tokio::test]
async fn threshold_excludes_weak_matches() {
    let store = Arc::new(MemoryStore::new());
    let weak = worldview("weak", Some(frame("farmers", &["bribery"])));
    store.add_worldview(weak);
    store.add_perception(perception("the government", &["surveillance"]));

    // only logic agrees: 0.2 * 1.0
    let created = matcher(&store).match_all_perceptions(0.4).await.unwrap();
    assert_eq!(created, 0);
    assert!(store.links().is_empty());

    let created = matcher(&store).match_all_perceptions(0.2).await.unwrap();
    assert_eq!(created, 1);
}

#[tokio::test]
async fn match_single_replaces_only_its_own_links() {
    let store = Arc::new(MemoryStore::new());
    let wv = worldview("gov", Some(frame("government", &["surveillance"])));
    let other = worldview("other", Some(frame("press", &["censorship"])));
    store.add_worldview(wv.clone());
    store.add_worldview(other.clone());

    let target = perception("government", &["surveillance"]);
    let bystander = perception("press", &["censorship"]);
    store.add_perception(target.clone());
    store.add_perception(bystander.clone());

    for (perception_id, worldview_id) in [(target.id, other.id), (bystander.id, other.id)] {
        LinkRepo::insert(
            store.as_ref(),
            &PerceptionLink {
                perception_id,
                worldview_id,
                relevance_score: 0.5,
            },
        )
        .await
        .unwrap();
    }

    let matched = matcher(&store)
        .match_single_perception(target.id, 0.4)
        .await
        .unwrap();
    assert_eq!(matched, vec![wv.id]);

    let links = store.links();
    assert_eq!(links.len(), 2);
    assert!(links
        .iter()
        .any(|l| l.perception_id == bystander.id && l.worldview_id == other.id));
    assert!(links
        .iter()
        .any(|l| l.perception_id == target.id && l.worldview_id == wv.id));
    assert_eq!(store.worldview(&wv.id).unwrap().total_perceptions, 1);
    assert_eq!(store.worldview(&other.id).unwrap().total_perceptions, 1);
}

#[tokio::test]
async fn match_single_unknown_perception_is_an_error() {
    let store = Arc::new(MemoryStore::new());
    let missing = Uuid::now_v7();
    let err = matcher(&store)
        .match_single_perception(missing, 0.4)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::PerceptionNotFound(id) if id == missing));
}

#[tokio::test]
async fn matching_a_snapshot_leaves_the_source_untouched() {
    let source = Arc::new(MemoryStore::new());
    let wv = worldview("gov", Some(frame("government", &["surveillance"])));
    let mut archived = worldview("old", Some(frame("government", &["surveillance"])));
    archived.archived = true;
    source.add_worldview(wv.clone());
    source.add_worldview(archived.clone());
    source.add_perception(perception("government", &["surveillance"]));

    let snapshot = Arc::new(
        MemoryStore::snapshot(source.as_ref(), source.as_ref())
            .await
            .unwrap(),
    );
    assert!(snapshot.worldview(&archived.id).is_none());

    let created = matcher(&snapshot).match_all_perceptions(0.4).await.unwrap();
    assert_eq!(created, 1);
    assert_eq!(snapshot.links().len(), 1);
    assert_eq!(snapshot.worldview(&wv.id).unwrap().total_perceptions, 1);

    assert!(source.links().is_empty());
    assert_eq!(source.worldview(&wv.id).unwrap().total_perceptions, 0);
}
