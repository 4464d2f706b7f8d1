#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use uuid::Uuid;
use worldlens_core::{
    ChatMessage, EmbeddingProvider, LLMProvider, LLMResponse, Worldview, WorldviewFrame,
};

/// Unit vector at `degrees` in the plane. cos of the angle between two of
/// these is their similarity.
pub fn direction(degrees: f64) -> Vec<f32> {
    let rad = degrees.to_radians();
    vec![rad.cos() as f32, rad.sin() as f32]
}

/// Embedder with a fixed text-to-vector table. Unknown texts fail.
#[derive(Default)]
pub struct TableEmbedder {
    vectors: HashMap<String, Vec<f32>>,
    calls: AtomicUsize,
    delay: Option<Duration>,
}

impl TableEmbedder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, text: &str, vector: Vec<f32>) -> Self {
        self.vectors.insert(text.to_string(), vector);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmbeddingProvider for TableEmbedder {
    async fn embed(&self, text: &str) -> anyhow::Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.vectors
            .get(text)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("no vector for {text:?}"))
    }
}

/// Text generator replaying queued answers in order.
pub struct ScriptedLlm {
    replies: Mutex<VecDeque<anyhow::Result<String>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedLlm {
    pub fn new(replies: Vec<anyhow::Result<String>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LLMProvider for ScriptedLlm {
    async fn chat(&self, messages: &[ChatMessage], _model: &str) -> anyhow::Result<LLMResponse> {
        if let Some(m) = messages.first() {
            self.prompts.lock().unwrap().push(m.content.clone());
        }
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(r#"{"bad_patterns": []}"#.to_string()))?;
        Ok(LLMResponse {
            content: reply,
            usage: None,
        })
    }

    fn get_default_model(&self) -> &str {
        "scripted"
    }
}

pub fn worldview(title: &str, frame: Option<WorldviewFrame>) -> Worldview {
    Worldview {
        id: Uuid::now_v7(),
        title: title.to_string(),
        description: String::new(),
        frame,
        total_perceptions: 0,
        archived: false,
    }
}
