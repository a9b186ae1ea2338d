use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use super::{GeneratedContent, GeneratedImage, GenerationError, Generator, Tone, Trend, TrendId};

type Script<T> = Mutex<VecDeque<Result<T, GenerationError>>>;

/// A scripted generator for tests. Each operation pops its next pre-defined
/// result; calls are recorded so tests can assert what was asked.
#[derive(Default)]
pub struct MockGenerator {
    discoveries: Script<Vec<Trend>>,
    drafts: Script<GeneratedContent>,
    images: Script<Option<GeneratedImage>>,
    calls: Mutex<Vec<Call>>,
}

/// A recorded invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Discover,
    Draft { trend: TrendId, tone: Tone },
    Render { prompt: String },
}

impl MockGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn discover(self, result: Result<Vec<Trend>, GenerationError>) -> Self {
        push(&self.discoveries, result);
        self
    }

    pub fn draft(self, result: Result<GeneratedContent, GenerationError>) -> Self {
        push(&self.drafts, result);
        self
    }

    pub fn image(self, result: Result<Option<GeneratedImage>, GenerationError>) -> Self {
        push(&self.images, result);
        self
    }

    /// Everything asked of the mock so far, in order.
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Prompts passed to `render_image`, in order.
    pub fn render_prompts(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Render { prompt } => Some(prompt),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

fn push<T>(script: &Script<T>, result: Result<T, GenerationError>) {
    if let Ok(mut queue) = script.lock() {
        queue.push_back(result);
    }
}

fn pop<T>(script: &Script<T>, what: &str) -> Result<T, GenerationError> {
    script
        .lock()
        .ok()
        .and_then(|mut queue| queue.pop_front())
        .unwrap_or_else(|| {
            Err(GenerationError::Api {
                status: 500,
                body: format!("MockGenerator: no scripted {what} left"),
            })
        })
}

#[async_trait]
impl Generator for MockGenerator {
    async fn discover_trends(&self) -> Result<Vec<Trend>, GenerationError> {
        self.record(Call::Discover);
        pop(&self.discoveries, "discovery")
    }

    async fn draft_content(
        &self,
        trend: &Trend,
        tone: Tone,
    ) -> Result<GeneratedContent, GenerationError> {
        self.record(Call::Draft {
            trend: trend.id.clone(),
            tone,
        });
        pop(&self.drafts, "draft")
    }

    async fn render_image(&self, prompt: &str) -> Result<Option<GeneratedImage>, GenerationError> {
        self.record(Call::Render {
            prompt: prompt.to_string(),
        });
        pop(&self.images, "image")
    }
}
