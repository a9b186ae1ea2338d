pub mod gemini;
pub mod mock;

use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::STANDARD};
use rand::RngExt;
use serde::Deserialize;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Length of a client-generated trend id.
const ID_LEN: usize = 9;
const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Fallback media type when the service omits one on an inline image.
pub const DEFAULT_IMAGE_MIME: &str = "image/png";

/// Anything that can go wrong talking to the generation service.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("no Gemini API key found. Set GEMINI_API_KEY.")]
    MissingCredential,
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Gemini API error ({status}): {body}")]
    Api { status: u16, body: String },
    #[error("Gemini API returned an empty response")]
    EmptyResponse,
    #[error("failed to decode {what}: {source}")]
    Decode {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Client-side identifier of a trend. Unique within one discovery batch.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TrendId(String);

impl TrendId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// A random 9-character base-36 id.
    pub fn random() -> Self {
        let mut rng = rand::rng();
        let id = (0..ID_LEN)
            .map(|_| ID_ALPHABET[rng.random_range(0..ID_ALPHABET.len())] as char)
            .collect();
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrendId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A discovered news item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trend {
    pub id: TrendId,
    pub title: String,
    pub source: String,
    pub summary: String,
    pub business_impact: String,
    pub url: Option<String>,
}

/// One element of the discovery response, before an id and url are attached.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendDraft {
    pub title: String,
    pub source: String,
    pub summary: String,
    pub business_impact: String,
}

/// Turn decoded drafts into trends: fresh ids, plus a source url taken
/// from the grounding citations by position.
///
/// The i-th citation goes to the i-th trend, falling back to the first
/// citation when there are fewer citations than trends. This is positional,
/// not semantic: a citation is not guaranteed to be about the trend it lands on.
pub fn attach_sources(drafts: Vec<TrendDraft>, citations: &[String]) -> Vec<Trend> {
    let mut seen = HashSet::with_capacity(drafts.len());
    drafts
        .into_iter()
        .enumerate()
        .map(|(i, draft)| {
            let id = loop {
                let id = TrendId::random();
                if seen.insert(id.clone()) {
                    break id;
                }
            };
            Trend {
                id,
                title: draft.title,
                source: draft.source,
                summary: draft.summary,
                business_impact: draft.business_impact,
                url: citations.get(i).or_else(|| citations.first()).cloned(),
            }
        })
        .collect()
}

/// The drafted post plus its supporting pieces.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedContent {
    pub post: String,
    /// Five are asked for; the count is not enforced.
    pub hashtags: Vec<String>,
    pub first_comment: String,
    pub image_prompt: String,
}

/// An inline image returned by the service, still base64-encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub mime_type: String,
    pub data: String,
}

impl GeneratedImage {
    /// `data:<mime>;base64,<payload>`, ready to embed.
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }

    pub fn decode(&self) -> Result<Vec<u8>, base64::DecodeError> {
        STANDARD.decode(self.data.as_bytes())
    }

    /// File extension matching the media type.
    pub fn extension(&self) -> &'static str {
        match self.mime_type.as_str() {
            "image/jpeg" | "image/jpg" => "jpg",
            "image/webp" => "webp",
            "image/gif" => "gif",
            _ => "png",
        }
    }
}

/// Voice applied when drafting content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tone {
    #[default]
    Default,
    Technical,
    Skeptical,
    BeginnerFriendly,
}

impl Tone {
    pub const ALL: [Tone; 4] = [
        Tone::Default,
        Tone::Technical,
        Tone::Skeptical,
        Tone::BeginnerFriendly,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Tone::Default => "Default",
            Tone::Technical => "Technical",
            Tone::Skeptical => "Skeptical",
            Tone::BeginnerFriendly => "Beginner-Friendly",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Error)]
#[error("unknown tone: {0} (expected one of Default, Technical, Skeptical, Beginner-Friendly)")]
pub struct UnknownTone(pub String);

impl FromStr for Tone {
    type Err = UnknownTone;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['_', ' '], "-");
        match normalized.as_str() {
            "default" => Ok(Tone::Default),
            "technical" => Ok(Tone::Technical),
            "skeptical" => Ok(Tone::Skeptical),
            "beginner-friendly" | "beginner" => Ok(Tone::BeginnerFriendly),
            _ => Err(UnknownTone(s.to_string())),
        }
    }
}

/// Token usage reported by the service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl TokenUsage {
    /// Accumulate another usage into this one.
    pub fn add(&mut self, other: TokenUsage) {
        self.input_tokens += other.input_tokens;
        self.output_tokens += other.output_tokens;
    }

    /// Total tokens (input + output).
    pub fn total(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }
}

/// The remote capability behind the dashboard: find trends, write about one,
/// and draw a picture for it. Could be Gemini or a test script.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn discover_trends(&self) -> Result<Vec<Trend>, GenerationError>;

    async fn draft_content(
        &self,
        trend: &Trend,
        tone: Tone,
    ) -> Result<GeneratedContent, GenerationError>;

    /// `Ok(None)` when the service answered without an inline image.
    async fn render_image(&self, prompt: &str) -> Result<Option<GeneratedImage>, GenerationError>;

    /// Tokens consumed so far this session.
    fn usage(&self) -> TokenUsage {
        TokenUsage::default()
    }
}
