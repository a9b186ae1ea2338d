use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Mutex;
use tracing::{debug, info};

use crate::consts::{
    API_BASE_URL, API_KEY_ENV, API_KEY_FALLBACK_ENV, DEFAULT_DISCOVER_MODEL, DEFAULT_DRAFT_MODEL,
    DEFAULT_IMAGE_MODEL,
};
use crate::prompts::discover::{build_discover_prompt, discover_schema};
use crate::prompts::draft::{build_draft_prompt, draft_schema};

use super::{
    DEFAULT_IMAGE_MIME, GeneratedContent, GeneratedImage, GenerationError, Generator, TokenUsage,
    Tone, Trend, TrendDraft, attach_sources,
};

const JSON_MIME: &str = "application/json";

/// Which model serves each of the three operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Models {
    pub discover: String,
    pub draft: String,
    pub image: String,
}

impl Default for Models {
    fn default() -> Self {
        Self {
            discover: DEFAULT_DISCOVER_MODEL.to_string(),
            draft: DEFAULT_DRAFT_MODEL.to_string(),
            image: DEFAULT_IMAGE_MODEL.to_string(),
        }
    }
}

/// Read the API key from the environment. `None` when unset or empty.
pub fn api_key_from_env() -> Option<String> {
    [API_KEY_ENV, API_KEY_FALLBACK_ENV]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|key| !key.is_empty())
}

/// A generator backed by the Gemini `generateContent` REST endpoint.
pub struct GeminiGenerator {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    models: Models,
    usage: Mutex<TokenUsage>,
}

impl GeminiGenerator {
    /// A missing key is not an error here; every call fails instead.
    pub fn new(api_key: Option<String>, models: Models) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: API_BASE_URL.to_string(),
            api_key,
            models,
            usage: Mutex::new(TokenUsage::default()),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn models(&self) -> &Models {
        &self.models
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }

    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            model
        )
    }

    fn discover_request() -> GenerateRequest {
        GenerateRequest::prompt(build_discover_prompt())
            .with_search()
            .with_schema(discover_schema())
    }

    fn draft_request(trend: &Trend, tone: Tone) -> GenerateRequest {
        GenerateRequest::prompt(build_draft_prompt(trend, tone)).with_schema(draft_schema())
    }

    /// Image models reject `responseMimeType`, so the prompt goes alone.
    fn image_request(prompt: &str) -> GenerateRequest {
        GenerateRequest::prompt(prompt.to_string())
    }

    fn parse_trends(response: &GenerateResponse) -> Result<Vec<Trend>, GenerationError> {
        let text = response.text().ok_or(GenerationError::EmptyResponse)?;
        let drafts: Vec<TrendDraft> = serde_json::from_str(extract_json(&text))
            .map_err(|source| GenerationError::Decode {
                what: "trend list",
                source,
            })?;
        Ok(attach_sources(drafts, &response.citations()))
    }

    fn parse_content(response: &GenerateResponse) -> Result<GeneratedContent, GenerationError> {
        let text = response.text().ok_or(GenerationError::EmptyResponse)?;
        serde_json::from_str(extract_json(&text)).map_err(|source| GenerationError::Decode {
            what: "generated content",
            source,
        })
    }

    async fn generate(
        &self,
        model: &str,
        request: &GenerateRequest,
    ) -> Result<GenerateResponse, GenerationError> {
        let api_key = self
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(GenerationError::MissingCredential)?;

        info!(model, "calling generateContent");

        let resp = self
            .client
            .post(self.endpoint(model))
            .header("x-goog-api-key", api_key)
            .header("content-type", "application/json")
            .json(request)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(GenerationError::Api { status, body });
        }

        let body = resp.text().await?;
        let response: GenerateResponse =
            serde_json::from_str(&body).map_err(|source| GenerationError::Decode {
                what: "generateContent response",
                source,
            })?;

        if let Some(usage) = response.token_usage() {
            debug!(
                model,
                input = usage.input_tokens,
                output = usage.output_tokens,
                "token usage"
            );
            if let Ok(mut total) = self.usage.lock() {
                total.add(usage);
            }
        }

        Ok(response)
    }
}

#[async_trait]
impl Generator for GeminiGenerator {
    async fn discover_trends(&self) -> Result<Vec<Trend>, GenerationError> {
        let response = self
            .generate(&self.models.discover, &Self::discover_request())
            .await?;
        Self::parse_trends(&response)
    }

    async fn draft_content(
        &self,
        trend: &Trend,
        tone: Tone,
    ) -> Result<GeneratedContent, GenerationError> {
        let response = self
            .generate(&self.models.draft, &Self::draft_request(trend, tone))
            .await?;
        Self::parse_content(&response)
    }

    async fn render_image(&self, prompt: &str) -> Result<Option<GeneratedImage>, GenerationError> {
        let response = self
            .generate(&self.models.image, &Self::image_request(prompt))
            .await?;
        Ok(response.first_image())
    }

    fn usage(&self) -> TokenUsage {
        self.usage.lock().map(|u| *u).unwrap_or_default()
    }
}

/// Extract JSON from text that may be wrapped in markdown code fences.
fn extract_json(text: &str) -> &str {
    let trimmed = text.trim();

    if let Some(after) = trimmed.strip_prefix("```json")
        && let Some(json) = after.strip_suffix("```")
    {
        return json.trim();
    }
    if let Some(after) = trimmed.strip_prefix("```")
        && let Some(json) = after.strip_suffix("```")
    {
        return json.trim();
    }

    trimmed
}

// --- API types ---

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<RequestContent>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<RequestTool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

impl GenerateRequest {
    fn prompt(text: String) -> Self {
        Self {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![RequestPart { text }],
            }],
            tools: Vec::new(),
            generation_config: None,
        }
    }

    fn with_search(mut self) -> Self {
        self.tools.push(RequestTool {
            google_search: GoogleSearch {},
        });
        self
    }

    fn with_schema(mut self, schema: Value) -> Self {
        self.generation_config = Some(GenerationConfig {
            response_mime_type: JSON_MIME,
            response_schema: schema,
        });
        self
    }
}

#[derive(Debug, Serialize)]
struct RequestContent {
    role: &'static str,
    parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
struct RequestPart {
    text: String,
}

#[derive(Debug, Serialize)]
struct RequestTool {
    google_search: GoogleSearch,
}

#[derive(Debug, Serialize)]
struct GoogleSearch {}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: Value,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    usage_metadata: Option<UsageMetadata>,
}

impl GenerateResponse {
    fn parts(&self) -> &[Part] {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|c| c.parts.as_slice())
            .unwrap_or_default()
    }

    /// Concatenated answer text of the first candidate, skipping thought parts.
    fn text(&self) -> Option<String> {
        let text: String = self
            .parts()
            .iter()
            .filter(|p| !p.thought)
            .filter_map(|p| p.text.as_deref())
            .collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }

    /// Web citation urls from grounding metadata, in order.
    fn citations(&self) -> Vec<String> {
        self.candidates
            .first()
            .and_then(|c| c.grounding_metadata.as_ref())
            .map(|g| {
                g.grounding_chunks
                    .iter()
                    .filter_map(|chunk| chunk.web.as_ref()?.uri.clone())
                    .filter(|uri| !uri.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// The first part carrying inline data.
    fn first_image(&self) -> Option<GeneratedImage> {
        self.parts().iter().find_map(|part| {
            let inline = part.inline_data.as_ref()?;
            let data = inline.data.as_ref().filter(|d| !d.is_empty())?;
            Some(GeneratedImage {
                mime_type: inline
                    .mime_type
                    .clone()
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| DEFAULT_IMAGE_MIME.to_string()),
                data: data.clone(),
            })
        })
    }

    fn token_usage(&self) -> Option<TokenUsage> {
        self.usage_metadata.as_ref().map(|u| TokenUsage {
            input_tokens: u.prompt_token_count,
            output_tokens: u.candidates_token_count,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    text: Option<String>,
    inline_data: Option<InlineData>,
    #[serde(default)]
    thought: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: Option<String>,
    data: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroundingMetadata {
    #[serde(default)]
    grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Deserialize)]
struct GroundingChunk {
    web: Option<WebSource>,
}

#[derive(Debug, Deserialize)]
struct WebSource {
    uri: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u64,
    #[serde(default)]
    candidates_token_count: u64,
}
