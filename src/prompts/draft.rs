use serde_json::{Value, json};

use crate::generator::{Tone, Trend};

const PERSONA: &str = "You are a top-tier LinkedIn Ghostwriter for AI thought leaders.";
const TASK: &str = "Create a viral LinkedIn post and visual brief based on this news.";
const CONSTRAINTS: &[&str] = &[
    "Hook: Aggressive, short, stops the scroll. No \"In today's news...\".",
    "Body: Use whitespace. Bullet points for value.",
    "Closing: Engagement-driving question.",
];
const OUTPUTS: &[&str] = &[
    "post: The full text of the post.",
    "hashtags: Array of 5 hashtags.",
    "firstComment: A smart follow-up comment to add immediately after posting.",
    "imagePrompt: A detailed text-to-image prompt for a high-end, abstract, tech-focused visual that represents this concept. Minimalist, geometric, 3D render style.",
];

/// The voice instruction for each tone.
pub fn tone_instruction(tone: Tone) -> &'static str {
    match tone {
        Tone::Default => {
            "Balance technical credibility with executive readability. High-signal, low-fluff."
        }
        Tone::Technical => {
            "Use deep engineering terminology. Focus on architecture and performance metrics. Assume the reader is a Senior Engineer."
        }
        Tone::Skeptical => {
            "Adopt a critical lens. Question the hype. Look for potential bottlenecks, costs, or implementation challenges."
        }
        Tone::BeginnerFriendly => {
            "Use analogies. Explain complex terms (like RAG or Agentic) simply. Focus on the high-level benefit."
        }
    }
}

pub fn build_draft_prompt(trend: &Trend, tone: Tone) -> String {
    let constraints = CONSTRAINTS
        .iter()
        .enumerate()
        .map(|(i, c)| format!("{}. {}", i + 1, c))
        .collect::<Vec<_>>()
        .join("\n");
    let outputs = OUTPUTS
        .iter()
        .map(|o| format!("- {}", o))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "{persona}\n\nContext:\nTitle: {title}\nSummary: {summary}\nImpact: {impact}\n\nTask: {task}\nTone: {tone}\n\nFormat Constraints:\n{constraints}\n\nOutput JSON with:\n{outputs}\n",
        persona = PERSONA,
        title = trend.title,
        summary = trend.summary,
        impact = trend.business_impact,
        task = TASK,
        tone = tone_instruction(tone),
        constraints = constraints,
        outputs = outputs,
    )
}

/// Object with `post`, `hashtags`, `firstComment`, `imagePrompt`, all required.
pub fn draft_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "post": { "type": "STRING" },
            "hashtags": { "type": "ARRAY", "items": { "type": "STRING" } },
            "firstComment": { "type": "STRING" },
            "imagePrompt": { "type": "STRING" }
        },
        "required": ["post", "hashtags", "firstComment", "imagePrompt"]
    })
}
