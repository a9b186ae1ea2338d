use serde_json::{Value, json};

/// How many trends a discovery asks for.
pub const TREND_COUNT: usize = 3;

const TOPICS: &str = "Agentic AI, RAG architectures, LLM optimization, or Data Analytics";
const FIELDS: &[&str] = &[
    "A catchy headline.",
    "The primary source name.",
    "A technical summary (2 sentences).",
    "The \"Business Impact\" (Why a CTO or Founder should care).",
];

pub fn build_discover_prompt() -> String {
    let fields = FIELDS
        .iter()
        .enumerate()
        .map(|(i, field)| format!("{}. {}", i + 1, field))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Find {TREND_COUNT} distinct, trending technical developments from the last 24-48 hours related to:\n{TOPICS}.\n\nFor each development, provide:\n{fields}\n\nReturn the response as a JSON array.\n"
    )
}

/// Array of objects with four required string fields.
pub fn discover_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "title": { "type": "STRING" },
                "source": { "type": "STRING" },
                "summary": { "type": "STRING" },
                "businessImpact": { "type": "STRING" }
            },
            "required": ["title", "source", "summary", "businessImpact"]
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_asks_for_three() {
        let prompt = build_discover_prompt();
        assert!(prompt.contains("Find 3 distinct"));
    }

    #[test]
    fn prompt_names_topics() {
        let prompt = build_discover_prompt();
        assert!(prompt.contains("Agentic AI"));
        assert!(prompt.contains("RAG"));
        assert!(prompt.contains("LLM optimization"));
        assert!(prompt.contains("Data Analytics"));
    }

    #[test]
    fn prompt_lists_numbered_fields() {
        let prompt = build_discover_prompt();
        assert!(prompt.contains("1. A catchy headline."));
        assert!(prompt.contains("4. The \"Business Impact\""));
        assert!(prompt.contains("JSON array"));
    }

    #[test]
    fn schema_requires_every_field() {
        let schema = discover_schema();
        assert_eq!(schema["type"], "ARRAY");
        let required = schema["items"]["required"].as_array().unwrap();
        assert_eq!(required.len(), 4);
        assert!(required.contains(&json!("businessImpact")));
    }
}
