//! Wire payloads for the Gemini `generateContent` endpoint.
//!
//! Response types default every field so a body with an unexpected shape
//! still deserializes; [`GenerateContentResponse::reply_text`] then reports
//! whether a usable candidate was present.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
}

impl GenerateContentRequest {
    /// Single-turn request carrying one text part.
    pub fn from_prompt(prompt: &str) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    /// Text of the first part of the first candidate, if it is non-empty.
    pub fn reply_text(&self) -> Option<&str> {
        self.candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .and_then(|content| content.parts.first())
            .and_then(|part| part.text.as_deref())
            .filter(|text| !text.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_body_matches_endpoint_shape() {
        let body = serde_json::to_value(GenerateContentRequest::from_prompt("Hi")).unwrap();
        assert_eq!(body, json!({ "contents": [{ "parts": [{ "text": "Hi" }] }] }));
    }

    #[test]
    fn reply_text_reads_first_candidate() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [
                { "content": { "parts": [{ "text": "first" }, { "text": "second" }] } },
                { "content": { "parts": [{ "text": "other" }] } }
            ]
        }))
        .unwrap();
        assert_eq!(response.reply_text(), Some("first"));
    }

    #[test]
    fn missing_fields_parse_to_no_reply() {
        for body in [
            json!({}),
            json!({ "candidates": [] }),
            json!({ "candidates": [{}] }),
            json!({ "candidates": [{ "content": {} }] }),
            json!({ "candidates": [{ "content": { "parts": [{}] } }] }),
            json!({ "candidates": [{ "content": { "parts": [{ "text": "" }] } }] }),
        ] {
            let response: GenerateContentResponse = serde_json::from_value(body.clone()).unwrap();
            assert_eq!(response.reply_text(), None, "body {body}");
        }
    }
}
