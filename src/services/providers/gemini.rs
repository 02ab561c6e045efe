/// Google Gemini streaming provider
///
/// Talks to the Generative Language API's `streamGenerateContent` operation
/// with `alt=sse`, so partial candidates arrive as `data:` frames that map
/// 1:1 onto the relay's outbound events.
use futures::StreamExt;
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::{sse_payload_stream, ChatRole};
use crate::services::providers::{ChatProvider, ChatTurn, ChunkStream};

const TEMPERATURE: f64 = 0.7;
const TOP_P: f64 = 0.9;
const MAX_OUTPUT_TOKENS: u32 = 10244;

const BLOCK_THRESHOLD: &str = "BLOCK_MEDIUM_AND_ABOVE";
const HARM_CATEGORIES: [&str; 4] = [
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
];

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
    safety_settings: Vec<SafetySetting>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    role: String,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f64,
    top_p: f64,
    max_output_tokens: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SafetySetting {
    category: &'static str,
    threshold: &'static str,
}

/// One SSE payload from `streamGenerateContent`
#[derive(Debug, Deserialize)]
struct GenerateChunk {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

// ============================================================================
// Provider
// ============================================================================

#[derive(Clone)]
pub struct GeminiProvider {
    http_client: HttpClient,
    api_key: Option<String>,
    api_url: String,
    model: String,
}

impl GeminiProvider {
    pub fn new(config: &Config) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key: config
                .gemini_api_key
                .clone()
                .filter(|key| !key.is_empty()),
            api_url: config.gemini_api_url.clone(),
            model: config.gemini_model.clone(),
        }
    }

    fn build_request(turn: &ChatTurn) -> GenerateRequest {
        let mut contents = Vec::with_capacity(turn.history.len() + 3);

        // Grounding text and its scripted acknowledgment lead the
        // conversation in place of a system role.
        contents.push(Content {
            role: "user".to_string(),
            parts: vec![Part {
                text: turn.system_prompt.clone(),
            }],
        });
        contents.push(Content {
            role: "model".to_string(),
            parts: vec![Part {
                text: turn.acknowledgment.clone(),
            }],
        });

        for message in &turn.history {
            let role = match message.role {
                ChatRole::User => "user",
                ChatRole::Assistant => "model",
            };
            contents.push(Content {
                role: role.to_string(),
                parts: vec![Part {
                    text: message.content.clone(),
                }],
            });
        }

        contents.push(Content {
            role: "user".to_string(),
            parts: vec![Part {
                text: turn.message.clone(),
            }],
        });

        GenerateRequest {
            contents,
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
                top_p: TOP_P,
                max_output_tokens: MAX_OUTPUT_TOKENS,
            },
            safety_settings: HARM_CATEGORIES
                .iter()
                .copied()
                .map(|category| SafetySetting {
                    category,
                    threshold: BLOCK_THRESHOLD,
                })
                .collect(),
        }
    }
}

/// Extracts the text of one streamed payload, if it carries any
fn extract_chunk_text(payload: &str) -> Option<String> {
    let chunk: GenerateChunk = serde_json::from_str(payload).ok()?;
    let content = chunk.candidates.first()?.content.as_ref()?;
    let text: String = content
        .parts
        .iter()
        .map(|part| part.text.as_str())
        .collect();
    (!text.is_empty()).then_some(text)
}

#[async_trait::async_trait]
impl ChatProvider for GeminiProvider {
    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn stream_chat(&self, turn: ChatTurn) -> AppResult<ChunkStream> {
        let api_key = self.api_key.as_deref().ok_or(AppError::Configuration)?;

        let url = format!(
            "{}/v1beta/models/{}:streamGenerateContent",
            self.api_url, self.model
        );
        let request = Self::build_request(&turn);

        let response = self
            .http_client
            .post(&url)
            .query(&[("alt", "sse")])
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream(format!(
                "API returned status {}: {}",
                status, body
            )));
        }

        tracing::info!(model = %self.model, history = turn.history.len(), "Gemini stream opened");

        let stream =
            sse_payload_stream(response.bytes_stream()).filter_map(|item| async move {
                match item {
                    Ok(payload) => extract_chunk_text(&payload).map(Ok),
                    Err(e) => Some(Err(AppError::Upstream(e.to_string()))),
                }
            });

        Ok(Box::pin(stream))
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ChatMessage;

    fn test_turn() -> ChatTurn {
        ChatTurn {
            system_prompt: "You are a librarian.".to_string(),
            acknowledgment: "Ready to help!".to_string(),
            history: vec![
                ChatMessage::new(ChatRole::User, "Which book is shortest?"),
                ChatMessage::new(ChatRole::Assistant, "That would be El Principito."),
            ],
            message: "Tell me more about it".to_string(),
        }
    }

    #[test]
    fn test_build_request_orders_turns() {
        let request = GeminiProvider::build_request(&test_turn());

        let roles: Vec<&str> = request.contents.iter().map(|c| c.role.as_str()).collect();
        assert_eq!(roles, vec!["user", "model", "user", "model", "user"]);

        assert_eq!(request.contents[0].parts[0].text, "You are a librarian.");
        assert_eq!(request.contents[1].parts[0].text, "Ready to help!");
        assert_eq!(request.contents[4].parts[0].text, "Tell me more about it");
    }

    #[test]
    fn test_build_request_covers_all_harm_categories() {
        let request = GeminiProvider::build_request(&test_turn());

        assert_eq!(request.safety_settings.len(), 4);
        for setting in &request.safety_settings {
            assert_eq!(setting.threshold, "BLOCK_MEDIUM_AND_ABOVE");
        }
    }

    #[test]
    fn test_request_serializes_camel_case() {
        let request = GeminiProvider::build_request(&test_turn());
        let value = serde_json::to_value(&request).unwrap();

        assert!(value.get("generationConfig").is_some());
        assert!(value.get("safetySettings").is_some());
        assert_eq!(value["generationConfig"]["topP"], 0.9);
        assert_eq!(value["generationConfig"]["maxOutputTokens"], 10244);
    }

    #[test]
    fn test_extract_chunk_text_joins_parts() {
        let payload = r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"Hel"},{"text":"lo"}]}}]}"#;
        assert_eq!(extract_chunk_text(payload), Some("Hello".to_string()));
    }

    #[test]
    fn test_extract_chunk_text_skips_empty_payloads() {
        assert_eq!(extract_chunk_text(r#"{"candidates":[]}"#), None);
        assert_eq!(
            extract_chunk_text(r#"{"candidates":[{"content":{"parts":[]}}]}"#),
            None
        );
        assert_eq!(extract_chunk_text("not json"), None);
    }

    #[test]
    fn test_provider_without_key_is_unconfigured() {
        let config = Config {
            gemini_api_key: Some(String::new()),
            gemini_api_url: "http://test.local".to_string(),
            gemini_model: "gemini-2.5-flash-lite".to_string(),
            host: "127.0.0.1".to_string(),
            port: 3000,
        };

        let provider = GeminiProvider::new(&config);
        assert!(!provider.is_configured());
    }
}
