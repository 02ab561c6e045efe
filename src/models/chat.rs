use chrono::Utc;
use futures::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use super::book::Recommendation;
use super::profile::{AgeGroup, Language, ReaderProfile};

/// Role of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// A single message in the conversation transcript
///
/// Assistant messages are created empty and appended to while the stream is
/// live; they are immutable once the turn completes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub role: ChatRole,
    pub content: String,
    /// Epoch milliseconds
    pub timestamp: i64,
}

impl ChatMessage {
    /// Creates a message with a fresh id and the current timestamp
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        let prefix = match role {
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
        };
        Self {
            id: format!("{}-{}", prefix, Uuid::new_v4()),
            role,
            content: content.into(),
            timestamp: Utc::now().timestamp_millis(),
        }
    }
}

// ============================================================================
// Relay wire types
// ============================================================================

/// Book shape sent to the relay: catalog id and cover URL are deliberately
/// omitted from the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimplifiedBook {
    pub title: String,
    pub author: String,
    pub description: String,
    #[serde(rename = "ageGroup")]
    pub age_groups: Vec<AgeGroup>,
    pub interests: Vec<String>,
    pub genres: Vec<String>,
    pub page_count: u32,
    pub published_year: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimplifiedRecommendation {
    pub book: SimplifiedBook,
    pub score: u32,
    pub match_reasons: Vec<String>,
}

impl From<&Recommendation> for SimplifiedRecommendation {
    fn from(rec: &Recommendation) -> Self {
        Self {
            book: SimplifiedBook {
                title: rec.book.title.clone(),
                author: rec.book.author.clone(),
                description: rec.book.description.clone(),
                age_groups: rec.book.age_groups.clone(),
                interests: rec.book.interests.clone(),
                genres: rec.book.genres.clone(),
                page_count: rec.book.page_count,
                published_year: rec.book.published_year,
            },
            score: rec.score,
            match_reasons: rec.match_reasons.clone(),
        }
    }
}

/// Request body for the relay endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub message: String,
    pub wizard_data: ReaderProfile,
    pub recommendations: Vec<SimplifiedRecommendation>,
    pub conversation_history: Vec<ChatMessage>,
}

// ============================================================================
// Stream event protocol
// ============================================================================

/// Sentinel payload marking clean end-of-stream
pub const DONE_MARKER: &str = "[DONE]";

/// One event on the relay's outbound stream
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// A content segment, forwarded in arrival order
    Chunk { text: String },
    /// A mid-stream failure; the connection is torn down after this
    Error {
        error: String,
        details: Option<String>,
    },
    /// Clean completion sentinel
    Done,
}

impl StreamEvent {
    pub fn chunk(text: impl Into<String>) -> Self {
        StreamEvent::Chunk { text: text.into() }
    }

    pub fn error(error: impl Into<String>, details: Option<String>) -> Self {
        StreamEvent::Error {
            error: error.into(),
            details,
        }
    }

    /// Encodes the event as a server-sent-event frame
    pub fn encode(&self) -> String {
        match self {
            StreamEvent::Done => format!("data: {}\n\n", DONE_MARKER),
            StreamEvent::Chunk { text } => {
                format!("data: {}\n\n", json!({ "text": text }))
            }
            StreamEvent::Error { error, details } => {
                let payload = match details {
                    Some(details) => json!({ "error": error, "details": details }),
                    None => json!({ "error": error }),
                };
                format!("data: {}\n\n", payload)
            }
        }
    }

    /// Decodes a `data:` payload back into an event
    ///
    /// Returns `None` for payloads that are neither the sentinel nor a valid
    /// event object; callers skip those frames.
    pub fn decode(payload: &str) -> Option<Self> {
        let payload = payload.trim();
        if payload.is_empty() {
            return None;
        }
        if payload == DONE_MARKER {
            return Some(StreamEvent::Done);
        }

        let value: serde_json::Value = serde_json::from_str(payload).ok()?;
        if let Some(text) = value.get("text").and_then(|t| t.as_str()) {
            return Some(StreamEvent::chunk(text));
        }
        if let Some(error) = value.get("error").and_then(|e| e.as_str()) {
            let details = value
                .get("details")
                .and_then(|d| d.as_str())
                .map(str::to_string);
            return Some(StreamEvent::error(error, details));
        }
        None
    }
}

// ============================================================================
// SSE framing
// ============================================================================

/// Incremental line buffer for server-sent-event bodies
///
/// Network chunks can split frames (and even UTF-8 sequences) at arbitrary
/// byte positions, so bytes are buffered until a full line is available.
/// Returns the payload of each complete `data:` line; other lines (blank
/// separators, comments) are dropped.
#[derive(Debug, Default)]
pub struct SseLineBuffer {
    buf: Vec<u8>,
}

impl SseLineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        self.buf.extend_from_slice(bytes);

        let mut payloads = Vec::new();
        while let Some(pos) = self.buf.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buf.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&line);
            let line = line.trim_end_matches(['\n', '\r']);
            if let Some(data) = line.strip_prefix("data:") {
                payloads.push(data.trim_start().to_string());
            }
        }
        payloads
    }
}

/// Adapts a byte stream into a stream of SSE `data:` payloads
///
/// One byte chunk can complete zero or more frames; payloads are yielded in
/// order as they complete. Transport errors pass through unchanged.
pub fn sse_payload_stream<S, E>(body: S) -> impl Stream<Item = Result<String, E>> + Send
where
    S: Stream<Item = Result<bytes::Bytes, E>> + Send + 'static,
    E: Send + 'static,
{
    let mut buffer = SseLineBuffer::new();
    body.flat_map(move |result| {
        let items: Vec<Result<String, E>> = match result {
            Ok(chunk) => buffer.push(&chunk).into_iter().map(Ok).collect(),
            Err(e) => vec![Err(e)],
        };
        futures::stream::iter(items)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_frame_round_trip() {
        let event = StreamEvent::chunk("Hello");
        let frame = event.encode();
        assert_eq!(frame, "data: {\"text\":\"Hello\"}\n\n");

        let payload = frame.strip_prefix("data: ").unwrap().trim_end();
        assert_eq!(StreamEvent::decode(payload), Some(event));
    }

    #[test]
    fn test_done_frame_round_trip() {
        assert_eq!(StreamEvent::Done.encode(), "data: [DONE]\n\n");
        assert_eq!(StreamEvent::decode("[DONE]"), Some(StreamEvent::Done));
    }

    #[test]
    fn test_error_frame_with_details() {
        let event = StreamEvent::error("Stream interrupted", Some("timeout".to_string()));
        let frame = event.encode();
        let payload = frame.strip_prefix("data: ").unwrap().trim_end();
        assert_eq!(StreamEvent::decode(payload), Some(event));
    }

    #[test]
    fn test_decode_skips_malformed_payloads() {
        assert_eq!(StreamEvent::decode("not json"), None);
        assert_eq!(StreamEvent::decode("{\"other\": 1}"), None);
        assert_eq!(StreamEvent::decode(""), None);
    }

    #[test]
    fn test_sse_buffer_reassembles_split_frames() {
        let mut buffer = SseLineBuffer::new();

        assert!(buffer.push(b"data: {\"text\":\"Hel").is_empty());
        let payloads = buffer.push(b"lo\"}\n\ndata: [DONE]\n\n");

        assert_eq!(payloads, vec!["{\"text\":\"Hello\"}", "[DONE]"]);
    }

    #[test]
    fn test_sse_buffer_handles_crlf_lines() {
        let mut buffer = SseLineBuffer::new();
        let payloads = buffer.push(b"data: {\"text\":\"hi\"}\r\n\r\n");
        assert_eq!(payloads, vec!["{\"text\":\"hi\"}"]);
    }

    #[test]
    fn test_sse_buffer_ignores_non_data_lines() {
        let mut buffer = SseLineBuffer::new();
        let payloads = buffer.push(b": comment\nretry: 100\ndata: x\n\n");
        assert_eq!(payloads, vec!["x"]);
    }

    #[tokio::test]
    async fn test_sse_payload_stream_yields_payloads_in_order() {
        let chunks: Vec<Result<bytes::Bytes, std::io::Error>> = vec![
            Ok(bytes::Bytes::from("data: one\n\nda")),
            Ok(bytes::Bytes::from("ta: two\n\n")),
        ];
        let payloads: Vec<_> = sse_payload_stream(futures::stream::iter(chunks))
            .map(|r| r.unwrap())
            .collect()
            .await;

        assert_eq!(payloads, vec!["one", "two"]);
    }

    #[test]
    fn test_chat_message_new_assigns_role_prefixed_id() {
        let message = ChatMessage::new(ChatRole::User, "hi");
        assert!(message.id.starts_with("user-"));
        assert_eq!(message.role, ChatRole::User);
        assert!(message.timestamp > 0);
    }

    #[test]
    fn test_chat_request_wire_shape() {
        let request = ChatRequest {
            message: "Which book first?".to_string(),
            wizard_data: ReaderProfile {
                name: "Maya".to_string(),
                age_group: AgeGroup::EightToTen,
                interests: vec!["magic".to_string()],
                genres: vec!["fantasy".to_string()],
                language: Language::English,
            },
            recommendations: vec![],
            conversation_history: vec![],
        };

        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("wizardData").is_some());
        assert!(value.get("conversationHistory").is_some());
    }
}
