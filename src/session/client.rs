use std::pin::Pin;

use futures::{Stream, StreamExt};
use reqwest::{Client as HttpClient, StatusCode};

use crate::error::{AppError, AppResult};
use crate::models::{sse_payload_stream, ChatRequest, StreamEvent};

/// Lazy sequence of decoded relay events
///
/// Ends when the connection closes; a stream that ends without a `Done`
/// event terminated abnormally.
pub type EventStream = Pin<Box<dyn Stream<Item = AppResult<StreamEvent>> + Send>>;

/// Transport to the relay endpoint, injected into the chat session so it can
/// be driven by scripted streams in tests.
#[async_trait::async_trait]
pub trait RelayClient: Send + Sync {
    async fn send_message(&self, request: &ChatRequest) -> AppResult<EventStream>;
}

/// HTTP implementation over the relay's wire protocol
pub struct HttpRelayClient {
    http_client: HttpClient,
    base_url: String,
}

impl HttpRelayClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http_client: HttpClient::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait::async_trait]
impl RelayClient for HttpRelayClient {
    async fn send_message(&self, request: &ChatRequest) -> AppResult<EventStream> {
        let url = format!("{}/chat", self.base_url);
        let response = self.http_client.post(&url).json(request).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body: serde_json::Value = response.json().await.unwrap_or_default();
            let message = body
                .get("error")
                .and_then(|e| e.as_str())
                .unwrap_or("Failed to get response")
                .to_string();

            return Err(match status {
                StatusCode::TOO_MANY_REQUESTS => AppError::RateLimited,
                StatusCode::BAD_REQUEST => AppError::Validation(message),
                _ => AppError::Upstream(message),
            });
        }

        // Frames that fail to decode are skipped, mirroring how partial
        // transfer chunks are tolerated on the wire.
        let events = sse_payload_stream(response.bytes_stream()).filter_map(|item| async move {
            match item {
                Ok(payload) => StreamEvent::decode(&payload).map(Ok),
                Err(e) => Some(Err(AppError::Upstream(e.to_string()))),
            }
        });

        Ok(Box::pin(events))
    }
}
