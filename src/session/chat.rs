use std::sync::Arc;

use futures::StreamExt;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::models::{
    ChatMessage, ChatRequest, ChatRole, ReaderProfile, Recommendation, SimplifiedRecommendation,
    StreamEvent,
};
use crate::session::client::RelayClient;
use crate::session::store::{self, SessionStore, CHAT_STORAGE_KEY};

/// Persisted transcript blob
#[derive(Debug, Default, Serialize, Deserialize)]
struct TranscriptBlob {
    #[serde(default)]
    messages: Vec<ChatMessage>,
}

/// Client-side chat state
///
/// Owns the transcript, drives the relay, and appends streamed segments to
/// the in-progress assistant message. A failed turn is rolled back entirely
/// (both the user message and any partial assistant message) so a retry
/// resubmits a clean history.
pub struct ChatSession {
    profile: ReaderProfile,
    recommendations: Vec<SimplifiedRecommendation>,
    messages: Vec<ChatMessage>,
    relay: Arc<dyn RelayClient>,
    store: Arc<dyn SessionStore>,
    in_flight: bool,
    error: Option<String>,
}

impl ChatSession {
    /// Restores the transcript from the store and binds the session to a
    /// frozen profile and its recommendations
    pub fn load(
        relay: Arc<dyn RelayClient>,
        store: Arc<dyn SessionStore>,
        profile: ReaderProfile,
        recommendations: &[Recommendation],
    ) -> Self {
        let blob: TranscriptBlob =
            store::load_json(store.as_ref(), CHAT_STORAGE_KEY).unwrap_or_default();
        Self {
            profile,
            recommendations: recommendations
                .iter()
                .map(SimplifiedRecommendation::from)
                .collect(),
            messages: blob.messages,
            relay,
            store,
            in_flight: false,
            error: None,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_sending(&self) -> bool {
        self.in_flight
    }

    /// The last turn's user-visible error, if any
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Sends a message and streams the reply into the transcript
    ///
    /// A blank message, or a call while another send is in flight, is a
    /// no-op (new attempts are ignored, not queued).
    pub async fn send(&mut self, content: &str) -> AppResult<()> {
        let content = content.trim().to_string();
        if content.is_empty() || self.in_flight {
            return Ok(());
        }

        self.in_flight = true;
        self.error = None;
        let result = self.run_turn(&content).await;
        self.in_flight = false;

        if let Err(e) = &result {
            self.error = Some(e.to_string());
        }
        result
    }

    async fn run_turn(&mut self, content: &str) -> AppResult<()> {
        // The wire history is the transcript before this turn.
        let history = self.messages.clone();

        let user_message = ChatMessage::new(ChatRole::User, content);
        let user_id = user_message.id.clone();
        self.messages.push(user_message);
        self.persist();

        let request = ChatRequest {
            message: content.to_string(),
            wizard_data: self.profile.clone(),
            recommendations: self.recommendations.clone(),
            conversation_history: history,
        };

        let mut events = match self.relay.send_message(&request).await {
            Ok(events) => events,
            Err(e) => {
                self.rollback(&user_id, None);
                return Err(e);
            }
        };

        let assistant_message = ChatMessage::new(ChatRole::Assistant, "");
        let assistant_id = assistant_message.id.clone();
        self.messages.push(assistant_message);
        self.persist();

        let mut completed = false;
        let mut failure: Option<AppError> = None;

        while let Some(event) = events.next().await {
            match event {
                Ok(StreamEvent::Chunk { text }) => {
                    if let Some(message) =
                        self.messages.iter_mut().find(|m| m.id == assistant_id)
                    {
                        message.content.push_str(&text);
                    }
                    self.persist();
                }
                Ok(StreamEvent::Done) => {
                    completed = true;
                    break;
                }
                Ok(StreamEvent::Error { error, .. }) => {
                    failure = Some(AppError::Upstream(error));
                    break;
                }
                Err(e) => {
                    failure = Some(e);
                    break;
                }
            }
        }

        // A connection that ends without the done sentinel terminated
        // abnormally, even if content already arrived.
        if failure.is_none() && !completed {
            failure = Some(AppError::Upstream(
                "Connection closed before the response completed".to_string(),
            ));
        }

        if failure.is_none() {
            let empty = self
                .messages
                .iter()
                .find(|m| m.id == assistant_id)
                .map(|m| m.content.trim().is_empty())
                .unwrap_or(true);
            if empty {
                failure = Some(AppError::Upstream("AI response was empty".to_string()));
            }
        }

        if let Some(e) = failure {
            self.rollback(&user_id, Some(&assistant_id));
            return Err(e);
        }

        self.persist();
        Ok(())
    }

    /// Re-sends the most recent user message
    ///
    /// Assistant output produced after that message is discarded first.
    pub async fn retry_last(&mut self) -> AppResult<()> {
        if self.in_flight {
            return Ok(());
        }
        let Some(index) = self
            .messages
            .iter()
            .rposition(|m| m.role == ChatRole::User)
        else {
            return Ok(());
        };

        let content = self.messages[index].content.clone();
        // Drop the message and everything after it; send re-appends it.
        self.messages.truncate(index);
        self.persist();

        self.send(&content).await
    }

    /// Clears the transcript and its stored blob
    pub fn clear(&mut self) {
        self.messages.clear();
        self.error = None;
        self.store.remove(CHAT_STORAGE_KEY);
    }

    fn rollback(&mut self, user_id: &str, assistant_id: Option<&str>) {
        self.messages
            .retain(|m| m.id != user_id && Some(m.id.as_str()) != assistant_id);
        self.persist();
    }

    fn persist(&self) {
        let blob = TranscriptBlob {
            messages: self.messages.clone(),
        };
        if let Err(e) = store::save_json(self.store.as_ref(), CHAT_STORAGE_KEY, &blob) {
            tracing::warn!(error = %e, "failed to persist chat transcript");
        }
    }
}
