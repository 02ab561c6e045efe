use std::convert::Infallible;

use axum::{
    body::Body,
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderMap, StatusCode},
    response::Response,
    Json,
};
use bytes::Bytes;
use futures::StreamExt;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::models::{AgeGroup, ChatRequest, Language, ReaderProfile, Recommendation, StreamEvent};
use crate::services::{
    client_identity, prompts,
    recommendations::{self, DEFAULT_LIMIT},
    sanitizer::{self, MAX_MESSAGE_LENGTH},
    ChatTurn, ChunkStream,
};

use super::AppState;

/// Trailing conversation window attached to each upstream call; older turns
/// are silently dropped.
const HISTORY_WINDOW: usize = 20;

// Request types

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationRequest {
    #[serde(default)]
    pub name: Option<String>,
    pub age_group: AgeGroup,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    pub language: Language,
    #[serde(default)]
    pub limit: Option<usize>,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// Scores the catalog against a reader profile
pub async fn recommend(
    State(state): State<AppState>,
    Json(request): Json<RecommendationRequest>,
) -> Json<Vec<Recommendation>> {
    let profile = ReaderProfile {
        name: request.name.unwrap_or_default(),
        age_group: request.age_group,
        interests: request.interests,
        genres: request.genres,
        language: request.language,
    };
    let limit = request.limit.unwrap_or(DEFAULT_LIMIT);

    let results = recommendations::recommend(&profile, &state.catalog, limit);

    tracing::info!(
        age_group = %profile.age_group,
        language = %profile.language,
        count = results.len(),
        "recommendations served"
    );

    Json(results)
}

/// The streaming chat relay
///
/// Pipeline: validate, rate-limit, sanitize, compose, then forward the
/// upstream stream 1:1 as server-sent events. All pre-stream failures return
/// plain JSON errors; once the stream is open, failures can only be reported
/// in-band.
pub async fn chat(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> AppResult<Response> {
    // A missing credential fails the request before any work happens.
    if !state.provider.is_configured() {
        tracing::error!(provider = state.provider.name(), "chat provider is not configured");
        return Err(AppError::Configuration);
    }

    let Json(request) =
        payload.map_err(|e| AppError::Validation(format!("Invalid request body: {}", e)))?;

    if request.message.trim().is_empty() {
        return Err(AppError::Validation("Message is required".to_string()));
    }
    if request.message.chars().count() > MAX_MESSAGE_LENGTH {
        return Err(AppError::Validation(format!(
            "Message is too long. Maximum {} characters.",
            MAX_MESSAGE_LENGTH
        )));
    }

    let identity = client_identity(&headers);
    if !state.limiter.admit(&identity).await {
        return Err(AppError::RateLimited);
    }

    let sanitized = sanitizer::sanitize(&request.message);
    if sanitized.is_empty() {
        return Err(AppError::InvalidMessage);
    }

    let system_prompt = prompts::build_system_prompt(&request.wizard_data, &request.recommendations);
    let acknowledgment =
        prompts::acknowledgment(&request.wizard_data, request.recommendations.len());

    // Only the trailing window of the transcript reaches the model.
    let history_start = request.conversation_history.len().saturating_sub(HISTORY_WINDOW);
    let history = request.conversation_history[history_start..].to_vec();

    tracing::info!(
        identity = %identity,
        history = history.len(),
        recommendations = request.recommendations.len(),
        "opening chat stream"
    );

    let upstream = state
        .provider
        .stream_chat(ChatTurn {
            system_prompt,
            acknowledgment,
            history,
            message: sanitized,
        })
        .await?;

    stream_response(upstream)
}

/// Wraps an upstream chunk sequence as a server-sent-event response
///
/// Each non-empty segment becomes exactly one frame, in arrival order. Clean
/// completion appends the done sentinel; a mid-stream failure emits one error
/// frame and ends the body without it. Dropping the response body (client
/// disconnect) makes the forwarding task's send fail, which abandons the
/// upstream read.
fn stream_response(mut upstream: ChunkStream) -> AppResult<Response> {
    let (tx, rx) = futures::channel::mpsc::unbounded::<Bytes>();

    tokio::spawn(async move {
        while let Some(item) = upstream.next().await {
            match item {
                Ok(text) => {
                    if text.is_empty() {
                        continue;
                    }
                    let frame = StreamEvent::chunk(text).encode();
                    if tx.unbounded_send(Bytes::from(frame)).is_err() {
                        tracing::debug!("client disconnected, abandoning upstream stream");
                        return;
                    }
                }
                Err(e) => {
                    tracing::error!(error = %e, "upstream stream failed");
                    let details = cfg!(debug_assertions).then(|| e.to_string());
                    let frame = StreamEvent::error("Stream interrupted", details).encode();
                    let _ = tx.unbounded_send(Bytes::from(frame));
                    return;
                }
            }
        }
        let _ = tx.unbounded_send(Bytes::from(StreamEvent::Done.encode()));
    });

    let body = Body::from_stream(rx.map(Ok::<_, Infallible>));

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/event-stream")
        .header(header::CACHE_CONTROL, "no-cache, no-transform")
        .header(header::CONNECTION, "keep-alive")
        .header("x-accel-buffering", "no")
        .body(body)
        .map_err(|e| AppError::Internal(e.to_string()))
}
