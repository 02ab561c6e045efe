pub mod book;
pub mod chat;
pub mod profile;

pub use book::{Book, Recommendation};
pub use chat::{
    sse_payload_stream, ChatMessage, ChatRequest, ChatRole, SimplifiedBook,
    SimplifiedRecommendation, SseLineBuffer, StreamEvent, DONE_MARKER,
};
pub use profile::{AgeGroup, Language, ReaderProfile};
