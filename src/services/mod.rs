pub mod prompts;
pub mod providers;
pub mod rate_limit;
pub mod recommendations;
pub mod sanitizer;

pub use providers::{ChatProvider, ChatTurn, ChunkStream};
pub use rate_limit::{client_identity, RateLimiter};
