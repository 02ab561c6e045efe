pub mod chat;
pub mod client;
pub mod store;
pub mod wizard;

pub use chat::ChatSession;
pub use client::{EventStream, HttpRelayClient, RelayClient};
pub use store::{
    FileSessionStore, MemorySessionStore, SessionStore, CHAT_STORAGE_KEY, WIZARD_STORAGE_KEY,
};
pub use wizard::{DraftProfile, Step, WizardSession, STEPS};
