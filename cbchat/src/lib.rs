//! Conversation state, reply stream parsing, and serialized prompting for bot adapters.
//!
//! ```rust
//! use cbchat::{ContextStore, ConversationContext, InMemoryContextStore};
//! use cbcommon::{ConversationId, MessageId};
//!
//! let store = InMemoryContextStore::new();
//! let context = ConversationContext::new(ConversationId::new("12"));
//! store.set(context.with_parent(Some(MessageId::new("m1"))));
//!
//! let stored = store.get().unwrap();
//! assert_eq!(stored.conversation_id().as_str(), "12");
//! assert_eq!(stored.parent_message_id().unwrap().as_str(), "m1");
//! ```

mod adapter;
mod bot;
mod context;
mod gate;
mod locale;
mod parser;
mod session;
#[cfg(test)]
mod testing;
mod types;

pub mod prelude {
    pub use crate::{
        AdapterState, Bot, BotAdapter, BotAdapterBuilder, ContextStore, ConversationContext,
        EnglishLocalizer, InMemoryContextStore, Localizer, PromptOutcome, PromptSession,
        StreamUpdate, UpdateSink,
    };
    pub use cbcommon::{ConversationId, CorrelationToken, MessageId};
}

pub use adapter::{AdapterState, BotAdapter, BotAdapterBuilder};
pub use bot::Bot;
pub use context::{ContextStore, ConversationContext, InMemoryContextStore};
pub use gate::{GatePermit, SerializationGate};
pub use locale::{EnglishLocalizer, Localizer};
pub use parser::{ReplyBuffer, StreamEncoding, StreamEventParser};
pub use session::PromptSession;
pub use types::{PromptOutcome, PromptRequest, StreamUpdate, UpdateSink};
