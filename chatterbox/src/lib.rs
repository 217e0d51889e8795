//! Unified facade over the chatterbox workspace crates.
//!
//! This crate is designed to be the single dependency for most hosts. It re-exports
//! the bot adapter, its transport and observability layers, and a few helpers for
//! wiring a bot up.
//!
//! ```rust
//! use chatterbox::{BotBuildConfig, BotId, GenerationSettings, parse_bot_id};
//!
//! let config = BotBuildConfig::from_token("tok")
//!     .with_base_url("https://chat.example.test")
//!     .with_settings(GenerationSettings::default().with_network(true));
//!
//! assert_eq!(parse_bot_id("julian-gpt"), Some(BotId::JulianGpt));
//! assert!(config.settings.using_network);
//! ```

mod bots;
mod macros;

pub mod prelude;
pub mod util;

pub use cbchat;
pub use cbcommon;
pub use cbobserve;
pub use cbprovider;

pub use cbchat::{
    AdapterState, Bot, BotAdapter, BotAdapterBuilder, ContextStore, ConversationContext,
    EnglishLocalizer, InMemoryContextStore, Localizer, PromptOutcome, PromptSession,
    SerializationGate, StreamEventParser, StreamUpdate, UpdateSink,
};
pub use cbcommon::{BoxFuture, ConversationId, CorrelationToken, MessageId};
pub use cbobserve::{
    FanoutHooks, MetricsObservabilityHooks, SafeBotHooks, TracingObservabilityHooks,
};
pub use cbprovider::{
    AuthProvider, BearerToken, BotError, BotErrorKind, BotId, BotOperation, BotOperationHooks,
    ChatTransport, GenerationSettings, NoopOperationHooks, ReadyState, SecretString,
    ServiceConfig, SharedTokenSource, StaticTokenSource, TokenSource, WireEvent, WireEventStream,
    token_source_fn,
};
#[cfg(feature = "transport-http")]
pub use cbprovider::HttpChatTransport;

pub use bots::{BotBuildConfig, build_bot_with_transport};
#[cfg(feature = "transport-http")]
pub use bots::{build_bot_from_token, build_bot_with_client, build_bot_with_config};
pub use util::{observability_hooks, parse_bot_id};
