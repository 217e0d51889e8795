//! Common imports for most chatterbox hosts.

pub use crate::cb_sink;
pub use crate::{
    AdapterState, Bot, BotAdapter, BotBuildConfig, BotError, BotErrorKind, BotId,
    BotOperationHooks, ContextStore, ConversationContext, CorrelationToken, GenerationSettings,
    InMemoryContextStore, Localizer, PromptOutcome, ServiceConfig, SharedTokenSource,
    StaticTokenSource, StreamUpdate, TokenSource, UpdateSink, build_bot_with_transport,
    observability_hooks, parse_bot_id,
};
#[cfg(feature = "transport-http")]
pub use crate::{build_bot_from_token, build_bot_with_client, build_bot_with_config};
