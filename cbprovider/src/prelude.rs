//! Common `cbprovider` imports for downstream crates.

pub use crate::{
    AuthProvider, BearerToken, BotError, BotErrorKind, BotId, BotOperation, BotOperationHooks,
    ChatTransport, GenerationSettings, NoopOperationHooks, ReadyState, SecretString,
    ServiceConfig, SharedTokenSource, StaticTokenSource, TokenSource, WireEvent, WireEventStream,
    observe_operation,
};
pub use cbcommon::{BoxFuture, ConversationId, CorrelationToken, MessageId};
