//! Object-safe contract the host uses to drive any bot backend.

use cbcommon::{BoxFuture, CorrelationToken};
use cbprovider::{BotError, BotId};

use crate::{AdapterState, ConversationContext, PromptOutcome, UpdateSink};

pub trait Bot: Send + Sync {
    fn id(&self) -> BotId;

    fn state(&self) -> AdapterState;

    /// Never fails; an unusable or missing token reports `false`.
    fn check_availability<'a>(&'a self) -> BoxFuture<'a, bool>;

    fn create_conversation<'a>(&'a self) -> BoxFuture<'a, Result<ConversationContext, BotError>>;

    fn send_prompt<'a>(
        &'a self,
        prompt: &'a str,
        on_update: &'a dyn UpdateSink,
        correlation: CorrelationToken,
    ) -> BoxFuture<'a, Result<PromptOutcome, BotError>>;
}
