//! Prompt requests, streamed updates, and the caller-facing update sink.

use cbcommon::{CorrelationToken, MessageId};
use cbprovider::{ChatProcessRequest, GenerationSettings};

use crate::ConversationContext;

/// Full text to show so far; every update replaces the previous one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamUpdate {
    pub content: String,
    pub done: bool,
}

impl StreamUpdate {
    pub fn progress(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            done: false,
        }
    }

    pub fn terminal(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            done: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptRequest {
    pub text: String,
    pub context: ConversationContext,
}

impl PromptRequest {
    pub fn new(text: impl Into<String>, context: ConversationContext) -> Self {
        Self {
            text: text.into(),
            context,
        }
    }

    pub fn to_wire(&self, settings: &GenerationSettings) -> ChatProcessRequest {
        ChatProcessRequest::new(
            self.context.conversation_id(),
            self.context.parent_message_id(),
            self.text.clone(),
            settings,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptOutcome {
    pub reply: String,
    pub parent_message_id: Option<MessageId>,
    pub updates: usize,
}

/// Receives every update of one prompt, tagged with the caller's correlation token.
pub trait UpdateSink: Send + Sync {
    fn on_update(&self, correlation: &CorrelationToken, update: &StreamUpdate);
}

impl<F> UpdateSink for F
where
    F: Fn(&CorrelationToken, &StreamUpdate) + Send + Sync,
{
    fn on_update(&self, correlation: &CorrelationToken, update: &StreamUpdate) {
        self(correlation, update)
    }
}
