//! Conversation context and the store that holds it between prompts.

use std::sync::{Mutex, PoisonError};

use cbcommon::{ConversationId, MessageId};

/// Remote conversation handle plus the id the next prompt should reply to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationContext {
    conversation_id: ConversationId,
    parent_message_id: Option<MessageId>,
}

impl ConversationContext {
    pub fn new(conversation_id: ConversationId) -> Self {
        Self {
            conversation_id,
            parent_message_id: None,
        }
    }

    pub fn conversation_id(&self) -> &ConversationId {
        &self.conversation_id
    }

    pub fn parent_message_id(&self) -> Option<&MessageId> {
        self.parent_message_id.as_ref()
    }

    /// Same conversation, new parent. The conversation id never changes after creation.
    pub fn with_parent(&self, parent_message_id: Option<MessageId>) -> Self {
        Self {
            conversation_id: self.conversation_id.clone(),
            parent_message_id,
        }
    }
}

pub trait ContextStore: Send + Sync {
    fn get(&self) -> Option<ConversationContext>;

    fn set(&self, context: ConversationContext);

    fn clear(&self);

    /// Swaps the parent id of the stored context, keeping its conversation id.
    fn replace_parent(&self, parent_message_id: Option<MessageId>) -> Option<ConversationContext> {
        let next = self.get()?.with_parent(parent_message_id);
        self.set(next.clone());
        Some(next)
    }
}

#[derive(Debug, Default)]
pub struct InMemoryContextStore {
    slot: Mutex<Option<ConversationContext>>,
}

impl InMemoryContextStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_context(context: ConversationContext) -> Self {
        Self {
            slot: Mutex::new(Some(context)),
        }
    }
}

impl ContextStore for InMemoryContextStore {
    fn get(&self) -> Option<ConversationContext> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set(&self, context: ConversationContext) {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(context);
    }

    fn clear(&self) {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner).take();
    }
}
