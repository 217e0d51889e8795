use std::sync::Arc;
use std::time::Duration;

use cbprovider::{BotError, BotId, BotOperation, BotOperationHooks};

/// Forwards every callback to each registered hook in registration order.
#[derive(Clone, Default)]
pub struct FanoutHooks {
    hooks: Vec<Arc<dyn BotOperationHooks>>,
}

impl FanoutHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, hooks: Arc<dyn BotOperationHooks>) -> Self {
        self.hooks.push(hooks);
        self
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}

impl BotOperationHooks for FanoutHooks {
    fn on_operation_start(&self, bot: BotId, operation: BotOperation) {
        for hooks in &self.hooks {
            hooks.on_operation_start(bot, operation);
        }
    }

    fn on_operation_success(&self, bot: BotId, operation: BotOperation, elapsed: Duration) {
        for hooks in &self.hooks {
            hooks.on_operation_success(bot, operation, elapsed);
        }
    }

    fn on_operation_failure(
        &self,
        bot: BotId,
        operation: BotOperation,
        elapsed: Duration,
        error: &BotError,
    ) {
        for hooks in &self.hooks {
            hooks.on_operation_failure(bot, operation, elapsed, error);
        }
    }

    fn on_stream_update(&self, bot: BotId, content_len: usize, done: bool) {
        for hooks in &self.hooks {
            hooks.on_stream_update(bot, content_len, done);
        }
    }

    fn on_gate_wait(&self, bot: BotId, waited: Duration) {
        for hooks in &self.hooks {
            hooks.on_gate_wait(bot, waited);
        }
    }
}

impl std::fmt::Debug for FanoutHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FanoutHooks")
            .field("hooks", &self.hooks.len())
            .finish()
    }
}
