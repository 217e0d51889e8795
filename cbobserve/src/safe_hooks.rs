use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::Duration;

use cbprovider::{BotError, BotId, BotOperation, BotOperationHooks};

/// Swallows panics from the wrapped hooks so observers can never break an operation.
pub struct SafeBotHooks<H> {
    inner: H,
}

impl<H> SafeBotHooks<H> {
    pub fn new(inner: H) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> H {
        self.inner
    }
}

impl<H> BotOperationHooks for SafeBotHooks<H>
where
    H: BotOperationHooks,
{
    fn on_operation_start(&self, bot: BotId, operation: BotOperation) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_operation_start(bot, operation)
        }));
    }

    fn on_operation_success(&self, bot: BotId, operation: BotOperation, elapsed: Duration) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_operation_success(bot, operation, elapsed)
        }));
    }

    fn on_operation_failure(
        &self,
        bot: BotId,
        operation: BotOperation,
        elapsed: Duration,
        error: &BotError,
    ) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner
                .on_operation_failure(bot, operation, elapsed, error)
        }));
    }

    fn on_stream_update(&self, bot: BotId, content_len: usize, done: bool) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_stream_update(bot, content_len, done)
        }));
    }

    fn on_gate_wait(&self, bot: BotId, waited: Duration) {
        let _ = catch_unwind(AssertUnwindSafe(|| self.inner.on_gate_wait(bot, waited)));
    }
}
