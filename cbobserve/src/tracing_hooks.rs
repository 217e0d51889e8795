//! Tracing-based observability hooks for bot operations.
//!
//! ```rust
//! use cbobserve::TracingObservabilityHooks;
//! use cbprovider::BotOperationHooks;
//!
//! fn accepts_bot_hooks(_hooks: &dyn BotOperationHooks) {}
//!
//! let hooks = TracingObservabilityHooks;
//! accepts_bot_hooks(&hooks);
//! ```

use std::time::Duration;

use cbprovider::{BotError, BotId, BotOperation, BotOperationHooks};

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObservabilityHooks;

impl BotOperationHooks for TracingObservabilityHooks {
    fn on_operation_start(&self, bot: BotId, operation: BotOperation) {
        tracing::info!(
            phase = "bot",
            event = "operation_start",
            bot = %bot,
            operation = operation.as_str()
        );
    }

    fn on_operation_success(&self, bot: BotId, operation: BotOperation, elapsed: Duration) {
        tracing::info!(
            phase = "bot",
            event = "operation_success",
            bot = %bot,
            operation = operation.as_str(),
            elapsed_ms = elapsed.as_millis() as u64
        );
    }

    fn on_operation_failure(
        &self,
        bot: BotId,
        operation: BotOperation,
        elapsed: Duration,
        error: &BotError,
    ) {
        tracing::error!(
            phase = "bot",
            event = "operation_failure",
            bot = %bot,
            operation = operation.as_str(),
            elapsed_ms = elapsed.as_millis() as u64,
            error_kind = error.kind.as_str(),
            status = error.status,
            error = %error
        );
    }

    fn on_stream_update(&self, bot: BotId, content_len: usize, done: bool) {
        tracing::trace!(
            phase = "stream",
            event = "update",
            bot = %bot,
            content_len,
            done
        );
    }

    fn on_gate_wait(&self, bot: BotId, waited: Duration) {
        if waited.is_zero() {
            return;
        }

        tracing::debug!(
            phase = "gate",
            event = "admitted",
            bot = %bot,
            waited_ms = waited.as_millis() as u64
        );
    }
}
