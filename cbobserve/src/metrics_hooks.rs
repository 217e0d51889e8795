//! Metrics-based observability hooks for bot operations.
//!
//! ```rust
//! use cbobserve::MetricsObservabilityHooks;
//! use cbprovider::BotOperationHooks;
//!
//! fn accepts_bot_hooks(_hooks: &dyn BotOperationHooks) {}
//!
//! let hooks = MetricsObservabilityHooks;
//! accepts_bot_hooks(&hooks);
//! ```

use std::time::Duration;

use cbprovider::{BotError, BotId, BotOperation, BotOperationHooks};

#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsObservabilityHooks;

impl BotOperationHooks for MetricsObservabilityHooks {
    fn on_operation_start(&self, bot: BotId, operation: BotOperation) {
        metrics::counter!(
            "chatterbox_operation_start_total",
            "bot" => bot.to_string(),
            "operation" => operation.as_str()
        )
        .increment(1);
    }

    fn on_operation_success(&self, bot: BotId, operation: BotOperation, elapsed: Duration) {
        metrics::counter!(
            "chatterbox_operation_success_total",
            "bot" => bot.to_string(),
            "operation" => operation.as_str()
        )
        .increment(1);
        metrics::histogram!(
            "chatterbox_operation_duration_seconds",
            "bot" => bot.to_string(),
            "operation" => operation.as_str(),
            "outcome" => "success"
        )
        .record(elapsed.as_secs_f64());
    }

    fn on_operation_failure(
        &self,
        bot: BotId,
        operation: BotOperation,
        elapsed: Duration,
        error: &BotError,
    ) {
        metrics::counter!(
            "chatterbox_operation_failure_total",
            "bot" => bot.to_string(),
            "operation" => operation.as_str(),
            "error_kind" => error.kind.as_str()
        )
        .increment(1);
        metrics::histogram!(
            "chatterbox_operation_duration_seconds",
            "bot" => bot.to_string(),
            "operation" => operation.as_str(),
            "outcome" => "failure"
        )
        .record(elapsed.as_secs_f64());
    }

    fn on_stream_update(&self, bot: BotId, content_len: usize, done: bool) {
        metrics::counter!("chatterbox_stream_updates_total", "bot" => bot.to_string())
            .increment(1);
        if done {
            metrics::histogram!("chatterbox_reply_bytes", "bot" => bot.to_string())
                .record(content_len as f64);
        }
    }

    fn on_gate_wait(&self, bot: BotId, waited: Duration) {
        metrics::histogram!("chatterbox_gate_wait_seconds", "bot" => bot.to_string())
            .record(waited.as_secs_f64());
    }
}
