//! Operational hook contracts and single-attempt operation timing.

use std::future::Future;
use std::time::{Duration, Instant};

use crate::{BotError, BotId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BotOperation {
    CheckAvailability,
    CreateConversation,
    SendPrompt,
}

impl BotOperation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CheckAvailability => "check_availability",
            Self::CreateConversation => "create_conversation",
            Self::SendPrompt => "send_prompt",
        }
    }
}

pub trait BotOperationHooks: Send + Sync {
    fn on_operation_start(&self, _bot: BotId, _operation: BotOperation) {}

    fn on_operation_success(&self, _bot: BotId, _operation: BotOperation, _elapsed: Duration) {}

    fn on_operation_failure(
        &self,
        _bot: BotId,
        _operation: BotOperation,
        _elapsed: Duration,
        _error: &BotError,
    ) {
    }

    /// Called for every update handed to the caller; `content_len` is in bytes.
    fn on_stream_update(&self, _bot: BotId, _content_len: usize, _done: bool) {}

    /// Time a prompt spent queued behind another prompt on the same adapter.
    fn on_gate_wait(&self, _bot: BotId, _waited: Duration) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopOperationHooks;

impl BotOperationHooks for NoopOperationHooks {}

/// Runs one attempt of `operation`, reporting start and outcome to `hooks`. Never retries.
pub async fn observe_operation<T, OpFuture>(
    bot: BotId,
    operation: BotOperation,
    hooks: &dyn BotOperationHooks,
    execute: OpFuture,
) -> Result<T, BotError>
where
    OpFuture: Future<Output = Result<T, BotError>>,
{
    hooks.on_operation_start(bot, operation);
    let started = Instant::now();

    match execute.await {
        Ok(value) => {
            hooks.on_operation_success(bot, operation, started.elapsed());
            Ok(value)
        }
        Err(error) => {
            hooks.on_operation_failure(bot, operation, started.elapsed(), &error);
            Err(error)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::BotErrorKind;

    #[derive(Default)]
    struct RecordingHooks {
        events: Mutex<Vec<String>>,
    }

    impl BotOperationHooks for RecordingHooks {
        fn on_operation_start(&self, bot: BotId, operation: BotOperation) {
            self.events
                .lock()
                .expect("events lock")
                .push(format!("start:{bot}:{}", operation.as_str()));
        }

        fn on_operation_success(&self, bot: BotId, operation: BotOperation, _elapsed: Duration) {
            self.events
                .lock()
                .expect("events lock")
                .push(format!("success:{bot}:{}", operation.as_str()));
        }

        fn on_operation_failure(
            &self,
            bot: BotId,
            operation: BotOperation,
            _elapsed: Duration,
            error: &BotError,
        ) {
            self.events.lock().expect("events lock").push(format!(
                "failure:{bot}:{}:{}",
                operation.as_str(),
                error.kind.as_str()
            ));
        }
    }

    #[tokio::test]
    async fn observe_operation_reports_success() {
        let hooks = RecordingHooks::default();
        let value = observe_operation(
            BotId::JulianGpt,
            BotOperation::CreateConversation,
            &hooks,
            async { Ok::<_, BotError>(7) },
        )
        .await
        .expect("operation should succeed");

        assert_eq!(value, 7);
        let events = hooks.events.lock().expect("events lock").clone();
        assert_eq!(
            events,
            vec![
                "start:julian-gpt:create_conversation".to_string(),
                "success:julian-gpt:create_conversation".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn observe_operation_reports_failure_once_without_retrying() {
        let hooks = RecordingHooks::default();
        let attempts = Mutex::new(0_u32);

        let result = observe_operation::<(), _>(
            BotId::JulianGpt,
            BotOperation::SendPrompt,
            &hooks,
            async {
                *attempts.lock().expect("attempts lock") += 1;
                Err(BotError::stream_transport("reset"))
            },
        )
        .await;

        assert_eq!(
            result.expect_err("must fail").kind,
            BotErrorKind::StreamTransport
        );
        assert_eq!(*attempts.lock().expect("attempts lock"), 1);
        let events = hooks.events.lock().expect("events lock").clone();
        assert_eq!(
            events.last().map(String::as_str),
            Some("failure:julian-gpt:send_prompt:stream_transport")
        );
    }
}
