//! A single prompt round trip: request, stream, parse, and context update.

use std::sync::Arc;

use cbcommon::CorrelationToken;
use cbprovider::{
    AuthProvider, BearerToken, BotError, BotId, BotOperationHooks, ChatTransport,
    GenerationSettings, NoopOperationHooks,
};
use futures_util::StreamExt;

use crate::{
    ContextStore, EnglishLocalizer, Localizer, PromptOutcome, PromptRequest, StreamEventParser,
    UpdateSink,
};

#[derive(Clone)]
pub struct PromptSession {
    bot: BotId,
    auth: AuthProvider,
    transport: Arc<dyn ChatTransport>,
    store: Arc<dyn ContextStore>,
    settings: GenerationSettings,
    localizer: Arc<dyn Localizer>,
    hooks: Arc<dyn BotOperationHooks>,
}

impl PromptSession {
    pub fn new(
        auth: AuthProvider,
        transport: Arc<dyn ChatTransport>,
        store: Arc<dyn ContextStore>,
    ) -> Self {
        Self {
            bot: BotId::JulianGpt,
            auth,
            transport,
            store,
            settings: GenerationSettings::default(),
            localizer: Arc::new(EnglishLocalizer),
            hooks: Arc::new(NoopOperationHooks),
        }
    }

    pub fn for_bot(mut self, bot: BotId) -> Self {
        self.bot = bot;
        self
    }

    pub fn with_settings(mut self, settings: GenerationSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_localizer(mut self, localizer: Arc<dyn Localizer>) -> Self {
        self.localizer = localizer;
        self
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn BotOperationHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    /// Sends `prompt` in the stored conversation and streams the reply into `sink`.
    ///
    /// The sink sees every update in wire order, the terminal one exactly once. The stored
    /// context is replaced only after the terminal update was delivered; on failure it is
    /// left untouched.
    pub async fn run(
        &self,
        prompt: &str,
        sink: &dyn UpdateSink,
        correlation: &CorrelationToken,
    ) -> Result<PromptOutcome, BotError> {
        let context = self.store.get().ok_or_else(|| {
            BotError::precondition("no conversation yet; call create_conversation first")
        })?;
        let token = self.auth.require_token()?;

        let request = PromptRequest::new(prompt, context.clone());
        let mut events = self
            .transport
            .open_chat_stream(request.to_wire(&self.settings), BearerToken::new(token))
            .await?;

        let mut parser = StreamEventParser::new(self.localizer.clone());
        let mut updates = 0_usize;

        while let Some(event) = events.next().await {
            let update = match event.and_then(|event| parser.feed(event)) {
                Ok(Some(update)) => update,
                Ok(None) => continue,
                Err(error) => {
                    tracing::warn!(
                        bot = %self.bot,
                        correlation = %correlation,
                        kind = error.kind.as_str(),
                        "prompt stream failed: {}",
                        error.message
                    );
                    return Err(error);
                }
            };

            updates += 1;
            self.hooks
                .on_stream_update(self.bot, update.content.len(), update.done);
            sink.on_update(correlation, &update);

            if update.done {
                let parent = parser
                    .parent_message_id()
                    .cloned()
                    .or_else(|| context.parent_message_id().cloned());
                self.store.replace_parent(parent.clone());

                tracing::debug!(
                    bot = %self.bot,
                    correlation = %correlation,
                    updates,
                    "prompt reply completed"
                );

                return Ok(PromptOutcome {
                    reply: update.content,
                    parent_message_id: parent,
                    updates,
                });
            }
        }

        Err(BotError::stream_transport(
            "The connection to the chat service ended before the reply completed.",
        ))
    }
}

impl std::fmt::Debug for PromptSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromptSession")
            .field("bot", &self.bot)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use cbcommon::{ConversationId, MessageId};
    use cbprovider::{BotErrorKind, ReadyState, StaticTokenSource, WireEvent};

    use super::*;
    use crate::testing::ScriptedTransport;
    use crate::{ConversationContext, InMemoryContextStore, StreamUpdate};

    fn session(transport: Arc<ScriptedTransport>, store: Arc<InMemoryContextStore>) -> PromptSession {
        let auth = AuthProvider::new(Arc::new(StaticTokenSource::new("tok")), transport.clone());
        PromptSession::new(auth, transport, store)
    }

    fn ready_store(parent: Option<&str>) -> Arc<InMemoryContextStore> {
        let context = ConversationContext::new(ConversationId::new("12"))
            .with_parent(parent.map(MessageId::new));
        Arc::new(InMemoryContextStore::with_context(context))
    }

    #[tokio::test]
    async fn snapshot_reply_updates_parent_after_callback() {
        let transport = Arc::new(ScriptedTransport::default());
        transport.push_stream(vec![
            Ok(WireEvent::ReadyState(ReadyState::Open)),
            Ok(WireEvent::Chunk(
                "{\"id\":\"m1\",\"text\":\"hel\"}\n{\"id\":\"m1\",\"text\":\"hello\"}".to_string(),
            )),
            Ok(WireEvent::ReadyState(ReadyState::Closed)),
        ]);
        let store = ready_store(None);
        let session = session(transport.clone(), store.clone());

        let seen = Mutex::new(Vec::new());
        let sink = |token: &CorrelationToken, update: &StreamUpdate| {
            let parent = store.get().and_then(|context| context.parent_message_id().cloned());
            seen.lock()
                .expect("seen lock")
                .push((token.to_string(), update.clone(), parent));
        };

        let outcome = session
            .run("hi", &sink, &CorrelationToken::new("tab-1"))
            .await
            .expect("prompt should complete");

        assert_eq!(outcome.reply, "\nhello");
        assert_eq!(outcome.parent_message_id, Some(MessageId::new("m1")));
        assert_eq!(
            *seen.lock().expect("seen lock"),
            vec![(
                "tab-1".to_string(),
                StreamUpdate::terminal("\nhello"),
                None
            )]
        );
        assert_eq!(
            store.get().and_then(|context| context.parent_message_id().cloned()),
            Some(MessageId::new("m1"))
        );

        let request = transport.last_chat_request().expect("request recorded");
        assert_eq!(request.prompt, "hi");
        assert_eq!(request.options.parent_message_id, None);
    }

    #[tokio::test]
    async fn completion_reply_keeps_previous_parent() {
        let transport = Arc::new(ScriptedTransport::default());
        transport.push_stream(vec![
            Ok(WireEvent::Completion("{\"completion\":\"He\"}".to_string())),
            Ok(WireEvent::Completion("{\"completion\":\"llo\"}".to_string())),
            Ok(WireEvent::ReadyState(ReadyState::Closed)),
        ]);
        let store = ready_store(Some("m0"));
        let session = session(transport.clone(), store.clone());

        let outcome = session
            .run("hi", &|_: &CorrelationToken, _: &StreamUpdate| {}, &CorrelationToken::new("c"))
            .await
            .expect("prompt should complete");

        assert_eq!(outcome.reply, "Hello");
        assert_eq!(outcome.updates, 3);
        assert_eq!(outcome.parent_message_id, Some(MessageId::new("m0")));
        let request = transport.last_chat_request().expect("request recorded");
        assert_eq!(request.options.parent_message_id.as_deref(), Some("m0"));
    }

    #[tokio::test]
    async fn missing_context_fails_before_network() {
        let transport = Arc::new(ScriptedTransport::default());
        let session = session(transport.clone(), Arc::new(InMemoryContextStore::new()));

        let err = session
            .run("hi", &|_: &CorrelationToken, _: &StreamUpdate| {}, &CorrelationToken::new("c"))
            .await
            .expect_err("no context must fail");

        assert_eq!(err.kind, BotErrorKind::Precondition);
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn mid_stream_failure_leaves_context_untouched() {
        let transport = Arc::new(ScriptedTransport::default());
        transport.push_stream(vec![
            Ok(WireEvent::Message("{\"event\":\"cmpl\",\"text\":\"par\"}".to_string())),
            Err(BotError::stream_transport("reset by peer")),
        ]);
        let store = ready_store(Some("m0"));
        let session = session(transport, store.clone());

        let done_count = Mutex::new(0_u32);
        let sink = |_: &CorrelationToken, update: &StreamUpdate| {
            if update.done {
                *done_count.lock().expect("count lock") += 1;
            }
        };

        let err = session
            .run("hi", &sink, &CorrelationToken::new("c"))
            .await
            .expect_err("reset must fail");

        assert_eq!(err.kind, BotErrorKind::StreamTransport);
        assert_eq!(*done_count.lock().expect("count lock"), 0);
        assert_eq!(
            store.get().and_then(|context| context.parent_message_id().cloned()),
            Some(MessageId::new("m0"))
        );
    }

    #[tokio::test]
    async fn stream_ending_without_terminal_is_transport_error() {
        let transport = Arc::new(ScriptedTransport::default());
        transport.push_stream(vec![Ok(WireEvent::Message(
            "{\"event\":\"cmpl\",\"text\":\"par\"}".to_string(),
        ))]);
        let session = session(transport, ready_store(None));

        let err = session
            .run("hi", &|_: &CorrelationToken, _: &StreamUpdate| {}, &CorrelationToken::new("c"))
            .await
            .expect_err("truncated stream must fail");

        assert_eq!(err.kind, BotErrorKind::StreamTransport);
    }
}
