//! Bot adapter: availability, conversation lifecycle, and serialized prompting.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use cbcommon::{BoxFuture, CorrelationToken};
use cbprovider::{
    AuthProvider, BearerToken, BotError, BotId, BotOperation, BotOperationHooks, ChatTransport,
    GenerationSettings, GroupCreateRequest, NoopOperationHooks, TokenSource, observe_operation,
};

use crate::{
    Bot, ContextStore, ConversationContext, EnglishLocalizer, InMemoryContextStore, Localizer,
    PromptOutcome, PromptSession, SerializationGate, UpdateSink,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdapterState {
    Unconfigured,
    Available,
    Unavailable,
    ConversationReady,
    Streaming,
}

impl AdapterState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unconfigured => "unconfigured",
            Self::Available => "available",
            Self::Unavailable => "unavailable",
            Self::ConversationReady => "conversation_ready",
            Self::Streaming => "streaming",
        }
    }
}

pub struct BotAdapter {
    id: BotId,
    auth: AuthProvider,
    transport: Arc<dyn ChatTransport>,
    store: Arc<dyn ContextStore>,
    settings: GenerationSettings,
    localizer: Arc<dyn Localizer>,
    hooks: Arc<dyn BotOperationHooks>,
    gate: SerializationGate,
    state: Mutex<AdapterState>,
    /// Set when availability fails while a prompt streams; applied once the prompt ends.
    revoked: AtomicBool,
}

impl BotAdapter {
    pub fn builder(
        tokens: Arc<dyn TokenSource>,
        transport: Arc<dyn ChatTransport>,
    ) -> BotAdapterBuilder {
        BotAdapterBuilder::new(tokens, transport)
    }

    pub fn id(&self) -> BotId {
        self.id
    }

    pub fn state(&self) -> AdapterState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn context(&self) -> Option<ConversationContext> {
        self.store.get()
    }

    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    /// Prompts currently waiting behind an in-flight operation.
    pub fn queued_prompts(&self) -> usize {
        self.gate.queued()
    }

    /// Verifies the configured token. Leaves an existing conversation usable on success.
    pub async fn check_availability(&self) -> bool {
        let outcome = observe_operation(
            self.id,
            BotOperation::CheckAvailability,
            self.hooks.as_ref(),
            async {
                let token = self.auth.require_token()?;
                self.auth.verify(token).await
            },
        )
        .await;

        let has_context = self.store.get().is_some();
        self.update_state(|current| match (current, &outcome) {
            (AdapterState::Streaming, result) => {
                self.revoked.store(result.is_err(), Ordering::Release);
                AdapterState::Streaming
            }
            (_, Err(_)) => AdapterState::Unavailable,
            (_, Ok(())) if has_context => AdapterState::ConversationReady,
            (_, Ok(())) => AdapterState::Available,
        });

        match &outcome {
            Err(error) if error.is_missing_credential() => {
                tracing::info!(bot = %self.id, "bot unavailable: no token configured");
            }
            Err(error) => tracing::info!(bot = %self.id, "bot unavailable: {}", error.message),
            Ok(()) => {}
        }

        outcome.is_ok()
    }

    /// Creates a fresh remote conversation, replacing any existing context on success.
    pub async fn create_conversation(&self) -> Result<ConversationContext, BotError> {
        observe_operation(
            self.id,
            BotOperation::CreateConversation,
            self.hooks.as_ref(),
            async {
                let _permit = self.gate.acquire().await;

                let previous = self.state();
                if !matches!(
                    previous,
                    AdapterState::Available | AdapterState::ConversationReady
                ) {
                    return Err(BotError::precondition(format!(
                        "bot is {}; check availability before creating a conversation",
                        previous.as_str()
                    )));
                }

                match self.request_conversation().await {
                    Ok(context) => {
                        self.store.set(context.clone());
                        self.set_state(AdapterState::ConversationReady);
                        tracing::debug!(
                            bot = %self.id,
                            conversation = %context.conversation_id(),
                            "conversation created"
                        );
                        Ok(context)
                    }
                    Err(error) if error.is_authentication() => {
                        self.set_state(AdapterState::Unavailable);
                        Err(error)
                    }
                    Err(error) => {
                        self.set_state(previous);
                        Err(error)
                    }
                }
            },
        )
        .await
    }

    /// Sends one prompt; concurrent calls run strictly one after another in call order.
    pub async fn send_prompt(
        &self,
        prompt: &str,
        on_update: &dyn UpdateSink,
        correlation: CorrelationToken,
    ) -> Result<PromptOutcome, BotError> {
        observe_operation(
            self.id,
            BotOperation::SendPrompt,
            self.hooks.as_ref(),
            async {
                let permit = self.gate.acquire().await;
                self.hooks.on_gate_wait(self.id, permit.waited());

                if self.store.get().is_none() {
                    return Err(BotError::precondition(
                        "no conversation yet; call create_conversation first",
                    ));
                }
                let current = self.state();
                if current != AdapterState::ConversationReady {
                    return Err(BotError::precondition(format!(
                        "bot is {}; cannot send a prompt",
                        current.as_str()
                    )));
                }

                let mut restore =
                    StateRestore::enter(&self.state, &self.revoked, AdapterState::Streaming);
                let result = self.session().run(prompt, on_update, &correlation).await;
                if matches!(&result, Err(error) if error.is_authentication()) {
                    restore.on_exit = AdapterState::Unavailable;
                }

                result
            },
        )
        .await
    }

    fn session(&self) -> PromptSession {
        PromptSession::new(self.auth.clone(), self.transport.clone(), self.store.clone())
            .for_bot(self.id)
            .with_settings(self.settings.clone())
            .with_localizer(self.localizer.clone())
            .with_hooks(self.hooks.clone())
    }

    async fn request_conversation(&self) -> Result<ConversationContext, BotError> {
        let token = self.auth.require_token()?;
        let response = self
            .transport
            .create_group(GroupCreateRequest::new(&self.settings), BearerToken::new(token))
            .await
            .map_err(|error| {
                if error.is_authentication() {
                    error
                } else {
                    BotError::conversation_creation("could not create a conversation")
                        .with_source(error)
                }
            })?;

        response.conversation_id().map(ConversationContext::new)
    }

    fn set_state(&self, next: AdapterState) {
        self.update_state(|_| next);
    }

    fn update_state(&self, transition: impl FnOnce(AdapterState) -> AdapterState) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        *state = transition(*state);
    }
}

impl Bot for BotAdapter {
    fn id(&self) -> BotId {
        self.id
    }

    fn state(&self) -> AdapterState {
        BotAdapter::state(self)
    }

    fn check_availability<'a>(&'a self) -> BoxFuture<'a, bool> {
        Box::pin(BotAdapter::check_availability(self))
    }

    fn create_conversation<'a>(&'a self) -> BoxFuture<'a, Result<ConversationContext, BotError>> {
        Box::pin(BotAdapter::create_conversation(self))
    }

    fn send_prompt<'a>(
        &'a self,
        prompt: &'a str,
        on_update: &'a dyn UpdateSink,
        correlation: CorrelationToken,
    ) -> BoxFuture<'a, Result<PromptOutcome, BotError>> {
        Box::pin(BotAdapter::send_prompt(self, prompt, on_update, correlation))
    }
}

impl std::fmt::Debug for BotAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotAdapter")
            .field("id", &self.id)
            .field("state", &self.state())
            .field("settings", &self.settings)
            .field("gate", &self.gate)
            .finish_non_exhaustive()
    }
}

/// Puts the adapter into a transient state and restores `on_exit` when dropped,
/// so a cancelled prompt does not leave the adapter stuck in `Streaming`.
/// A revocation recorded meanwhile wins over `on_exit`.
struct StateRestore<'a> {
    state: &'a Mutex<AdapterState>,
    revoked: &'a AtomicBool,
    on_exit: AdapterState,
}

impl<'a> StateRestore<'a> {
    fn enter(
        state: &'a Mutex<AdapterState>,
        revoked: &'a AtomicBool,
        transient: AdapterState,
    ) -> Self {
        let mut current = state.lock().unwrap_or_else(PoisonError::into_inner);
        let on_exit = *current;
        *current = transient;
        revoked.store(false, Ordering::Release);

        Self {
            state,
            revoked,
            on_exit,
        }
    }
}

impl Drop for StateRestore<'_> {
    fn drop(&mut self) {
        let next = if self.revoked.swap(false, Ordering::AcqRel) {
            AdapterState::Unavailable
        } else {
            self.on_exit
        };
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = next;
    }
}

pub struct BotAdapterBuilder {
    id: BotId,
    tokens: Arc<dyn TokenSource>,
    transport: Arc<dyn ChatTransport>,
    store: Option<Arc<dyn ContextStore>>,
    settings: GenerationSettings,
    localizer: Arc<dyn Localizer>,
    hooks: Arc<dyn BotOperationHooks>,
}

impl BotAdapterBuilder {
    pub fn new(tokens: Arc<dyn TokenSource>, transport: Arc<dyn ChatTransport>) -> Self {
        Self {
            id: BotId::JulianGpt,
            tokens,
            transport,
            store: None,
            settings: GenerationSettings::default(),
            localizer: Arc::new(EnglishLocalizer),
            hooks: Arc::new(NoopOperationHooks),
        }
    }

    pub fn id(mut self, id: BotId) -> Self {
        self.id = id;
        self
    }

    pub fn store(mut self, store: Arc<dyn ContextStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn settings(mut self, settings: GenerationSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn localizer(mut self, localizer: Arc<dyn Localizer>) -> Self {
        self.localizer = localizer;
        self
    }

    pub fn hooks(mut self, hooks: Arc<dyn BotOperationHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn build(self) -> Result<BotAdapter, BotError> {
        self.settings.validate()?;

        let store = self
            .store
            .unwrap_or_else(|| Arc::new(InMemoryContextStore::new()));
        Ok(BotAdapter {
            id: self.id,
            auth: AuthProvider::new(self.tokens, self.transport.clone()),
            transport: self.transport,
            store,
            settings: self.settings,
            localizer: self.localizer,
            hooks: self.hooks,
            gate: SerializationGate::new(),
            state: Mutex::new(AdapterState::Unconfigured),
            revoked: AtomicBool::new(false),
        })
    }
}
