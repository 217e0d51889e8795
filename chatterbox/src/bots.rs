//! Stable bot construction surface for facade consumers.

use std::sync::Arc;

use crate::{
    Bot, BotAdapter, BotError, BotId, BotOperationHooks, ChatTransport, GenerationSettings,
    ServiceConfig, StaticTokenSource, TokenSource,
};

#[derive(Clone)]
pub struct BotBuildConfig {
    pub bot_id: BotId,
    pub tokens: Arc<dyn TokenSource>,
    pub service: ServiceConfig,
    pub settings: GenerationSettings,
    pub hooks: Option<Arc<dyn BotOperationHooks>>,
}

impl BotBuildConfig {
    pub fn new(tokens: Arc<dyn TokenSource>) -> Self {
        Self {
            bot_id: BotId::JulianGpt,
            tokens,
            service: ServiceConfig::default(),
            settings: GenerationSettings::default(),
            hooks: None,
        }
    }

    pub fn from_token(token: impl Into<String>) -> Self {
        Self::new(Arc::new(StaticTokenSource::new(token)))
    }

    pub fn with_service(mut self, service: ServiceConfig) -> Self {
        self.service = service;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.service = self.service.with_base_url(base_url);
        self
    }

    pub fn with_settings(mut self, settings: GenerationSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn BotOperationHooks>) -> Self {
        self.hooks = Some(hooks);
        self
    }

    /// Tracing and metrics hooks, each isolated from panics.
    pub fn with_default_observability(self) -> Self {
        self.with_hooks(crate::util::observability_hooks())
    }
}

impl std::fmt::Debug for BotBuildConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotBuildConfig")
            .field("bot_id", &self.bot_id)
            .field("service", &self.service)
            .field("settings", &self.settings)
            .field("hooks", &self.hooks.is_some())
            .finish_non_exhaustive()
    }
}

/// Builds an HTTP-backed bot, rejecting a blank token up front.
#[cfg(feature = "transport-http")]
pub fn build_bot_from_token(token: impl Into<String>) -> Result<Arc<dyn Bot>, BotError> {
    let token = token.into();
    if token.trim().is_empty() {
        return Err(BotError::missing_credential());
    }

    build_bot_with_config(BotBuildConfig::from_token(token))
}

#[cfg(feature = "transport-http")]
pub fn build_bot_with_config(config: BotBuildConfig) -> Result<Arc<dyn Bot>, BotError> {
    let transport = cbprovider::HttpChatTransport::from_config(config.service.clone())?;
    build_bot_with_transport(config, Arc::new(transport))
}

/// Uses a caller-supplied client; the service config's connect timeout is not applied to it.
#[cfg(feature = "transport-http")]
pub fn build_bot_with_client(
    config: BotBuildConfig,
    client: reqwest::Client,
) -> Result<Arc<dyn Bot>, BotError> {
    config.service.validate()?;
    let transport = cbprovider::HttpChatTransport::new(client, config.service.clone());
    build_bot_with_transport(config, Arc::new(transport))
}

pub fn build_bot_with_transport(
    config: BotBuildConfig,
    transport: Arc<dyn ChatTransport>,
) -> Result<Arc<dyn Bot>, BotError> {
    let mut builder = BotAdapter::builder(config.tokens, transport)
        .id(config.bot_id)
        .settings(config.settings);
    if let Some(hooks) = config.hooks {
        builder = builder.hooks(hooks);
    }

    Ok(Arc::new(builder.build()?))
}
