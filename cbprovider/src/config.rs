//! Service endpoints and fixed generation parameters.
//!
//! ```rust
//! use std::time::Duration;
//! use cbprovider::{GenerationSettings, ServiceConfig};
//!
//! let service = ServiceConfig::default()
//!     .with_base_url("http://127.0.0.1:3000/")
//!     .with_request_timeout(Duration::from_secs(5));
//! assert_eq!(service.endpoint(&service.chat_process_path), "http://127.0.0.1:3000/api/chatgpt/chat-process");
//!
//! let settings = GenerationSettings::default().with_temperature(0.2).with_network(true);
//! assert!(settings.validate().is_ok());
//! ```

use std::time::Duration;

use crate::BotError;

pub const DEFAULT_BASE_URL: &str = "https://chat.julianwl.com";
pub const AUTH_INFO_PATH: &str = "api/auth/getInfo";
pub const GROUP_CREATE_PATH: &str = "api/group/create";
pub const CHAT_PROCESS_PATH: &str = "api/chatgpt/chat-process";

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub base_url: String,
    pub auth_info_path: String,
    pub group_create_path: String,
    pub chat_process_path: String,
    /// Applies to the auth and conversation calls; streams are bounded by `connect_timeout` only.
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            auth_info_path: AUTH_INFO_PATH.to_string(),
            group_create_path: GROUP_CREATE_PATH.to_string(),
            chat_process_path: CHAT_PROCESS_PATH.to_string(),
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

impl ServiceConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    pub fn validate(&self) -> Result<(), BotError> {
        if self.base_url.trim().is_empty() {
            return Err(BotError::precondition("base_url must not be empty"));
        }

        if self.request_timeout.is_zero() || self.connect_timeout.is_zero() {
            return Err(BotError::precondition("timeouts must be greater than zero"));
        }

        Ok(())
    }
}

/// Adapter-level constants sent with every prompt; never taken from user input.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSettings {
    pub model: u32,
    pub temperature: f32,
    pub using_network: bool,
    pub system_message: String,
    /// `appId` sent when creating a conversation.
    pub group_app_id: u32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            model: 3,
            temperature: 0.8,
            using_network: false,
            system_message: String::new(),
            group_app_id: 0,
        }
    }
}

impl GenerationSettings {
    pub fn with_model(mut self, model: u32) -> Self {
        self.model = model;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_network(mut self, using_network: bool) -> Self {
        self.using_network = using_network;
        self
    }

    pub fn with_system_message(mut self, system_message: impl Into<String>) -> Self {
        self.system_message = system_message.into();
        self
    }

    pub fn validate(&self) -> Result<(), BotError> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(BotError::precondition(
                "temperature must be in the inclusive range 0.0..=2.0",
            ));
        }

        Ok(())
    }
}
