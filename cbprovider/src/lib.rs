//! Remote chat service layer: credentials, wire payloads, transport, and errors.
//!
//! ```rust
//! use cbprovider::{BotError, BotId, ChatProcessRequest, GenerationSettings};
//! use cbcommon::ConversationId;
//!
//! let request = ChatProcessRequest::new(
//!     &ConversationId::new("12"),
//!     None,
//!     "hello",
//!     &GenerationSettings::default(),
//! );
//! assert_eq!(request.prompt, "hello");
//! assert_eq!(BotId::JulianGpt.to_string(), "julian-gpt");
//! assert!(BotError::missing_credential().is_authentication());
//! ```

use std::fmt::{Display, Formatter};

mod auth;
mod config;
mod credentials;
mod error;
mod hooks;
#[cfg(feature = "transport-http")]
mod http;
mod stream;
mod transport;
pub mod wire;

pub mod prelude;

pub use auth::AuthProvider;
pub use config::{
    AUTH_INFO_PATH, CHAT_PROCESS_PATH, DEFAULT_BASE_URL, GROUP_CREATE_PATH, GenerationSettings,
    ServiceConfig,
};
pub use credentials::{
    FnTokenSource, SecretString, SharedTokenSource, StaticTokenSource, TokenSource,
    token_source_fn,
};
pub use error::{BotError, BotErrorKind, display_message_for_status};
pub use hooks::{BotOperation, BotOperationHooks, NoopOperationHooks, observe_operation};
#[cfg(feature = "transport-http")]
pub use http::{HttpChatTransport, decode_chunked_body, decode_event_stream, map_sse_event};
pub use stream::{ReadyState, VecWireEventStream, WireEvent, WireEventSource, WireEventStream};
pub use transport::{BearerToken, ChatTransport};
pub use wire::{ChatProcessRequest, GroupCreateRequest, GroupCreateResponse, GroupId};

pub use cbcommon::BoxFuture;

/// Chat backend an adapter talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BotId {
    JulianGpt,
}

impl BotId {
    pub fn brand(self) -> &'static str {
        match self {
            Self::JulianGpt => "julianGPT",
        }
    }
}

impl Display for BotId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let id = match self {
            Self::JulianGpt => "julian-gpt",
        };

        f.write_str(id)
    }
}
