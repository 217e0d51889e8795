//! Chat service transport contract.

use cbcommon::BoxFuture;

use crate::wire::{ChatProcessRequest, GroupCreateRequest, GroupCreateResponse};
use crate::{BotError, SecretString, WireEventStream};

/// Bearer credential attached to a single request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BearerToken(SecretString);

impl BearerToken {
    pub fn new(token: SecretString) -> Self {
        Self(token)
    }

    pub fn expose(&self) -> &str {
        self.0.expose()
    }

    pub fn header_value(&self) -> String {
        format!("Bearer {}", self.0.expose())
    }
}

impl From<SecretString> for BearerToken {
    fn from(value: SecretString) -> Self {
        Self::new(value)
    }
}

/// Network seam between the adapter and the remote chat service.
///
/// Implementations return `BotError`s only; raw client errors never cross this trait.
pub trait ChatTransport: Send + Sync + std::fmt::Debug {
    /// Read-only "whoami" round trip; `Ok` iff the service accepted the token.
    fn fetch_auth_info<'a>(&'a self, auth: BearerToken) -> BoxFuture<'a, Result<(), BotError>>;

    fn create_group<'a>(
        &'a self,
        request: GroupCreateRequest,
        auth: BearerToken,
    ) -> BoxFuture<'a, Result<GroupCreateResponse, BotError>>;

    fn open_chat_stream<'a>(
        &'a self,
        request: ChatProcessRequest,
        auth: BearerToken,
    ) -> BoxFuture<'a, Result<WireEventStream<'a>, BotError>>;
}
