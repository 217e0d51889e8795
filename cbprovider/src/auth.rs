//! Token lookup and verification against the auth-info endpoint.

use std::sync::Arc;

use crate::{BearerToken, BotError, ChatTransport, SecretString, TokenSource};

#[derive(Clone)]
pub struct AuthProvider {
    tokens: Arc<dyn TokenSource>,
    transport: Arc<dyn ChatTransport>,
}

impl AuthProvider {
    pub fn new(tokens: Arc<dyn TokenSource>, transport: Arc<dyn ChatTransport>) -> Self {
        Self { tokens, transport }
    }

    /// Current token, or `None` when nothing usable is configured.
    pub fn get_token(&self) -> Option<SecretString> {
        self.tokens.token().filter(|token| !token.is_empty())
    }

    pub fn require_token(&self) -> Result<SecretString, BotError> {
        self.get_token().ok_or_else(BotError::missing_credential)
    }

    /// Single read-only round trip; every failure is reported as an authentication error.
    pub async fn verify(&self, token: SecretString) -> Result<(), BotError> {
        self.transport
            .fetch_auth_info(BearerToken::new(token))
            .await
            .map_err(|cause| BotError::authentication("auth token is invalid").with_source(cause))
    }
}

impl std::fmt::Debug for AuthProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthProvider")
            .field("transport", &self.transport)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use cbcommon::BoxFuture;

    use super::*;
    use crate::wire::{ChatProcessRequest, GroupCreateRequest, GroupCreateResponse};
    use crate::{BotErrorKind, StaticTokenSource, WireEventStream};

    #[derive(Debug, Default)]
    struct FakeTransport {
        reject_with: Option<u16>,
        seen_tokens: Mutex<Vec<String>>,
    }

    impl ChatTransport for FakeTransport {
        fn fetch_auth_info<'a>(
            &'a self,
            auth: BearerToken,
        ) -> BoxFuture<'a, Result<(), BotError>> {
            Box::pin(async move {
                self.seen_tokens
                    .lock()
                    .expect("tokens lock")
                    .push(auth.header_value());
                match self.reject_with {
                    Some(status) => Err(BotError::from_status(status, None)),
                    None => Ok(()),
                }
            })
        }

        fn create_group<'a>(
            &'a self,
            _request: GroupCreateRequest,
            _auth: BearerToken,
        ) -> BoxFuture<'a, Result<GroupCreateResponse, BotError>> {
            Box::pin(async { Err(BotError::stream_transport("not used")) })
        }

        fn open_chat_stream<'a>(
            &'a self,
            _request: ChatProcessRequest,
            _auth: BearerToken,
        ) -> BoxFuture<'a, Result<WireEventStream<'a>, BotError>> {
            Box::pin(async { Err(BotError::stream_transport("not used")) })
        }
    }

    #[tokio::test]
    async fn verify_sends_bearer_header_and_accepts_success() {
        let transport = Arc::new(FakeTransport::default());
        let auth = AuthProvider::new(Arc::new(StaticTokenSource::new("tok-1")), transport.clone());

        let token = auth.require_token().expect("token configured");
        auth.verify(token).await.expect("verify should pass");

        let seen = transport.seen_tokens.lock().expect("tokens lock").clone();
        assert_eq!(seen, vec!["Bearer tok-1".to_string()]);
    }

    #[tokio::test]
    async fn verify_wraps_rejection_as_authentication_error_with_cause() {
        let transport = Arc::new(FakeTransport {
            reject_with: Some(500),
            ..FakeTransport::default()
        });
        let auth = AuthProvider::new(Arc::new(StaticTokenSource::new("tok-1")), transport);

        let err = auth
            .verify(SecretString::new("tok-1"))
            .await
            .expect_err("server failure must fail verification");
        assert_eq!(err.kind, BotErrorKind::Authentication);
        assert_eq!(err.status, Some(500));
        assert_eq!(
            err.cause().map(|cause| cause.kind),
            Some(BotErrorKind::StreamTransport)
        );
    }

    #[test]
    fn missing_token_is_distinct_from_rejection() {
        let auth = AuthProvider::new(
            Arc::new(StaticTokenSource::new("")),
            Arc::new(FakeTransport::default()),
        );

        assert!(auth.get_token().is_none());
        let err = auth.require_token().expect_err("missing token must fail");
        assert_eq!(err, BotError::missing_credential());
        assert!(err.status.is_none());
    }
}
