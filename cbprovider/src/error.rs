//! Bot error kinds, error value helpers, and user-facing status messages.
//!
//! ```rust
//! use cbprovider::{BotError, BotErrorKind};
//!
//! let rejected = BotError::authentication("token rejected").with_status(401);
//! assert_eq!(rejected.kind, BotErrorKind::Authentication);
//! assert_eq!(rejected.status, Some(401));
//!
//! let wrapped = BotError::conversation_creation("could not start a conversation")
//!     .with_source(BotError::stream_transport("connection reset"));
//! assert!(std::error::Error::source(&wrapped).is_some());
//! ```

use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotErrorKind {
    /// Missing credential, or a credential the service rejected.
    Authentication,
    ConversationCreation,
    /// Connection-level failure; `message` is safe to show to a user.
    StreamTransport,
    /// A payload failed to parse under every known encoding.
    StreamProtocol,
    /// The caller broke the adapter contract (e.g. prompting before a conversation exists).
    Precondition,
}

impl BotErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Authentication => "authentication",
            Self::ConversationCreation => "conversation_creation",
            Self::StreamTransport => "stream_transport",
            Self::StreamProtocol => "stream_protocol",
            Self::Precondition => "precondition",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotError {
    pub kind: BotErrorKind,
    pub message: String,
    pub status: Option<u16>,
    source: Option<Box<BotError>>,
    missing_credential: bool,
}

impl BotError {
    pub fn new(kind: BotErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
            source: None,
            missing_credential: false,
        }
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(BotErrorKind::Authentication, message)
    }

    pub fn missing_credential() -> Self {
        Self {
            missing_credential: true,
            ..Self::authentication("no auth token configured")
        }
    }

    pub fn conversation_creation(message: impl Into<String>) -> Self {
        Self::new(BotErrorKind::ConversationCreation, message)
    }

    pub fn stream_transport(message: impl Into<String>) -> Self {
        Self::new(BotErrorKind::StreamTransport, message)
    }

    pub fn stream_protocol(message: impl Into<String>) -> Self {
        Self::new(BotErrorKind::StreamProtocol, message)
    }

    pub fn precondition(message: impl Into<String>) -> Self {
        Self::new(BotErrorKind::Precondition, message)
    }

    /// Builds the error for a non-success HTTP status, preferring a server supplied message.
    pub fn from_status(status: u16, server_message: Option<String>) -> Self {
        let message = server_message
            .filter(|message| !message.trim().is_empty())
            .unwrap_or_else(|| display_message_for_status(status));

        let kind = if matches!(status, 401 | 403) {
            BotErrorKind::Authentication
        } else {
            BotErrorKind::StreamTransport
        };

        Self::new(kind, message).with_status(status)
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_source(mut self, source: BotError) -> Self {
        if self.status.is_none() {
            self.status = source.status;
        }
        self.source = Some(Box::new(source));
        self
    }

    pub fn cause(&self) -> Option<&BotError> {
        self.source.as_deref()
    }

    pub fn is_authentication(&self) -> bool {
        self.kind == BotErrorKind::Authentication
    }

    /// True when no token was configured at all, as opposed to the service rejecting one.
    pub fn is_missing_credential(&self) -> bool {
        self.missing_credential
    }

    /// Single descriptive string suitable for showing in a chat window.
    pub fn display_message(&self) -> String {
        match self.cause() {
            Some(cause) if cause.message != self.message => {
                format!("{} ({})", self.message, cause.message)
            }
            _ => self.message.clone(),
        }
    }
}

impl Display for BotError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl Error for BotError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source
            .as_deref()
            .map(|source| source as &(dyn Error + 'static))
    }
}

pub fn display_message_for_status(status: u16) -> String {
    match status {
        400 => "The chat service could not understand the request.".to_string(),
        401 | 403 => "The chat service rejected the auth token. Please log in again.".to_string(),
        404 => "The chat endpoint was not found.".to_string(),
        408 | 504 => "The chat service timed out while replying.".to_string(),
        413 => "The prompt is too long for the chat service.".to_string(),
        429 => "Too many requests. Please wait a moment and try again.".to_string(),
        500..=599 => format!("The chat service is unavailable right now (HTTP {status})."),
        _ => format!("The chat request failed (HTTP {status})."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_status_classifies_auth_rejections() {
        let unauthorized = BotError::from_status(401, None);
        assert_eq!(unauthorized.kind, BotErrorKind::Authentication);
        assert_eq!(unauthorized.status, Some(401));

        let overloaded = BotError::from_status(503, None);
        assert_eq!(overloaded.kind, BotErrorKind::StreamTransport);
        assert!(overloaded.message.contains("503"));
    }

    #[test]
    fn missing_credential_is_distinct_from_rejection() {
        let missing = BotError::missing_credential();
        assert!(missing.is_authentication());
        assert!(missing.is_missing_credential());

        let rejected = BotError::from_status(401, None);
        assert!(rejected.is_authentication());
        assert!(!rejected.is_missing_credential());
    }

    #[test]
    fn from_status_prefers_non_blank_server_message() {
        let error = BotError::from_status(429, Some("slow down".to_string()));
        assert_eq!(error.message, "slow down");

        let blank = BotError::from_status(429, Some("  ".to_string()));
        assert_eq!(blank.message, display_message_for_status(429));
    }

    #[test]
    fn with_source_inherits_status_and_exposes_cause() {
        let error = BotError::authentication("auth token is invalid")
            .with_source(BotError::from_status(403, None));

        assert_eq!(error.status, Some(403));
        assert_eq!(error.cause().map(|cause| cause.status), Some(Some(403)));
        assert!(error.display_message().starts_with("auth token is invalid ("));
    }

    #[test]
    fn kind_names_are_stable() {
        assert_eq!(BotErrorKind::StreamProtocol.as_str(), "stream_protocol");
        assert_eq!(BotErrorKind::Precondition.as_str(), "precondition");
    }
}
