//! Shared utilities and strongly-typed common values for workspace crates.
//!
//! ```rust
//! use cbcommon::{ConversationId, CorrelationToken, MessageId};
//!
//! let conversation = ConversationId::from("4711");
//! let parent = MessageId::new("chatcmpl-1");
//! let correlation = CorrelationToken::new("tab-3");
//!
//! assert_eq!(conversation.as_str(), "4711");
//! assert_eq!(parent.to_string(), "chatcmpl-1");
//! assert_eq!(correlation.as_str(), "tab-3");
//! ```

pub mod future {
    //! Shared async future aliases.
    //!
    //! ```rust
    //! use cbcommon::BoxFuture;
    //!
    //! fn str_len<'a>(value: &'a str) -> BoxFuture<'a, usize> {
    //!     Box::pin(async move { value.len() })
    //! }
    //!
    //! let _future = str_len("hello");
    //! ```

    use std::future::Future;
    use std::pin::Pin;

    pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
}

pub mod context {
    //! Identifier newtypes shared by the conversation and transport layers.
    //!
    //! ```rust
    //! use cbcommon::{ConversationId, MessageId};
    //!
    //! let conversation = ConversationId::new("42");
    //! let message = MessageId::from("m-42".to_string());
    //!
    //! assert_eq!(conversation.to_string(), "42");
    //! assert_eq!(message.as_str(), "m-42");
    //! ```

    use std::fmt::{Display, Formatter};

    macro_rules! string_id {
        ($(#[$meta:meta])* $name:ident) => {
            $(#[$meta])*
            #[derive(Debug, Clone, PartialEq, Eq, Hash)]
            pub struct $name(String);

            impl $name {
                pub fn new(value: impl Into<String>) -> Self {
                    Self(value.into())
                }

                pub fn as_str(&self) -> &str {
                    self.0.as_str()
                }

                pub fn into_inner(self) -> String {
                    self.0
                }
            }

            impl Display for $name {
                fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                    f.write_str(&self.0)
                }
            }

            impl From<String> for $name {
                fn from(value: String) -> Self {
                    Self(value)
                }
            }

            impl From<&str> for $name {
                fn from(value: &str) -> Self {
                    Self(value.to_string())
                }
            }
        };
    }

    string_id!(
        /// Server-assigned id of a conversation ("group"). Immutable once issued.
        ConversationId
    );

    string_id!(
        /// Id of a reply message; the latest one links the next prompt into the dialogue.
        MessageId
    );

    string_id!(
        /// Opaque caller value handed back with every stream update.
        CorrelationToken
    );
}

pub use context::{ConversationId, CorrelationToken, MessageId};
pub use future::BoxFuture;
