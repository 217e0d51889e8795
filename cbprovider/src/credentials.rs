//! Secret handling and injectable bearer-token sources.
//!
//! ```rust
//! use cbprovider::{SharedTokenSource, TokenSource};
//!
//! let tokens = SharedTokenSource::new();
//! assert!(tokens.token().is_none());
//!
//! tokens.set("eyJhbGciOi").expect("token should set");
//! assert_eq!(tokens.token().map(|t| t.expose().to_string()), Some("eyJhbGciOi".to_string()));
//! ```

use std::sync::{Mutex, MutexGuard};

use crate::BotError;

#[derive(PartialEq, Eq)]
pub struct SecretString {
    value: String,
}

impl SecretString {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    pub fn expose(&self) -> &str {
        self.value.as_str()
    }

    pub fn is_empty(&self) -> bool {
        self.value.trim().is_empty()
    }
}

impl Clone for SecretString {
    fn clone(&self) -> Self {
        Self::new(self.value.clone())
    }
}

impl std::fmt::Debug for SecretString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl Drop for SecretString {
    fn drop(&mut self) {
        unsafe {
            self.value.as_mut_vec().fill(0);
        }
    }
}

/// Supplies the bearer token the service issued at login.
///
/// Returning `None` means no credential exists yet, which callers treat
/// differently from a token the service rejects.
pub trait TokenSource: Send + Sync {
    fn token(&self) -> Option<SecretString>;
}

#[derive(Debug, Clone)]
pub struct StaticTokenSource {
    token: SecretString,
}

impl StaticTokenSource {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: SecretString::new(token),
        }
    }
}

impl TokenSource for StaticTokenSource {
    fn token(&self) -> Option<SecretString> {
        if self.token.is_empty() {
            return None;
        }

        Some(self.token.clone())
    }
}

/// Runtime-settable token holder shared between a login flow and the adapter.
#[derive(Debug, Default)]
pub struct SharedTokenSource {
    token: Mutex<Option<SecretString>>,
}

impl SharedTokenSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, token: impl Into<String>) -> Result<(), BotError> {
        let token = SecretString::new(token);
        if token.is_empty() {
            return Err(BotError::authentication("auth token must not be empty"));
        }

        *self.token_mut()? = Some(token);
        Ok(())
    }

    pub fn clear(&self) -> Result<bool, BotError> {
        Ok(self.token_mut()?.take().is_some())
    }

    fn token_mut(&self) -> Result<MutexGuard<'_, Option<SecretString>>, BotError> {
        self.token
            .lock()
            .map_err(|_| BotError::authentication("token source lock poisoned"))
    }
}

impl TokenSource for SharedTokenSource {
    fn token(&self) -> Option<SecretString> {
        self.token.lock().ok()?.clone()
    }
}

/// Adapts a closure into a [`TokenSource`].
pub struct FnTokenSource<F> {
    read: F,
}

pub fn token_source_fn<F>(read: F) -> FnTokenSource<F>
where
    F: Fn() -> Option<String> + Send + Sync,
{
    FnTokenSource { read }
}

impl<F> TokenSource for FnTokenSource<F>
where
    F: Fn() -> Option<String> + Send + Sync,
{
    fn token(&self) -> Option<SecretString> {
        (self.read)()
            .map(SecretString::new)
            .filter(|token| !token.is_empty())
    }
}
