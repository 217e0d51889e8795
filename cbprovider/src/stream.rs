//! Inbound wire event contracts and in-memory stream utilities.
//!
//! ```rust
//! use cbprovider::{ReadyState, VecWireEventStream, WireEvent, WireEventStream};
//!
//! let stream = VecWireEventStream::new(vec![
//!     Ok(WireEvent::Completion(r#"{"completion":"hi"}"#.into())),
//!     Ok(WireEvent::ReadyState(ReadyState::Closed)),
//! ]);
//! let _boxed: WireEventStream<'static> = Box::pin(stream);
//! ```

use std::collections::VecDeque;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures_core::Stream;

use crate::BotError;

/// Connection state reported by a `readystatechange` signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyState {
    Connecting,
    Open,
    Closed,
}

impl ReadyState {
    /// Maps the numeric EventSource ready-state codes (0, 1, 2).
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "0" => Some(Self::Connecting),
            "1" => Some(Self::Open),
            "2" => Some(Self::Closed),
            _ => None,
        }
    }
}

/// One raw event received from the chat-process endpoint, before any decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WireEvent {
    /// Unframed response text: newline-separated JSON snapshots.
    Chunk(String),
    /// Data of a named `completion` event.
    Completion(String),
    /// Data of a `message` event.
    Message(String),
    ReadyState(ReadyState),
}

/// Wire stream contract.
///
/// - Events are yielded in arrival order.
/// - A transport failure is yielded as `Err` and is the last item.
/// - A stream that ends normally yields `ReadyState(Closed)` before `None`.
pub trait WireEventSource: Stream<Item = Result<WireEvent, BotError>> + Send {}

impl<T> WireEventSource for T where T: Stream<Item = Result<WireEvent, BotError>> + Send {}

pub type WireEventStream<'a> = Pin<Box<dyn WireEventSource + 'a>>;

#[derive(Debug)]
pub struct VecWireEventStream {
    events: VecDeque<Result<WireEvent, BotError>>,
}

impl VecWireEventStream {
    pub fn new(events: Vec<Result<WireEvent, BotError>>) -> Self {
        Self {
            events: events.into(),
        }
    }
}

impl Stream for VecWireEventStream {
    type Item = Result<WireEvent, BotError>;

    fn poll_next(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
    ) -> Poll<Option<Result<WireEvent, BotError>>> {
        Poll::Ready(self.events.pop_front())
    }
}
