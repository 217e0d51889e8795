//! Turns wire events into displayable updates for the three reply encodings.
//!
//! The service answers in one of three shapes and never mixes them within a reply:
//!
//! * chunked lines, where every JSON line is a full snapshot of the reply so far;
//! * named `completion` events carrying deltas, closed by a `readystatechange` of `2`;
//! * typed `message` envelopes (`search_plus`, `cmpl`, `all_done`).
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use cbchat::{EnglishLocalizer, StreamEventParser};
//! use cbprovider::{ReadyState, WireEvent};
//!
//! let mut parser = StreamEventParser::new(Arc::new(EnglishLocalizer));
//! let first = parser
//!     .feed(WireEvent::Completion(r#"{"completion":"He"}"#.to_string()))
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(first.content, "He");
//!
//! let last = parser
//!     .feed(WireEvent::ReadyState(ReadyState::Closed))
//!     .unwrap()
//!     .unwrap();
//! assert!(last.done);
//! ```

use std::sync::Arc;

use cbcommon::MessageId;
use cbprovider::wire::{
    CompletionPayload, FailureBody, MessageEnvelope, ReplySnapshot, SearchProgress,
};
use cbprovider::{BotError, ReadyState, WireEvent};

use crate::{Localizer, StreamUpdate};

const CLOSED_EARLY: &str = "The chat service closed the stream before the reply completed.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamEncoding {
    ChunkedLines,
    NamedCompletion,
    MessageEnvelope,
}

/// Text accumulated for one reply. `prefix` holds search progress lines, each ending in `\n`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplyBuffer {
    pub prefix: String,
    pub body: String,
}

impl ReplyBuffer {
    fn with_prefix(&self) -> String {
        format!("{}\n{}", self.prefix, self.body)
    }
}

pub struct StreamEventParser {
    localizer: Arc<dyn Localizer>,
    buffer: ReplyBuffer,
    encoding: Option<StreamEncoding>,
    parent_message_id: Option<MessageId>,
    finished: bool,
}

impl StreamEventParser {
    pub fn new(localizer: Arc<dyn Localizer>) -> Self {
        Self {
            localizer,
            buffer: ReplyBuffer::default(),
            encoding: None,
            parent_message_id: None,
            finished: false,
        }
    }

    /// Consumes one event. Returns the update to show, if any.
    ///
    /// After a terminal update or an error the parser is finished and ignores further events.
    pub fn feed(&mut self, event: WireEvent) -> Result<Option<StreamUpdate>, BotError> {
        if self.finished {
            return Ok(None);
        }

        let result = match event {
            WireEvent::Chunk(payload) => self.on_chunk(&payload),
            WireEvent::Completion(payload) => self.on_completion(&payload),
            WireEvent::Message(payload) => self.on_message(&payload),
            WireEvent::ReadyState(state) => self.on_ready_state(state),
        };

        if matches!(&result, Err(_) | Ok(Some(StreamUpdate { done: true, .. }))) {
            self.finished = true;
        }

        result
    }

    /// Latest reply id seen on the wire, only ever set by chunked-line snapshots.
    pub fn parent_message_id(&self) -> Option<&MessageId> {
        self.parent_message_id.as_ref()
    }

    pub fn encoding(&self) -> Option<StreamEncoding> {
        self.encoding
    }

    pub fn buffer(&self) -> &ReplyBuffer {
        &self.buffer
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    fn on_chunk(&mut self, payload: &str) -> Result<Option<StreamUpdate>, BotError> {
        let Some(line) = payload
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .next_back()
        else {
            return Ok(None);
        };

        let snapshot = serde_json::from_str::<ReplySnapshot>(line).map_err(|err| {
            BotError::stream_protocol(format!("could not parse reply snapshot: {err}"))
        })?;
        if snapshot.text.is_none() {
            reject_failure_line(line)?;
        }

        self.encoding.get_or_insert(StreamEncoding::ChunkedLines);
        if let Some(id) = snapshot.id.filter(|id| !id.is_empty()) {
            self.parent_message_id = Some(MessageId::new(id));
        }
        self.buffer.body = snapshot.text.unwrap_or_default();

        Ok(Some(StreamUpdate::terminal(self.buffer.with_prefix())))
    }

    fn on_completion(&mut self, payload: &str) -> Result<Option<StreamUpdate>, BotError> {
        if payload.trim().is_empty() {
            return Ok(None);
        }

        let delta = serde_json::from_str::<CompletionPayload>(payload).map_err(|err| {
            BotError::stream_protocol(format!("could not parse completion event: {err}"))
        })?;

        self.encoding.get_or_insert(StreamEncoding::NamedCompletion);
        self.buffer.body.push_str(&delta.completion);

        Ok(Some(StreamUpdate::progress(self.buffer.body.clone())))
    }

    fn on_message(&mut self, payload: &str) -> Result<Option<StreamUpdate>, BotError> {
        let trimmed = payload.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }

        let envelope = match serde_json::from_str::<MessageEnvelope>(trimmed) {
            Ok(envelope) => envelope,
            // Several snapshot lines in one message frame.
            Err(_) if trimmed.contains('\n') => return self.on_chunk(trimmed),
            Err(err) => {
                return Err(BotError::stream_protocol(format!(
                    "could not parse message event: {err}"
                )));
            }
        };

        let Some(kind) = envelope.event.as_deref() else {
            return match self.encoding {
                None | Some(StreamEncoding::ChunkedLines) => self.on_chunk(trimmed),
                Some(_) => {
                    tracing::debug!("ignoring message without event mid-reply");
                    Ok(Some(StreamUpdate::progress(self.buffer.with_prefix())))
                }
            };
        };

        self.encoding.get_or_insert(StreamEncoding::MessageEnvelope);
        match kind {
            "search_plus" => {
                if let Some(progress) = envelope.search_progress() {
                    self.push_search_line(&progress);
                }
                Ok(Some(StreamUpdate::progress(self.buffer.with_prefix())))
            }
            "cmpl" => {
                self.buffer
                    .body
                    .push_str(envelope.text.as_deref().unwrap_or_default());
                Ok(Some(StreamUpdate::progress(self.buffer.with_prefix())))
            }
            "all_done" => Ok(Some(StreamUpdate::terminal(self.buffer.with_prefix()))),
            other => {
                tracing::debug!(event = other, "ignoring unknown message envelope");
                Ok(Some(StreamUpdate::progress(self.buffer.with_prefix())))
            }
        }
    }

    fn push_search_line(&mut self, progress: &SearchProgress) {
        let line = match progress.kind.as_str() {
            "start_res" => self.localizer.searching(),
            "get_res" => self.localizer.found_results(
                progress.result_count(),
                progress.title.as_deref().unwrap_or_default(),
                progress.url.as_deref().unwrap_or_default(),
            ),
            _ => return,
        };

        self.buffer.prefix.push_str(&line);
        self.buffer.prefix.push('\n');
    }

    fn on_ready_state(&mut self, state: ReadyState) -> Result<Option<StreamUpdate>, BotError> {
        if state != ReadyState::Closed {
            return Ok(None);
        }

        match self.encoding {
            Some(StreamEncoding::NamedCompletion) => {
                Ok(Some(StreamUpdate::terminal(self.buffer.body.clone())))
            }
            _ => Err(BotError::stream_transport(CLOSED_EARLY)),
        }
    }
}

/// A text-less line carrying `status: "Fail"` or a `message` is a server-side failure.
fn reject_failure_line(line: &str) -> Result<(), BotError> {
    let Ok(body) = serde_json::from_str::<FailureBody>(line) else {
        return Ok(());
    };
    if !body.is_failure() {
        return Ok(());
    }

    let detail = body
        .message
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| "no reason given".to_string());
    Err(BotError::stream_transport(format!(
        "The chat service could not answer: {detail}"
    )))
}

impl std::fmt::Debug for StreamEventParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamEventParser")
            .field("buffer", &self.buffer)
            .field("encoding", &self.encoding)
            .field("parent_message_id", &self.parent_message_id)
            .field("finished", &self.finished)
            .finish_non_exhaustive()
    }
}
