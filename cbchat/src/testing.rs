use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use cbcommon::BoxFuture;
use cbprovider::{
    BearerToken, BotError, ChatProcessRequest, ChatTransport, GroupCreateRequest,
    GroupCreateResponse, VecWireEventStream, WireEvent, WireEventStream,
};

type ScriptedStream = Result<Vec<Result<WireEvent, BotError>>, BotError>;

/// Transport double that replays queued responses and records what it was sent.
#[derive(Debug, Default)]
pub(crate) struct ScriptedTransport {
    auth_status: Mutex<Option<u16>>,
    groups: Mutex<VecDeque<Result<GroupCreateResponse, BotError>>>,
    streams: Mutex<VecDeque<ScriptedStream>>,
    chat_requests: Mutex<Vec<ChatProcessRequest>>,
    calls: AtomicUsize,
}

impl ScriptedTransport {
    pub(crate) fn reject_auth(&self, status: u16) {
        *self.auth_status.lock().expect("auth lock") = Some(status);
    }

    pub(crate) fn push_group(&self, response: Result<GroupCreateResponse, BotError>) {
        self.groups.lock().expect("groups lock").push_back(response);
    }

    pub(crate) fn push_group_id(&self, id: &str) {
        let body = format!("{{\"data\":{{\"id\":{id}}}}}");
        let response = serde_json::from_str(&body).expect("group response json");
        self.push_group(Ok(response));
    }

    pub(crate) fn push_stream(&self, events: Vec<Result<WireEvent, BotError>>) {
        self.streams.lock().expect("streams lock").push_back(Ok(events));
    }

    pub(crate) fn push_stream_failure(&self, error: BotError) {
        self.streams.lock().expect("streams lock").push_back(Err(error));
    }

    pub(crate) fn last_chat_request(&self) -> Option<ChatProcessRequest> {
        self.chat_requests.lock().expect("requests lock").last().cloned()
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ChatTransport for ScriptedTransport {
    fn fetch_auth_info<'a>(&'a self, _auth: BearerToken) -> BoxFuture<'a, Result<(), BotError>> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match *self.auth_status.lock().expect("auth lock") {
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
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.groups
                .lock()
                .expect("groups lock")
                .pop_front()
                .unwrap_or_else(|| Err(BotError::stream_transport("no scripted group")))
        })
    }

    fn open_chat_stream<'a>(
        &'a self,
        request: ChatProcessRequest,
        _auth: BearerToken,
    ) -> BoxFuture<'a, Result<WireEventStream<'a>, BotError>> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.chat_requests
                .lock()
                .expect("requests lock")
                .push(request);
            let script = self
                .streams
                .lock()
                .expect("streams lock")
                .pop_front()
                .unwrap_or_else(|| Err(BotError::stream_transport("no scripted stream")))?;

            Ok(Box::pin(VecWireEventStream::new(script)) as WireEventStream<'a>)
        })
    }
}
