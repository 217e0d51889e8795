use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use cbchat::prelude::*;
use cbprovider::{
    BearerToken, BotError, BotErrorKind, BoxFuture, ChatProcessRequest, ChatTransport,
    GroupCreateRequest, GroupCreateResponse, StaticTokenSource, WireEvent, WireEventStream,
};
use futures_util::stream;
use tokio::sync::Notify;

/// First reply blocks until `release` fires; later replies answer immediately.
#[derive(Debug, Default)]
struct GatedTransport {
    release: Arc<Notify>,
    token_revoked: AtomicBool,
    opened: AtomicUsize,
    requests: Mutex<Vec<ChatProcessRequest>>,
}

impl ChatTransport for GatedTransport {
    fn fetch_auth_info<'a>(&'a self, _auth: BearerToken) -> BoxFuture<'a, Result<(), BotError>> {
        Box::pin(async {
            if self.token_revoked.load(Ordering::SeqCst) {
                Err(BotError::from_status(401, None))
            } else {
                Ok(())
            }
        })
    }

    fn create_group<'a>(
        &'a self,
        _request: GroupCreateRequest,
        _auth: BearerToken,
    ) -> BoxFuture<'a, Result<GroupCreateResponse, BotError>> {
        Box::pin(async {
            Ok(serde_json::from_str("{\"data\":{\"id\":5}}").expect("group json"))
        })
    }

    fn open_chat_stream<'a>(
        &'a self,
        request: ChatProcessRequest,
        _auth: BearerToken,
    ) -> BoxFuture<'a, Result<WireEventStream<'a>, BotError>> {
        Box::pin(async move {
            self.requests.lock().expect("requests lock").push(request);
            let index = self.opened.fetch_add(1, Ordering::SeqCst);

            let events: WireEventStream<'a> = if index == 0 {
                let release = self.release.clone();
                Box::pin(stream::once(async move {
                    release.notified().await;
                    Ok(WireEvent::Chunk("{\"id\":\"m1\",\"text\":\"first\"}".to_string()))
                }))
            } else {
                Box::pin(stream::iter(vec![Ok(WireEvent::Chunk(
                    format!("{{\"id\":\"m{}\",\"text\":\"next\"}}", index + 1),
                ))]))
            };

            Ok(events)
        })
    }
}

async fn ready_adapter(transport: Arc<GatedTransport>) -> BotAdapter {
    let adapter = BotAdapter::builder(Arc::new(StaticTokenSource::new("tok")), transport)
        .build()
        .expect("adapter builds");
    assert!(adapter.check_availability().await);
    adapter
        .create_conversation()
        .await
        .expect("conversation created");
    adapter
}

#[tokio::test]
async fn concurrent_prompts_run_in_call_order_and_chain_parents() {
    let transport = Arc::new(GatedTransport::default());
    let adapter = ready_adapter(transport.clone()).await;

    let seen = Mutex::new(Vec::new());
    let sink = |token: &CorrelationToken, update: &StreamUpdate| {
        seen.lock()
            .expect("seen lock")
            .push((token.to_string(), update.done));
    };

    let release = async {
        while adapter.queued_prompts() == 0 {
            tokio::task::yield_now().await;
        }
        assert_eq!(adapter.state(), AdapterState::Streaming);
        transport.release.notify_one();
    };

    let (first, second, ()) = tokio::join!(
        adapter.send_prompt("one", &sink, CorrelationToken::new("tab-1")),
        adapter.send_prompt("two", &sink, CorrelationToken::new("tab-2")),
        release,
    );

    assert_eq!(
        first.expect("first prompt").parent_message_id,
        Some(MessageId::new("m1"))
    );
    assert_eq!(
        second.expect("second prompt").parent_message_id,
        Some(MessageId::new("m2"))
    );

    let requests = transport.requests.lock().expect("requests lock").clone();
    let prompts = requests
        .iter()
        .map(|request| request.prompt.as_str())
        .collect::<Vec<_>>();
    assert_eq!(prompts, vec!["one", "two"]);
    assert_eq!(requests[0].options.parent_message_id, None);
    assert_eq!(requests[1].options.parent_message_id.as_deref(), Some("m1"));

    assert_eq!(
        *seen.lock().expect("seen lock"),
        vec![("tab-1".to_string(), true), ("tab-2".to_string(), true)]
    );
    assert_eq!(adapter.state(), AdapterState::ConversationReady);
    assert_eq!(adapter.queued_prompts(), 0);
}

#[tokio::test]
async fn cancelled_prompt_releases_gate_and_state() {
    let transport = Arc::new(GatedTransport::default());
    let adapter = ready_adapter(transport.clone()).await;
    let ignore = |_: &CorrelationToken, _: &StreamUpdate| {};

    let attempt = tokio::time::timeout(
        std::time::Duration::from_millis(20),
        adapter.send_prompt("stuck", &ignore, CorrelationToken::new("tab-1")),
    )
    .await;
    assert!(attempt.is_err());
    assert_eq!(adapter.state(), AdapterState::ConversationReady);

    let outcome = adapter
        .send_prompt("again", &ignore, CorrelationToken::new("tab-2"))
        .await
        .expect("gate released after cancellation");
    assert_eq!(outcome.parent_message_id, Some(MessageId::new("m2")));
}

#[tokio::test]
async fn token_revoked_mid_stream_leaves_adapter_unavailable() {
    let transport = Arc::new(GatedTransport::default());
    let adapter = ready_adapter(transport.clone()).await;
    let ignore = |_: &CorrelationToken, _: &StreamUpdate| {};

    let revoke = async {
        while adapter.state() != AdapterState::Streaming {
            tokio::task::yield_now().await;
        }
        transport.token_revoked.store(true, Ordering::SeqCst);
        let available = adapter.check_availability().await;
        assert_eq!(adapter.state(), AdapterState::Streaming);
        transport.release.notify_one();
        available
    };

    let (outcome, available) = tokio::join!(
        adapter.send_prompt("one", &ignore, CorrelationToken::new("tab-1")),
        revoke,
    );

    assert!(outcome.is_ok());
    assert!(!available);
    assert_eq!(adapter.state(), AdapterState::Unavailable);

    let err = adapter
        .send_prompt("two", &ignore, CorrelationToken::new("tab-1"))
        .await
        .expect_err("unavailable adapter must refuse prompts");
    assert_eq!(err.kind, BotErrorKind::Precondition);
}
