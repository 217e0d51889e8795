//! reqwest-based chat transport and response body decoding.

use std::fmt::Display;

use async_stream::try_stream;
use eventsource_stream::Eventsource;
use futures_core::Stream;
use futures_util::StreamExt;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Response};

use cbcommon::BoxFuture;

use crate::wire::{
    ChatProcessRequest, GroupCreateRequest, GroupCreateResponse, extract_error_message,
};
use crate::{
    BearerToken, BotError, ChatTransport, ReadyState, ServiceConfig, WireEvent, WireEventStream,
};

const EVENT_STREAM_MIME: &str = "text/event-stream";

#[derive(Debug, Clone)]
pub struct HttpChatTransport {
    client: Client,
    config: ServiceConfig,
}

impl HttpChatTransport {
    pub fn new(client: Client, config: ServiceConfig) -> Self {
        Self { client, config }
    }

    /// Builds a client whose only global bound is the connect timeout, so long streams survive.
    pub fn from_config(config: ServiceConfig) -> Result<Self, BotError> {
        config.validate()?;
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|err| BotError::stream_transport(err.to_string()))?;

        Ok(Self::new(client, config))
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    async fn parse_error(response: Response) -> BotError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        BotError::from_status(status, extract_error_message(&body))
    }

    fn map_send_error(err: reqwest::Error) -> BotError {
        if err.is_timeout() {
            BotError::stream_transport("The chat service timed out while replying.")
        } else if err.is_connect() {
            BotError::stream_transport(format!("Could not reach the chat service: {err}"))
        } else {
            BotError::stream_transport(err.to_string())
        }
    }
}

impl ChatTransport for HttpChatTransport {
    fn fetch_auth_info<'a>(&'a self, auth: BearerToken) -> BoxFuture<'a, Result<(), BotError>> {
        Box::pin(async move {
            let url = self.config.endpoint(&self.config.auth_info_path);
            let response = self
                .client
                .get(url)
                .bearer_auth(auth.expose())
                .timeout(self.config.request_timeout)
                .send()
                .await
                .map_err(Self::map_send_error)?;

            if !response.status().is_success() {
                return Err(Self::parse_error(response).await);
            }

            Ok(())
        })
    }

    fn create_group<'a>(
        &'a self,
        request: GroupCreateRequest,
        auth: BearerToken,
    ) -> BoxFuture<'a, Result<GroupCreateResponse, BotError>> {
        Box::pin(async move {
            let url = self.config.endpoint(&self.config.group_create_path);
            let response = self
                .client
                .post(url)
                .bearer_auth(auth.expose())
                .timeout(self.config.request_timeout)
                .json(&request)
                .send()
                .await
                .map_err(Self::map_send_error)?;

            if !response.status().is_success() {
                return Err(Self::parse_error(response).await);
            }

            response
                .json::<GroupCreateResponse>()
                .await
                .map_err(|err| BotError::stream_protocol(err.to_string()))
        })
    }

    fn open_chat_stream<'a>(
        &'a self,
        request: ChatProcessRequest,
        auth: BearerToken,
    ) -> BoxFuture<'a, Result<WireEventStream<'a>, BotError>> {
        Box::pin(async move {
            let url = self.config.endpoint(&self.config.chat_process_path);
            let response = self
                .client
                .post(url)
                .bearer_auth(auth.expose())
                .header(ACCEPT, EVENT_STREAM_MIME)
                .json(&request)
                .send()
                .await
                .map_err(Self::map_send_error)?;

            if !response.status().is_success() {
                return Err(Self::parse_error(response).await);
            }

            let is_event_stream = response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|value| value.to_str().ok())
                .is_some_and(|value| value.starts_with(EVENT_STREAM_MIME));

            let bytes = response.bytes_stream();
            if is_event_stream {
                Ok(decode_event_stream(bytes))
            } else {
                Ok(decode_chunked_body(bytes))
            }
        })
    }
}

/// Decodes an SSE body into wire events, bracketed by `Open` and `Closed` ready states.
pub fn decode_event_stream<'a, S, B, E>(bytes: S) -> WireEventStream<'a>
where
    S: Stream<Item = Result<B, E>> + Send + 'a,
    B: AsRef<[u8]> + Send + 'a,
    E: Display + Send + 'a,
{
    let stream = try_stream! {
        yield WireEvent::ReadyState(ReadyState::Open);

        let mut events = Box::pin(bytes.eventsource());
        while let Some(event) = events.next().await {
            let event = event.map_err(interrupted)?;
            if let Some(wire_event) = map_sse_event(&event.event, event.data)? {
                yield wire_event;
            }
        }

        yield WireEvent::ReadyState(ReadyState::Closed);
    };

    Box::pin(stream)
}

/// Collects an unframed body into a single `Chunk` so a snapshot line is never split.
pub fn decode_chunked_body<'a, S, B, E>(bytes: S) -> WireEventStream<'a>
where
    S: Stream<Item = Result<B, E>> + Send + 'a,
    B: AsRef<[u8]> + Send + 'a,
    E: Display + Send + 'a,
{
    let stream = try_stream! {
        yield WireEvent::ReadyState(ReadyState::Open);

        let mut bytes = Box::pin(bytes);
        let mut body = Vec::new();
        while let Some(chunk) = bytes.next().await {
            let chunk = chunk.map_err(interrupted)?;
            body.extend_from_slice(chunk.as_ref());
        }

        let text = String::from_utf8(body)
            .map_err(|err| BotError::stream_protocol(format!("reply was not valid UTF-8: {err}")))?;

        yield WireEvent::Chunk(text);
        yield WireEvent::ReadyState(ReadyState::Closed);
    };

    Box::pin(stream)
}

/// Maps one SSE event by name; unknown names are skipped, `error` ends the stream.
pub fn map_sse_event(name: &str, data: String) -> Result<Option<WireEvent>, BotError> {
    match name {
        "" | "message" => Ok(Some(WireEvent::Message(data))),
        "completion" => Ok(Some(WireEvent::Completion(data))),
        "readystatechange" => Ok(ReadyState::from_code(&data).map(WireEvent::ReadyState)),
        "error" => {
            let message = extract_error_message(&data)
                .or_else(|| (!data.trim().is_empty()).then(|| data.trim().to_string()))
                .unwrap_or_else(|| "The chat service reported a stream error.".to_string());
            Err(BotError::stream_transport(message))
        }
        _ => Ok(None),
    }
}

fn interrupted<E: Display>(err: E) -> BotError {
    BotError::stream_transport(format!(
        "The connection to the chat service was interrupted: {err}"
    ))
}
