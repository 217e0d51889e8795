//! HTTP payload serde models for the chat service.

use cbcommon::{ConversationId, MessageId};
use serde::{Deserialize, Serialize};

use crate::{BotError, GenerationSettings};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupCreateRequest {
    pub app_id: u32,
}

impl GroupCreateRequest {
    pub fn new(settings: &GenerationSettings) -> Self {
        Self {
            app_id: settings.group_app_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GroupCreateResponse {
    #[serde(default)]
    pub data: Option<GroupData>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GroupData {
    #[serde(default)]
    pub id: Option<GroupId>,
}

impl GroupCreateResponse {
    pub fn conversation_id(&self) -> Result<ConversationId, BotError> {
        self.data
            .as_ref()
            .and_then(|data| data.id.as_ref())
            .map(GroupId::to_conversation_id)
            .ok_or_else(|| {
                let detail = self.message.as_deref().unwrap_or("response carried no data.id");
                BotError::conversation_creation(format!("conversation was not created: {detail}"))
            })
    }
}

/// The service issues numeric group ids but the adapter stores them as strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GroupId {
    Number(i64),
    Text(String),
}

impl GroupId {
    pub fn to_conversation_id(&self) -> ConversationId {
        match self {
            Self::Number(value) => ConversationId::new(value.to_string()),
            Self::Text(value) => ConversationId::new(value.clone()),
        }
    }
}

impl From<&ConversationId> for GroupId {
    fn from(value: &ConversationId) -> Self {
        let raw = value.as_str();
        let canonical_number = raw
            .parse::<i64>()
            .ok()
            .filter(|number| number.to_string() == raw);

        match canonical_number {
            Some(number) => Self::Number(number),
            None => Self::Text(raw.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatProcessRequest {
    pub app_id: Option<u32>,
    pub options: ChatProcessOptions,
    pub prompt: String,
    pub system_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatProcessOptions {
    pub group_id: GroupId,
    pub model: u32,
    pub temperature: f32,
    pub using_network: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_message_id: Option<String>,
}

impl ChatProcessRequest {
    pub fn new(
        conversation_id: &ConversationId,
        parent_message_id: Option<&MessageId>,
        prompt: impl Into<String>,
        settings: &GenerationSettings,
    ) -> Self {
        Self {
            app_id: None,
            options: ChatProcessOptions {
                group_id: GroupId::from(conversation_id),
                model: settings.model,
                temperature: settings.temperature,
                using_network: settings.using_network,
                parent_message_id: parent_message_id.map(|id| id.as_str().to_string()),
            },
            prompt: prompt.into(),
            system_message: settings.system_message.clone(),
        }
    }
}

/// One line of a chunked-line JSON reply; each line is a full snapshot.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReplySnapshot {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CompletionPayload {
    #[serde(default)]
    pub completion: String,
}

/// A typed `message` event. `msg` stays raw because its shape depends on `event`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MessageEnvelope {
    #[serde(default)]
    pub event: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub msg: Option<serde_json::Value>,
}

impl MessageEnvelope {
    /// Decodes `msg` as search progress; `None` when absent or shaped differently.
    pub fn search_progress(&self) -> Option<SearchProgress> {
        let msg = self.msg.as_ref()?;
        SearchProgress::deserialize(msg).ok()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SearchProgress {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub num: Option<u64>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl SearchProgress {
    /// Result count, read from `count`, then `num`, then `total`.
    pub fn result_count(&self) -> u64 {
        self.count.or(self.num).or(self.total).unwrap_or_default()
    }
}

/// Failure line the chat endpoint writes into a successful response body.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FailureBody {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl FailureBody {
    pub fn is_failure(&self) -> bool {
        self.status
            .as_deref()
            .is_some_and(|status| status.eq_ignore_ascii_case("fail"))
            || self.message.is_some()
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    msg: Option<String>,
}

pub fn extract_error_message(body: &str) -> Option<String> {
    let parsed = serde_json::from_str::<ErrorBody>(body).ok()?;
    parsed.message.or(parsed.msg)
}
