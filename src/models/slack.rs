//! Slack message payloads produced for slash-command replies and notifications.

use serde::{Deserialize, Serialize};

use super::Contribution;

/// Reply visible only to the invoking user.
pub const EPHEMERAL: &str = "ephemeral";

/// Response relayed back to Slack as the slash-command callback result.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CommandResponse {
    pub status_code: u16,
    pub body: String,
    #[serde(skip)]
    pub content_type: &'static str,
}

impl CommandResponse {
    /// Plain text body.
    pub fn text(body: impl Into<String>) -> Self {
        Self {
            status_code: 200,
            body: body.into(),
            content_type: "text/plain; charset=utf-8",
        }
    }

    /// JSON-encoded body.
    pub fn json<T: Serialize>(payload: &T) -> Result<Self, serde_json::Error> {
        Ok(Self {
            status_code: 200,
            body: serde_json::to_string(payload)?,
            content_type: "application/json",
        })
    }
}

/// `{ response_type: "ephemeral", text }`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EphemeralMessage {
    pub response_type: String,
    pub text: String,
}

impl EphemeralMessage {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            response_type: EPHEMERAL.to_string(),
            text: text.into(),
        }
    }
}

/// A message with optional attachments.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListingMessage {
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
}

/// Colored sub-block rendering a single contribution.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Attachment {
    pub fallback: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub text: String,
    pub fields: Vec<AttachmentField>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AttachmentField {
    pub title: String,
    pub value: String,
    pub short: bool,
}

impl AttachmentField {
    pub fn short(title: &str, value: impl Into<String>) -> Self {
        Self {
            title: title.to_string(),
            value: value.into(),
            short: true,
        }
    }
}

impl From<&Contribution> for Attachment {
    fn from(contribution: &Contribution) -> Self {
        Self {
            fallback: "fallback".to_string(),
            color: contribution.status.color().map(str::to_string),
            text: contribution.text.clone(),
            fields: vec![
                AttachmentField::short("Size", contribution.size.as_str()),
                AttachmentField::short("Status", contribution.status.as_str()),
                AttachmentField::short("Rollback ID", contribution.rollback_id().to_string()),
            ],
        }
    }
}
