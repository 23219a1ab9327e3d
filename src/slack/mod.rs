//! Slack Web API client used for follow-up notifications.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header;
use serde::Serialize;

use crate::config::{Config, ConfigKey};
use crate::errors::AppError;
use crate::models::Attachment;

/// Outbound chat delivery.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Post a message to `channel`. Only completion is checked, not the reply body.
    async fn post_message(
        &self,
        channel: &str,
        text: &str,
        attachments: &[Attachment],
    ) -> Result<(), AppError>;
}

#[derive(Serialize)]
struct PostMessageRequest<'a> {
    attachments: &'a [Attachment],
    channel: &'a str,
    text: &'a str,
}

/// `chat.postMessage` over HTTPS with the bot bearer token.
pub struct SlackClient {
    client: reqwest::Client,
    config: Arc<Config>,
}

impl SlackClient {
    pub fn new(config: Arc<Config>) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat.postMessage",
            self.config.slack_api_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl ChatClient for SlackClient {
    async fn post_message(
        &self,
        channel: &str,
        text: &str,
        attachments: &[Attachment],
    ) -> Result<(), AppError> {
        let token = self.config.get(ConfigKey::SlackToken)?;

        let resp = self
            .client
            .post(self.endpoint())
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .json(&PostMessageRequest {
                attachments,
                channel,
                text,
            })
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AppError::Chat(format!(
                "Slack returned {}: {}",
                status.as_u16(),
                body
            )));
        }

        tracing::debug!(channel, "Posted Slack message");
        Ok(())
    }
}
