//! Slash-command responses.
//!
//! Every operation turns a command into a [`CommandResponse`]. Store and chat
//! failures propagate to the caller; only a missing rollback id is answered
//! with a friendly message.

use std::sync::Arc;

use crate::config::{Config, ConfigKey};
use crate::db::ContributionStore;
use crate::errors::AppError;
use crate::models::{
    Attachment, CommandResponse, Contribution, EphemeralMessage, ListingMessage, RollbackId,
    Status,
};
use crate::slack::ChatClient;

pub const NO_CONTRIBUTIONS_TEXT: &str =
    "You do not have any contributions. Submit one by sending a private message to Ossitron-2000!";
pub const LISTING_TEXT: &str = "Here is the listing of your open source contribution submissions";
pub const MISSING_ROLLBACK_ID_TEXT: &str = "Pass rollback id to delete entry";

const HELP_LINES: &[&str] = &[
    "*Hi there!*",
    "",
    "My name is Ossi (a.k.a Ossitron-2000) :robot_face:, and I'm here to record your Open Source Contributions. :gem:",
    "",
    "You can send me (Ossitron-2000) a *private message* which describes your contribution. Then I will ask, if you want to submit given contribution. \
     If you decide to submit, I will store the contribution and notify my management channel about your contribution.",
    "",
    "When your contribution gets processed, I will notify you back.",
    "",
    "If you have questions about the process contact Valtteri Valovirta. If I'm broken contact Juho Friman.",
    "",
    "I have additional features under this slash command. My slash commands are all _ephemeral_ which means only you see the results. So feel free to shoot slash commands at any channel.",
    "",
    "`help` shows this help",
    "`list` lists your submitted contributions",
    "`rollback ROLLBACK_ID` deletes the contribution with the given rollback id, as shown by `list`",
    "",
    "_Information about the policy_: https://intra.solita.fi/pages/viewpage.action?pageId=76514684",
    "_My source code_: https://github.com/solita/ossi-bot",
];

/// Answers `help`, `list` and `rollback`, and sends review notifications.
#[derive(Clone)]
pub struct CommandResponder {
    store: Arc<dyn ContributionStore>,
    chat: Arc<dyn ChatClient>,
    config: Arc<Config>,
}

impl CommandResponder {
    pub fn new(
        store: Arc<dyn ContributionStore>,
        chat: Arc<dyn ChatClient>,
        config: Arc<Config>,
    ) -> Self {
        Self {
            store,
            chat,
            config,
        }
    }

    /// Usage message. Never fails; missing deployment labels render blank.
    pub fn help(&self) -> CommandResponse {
        let (version, environment) = match self.deployment() {
            Ok(labels) => labels,
            Err(e) => {
                tracing::error!("Something went wrong with fetching config: {}", e);
                ("", "")
            }
        };

        let mut message = HELP_LINES.join("\n");
        message.push_str(&format!("\n_Deployment_: {} {}", version, environment));
        CommandResponse::text(message)
    }

    fn deployment(&self) -> Result<(&str, &str), AppError> {
        Ok((
            self.config.get(ConfigKey::Version)?,
            self.config.get(ConfigKey::Environment)?,
        ))
    }

    /// Contributions reported by `user_id`, one attachment each, in store order.
    pub async fn list(&self, user_id: &str) -> Result<CommandResponse, AppError> {
        let contributions = self.store.get_contributions(user_id).await?;
        tracing::debug!(user_id, count = contributions.len(), "Listing contributions");

        let message = if contributions.is_empty() {
            ListingMessage {
                text: NO_CONTRIBUTIONS_TEXT.to_string(),
                attachments: Vec::new(),
            }
        } else {
            ListingMessage {
                text: LISTING_TEXT.to_string(),
                attachments: contributions.iter().map(Attachment::from).collect(),
            }
        };

        Ok(CommandResponse::json(&message)?)
    }

    /// Delete the contribution named by `rollback_id`. Irreversible.
    ///
    /// Surrounding whitespace is ignored when decoding; the confirmation
    /// echoes the id exactly as given.
    pub async fn rollback(&self, rollback_id: Option<&str>) -> Result<CommandResponse, AppError> {
        let rollback_id = match rollback_id {
            Some(value) if !value.trim().is_empty() => value,
            _ => {
                return Ok(CommandResponse::json(&EphemeralMessage::new(
                    MISSING_ROLLBACK_ID_TEXT,
                ))?)
            }
        };

        let RollbackId { id, sequence } = RollbackId::parse(rollback_id.trim())?;
        self.store.delete_entry(&id, &sequence).await?;
        tracing::info!(rollback_id, "Rolled back contribution");

        Ok(CommandResponse::json(&EphemeralMessage::new(format!(
            "OK, I deleted your contribution with ID: {}",
            rollback_id
        )))?)
    }

    /// Tell the contributor about a status change on their private channel.
    pub async fn notify_review(&self, contribution: &Contribution) -> Result<(), AppError> {
        let text = match contribution.status {
            Status::Accepted => "Your contribution has been processed. It was accepted.".to_string(),
            Status::Declined => "Your contribution has been processed. It was declined.".to_string(),
            other => format!("Your contribution has been updated to {}.", other),
        };

        self.chat
            .post_message(
                &contribution.private_channel,
                &text,
                &[Attachment::from(contribution)],
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CreateContributionRequest, Size};
    use async_trait::async_trait;
    use serde_json::Value;
    use std::path::PathBuf;
    use std::sync::Mutex;

    /// In-memory store recording every call it receives.
    #[derive(Default)]
    struct FakeStore {
        contributions: Mutex<Vec<Contribution>>,
        calls: Mutex<Vec<String>>,
        fail: bool,
    }

    impl FakeStore {
        fn with(contributions: Vec<Contribution>) -> Self {
            Self {
                contributions: Mutex::new(contributions),
                ..Default::default()
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: String) -> Result<(), AppError> {
            self.calls.lock().unwrap().push(call);
            if self.fail {
                return Err(AppError::Database("store unavailable".to_string()));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl ContributionStore for FakeStore {
        async fn get_contributions(&self, user_id: &str) -> Result<Vec<Contribution>, AppError> {
            self.record(format!("get_contributions({})", user_id))?;
            Ok(self
                .contributions
                .lock()
                .unwrap()
                .iter()
                .filter(|c| c.username == user_id)
                .cloned()
                .collect())
        }

        async fn delete_entry(&self, id: &str, sequence: &str) -> Result<(), AppError> {
            self.record(format!("delete_entry({},{})", id, sequence))?;
            let mut contributions = self.contributions.lock().unwrap();
            let before = contributions.len();
            contributions.retain(|c| !(c.id == id && c.sequence == sequence));
            if contributions.len() == before {
                return Err(AppError::NotFound(format!("{}-{}", id, sequence)));
            }
            Ok(())
        }

        async fn create_contribution(
            &self,
            _request: &CreateContributionRequest,
        ) -> Result<Contribution, AppError> {
            unimplemented!("not used by the responder")
        }

        async fn get_contribution(
            &self,
            _id: &str,
            _sequence: &str,
        ) -> Result<Option<Contribution>, AppError> {
            unimplemented!("not used by the responder")
        }

        async fn update_status(
            &self,
            _id: &str,
            _sequence: &str,
            _status: Status,
        ) -> Result<Contribution, AppError> {
            unimplemented!("not used by the responder")
        }
    }

    #[derive(Default)]
    struct RecordingChat {
        posts: Mutex<Vec<(String, String, Vec<Attachment>)>>,
    }

    #[async_trait]
    impl ChatClient for RecordingChat {
        async fn post_message(
            &self,
            channel: &str,
            text: &str,
            attachments: &[Attachment],
        ) -> Result<(), AppError> {
            self.posts.lock().unwrap().push((
                channel.to_string(),
                text.to_string(),
                attachments.to_vec(),
            ));
            Ok(())
        }
    }

    fn config(version: Option<&str>, environment: Option<&str>) -> Arc<Config> {
        Arc::new(Config {
            api_psk: None,
            db_path: PathBuf::from("unused.sqlite"),
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            log_level: "warn".to_string(),
            slack_api_url: "http://127.0.0.1:9/api".to_string(),
            slack_token: None,
            version: version.map(str::to_string),
            environment: environment.map(str::to_string),
        })
    }

    fn contribution(id: &str, status: Status, text: &str) -> Contribution {
        Contribution {
            id: id.to_string(),
            sequence: "1".to_string(),
            timestamp: 1_546_300_800_000,
            username: "U1".to_string(),
            private_channel: "D1".to_string(),
            size: Size::Small,
            status,
            text: text.to_string(),
        }
    }

    fn responder(store: Arc<FakeStore>) -> (CommandResponder, Arc<RecordingChat>) {
        let chat = Arc::new(RecordingChat::default());
        let responder = CommandResponder::new(store, chat.clone(), config(Some("1.0.0"), Some("dev")));
        (responder, chat)
    }

    fn body(response: &CommandResponse) -> Value {
        serde_json::from_str(&response.body).unwrap()
    }

    #[test]
    fn test_help_includes_commands_and_deployment() {
        let (responder, _) = responder(Arc::new(FakeStore::default()));
        let response = responder.help();

        assert_eq!(response.status_code, 200);
        assert!(response.body.starts_with("*Hi there!*"));
        assert!(response.body.contains("`help` shows this help"));
        assert!(response.body.contains("`list` lists your submitted contributions"));
        assert!(response.body.contains("`rollback ROLLBACK_ID`"));
        assert!(response.body.ends_with("_Deployment_: 1.0.0 dev"));
    }

    #[test]
    fn test_help_survives_missing_config() {
        let responder = CommandResponder::new(
            Arc::new(FakeStore::default()),
            Arc::new(RecordingChat::default()),
            config(Some("1.0.0"), None),
        );
        let response = responder.help();

        assert_eq!(response.status_code, 200);
        assert!(response.body.contains("_Deployment_:"));
        assert!(!response.body.contains("1.0.0"));
    }

    #[tokio::test]
    async fn test_list_empty() {
        let store = Arc::new(FakeStore::default());
        let (responder, _) = responder(store.clone());
        let response = responder.list("U1").await.unwrap();

        assert_eq!(response.status_code, 200);
        assert!(response.body.contains("do not have any contributions"));
        assert!(!response.body.contains("attachments"));
        assert_eq!(store.calls(), ["get_contributions(U1)"]);
    }

    #[tokio::test]
    async fn test_list_colors_in_input_order() {
        let store = Arc::new(FakeStore::with(vec![
            contribution("a1", Status::Pending, "first"),
            contribution("b2", Status::Declined, "second"),
        ]));
        let (responder, _) = responder(store);
        let response = responder.list("U1").await.unwrap();
        let body = body(&response);

        assert_eq!(body["text"], LISTING_TEXT);
        let attachments = body["attachments"].as_array().unwrap();
        assert_eq!(attachments.len(), 2);
        assert_eq!(attachments[0]["color"], "#ffff00");
        assert_eq!(attachments[0]["text"], "first");
        assert_eq!(attachments[1]["color"], "#ff0000");
        assert_eq!(attachments[1]["text"], "second");
    }

    #[tokio::test]
    async fn test_list_fields() {
        let store = Arc::new(FakeStore::with(vec![contribution(
            "a1",
            Status::Initial,
            "first",
        )]));
        let (responder, _) = responder(store);
        let body = body(&responder.list("U1").await.unwrap());
        let attachment = &body["attachments"][0];

        assert!(attachment.get("color").is_none());
        assert_eq!(attachment["fallback"], "fallback");
        assert_eq!(
            attachment["fields"],
            serde_json::json!([
                {"title": "Size", "value": "SMALL", "short": true},
                {"title": "Status", "value": "INITIAL", "short": true},
                {"title": "Rollback ID", "value": "a1-1", "short": true},
            ])
        );
    }

    #[tokio::test]
    async fn test_list_propagates_store_failure() {
        let store = Arc::new(FakeStore {
            fail: true,
            ..Default::default()
        });
        let (responder, _) = responder(store);
        assert!(matches!(
            responder.list("U1").await,
            Err(AppError::Database(_))
        ));
    }

    #[tokio::test]
    async fn test_rollback_without_id() {
        let store = Arc::new(FakeStore::default());
        let (responder, _) = responder(store.clone());

        for input in [None, Some(""), Some("   ")] {
            let response = responder.rollback(input).await.unwrap();
            assert_eq!(response.status_code, 200);
            assert_eq!(
                body(&response),
                serde_json::json!({
                    "response_type": "ephemeral",
                    "text": MISSING_ROLLBACK_ID_TEXT
                })
            );
        }
        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn test_rollback_deletes_entry() {
        let store = Arc::new(FakeStore::with(vec![contribution(
            "abc123",
            Status::Pending,
            "x",
        )]));
        let (responder, _) = responder(store.clone());
        let response = responder.rollback(Some("abc123-1")).await.unwrap();

        assert_eq!(store.calls(), ["delete_entry(abc123,1)"]);
        let body = body(&response);
        assert_eq!(body["response_type"], "ephemeral");
        assert_eq!(
            body["text"],
            "OK, I deleted your contribution with ID: abc123-1"
        );
    }

    #[tokio::test]
    async fn test_rollback_echoes_id_as_given() {
        let store = Arc::new(FakeStore::with(vec![contribution(
            "abc123",
            Status::Pending,
            "x",
        )]));
        let (responder, _) = responder(store.clone());
        let response = responder.rollback(Some(" abc123-1 ")).await.unwrap();

        assert_eq!(store.calls(), ["delete_entry(abc123,1)"]);
        assert_eq!(
            body(&response)["text"],
            "OK, I deleted your contribution with ID:  abc123-1 "
        );
    }

    #[tokio::test]
    async fn test_rollback_splits_on_first_hyphen() {
        let store = Arc::new(FakeStore::default());
        let (responder, _) = responder(store.clone());
        let result = responder.rollback(Some("abc-1-2")).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert_eq!(store.calls(), ["delete_entry(abc,1-2)"]);
    }

    #[tokio::test]
    async fn test_rollback_without_separator_is_not_found() {
        let store = Arc::new(FakeStore::default());
        let (responder, _) = responder(store.clone());

        assert!(matches!(
            responder.rollback(Some("abc123")).await,
            Err(AppError::NotFound(_))
        ));
        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn test_rollback_propagates_store_failure() {
        let store = Arc::new(FakeStore {
            fail: true,
            ..Default::default()
        });
        let (responder, _) = responder(store);
        assert!(matches!(
            responder.rollback(Some("abc-1")).await,
            Err(AppError::Database(_))
        ));
    }

    #[tokio::test]
    async fn test_notify_review_posts_to_private_channel() {
        let (responder, chat) = responder(Arc::new(FakeStore::default()));
        let accepted = contribution("abc", Status::Accepted, "Upstreamed a fix");
        responder.notify_review(&accepted).await.unwrap();

        let posts = chat.posts.lock().unwrap();
        assert_eq!(posts.len(), 1);
        let (channel, text, attachments) = &posts[0];
        assert_eq!(channel, "D1");
        assert_eq!(text, "Your contribution has been processed. It was accepted.");
        assert_eq!(attachments[0].color.as_deref(), Some("#36a64f"));
        assert_eq!(attachments[0].text, "Upstreamed a fix");
    }
}
