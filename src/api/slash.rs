//! Slack slash-command callback.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Form,
};
use serde::Deserialize;

use crate::commands::Command;
use crate::errors::AppError;
use crate::models::CommandResponse;
use crate::AppState;

/// Form fields Slack sends with a slash command. Unused fields are ignored.
#[derive(Debug, Deserialize)]
pub struct SlashCommandForm {
    pub user_id: String,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub channel_id: Option<String>,
    #[serde(default)]
    pub text: String,
}

impl IntoResponse for CommandResponse {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, [(header::CONTENT_TYPE, self.content_type)], self.body).into_response()
    }
}

/// POST /slack/commands - Answer a slash command.
pub async fn slash_command(
    State(state): State<AppState>,
    Form(form): Form<SlashCommandForm>,
) -> Result<CommandResponse, AppError> {
    let command = Command::parse(&form.text);
    tracing::info!(
        user_id = %form.user_id,
        user_name = form.user_name.as_deref().unwrap_or_default(),
        channel_id = form.channel_id.as_deref().unwrap_or_default(),
        ?command,
        "Slash command received"
    );

    match command {
        Command::Help => Ok(state.responder.help()),
        Command::List => state.responder.list(&form.user_id).await,
        Command::Rollback(rollback_id) => state.responder.rollback(rollback_id.as_deref()).await,
    }
}
