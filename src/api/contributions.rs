//! Contribution admin endpoints used by the submission and review flows.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use super::{success, ApiResult};
use crate::errors::AppError;
use crate::models::{Contribution, CreateContributionRequest, UpdateStatusRequest};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub username: String,
}

/// GET /api/contributions?username= - List a user's contributions.
pub async fn list_contributions(
    State(state): State<AppState>,
    Query(params): Query<ListQuery>,
) -> ApiResult<Vec<Contribution>> {
    let contributions = state.store.get_contributions(&params.username).await?;
    success(contributions)
}

/// POST /api/contributions - Record a new contribution.
pub async fn create_contribution(
    State(state): State<AppState>,
    Json(request): Json<CreateContributionRequest>,
) -> ApiResult<Contribution> {
    if request.username.trim().is_empty() {
        return Err(AppError::Validation("Username is required".to_string()));
    }
    if request.private_channel.trim().is_empty() {
        return Err(AppError::Validation("Private channel is required".to_string()));
    }
    if request.text.trim().is_empty() {
        return Err(AppError::Validation("Text is required".to_string()));
    }

    let contribution = state.store.create_contribution(&request).await?;
    tracing::info!(
        rollback_id = %contribution.rollback_id(),
        username = %contribution.username,
        "Recorded contribution"
    );
    success(contribution)
}

/// PUT /api/contributions/{id}/{sequence}/status - Record a review outcome.
pub async fn update_status(
    State(state): State<AppState>,
    Path((id, sequence)): Path<(String, String)>,
    Json(request): Json<UpdateStatusRequest>,
) -> ApiResult<Contribution> {
    let contribution = state
        .store
        .update_status(&id, &sequence, request.status)
        .await?;

    if contribution.status.is_final() {
        if let Err(e) = state.responder.notify_review(&contribution).await {
            tracing::warn!("Failed to notify contributor: {}", e);
        }
    }

    success(contribution)
}
