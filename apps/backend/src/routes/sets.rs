//! Flashcard set endpoints

use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::services::consistency;
use crate::AppState;

/// GET /api/flashcard-sets
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListSetsQuery>,
) -> Result<Json<Vec<FlashcardSetWithOwner>>> {
    let sets = state.db.list_sets(query.owner_id, query.is_public).await?;

    let mut owner_ids: Vec<Uuid> = sets.iter().map(|s| s.created_by).collect();
    owner_ids.sort_unstable();
    owner_ids.dedup();

    let owners: HashMap<Uuid, SetOwner> = state
        .db
        .get_users_by_ids(&owner_ids)
        .await?
        .into_iter()
        .map(|u| (u.id, u.to_owner()))
        .collect();

    let annotated = sets
        .iter()
        .map(|s| s.with_owner(owners.get(&s.created_by).cloned()))
        .collect();

    Ok(Json(annotated))
}

/// POST /api/flashcard-sets
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<CreateSetRequest>,
) -> Result<(StatusCode, Json<FlashcardSetResponse>)> {
    let set = consistency::create_set(&state.db, payload).await?;
    Ok((StatusCode::CREATED, Json(set.to_response())))
}

/// GET /api/flashcard-sets/:id
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<FlashcardSetDetail>> {
    let set_id = parse_set_id(&id)?;
    let set = state
        .db
        .get_set(set_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Flashcard set not found".to_string()))?;

    let owner = state
        .db
        .get_user_by_id(set.created_by)
        .await?
        .map(|u| u.to_owner());
    let cards = state.db.get_cards_by_set(set_id).await?;

    Ok(Json(FlashcardSetDetail {
        set: set.with_owner(owner),
        cards,
    }))
}

/// PUT /api/flashcard-sets/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateSetRequest>,
) -> Result<Json<FlashcardSetResponse>> {
    let set_id = parse_set_id(&id)?;
    if payload.title.trim().is_empty() {
        return Err(ApiError::BadRequest("title is required".to_string()));
    }

    let set = state
        .db
        .update_set_fields(
            set_id,
            &payload.title,
            payload.description.as_deref(),
            payload.is_public,
        )
        .await?
        .ok_or_else(|| ApiError::NotFound("Flashcard set not found".to_string()))?;

    Ok(Json(set.to_response()))
}

/// DELETE /api/flashcard-sets/:id
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    let set_id = parse_set_id(&id)?;
    let deleted_cards = consistency::delete_set(&state.db, set_id).await?;

    Ok(Json(serde_json::json!({
        "message": "Flashcard set deleted successfully",
        "deleted_cards": deleted_cards,
    })))
}

fn parse_set_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).map_err(|_| ApiError::Parse(format!("invalid set id: {raw}")))
}
