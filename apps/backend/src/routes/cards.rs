//! Card endpoints

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::services::consistency;
use crate::AppState;

/// GET /api/cards?flashcard_set_ids=a,b,c
///
/// Groups cards by owning set; sets without cards are omitted.
pub async fn list_grouped(
    State(state): State<AppState>,
    Query(query): Query<CardsQuery>,
) -> Result<Json<Vec<CardGroup>>> {
    let set_ids = query
        .flashcard_set_ids
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            Uuid::parse_str(s).map_err(|_| ApiError::Parse(format!("invalid set id: {s}")))
        })
        .collect::<Result<Vec<Uuid>>>()?;

    let groups = state.db.count_and_group_cards(&set_ids).await?;
    Ok(Json(groups))
}

/// POST /api/cards
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<CreateCardRequest>,
) -> Result<(StatusCode, Json<DbCard>)> {
    let card = consistency::add_card(&state.db, payload).await?;
    Ok((StatusCode::CREATED, Json(card)))
}

/// PUT /api/cards
///
/// Full replace of a set's cards; pre-existing card identities are not kept.
pub async fn replace(
    State(state): State<AppState>,
    Json(payload): Json<ReplaceCardsRequest>,
) -> Result<Json<CardGroup>> {
    let cards =
        consistency::replace_set_cards(&state.db, payload.flashcard_set_id, &payload.cards)
            .await?;

    Ok(Json(CardGroup {
        flashcard_set_id: payload.flashcard_set_id,
        card_count: cards.len(),
        cards,
    }))
}

/// DELETE /api/cards
pub async fn delete_for_set(
    State(state): State<AppState>,
    Json(payload): Json<DeleteCardsRequest>,
) -> Result<Json<DeleteCardsResponse>> {
    let deleted_count = consistency::clear_set_cards(&state.db, payload.flashcard_set_id).await?;
    Ok(Json(DeleteCardsResponse { deleted_count }))
}
