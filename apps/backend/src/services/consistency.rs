//! Set/card consistency service.
//!
//! The store has no cross-table transactions and no foreign keys, so every
//! multi-step mutation here is an ordered sequence of independent database
//! calls. The ordering is chosen so that a failure partway through leaves an
//! orphaned-but-harmless state (an empty set, an untracked card) rather than
//! a dangling reference. Nothing is rolled back; partial completion is
//! accepted and logged.

use uuid::Uuid;

use crate::db::Database;
use crate::error::{ApiError, Result};
use crate::models::{CardContent, CreateCardRequest, CreateSetRequest, DbCard, DbFlashcardSet};

/// Outcome of a user cascade delete.
#[derive(Debug, Clone, Copy)]
pub struct CascadeOutcome {
    pub deleted_sets: usize,
    pub deleted_cards: usize,
}

/// Create a flashcard set, empty unless initial cards were supplied.
///
/// With initial cards this composes with [`replace_set_cards`], so the set
/// row itself never embeds card bodies.
pub async fn create_set(db: &Database, request: CreateSetRequest) -> Result<DbFlashcardSet> {
    let created_by = request
        .created_by
        .ok_or_else(|| ApiError::BadRequest("created_by is required".to_string()))?;
    if request.title.trim().is_empty() {
        return Err(ApiError::BadRequest("title is required".to_string()));
    }

    let mut set = db
        .insert_set(
            &request.title,
            request.description.as_deref(),
            request.is_public,
            created_by,
        )
        .await?;

    if !request.cards.is_empty() {
        let cards = replace_set_cards(db, set.id, &request.cards).await?;
        set.card_ids = cards.iter().map(|c| c.id).collect();
    }

    tracing::info!(set_id = %set.id, owner = %created_by, "created flashcard set");
    Ok(set)
}

/// Insert one card, then append its id to the owning set's card list.
///
/// When the append matches no set the card is left orphaned and the call
/// still succeeds; re-submitting is the caller's decision and will create a
/// second, distinct card.
pub async fn add_card(db: &Database, request: CreateCardRequest) -> Result<DbCard> {
    validate_card_fields(&request.term, &request.definition)?;

    let card = db
        .insert_card(
            &request.term,
            &request.definition,
            request.reference.as_deref(),
            request.flashcard_set_id,
        )
        .await?;

    let appended = db
        .append_card_id(request.flashcard_set_id, card.id)
        .await?;
    if !appended {
        tracing::warn!(
            card_id = %card.id,
            set_id = %request.flashcard_set_id,
            "owning set not found after card insert; card is orphaned"
        );
    }

    Ok(card)
}

/// Full replace of a set's cards: delete the old rows, insert the new list,
/// then overwrite the set's card id list, in that order.
///
/// Card identities are not preserved across a replace.
pub async fn replace_set_cards(
    db: &Database,
    set_id: Uuid,
    cards: &[CardContent],
) -> Result<Vec<DbCard>> {
    if db.get_set(set_id).await?.is_none() {
        return Err(ApiError::NotFound("Flashcard set not found".to_string()));
    }
    for card in cards {
        validate_card_fields(&card.term, &card.definition)?;
    }

    let removed = db.delete_cards_by_set(set_id).await?;
    let inserted = db.insert_cards(set_id, cards).await?;
    let card_ids: Vec<Uuid> = inserted.iter().map(|c| c.id).collect();
    db.set_card_ids(set_id, &card_ids).await?;

    tracing::debug!(%set_id, removed, inserted = inserted.len(), "replaced set cards");
    Ok(inserted)
}

/// Delete every card of a set and empty its card list.
pub async fn clear_set_cards(db: &Database, set_id: Uuid) -> Result<usize> {
    if db.get_set(set_id).await?.is_none() {
        return Err(ApiError::NotFound("Flashcard set not found".to_string()));
    }

    let deleted = db.delete_cards_by_set(set_id).await?;
    db.set_card_ids(set_id, &[]).await?;

    Ok(deleted)
}

/// Delete a set and its cards. Cards go first, so an interruption leaves an
/// empty set rather than cards pointing at a vanished set.
pub async fn delete_set(db: &Database, set_id: Uuid) -> Result<usize> {
    if db.get_set(set_id).await?.is_none() {
        return Err(ApiError::NotFound("Flashcard set not found".to_string()));
    }

    let deleted_cards = db.delete_cards_by_set(set_id).await?;
    db.delete_set_row(set_id).await?;

    tracing::info!(%set_id, deleted_cards, "deleted flashcard set");
    Ok(deleted_cards)
}

/// Delete a user, then every set they own (composing the per-set cascade).
///
/// A failure after the user row is gone leaves the remaining sets in place;
/// there is no rollback.
pub async fn delete_user_cascade(db: &Database, user_id: Uuid) -> Result<CascadeOutcome> {
    let set_ids = db.get_set_ids_by_owner(user_id).await?;

    if !db.delete_user(user_id).await? {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    let mut deleted_cards = 0;
    let mut deleted_sets = 0;
    for set_id in &set_ids {
        deleted_cards += db.delete_cards_by_set(*set_id).await?;
        if db.delete_set_row(*set_id).await? {
            deleted_sets += 1;
        }
    }

    tracing::info!(%user_id, deleted_sets, deleted_cards, "deleted user account");
    Ok(CascadeOutcome {
        deleted_sets,
        deleted_cards,
    })
}

fn validate_card_fields(term: &str, definition: &str) -> Result<()> {
    if term.trim().is_empty() {
        return Err(ApiError::BadRequest("term is required".to_string()));
    }
    if definition.trim().is_empty() {
        return Err(ApiError::BadRequest("definition is required".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_card_fields() {
        assert!(validate_card_fields("term", "definition").is_ok());
        assert!(validate_card_fields("", "definition").is_err());
        assert!(validate_card_fields("term", "   ").is_err());
    }
}
