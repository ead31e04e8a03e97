//! Database models and API types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// Re-export shared types from recall-core
pub use recall_core::types::CardContent;

// === Database Entity Types ===

/// User account stored in PostgreSQL
#[derive(Debug, Clone, FromRow)]
pub struct DbUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub profile_picture: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_edited_at: DateTime<Utc>,
}

impl DbUser {
    /// Sanitized projection returned to clients. Never includes the
    /// password hash.
    pub fn to_profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
            profile_picture: self.profile_picture.clone(),
            last_edited_at: self.last_edited_at,
        }
    }

    /// Minimal projection used to annotate sets with their owner.
    pub fn to_owner(&self) -> SetOwner {
        SetOwner {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
        }
    }
}

/// Flashcard set stored in PostgreSQL.
///
/// `card_ids` is the set side of the set/card relationship; the cards table
/// holds the back-references. The consistency service keeps both in step.
#[derive(Debug, Clone, FromRow)]
pub struct DbFlashcardSet {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub is_public: bool,
    pub created_by: Uuid,
    pub card_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DbFlashcardSet {
    /// Convert to the plain API shape (owner as a bare id).
    pub fn to_response(&self) -> FlashcardSetResponse {
        FlashcardSetResponse {
            id: self.id,
            title: self.title.clone(),
            description: self.description.clone(),
            is_public: self.is_public,
            created_by: self.created_by,
            card_count: self.card_ids.len(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    /// Convert to the annotated API shape with the owner projection filled
    /// in by the caller.
    pub fn with_owner(&self, owner: Option<SetOwner>) -> FlashcardSetWithOwner {
        FlashcardSetWithOwner {
            id: self.id,
            title: self.title.clone(),
            description: self.description.clone(),
            is_public: self.is_public,
            created_by: owner,
            card_count: self.card_ids.len(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Card stored in PostgreSQL
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbCard {
    pub id: Uuid,
    pub term: String,
    pub definition: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    pub flashcard_set_id: Uuid,
}

// === API Response Types ===

/// Sanitized user returned by login and profile endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub profile_picture: Option<String>,
    pub last_edited_at: DateTime<Utc>,
}

/// Owner annotation on set responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetOwner {
    pub id: Uuid,
    pub username: String,
    pub email: String,
}

/// Set as returned by create/update (owner as a bare id)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlashcardSetResponse {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub is_public: bool,
    pub created_by: Uuid,
    pub card_count: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Set annotated with its owner projection, as returned by list/get
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlashcardSetWithOwner {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub is_public: bool,
    /// `None` only when the owner row is missing (a partial-cascade gap).
    pub created_by: Option<SetOwner>,
    pub card_count: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Set detail: the annotated set plus its cards
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlashcardSetDetail {
    #[serde(flatten)]
    pub set: FlashcardSetWithOwner,
    pub cards: Vec<DbCard>,
}

/// Cards grouped under one owning set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardGroup {
    pub flashcard_set_id: Uuid,
    pub card_count: usize,
    pub cards: Vec<DbCard>,
}

// === API Request Types ===

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateSetRequest {
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub is_public: bool,
    pub created_by: Option<Uuid>,
    /// Optional initial cards; the one-request create-with-cards flow.
    #[serde(default)]
    pub cards: Vec<CardContent>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateSetRequest {
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub is_public: bool,
}

#[derive(Debug, Deserialize)]
pub struct ListSetsQuery {
    pub owner_id: Option<Uuid>,
    pub is_public: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct CardsQuery {
    /// Comma-separated set ids.
    pub flashcard_set_ids: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateCardRequest {
    pub term: String,
    pub definition: String,
    pub reference: Option<String>,
    pub flashcard_set_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReplaceCardsRequest {
    pub flashcard_set_id: Uuid,
    pub cards: Vec<CardContent>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteCardsRequest {
    pub flashcard_set_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteCardsResponse {
    pub deleted_count: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteAccountRequest {
    pub user_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteAccountResponse {
    pub deleted_sets: usize,
    pub deleted_cards: usize,
}
