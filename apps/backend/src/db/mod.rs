//! PostgreSQL database operations

use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::models::*;

/// Database wrapper with connection pool
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Connect to PostgreSQL and create connection pool
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Run database migrations
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| ApiError::Migration(e.to_string()))?;
        Ok(())
    }

    /// Get the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    // === User Repository ===

    /// Insert a new user with an already-hashed password
    pub async fn insert_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<DbUser> {
        let user = sqlx::query_as::<_, DbUser>(
            r#"
            INSERT INTO users (username, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, username, email, password_hash, profile_picture,
                      created_at, last_edited_at
            "#,
        )
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Get user by email
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<DbUser>> {
        let user = sqlx::query_as::<_, DbUser>(
            r#"
            SELECT id, username, email, password_hash, profile_picture,
                   created_at, last_edited_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Get user by ID
    pub async fn get_user_by_id(&self, user_id: Uuid) -> Result<Option<DbUser>> {
        let user = sqlx::query_as::<_, DbUser>(
            r#"
            SELECT id, username, email, password_hash, profile_picture,
                   created_at, last_edited_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Get several users at once (for owner annotation of set listings)
    pub async fn get_users_by_ids(&self, user_ids: &[Uuid]) -> Result<Vec<DbUser>> {
        let users = sqlx::query_as::<_, DbUser>(
            r#"
            SELECT id, username, email, password_hash, profile_picture,
                   created_at, last_edited_at
            FROM users
            WHERE id = ANY($1)
            "#,
        )
        .bind(user_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Persist profile changes (username, password hash, picture, edit time)
    pub async fn update_user(&self, user: &DbUser) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET username = $2,
                password_hash = $3,
                profile_picture = $4,
                last_edited_at = $5
            WHERE id = $1
            "#,
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(&user.profile_picture)
        .bind(user.last_edited_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Delete a user row
    pub async fn delete_user(&self, user_id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    // === Flashcard Set Repository ===

    /// Insert a new set with an empty card list
    pub async fn insert_set(
        &self,
        title: &str,
        description: Option<&str>,
        is_public: bool,
        created_by: Uuid,
    ) -> Result<DbFlashcardSet> {
        let set = sqlx::query_as::<_, DbFlashcardSet>(
            r#"
            INSERT INTO flashcard_sets (title, description, is_public, created_by)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, description, is_public, created_by, card_ids,
                      created_at, updated_at
            "#,
        )
        .bind(title)
        .bind(description)
        .bind(is_public)
        .bind(created_by)
        .fetch_one(&self.pool)
        .await?;

        Ok(set)
    }

    /// Get set by ID
    pub async fn get_set(&self, set_id: Uuid) -> Result<Option<DbFlashcardSet>> {
        let set = sqlx::query_as::<_, DbFlashcardSet>(
            r#"
            SELECT id, title, description, is_public, created_by, card_ids,
                   created_at, updated_at
            FROM flashcard_sets
            WHERE id = $1
            "#,
        )
        .bind(set_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(set)
    }

    /// List sets by owner, visibility, or the union of the two.
    ///
    /// `owner_id` with `is_public = true` is the browse call site: public
    /// sets plus the caller's own. No ordering is guaranteed.
    pub async fn list_sets(
        &self,
        owner_id: Option<Uuid>,
        is_public: Option<bool>,
    ) -> Result<Vec<DbFlashcardSet>> {
        let sets = match (owner_id, is_public) {
            (Some(owner), Some(true)) => {
                sqlx::query_as::<_, DbFlashcardSet>(
                    r#"
                    SELECT id, title, description, is_public, created_by, card_ids,
                           created_at, updated_at
                    FROM flashcard_sets
                    WHERE created_by = $1 OR is_public = TRUE
                    "#,
                )
                .bind(owner)
                .fetch_all(&self.pool)
                .await?
            }
            (Some(owner), Some(false)) => {
                sqlx::query_as::<_, DbFlashcardSet>(
                    r#"
                    SELECT id, title, description, is_public, created_by, card_ids,
                           created_at, updated_at
                    FROM flashcard_sets
                    WHERE created_by = $1 AND is_public = FALSE
                    "#,
                )
                .bind(owner)
                .fetch_all(&self.pool)
                .await?
            }
            (Some(owner), None) => {
                sqlx::query_as::<_, DbFlashcardSet>(
                    r#"
                    SELECT id, title, description, is_public, created_by, card_ids,
                           created_at, updated_at
                    FROM flashcard_sets
                    WHERE created_by = $1
                    "#,
                )
                .bind(owner)
                .fetch_all(&self.pool)
                .await?
            }
            (None, Some(public)) => {
                sqlx::query_as::<_, DbFlashcardSet>(
                    r#"
                    SELECT id, title, description, is_public, created_by, card_ids,
                           created_at, updated_at
                    FROM flashcard_sets
                    WHERE is_public = $1
                    "#,
                )
                .bind(public)
                .fetch_all(&self.pool)
                .await?
            }
            (None, None) => {
                sqlx::query_as::<_, DbFlashcardSet>(
                    r#"
                    SELECT id, title, description, is_public, created_by, card_ids,
                           created_at, updated_at
                    FROM flashcard_sets
                    "#,
                )
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(sets)
    }

    /// IDs of all sets owned by a user (for cascade deletes)
    pub async fn get_set_ids_by_owner(&self, owner_id: Uuid) -> Result<Vec<Uuid>> {
        let ids = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT id
            FROM flashcard_sets
            WHERE created_by = $1
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }

    /// Replace a set's title, description and visibility
    pub async fn update_set_fields(
        &self,
        set_id: Uuid,
        title: &str,
        description: Option<&str>,
        is_public: bool,
    ) -> Result<Option<DbFlashcardSet>> {
        let set = sqlx::query_as::<_, DbFlashcardSet>(
            r#"
            UPDATE flashcard_sets
            SET title = $2, description = $3, is_public = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING id, title, description, is_public, created_by, card_ids,
                      created_at, updated_at
            "#,
        )
        .bind(set_id)
        .bind(title)
        .bind(description)
        .bind(is_public)
        .fetch_optional(&self.pool)
        .await?;

        Ok(set)
    }

    /// Append one card id to a set's card list. Returns false when the set
    /// does not exist.
    pub async fn append_card_id(&self, set_id: Uuid, card_id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE flashcard_sets
            SET card_ids = array_append(card_ids, $2), updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(set_id)
        .bind(card_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Overwrite a set's card list wholesale
    pub async fn set_card_ids(&self, set_id: Uuid, card_ids: &[Uuid]) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE flashcard_sets
            SET card_ids = $2, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(set_id)
        .bind(card_ids)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a set row (cards are the consistency service's concern)
    pub async fn delete_set_row(&self, set_id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM flashcard_sets
            WHERE id = $1
            "#,
        )
        .bind(set_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    // === Card Repository ===

    /// Insert a single card pointing at its owning set
    pub async fn insert_card(
        &self,
        term: &str,
        definition: &str,
        reference: Option<&str>,
        flashcard_set_id: Uuid,
    ) -> Result<DbCard> {
        let card = sqlx::query_as::<_, DbCard>(
            r#"
            INSERT INTO cards (term, definition, reference, flashcard_set_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, term, definition, reference, flashcard_set_id
            "#,
        )
        .bind(term)
        .bind(definition)
        .bind(reference)
        .bind(flashcard_set_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(card)
    }

    /// Bulk-insert cards for a set (one insert per card, no transaction)
    pub async fn insert_cards(
        &self,
        flashcard_set_id: Uuid,
        cards: &[CardContent],
    ) -> Result<Vec<DbCard>> {
        let mut inserted = Vec::with_capacity(cards.len());
        for card in cards {
            inserted.push(
                self.insert_card(
                    &card.term,
                    &card.definition,
                    card.reference.as_deref(),
                    flashcard_set_id,
                )
                .await?,
            );
        }
        Ok(inserted)
    }

    /// Get all cards for one set
    pub async fn get_cards_by_set(&self, set_id: Uuid) -> Result<Vec<DbCard>> {
        let cards = sqlx::query_as::<_, DbCard>(
            r#"
            SELECT id, term, definition, reference, flashcard_set_id
            FROM cards
            WHERE flashcard_set_id = $1
            "#,
        )
        .bind(set_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(cards)
    }

    /// Group all cards belonging to the given sets in one round trip.
    ///
    /// Sets without cards produce no group; callers treat a missing id as
    /// count 0 with an empty card list.
    pub async fn count_and_group_cards(&self, set_ids: &[Uuid]) -> Result<Vec<CardGroup>> {
        let cards = sqlx::query_as::<_, DbCard>(
            r#"
            SELECT id, term, definition, reference, flashcard_set_id
            FROM cards
            WHERE flashcard_set_id = ANY($1)
            ORDER BY flashcard_set_id
            "#,
        )
        .bind(set_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(group_cards(cards))
    }

    /// Delete all cards owned by a set, returning how many were removed
    pub async fn delete_cards_by_set(&self, set_id: Uuid) -> Result<usize> {
        let result = sqlx::query(
            r#"
            DELETE FROM cards
            WHERE flashcard_set_id = $1
            "#,
        )
        .bind(set_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() as usize)
    }
}

/// Fold cards (ordered by owning set) into one group per set.
fn group_cards(cards: Vec<DbCard>) -> Vec<CardGroup> {
    let mut groups: Vec<CardGroup> = Vec::new();
    for card in cards {
        match groups.last_mut() {
            Some(group) if group.flashcard_set_id == card.flashcard_set_id => {
                group.cards.push(card);
            }
            _ => groups.push(CardGroup {
                flashcard_set_id: card.flashcard_set_id,
                card_count: 0,
                cards: vec![card],
            }),
        }
    }
    for group in &mut groups {
        group.card_count = group.cards.len();
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(set_id: Uuid, term: &str) -> DbCard {
        DbCard {
            id: Uuid::new_v4(),
            term: term.to_string(),
            definition: format!("definition of {term}"),
            reference: None,
            flashcard_set_id: set_id,
        }
    }

    #[test]
    fn test_group_cards_empty() {
        assert!(group_cards(Vec::new()).is_empty());
    }

    #[test]
    fn test_group_cards_counts_per_set() {
        let set_a = Uuid::new_v4();
        let set_b = Uuid::new_v4();
        let cards = vec![
            card(set_a, "uno"),
            card(set_a, "dos"),
            card(set_b, "tres"),
        ];

        let groups = group_cards(cards);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].flashcard_set_id, set_a);
        assert_eq!(groups[0].card_count, 2);
        assert_eq!(groups[0].cards.len(), 2);
        assert_eq!(groups[1].flashcard_set_id, set_b);
        assert_eq!(groups[1].card_count, 1);
    }

    #[test]
    fn test_group_cards_single_set() {
        let set_id = Uuid::new_v4();
        let groups = group_cards(vec![card(set_id, "uno"), card(set_id, "dos")]);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].card_count, 2);
    }
}
