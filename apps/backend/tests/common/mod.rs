//! Common test utilities and fixtures for integration tests.
//!
//! This module provides shared test infrastructure including:
//! - TestContext for setting up the test environment with a database
//! - Helper functions for creating and cleaning up test data
//!
//! # Requirements
//! Integration tests require a PostgreSQL database (set DATABASE_URL).
//! Media storage is only contacted by tests that upload a profile picture.

pub mod fixtures;

use std::sync::Arc;

use axum::Router;
use uuid::Uuid;

use recall_backend::db::Database;
use recall_backend::models::DbUser;
use recall_backend::services::storage::StorageService;
use recall_backend::AppState;

/// Test context containing the database connection and the API router.
///
/// Requires the DATABASE_URL environment variable to be set.
pub struct TestContext {
    pub db: Arc<Database>,
    app: Router,
}

impl TestContext {
    /// Create a new test context.
    ///
    /// # Panics
    /// Panics if DATABASE_URL is not set or the database connection fails.
    pub async fn new() -> Self {
        dotenvy::dotenv().ok();

        let database_url =
            std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for integration tests");

        let db = Database::connect(&database_url)
            .await
            .expect("Failed to connect to test database");

        db.run_migrations()
            .await
            .expect("Failed to run migrations");

        let db = Arc::new(db);

        // Storage construction only reads configuration; no object is
        // touched unless a test uploads a profile picture.
        if std::env::var("S3_BUCKET").is_err() {
            std::env::set_var("S3_BUCKET", "test-bucket");
            std::env::set_var("S3_ACCESS_KEY", "test-key");
            std::env::set_var("S3_SECRET_KEY", "test-secret");
            std::env::set_var("S3_ENDPOINT", "http://localhost:9000");
        }

        // Keep password hashing cheap in tests.
        if std::env::var("BCRYPT_COST").is_err() {
            std::env::set_var("BCRYPT_COST", "4");
        }

        let storage = StorageService::new()
            .await
            .expect("Failed to create storage config");

        let state = AppState {
            db: db.clone(),
            storage: Arc::new(storage),
        };

        let app = recall_backend::router(state);

        Self { db, app }
    }

    /// Get the router for use with axum-test.
    pub fn router(&self) -> Router {
        self.app.clone()
    }

    /// Look up a user by email, panicking when absent.
    pub async fn user_by_email(&self, email: &str) -> DbUser {
        self.db
            .get_user_by_email(email)
            .await
            .expect("user lookup failed")
            .expect("user not found")
    }

    /// Clean up all data belonging to a test user.
    ///
    /// Call this after tests to remove test data.
    pub async fn cleanup_user(&self, user_id: Uuid) {
        let _ = sqlx::query(
            "DELETE FROM cards WHERE flashcard_set_id IN \
             (SELECT id FROM flashcard_sets WHERE created_by = $1)",
        )
        .bind(user_id)
        .execute(self.db.pool())
        .await;

        let _ = sqlx::query("DELETE FROM flashcard_sets WHERE created_by = $1")
            .bind(user_id)
            .execute(self.db.pool())
            .await;

        let _ = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(self.db.pool())
            .await;
    }

    /// Count the sets still owned by a user.
    pub async fn count_sets_by_owner(&self, user_id: Uuid) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM flashcard_sets WHERE created_by = $1")
            .bind(user_id)
            .fetch_one(self.db.pool())
            .await
            .expect("set count query failed")
    }

    /// Count the cards still pointing at any of the given sets.
    pub async fn count_cards_for_sets(&self, set_ids: &[Uuid]) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM cards WHERE flashcard_set_id = ANY($1)")
            .bind(set_ids)
            .fetch_one(self.db.pool())
            .await
            .expect("card count query failed")
    }
}
