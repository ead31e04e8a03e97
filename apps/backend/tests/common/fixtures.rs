//! Test fixtures and factory functions for creating test data.

use serde_json::{json, Value};
use uuid::Uuid;

/// Generate a unique email to avoid collisions between test runs.
pub fn unique_email(prefix: &str) -> String {
    format!("{}_{}@example.com", prefix, &Uuid::new_v4().to_string()[..8])
}

/// Generate a unique username.
pub fn unique_username(prefix: &str) -> String {
    format!("{}_{}", prefix, &Uuid::new_v4().to_string()[..8])
}

/// Create a register request body.
pub fn register_request(username: &str, email: &str, password: &str) -> Value {
    json!({
        "username": username,
        "email": email,
        "password": password,
    })
}

/// Create a login request body.
pub fn login_request(email: &str, password: &str) -> Value {
    json!({
        "email": email,
        "password": password,
    })
}

/// Create a set request body without initial cards.
pub fn create_set_request(title: &str, created_by: Option<Uuid>) -> Value {
    match created_by {
        Some(owner) => json!({
            "title": title,
            "description": "made by a test",
            "created_by": owner,
        }),
        None => json!({
            "title": title,
            "description": "made by a test",
        }),
    }
}

/// Create a set request body with visibility and initial cards.
pub fn create_set_request_full(
    title: &str,
    created_by: Uuid,
    is_public: bool,
    cards: Vec<Value>,
) -> Value {
    json!({
        "title": title,
        "description": "made by a test",
        "is_public": is_public,
        "created_by": created_by,
        "cards": cards,
    })
}

/// Generate `count` term/definition pairs.
pub fn sample_cards(count: usize) -> Vec<Value> {
    (0..count)
        .map(|i| {
            json!({
                "term": format!("term {}", i + 1),
                "definition": format!("definition {}", i + 1),
            })
        })
        .collect()
}

/// Create a card request body.
pub fn create_card_request(set_id: Uuid, term: &str, definition: &str) -> Value {
    json!({
        "term": term,
        "definition": definition,
        "flashcard_set_id": set_id,
    })
}

/// Create a replace-cards request body.
pub fn replace_cards_request(set_id: Uuid, cards: Vec<Value>) -> Value {
    json!({
        "flashcard_set_id": set_id,
        "cards": cards,
    })
}

/// Create a delete-cards request body.
pub fn delete_cards_request(set_id: Uuid) -> Value {
    json!({ "flashcard_set_id": set_id })
}

/// Create a delete-account request body.
pub fn delete_account_request(user_id: Uuid) -> Value {
    json!({ "user_id": user_id })
}
