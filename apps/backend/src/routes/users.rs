//! User registration, login, profile and account endpoints

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::services::consistency;
use crate::AppState;

/// POST /api/users/register
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>)> {
    if payload.username.trim().is_empty() {
        return Err(ApiError::BadRequest("username is required".to_string()));
    }
    if payload.email.trim().is_empty() {
        return Err(ApiError::BadRequest("email is required".to_string()));
    }
    if payload.password.is_empty() {
        return Err(ApiError::BadRequest("password is required".to_string()));
    }

    if state.db.get_user_by_email(&payload.email).await?.is_some() {
        return Err(ApiError::Conflict("Email already in use".to_string()));
    }

    let password_hash = hash_password(&payload.password)?;
    let user = state
        .db
        .insert_user(&payload.username, &payload.email, &password_hash)
        .await?;

    tracing::info!(user_id = %user.id, "registered new user");

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "message": "User registered successfully" })),
    ))
}

/// POST /api/users/login
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<UserProfile>> {
    let user = state
        .db
        .get_user_by_email(&payload.email)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let valid = bcrypt::verify(&payload.password, &user.password_hash)
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    if !valid {
        return Err(ApiError::Unauthorized("Invalid password".to_string()));
    }

    Ok(Json(user.to_profile()))
}

/// PATCH /api/users
///
/// Multipart form: `username`, `email` (identifies the account),
/// `password` (optional), `profile_picture` (optional file).
pub async fn update_profile(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UserProfile>> {
    let mut username: Option<String> = None;
    let mut email: Option<String> = None;
    let mut password: Option<String> = None;
    let mut picture: Option<(String, Option<String>, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "username" => {
                username = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| ApiError::BadRequest(e.to_string()))?,
                )
            }
            "email" => {
                email = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| ApiError::BadRequest(e.to_string()))?,
                )
            }
            "password" => {
                password = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| ApiError::BadRequest(e.to_string()))?,
                )
            }
            "profile_picture" => {
                let file_name = field.file_name().unwrap_or("avatar").to_string();
                let content_type = field.content_type().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(e.to_string()))?;
                picture = Some((file_name, content_type, bytes.to_vec()));
            }
            _ => {}
        }
    }

    let email = email
        .filter(|e| !e.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("email is required".to_string()))?;
    let username = username
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("username is required".to_string()))?;

    let mut user = state
        .db
        .get_user_by_email(&email)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    user.username = username;

    // An empty password field means "keep the current one".
    if let Some(password) = password.filter(|p| !p.is_empty()) {
        user.password_hash = hash_password(&password)?;
    }

    if let Some((file_name, content_type, bytes)) = picture {
        let url = state
            .storage
            .upload_avatar(user.id, &file_name, &bytes, content_type.as_deref())
            .await
            .map_err(|e| ApiError::Internal(e.to_string()))?;
        user.profile_picture = Some(url);
    }

    user.last_edited_at = Utc::now();
    state.db.update_user(&user).await?;

    Ok(Json(user.to_profile()))
}

/// DELETE /api/users
///
/// Removes the account, its stored avatars (best effort) and every owned
/// set with its cards.
pub async fn delete_account(
    State(state): State<AppState>,
    Json(payload): Json<DeleteAccountRequest>,
) -> Result<Json<DeleteAccountResponse>> {
    let user = state
        .db
        .get_user_by_id(payload.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    if user
        .profile_picture
        .as_deref()
        .is_some_and(|url| state.storage.owns_url(url))
    {
        if let Err(e) = state.storage.delete_avatars(user.id).await {
            tracing::warn!(user_id = %user.id, error = %e, "failed to delete stored avatars");
        }
    }

    let outcome = consistency::delete_user_cascade(&state.db, user.id).await?;

    Ok(Json(DeleteAccountResponse {
        deleted_sets: outcome.deleted_sets,
        deleted_cards: outcome.deleted_cards,
    }))
}

fn hash_password(password: &str) -> Result<String> {
    bcrypt::hash(password, hash_cost()).map_err(|e| ApiError::Internal(e.to_string()))
}

/// bcrypt work factor, overridable via BCRYPT_COST.
fn hash_cost() -> u32 {
    std::env::var("BCRYPT_COST")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(bcrypt::DEFAULT_COST)
}
