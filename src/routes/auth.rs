use std::sync::Arc;

use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::accounts::{self, AuthUser};
use crate::db;
use crate::db::audit::AuditEvent;
use crate::error::AppError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct LoginPayload {
    pub email: String,
    pub password: String,
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginPayload>,
) -> Result<impl IntoResponse, AppError> {
    let pool = state.pool.as_ref();

    let user = db::accounts::user_by_email(pool, &payload.email)
        .await?
        .filter(|user| user.is_active)
        .ok_or(AppError::Unauthorized)?;

    if !accounts::verify_password(&user.password_hash, &payload.password) {
        return Err(AppError::Unauthorized);
    }

    let token = accounts::start_session(pool, &state.config, &user).await?;

    db::audit::record(
        pool,
        AuditEvent {
            user_id: Some(user.id),
            action: "USER_LOGIN",
            description: format!("{} logged in", user.email),
            model_name: "User",
            object_id: user.id.to_string(),
            details: json!({ "role": user.role }),
        },
    )
    .await?;

    Ok(Json(json!({
        "token": token,
        "role": user.role,
        "full_name": user.full_name,
        "must_change_password": user.must_change_password,
    })))
}

pub async fn logout(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    if let Some(token) = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
    {
        db::accounts::delete_session(state.pool.as_ref(), token).await?;
    }

    db::audit::record(
        state.pool.as_ref(),
        AuditEvent {
            user_id: Some(user.id),
            action: "USER_LOGOUT",
            description: format!("{} logged out", user.email),
            model_name: "User",
            object_id: user.id.to_string(),
            details: json!({}),
        },
    )
    .await?;

    Ok(Json(json!({ "success": true })))
}

#[derive(Deserialize)]
pub struct ChangePasswordPayload {
    pub current_password: String,
    pub new_password: String,
}

pub async fn change_password(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Json(payload): Json<ChangePasswordPayload>,
) -> Result<impl IntoResponse, AppError> {
    if !accounts::verify_password(&user.password_hash, &payload.current_password) {
        return Err(AppError::validation("current password is incorrect"));
    }
    if payload.new_password.len() < 8 {
        return Err(AppError::validation(
            "new password must be at least 8 characters",
        ));
    }
    if payload.new_password == payload.current_password {
        return Err(AppError::validation(
            "new password must differ from the current one",
        ));
    }

    let hash = accounts::hash_password(&payload.new_password)?;
    db::accounts::update_password(state.pool.as_ref(), user.id, &hash).await?;

    Ok(Json(json!({ "success": true })))
}
