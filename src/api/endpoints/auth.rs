//! Authentication endpoints: register, login, current identity.

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Json};
use chrono::Duration;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::auth::{generate_token, hash_password, hash_token, verify_password};
use crate::config::SESSION_TTL_HOURS;
use crate::db::repository::{session, user};
use crate::db::with_transaction;
use crate::models::{Identity, Token, UserLogin, UserRegister, UserRole};

/// `POST /auth/register` — create a new patient account.
///
/// Runs on the blocking pool: password hashing is deliberately slow.
pub async fn register(
    State(ctx): State<ApiContext>,
    Json(request): Json<UserRegister>,
) -> Result<(StatusCode, Json<Identity>), ApiError> {
    request.validate().map_err(ApiError::BadRequest)?;

    let identity = tokio::task::spawn_blocking(move || -> Result<Identity, ApiError> {
        let conn = ctx.open_db()?;
        let new_user = user::NewUser {
            email: request.email.clone(),
            password_hash: hash_password(&request.password),
            full_name: request.full_name.clone(),
            date_of_birth: request.date_of_birth,
            gender: request.gender,
            phone_number: request.phone_number.clone(),
            role: UserRole::Patient,
        };
        let identity = user::insert_user(&conn, &new_user, ctx.clock.now())?;
        tracing::info!(email = %identity.email, "new user registered");
        Ok(identity)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("register task failed: {e}")))??;

    Ok((StatusCode::CREATED, Json(identity)))
}

/// `POST /auth/login` — verify credentials and issue a bearer token.
///
/// Unknown email and wrong password are indistinguishable to the caller.
pub async fn login(
    State(ctx): State<ApiContext>,
    Json(credentials): Json<UserLogin>,
) -> Result<Json<Token>, ApiError> {
    let token = tokio::task::spawn_blocking(move || -> Result<Token, ApiError> {
        let mut conn = ctx.open_db()?;

        let (identity, stored_hash) = user::find_by_email(&conn, &credentials.email)?
            .ok_or(ApiError::Unauthorized)?;
        if !verify_password(&credentials.password, &stored_hash) {
            return Err(ApiError::Unauthorized);
        }

        let token = generate_token();
        let now = ctx.clock.now();
        // Prune stale sessions while issuing the new one; both land or
        // neither does.
        with_transaction(&mut conn, |tx| {
            session::delete_expired(tx, now)?;
            session::insert_session(
                tx,
                &hash_token(&token),
                &identity.id,
                now,
                now + Duration::hours(SESSION_TTL_HOURS),
            )
        })?;

        tracing::info!(email = %identity.email, "user logged in");
        Ok(Token::bearer(token))
    })
    .await
    .map_err(|e| ApiError::Internal(format!("login task failed: {e}")))??;

    Ok(Json(token))
}

/// `GET /auth/me` — the identity behind the presented token.
pub async fn me(Extension(identity): Extension<Identity>) -> Json<Identity> {
    Json(identity)
}
